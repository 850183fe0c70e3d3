use okuma_seyri_core::{LayoutError, LayoutProvider, LayoutRegion};
use wasm_bindgen::JsCast;

/// Paragraph-level elements inside the reading container.
const PARAGRAPH_SELECTOR: &str = "p";

/// Layout provider backed by the live document.
pub struct DomLayout {
    document: web_sys::Document,
}

impl DomLayout {
    pub fn from_window() -> Result<Self, LayoutError> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| LayoutError::Unavailable("no window document".to_string()))?;
        Ok(Self { document })
    }
}

impl LayoutProvider for DomLayout {
    fn paragraphs(&self, container_id: &str) -> Result<Vec<LayoutRegion>, LayoutError> {
        let container = self
            .document
            .get_element_by_id(container_id)
            .ok_or_else(|| LayoutError::ContainerNotFound(container_id.to_string()))?;
        let nodes = container
            .query_selector_all(PARAGRAPH_SELECTOR)
            .map_err(|e| LayoutError::Unavailable(format!("{e:?}")))?;

        let mut regions = Vec::with_capacity(nodes.length() as usize);
        for index in 0..nodes.length() {
            let Some(node) = nodes.item(index) else {
                continue;
            };
            let Ok(element) = node.dyn_into::<web_sys::HtmlElement>() else {
                continue;
            };
            let rect = element.get_bounding_client_rect();
            regions.push(LayoutRegion::new(
                rect.top(),
                rect.bottom(),
                element.inner_text(),
            ));
        }
        Ok(regions)
    }
}
