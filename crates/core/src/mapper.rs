use okuma_seyri_protocol::TextBlock;

use crate::layout::{LayoutError, LayoutProvider};

/// Snapshot the paragraphs of `container_id` as text blocks.
///
/// Ids are assigned `0..N` in document order regardless of on-screen
/// position. The result reflects the layout at call time only; map again
/// after any scroll, resize or content change.
pub fn map_blocks<P>(provider: &P, container_id: &str) -> Result<Vec<TextBlock>, LayoutError>
where
    P: LayoutProvider + ?Sized,
{
    let regions = provider.paragraphs(container_id)?;
    let blocks: Vec<TextBlock> = regions
        .into_iter()
        .enumerate()
        .map(|(id, region)| {
            if region.top > region.bottom {
                log::warn!(
                    "block {id} has inverted extent ({} > {})",
                    region.top,
                    region.bottom
                );
            }
            TextBlock::new(id, region.top, region.bottom, region.text)
        })
        .collect();

    log::debug!("mapped {} blocks in `{container_id}`", blocks.len());
    Ok(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{LayoutRegion, StaticLayout};

    #[test]
    fn ids_follow_document_order_not_position() {
        // Second paragraph renders above the first (e.g. floated or reordered by CSS).
        let layout = StaticLayout::new().with_container(
            "readingBox",
            vec![
                LayoutRegion::new(300.0, 340.0, "a"),
                LayoutRegion::new(100.0, 140.0, "b"),
                LayoutRegion::new(200.0, 240.0, "c"),
            ],
        );
        let blocks = map_blocks(&layout, "readingBox").unwrap();
        let ids: Vec<_> = blocks.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(blocks[1].text, "b");
        assert_eq!(blocks[1].top, 100.0);
        for (index, block) in blocks.iter().enumerate() {
            assert_eq!(block.id, index);
        }
    }

    #[test]
    fn empty_container_maps_to_no_blocks() {
        let layout = StaticLayout::new().with_container("readingBox", vec![]);
        assert!(map_blocks(&layout, "readingBox").unwrap().is_empty());
    }

    #[test]
    fn missing_container_propagates() {
        let layout = StaticLayout::new();
        assert!(matches!(
            map_blocks(&layout, "readingBox"),
            Err(LayoutError::ContainerNotFound(_))
        ));
    }

    #[test]
    fn remapping_reflects_new_geometry() {
        let layout = StaticLayout::new()
            .with_container("c", vec![LayoutRegion::new(100.0, 150.0, "p")]);
        let before = map_blocks(&layout, "c").unwrap();
        let after = map_blocks(&layout.scrolled(-100.0), "c").unwrap();
        assert_eq!(before[0].top, 100.0);
        assert_eq!(after[0].top, 0.0);
        assert_eq!(after[0].id, 0);
    }
}
