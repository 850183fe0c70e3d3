use serde::{Deserialize, Serialize};

/// Index of a [`TextBlock`] within one mapping pass.
pub type BlockId = usize;

/// One paragraph-level reading unit with its vertical screen extent.
///
/// `top`/`bottom` are viewport pixels captured when the block list was
/// mapped. They go stale on scroll, resize or reflow, so a block list is
/// always replaced as a whole, never patched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    /// Position in document order, starting at 0. Equals the index of the
    /// block in the list it belongs to.
    pub id: BlockId,
    pub top: f64,
    pub bottom: f64,
    /// Rendered text at mapping time.
    pub text: String,
}

impl TextBlock {
    pub fn new(id: BlockId, top: f64, bottom: f64, text: impl Into<String>) -> Self {
        Self {
            id,
            top,
            bottom,
            text: text.into(),
        }
    }

    /// Whether `y` lies within `[top, bottom]`, both ends inclusive.
    #[inline]
    pub fn contains_y(&self, y: f64) -> bool {
        y >= self.top && y <= self.bottom
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn containment_is_inclusive() {
        let b = TextBlock::new(0, 100.0, 150.0, "p");
        assert!(b.contains_y(100.0));
        assert!(b.contains_y(150.0));
        assert!(!b.contains_y(99.9));
        assert!(!b.contains_y(150.1));
    }

    #[test]
    fn nan_is_never_contained() {
        let b = TextBlock::new(0, 0.0, 10.0, "");
        assert!(!b.contains_y(f64::NAN));
    }
}
