use okuma_seyri_protocol::{BlockId, TextBlock};

/// Id of the first block whose `[top, bottom]` contains `gaze_y`.
///
/// Overlapping blocks resolve to the lowest id. `None` means the gaze fell
/// in a gap, a margin or outside every block; that is an ordinary outcome.
pub fn classify_block(gaze_y: f64, blocks: &[TextBlock]) -> Option<BlockId> {
    blocks.iter().find(|b| b.contains_y(gaze_y)).map(|b| b.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(id: BlockId, top: f64, bottom: f64) -> TextBlock {
        TextBlock::new(id, top, bottom, "")
    }

    #[test]
    fn boundaries_are_inclusive() {
        let blocks = [block(0, 100.0, 150.0)];
        assert_eq!(classify_block(100.0, &blocks), Some(0));
        assert_eq!(classify_block(150.0, &blocks), Some(0));
        assert_eq!(classify_block(99.9, &blocks), None);
        assert_eq!(classify_block(150.1, &blocks), None);
    }

    #[test]
    fn first_match_wins_on_overlap() {
        let blocks = [block(0, 0.0, 100.0), block(1, 50.0, 150.0)];
        assert_eq!(classify_block(75.0, &blocks), Some(0));
        assert_eq!(classify_block(125.0, &blocks), Some(1));
    }

    #[test]
    fn empty_list_is_unknown() {
        assert_eq!(classify_block(0.0, &[]), None);
        assert_eq!(classify_block(-500.0, &[]), None);
    }

    #[test]
    fn gaps_are_unknown() {
        let blocks = [block(0, 0.0, 40.0), block(1, 60.0, 100.0)];
        assert_eq!(classify_block(50.0, &blocks), None);
        assert_eq!(classify_block(60.0, &blocks), Some(1));
    }
}
