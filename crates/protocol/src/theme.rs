use serde::{Deserialize, Serialize};

/// Semantic color tokens resolved by the renderer's active theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeToken {
    Background,
    HeaderBackground,

    // Block bands, shaded by how many samples landed in them.
    DwellHot,
    DwellWarm,
    DwellCold,
    DwellNone,
    BlockBorder,

    // Gaze path segments.
    GazePath,
    RegressionPath,
    SkipPath,

    TextPrimary,
    TextMuted,
}
