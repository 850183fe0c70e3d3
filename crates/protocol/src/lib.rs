pub mod block;
pub mod commands;
pub mod counters;
pub mod report;
pub mod sample;
pub mod theme;
pub mod types;

pub use block::{BlockId, TextBlock};
pub use commands::{RenderCommand, TextAlign};
pub use counters::ReadingCounters;
pub use report::{DEFAULT_NOTE, REPORT_FILE_NAME, ReadingStats, ReportMeta, SessionReport};
pub use sample::{GazeEstimate, GazeSample};
pub use theme::ThemeToken;
pub use types::{Point, Rect, Viewport, ViewportSize};
