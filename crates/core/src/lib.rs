//! Reading-path tracking: map paragraphs to screen blocks, classify gaze
//! estimates against them and count line transitions over a session.

pub mod buffer;
pub mod calibration;
pub mod classifier;
pub mod config;
pub mod layout;
pub mod mapper;
pub mod parsers;
pub mod replay;
pub mod report;
pub mod session;
pub mod source;
pub mod summary;
pub mod svg;
pub mod transition;
pub mod views;

pub use buffer::SampleBuffer;
pub use calibration::{Calibration, CalibrationClick, CalibrationTarget};
pub use classifier::classify_block;
pub use config::{CalibrationConfig, ConfigError, TrackerConfig};
pub use layout::{LayoutError, LayoutProvider, LayoutRegion, StaticLayout};
pub use mapper::map_blocks;
pub use replay::replay_trace;
pub use report::{ReportError, parse_report};
pub use session::{ReadingSession, SampleOutcome};
pub use source::{GazeHub, GazeSource, SubscriptionId};
pub use summary::{BlockDwell, ReadingSummary};
pub use transition::{Transition, TransitionTracker};
