//! Time-series viewport engine.
//!
//! Everything the detail chart needs that does not touch egui: normalization
//! of raw measurements, the index window, decimation, hover/lock tracking,
//! refresh merging and CSV export.

pub mod engine;
pub mod export;
pub mod measurement;
pub mod refresh;
pub mod sampling;
pub mod selection;
pub mod window;

pub use engine::{Summary, ViewportEngine};
pub use export::{export_file_name, to_csv, ExportScope, CSV_HEADER};
pub use measurement::{normalize, parse_instant, parse_value, MeasurementPoint, ValueSource};
pub use refresh::RefreshOutcome;
pub use sampling::SamplingStride;
pub use selection::{LockState, Selection};
pub use window::{Direction, ShowLast, Viewport, SHOW_LAST_PRESETS};
