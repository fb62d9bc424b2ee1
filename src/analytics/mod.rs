pub mod aggregator;
pub mod export;
pub mod extractor;

pub use aggregator::{
    format_duration, CalculationError, TimeBreakdown, WatchTimeCalculator, WatchTimeStats,
};
pub use export::{save_results, ExportError, JsonExporter, ResultsDocument};
pub use extractor::{extract_video_ids, DateWindow, Extraction};
