pub mod ast;
pub mod cli;
pub mod config;
pub mod context;
pub mod detectors;
pub mod error;
pub mod examiner;
pub mod reader;
pub mod smell;
pub mod telemetry;
pub mod warning;

pub use error::{Error, Result};
pub use examiner::{ExamineStrategy, Examiner};
pub use smell::DetectorRegistry;
pub use warning::SmellWarning;

/// Examine one serialized source with the shipped detector battery and no
/// configuration layers.
pub fn examine_source(source_name: &str, text: &str) -> Examiner {
    let registry = DetectorRegistry::default_detectors();
    Examiner::from_source(
        source_name,
        text,
        &[],
        &registry,
        ExamineStrategy::ActiveSmellsOnly,
    )
}
