//! Application Layer - Detection pipeline and use cases

pub mod engine;
pub mod errors;
pub mod extractor;
pub mod reporting;
pub mod rules;
pub mod use_cases;

pub use engine::ClassificationEngine;
pub use errors::{AnalysisError, ReportError};
pub use extractor::SignalExtractor;
pub use use_cases::{AnalyzeEcosystemUseCase, EcosystemInventory};
