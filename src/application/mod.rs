pub mod use_cases;

pub use use_cases::analysis_run::{AnalysisRun, AnalysisRunUseCase};
pub use use_cases::narration::NarrationUseCase;
pub use use_cases::robustness_report::ReportAggregator;
pub use use_cases::upload::UploadUseCase;
