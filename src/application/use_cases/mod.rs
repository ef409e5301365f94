pub mod analysis_run;
pub mod narration;
pub mod robustness_report;
pub mod upload;
