// ============================================================
// ROBUSTNESS DOMAIN LAYER
// ============================================================
// Analysis result contract and its display interpretation

mod display_entry;
mod result;
mod status_label;

pub use display_entry::{DisplayEntry, EntryKind, RobustnessReport, ScoreKind};
pub use result::{AnalysisStatus, DominantFeature, RobustnessResult, SafeLimits};
pub use status_label::StatusLabel;
