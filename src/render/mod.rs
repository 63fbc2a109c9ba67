//! Pure projections from data to display values.

pub mod analysis;
pub mod profile;

pub use analysis::{AnalysisPanel, AnalysisSummary};
pub use profile::{ProfileDisplay, MAX_SKILL_CHIPS};
