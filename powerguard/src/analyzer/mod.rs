//! Design Analysis
//!
//! Current inference over the design topology, structural checks, scoring
//! and the validator that combines them with wire sizing and the connection
//! rules.

pub mod current;
pub mod issues;
pub mod score;
pub mod structural;
pub mod validator;

pub use current::{CurrentBasis, CurrentEstimate, CurrentEstimator};
pub use issues::{sort_issues, Issue, IssueCategory, Severity};
pub use score::compute_score;
pub use validator::{DesignValidator, ValidationMetrics, ValidationReport, WireReport};
