//! Risk-flagging and explanation engine.
//!
//! Raw input is normalized against the domain's field catalogue, scored by the
//! domain's classifier, checked against threshold rules and normal ranges,
//! and assembled with content lookups into one `AssessmentReport`.

pub mod comparison;
pub mod detection;
pub mod engine;
pub mod explain;
pub mod normalize;
pub mod reference;
pub mod report;
pub mod severity;
pub mod types;

pub use engine::Assessor;
pub use reference::{load_content, ContentTables, ReferenceError};
pub use report::AssessmentReport;
pub use types::{AssessmentError, RawInput, ValidationError};
