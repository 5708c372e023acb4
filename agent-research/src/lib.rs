//! Research pipeline helpers for the Luxmap agent.
//!
//! Structured evaluator output, the loop escalation rule, and post-processing
//! of cited reports. None of this talks to the model; it only shapes what goes
//! in and out of it.

pub mod citations;
pub mod error;
pub mod feedback;

pub use citations::{replace_citations, Source, Sources};
pub use error::{Error, Result};
pub use feedback::{EscalationChecker, Feedback, Grade, SearchQuery};
