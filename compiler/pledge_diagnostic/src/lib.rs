//! Diagnostic system for compiler error reporting.
//!
//! - Error codes for searchability
//! - Clear messages (what went wrong)
//! - Primary span (where it went wrong)
//! - Context labels (why it's wrong)
//!
//! Semantic resolution is fail-fast: the first violation becomes a
//! `Diagnostic` and aborts the pipeline, so every stage returns
//! `Result<_, Diagnostic>` and propagates with `?`.

mod diagnostic;
mod error_code;
mod render;

pub use diagnostic::{Diagnostic, Label, Severity};
pub use error_code::ErrorCode;
pub use render::render;
