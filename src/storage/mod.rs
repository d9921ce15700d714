//! Bucket storage module
//!
//! Maps registered bucket names onto local directories and resolves object
//! keys to file contents, enforcing containment and the PDF-only rule.

mod outcome;
mod registry;

pub use outcome::{FailureReason, ResolutionOutcome};
pub use registry::BucketRegistry;
