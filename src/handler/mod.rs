//! Request handler module
//!
//! Turns an HTTP request into a bucket lookup and the lookup's outcome into
//! an S3-style response.

pub mod router;

pub use router::{handle_request, response_for_outcome};
