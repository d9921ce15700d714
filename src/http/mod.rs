//! HTTP protocol layer module
//!
//! Path parsing, error codes and response builders, independent of the
//! connection handling in `server`.

pub mod error_code;
pub mod request;
pub mod response;

// Re-export commonly used types
pub use error_code::ErrorCode;
pub use request::{parse_object_path, ObjectPath, ParseError};
pub use response::{build_405_response, build_error_response, build_object_response};
