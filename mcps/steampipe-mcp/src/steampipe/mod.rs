//! steampipe CLI wrapper module
//!
//! Async process invocation for `steampipe query` and the error taxonomy
//! shared with the output normalizer.

pub mod error;
pub mod executor;

pub use error::{SteampipeError, SteampipeResult};
pub use executor::{ExecutionResult, SteampipeExecutor};
