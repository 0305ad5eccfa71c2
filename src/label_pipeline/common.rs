//! Common utilities module
//!
//! This module contains the error type shared by every stage of the label pipeline.

pub mod error;

pub use error::{PipelineError, Result};
