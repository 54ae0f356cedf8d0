//! Request handlers, one submodule per resource.
//!
//! Handlers extract and validate input, delegate to an engine or repository,
//! and wrap the result in the [`crate::response::ApiResponse`] envelope.

pub mod activity_logs;
pub mod annotations;
pub mod annotators;
pub mod auth;
pub mod datasets;
pub mod statistics;
pub mod tasks;
pub mod text_pairs;

use annotate_core::error::CoreError;
use validator::Validate;

use crate::error::AppResult;

/// Run `validator` rules on a request body, mapping failures to a 400.
pub(crate) fn validate_body<T: Validate>(body: &T) -> AppResult<()> {
    body.validate()
        .map_err(|errors| CoreError::Validation(errors.to_string()))?;
    Ok(())
}
