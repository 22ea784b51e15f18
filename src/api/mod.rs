//! Notes API client.
//!
//! The pipeline only needs two capabilities from the notes server: create a
//! template and list the existing ones. [`TemplateApi`] is that seam;
//! [`HttpTemplateApi`] is the production implementation.

mod http;

pub use http::{ApiHttpConfig, HttpTemplateApi, build_http_client};

use crate::Result;
use crate::models::{Template, TemplatePayload};
use std::future::Future;

/// Remote template mutation capability.
///
/// Calls are not idempotent: creating the same payload twice yields two
/// templates. Implementations must not retry on their own.
pub trait TemplateApi {
    /// Creates a template and returns it as stored by the server.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects it.
    fn create_template(
        &self,
        payload: &TemplatePayload,
    ) -> impl Future<Output = Result<Template>> + Send;

    /// Lists every template the server holds.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is not a list.
    fn list_templates(&self) -> impl Future<Output = Result<Vec<Template>>> + Send;
}
