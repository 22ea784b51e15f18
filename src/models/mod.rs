//! Data models for noteport.

mod template;

pub use template::{ServerField, Template, TemplatePayload};
