//! JSON output for outlines and relevance reports.

mod json;

pub use json::{to_json, write_json, JsonFormat};
