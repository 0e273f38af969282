//! Document loading: from PDF files to positioned text.

mod backend;
mod layout;
mod options;

pub use backend::{document_name, DocumentSource, LopdfSource};
pub use options::{ErrorMode, ParseOptions};
