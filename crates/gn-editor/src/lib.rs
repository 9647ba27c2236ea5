pub mod documents;
pub mod handles;
pub mod session;

pub use documents::{DocumentMeta, create_document, delete_document, list_documents, rename_document};
pub use handles::{Handle, HandleKind, HandleRegistry};
pub use session::Session;
