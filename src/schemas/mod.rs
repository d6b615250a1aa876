pub mod contract;
pub mod schema;

pub use contract::{validate, ContractError};
pub use schema::{apply_doc_comments, CompletionSchema, SchemaHandle};
