//! Procedural macros for `itinerae` response types.

mod completion_schema;
mod schema_extraction;

use proc_macro::TokenStream;

/// Implements `itinerae::schema::CompletionSchema` for a named struct.
///
/// The JSON schema comes from the struct's `schemars::JsonSchema` impl and is built once,
/// then cached for the life of the process. Optional `name = "..."` and
/// `description = "..."` arguments override the struct name and doc comment.
#[proc_macro_attribute]
pub fn completion_schema(attr: TokenStream, item: TokenStream) -> TokenStream {
    completion_schema::completion_schema(attr, item)
}
