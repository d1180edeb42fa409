pub mod builtin;
mod introspect;
mod naming;
mod parser;
mod types;

pub use naming::CollectionNaming;
pub use parser::{parse_schema, parse_schema_str, parse_schema_str_with};
pub use types::*;
