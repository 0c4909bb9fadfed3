//! Response decoder module
//!
//! Okta list endpoints return a JSON array at the document root; a record
//! path can point somewhere else in the document when needed.

mod decoders;
mod types;

pub use decoders::{JsonDecoder, ROOT_RECORDS_PATH};
pub use types::RecordDecoder;
