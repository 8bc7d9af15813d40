//! Response decoding and JSON path extraction
//!
//! Records and pagination cursors are located in response bodies by
//! configured paths such as `$.responses[*]` and `$.cursor.before`. Simple
//! dotted paths are walked directly; wildcard paths go through `jsonpath-rust`.

mod decoders;

pub use decoders::{extract_path, extract_string, JsonDecoder};
