//! shapeguard-core: runtime-validated decoders for untrusted JSON.
//!
//! Data that crosses a process boundary (a file, a socket, an HTTP response
//! body) arrives as an [`Untrusted`] value. The only way to get a typed value
//! out of it is a [`Decoder`], which checks the value against a declared
//! shape and either re-types it or reports a [`DecodeError`] naming the path
//! and the expected shape. Decoders are plain immutable values: build them
//! once and reuse them.
//!
//! ```
//! use shapeguard_core::{field, object, string, Decoder, Untrusted};
//!
//! let person = object(field("person", object(field("name", string()))));
//!
//! let ok = Untrusted::new(serde_json::json!({"person": {"name": "Ada"}}));
//! assert_eq!(person.decode(&ok).unwrap(), "Ada");
//!
//! let bad = Untrusted::new(serde_json::json!({"person": {"name": 42}}));
//! let err = person.decode(&bad).unwrap_err();
//! assert_eq!(err.path.to_string(), "person.name");
//! assert_eq!(err.expected, "string");
//! ```

pub mod combinators;
pub mod decoder;
pub mod error;
pub mod options;
pub mod primitives;
pub mod shape;
pub mod untrusted;

pub use combinators::{array, field, object, one_of, optional, record, Field, Fields};
pub use decoder::{BoxDecoder, Context, Decoder, Halt};
pub use error::{json_kind, DecodeError, DecodeErrors, Path, PathSegment};
pub use options::{DecodeOptions, ErrorStrategy};
pub use primitives::{any, boolean, integer, literal, null, number, string};
pub use shape::Shape;
pub use untrusted::Untrusted;
