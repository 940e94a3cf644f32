//! shapeguard-interchange: the I/O boundary for untrusted JSON.
//!
//! Raw payloads (files, sockets, HTTP response bodies) become
//! [`Untrusted`](shapeguard_core::Untrusted) values here and nowhere else.
//! Callers either keep the untrusted value and decode it later, or use the
//! one-call `decode_*` helpers that parse and decode together. Application
//! code past this point only ever sees decoder outputs.
//!
//! Decode options come from a [`Boundary`], which can be loaded from a TOML
//! config file; the free functions use the defaults (fail-fast).

pub mod config;
pub mod deserialize;

pub use config::{read_config, BoundaryConfig, ConfigError};
pub use deserialize::{
    decode_reader, decode_slice, decode_str, parse_reader, parse_slice, parse_str, Boundary,
    BoundaryError,
};
