//! Decode configuration.

use serde::{Deserialize, Serialize};

/// What a decoder does after the first mismatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorStrategy {
    /// Stop at the first failing field or element.
    #[default]
    FailFast,
    /// Keep going and report every mismatch in document order.
    Accumulate,
}

/// Options for [`Decoder::decode_with`](crate::Decoder::decode_with).
///
/// Deserializable so embedding applications can keep it in their config
/// files; missing keys fall back to the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeOptions {
    pub strategy: ErrorStrategy,
    /// Upper bound on collected errors under [`ErrorStrategy::Accumulate`].
    /// A failed decode always reports at least one error, so `Some(0)`
    /// behaves like `Some(1)`. `None` means unbounded.
    pub max_errors: Option<usize>,
}

impl DecodeOptions {
    pub const FAIL_FAST: DecodeOptions = DecodeOptions {
        strategy: ErrorStrategy::FailFast,
        max_errors: None,
    };

    pub fn accumulate() -> Self {
        DecodeOptions {
            strategy: ErrorStrategy::Accumulate,
            max_errors: None,
        }
    }

    pub fn with_max_errors(mut self, max_errors: usize) -> Self {
        self.max_errors = Some(max_errors);
        self
    }
}
