//! Parsing raw payloads into untrusted values and decoding them.
//!
//! The `parse_*` functions never return a caller-chosen type: their only
//! output is an [`Untrusted`], so every typed value has passed a decoder.

use std::io::Read;

use shapeguard_core::{DecodeErrors, DecodeOptions, Decoder, Untrusted};

/// Errors at the boundary: the payload was not JSON, or was JSON of the
/// wrong shape.
#[derive(Debug, thiserror::Error)]
pub enum BoundaryError {
    /// Malformed JSON, or an I/O failure while reading the payload.
    #[error("malformed payload: {0}")]
    Parse(#[from] serde_json::Error),
    /// Well-formed JSON that does not match the decoder's shape.
    #[error("unexpected payload shape: {0}")]
    Shape(#[from] DecodeErrors),
}

impl BoundaryError {
    /// The shape mismatches, if that is what went wrong.
    pub fn decode_errors(&self) -> Option<&DecodeErrors> {
        match self {
            BoundaryError::Shape(errors) => Some(errors),
            BoundaryError::Parse(_) => None,
        }
    }
}

pub fn parse_str(text: &str) -> Result<Untrusted, serde_json::Error> {
    serde_json::from_str(text)
}

pub fn parse_slice(bytes: &[u8]) -> Result<Untrusted, serde_json::Error> {
    serde_json::from_slice(bytes)
}

/// Reads one JSON document from `reader`. Read errors surface as
/// `serde_json::Error` with an I/O category.
pub fn parse_reader<R: Read>(reader: R) -> Result<Untrusted, serde_json::Error> {
    serde_json::from_reader(reader)
}

/// Decodes payloads with a fixed set of options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Boundary {
    options: DecodeOptions,
}

impl Boundary {
    pub fn new(options: DecodeOptions) -> Self {
        Boundary { options }
    }

    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// Decodes an already-parsed payload.
    pub fn decode<D>(&self, decoder: &D, payload: &Untrusted) -> Result<D::Output, BoundaryError>
    where
        D: Decoder + ?Sized,
    {
        match decoder.decode_with(payload, &self.options) {
            Ok(out) => {
                tracing::trace!(kind = payload.kind(), "payload accepted");
                Ok(out)
            }
            Err(errors) => {
                let first = errors.first();
                tracing::debug!(
                    errors = errors.len(),
                    path = %first.path,
                    expected = %first.expected,
                    found = %first.found,
                    "payload rejected"
                );
                Err(BoundaryError::Shape(errors))
            }
        }
    }

    pub fn decode_str<D>(&self, decoder: &D, text: &str) -> Result<D::Output, BoundaryError>
    where
        D: Decoder + ?Sized,
    {
        let payload = parse_str(text).map_err(malformed)?;
        self.decode(decoder, &payload)
    }

    pub fn decode_slice<D>(&self, decoder: &D, bytes: &[u8]) -> Result<D::Output, BoundaryError>
    where
        D: Decoder + ?Sized,
    {
        let payload = parse_slice(bytes).map_err(malformed)?;
        self.decode(decoder, &payload)
    }

    pub fn decode_reader<D, R>(&self, decoder: &D, reader: R) -> Result<D::Output, BoundaryError>
    where
        D: Decoder + ?Sized,
        R: Read,
    {
        let payload = parse_reader(reader).map_err(malformed)?;
        self.decode(decoder, &payload)
    }
}

/// Parses and decodes `text`, stopping at the first mismatch.
pub fn decode_str<D>(decoder: &D, text: &str) -> Result<D::Output, BoundaryError>
where
    D: Decoder + ?Sized,
{
    Boundary::default().decode_str(decoder, text)
}

pub fn decode_slice<D>(decoder: &D, bytes: &[u8]) -> Result<D::Output, BoundaryError>
where
    D: Decoder + ?Sized,
{
    Boundary::default().decode_slice(decoder, bytes)
}

pub fn decode_reader<D, R>(decoder: &D, reader: R) -> Result<D::Output, BoundaryError>
where
    D: Decoder + ?Sized,
    R: Read,
{
    Boundary::default().decode_reader(decoder, reader)
}

fn malformed(err: serde_json::Error) -> BoundaryError {
    tracing::warn!(
        line = err.line(),
        column = err.column(),
        category = ?err.classify(),
        "payload is not valid JSON"
    );
    BoundaryError::Parse(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shapeguard_core::{field, integer, object, string};

    #[test]
    fn parse_str_yields_untrusted() {
        let payload = parse_str(r#"{"id": 1}"#).unwrap();
        assert_eq!(payload.kind(), "object");
        assert_eq!(payload, Untrusted::new(json!({"id": 1})));
    }

    #[test]
    fn parse_slice_rejects_truncated_json() {
        assert!(parse_slice(br#"{"id": "#).is_err());
    }

    #[test]
    fn decode_str_reports_parse_error() {
        let err = decode_str(&string(), "not json").unwrap_err();
        assert!(matches!(err, BoundaryError::Parse(_)));
        assert!(err.decode_errors().is_none());
        assert!(err.to_string().starts_with("malformed payload:"));
    }

    #[test]
    fn decode_str_reports_shape_error() {
        let decoder = object(field("id", integer()));
        let err = decode_str(&decoder, r#"{"id": "7"}"#).unwrap_err();
        let errors = err.decode_errors().unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.first().path.to_string(), "id");
        assert_eq!(
            err.to_string(),
            "unexpected payload shape: at id: expected integer, found string"
        );
    }

    #[test]
    fn boundary_uses_configured_strategy() {
        let decoder = object((field("a", string()), field("b", string())));
        let boundary = Boundary::new(DecodeOptions::accumulate());
        let err = boundary.decode_str(&decoder, r#"{"a": 1}"#).unwrap_err();
        assert_eq!(err.decode_errors().unwrap().len(), 2);

        let err = decode_str(&decoder, r#"{"a": 1}"#).unwrap_err();
        assert_eq!(err.decode_errors().unwrap().len(), 1);
    }

    #[test]
    fn decode_reader_reads_whole_document() {
        let decoder = object(field("name", string()));
        let reader = std::io::Cursor::new(br#"{"name": "Ada"}"#.to_vec());
        assert_eq!(decode_reader(&decoder, reader).unwrap(), "Ada");
    }

    #[test]
    fn decode_through_trait_object() {
        let decoder: shapeguard_core::BoxDecoder<String> = string().boxed();
        assert_eq!(decode_slice(&*decoder, br#""x""#).unwrap(), "x");
    }
}
