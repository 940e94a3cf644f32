//! The [`Decoder`] trait and the decoding context it runs in.
//!
//! A decoder is a shape description plus a function from an untrusted JSON
//! value to a typed output. Decoders only confirm; they never coerce the
//! underlying data. Every failure is recorded in the [`Context`] as a
//! [`DecodeError`] and signalled to the caller with [`Halt`], so nothing is
//! thrown and no partial result escapes.

use serde_json::Value;

use crate::error::{json_kind, DecodeError, DecodeErrors, Path, PathSegment, MISSING};
use crate::options::{DecodeOptions, ErrorStrategy};
use crate::shape::Shape;
use crate::untrusted::Untrusted;

static FAIL_FAST: DecodeOptions = DecodeOptions::FAIL_FAST;

/// Marker returned when decoding failed.
///
/// The details live in the [`Context`] that produced it. Only a context can
/// create one, which keeps every failure paired with a recorded error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Halt(());

/// Mutable state of one decode call: the current path, the errors found so
/// far and the options in force.
#[derive(Debug)]
pub struct Context<'o> {
    path: Path,
    errors: Vec<DecodeError>,
    options: &'o DecodeOptions,
}

impl<'o> Context<'o> {
    pub(crate) fn new(options: &'o DecodeOptions) -> Self {
        Context {
            path: Path::root(),
            errors: Vec::new(),
            options,
        }
    }

    /// Path of the value currently being decoded.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Records that `found` does not match the shape named `expected`.
    pub fn mismatch(&mut self, expected: impl Into<String>, found: &Value) -> Halt {
        self.record(expected.into(), json_kind(found).to_string())
    }

    /// Records that a required key is absent.
    pub fn missing(&mut self, expected: impl Into<String>) -> Halt {
        self.record(expected.into(), MISSING.to_string())
    }

    fn record(&mut self, expected: String, found: String) -> Halt {
        self.errors.push(DecodeError {
            path: self.path.clone(),
            expected,
            found,
        });
        Halt(())
    }

    /// Whether composite decoders should continue past a failed child.
    pub fn keep_going(&self) -> bool {
        match self.options.strategy {
            ErrorStrategy::FailFast => false,
            ErrorStrategy::Accumulate => self
                .options
                .max_errors
                .map_or(true, |max| self.errors.len() < max),
        }
    }

    /// Runs `f` with the path extended by an object key.
    pub fn at_key<T>(&mut self, key: &str, f: impl FnOnce(&mut Self) -> T) -> T {
        self.path.push(PathSegment::Key(key.to_string()));
        let out = f(self);
        self.path.pop();
        out
    }

    /// Runs `f` with the path extended by an array index.
    pub fn at_index<T>(&mut self, index: usize, f: impl FnOnce(&mut Self) -> T) -> T {
        self.path.push(PathSegment::Index(index));
        let out = f(self);
        self.path.pop();
        out
    }

    /// Runs `f` in a scratch fail-fast context at the current path and
    /// discards whatever it records. Used to try alternatives.
    pub fn attempt<T>(&self, f: impl FnOnce(&mut Context<'_>) -> Result<T, Halt>) -> Option<T> {
        let mut scratch = Context {
            path: self.path.clone(),
            errors: Vec::new(),
            options: &FAIL_FAST,
        };
        f(&mut scratch).ok()
    }

    fn finish<T>(
        mut self,
        result: Result<T, Halt>,
        root: &Value,
        shape: impl FnOnce() -> Shape,
    ) -> Result<T, DecodeErrors> {
        match result {
            Ok(out) => Ok(out),
            Err(_) => {
                if self.errors.is_empty() {
                    self.errors.push(DecodeError::new(
                        Path::root(),
                        shape().name(),
                        json_kind(root),
                    ));
                }
                Err(DecodeErrors::new(self.errors))
            }
        }
    }
}

/// Validates an untrusted value against a declared shape and re-types it.
///
/// Implementors provide [`shape`](Decoder::shape) and
/// [`decode_in`](Decoder::decode_in); everything callers use is provided on
/// top of those.
pub trait Decoder {
    type Output;

    /// Description of the values this decoder accepts.
    fn shape(&self) -> Shape;

    /// Decodes `value` at the context's current path.
    fn decode_in(&self, value: &Value, cx: &mut Context<'_>) -> Result<Self::Output, Halt>;

    /// Called by object decoders when this decoder's key is absent.
    /// Absence is a mismatch unless the decoder accepts it.
    fn decode_absent(&self, cx: &mut Context<'_>) -> Result<Self::Output, Halt> {
        Err(cx.missing(self.shape().name()))
    }

    /// Decodes `value`, stopping at the first mismatch.
    fn decode(&self, value: &Untrusted) -> Result<Self::Output, DecodeError> {
        self.decode_with(value, &FAIL_FAST)
            .map_err(DecodeErrors::into_first)
    }

    /// Decodes `value` under the given error strategy.
    fn decode_with(
        &self,
        value: &Untrusted,
        options: &DecodeOptions,
    ) -> Result<Self::Output, DecodeErrors> {
        let mut cx = Context::new(options);
        let result = self.decode_in(value.as_json(), &mut cx);
        cx.finish(result, value.as_json(), || self.shape())
    }

    /// True iff `value` matches the declared shape.
    fn is(&self, value: &Untrusted) -> bool {
        let mut cx = Context::new(&FAIL_FAST);
        self.decode_in(value.as_json(), &mut cx).is_ok()
    }

    /// Converts the decoded output, e.g. a tuple of fields into a struct.
    fn map<U, F>(self, f: F) -> Map<Self, F>
    where
        Self: Sized,
        F: Fn(Self::Output) -> U,
    {
        Map { inner: self, f }
    }

    /// Adds a constraint on the decoded output. Values failing `predicate`
    /// are reported with `description` as the expected shape.
    fn ensure<F>(self, description: impl Into<String>, predicate: F) -> Ensure<Self, F>
    where
        Self: Sized,
        F: Fn(&Self::Output) -> bool,
    {
        Ensure {
            inner: self,
            description: description.into(),
            predicate,
        }
    }

    fn boxed(self) -> BoxDecoder<Self::Output>
    where
        Self: Sized + Send + Sync + 'static,
    {
        Box::new(self)
    }
}

/// A type-erased decoder.
pub type BoxDecoder<T> = Box<dyn Decoder<Output = T> + Send + Sync>;

impl<D: Decoder + ?Sized> Decoder for &D {
    type Output = D::Output;

    fn shape(&self) -> Shape {
        (**self).shape()
    }

    fn decode_in(&self, value: &Value, cx: &mut Context<'_>) -> Result<Self::Output, Halt> {
        (**self).decode_in(value, cx)
    }

    fn decode_absent(&self, cx: &mut Context<'_>) -> Result<Self::Output, Halt> {
        (**self).decode_absent(cx)
    }
}

impl<D: Decoder + ?Sized> Decoder for Box<D> {
    type Output = D::Output;

    fn shape(&self) -> Shape {
        (**self).shape()
    }

    fn decode_in(&self, value: &Value, cx: &mut Context<'_>) -> Result<Self::Output, Halt> {
        (**self).decode_in(value, cx)
    }

    fn decode_absent(&self, cx: &mut Context<'_>) -> Result<Self::Output, Halt> {
        (**self).decode_absent(cx)
    }
}

/// Decoder returned by [`Decoder::map`].
#[derive(Debug, Clone)]
pub struct Map<D, F> {
    inner: D,
    f: F,
}

impl<D, F, U> Decoder for Map<D, F>
where
    D: Decoder,
    F: Fn(D::Output) -> U,
{
    type Output = U;

    fn shape(&self) -> Shape {
        self.inner.shape()
    }

    fn decode_in(&self, value: &Value, cx: &mut Context<'_>) -> Result<U, Halt> {
        self.inner.decode_in(value, cx).map(&self.f)
    }

    fn decode_absent(&self, cx: &mut Context<'_>) -> Result<U, Halt> {
        self.inner.decode_absent(cx).map(&self.f)
    }
}

/// Decoder returned by [`Decoder::ensure`].
#[derive(Debug, Clone)]
pub struct Ensure<D, F> {
    inner: D,
    description: String,
    predicate: F,
}

impl<D, F> Decoder for Ensure<D, F>
where
    D: Decoder,
    F: Fn(&D::Output) -> bool,
{
    type Output = D::Output;

    fn shape(&self) -> Shape {
        Shape::Refined {
            base: Box::new(self.inner.shape()),
            description: self.description.clone(),
        }
    }

    fn decode_in(&self, value: &Value, cx: &mut Context<'_>) -> Result<D::Output, Halt> {
        let out = self.inner.decode_in(value, cx)?;
        if (self.predicate)(&out) {
            Ok(out)
        } else {
            Err(cx.mismatch(self.description.clone(), value))
        }
    }

    fn decode_absent(&self, cx: &mut Context<'_>) -> Result<D::Output, Halt> {
        let out = self.inner.decode_absent(cx)?;
        if (self.predicate)(&out) {
            Ok(out)
        } else {
            Err(cx.missing(self.description.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{field, integer, object, string};
    use serde_json::json;

    #[test]
    fn map_builds_domain_type() {
        #[derive(Debug, PartialEq)]
        struct User {
            name: String,
            age: i64,
        }
        let decoder = object((field("name", string()), field("age", integer())))
            .map(|(name, age)| User { name, age });
        let user = decoder
            .decode(&Untrusted::new(json!({"name": "Ada", "age": 36})))
            .unwrap();
        assert_eq!(
            user,
            User {
                name: "Ada".to_string(),
                age: 36
            }
        );
    }

    #[test]
    fn ensure_reports_description() {
        let decoder = string().ensure("non-empty string", |s| !s.is_empty());
        assert!(decoder.is(&Untrusted::new(json!("x"))));

        let err = decoder.decode(&Untrusted::new(json!(""))).unwrap_err();
        assert!(err.path.is_root());
        assert_eq!(err.expected, "non-empty string");
        assert_eq!(err.found, "string");
    }

    #[test]
    fn ensure_does_not_run_on_wrong_kind() {
        let decoder = integer().ensure("positive integer", |n| *n > 0);
        let err = decoder.decode(&Untrusted::new(json!("7"))).unwrap_err();
        assert_eq!(err.expected, "integer");
    }

    #[test]
    fn boxed_decoder_keeps_behavior() {
        let decoder: BoxDecoder<String> = string().boxed();
        assert_eq!(
            decoder.decode(&Untrusted::new(json!("a"))).unwrap(),
            "a".to_string()
        );
        assert!(!decoder.is(&Untrusted::new(json!(1))));
    }

    #[test]
    fn decoder_by_reference() {
        let decoder = string();
        let by_ref = &decoder;
        assert!(by_ref.is(&Untrusted::new(json!("a"))));
    }

    #[test]
    fn keep_going_respects_max_errors() {
        let options = DecodeOptions::accumulate().with_max_errors(1);
        let mut cx = Context::new(&options);
        assert!(cx.keep_going());
        let _ = cx.missing("string");
        assert!(!cx.keep_going());
    }

    #[test]
    fn attempt_discards_errors() {
        let mut cx = Context::new(&FAIL_FAST);
        let got = cx.at_key("a", |cx| {
            assert_eq!(cx.path().to_string(), "a");
            cx.attempt(|scratch| Err::<(), _>(scratch.missing("string")))
        });
        assert!(got.is_none());
        assert!(cx.path().is_root());
        assert!(cx.errors.is_empty());
    }
}
