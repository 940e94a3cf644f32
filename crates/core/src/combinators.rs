//! Composite decoders: objects, arrays, optionals, records and
//! alternatives.
//!
//! Composites visit children in declaration order (object fields) or
//! document order (array elements, record entries). Under fail-fast they
//! stop at the first failing child; under accumulate they keep visiting
//! while the context allows and fail if any child failed.

use std::collections::BTreeMap;

use serde_json::{Map as JsonMap, Value};

use crate::decoder::{BoxDecoder, Context, Decoder, Halt};
use crate::shape::Shape;

// ── Object ──────────────────────────────────────────────────────────

/// A named field of an object decoder.
#[derive(Debug, Clone)]
pub struct Field<D> {
    name: String,
    decoder: D,
}

pub fn field<D: Decoder>(name: impl Into<String>, decoder: D) -> Field<D> {
    Field {
        name: name.into(),
        decoder,
    }
}

impl<D: Decoder> Field<D> {
    pub fn name(&self) -> &str {
        &self.name
    }

    fn decode_from(
        &self,
        obj: &JsonMap<String, Value>,
        cx: &mut Context<'_>,
    ) -> Result<D::Output, Halt> {
        cx.at_key(&self.name, |cx| match obj.get(&self.name) {
            Some(value) => self.decoder.decode_in(value, cx),
            None => self.decoder.decode_absent(cx),
        })
    }
}

/// A set of fields an [`Object`] decodes.
///
/// Implemented for a single [`Field`], tuples of up to twelve fields
/// (output is the tuple of field outputs), and `Vec<Field<D>>` (output is a
/// map keyed by field name).
pub trait Fields {
    type Output;

    fn shapes(&self) -> Vec<(String, Shape)>;

    fn decode_fields(
        &self,
        obj: &JsonMap<String, Value>,
        cx: &mut Context<'_>,
    ) -> Result<Self::Output, Halt>;
}

impl<D: Decoder> Fields for Field<D> {
    type Output = D::Output;

    fn shapes(&self) -> Vec<(String, Shape)> {
        vec![(self.name.clone(), self.decoder.shape())]
    }

    fn decode_fields(
        &self,
        obj: &JsonMap<String, Value>,
        cx: &mut Context<'_>,
    ) -> Result<D::Output, Halt> {
        self.decode_from(obj, cx)
    }
}

impl<D: Decoder> Fields for Vec<Field<D>> {
    type Output = BTreeMap<String, D::Output>;

    fn shapes(&self) -> Vec<(String, Shape)> {
        self.iter()
            .map(|f| (f.name.clone(), f.decoder.shape()))
            .collect()
    }

    fn decode_fields(
        &self,
        obj: &JsonMap<String, Value>,
        cx: &mut Context<'_>,
    ) -> Result<Self::Output, Halt> {
        let mut out = BTreeMap::new();
        let mut outcome = Ok(());
        for f in self {
            match f.decode_from(obj, cx) {
                Ok(value) => {
                    out.insert(f.name.clone(), value);
                }
                Err(halt) => {
                    outcome = Err(halt);
                    if !cx.keep_going() {
                        break;
                    }
                }
            }
        }
        outcome.map(|()| out)
    }
}

macro_rules! impl_fields_for_tuple {
    ($($ty:ident $var:ident $idx:tt),+) => {
        impl<$($ty: Decoder),+> Fields for ($(Field<$ty>,)+) {
            type Output = ($($ty::Output,)+);

            fn shapes(&self) -> Vec<(String, Shape)> {
                vec![$((self.$idx.name.clone(), self.$idx.decoder.shape())),+]
            }

            fn decode_fields(
                &self,
                obj: &JsonMap<String, Value>,
                cx: &mut Context<'_>,
            ) -> Result<Self::Output, Halt> {
                $(
                    let $var = self.$idx.decode_from(obj, cx);
                    if let Err(halt) = &$var {
                        if !cx.keep_going() {
                            return Err(*halt);
                        }
                    }
                )+
                Ok(($($var?,)+))
            }
        }
    };
}

impl_fields_for_tuple!(A a 0);
impl_fields_for_tuple!(A a 0, B b 1);
impl_fields_for_tuple!(A a 0, B b 1, C c 2);
impl_fields_for_tuple!(A a 0, B b 1, C c 2, D d 3);
impl_fields_for_tuple!(A a 0, B b 1, C c 2, D d 3, E e 4);
impl_fields_for_tuple!(A a 0, B b 1, C c 2, D d 3, E e 4, F f 5);
impl_fields_for_tuple!(A a 0, B b 1, C c 2, D d 3, E e 4, F f 5, G g 6);
impl_fields_for_tuple!(A a 0, B b 1, C c 2, D d 3, E e 4, F f 5, G g 6, H h 7);
impl_fields_for_tuple!(A a 0, B b 1, C c 2, D d 3, E e 4, F f 5, G g 6, H h 7, I i 8);
impl_fields_for_tuple!(A a 0, B b 1, C c 2, D d 3, E e 4, F f 5, G g 6, H h 7, I i 8, J j 9);
impl_fields_for_tuple!(A a 0, B b 1, C c 2, D d 3, E e 4, F f 5, G g 6, H h 7, I i 8, J j 9, K k 10);
impl_fields_for_tuple!(A a 0, B b 1, C c 2, D d 3, E e 4, F f 5, G g 6, H h 7, I i 8, J j 9, K k 10, L l 11);

/// Accepts JSON objects whose named fields all decode. Extra keys are
/// ignored.
#[derive(Debug, Clone)]
pub struct Object<F> {
    fields: F,
}

pub fn object<F: Fields>(fields: F) -> Object<F> {
    Object { fields }
}

impl<F: Fields> Decoder for Object<F> {
    type Output = F::Output;

    fn shape(&self) -> Shape {
        Shape::Object(self.fields.shapes())
    }

    fn decode_in(&self, value: &Value, cx: &mut Context<'_>) -> Result<F::Output, Halt> {
        match value {
            Value::Object(obj) => self.fields.decode_fields(obj, cx),
            other => Err(cx.mismatch("object", other)),
        }
    }
}

// ── Array ───────────────────────────────────────────────────────────

/// Accepts JSON arrays whose elements all decode, preserving order.
#[derive(Debug, Clone)]
pub struct Array<D> {
    element: D,
}

pub fn array<D: Decoder>(element: D) -> Array<D> {
    Array { element }
}

impl<D: Decoder> Decoder for Array<D> {
    type Output = Vec<D::Output>;

    fn shape(&self) -> Shape {
        Shape::Array(Box::new(self.element.shape()))
    }

    fn decode_in(&self, value: &Value, cx: &mut Context<'_>) -> Result<Self::Output, Halt> {
        let Value::Array(items) = value else {
            return Err(cx.mismatch("array", value));
        };
        let mut out = Vec::with_capacity(items.len());
        let mut outcome = Ok(());
        for (i, item) in items.iter().enumerate() {
            match cx.at_index(i, |cx| self.element.decode_in(item, cx)) {
                Ok(decoded) => out.push(decoded),
                Err(halt) => {
                    outcome = Err(halt);
                    if !cx.keep_going() {
                        break;
                    }
                }
            }
        }
        outcome.map(|()| out)
    }
}

// ── Optional ────────────────────────────────────────────────────────

/// Accepts `null`, an absent key, or whatever `inner` accepts.
#[derive(Debug, Clone)]
pub struct Optional<D> {
    inner: D,
}

pub fn optional<D: Decoder>(inner: D) -> Optional<D> {
    Optional { inner }
}

impl<D: Decoder> Decoder for Optional<D> {
    type Output = Option<D::Output>;

    fn shape(&self) -> Shape {
        Shape::Optional(Box::new(self.inner.shape()))
    }

    fn decode_in(&self, value: &Value, cx: &mut Context<'_>) -> Result<Self::Output, Halt> {
        if value.is_null() {
            return Ok(None);
        }
        self.inner.decode_in(value, cx).map(Some)
    }

    fn decode_absent(&self, _cx: &mut Context<'_>) -> Result<Self::Output, Halt> {
        Ok(None)
    }
}

// ── Record ──────────────────────────────────────────────────────────

/// Accepts JSON objects with arbitrary keys whose values all decode.
#[derive(Debug, Clone)]
pub struct Record<D> {
    values: D,
}

pub fn record<D: Decoder>(values: D) -> Record<D> {
    Record { values }
}

impl<D: Decoder> Decoder for Record<D> {
    type Output = BTreeMap<String, D::Output>;

    fn shape(&self) -> Shape {
        Shape::Record(Box::new(self.values.shape()))
    }

    fn decode_in(&self, value: &Value, cx: &mut Context<'_>) -> Result<Self::Output, Halt> {
        let Value::Object(obj) = value else {
            return Err(cx.mismatch("object", value));
        };
        let mut out = BTreeMap::new();
        let mut outcome = Ok(());
        for (key, v) in obj {
            match cx.at_key(key, |cx| self.values.decode_in(v, cx)) {
                Ok(decoded) => {
                    out.insert(key.clone(), decoded);
                }
                Err(halt) => {
                    outcome = Err(halt);
                    if !cx.keep_going() {
                        break;
                    }
                }
            }
        }
        outcome.map(|()| out)
    }
}

// ── OneOf ───────────────────────────────────────────────────────────

/// Tries alternatives in order and keeps the first that decodes.
pub struct OneOf<T> {
    alternatives: Vec<BoxDecoder<T>>,
}

pub fn one_of<T>(alternatives: Vec<BoxDecoder<T>>) -> OneOf<T> {
    OneOf { alternatives }
}

impl<T> Decoder for OneOf<T> {
    type Output = T;

    fn shape(&self) -> Shape {
        Shape::OneOf(self.alternatives.iter().map(|d| d.shape()).collect())
    }

    fn decode_in(&self, value: &Value, cx: &mut Context<'_>) -> Result<T, Halt> {
        for alternative in &self.alternatives {
            if let Some(out) = cx.attempt(|scratch| alternative.decode_in(value, scratch)) {
                return Ok(out);
            }
        }
        Err(cx.mismatch(self.shape().name(), value))
    }
}
