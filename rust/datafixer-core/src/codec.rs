//! [`Codec`] — reversible transformers between an application type `A` and a
//! `Dynamic<T>`, for any format `T`.
//!
//! A `Codec` is parameterized over `(A, T, O)` rather than having generic
//! methods, so that codecs compose as ordinary trait objects
//! (`Box<dyn Codec<A, T, O>>`) once a concrete format is chosen — the
//! alternative (generic `encode`/`decode` methods) cannot be made into trait
//! objects in Rust, and `dispatched` below needs exactly that. Every codec
//! provided here is still written generically over `T`/`O`: nothing is
//! hardcoded to one format.
//!
//! Grounded on the request/response validation shape of a runtime's JSON
//! tool provider (`get`/`set`/`merge` driving record-like field access) and
//! on `spec.md` §4.D.

use crate::result::DataResult;
use crate::value::{DynamicOps, Number};
use std::fmt;
use std::marker::PhantomData;

/// A reversible transformer between `A` and a `Dynamic<T>`.
pub trait Codec<A, T, O>
where
    T: Clone + fmt::Debug,
    O: DynamicOps<T>,
{
    /// Merge the encoded representation of `value` into `prefix`.
    fn encode(&self, value: &A, ops: O, prefix: T) -> DataResult<T>;

    /// Decode `value`, returning the decoded value and the remainder of
    /// `value` not consumed by this codec.
    fn decode(&self, ops: O, value: T) -> DataResult<(A, T)>;
}

impl<'a, A, T, O, C> Codec<A, T, O> for &'a C
where
    C: Codec<A, T, O> + ?Sized,
    T: Clone + fmt::Debug,
    O: DynamicOps<T>,
{
    fn encode(&self, value: &A, ops: O, prefix: T) -> DataResult<T> {
        (**self).encode(value, ops, prefix)
    }

    fn decode(&self, ops: O, value: T) -> DataResult<(A, T)> {
        (**self).decode(ops, value)
    }
}

// ---------------------------------------------------------------------------
// Primitive codecs
// ---------------------------------------------------------------------------

/// `A` ↔ string leaf.
pub struct StringCodec;

impl<T, O> Codec<String, T, O> for StringCodec
where
    T: Clone + fmt::Debug,
    O: DynamicOps<T>,
{
    fn encode(&self, value: &String, ops: O, _prefix: T) -> DataResult<T> {
        DataResult::success(ops.create_string(value))
    }

    fn decode(&self, ops: O, value: T) -> DataResult<(String, T)> {
        ops.get_string_value(&value).map(|s| (s, ops.empty()))
    }
}

/// `A` ↔ boolean leaf.
pub struct BoolCodec;

impl<T, O> Codec<bool, T, O> for BoolCodec
where
    T: Clone + fmt::Debug,
    O: DynamicOps<T>,
{
    fn encode(&self, value: &bool, ops: O, _prefix: T) -> DataResult<T> {
        DataResult::success(ops.create_boolean(*value))
    }

    fn decode(&self, ops: O, value: T) -> DataResult<(bool, T)> {
        ops.get_boolean_value(&value).map(|b| (b, ops.empty()))
    }
}

/// `()` ↔ anything; always succeeds, produces `ops.empty()` on encode.
pub struct UnitCodec;

impl<T, O> Codec<(), T, O> for UnitCodec
where
    T: Clone + fmt::Debug,
    O: DynamicOps<T>,
{
    fn encode(&self, _value: &(), ops: O, _prefix: T) -> DataResult<T> {
        DataResult::success(ops.empty())
    }

    fn decode(&self, ops: O, _value: T) -> DataResult<((), T)> {
        DataResult::success(((), ops.empty()))
    }
}

macro_rules! numeric_codec {
    ($codec:ident, $rust_ty:ty, $kind:literal, $variant:ident, $fits:ident) => {
        #[doc = concat!("`", stringify!($rust_ty), "` ↔ number leaf.")]
        pub struct $codec;

        impl<T, O> Codec<$rust_ty, T, O> for $codec
        where
            T: Clone + fmt::Debug,
            O: DynamicOps<T>,
        {
            fn encode(&self, value: &$rust_ty, ops: O, _prefix: T) -> DataResult<T> {
                DataResult::success(ops.create_numeric(Number::$variant(*value)))
            }

            fn decode(&self, ops: O, value: T) -> DataResult<($rust_ty, T)> {
                ops.get_number_value(&value).flat_map(|n| {
                    if n.$fits() {
                        DataResult::success((n.as_i64() as $rust_ty, ops.empty()))
                    } else {
                        DataResult::error(format!(
                            concat!("Value out of ", $kind, " range: {}"),
                            n
                        ))
                    }
                })
            }
        }
    };
}

numeric_codec!(ByteCodec, i8, "byte", Byte, fits_i8);
numeric_codec!(ShortCodec, i16, "short", Short, fits_i16);
numeric_codec!(IntCodec, i32, "int", Int, fits_i32);

/// `i64` ↔ number leaf. No range check: every format's widest integer kind
/// fits in `i64`.
pub struct LongCodec;

impl<T, O> Codec<i64, T, O> for LongCodec
where
    T: Clone + fmt::Debug,
    O: DynamicOps<T>,
{
    fn encode(&self, value: &i64, ops: O, _prefix: T) -> DataResult<T> {
        DataResult::success(ops.create_long(*value))
    }

    fn decode(&self, ops: O, value: T) -> DataResult<(i64, T)> {
        ops.get_number_value(&value).map(|n| (n.as_i64(), ops.empty()))
    }
}

/// `f32` ↔ number leaf.
pub struct FloatCodec;

impl<T, O> Codec<f32, T, O> for FloatCodec
where
    T: Clone + fmt::Debug,
    O: DynamicOps<T>,
{
    fn encode(&self, value: &f32, ops: O, _prefix: T) -> DataResult<T> {
        DataResult::success(ops.create_float(*value))
    }

    fn decode(&self, ops: O, value: T) -> DataResult<(f32, T)> {
        ops.get_number_value(&value).map(|n| (n.as_f64() as f32, ops.empty()))
    }
}

/// `f64` ↔ number leaf.
pub struct DoubleCodec;

impl<T, O> Codec<f64, T, O> for DoubleCodec
where
    T: Clone + fmt::Debug,
    O: DynamicOps<T>,
{
    fn encode(&self, value: &f64, ops: O, _prefix: T) -> DataResult<T> {
        DataResult::success(ops.create_double(*value))
    }

    fn decode(&self, ops: O, value: T) -> DataResult<(f64, T)> {
        ops.get_number_value(&value).map(|n| (n.as_f64(), ops.empty()))
    }
}

// ---------------------------------------------------------------------------
// xmap / flatXmap
// ---------------------------------------------------------------------------

/// A lossless bijection layered on top of an inner codec.
pub struct XmapCodec<C, A, B> {
    inner: C,
    to: Box<dyn Fn(A) -> B + Send + Sync>,
    from: Box<dyn Fn(&B) -> A + Send + Sync>,
    _marker: PhantomData<(A, B)>,
}

impl<C, A, B> XmapCodec<C, A, B> {
    pub fn new(
        inner: C,
        to: impl Fn(A) -> B + Send + Sync + 'static,
        from: impl Fn(&B) -> A + Send + Sync + 'static,
    ) -> Self {
        Self {
            inner,
            to: Box::new(to),
            from: Box::new(from),
            _marker: PhantomData,
        }
    }
}

impl<C, A, B, T, O> Codec<B, T, O> for XmapCodec<C, A, B>
where
    C: Codec<A, T, O>,
    T: Clone + fmt::Debug,
    O: DynamicOps<T>,
{
    fn encode(&self, value: &B, ops: O, prefix: T) -> DataResult<T> {
        let a = (self.from)(value);
        self.inner.encode(&a, ops, prefix)
    }

    fn decode(&self, ops: O, value: T) -> DataResult<(B, T)> {
        self.inner.decode(ops, value).map(|(a, rest)| ((self.to)(a), rest))
    }
}

/// A partial bijection: both directions may fail.
pub struct FlatXmapCodec<C, A, B> {
    inner: C,
    to: Box<dyn Fn(A) -> DataResult<B> + Send + Sync>,
    from: Box<dyn Fn(&B) -> DataResult<A> + Send + Sync>,
    _marker: PhantomData<(A, B)>,
}

impl<C, A, B> FlatXmapCodec<C, A, B> {
    pub fn new(
        inner: C,
        to: impl Fn(A) -> DataResult<B> + Send + Sync + 'static,
        from: impl Fn(&B) -> DataResult<A> + Send + Sync + 'static,
    ) -> Self {
        Self {
            inner,
            to: Box::new(to),
            from: Box::new(from),
            _marker: PhantomData,
        }
    }
}

impl<C, A, B, T, O> Codec<B, T, O> for FlatXmapCodec<C, A, B>
where
    C: Codec<A, T, O>,
    T: Clone + fmt::Debug,
    O: DynamicOps<T>,
{
    fn encode(&self, value: &B, ops: O, prefix: T) -> DataResult<T> {
        match (self.from)(value) {
            DataResult::Success(a) => self.inner.encode(&a, ops, prefix),
            DataResult::Error { message, .. } => DataResult::error(message),
        }
    }

    fn decode(&self, ops: O, value: T) -> DataResult<(B, T)> {
        match self.inner.decode(ops, value) {
            DataResult::Success((a, rest)) => match (self.to)(a) {
                DataResult::Success(b) => DataResult::success((b, rest)),
                DataResult::Error { message, .. } => DataResult::error(message),
            },
            DataResult::Error { message, .. } => DataResult::error(message),
        }
    }
}

// ---------------------------------------------------------------------------
// listOf
// ---------------------------------------------------------------------------

/// Encodes `Vec<A>` as a list; decode short-circuits on the first element
/// error, prefixing it with `[i]:`.
pub struct ListCodec<C> {
    element: C,
}

impl<C> ListCodec<C> {
    pub fn new(element: C) -> Self {
        Self { element }
    }
}

impl<C, A, T, O> Codec<Vec<A>, T, O> for ListCodec<C>
where
    C: Codec<A, T, O>,
    T: Clone + fmt::Debug,
    O: DynamicOps<T>,
{
    fn encode(&self, value: &Vec<A>, ops: O, _prefix: T) -> DataResult<T> {
        let mut items = Vec::with_capacity(value.len());
        for item in value {
            match self.element.encode(item, ops, ops.empty()) {
                DataResult::Success(v) => items.push(v),
                DataResult::Error { message, .. } => return DataResult::error(message),
            }
        }
        DataResult::success(ops.create_list(items.into_iter()))
    }

    fn decode(&self, ops: O, value: T) -> DataResult<(Vec<A>, T)> {
        let items = match ops.get_list(&value) {
            DataResult::Success(items) => items,
            DataResult::Error { message, .. } => return DataResult::error(message),
        };
        let mut decoded = Vec::with_capacity(items.len());
        for (i, item) in items.into_iter().enumerate() {
            match self.element.decode(ops, item) {
                DataResult::Success((a, _rest)) => decoded.push(a),
                DataResult::Error { message, .. } => {
                    return DataResult::error(format!("[{i}]: {message}"))
                }
            }
        }
        DataResult::success((decoded, ops.empty()))
    }
}

// ---------------------------------------------------------------------------
// fieldOf / optionalFieldOf
// ---------------------------------------------------------------------------

/// Wraps `codec` in a single-field map; decode fails if the field is absent.
pub struct FieldCodec<C> {
    name: &'static str,
    inner: C,
}

impl<C> FieldCodec<C> {
    pub fn new(name: &'static str, inner: C) -> Self {
        Self { name, inner }
    }
}

impl<C, A, T, O> Codec<A, T, O> for FieldCodec<C>
where
    C: Codec<A, T, O>,
    T: Clone + fmt::Debug,
    O: DynamicOps<T>,
{
    fn encode(&self, value: &A, ops: O, prefix: T) -> DataResult<T> {
        let encoded = match self.inner.encode(value, ops, ops.empty()) {
            DataResult::Success(v) => v,
            DataResult::Error { message, .. } => {
                return DataResult::error(format!("{}: {message}", self.name))
            }
        };
        ops.merge_to_map(prefix, ops.create_string(self.name), encoded)
    }

    fn decode(&self, ops: O, value: T) -> DataResult<(A, T)> {
        let field_value = match ops.get(&value, self.name) {
            Some(v) => v,
            None => return DataResult::error(format!("Missing field: {}", self.name)),
        };
        match self.inner.decode(ops, field_value) {
            DataResult::Success((a, _)) => DataResult::success((a, ops.remove(value, self.name))),
            DataResult::Error { message, .. } => {
                DataResult::error(format!("{}: {message}", self.name))
            }
        }
    }
}

/// On missing field or failed inner decode, yields `default` without
/// surfacing an error (resolves the open question in `spec.md` §9 in favor
/// of the "optional spirit": decode failure on a present field also falls
/// back, it is not distinguished from absence).
pub struct OptionalFieldCodec<C, A> {
    name: &'static str,
    inner: C,
    default: A,
}

impl<C, A> OptionalFieldCodec<C, A> {
    pub fn new(name: &'static str, inner: C, default: A) -> Self {
        Self { name, inner, default }
    }
}

impl<C, A, T, O> Codec<A, T, O> for OptionalFieldCodec<C, A>
where
    C: Codec<A, T, O>,
    A: Clone + PartialEq,
    T: Clone + fmt::Debug,
    O: DynamicOps<T>,
{
    fn encode(&self, value: &A, ops: O, prefix: T) -> DataResult<T> {
        if *value == self.default {
            return DataResult::success(prefix);
        }
        let encoded = match self.inner.encode(value, ops, ops.empty()) {
            DataResult::Success(v) => v,
            DataResult::Error { message, .. } => {
                return DataResult::error(format!("{}: {message}", self.name))
            }
        };
        ops.merge_to_map(prefix, ops.create_string(self.name), encoded)
    }

    fn decode(&self, ops: O, value: T) -> DataResult<(A, T)> {
        match ops.get(&value, self.name) {
            None => DataResult::success((self.default.clone(), value)),
            Some(field_value) => match self.inner.decode(ops, field_value) {
                DataResult::Success((a, _)) => {
                    DataResult::success((a, ops.remove(value, self.name)))
                }
                DataResult::Error { .. } => {
                    DataResult::success((self.default.clone(), ops.remove(value, self.name)))
                }
            },
        }
    }
}

// ---------------------------------------------------------------------------
// RecordCodecBuilder — fixed-arity applicative composition
// ---------------------------------------------------------------------------

/// Two-field applicative record codec.
pub struct RecordCodec2<C1, C2, A1, A2, Out> {
    f1: (&'static str, C1),
    f2: (&'static str, C2),
    to: Box<dyn Fn(A1, A2) -> Out + Send + Sync>,
    from: Box<dyn Fn(&Out) -> (A1, A2) + Send + Sync>,
}

/// Build a two-field record codec from named field codecs and a bijection
/// between the field tuple and the application type.
pub fn record2<C1, C2, A1, A2, Out>(
    f1: (&'static str, C1),
    f2: (&'static str, C2),
    to: impl Fn(A1, A2) -> Out + Send + Sync + 'static,
    from: impl Fn(&Out) -> (A1, A2) + Send + Sync + 'static,
) -> RecordCodec2<C1, C2, A1, A2, Out> {
    RecordCodec2 {
        f1,
        f2,
        to: Box::new(to),
        from: Box::new(from),
    }
}

impl<C1, C2, A1, A2, Out, T, O> Codec<Out, T, O> for RecordCodec2<C1, C2, A1, A2, Out>
where
    C1: Codec<A1, T, O>,
    C2: Codec<A2, T, O>,
    T: Clone + fmt::Debug,
    O: DynamicOps<T>,
{
    fn encode(&self, value: &Out, ops: O, prefix: T) -> DataResult<T> {
        let (a1, a2) = (self.from)(value);
        let field1 = FieldCodec::new(self.f1.0, &self.f1.1);
        let current = match field1.encode(&a1, ops, prefix) {
            DataResult::Success(v) => v,
            e => return e,
        };
        let field2 = FieldCodec::new(self.f2.0, &self.f2.1);
        field2.encode(&a2, ops, current)
    }

    fn decode(&self, ops: O, value: T) -> DataResult<(Out, T)> {
        let field1 = FieldCodec::new(self.f1.0, &self.f1.1);
        let (a1, rest) = match field1.decode(ops, value) {
            DataResult::Success(v) => v,
            DataResult::Error { message, .. } => return DataResult::error(message),
        };
        let field2 = FieldCodec::new(self.f2.0, &self.f2.1);
        let (a2, rest) = match field2.decode(ops, rest) {
            DataResult::Success(v) => v,
            DataResult::Error { message, .. } => return DataResult::error(message),
        };
        DataResult::success(((self.to)(a1, a2), rest))
    }
}

/// Three-field applicative record codec.
pub struct RecordCodec3<C1, C2, C3, A1, A2, A3, Out> {
    f1: (&'static str, C1),
    f2: (&'static str, C2),
    f3: (&'static str, C3),
    to: Box<dyn Fn(A1, A2, A3) -> Out + Send + Sync>,
    from: Box<dyn Fn(&Out) -> (A1, A2, A3) + Send + Sync>,
}

pub fn record3<C1, C2, C3, A1, A2, A3, Out>(
    f1: (&'static str, C1),
    f2: (&'static str, C2),
    f3: (&'static str, C3),
    to: impl Fn(A1, A2, A3) -> Out + Send + Sync + 'static,
    from: impl Fn(&Out) -> (A1, A2, A3) + Send + Sync + 'static,
) -> RecordCodec3<C1, C2, C3, A1, A2, A3, Out> {
    RecordCodec3 {
        f1,
        f2,
        f3,
        to: Box::new(to),
        from: Box::new(from),
    }
}

impl<C1, C2, C3, A1, A2, A3, Out, T, O> Codec<Out, T, O>
    for RecordCodec3<C1, C2, C3, A1, A2, A3, Out>
where
    C1: Codec<A1, T, O>,
    C2: Codec<A2, T, O>,
    C3: Codec<A3, T, O>,
    T: Clone + fmt::Debug,
    O: DynamicOps<T>,
{
    fn encode(&self, value: &Out, ops: O, prefix: T) -> DataResult<T> {
        let (a1, a2, a3) = (self.from)(value);
        let current = match FieldCodec::new(self.f1.0, &self.f1.1).encode(&a1, ops, prefix) {
            DataResult::Success(v) => v,
            e => return e,
        };
        let current = match FieldCodec::new(self.f2.0, &self.f2.1).encode(&a2, ops, current) {
            DataResult::Success(v) => v,
            e => return e,
        };
        FieldCodec::new(self.f3.0, &self.f3.1).encode(&a3, ops, current)
    }

    fn decode(&self, ops: O, value: T) -> DataResult<(Out, T)> {
        let (a1, rest) = match FieldCodec::new(self.f1.0, &self.f1.1).decode(ops, value) {
            DataResult::Success(v) => v,
            DataResult::Error { message, .. } => return DataResult::error(message),
        };
        let (a2, rest) = match FieldCodec::new(self.f2.0, &self.f2.1).decode(ops, rest) {
            DataResult::Success(v) => v,
            DataResult::Error { message, .. } => return DataResult::error(message),
        };
        let (a3, rest) = match FieldCodec::new(self.f3.0, &self.f3.1).decode(ops, rest) {
            DataResult::Success(v) => v,
            DataResult::Error { message, .. } => return DataResult::error(message),
        };
        DataResult::success(((self.to)(a1, a2, a3), rest))
    }
}

/// Four-field applicative record codec.
pub struct RecordCodec4<C1, C2, C3, C4, A1, A2, A3, A4, Out> {
    f1: (&'static str, C1),
    f2: (&'static str, C2),
    f3: (&'static str, C3),
    f4: (&'static str, C4),
    to: Box<dyn Fn(A1, A2, A3, A4) -> Out + Send + Sync>,
    from: Box<dyn Fn(&Out) -> (A1, A2, A3, A4) + Send + Sync>,
}

#[allow(clippy::too_many_arguments)]
pub fn record4<C1, C2, C3, C4, A1, A2, A3, A4, Out>(
    f1: (&'static str, C1),
    f2: (&'static str, C2),
    f3: (&'static str, C3),
    f4: (&'static str, C4),
    to: impl Fn(A1, A2, A3, A4) -> Out + Send + Sync + 'static,
    from: impl Fn(&Out) -> (A1, A2, A3, A4) + Send + Sync + 'static,
) -> RecordCodec4<C1, C2, C3, C4, A1, A2, A3, A4, Out> {
    RecordCodec4 {
        f1,
        f2,
        f3,
        f4,
        to: Box::new(to),
        from: Box::new(from),
    }
}

impl<C1, C2, C3, C4, A1, A2, A3, A4, Out, T, O> Codec<Out, T, O>
    for RecordCodec4<C1, C2, C3, C4, A1, A2, A3, A4, Out>
where
    C1: Codec<A1, T, O>,
    C2: Codec<A2, T, O>,
    C3: Codec<A3, T, O>,
    C4: Codec<A4, T, O>,
    T: Clone + fmt::Debug,
    O: DynamicOps<T>,
{
    fn encode(&self, value: &Out, ops: O, prefix: T) -> DataResult<T> {
        let (a1, a2, a3, a4) = (self.from)(value);
        let current = match FieldCodec::new(self.f1.0, &self.f1.1).encode(&a1, ops, prefix) {
            DataResult::Success(v) => v,
            e => return e,
        };
        let current = match FieldCodec::new(self.f2.0, &self.f2.1).encode(&a2, ops, current) {
            DataResult::Success(v) => v,
            e => return e,
        };
        let current = match FieldCodec::new(self.f3.0, &self.f3.1).encode(&a3, ops, current) {
            DataResult::Success(v) => v,
            e => return e,
        };
        FieldCodec::new(self.f4.0, &self.f4.1).encode(&a4, ops, current)
    }

    fn decode(&self, ops: O, value: T) -> DataResult<(Out, T)> {
        let (a1, rest) = match FieldCodec::new(self.f1.0, &self.f1.1).decode(ops, value) {
            DataResult::Success(v) => v,
            DataResult::Error { message, .. } => return DataResult::error(message),
        };
        let (a2, rest) = match FieldCodec::new(self.f2.0, &self.f2.1).decode(ops, rest) {
            DataResult::Success(v) => v,
            DataResult::Error { message, .. } => return DataResult::error(message),
        };
        let (a3, rest) = match FieldCodec::new(self.f3.0, &self.f3.1).decode(ops, rest) {
            DataResult::Success(v) => v,
            DataResult::Error { message, .. } => return DataResult::error(message),
        };
        let (a4, rest) = match FieldCodec::new(self.f4.0, &self.f4.1).decode(ops, rest) {
            DataResult::Success(v) => v,
            DataResult::Error { message, .. } => return DataResult::error(message),
        };
        DataResult::success(((self.to)(a1, a2, a3, a4), rest))
    }
}

// ---------------------------------------------------------------------------
// dispatched — sum types via a discriminator field
// ---------------------------------------------------------------------------

/// Sum-type codec keyed by a discriminator field.
///
/// `to_discriminant` picks the discriminant for an already-constructed `A`
/// (used on encode, to select the variant codec that will do the actual
/// field encoding); `variant_for` maps a discriminant — decoded on the way
/// in, or produced by `to_discriminant` on the way out — to the
/// `Box<dyn Codec<A, T, O>>` responsible for that variant's fields. `A` is
/// shared across every variant (a Rust enum, unlike the source system's
/// per-variant class), so there is no separate "erase back to the sum type"
/// step: each variant codec already produces/consumes the whole `A`.
pub struct DispatchedCodec<DC, A, D, T, O> {
    discriminator_field: &'static str,
    discriminant_codec: DC,
    to_discriminant: Box<dyn Fn(&A) -> D + Send + Sync>,
    variant_for: Box<dyn Fn(&D) -> Option<Box<dyn Codec<A, T, O>>> + Send + Sync>,
    _marker: PhantomData<(A, D, T, O)>,
}

impl<DC, A, D, T, O> DispatchedCodec<DC, A, D, T, O> {
    pub fn new(
        discriminator_field: &'static str,
        discriminant_codec: DC,
        to_discriminant: impl Fn(&A) -> D + Send + Sync + 'static,
        variant_for: impl Fn(&D) -> Option<Box<dyn Codec<A, T, O>>> + Send + Sync + 'static,
    ) -> Self {
        Self {
            discriminator_field,
            discriminant_codec,
            to_discriminant: Box::new(to_discriminant),
            variant_for: Box::new(variant_for),
            _marker: PhantomData,
        }
    }
}

impl<DC, A, D, T, O> Codec<A, T, O> for DispatchedCodec<DC, A, D, T, O>
where
    DC: Codec<D, T, O>,
    T: Clone + fmt::Debug,
    O: DynamicOps<T>,
{
    fn encode(&self, value: &A, ops: O, prefix: T) -> DataResult<T> {
        let discriminant = (self.to_discriminant)(value);
        let with_tag = match self.discriminant_codec.encode(&discriminant, ops, ops.empty()) {
            DataResult::Success(v) => v,
            e => return e,
        };
        let tagged = match ops.merge_to_map(prefix, ops.create_string(self.discriminator_field), with_tag) {
            DataResult::Success(v) => v,
            DataResult::Error { message, .. } => return DataResult::error(message),
        };
        let variant = match (self.variant_for)(&discriminant) {
            Some(v) => v,
            None => return DataResult::error("No codec registered for discriminant"),
        };
        variant.encode(value, ops, tagged)
    }

    fn decode(&self, ops: O, value: T) -> DataResult<(A, T)> {
        let tag_value = match ops.get(&value, self.discriminator_field) {
            Some(v) => v,
            None => {
                return DataResult::error(format!("Missing field: {}", self.discriminator_field))
            }
        };
        let (discriminant, _) = match self.discriminant_codec.decode(ops, tag_value) {
            DataResult::Success(v) => v,
            DataResult::Error { message, .. } => return DataResult::error(message),
        };
        let variant = match (self.variant_for)(&discriminant) {
            Some(v) => v,
            None => return DataResult::error("No codec registered for discriminant"),
        };
        let rest = ops.remove(value, self.discriminator_field);
        variant.decode(ops, rest)
    }
}

/// Build a discriminator-dispatched sum-type codec.
pub fn dispatched<DC, A, D, T, O>(
    discriminator_field: &'static str,
    discriminant_codec: DC,
    to_discriminant: impl Fn(&A) -> D + Send + Sync + 'static,
    variant_for: impl Fn(&D) -> Option<Box<dyn Codec<A, T, O>>> + Send + Sync + 'static,
) -> DispatchedCodec<DC, A, D, T, O> {
    DispatchedCodec::new(discriminator_field, discriminant_codec, to_discriminant, variant_for)
}
