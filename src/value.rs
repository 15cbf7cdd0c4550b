use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use crate::utf8;
use crate::{CborError, ErrorKind};

/// Smallest integer expressible by the CBOR integer model (`-2^64`).
pub const MIN_CBOR_INTEGER: i128 = -(1_i128 << 64);

/// Largest integer expressible by the CBOR integer model (`2^64 - 1`).
pub const MAX_CBOR_INTEGER: i128 = (1_i128 << 64) - 1;

/// An integer permitted by the CBOR data model.
///
/// CBOR integers span 65-bit magnitudes: major type 0 reaches `2^64 - 1` and
/// major type 1 reaches `-2^64`. The wrapper keeps its `i128` inside
/// [`MIN_CBOR_INTEGER`]`..=`[`MAX_CBOR_INTEGER`], so every `CborInt` has
/// exactly one wire form and the encoder never range-checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CborInt(i128);

impl CborInt {
    /// Construct from an `i128`.
    ///
    /// # Errors
    ///
    /// Returns `Malformed` if `value` is outside `[-2^64, 2^64 - 1]`.
    pub const fn new(value: i128) -> Result<Self, CborError> {
        if value < MIN_CBOR_INTEGER || value > MAX_CBOR_INTEGER {
            return Err(CborError::new(ErrorKind::Malformed, 0));
        }
        Ok(Self(value))
    }

    /// Internal constructor used by the decoder; arguments derived from a
    /// 64-bit wire argument are in range by construction.
    #[inline]
    pub(crate) const fn new_unchecked(value: i128) -> Self {
        Self(value)
    }

    /// Return the integer value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> i128 {
        self.0
    }

    /// Return the value as `i64` if it fits.
    #[inline]
    #[must_use]
    pub fn as_i64(self) -> Option<i64> {
        i64::try_from(self.0).ok()
    }

    /// Return the value as `u64` if it is non-negative and fits.
    #[inline]
    #[must_use]
    pub fn as_u64(self) -> Option<u64> {
        u64::try_from(self.0).ok()
    }
}

macro_rules! int_from_impl {
    ($($t:ty),+) => {$(
        impl From<$t> for CborInt {
            #[inline]
            fn from(value: $t) -> Self {
                Self(i128::from(value))
            }
        }
    )+};
}

int_from_impl!(u8, u16, u32, u64, i8, i16, i32, i64);

/// The wire width of a CBOR float.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatWidth {
    /// IEEE 754 binary16 (major 7, ai 25).
    Half,
    /// IEEE 754 binary32 (major 7, ai 26).
    Single,
    /// IEEE 754 binary64 (major 7, ai 27).
    Double,
}

/// An IEEE 754 float together with its wire width.
///
/// The width is part of the value's identity: a half-precision `0.0` and a
/// single-precision `0.0` are distinct values, because the codec must
/// reproduce the exact wire form on re-encode. Values are stored as raw bit
/// patterns so that derived equality is bit-identical per width and NaN
/// payloads survive a round-trip unchanged.
///
/// Callers who want IEEE numeric comparison instead use [`Float::numeric_eq`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Float {
    /// Raw binary16 bits.
    Half(u16),
    /// Raw binary32 bits.
    Single(u32),
    /// Raw binary64 bits.
    Double(u64),
}

impl Float {
    /// Construct a half-precision float.
    #[inline]
    #[must_use]
    pub fn from_f16(value: half::f16) -> Self {
        Self::Half(value.to_bits())
    }

    /// Construct a single-precision float.
    #[inline]
    #[must_use]
    pub fn from_f32(value: f32) -> Self {
        Self::Single(value.to_bits())
    }

    /// Construct a double-precision float.
    #[inline]
    #[must_use]
    pub fn from_f64(value: f64) -> Self {
        Self::Double(value.to_bits())
    }

    /// Return the wire width.
    #[inline]
    #[must_use]
    pub const fn width(self) -> FloatWidth {
        match self {
            Self::Half(_) => FloatWidth::Half,
            Self::Single(_) => FloatWidth::Single,
            Self::Double(_) => FloatWidth::Double,
        }
    }

    /// Widen to `f64` without changing the stored bits.
    #[inline]
    #[must_use]
    pub fn to_f64(self) -> f64 {
        match self {
            Self::Half(bits) => f64::from(half::f16::from_bits(bits)),
            Self::Single(bits) => f64::from(f32::from_bits(bits)),
            Self::Double(bits) => f64::from_bits(bits),
        }
    }

    /// IEEE numeric equality across widths.
    ///
    /// Both values are widened to `f64` and compared with `==`, so
    /// `Half(1.0)` equals `Double(1.0)` and NaN never equals NaN. This is
    /// the width-agnostic complement to the derived (width- and
    /// bit-sensitive) `PartialEq`.
    #[inline]
    #[must_use]
    pub fn numeric_eq(self, other: Self) -> bool {
        self.to_f64() == other.to_f64()
    }
}

/// A CBOR simple value (major type 7, ai 20..=23).
///
/// Other simple values are not modeled; the decoder rejects them as
/// `Unsupported`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Simple {
    /// `false` (ai 20).
    False,
    /// `true` (ai 21).
    True,
    /// `null` (ai 22).
    Null,
    /// `undefined` (ai 23).
    Undefined,
}

impl Simple {
    /// Return the boolean value for `False`/`True`.
    #[inline]
    #[must_use]
    pub const fn as_bool(self) -> Option<bool> {
        match self {
            Self::False => Some(false),
            Self::True => Some(true),
            Self::Null | Self::Undefined => None,
        }
    }
}

/// A CBOR map as an ordered pair list.
///
/// Maps preserve encounter order and permit duplicate keys; both matter for
/// wire fidelity (COSE treats map order as significant). Lookup is a linear
/// scan returning the first matching pair. Callers that need fast keyed
/// access should build their own index over [`CborMap::entries`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CborMap {
    entries: Vec<(CborValue, CborValue)>,
}

impl CborMap {
    /// Construct an empty map.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Construct from a pair list, preserving its order verbatim.
    #[inline]
    #[must_use]
    pub fn from_entries(entries: Vec<(CborValue, CborValue)>) -> Self {
        Self { entries }
    }

    /// Number of pairs.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the map holds no pairs.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append a pair at the end.
    #[inline]
    pub fn push(&mut self, key: CborValue, value: CborValue) {
        self.entries.push((key, value));
    }

    /// Borrow the pair list in encounter order.
    #[inline]
    #[must_use]
    pub fn entries(&self) -> &[(CborValue, CborValue)] {
        &self.entries
    }

    /// Iterate pairs in encounter order.
    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, (CborValue, CborValue)> {
        self.entries.iter()
    }

    /// Return the first value whose key equals `key` structurally.
    #[must_use]
    pub fn get(&self, key: &CborValue) -> Option<&CborValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Return the first value whose key is a text string with byte-equal
    /// contents.
    #[must_use]
    pub fn get_text(&self, key: &str) -> Option<&CborValue> {
        self.entries
            .iter()
            .find(|(k, _)| matches!(k, CborValue::Text(t) if t.as_slice() == key.as_bytes()))
            .map(|(_, v)| v)
    }
}

impl From<Vec<(CborValue, CborValue)>> for CborMap {
    fn from(entries: Vec<(CborValue, CborValue)>) -> Self {
        Self { entries }
    }
}

impl FromIterator<(CborValue, CborValue)> for CborMap {
    fn from_iter<I: IntoIterator<Item = (CborValue, CborValue)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for CborMap {
    type Item = (CborValue, CborValue);
    type IntoIter = alloc::vec::IntoIter<(CborValue, CborValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a CborMap {
    type Item = &'a (CborValue, CborValue);
    type IntoIter = core::slice::Iter<'a, (CborValue, CborValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// A decoded CBOR data item.
///
/// One variant per major type, with major type 7 split into [`Float`] and
/// [`Simple`]. Every item exclusively owns its payload storage, so dropping
/// a value releases the whole subtree.
///
/// Derived equality realizes structural equality: integer equality for
/// `Int`, byte-wise for `Bytes`/`Text`, positional for `Array` and `Map`,
/// tag-number plus child for `Tag`, width- and bit-sensitive for `Float`,
/// and enumerator identity for `Simple`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CborValue {
    /// Major type 0/1, unified as a 65-bit-magnitude signed integer.
    Int(CborInt),
    /// Major type 2, a byte string.
    Bytes(Vec<u8>),
    /// Major type 3, a text string.
    ///
    /// The payload is kept as raw bytes; the codec does not validate UTF-8.
    /// Use [`CborValue::as_str`] for checked access.
    Text(Vec<u8>),
    /// Major type 4, an ordered sequence of items.
    Array(Vec<CborValue>),
    /// Major type 5, an ordered pair list.
    Map(CborMap),
    /// Major type 6, a tag number wrapping exactly one child item.
    Tag(u64, Box<CborValue>),
    /// Major type 7 with ai 25/26/27, an IEEE 754 float.
    Float(Float),
    /// Major type 7 with ai 20..=23, a simple value.
    Simple(Simple),
}

impl CborValue {
    /// Construct an integer from any machine integer type.
    #[inline]
    #[must_use]
    pub fn int(value: impl Into<CborInt>) -> Self {
        Self::Int(value.into())
    }

    /// Construct an integer from an `i128`.
    ///
    /// # Errors
    ///
    /// Returns `Malformed` if `value` is outside `[-2^64, 2^64 - 1]`.
    pub const fn int_i128(value: i128) -> Result<Self, CborError> {
        match CborInt::new(value) {
            Ok(v) => Ok(Self::Int(v)),
            Err(e) => Err(e),
        }
    }

    /// Construct a byte string.
    #[inline]
    #[must_use]
    pub fn bytes(value: impl Into<Vec<u8>>) -> Self {
        Self::Bytes(value.into())
    }

    /// Construct a text string from UTF-8 input.
    #[inline]
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into().into_bytes())
    }

    /// Construct a text string from raw bytes, without UTF-8 validation.
    #[inline]
    #[must_use]
    pub fn text_bytes(value: impl Into<Vec<u8>>) -> Self {
        Self::Text(value.into())
    }

    /// Construct an array.
    #[inline]
    #[must_use]
    pub fn array(items: Vec<CborValue>) -> Self {
        Self::Array(items)
    }

    /// Construct a map from a pair list, preserving its order.
    #[inline]
    #[must_use]
    pub fn map(map: impl Into<CborMap>) -> Self {
        Self::Map(map.into())
    }

    /// Construct a tagged item.
    #[inline]
    #[must_use]
    pub fn tag(number: u64, item: CborValue) -> Self {
        Self::Tag(number, Box::new(item))
    }

    /// Construct a half-precision float.
    #[inline]
    #[must_use]
    pub fn float16(value: half::f16) -> Self {
        Self::Float(Float::from_f16(value))
    }

    /// Construct a single-precision float.
    #[inline]
    #[must_use]
    pub fn float32(value: f32) -> Self {
        Self::Float(Float::from_f32(value))
    }

    /// Construct a double-precision float.
    #[inline]
    #[must_use]
    pub fn float64(value: f64) -> Self {
        Self::Float(Float::from_f64(value))
    }

    /// Construct a boolean simple value.
    #[inline]
    #[must_use]
    pub const fn bool(value: bool) -> Self {
        Self::Simple(if value { Simple::True } else { Simple::False })
    }

    /// Construct the `null` simple value.
    #[inline]
    #[must_use]
    pub const fn null() -> Self {
        Self::Simple(Simple::Null)
    }

    /// Construct the `undefined` simple value.
    #[inline]
    #[must_use]
    pub const fn undefined() -> Self {
        Self::Simple(Simple::Undefined)
    }

    /// Returns `true` iff this is an integer.
    #[inline]
    #[must_use]
    pub const fn is_int(&self) -> bool {
        matches!(self, Self::Int(_))
    }

    /// Returns `true` iff this is a byte string.
    #[inline]
    #[must_use]
    pub const fn is_bytes(&self) -> bool {
        matches!(self, Self::Bytes(_))
    }

    /// Returns `true` iff this is a text string.
    #[inline]
    #[must_use]
    pub const fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    /// Returns `true` iff this is an array.
    #[inline]
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    /// Returns `true` iff this is a map.
    #[inline]
    #[must_use]
    pub const fn is_map(&self) -> bool {
        matches!(self, Self::Map(_))
    }

    /// Returns `true` iff this is a tagged item.
    #[inline]
    #[must_use]
    pub const fn is_tag(&self) -> bool {
        matches!(self, Self::Tag(_, _))
    }

    /// Returns `true` iff this is a float of any width.
    #[inline]
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, Self::Float(_))
    }

    /// Returns `true` iff this is a simple value.
    #[inline]
    #[must_use]
    pub const fn is_simple(&self) -> bool {
        matches!(self, Self::Simple(_))
    }

    /// Returns `true` iff this is the simple value `true` or `false`.
    #[inline]
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Self::Simple(Simple::False | Simple::True))
    }

    /// Returns `true` iff this is the simple value `null`.
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Simple(Simple::Null))
    }

    /// Returns `true` iff this is the simple value `undefined`.
    #[inline]
    #[must_use]
    pub const fn is_undefined(&self) -> bool {
        matches!(self, Self::Simple(Simple::Undefined))
    }

    /// Return the integer, if this is one.
    #[inline]
    #[must_use]
    pub const fn as_int(&self) -> Option<CborInt> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Return the integer as `i64`, if this is one and it fits.
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        self.as_int().and_then(CborInt::as_i64)
    }

    /// Return the integer as `u64`, if this is one and it fits.
    #[inline]
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        self.as_int().and_then(CborInt::as_u64)
    }

    /// Return the byte-string payload, if this is one.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Return the raw text-string payload, if this is one.
    #[inline]
    #[must_use]
    pub fn as_text_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Return the text-string payload as `&str` if it is valid UTF-8.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(t) => utf8::validate(t).ok(),
            _ => None,
        }
    }

    /// Return the child slice, if this is an array.
    #[inline]
    #[must_use]
    pub fn as_array(&self) -> Option<&[CborValue]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Return the map, if this is one.
    #[inline]
    #[must_use]
    pub const fn as_map(&self) -> Option<&CborMap> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Return the tag number and child, if this is a tagged item.
    #[inline]
    #[must_use]
    pub fn as_tag(&self) -> Option<(u64, &CborValue)> {
        match self {
            Self::Tag(number, item) => Some((*number, item)),
            _ => None,
        }
    }

    /// Return the float, if this is one.
    #[inline]
    #[must_use]
    pub const fn as_float(&self) -> Option<Float> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Return the boolean, if this is the simple value `true` or `false`.
    #[inline]
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Simple(s) => s.as_bool(),
            _ => None,
        }
    }

    /// Return the array child at `index`, if this is an array and the index
    /// is in range.
    #[inline]
    #[must_use]
    pub fn at(&self, index: usize) -> Option<&CborValue> {
        self.as_array().and_then(|items| items.get(index))
    }

    /// Return the first map value whose key equals `key` structurally.
    ///
    /// Maps are ordered pair lists, not hash tables; this is a linear scan.
    #[inline]
    #[must_use]
    pub fn lookup(&self, key: &CborValue) -> Option<&CborValue> {
        self.as_map().and_then(|m| m.get(key))
    }

    /// Return the first map value whose key is a text string with byte-equal
    /// contents.
    #[inline]
    #[must_use]
    pub fn lookup_text(&self, key: &str) -> Option<&CborValue> {
        self.as_map().and_then(|m| m.get_text(key))
    }
}
