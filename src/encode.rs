use alloc::vec::Vec;

use crate::alloc_util::try_reserve;
use crate::value::{CborInt, CborValue, Float, Simple};
use crate::{CborError, ErrorKind};

fn write_all(buf: &mut Vec<u8>, bytes: &[u8]) -> Result<(), CborError> {
    let offset = buf.len();
    try_reserve(buf, bytes.len(), offset)?;
    buf.extend_from_slice(bytes);
    Ok(())
}

fn write_u8(buf: &mut Vec<u8>, byte: u8) -> Result<(), CborError> {
    if buf.len() == buf.capacity() {
        let offset = buf.len();
        try_reserve(buf, 1, offset)?;
    }
    buf.push(byte);
    Ok(())
}

/// Write a head in preferred serialization: the smallest of the five size
/// classes that fits `value`.
fn write_head(buf: &mut Vec<u8>, major: u8, value: u64) -> Result<(), CborError> {
    debug_assert!(major <= 7);
    if value < 24 {
        let v = u8::try_from(value).unwrap();
        return write_u8(buf, (major << 5) | v);
    }
    if value <= 0xff {
        let v = u8::try_from(value).unwrap();
        write_u8(buf, (major << 5) | 24)?;
        return write_u8(buf, v);
    }
    if value <= 0xffff {
        let v = u16::try_from(value).unwrap();
        write_u8(buf, (major << 5) | 25)?;
        return write_all(buf, &v.to_be_bytes());
    }
    if value <= 0xffff_ffff {
        let v = u32::try_from(value).unwrap();
        write_u8(buf, (major << 5) | 26)?;
        return write_all(buf, &v.to_be_bytes());
    }
    write_u8(buf, (major << 5) | 27)?;
    write_all(buf, &value.to_be_bytes())
}

fn write_len(buf: &mut Vec<u8>, major: u8, len: usize) -> Result<(), CborError> {
    let offset = buf.len();
    let len_u64 = u64::try_from(len).map_err(|_| CborError::new(ErrorKind::Malformed, offset))?;
    write_head(buf, major, len_u64)
}

fn write_int(buf: &mut Vec<u8>, value: CborInt) -> Result<(), CborError> {
    let offset = buf.len();
    let v = value.value();
    if v >= 0 {
        // In range by the CborInt invariant; try_from keeps the cast honest.
        let u = u64::try_from(v).map_err(|_| CborError::new(ErrorKind::Malformed, offset))?;
        write_head(buf, 0, u)
    } else {
        let n =
            u64::try_from(-1 - v).map_err(|_| CborError::new(ErrorKind::Malformed, offset))?;
        write_head(buf, 1, n)
    }
}

fn write_float(buf: &mut Vec<u8>, value: Float) -> Result<(), CborError> {
    match value {
        Float::Half(bits) => {
            write_u8(buf, 0xf9)?;
            write_all(buf, &bits.to_be_bytes())
        }
        Float::Single(bits) => {
            write_u8(buf, 0xfa)?;
            write_all(buf, &bits.to_be_bytes())
        }
        Float::Double(bits) => {
            write_u8(buf, 0xfb)?;
            write_all(buf, &bits.to_be_bytes())
        }
    }
}

const fn simple_byte(value: Simple) -> u8 {
    match value {
        Simple::False => 0xf4,
        Simple::True => 0xf5,
        Simple::Null => 0xf6,
        Simple::Undefined => 0xf7,
    }
}

fn write_value(buf: &mut Vec<u8>, value: &CborValue) -> Result<(), CborError> {
    match value {
        CborValue::Int(v) => write_int(buf, *v),
        CborValue::Bytes(b) => {
            write_len(buf, 2, b.len())?;
            write_all(buf, b)
        }
        CborValue::Text(t) => {
            write_len(buf, 3, t.len())?;
            write_all(buf, t)
        }
        CborValue::Array(items) => {
            write_len(buf, 4, items.len())?;
            for item in items {
                write_value(buf, item)?;
            }
            Ok(())
        }
        CborValue::Map(m) => {
            write_len(buf, 5, m.len())?;
            for (k, v) in m {
                write_value(buf, k)?;
                write_value(buf, v)?;
            }
            Ok(())
        }
        CborValue::Tag(number, item) => {
            write_head(buf, 6, *number)?;
            write_value(buf, item)
        }
        CborValue::Float(f) => write_float(buf, *f),
        CborValue::Simple(s) => write_u8(buf, simple_byte(*s)),
    }
}

/// Encode a single item into a fresh buffer.
///
/// The head of every item uses preferred serialization (shortest form),
/// float widths are written exactly as stored, and map pair order is
/// preserved verbatim.
///
/// # Errors
///
/// The only runtime failure is `AllocationFailed` while growing the output.
pub fn encode(value: &CborValue) -> Result<Vec<u8>, CborError> {
    let mut out = Vec::new();
    encode_into(value, &mut out)?;
    Ok(out)
}

/// Append the wire form of `value` to `out`.
///
/// The output buffer stays owned by the caller; on failure, bytes written
/// before the failing allocation remain in the buffer.
///
/// # Errors
///
/// Same failure conditions as [`encode`].
pub fn encode_into(value: &CborValue, out: &mut Vec<u8>) -> Result<(), CborError> {
    write_value(out, value)
}

/// Streaming encoder writing one CBOR item directly into a growing buffer.
///
/// Container builders announce their length up front and are checked to
/// emit exactly that many children; a mismatch rolls the container back and
/// fails with `Malformed`. Map entries are written key-then-value in call
/// order with no reordering or duplicate detection, matching the wire
/// fidelity rules of the value tree.
pub struct Encoder {
    buf: Vec<u8>,
    depth: usize,
    root_done: bool,
    root_end: usize,
}

impl Encoder {
    /// Create a new encoder.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buf: Vec::new(),
            depth: 0,
            root_done: false,
            root_end: 0,
        }
    }

    /// Create an encoder with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let mut buf = Vec::new();
        let _ = buf.try_reserve(capacity);
        Self {
            buf,
            depth: 0,
            root_done: false,
            root_end: 0,
        }
    }

    /// Return the number of bytes written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` if no bytes have been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Borrow the bytes emitted so far.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consume and return the raw buffer without completeness checks.
    #[must_use]
    pub fn into_vec(self) -> Vec<u8> {
        self.buf
    }

    /// Consume the encoder, checking that exactly one complete item was
    /// written.
    ///
    /// # Errors
    ///
    /// Returns `Malformed` if no root item was written or a container
    /// builder is still open.
    pub fn finish(self) -> Result<Vec<u8>, CborError> {
        if self.depth != 0 {
            return Err(CborError::new(ErrorKind::Malformed, self.buf.len()));
        }
        if !self.root_done {
            return Err(CborError::new(ErrorKind::Malformed, 0));
        }
        Ok(self.buf)
    }

    /// Clear the encoder while retaining allocated capacity.
    pub fn clear(&mut self) {
        self.buf.clear();
        self.depth = 0;
        self.root_done = false;
        self.root_end = 0;
    }

    #[inline]
    const fn begin_value(&self) -> Result<bool, CborError> {
        if self.depth == 0 {
            if self.root_done {
                return Err(CborError::new(ErrorKind::Malformed, self.root_end));
            }
            Ok(true)
        } else {
            Ok(false)
        }
    }

    #[inline]
    fn finish_value(&mut self, root: bool) {
        if root {
            self.root_done = true;
            self.root_end = self.buf.len();
        }
    }

    #[inline]
    fn enter_container(&mut self) {
        self.depth = self.depth.saturating_add(1);
    }

    #[inline]
    fn exit_container(&mut self) {
        debug_assert!(self.depth > 0);
        self.depth = self.depth.saturating_sub(1);
    }

    fn scalar<F>(&mut self, emit: F) -> Result<(), CborError>
    where
        F: FnOnce(&mut Vec<u8>) -> Result<(), CborError>,
    {
        let root = self.begin_value()?;
        emit(&mut self.buf)?;
        self.finish_value(root);
        Ok(())
    }

    /// Encode CBOR `null`.
    ///
    /// # Errors
    ///
    /// Returns an error if a root item was already written or writing fails.
    pub fn null(&mut self) -> Result<(), CborError> {
        self.scalar(|buf| write_u8(buf, simple_byte(Simple::Null)))
    }

    /// Encode CBOR `undefined`.
    ///
    /// # Errors
    ///
    /// Returns an error if a root item was already written or writing fails.
    pub fn undefined(&mut self) -> Result<(), CborError> {
        self.scalar(|buf| write_u8(buf, simple_byte(Simple::Undefined)))
    }

    /// Encode a boolean.
    ///
    /// # Errors
    ///
    /// Returns an error if a root item was already written or writing fails.
    pub fn bool(&mut self, value: bool) -> Result<(), CborError> {
        let s = if value { Simple::True } else { Simple::False };
        self.scalar(|buf| write_u8(buf, simple_byte(s)))
    }

    /// Encode an integer.
    ///
    /// # Errors
    ///
    /// Returns an error if a root item was already written or writing fails.
    pub fn int(&mut self, value: impl Into<CborInt>) -> Result<(), CborError> {
        let v = value.into();
        self.scalar(|buf| write_int(buf, v))
    }

    /// Encode an integer given as `i128`, checking the 65-bit model range.
    ///
    /// # Errors
    ///
    /// Returns `Malformed` if `value` is outside `[-2^64, 2^64 - 1]`, or an
    /// error if a root item was already written or writing fails.
    pub fn int_i128(&mut self, value: i128) -> Result<(), CborError> {
        let v = CborInt::new(value)
            .map_err(|e| CborError::new(e.kind, self.buf.len()))?;
        self.scalar(|buf| write_int(buf, v))
    }

    /// Encode a byte string.
    ///
    /// # Errors
    ///
    /// Returns an error if a root item was already written or writing fails.
    pub fn bytes(&mut self, value: &[u8]) -> Result<(), CborError> {
        self.scalar(|buf| {
            write_len(buf, 2, value.len())?;
            write_all(buf, value)
        })
    }

    /// Encode a text string.
    ///
    /// # Errors
    ///
    /// Returns an error if a root item was already written or writing fails.
    pub fn text(&mut self, value: &str) -> Result<(), CborError> {
        self.scalar(|buf| {
            let b = value.as_bytes();
            write_len(buf, 3, b.len())?;
            write_all(buf, b)
        })
    }

    /// Encode a text string from raw bytes, without UTF-8 validation.
    ///
    /// # Errors
    ///
    /// Returns an error if a root item was already written or writing fails.
    pub fn text_bytes(&mut self, value: &[u8]) -> Result<(), CborError> {
        self.scalar(|buf| {
            write_len(buf, 3, value.len())?;
            write_all(buf, value)
        })
    }

    /// Encode a half-precision float.
    ///
    /// # Errors
    ///
    /// Returns an error if a root item was already written or writing fails.
    pub fn float16(&mut self, value: half::f16) -> Result<(), CborError> {
        self.float(Float::from_f16(value))
    }

    /// Encode a single-precision float.
    ///
    /// # Errors
    ///
    /// Returns an error if a root item was already written or writing fails.
    pub fn float32(&mut self, value: f32) -> Result<(), CborError> {
        self.float(Float::from_f32(value))
    }

    /// Encode a double-precision float.
    ///
    /// # Errors
    ///
    /// Returns an error if a root item was already written or writing fails.
    pub fn float64(&mut self, value: f64) -> Result<(), CborError> {
        self.float(Float::from_f64(value))
    }

    /// Encode a float at its stored width.
    ///
    /// # Errors
    ///
    /// Returns an error if a root item was already written or writing fails.
    pub fn float(&mut self, value: Float) -> Result<(), CborError> {
        self.scalar(|buf| write_float(buf, value))
    }

    /// Splice a whole value tree as the next item.
    ///
    /// # Errors
    ///
    /// Returns an error if a root item was already written or writing fails.
    pub fn value(&mut self, value: &CborValue) -> Result<(), CborError> {
        let root = self.begin_value()?;
        let start = self.buf.len();
        if let Err(err) = write_value(&mut self.buf, value) {
            self.buf.truncate(start);
            return Err(err);
        }
        self.finish_value(root);
        Ok(())
    }

    /// Encode a tagged item; the builder must write exactly one child.
    ///
    /// The child count is not verified; a builder that writes zero or
    /// several items produces ill-formed output that [`decode`](crate::decode)
    /// will reject.
    ///
    /// # Errors
    ///
    /// Returns an error if a root item was already written or writing fails.
    pub fn tag<F>(&mut self, number: u64, f: F) -> Result<(), CborError>
    where
        F: FnOnce(&mut Encoder) -> Result<(), CborError>,
    {
        let root = self.begin_value()?;
        let start = self.buf.len();
        if let Err(err) = write_head(&mut self.buf, 6, number) {
            self.buf.truncate(start);
            return Err(err);
        }
        self.enter_container();
        let res = f(self);
        self.exit_container();
        if let Err(err) = res {
            self.buf.truncate(start);
            return Err(err);
        }
        self.finish_value(root);
        Ok(())
    }

    /// Encode a definite-length array and fill it via the builder.
    ///
    /// # Errors
    ///
    /// Returns `Malformed` if the builder emits a different number of items,
    /// or an error if a root item was already written or writing fails. On
    /// failure the buffer is rolled back to before the array head.
    pub fn array<F>(&mut self, len: usize, f: F) -> Result<(), CborError>
    where
        F: FnOnce(&mut ArrayEncoder<'_>) -> Result<(), CborError>,
    {
        let root = self.begin_value()?;
        let start = self.buf.len();
        if let Err(err) = write_len(&mut self.buf, 4, len) {
            self.buf.truncate(start);
            return Err(err);
        }
        self.enter_container();
        let (res, remaining) = {
            let mut a = ArrayEncoder {
                enc: self,
                remaining: len,
            };
            let res = f(&mut a);
            (res, a.remaining)
        };
        self.exit_container();
        if let Err(err) = res {
            self.buf.truncate(start);
            return Err(err);
        }
        if remaining != 0 {
            let err = CborError::new(ErrorKind::Malformed, self.buf.len());
            self.buf.truncate(start);
            return Err(err);
        }
        self.finish_value(root);
        Ok(())
    }

    /// Encode a definite-length map and fill it via the builder.
    ///
    /// # Errors
    ///
    /// Returns `Malformed` if the builder emits a different number of
    /// entries, or an error if a root item was already written or writing
    /// fails. On failure the buffer is rolled back to before the map head.
    pub fn map<F>(&mut self, len: usize, f: F) -> Result<(), CborError>
    where
        F: FnOnce(&mut MapEncoder<'_>) -> Result<(), CborError>,
    {
        let root = self.begin_value()?;
        let start = self.buf.len();
        if let Err(err) = write_len(&mut self.buf, 5, len) {
            self.buf.truncate(start);
            return Err(err);
        }
        self.enter_container();
        let (res, remaining) = {
            let mut m = MapEncoder {
                enc: self,
                remaining: len,
            };
            let res = f(&mut m);
            (res, m.remaining)
        };
        self.exit_container();
        if let Err(err) = res {
            self.buf.truncate(start);
            return Err(err);
        }
        if remaining != 0 {
            let err = CborError::new(ErrorKind::Malformed, self.buf.len());
            self.buf.truncate(start);
            return Err(err);
        }
        self.finish_value(root);
        Ok(())
    }

    /// Internal hook used by `cbor_bytes!` for expression values.
    #[doc(hidden)]
    #[allow(missing_docs)]
    pub fn __encode_any<T>(&mut self, v: T) -> Result<(), CborError>
    where
        T: crate::__cbor_macro::IntoCborItem,
    {
        crate::__cbor_macro::IntoCborItem::into_cbor_item(v, self)
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for writing array elements.
pub struct ArrayEncoder<'a> {
    enc: &'a mut Encoder,
    remaining: usize,
}

impl ArrayEncoder<'_> {
    fn consume_one(&mut self) -> Result<(), CborError> {
        if self.remaining == 0 {
            return Err(CborError::new(ErrorKind::Malformed, self.enc.buf.len()));
        }
        self.remaining -= 1;
        Ok(())
    }

    /// Encode CBOR `null` as the next element.
    ///
    /// # Errors
    ///
    /// Returns `Malformed` if the announced length is exceeded, or an error
    /// if writing fails.
    pub fn null(&mut self) -> Result<(), CborError> {
        self.consume_one()?;
        self.enc.null()
    }

    /// Encode CBOR `undefined` as the next element.
    ///
    /// # Errors
    ///
    /// Returns `Malformed` if the announced length is exceeded, or an error
    /// if writing fails.
    pub fn undefined(&mut self) -> Result<(), CborError> {
        self.consume_one()?;
        self.enc.undefined()
    }

    /// Encode a boolean as the next element.
    ///
    /// # Errors
    ///
    /// Returns `Malformed` if the announced length is exceeded, or an error
    /// if writing fails.
    pub fn bool(&mut self, value: bool) -> Result<(), CborError> {
        self.consume_one()?;
        self.enc.bool(value)
    }

    /// Encode an integer as the next element.
    ///
    /// # Errors
    ///
    /// Returns `Malformed` if the announced length is exceeded, or an error
    /// if writing fails.
    pub fn int(&mut self, value: impl Into<CborInt>) -> Result<(), CborError> {
        self.consume_one()?;
        self.enc.int(value)
    }

    /// Encode a byte string as the next element.
    ///
    /// # Errors
    ///
    /// Returns `Malformed` if the announced length is exceeded, or an error
    /// if writing fails.
    pub fn bytes(&mut self, value: &[u8]) -> Result<(), CborError> {
        self.consume_one()?;
        self.enc.bytes(value)
    }

    /// Encode a text string as the next element.
    ///
    /// # Errors
    ///
    /// Returns `Malformed` if the announced length is exceeded, or an error
    /// if writing fails.
    pub fn text(&mut self, value: &str) -> Result<(), CborError> {
        self.consume_one()?;
        self.enc.text(value)
    }

    /// Encode a float at its stored width as the next element.
    ///
    /// # Errors
    ///
    /// Returns `Malformed` if the announced length is exceeded, or an error
    /// if writing fails.
    pub fn float(&mut self, value: Float) -> Result<(), CborError> {
        self.consume_one()?;
        self.enc.float(value)
    }

    /// Splice a whole value tree as the next element.
    ///
    /// # Errors
    ///
    /// Returns `Malformed` if the announced length is exceeded, or an error
    /// if writing fails.
    pub fn value(&mut self, value: &CborValue) -> Result<(), CborError> {
        self.consume_one()?;
        self.enc.value(value)
    }

    /// Encode a nested tagged item as the next element.
    ///
    /// # Errors
    ///
    /// Returns `Malformed` if the announced length is exceeded, or an error
    /// if writing fails.
    pub fn tag<F>(&mut self, number: u64, f: F) -> Result<(), CborError>
    where
        F: FnOnce(&mut Encoder) -> Result<(), CborError>,
    {
        self.consume_one()?;
        self.enc.tag(number, f)
    }

    /// Encode a nested array as the next element.
    ///
    /// # Errors
    ///
    /// Returns `Malformed` if the announced length is exceeded, or an error
    /// if writing fails.
    pub fn array<F>(&mut self, len: usize, f: F) -> Result<(), CborError>
    where
        F: FnOnce(&mut ArrayEncoder<'_>) -> Result<(), CborError>,
    {
        self.consume_one()?;
        self.enc.array(len, f)
    }

    /// Encode a nested map as the next element.
    ///
    /// # Errors
    ///
    /// Returns `Malformed` if the announced length is exceeded, or an error
    /// if writing fails.
    pub fn map<F>(&mut self, len: usize, f: F) -> Result<(), CborError>
    where
        F: FnOnce(&mut MapEncoder<'_>) -> Result<(), CborError>,
    {
        self.consume_one()?;
        self.enc.map(len, f)
    }

    /// Internal hook used by `cbor_bytes!` for expression values.
    #[doc(hidden)]
    #[allow(missing_docs)]
    pub fn __encode_any<T>(&mut self, v: T) -> Result<(), CborError>
    where
        T: crate::__cbor_macro::IntoCborItem,
    {
        self.consume_one()?;
        crate::__cbor_macro::IntoCborItem::into_cbor_item(v, self.enc)
    }
}

/// Builder for writing map entries.
pub struct MapEncoder<'a> {
    enc: &'a mut Encoder,
    remaining: usize,
}

impl MapEncoder<'_> {
    /// Write one entry: the key builder runs first, then the value builder.
    ///
    /// Each builder must write exactly one item. Entries are kept in call
    /// order; keys are not sorted and duplicates are not rejected.
    ///
    /// # Errors
    ///
    /// Returns `Malformed` if the announced length is exceeded, or an error
    /// if either builder fails. A failed entry is rolled back entirely.
    pub fn entry<K, V>(&mut self, key: K, value: V) -> Result<(), CborError>
    where
        K: FnOnce(&mut Encoder) -> Result<(), CborError>,
        V: FnOnce(&mut Encoder) -> Result<(), CborError>,
    {
        if self.remaining == 0 {
            return Err(CborError::new(ErrorKind::Malformed, self.enc.buf.len()));
        }
        let entry_start = self.enc.buf.len();
        if let Err(err) = key(self.enc) {
            self.enc.buf.truncate(entry_start);
            return Err(err);
        }
        if let Err(err) = value(self.enc) {
            self.enc.buf.truncate(entry_start);
            return Err(err);
        }
        self.remaining -= 1;
        Ok(())
    }

    /// Write one entry with a text-string key, the common case.
    ///
    /// # Errors
    ///
    /// Same failure conditions as [`MapEncoder::entry`].
    pub fn text_entry<V>(&mut self, key: &str, value: V) -> Result<(), CborError>
    where
        V: FnOnce(&mut Encoder) -> Result<(), CborError>,
    {
        self.entry(|e| e.text(key), value)
    }
}
