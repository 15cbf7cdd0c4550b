use core::fmt;

/// Classification of a codec failure.
///
/// The taxonomy is deliberately flat and string-free so errors stay `Copy`,
/// work under `no_std`, and can be matched exhaustively by embedding code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The head's additional-information value is 28, 29, or 30.
    ///
    /// These values are reserved by RFC 8949 and never well-formed.
    ReservedAdditionalInfo,

    /// The input is structurally impossible for the definite-length subset.
    ///
    /// Covers truncated payloads, trailing bytes after a single-item decode,
    /// major type 7 with ai = 24 and a small simple-value argument (< 32),
    /// major type 7 with ai in 0..=19, and encoder builder length mismatches.
    Malformed,

    /// The input is legal CBOR outside the supported subset.
    ///
    /// Covers indefinite-length items and the break stop code (ai = 31), and
    /// one-byte simple values >= 32, which this codec does not model.
    Unsupported,

    /// A fallible allocation failed while building owned structures.
    AllocationFailed,
}

/// A codec error carrying a stable [`ErrorKind`] and a byte offset.
///
/// Offsets refer to the byte position in the input (for decoding) or the
/// output written so far (for encoding) where the error was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CborError {
    /// The error kind.
    pub kind: ErrorKind,
    /// Byte offset where the error was detected.
    pub offset: usize,
}

impl CborError {
    /// Construct an error at `offset`.
    #[inline]
    #[must_use]
    pub const fn new(kind: ErrorKind, offset: usize) -> Self {
        Self { kind, offset }
    }
}

impl fmt::Display for CborError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self.kind {
            ErrorKind::ReservedAdditionalInfo => "reserved additional-info value",
            ErrorKind::Malformed => "malformed CBOR item",
            ErrorKind::Unsupported => "unsupported CBOR construct",
            ErrorKind::AllocationFailed => "allocation failed",
        };
        write!(f, "cbor error at {}: {msg}", self.offset)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CborError {}
