//! # fido-cbor
//!
//! Definite-length CBOR (RFC 8949) decoding and encoding with exact control
//! over the on-wire representation, built for embedding in WebAuthn
//! attestation processing, CTAP2 message parsing, and COSE key handling.
//!
//! ## Design principles
//!
//! - **The wire form is the value.**
//!   Decoded items keep everything needed to reproduce their exact input
//!   bytes: float width is part of a value's identity, map pairs stay in
//!   encounter order, and duplicate map keys survive a round-trip.
//! - **Preferred serialization on output.**
//!   The encoder always writes the shortest head that fits the argument, so
//!   `decode(encode(x)) == x` and re-encoding is byte-stable.
//! - **Errors are values.**
//!   Every failure is a [`CborError`] carrying one of four [`ErrorKind`]s
//!   and the byte offset where it was detected. Nothing panics on
//!   untrusted input.
//!
//! ## Scope
//!
//! Indefinite-length items and the break stop code are rejected as
//! [`ErrorKind::Unsupported`]; so are one-byte simple values outside
//! false/true/null/undefined. Tag numbers are preserved verbatim and tag
//! content is not interpreted. Text strings are kept as raw bytes and never
//! validated as UTF-8 by the codec; use [`CborValue::as_str`] for checked
//! access.
//!
//! ## Feature flags
//!
//! - `std` *(default)*: implements `std::error::Error` for [`CborError`].
//! - `simdutf8` *(default)*: SIMD-accelerated UTF-8 validation in the text
//!   convenience accessors.
//!
//! ## Safety
//!
//! This crate forbids `unsafe` code.
//!
//! ## `no_std`
//!
//! The crate is `no_std` compatible and requires only `alloc`.

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

extern crate alloc;

mod alloc_util;
mod decode;
mod encode;
mod error;
mod macros;
mod stream;
mod utf8;
mod value;

pub use crate::decode::{decode, decode_at};
pub use crate::encode::{encode, encode_into, ArrayEncoder, Encoder, MapEncoder};
pub use crate::error::{CborError, ErrorKind};
pub use crate::value::{
    CborInt, CborMap, CborValue, Float, FloatWidth, Simple, MAX_CBOR_INTEGER, MIN_CBOR_INTEGER,
};

#[doc(hidden)]
pub use crate::macros::__cbor_macro;

/// Re-export of the `half` crate providing the binary16 type used by
/// [`Float::Half`] constructors.
pub use half;
