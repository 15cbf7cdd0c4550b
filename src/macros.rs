//! CBOR construction macros.
//!
//! This module provides [`cbor_bytes!`](crate::cbor_bytes), a convenient
//! macro to build encoded CBOR bytes directly.

/// Construct encoded CBOR bytes using a JSON-like literal syntax.
///
/// Supports `null`, `true`, `false`, `undefined`, arrays, maps, and
/// arbitrary expressions (integers, floats, strings, byte slices,
/// [`CborValue`](crate::CborValue) trees). Bare identifiers in map-key
/// position become text keys; any other item form works as a key too.
///
/// The macro returns `Result<Vec<u8>, CborError>`.
#[macro_export]
macro_rules! cbor_bytes {
    ($($tt:tt)+) => {{
        (|| -> ::core::result::Result<$crate::__cbor_macro::Vec<u8>, $crate::CborError> {
            let mut __enc = $crate::Encoder::new();
            $crate::__cbor_bytes_into!(&mut __enc, $($tt)+)?;
            __enc.finish()
        })()
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __cbor_bytes_into {
    ($enc:expr, null) => { $enc.null() };
    ($enc:expr, undefined) => { $enc.undefined() };
    ($enc:expr, true) => { $enc.bool(true) };
    ($enc:expr, false) => { $enc.bool(false) };

    ($enc:expr, [ $($elem:tt),* $(,)? ]) => {{
        let __len = 0usize $(+ { let _ = stringify!($elem); 1usize })*;
        $enc.array(__len, |__arr| {
            $( $crate::__cbor_bytes_into!(__arr, $elem)?; )*
            ::core::result::Result::Ok(())
        })
    }};

    ($enc:expr, { $($key:tt : $value:tt),* $(,)? }) => {{
        let __len = 0usize $(+ { let _ = stringify!($key); let _ = stringify!($value); 1usize })*;
        $enc.map(__len, |__map| {
            $( $crate::__cbor_bytes_map_entry!(__map, $key, $value)?; )*
            ::core::result::Result::Ok(())
        })
    }};

    // fallback: encode arbitrary expression types via IntoCborItem
    ($enc:expr, $other:expr) => {{
        $enc.__encode_any($other)
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __cbor_bytes_map_entry {
    ($map:expr, $key:ident, $value:tt) => {
        $map.entry(
            |__k| __k.text(::core::stringify!($key)),
            |__v| $crate::__cbor_bytes_into!(__v, $value),
        )
    };
    ($map:expr, $key:tt, $value:tt) => {
        $map.entry(
            |__k| $crate::__cbor_bytes_into!(__k, $key),
            |__v| $crate::__cbor_bytes_into!(__v, $value),
        )
    };
}

/// Hidden support module used by `cbor_bytes!` expansions.
#[doc(hidden)]
#[allow(missing_docs)]
pub mod __cbor_macro {
    use crate::value::{CborValue, Float};
    use crate::{CborError, Encoder, ErrorKind};

    pub use alloc::vec::Vec;

    use alloc::string::String;

    pub trait IntoCborItem {
        fn into_cbor_item(self, enc: &mut Encoder) -> Result<(), CborError>;
    }

    impl IntoCborItem for bool {
        fn into_cbor_item(self, enc: &mut Encoder) -> Result<(), CborError> {
            enc.bool(self)
        }
    }

    impl IntoCborItem for () {
        fn into_cbor_item(self, enc: &mut Encoder) -> Result<(), CborError> {
            enc.null()
        }
    }

    impl<T: IntoCborItem> IntoCborItem for Option<T> {
        fn into_cbor_item(self, enc: &mut Encoder) -> Result<(), CborError> {
            match self {
                None => enc.null(),
                Some(v) => v.into_cbor_item(enc),
            }
        }
    }

    impl IntoCborItem for String {
        fn into_cbor_item(self, enc: &mut Encoder) -> Result<(), CborError> {
            enc.text(self.as_str())
        }
    }

    impl IntoCborItem for &String {
        fn into_cbor_item(self, enc: &mut Encoder) -> Result<(), CborError> {
            enc.text(self.as_str())
        }
    }

    impl IntoCborItem for &str {
        fn into_cbor_item(self, enc: &mut Encoder) -> Result<(), CborError> {
            enc.text(self)
        }
    }

    impl IntoCborItem for Vec<u8> {
        fn into_cbor_item(self, enc: &mut Encoder) -> Result<(), CborError> {
            enc.bytes(self.as_slice())
        }
    }

    impl IntoCborItem for &Vec<u8> {
        fn into_cbor_item(self, enc: &mut Encoder) -> Result<(), CborError> {
            enc.bytes(self.as_slice())
        }
    }

    impl IntoCborItem for &[u8] {
        fn into_cbor_item(self, enc: &mut Encoder) -> Result<(), CborError> {
            enc.bytes(self)
        }
    }

    impl<const N: usize> IntoCborItem for &[u8; N] {
        fn into_cbor_item(self, enc: &mut Encoder) -> Result<(), CborError> {
            enc.bytes(&self[..])
        }
    }

    impl IntoCborItem for Float {
        fn into_cbor_item(self, enc: &mut Encoder) -> Result<(), CborError> {
            enc.float(self)
        }
    }

    impl IntoCborItem for half::f16 {
        fn into_cbor_item(self, enc: &mut Encoder) -> Result<(), CborError> {
            enc.float16(self)
        }
    }

    impl IntoCborItem for f32 {
        fn into_cbor_item(self, enc: &mut Encoder) -> Result<(), CborError> {
            enc.float32(self)
        }
    }

    impl IntoCborItem for f64 {
        fn into_cbor_item(self, enc: &mut Encoder) -> Result<(), CborError> {
            enc.float64(self)
        }
    }

    impl IntoCborItem for CborValue {
        fn into_cbor_item(self, enc: &mut Encoder) -> Result<(), CborError> {
            enc.value(&self)
        }
    }

    impl IntoCborItem for &CborValue {
        fn into_cbor_item(self, enc: &mut Encoder) -> Result<(), CborError> {
            enc.value(self)
        }
    }

    macro_rules! impl_into_item_machine_int {
        ($($t:ty),* $(,)?) => {$(
            impl IntoCborItem for $t {
                fn into_cbor_item(self, enc: &mut Encoder) -> Result<(), CborError> {
                    enc.int(self)
                }
            }
        )*};
    }

    impl_into_item_machine_int!(i8, i16, i32, i64, u8, u16, u32, u64);

    impl IntoCborItem for i128 {
        fn into_cbor_item(self, enc: &mut Encoder) -> Result<(), CborError> {
            enc.int_i128(self)
        }
    }

    impl IntoCborItem for u128 {
        fn into_cbor_item(self, enc: &mut Encoder) -> Result<(), CborError> {
            let v = i128::try_from(self).map_err(|_| CborError::new(ErrorKind::Malformed, 0))?;
            enc.int_i128(v)
        }
    }

    impl IntoCborItem for usize {
        fn into_cbor_item(self, enc: &mut Encoder) -> Result<(), CborError> {
            let v = u64::try_from(self).map_err(|_| CborError::new(ErrorKind::Malformed, 0))?;
            enc.int(v)
        }
    }

    impl IntoCborItem for isize {
        fn into_cbor_item(self, enc: &mut Encoder) -> Result<(), CborError> {
            let v = i64::try_from(self).map_err(|_| CborError::new(ErrorKind::Malformed, 0))?;
            enc.int(v)
        }
    }
}
