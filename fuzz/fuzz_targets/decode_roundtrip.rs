#![no_main]

use libfuzzer_sys::fuzz_target;

use fido_cbor::{decode, encode};

fuzz_target!(|data: &[u8]| {
    if let Ok(v) = decode(data) {
        // Anything we accept must re-encode and decode back to an equal
        // tree. The re-encoded form may be shorter than the input (the
        // encoder always writes shortest-form heads).
        let bytes = encode(&v).expect("re-encode of decoded value");
        assert!(bytes.len() <= data.len());
        let again = decode(&bytes).expect("decode of re-encoded bytes");
        assert_eq!(v, again);
    }
});
