#![no_main]

use libfuzzer_sys::fuzz_target;

use fido_cbor::decode_at;

fuzz_target!(|data: &[u8]| {
    // Decoding arbitrary bytes must never panic, and a failing decode must
    // leave the cursor where it was.
    let mut cursor = 0;
    loop {
        let before = cursor;
        match decode_at(data, &mut cursor) {
            Ok(_) => {
                assert!(cursor > before);
                if cursor >= data.len() {
                    break;
                }
            }
            Err(_) => {
                assert_eq!(cursor, before);
                break;
            }
        }
    }
});
