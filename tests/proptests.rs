// Property-based round-trip tests.
//
// Strategies are intentionally conservative in size/depth to keep CI fast.
#![allow(clippy::unwrap_used, clippy::expect_used)]

use proptest::prelude::*;

use fido_cbor::{
    decode, decode_at, encode, CborMap, CborValue, Float, MAX_CBOR_INTEGER, MIN_CBOR_INTEGER,
};

fn arb_int() -> impl Strategy<Value = CborValue> {
    let machine = prop_oneof![
        any::<i64>().prop_map(|v| CborValue::int(v)),
        any::<u64>().prop_map(|v| CborValue::int(v)),
    ];
    let boundaries = prop_oneof![
        Just(CborValue::int(0)),
        Just(CborValue::int(23)),
        Just(CborValue::int(24)),
        Just(CborValue::int(255)),
        Just(CborValue::int(256)),
        Just(CborValue::int(65_535)),
        Just(CborValue::int(65_536)),
        Just(CborValue::int(u64::from(u32::MAX))),
        Just(CborValue::int(u64::from(u32::MAX) + 1)),
        Just(CborValue::int(-1)),
        Just(CborValue::int(-24)),
        Just(CborValue::int(-25)),
        Just(CborValue::int_i128(MIN_CBOR_INTEGER).unwrap()),
        Just(CborValue::int_i128(MAX_CBOR_INTEGER).unwrap()),
    ];
    prop_oneof![
        8 => machine,
        2 => boundaries,
    ]
}

fn arb_float() -> impl Strategy<Value = CborValue> {
    // Raw bit patterns so every NaN payload, infinity, and signed zero is
    // covered at each width.
    prop_oneof![
        any::<u16>().prop_map(|bits| CborValue::Float(Float::Half(bits))),
        any::<u32>().prop_map(|bits| CborValue::Float(Float::Single(bits))),
        any::<u64>().prop_map(|bits| CborValue::Float(Float::Double(bits))),
    ]
}

fn arb_bytes() -> impl Strategy<Value = Vec<u8>> {
    prop_oneof![
        8 => proptest::collection::vec(any::<u8>(), 0..=48),
        1 => proptest::collection::vec(any::<u8>(), 23),
        1 => proptest::collection::vec(any::<u8>(), 24),
    ]
}

fn arb_leaf() -> impl Strategy<Value = CborValue> {
    prop_oneof![
        6 => arb_int(),
        4 => arb_bytes().prop_map(|b| CborValue::bytes(b)),
        // Text payloads are arbitrary bytes by design.
        4 => arb_bytes().prop_map(|b| CborValue::text_bytes(b)),
        2 => any::<String>().prop_map(|s| CborValue::text(s)),
        4 => arb_float(),
        2 => any::<bool>().prop_map(CborValue::bool),
        1 => Just(CborValue::null()),
        1 => Just(CborValue::undefined()),
    ]
}

fn arb_value() -> impl Strategy<Value = CborValue> {
    arb_leaf().prop_recursive(4, 96, 8, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 0..8).prop_map(CborValue::array),
            proptest::collection::vec((inner.clone(), inner.clone()), 0..6).prop_map(|pairs| {
                CborValue::map(CborMap::from_entries(pairs))
            }),
            (any::<u64>(), inner).prop_map(|(n, v)| CborValue::tag(n, v)),
        ]
    })
}

proptest! {
    #[test]
    fn roundtrip_preserves_structure(v in arb_value()) {
        let bytes = encode(&v).unwrap();
        let decoded = decode(&bytes).unwrap();
        prop_assert_eq!(&decoded, &v);

        // Re-encoding any equal tree yields the same bytes (shortest-head
        // preferred serialization is deterministic).
        let bytes2 = encode(&decoded).unwrap();
        prop_assert_eq!(bytes, bytes2);
    }

    #[test]
    fn cursor_advances_by_encoded_length(v in arb_value(), junk in proptest::collection::vec(any::<u8>(), 0..16)) {
        let bytes = encode(&v).unwrap();
        let item_len = bytes.len();

        let mut wire = bytes;
        wire.extend_from_slice(&junk);

        let mut cursor = 0;
        let decoded = decode_at(&wire, &mut cursor).unwrap();
        prop_assert_eq!(cursor, item_len);
        prop_assert_eq!(encode(&decoded).unwrap().len(), item_len);
    }

    #[test]
    fn decode_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..512)) {
        let _ = decode(&bytes);
        let mut cursor = 0;
        let _ = decode_at(&bytes, &mut cursor);
    }

    #[test]
    fn tag_wrapping_is_transparent(n in any::<u64>(), v in arb_leaf()) {
        let tagged = CborValue::tag(n, v.clone());
        let decoded = decode(&encode(&tagged).unwrap()).unwrap();
        let (number, child) = decoded.as_tag().unwrap();
        prop_assert_eq!(number, n);
        let child_roundtrip = decode(&encode(&v).unwrap()).unwrap();
        prop_assert_eq!(child, &child_roundtrip);
    }
}
