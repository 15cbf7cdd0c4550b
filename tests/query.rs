use fido_cbor::{decode, encode, CborValue, Float};

fn sample_map() -> CborValue {
    CborValue::map(vec![
        (CborValue::text("fmt"), CborValue::text("packed")),
        (CborValue::int(2), CborValue::bytes(vec![0xaa, 0xbb])),
        (
            CborValue::text("nested"),
            CborValue::array(vec![
                CborValue::int(10),
                CborValue::bool(true),
                CborValue::null(),
            ]),
        ),
    ])
}

#[test]
fn at_indexes_arrays_only() {
    let v = sample_map();
    let nested = v.lookup_text("nested").unwrap();
    assert_eq!(nested.at(0), Some(&CborValue::int(10)));
    assert_eq!(nested.at(1), Some(&CborValue::bool(true)));
    assert_eq!(nested.at(3), None);
    // Non-arrays have no indexed children.
    assert_eq!(v.at(0), None);
    assert_eq!(CborValue::int(1).at(0), None);
}

#[test]
fn lookup_uses_structural_key_equality() {
    let v = sample_map();
    assert_eq!(
        v.lookup(&CborValue::int(2)),
        Some(&CborValue::bytes(vec![0xaa, 0xbb]))
    );
    assert_eq!(
        v.lookup(&CborValue::text("fmt")),
        Some(&CborValue::text("packed"))
    );
    // An integer key never matches a text key with the same digits.
    assert_eq!(v.lookup(&CborValue::text("2")), None);
    // Lookup on a non-map is absent.
    assert_eq!(CborValue::int(1).lookup(&CborValue::int(1)), None);
}

#[test]
fn lookup_text_matches_byte_equal_text_keys() {
    let v = sample_map();
    assert_eq!(v.lookup_text("fmt"), Some(&CborValue::text("packed")));
    assert_eq!(v.lookup_text("missing"), None);
    // Does not match the integer key 2.
    assert_eq!(v.lookup_text("2"), None);
}

#[test]
fn duplicate_keys_first_match_wins() {
    let v = CborValue::map(vec![
        (CborValue::text("k"), CborValue::int(1)),
        (CborValue::text("k"), CborValue::int(2)),
    ]);
    assert_eq!(v.lookup_text("k"), Some(&CborValue::int(1)));
    assert_eq!(v.lookup(&CborValue::text("k")), Some(&CborValue::int(1)));

    // Both pairs survive a round-trip in order.
    let decoded = decode(&encode(&v).unwrap()).unwrap();
    assert_eq!(decoded, v);
    assert_eq!(decoded.as_map().unwrap().len(), 2);
}

#[test]
fn variant_predicates() {
    let cases: &[(CborValue, fn(&CborValue) -> bool)] = &[
        (CborValue::int(1), CborValue::is_int),
        (CborValue::bytes(vec![1]), CborValue::is_bytes),
        (CborValue::text("x"), CborValue::is_text),
        (CborValue::array(Vec::new()), CborValue::is_array),
        (CborValue::map(Vec::new()), CborValue::is_map),
        (CborValue::tag(0, CborValue::null()), CborValue::is_tag),
        (CborValue::float64(1.0), CborValue::is_float),
        (CborValue::null(), CborValue::is_simple),
    ];
    for (i, (value, pred)) in cases.iter().enumerate() {
        assert!(pred(value), "case {i}");
        for (j, (other, _)) in cases.iter().enumerate() {
            if i != j {
                assert!(!pred(other), "case {i} matched value {j}");
            }
        }
    }
}

#[test]
fn simple_predicates_and_accessors() {
    assert!(CborValue::bool(true).is_bool());
    assert!(CborValue::bool(false).is_bool());
    assert!(!CborValue::null().is_bool());
    assert!(CborValue::null().is_null());
    assert!(CborValue::undefined().is_undefined());

    assert_eq!(CborValue::bool(true).as_bool(), Some(true));
    assert_eq!(CborValue::null().as_bool(), None);
    assert_eq!(CborValue::int(1).as_bool(), None);
}

#[test]
fn accessors_return_none_on_other_variants() {
    let v = CborValue::int(5);
    assert_eq!(v.as_i64(), Some(5));
    assert_eq!(v.as_u64(), Some(5));
    assert_eq!(v.as_bytes(), None);
    assert_eq!(v.as_str(), None);
    assert_eq!(v.as_array(), None);
    assert_eq!(v.as_map(), None);
    assert_eq!(v.as_tag(), None);
    assert_eq!(v.as_float(), None);

    let t = CborValue::text("hi");
    assert_eq!(t.as_str(), Some("hi"));
    assert_eq!(t.as_text_bytes(), Some(&b"hi"[..]));
    assert_eq!(t.as_i64(), None);

    let tagged = CborValue::tag(7, CborValue::int(9));
    let (n, child) = tagged.as_tag().unwrap();
    assert_eq!(n, 7);
    assert_eq!(child, &CborValue::int(9));

    let f = CborValue::Float(Float::Half(0x3c00));
    assert_eq!(f.as_float(), Some(Float::Half(0x3c00)));
}

#[test]
fn map_iteration_follows_encounter_order() {
    let v = sample_map();
    let m = v.as_map().unwrap();
    let keys: Vec<&CborValue> = m.iter().map(|(k, _)| k).collect();
    assert_eq!(
        keys,
        [
            &CborValue::text("fmt"),
            &CborValue::int(2),
            &CborValue::text("nested"),
        ]
    );
}
