use fido_cbor::{
    half::f16, CborInt, CborValue, ErrorKind, Float, FloatWidth, MAX_CBOR_INTEGER,
    MIN_CBOR_INTEGER,
};

#[test]
fn cbor_int_enforces_the_65_bit_range() {
    assert_eq!(CborInt::new(0).unwrap().value(), 0);
    assert_eq!(
        CborInt::new(MAX_CBOR_INTEGER).unwrap().value(),
        MAX_CBOR_INTEGER
    );
    assert_eq!(
        CborInt::new(MIN_CBOR_INTEGER).unwrap().value(),
        MIN_CBOR_INTEGER
    );

    let err = CborInt::new(MAX_CBOR_INTEGER + 1).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Malformed);
    let err = CborInt::new(MIN_CBOR_INTEGER - 1).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Malformed);

    assert!(CborValue::int_i128(i128::MAX).is_err());
    assert!(CborValue::int_i128(i128::MIN).is_err());
}

#[test]
fn cbor_int_narrowing_accessors() {
    let v = CborInt::from(u64::MAX);
    assert_eq!(v.as_u64(), Some(u64::MAX));
    assert_eq!(v.as_i64(), None);

    let v = CborInt::from(-1_i64);
    assert_eq!(v.as_i64(), Some(-1));
    assert_eq!(v.as_u64(), None);
}

#[test]
fn float_width_is_part_of_identity() {
    let half_zero = Float::from_f16(f16::from_f32(0.0));
    let single_zero = Float::from_f32(0.0);
    let double_zero = Float::from_f64(0.0);

    assert_ne!(
        CborValue::Float(half_zero),
        CborValue::Float(single_zero)
    );
    assert_ne!(
        CborValue::Float(single_zero),
        CborValue::Float(double_zero)
    );

    assert_eq!(half_zero.width(), FloatWidth::Half);
    assert_eq!(single_zero.width(), FloatWidth::Single);
    assert_eq!(double_zero.width(), FloatWidth::Double);
}

#[test]
fn float_equality_is_bit_sensitive() {
    // Signed zeros differ bitwise.
    assert_ne!(Float::from_f32(0.0), Float::from_f32(-0.0));
    // Distinct NaN payloads differ bitwise.
    assert_ne!(
        Float::Double(0x7ff8_0000_0000_0000),
        Float::Double(0x7ff8_0000_0000_0001)
    );
    // The same NaN payload compares equal.
    assert_eq!(
        Float::Double(0x7ff8_0000_0000_0001),
        Float::Double(0x7ff8_0000_0000_0001)
    );
}

#[test]
fn numeric_eq_crosses_widths() {
    assert!(Float::from_f16(f16::from_f32(1.0)).numeric_eq(Float::from_f64(1.0)));
    assert!(Float::from_f32(0.0).numeric_eq(Float::from_f32(-0.0)));
    // IEEE semantics: NaN never equals NaN.
    assert!(!Float::Double(0x7ff8_0000_0000_0000)
        .numeric_eq(Float::Double(0x7ff8_0000_0000_0000)));
    assert!(!Float::from_f16(f16::from_f32(1.5)).numeric_eq(Float::from_f64(2.5)));
}

#[test]
fn float_widening_preserves_half_values() {
    let subnormal = Float::Half(0x0001);
    assert_eq!(subnormal.to_f64(), 5.960_464_477_539_063e-8);

    let min_normal = Float::Half(0x0400);
    assert_eq!(min_normal.to_f64(), 0.000_061_035_156_25);

    assert!(Float::Half(0x7c00).to_f64().is_infinite());
    assert!(Float::Half(0x7e00).to_f64().is_nan());
}

#[test]
fn text_constructors_keep_raw_bytes() {
    let from_str = CborValue::text("IETF");
    let from_bytes = CborValue::text_bytes(b"IETF".to_vec());
    assert_eq!(from_str, from_bytes);

    let invalid = CborValue::text_bytes(vec![0xff]);
    assert!(invalid.is_text());
    assert_eq!(invalid.as_str(), None);
}

#[test]
fn structural_equality_is_positional() {
    let a = CborValue::map(vec![
        (CborValue::text("a"), CborValue::int(1)),
        (CborValue::text("b"), CborValue::int(2)),
    ]);
    let b = CborValue::map(vec![
        (CborValue::text("b"), CborValue::int(2)),
        (CborValue::text("a"), CborValue::int(1)),
    ]);
    // Same pairs, different order: not equal.
    assert_ne!(a, b);

    let x = CborValue::array(vec![CborValue::int(1), CborValue::int(2)]);
    let y = CborValue::array(vec![CborValue::int(2), CborValue::int(1)]);
    assert_ne!(x, y);

    // Bytes and Text with identical payloads are distinct variants.
    assert_ne!(
        CborValue::bytes(b"abc".to_vec()),
        CborValue::text("abc")
    );
}
