use super::*;

#[test]
fn precision_rounds_half_away_from_zero() {
    let p = Precision::new(2).unwrap();
    assert_eq!(p.round(1.005_f64 + 1e-9), 1.01);
    assert_eq!(p.round(-2.345_6), -2.35);
    assert_eq!(p.round(3.0), 3.0);
    assert_eq!(Precision::new(0).unwrap().round(2.5), 3.0);
}

#[test]
fn precision_round_is_idempotent_and_never_negative_zero() {
    let p = Precision::new(3).unwrap();
    for v in [0.123_456_7, 512.000_49, -0.000_4, 1e12 + 0.5, 99.999_9] {
        let once = p.round(v);
        assert_eq!(p.round(once), once);
    }
    assert!(p.round(-0.000_4).is_sign_positive());
}

#[test]
fn precision_rejects_too_many_digits() {
    assert!(Precision::new(Precision::MAX_DIGITS).is_ok());
    assert!(Precision::new(Precision::MAX_DIGITS + 1).is_err());
    assert!(serde_json::from_str::<Precision>("9").is_err());
    assert_eq!(serde_json::from_str::<Precision>("2").unwrap().digits(), 2);
}

#[test]
fn stride_must_be_non_zero() {
    assert!(Stride::new(0).is_err());
    assert_eq!(Stride::new(4).unwrap().get(), 4);
    assert!(serde_json::from_str::<Stride>("0").is_err());
}

#[test]
fn truncate_factor_range_is_half_open() {
    assert!(TruncateFactor::new(0.0).is_err());
    assert!(TruncateFactor::new(-0.5).is_err());
    assert!(TruncateFactor::new(1.5).is_err());
    assert!(TruncateFactor::new(f64::NAN).is_err());
    assert_eq!(TruncateFactor::new(1.0).unwrap(), TruncateFactor::FULL);
    assert_eq!(TruncateFactor::new(0.5).unwrap().get(), 0.5);
}

#[test]
fn compact_number_prefers_integers() {
    assert_eq!(compact_number(100.0).unwrap().to_string(), "100");
    assert_eq!(compact_number(-0.0).unwrap().to_string(), "0");
    assert_eq!(compact_number(0.25).unwrap().to_string(), "0.25");
    assert!(compact_number(f64::INFINITY).is_none());
    assert_eq!(serde_json::to_string(&Compact(60.0)).unwrap(), "60");
    assert_eq!(serde_json::to_string(&Compact(29.97)).unwrap(), "29.97");
}

#[test]
fn saturating_constructors_clamp_into_range() {
    assert_eq!(Precision::saturating(2).digits(), 2);
    assert_eq!(Precision::saturating(200).digits(), Precision::MAX_DIGITS);
    assert_eq!(Stride::saturating(0).get(), 1);
    assert_eq!(Stride::saturating(4).get(), 4);
    assert_eq!(TruncateFactor::HALF.get(), 0.5);
}

#[test]
fn fitting_precision_is_the_fewest_exact_digits() {
    assert_eq!(Precision::fitting(632.0), Some(Precision::saturating(0)));
    assert_eq!(Precision::fitting(505.25), Some(Precision::saturating(2)));
    assert_eq!(Precision::fitting(-0.125), Some(Precision::saturating(3)));
    assert_eq!(Precision::fitting(1.0 / 3.0), None);
}
