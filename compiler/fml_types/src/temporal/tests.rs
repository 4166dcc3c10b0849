use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_parse_date_formats() {
    let rfc = parse_date("2020-01-15T10:30:00+01:00").unwrap();
    let basic = parse_date("2020-01-15T10:30:00+0100").unwrap();
    assert_eq!(rfc, basic);
    assert_eq!(format_date(&rfc), "2020-01-15T10:30:00+01:00");

    let plain = parse_date("2020-01-15").unwrap();
    assert_eq!(format_date(&plain), "2020-01-15T00:00:00+00:00");
}

#[test]
fn test_parse_date_rejects_other_text() {
    assert_eq!(parse_date("hallo"), None);
    assert_eq!(parse_date("P5M"), None);
    assert_eq!(parse_date("2020-13-01"), None);
}

#[test]
fn test_parse_duration() {
    assert_eq!(IsoDuration::parse("P5M"), Some(IsoDuration::new(5, 0)));
    assert_eq!(IsoDuration::parse("P1Y2M"), Some(IsoDuration::new(14, 0)));
    assert_eq!(
        IsoDuration::parse("P1W2DT3H4M5S"),
        Some(IsoDuration::new(0, 9 * 86_400 + 3 * 3600 + 4 * 60 + 5))
    );
    assert_eq!(IsoDuration::parse("PT90S"), Some(IsoDuration::new(0, 90)));
    assert_eq!(IsoDuration::parse("-P1M"), Some(IsoDuration::new(-1, 0)));
}

#[test]
fn test_parse_duration_rejects_malformed() {
    for text in ["P", "PT", "5M", "P5", "PM", "P1M1Y", "P1.5D", "hallo", "P5MT"] {
        assert_eq!(IsoDuration::parse(text), None, "{text}");
    }
}

#[test]
fn test_duration_display() {
    assert_eq!(IsoDuration::new(14, 0).to_string(), "P1Y2M");
    assert_eq!(IsoDuration::new(0, 90_061).to_string(), "P1DT1H1M1S");
    assert_eq!(IsoDuration::ZERO.to_string(), "PT0S");
    assert_eq!(IsoDuration::new(-5, 0).to_string(), "-P5M");
    assert_eq!(IsoDuration::new(0, -90_061).to_string(), "-P1DT1H1M1S");
}

#[test]
fn test_mixed_sign_duration_display() {
    assert_eq!(IsoDuration::new(1, -86_400).to_string(), "P1M-1D");
    assert_eq!(IsoDuration::new(-14, 90_000).to_string(), "P-1Y-2M1DT1H");
    assert_eq!(IsoDuration::new(2, -3_660).to_string(), "P2MT-1H-1M");
}

#[test]
fn test_duration_display_parses_back() {
    let durations = [
        IsoDuration::new(14, 90_061),
        IsoDuration::new(-3, -60),
        IsoDuration::new(1, -86_400),
        IsoDuration::new(-14, 90_000),
        IsoDuration::new(2, -3_660),
        IsoDuration::ZERO,
    ];
    for duration in durations {
        let text = duration.to_string();
        assert_eq!(IsoDuration::parse(&text), Some(duration), "{text}");
    }
}

#[test]
fn test_parse_signed_components() {
    assert_eq!(IsoDuration::parse("P1M-1D"), Some(IsoDuration::new(1, -86_400)));
    assert_eq!(IsoDuration::parse("-P-1M"), Some(IsoDuration::new(1, 0)));
    for text in ["P-M", "P--1D", "P1-M", "PT-"] {
        assert_eq!(IsoDuration::parse(text), None, "{text}");
    }
}

#[test]
fn test_month_arithmetic_round_trips_mid_month() {
    let date = parse_date("2020-01-15T00:00:00+00:00").unwrap();
    let five = IsoDuration::new(5, 0);
    let one = IsoDuration::new(1, 0);
    let moved = add_duration(&date, five).unwrap();
    assert_eq!(format_date(&moved), "2020-06-15T00:00:00+00:00");
    let back = sub_duration(&moved, one)
        .and_then(|d| add_duration(&d, one))
        .and_then(|d| sub_duration(&d, five))
        .unwrap();
    assert_eq!(back, date);
}

#[test]
fn test_month_arithmetic_clamps_day() {
    let date = parse_date("2021-01-31").unwrap();
    let moved = add_duration(&date, IsoDuration::new(1, 0)).unwrap();
    assert_eq!(format_date(&moved), "2021-02-28T00:00:00+00:00");
}

#[test]
fn test_between() {
    let a = parse_date("2020-01-02").unwrap();
    let b = parse_date("2020-01-01").unwrap();
    assert_eq!(between(&a, &b), IsoDuration::new(0, 86_400));
    assert!(between(&a, &a).is_zero());
}

#[test]
fn test_checked_overflow() {
    assert_eq!(IsoDuration::new(i64::MAX, 0).checked_mul(2), None);
    assert_eq!(IsoDuration::new(i64::MIN, 0).checked_neg(), None);
}
