#![allow(clippy::float_cmp)]

use super::*;

// --- parse ---

#[test]
fn parse_integer_pair() {
    let p = Point::parse("10,100").unwrap();
    assert_eq!(p, Point::new(10.0, 100.0));
}

#[test]
fn parse_rounds_to_nearest() {
    let p = Point::parse("10.4,99.6").unwrap();
    assert_eq!(p, Point::new(10.0, 100.0));
}

#[test]
fn parse_rounds_half_away_from_zero() {
    assert_eq!(Point::parse("2.5,-2.5").unwrap(), Point::new(3.0, -3.0));
}

#[test]
fn parse_tolerates_spaces_around_fields() {
    assert_eq!(Point::parse(" 5 , 6 ").unwrap(), Point::new(5.0, 6.0));
}

#[test]
fn parse_rejects_single_field() {
    let err = Point::parse("10").unwrap_err();
    assert!(matches!(err, FormatError::PartCount { expected: 2, found: 1, .. }));
}

#[test]
fn parse_rejects_three_fields() {
    assert!(matches!(Point::parse("1,2,3"), Err(FormatError::PartCount { found: 3, .. })));
}

#[test]
fn parse_rejects_non_numeric() {
    assert!(matches!(Point::parse("a,2"), Err(FormatError::NotNumeric { .. })));
    assert!(matches!(Point::parse("1,"), Err(FormatError::NotNumeric { .. })));
}

#[test]
fn parse_rejects_infinite() {
    assert!(Point::parse("inf,2").is_err());
}

// --- Display ---

#[test]
fn display_rounds_to_integers() {
    assert_eq!(Point::new(10.4, 20.6).to_string(), "10,21");
}

#[test]
fn display_negative_zero_is_zero() {
    assert_eq!(Point::new(-0.2, 0.0).to_string(), "0,0");
}

#[test]
fn display_parse_round_trip_for_integer_points() {
    for (x, y) in [(0.0, 0.0), (1.0, 2.0), (640.0, 480.0), (-5.0, 12.0)] {
        let p = Point::new(x, y);
        assert_eq!(Point::parse(&p.to_string()).unwrap(), p);
    }
}

// --- offset / move ---

#[test]
fn offset_returns_new_point() {
    let p = Point::new(1.0, 2.0);
    let q = p.offset(3.0, -1.0);
    assert_eq!(p, Point::new(1.0, 2.0));
    assert_eq!(q, Point::new(4.0, 1.0));
}

#[test]
fn offset_by_adds_elementwise() {
    let p = Point::new(1.0, 2.0).offset_by(Point::new(10.0, 20.0));
    assert_eq!(p, Point::new(11.0, 22.0));
}

#[test]
fn move_by_mutates_in_place() {
    let mut p = Point::new(1.0, 2.0);
    p.move_by(-1.0, 3.0);
    assert_eq!(p, Point::new(0.0, 5.0));
}

#[test]
fn scaled_multiplies_both_axes() {
    assert_eq!(Point::new(10.0, 20.0).scaled(0.5), Point::new(5.0, 10.0));
}

#[test]
fn distance_to_is_euclidean() {
    assert_eq!(Point::new(0.0, 0.0).distance_to(Point::new(3.0, 4.0)), 5.0);
}
