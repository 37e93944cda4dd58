//! Literal coordinate queries
//!
//! A query such as `32.0853,34.7818` or `32.0853 34.7818` is already a
//! location and never goes to a geocoder.

use crate::geo::Coordinates;

/// Parse a `lat,lng` or `lat lng` literal
///
/// Each component is an optionally negative decimal (`-12`, `31.5`). The
/// pair must be inside the valid coordinate ranges, otherwise the query is
/// treated as free text.
pub fn parse_literal(query: &str) -> Option<Coordinates> {
    let s = query.trim();

    let (lat, lng) = match s.split_once(',') {
        Some((lat, lng)) => (lat.trim(), lng.trim()),
        None => {
            let mut parts = s.split_whitespace();
            let lat = parts.next()?;
            let lng = parts.next()?;
            if parts.next().is_some() {
                return None;
            }
            (lat, lng)
        }
    };

    if !is_plain_decimal(lat) || !is_plain_decimal(lng) {
        return None;
    }

    let coords = Coordinates::new(lat.parse().ok()?, lng.parse().ok()?);
    coords.is_valid().then_some(coords)
}

/// `-?\d+(\.\d+)?`
fn is_plain_decimal(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    let (whole, frac) = match digits.split_once('.') {
        Some((whole, frac)) => (whole, Some(frac)),
        None => (digits, None),
    };

    let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    all_digits(whole) && frac.map_or(true, all_digits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_comma_separated() {
        let c = parse_literal("32.0853,34.7818").unwrap();
        assert_relative_eq!(c.lat, 32.0853);
        assert_relative_eq!(c.lng, 34.7818);
    }

    #[test]
    fn test_space_separated() {
        let c = parse_literal("  -33.8688 151.2093 ").unwrap();
        assert_relative_eq!(c.lat, -33.8688);
        assert_relative_eq!(c.lng, 151.2093);
    }

    #[test]
    fn test_comma_with_whitespace_and_integers() {
        let c = parse_literal("31 , 35").unwrap();
        assert_relative_eq!(c.lat, 31.0);
        assert_relative_eq!(c.lng, 35.0);
    }

    #[test]
    fn test_range_boundaries() {
        assert!(parse_literal("90,180").is_some());
        assert!(parse_literal("-90,-180").is_some());
    }

    #[test]
    fn test_out_of_range_is_free_text() {
        assert!(parse_literal("91,200").is_none());
        assert!(parse_literal("45,181").is_none());
        assert!(parse_literal("-90.5 10").is_none());
    }

    #[test]
    fn test_rejects_non_decimal_forms() {
        assert!(parse_literal("1e5,2").is_none());
        assert!(parse_literal("+32,34").is_none());
        assert!(parse_literal(".5,34").is_none());
        assert!(parse_literal("32.,34").is_none());
        assert!(parse_literal("NaN,34").is_none());
        assert!(parse_literal("32,,34").is_none());
        assert!(parse_literal("32 34 10").is_none());
    }

    #[test]
    fn test_free_text() {
        assert!(parse_literal("Tel Aviv").is_none());
        assert!(parse_literal("Route 66, Kingman").is_none());
        assert!(parse_literal("").is_none());
        assert!(parse_literal("32").is_none());
    }
}
