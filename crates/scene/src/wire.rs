//! Field names and value helpers shared by the serde derives and the decoder.

use serde::{Deserialize, Deserializer, Serializer, de, ser};

pub(crate) const ITEMS: &str = "items";
pub(crate) const DISCRIMINATOR: &str = "item";
pub(crate) const POINTS: &str = "points";
pub(crate) const COORDS: [&str; 2] = ["x", "y"];

// Every integer up to 2^24 is exact in an f32.
const MAX_EXACT_INT: f32 = 16_777_216.0;

/// Writes integral coordinates as JSON integers (`12`, not `12.0`) and the
/// rest with the shortest f32 representation. NaN and infinities are rejected.
pub(crate) fn coord<S: Serializer>(value: &f32, serializer: S) -> Result<S::Ok, S::Error> {
    if !value.is_finite() {
        return Err(ser::Error::custom(format_args!(
            "coordinate {value} is not finite"
        )));
    }
    if value.fract() == 0.0 && value.abs() < MAX_EXACT_INT {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f32(*value)
    }
}

/// Reads an optional attribute, treating an explicit `null` like an absent key.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn narrow<E: de::Error>(value: f64) -> Result<f32, E> {
    let narrowed = value as f32;
    if narrowed.is_finite() {
        Ok(narrowed)
    } else {
        Err(E::custom(format_args!(
            "{value:e} is out of range for a 32-bit coordinate"
        )))
    }
}

/// Reads a required coordinate, rejecting numbers that overflow an f32.
pub(crate) fn finite<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f32, D::Error> {
    narrow(f64::deserialize(deserializer)?)
}

/// Like `finite`, with `null` or a missing key read as zero.
pub(crate) fn finite_or_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f32, D::Error> {
    Option::<f64>::deserialize(deserializer)?.map_or(Ok(0.0), narrow)
}

pub(crate) fn is_zero(value: &f32) -> bool {
    *value == 0.0
}

pub(crate) fn is_false(value: &bool) -> bool {
    !*value
}

#[cfg(test)]
mod test {
    use super::*;

    fn try_coord_json(value: f32) -> Result<String, serde_json::Error> {
        let mut out = Vec::new();
        let mut serializer = serde_json::Serializer::new(&mut out);
        coord(&value, &mut serializer)?;
        Ok(String::from_utf8(out).unwrap())
    }

    fn coord_json(value: f32) -> String {
        try_coord_json(value).unwrap()
    }

    fn read_coord(json: &str) -> Result<f32, serde_json::Error> {
        finite(&mut serde_json::Deserializer::from_str(json))
    }

    #[test]
    fn integral_coords_are_written_without_fraction() {
        assert_eq!(coord_json(12.0), "12");
        assert_eq!(coord_json(-3.0), "-3");
        assert_eq!(coord_json(0.0), "0");
    }

    #[test]
    fn fractional_coords_use_shortest_f32_form() {
        assert_eq!(coord_json(3.4), "3.4");
        assert_eq!(coord_json(1.3), "1.3");
        assert_eq!(coord_json(-0.5), "-0.5");
    }

    #[test]
    fn non_finite_coords_are_not_written() {
        assert!(try_coord_json(f32::NAN).is_err());
        assert!(try_coord_json(f32::INFINITY).is_err());
        assert!(try_coord_json(f32::NEG_INFINITY).is_err());
    }

    #[test]
    fn coords_beyond_f32_range_are_rejected() {
        assert_eq!(read_coord("12").unwrap(), 12.0);
        assert_eq!(read_coord("3.4").unwrap(), 3.4);
        assert_eq!(read_coord("-3.4e38").unwrap(), -3.4e38);
        assert!(read_coord("1e300").is_err());
        assert!(read_coord("-1e39").is_err());
        assert!(read_coord("null").is_err());
    }

    #[test]
    fn optional_offsets_accept_null_but_not_overflow() {
        let read = |json: &str| finite_or_zero(&mut serde_json::Deserializer::from_str(json));
        assert_eq!(read("null").unwrap(), 0.0);
        assert_eq!(read("0.5").unwrap(), 0.5);
        assert!(read("1e300").is_err());
    }
}
