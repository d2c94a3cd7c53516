//! Conversions between operator-facing units and signal units.

use crate::error::{WaveError, WaveResult};

/// Operator amplitude scale.
pub const PERCENT_AMPLITUDE_MIN: i64 = 1;
pub const PERCENT_AMPLITUDE_MAX: i64 = 100;

/// Device amplitude scale, kept below `i16::MAX` so full-scale samples never wrap.
pub const DEVICE_AMPLITUDE_MIN: i64 = 1;
pub const DEVICE_AMPLITUDE_MAX: i64 = 32_000;

/// Re-map `value` from `from_low..=from_high` onto `to_low..=to_high`.
///
/// The affine transform is evaluated in floating point and truncated toward
/// zero, so the inverse map is lossy by up to one unit of the coarser range.
/// Values outside the source range are extrapolated, not clamped; an
/// extrapolation that does not fit in `i64` is an error.
pub fn map_value(
    value: i64,
    from_low: i64,
    from_high: i64,
    to_low: i64,
    to_high: i64,
) -> WaveResult<i64> {
    if from_high == from_low {
        return Err(WaveError::DegenerateRange {
            low: from_low,
            high: from_high,
        });
    }

    // Differences of two i64 can need 65 bits.
    let offset = value as i128 - from_low as i128;
    let to_span = to_high as i128 - to_low as i128;
    let from_span = from_high as i128 - from_low as i128;

    let mapped = (offset as f64 * to_span as f64 / from_span as f64 + to_low as f64).trunc();
    if !mapped.is_finite() {
        return Err(WaveError::MappedOutOfRange(mapped));
    }
    i64::try_from(mapped as i128).map_err(|_| WaveError::MappedOutOfRange(mapped))
}

/// Convert an operator amplitude (1–100) into a device amplitude (1–32000).
pub fn amplitude_from_percent(percent: i64) -> WaveResult<i16> {
    if !(PERCENT_AMPLITUDE_MIN..=PERCENT_AMPLITUDE_MAX).contains(&percent) {
        return Err(WaveError::invalid(
            "amplitude",
            format!(
                "expected {}..={} percent, got {}",
                PERCENT_AMPLITUDE_MIN, PERCENT_AMPLITUDE_MAX, percent
            ),
        ));
    }
    let mapped = map_value(
        percent,
        PERCENT_AMPLITUDE_MIN,
        PERCENT_AMPLITUDE_MAX,
        DEVICE_AMPLITUDE_MIN,
        DEVICE_AMPLITUDE_MAX,
    )?;
    Ok(mapped as i16)
}

pub fn ms_to_seconds(ms: u64) -> f64 {
    ms as f64 / 1000.0
}

/// Rounds to the nearest millisecond; negative or NaN input yields zero.
pub fn seconds_to_ms(seconds: f64) -> u64 {
    if seconds.is_nan() || seconds <= 0.0 {
        return 0;
    }
    (seconds * 1000.0).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_map_onto_endpoints() {
        assert_eq!(map_value(1, 1, 100, 1, 32_000).unwrap(), 1);
        let top = map_value(100, 1, 100, 1, 32_000).unwrap();
        assert!((top - 32_000).abs() <= 1, "top = {}", top);
    }

    #[test]
    fn midpoints_truncate_toward_zero() {
        // 41 * 32000 / 100 = 13120 exactly.
        assert_eq!(map_value(41, 0, 100, 0, 32_000).unwrap(), 13_120);
        // 50 * 31999 / 99 + 1 = 16162.1
        assert_eq!(map_value(51, 1, 100, 1, 32_000).unwrap(), 16_162);
        // Descending target range.
        assert_eq!(map_value(25, 0, 100, 100, 0).unwrap(), 75);
    }

    #[test]
    fn empty_source_range_is_rejected() {
        assert_eq!(
            map_value(5, 3, 3, 0, 10),
            Err(WaveError::DegenerateRange { low: 3, high: 3 })
        );
    }

    #[test]
    fn full_width_ranges_do_not_overflow() {
        assert_eq!(map_value(0, i64::MIN, i64::MAX, 0, 100).unwrap(), 50);
        assert_eq!(map_value(i64::MIN, i64::MIN, i64::MAX, 0, 100).unwrap(), 0);
        assert_eq!(map_value(50, 0, 100, i64::MIN, i64::MAX).unwrap(), 0);
    }

    #[test]
    fn extrapolation_beyond_i64_is_rejected() {
        assert!(matches!(
            map_value(i64::MAX, -1, 1, 0, 10),
            Err(WaveError::MappedOutOfRange(_))
        ));
        assert!(matches!(
            map_value(i64::MIN, 0, 1, 0, i64::MAX),
            Err(WaveError::MappedOutOfRange(_))
        ));
    }

    #[test]
    fn percent_amplitude_bounds() {
        assert_eq!(amplitude_from_percent(1).unwrap(), 1);
        assert_eq!(amplitude_from_percent(100).unwrap(), 32_000);
        assert!(amplitude_from_percent(0).is_err());
        assert!(amplitude_from_percent(101).is_err());
    }

    #[test]
    fn millisecond_conversions() {
        assert_eq!(seconds_to_ms(2.5), 2_500);
        assert_eq!(seconds_to_ms(-1.0), 0);
        assert_eq!(ms_to_seconds(1_250), 1.25);
    }
}
