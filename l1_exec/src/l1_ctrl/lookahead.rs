//! Lookahead distance calibration
//!
//! Maps the commanded cruise velocity to the L1 lookahead distance. The distance is chosen once at
//! startup and used both as the forward search radius and as the default goal radius.

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Lower speed bound of the proportional band
pub const LOW_SPEED_MS: f64 = 1.34;

/// Upper speed bound of the proportional band
pub const HIGH_SPEED_MS: f64 = 5.36;

/// Lookahead used below the proportional band
pub const MIN_LOOKAHEAD_M: f64 = 1.0;

/// Lookahead used above the proportional band
pub const MAX_LOOKAHEAD_M: f64 = 4.0;

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Get the lookahead distance for the given cruise velocity.
pub fn lookahead_distance(cruise_speed_ms: f64) -> f64 {
    if cruise_speed_ms < LOW_SPEED_MS {
        MIN_LOOKAHEAD_M
    } else if cruise_speed_ms < HIGH_SPEED_MS {
        cruise_speed_ms * 2.24 / 3.0
    } else {
        MAX_LOOKAHEAD_M
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_bands() {
        assert_eq!(lookahead_distance(0.5), 1.0);
        assert_eq!(lookahead_distance(-5.0), 1.0);
        assert!((lookahead_distance(3.0) - 2.24).abs() < 1e-12);
        assert_eq!(lookahead_distance(5.36), 4.0);
        assert_eq!(lookahead_distance(10.0), 4.0);
    }

    #[test]
    fn test_nearly_continuous_at_low_bound() {
        let below = lookahead_distance(LOW_SPEED_MS - 1e-9);
        let at = lookahead_distance(LOW_SPEED_MS);

        // 1.34 * 2.24 / 3 = 1.0005(3), so the step is tiny
        assert!((at - below).abs() < 1e-3);
        assert!(at >= below);
    }

    #[test]
    fn test_monotonic_in_band() {
        let mut prev = lookahead_distance(LOW_SPEED_MS);
        let mut v = LOW_SPEED_MS;
        while v < HIGH_SPEED_MS {
            let l = lookahead_distance(v);
            assert!(l >= prev);
            prev = l;
            v += 0.01;
        }
    }
}
