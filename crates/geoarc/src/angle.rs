use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

/// Wraps `n` into the half-open interval `[min, max)`.
#[inline]
pub(crate) fn wrap(n: f64, min: f64, max: f64) -> f64 {
    if n >= min && n < max { n } else { modulo(n - min, max - min) + min }
}

/// Non-negative remainder of `x / m`.
#[inline]
fn modulo(x: f64, m: f64) -> f64 { ((x % m) + m) % m }

/// Longitude difference `b - a` in radians, wrapped into `[-π, π)`.
#[inline]
pub(crate) fn delta_lng(a: f64, b: f64) -> f64 { wrap(b - a, -PI, PI) }

/// Mercator projection of a latitude in radians. Infinite at the poles.
#[inline]
pub(crate) fn mercator(lat: f64) -> f64 { (lat * 0.5 + FRAC_PI_4).tan().ln() }

/// Latitude in radians of a Mercator ordinate.
#[inline]
pub(crate) fn inverse_mercator(y: f64) -> f64 { 2.0 * y.exp().atan() - FRAC_PI_2 }

/// Returns true if `lat` (radians) is at or beyond either pole.
#[inline]
pub(crate) fn is_pole(lat: f64) -> bool { lat <= -FRAC_PI_2 || lat >= FRAC_PI_2 }
