//! Solar position and the sunlight colour curve.
//!
//! [`Spa`] asks the `solar-positioning` crate for the sun's position using
//! the NREL solar position algorithm, and [`solar_lighting`] maps the
//! current altitude relative to the altitude at 12:00 UTC onto a colour
//! temperature and a brightness percentage.

use serde::{Deserialize, Serialize};
use solar_positioning::spa;

use crate::error::SolarError;
use crate::time::Timestamp;

/// Geographic position used for solar computations, in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// East-positive longitude, `-180.0..=180.0`.
    pub longitude: f64,
    /// North-positive latitude, `-90.0..=90.0`.
    pub latitude: f64,
}

/// Source of solar altitudes.
///
/// Implemented by [`Spa`] and by any `Fn(longitude, latitude, instant) -> degrees`,
/// which lets callers substitute fixed angles.
pub trait SolarAltitude {
    /// Sun altitude above the horizon in degrees.
    ///
    /// # Errors
    ///
    /// Returns [`SolarError`] when no position can be computed for the
    /// given coordinates and instant.
    fn altitude(&self, longitude: f64, latitude: f64, instant: Timestamp) -> Result<f64, SolarError>;
}

/// Difference between terrestrial and universal time, in seconds.
/// Fixed estimate for the 2020s.
const DELTA_T: f64 = 69.0;

/// The NREL solar position algorithm at sea level, without refraction.
#[derive(Debug, Clone, Copy, Default)]
pub struct Spa;

impl SolarAltitude for Spa {
    fn altitude(&self, longitude: f64, latitude: f64, instant: Timestamp) -> Result<f64, SolarError> {
        let position = spa::solar_position(instant, latitude, longitude, 0.0, DELTA_T, None)
            .map_err(|err| SolarError(err.to_string()))?;
        Ok(90.0 - position.zenith_angle())
    }
}

impl<F> SolarAltitude for F
where
    F: Fn(f64, f64, Timestamp) -> f64,
{
    fn altitude(&self, longitude: f64, latitude: f64, instant: Timestamp) -> Result<f64, SolarError> {
        Ok(self(longitude, latitude, instant))
    }
}

/// Lower bound applied to the current altitude before dividing.
///
/// Keeps the ratio strictly positive at night instead of zero.
pub const MIN_ANGLE: f64 = 0.01;
/// Upper bound applied to the current altitude.
pub const MAX_ANGLE: f64 = 180.0;

/// Colour temperature when the sun is at or below the horizon.
pub const BASE_KELVIN: f64 = 2500.0;
/// Kelvin added when the sun reaches its noon altitude.
pub const KELVIN_SPAN: f64 = 2000.0;
/// Upper clamp on the colour temperature.
pub const MAX_KELVIN: f64 = 6500.0;
/// Upper clamp on the brightness percentage.
pub const MAX_BRIGHTNESS_PCT: f64 = 100.0;

/// Colour temperature and brightness for a light following the sun.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SolarLighting {
    pub kelvin: i32,
    pub brightness_pct: i32,
}

/// 12:00:00 UTC on the day of `instant`.
///
/// This is a fixed daily reference, not the true solar noon.
#[must_use]
pub fn noon_of(instant: Timestamp) -> Timestamp {
    instant
        .date_naive()
        .and_hms_opt(12, 0, 0)
        .map_or(instant, |noon| noon.and_utc())
}

/// Ratio of the clamped current altitude to the noon altitude.
///
/// Not clamped itself: a negative or tiny `angle_noon` (polar winter)
/// yields ratios outside `0.0..=1.0`.
#[must_use]
pub fn fraction(angle_now: f64, angle_noon: f64) -> f64 {
    angle_now.clamp(MIN_ANGLE, MAX_ANGLE) / angle_noon
}

/// Map a pair of altitudes onto a [`SolarLighting`].
///
/// Only upper clamps are applied (6500 K and 100 %).
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn lighting_from_angles(angle_now: f64, angle_noon: f64) -> SolarLighting {
    let fraction = fraction(angle_now, angle_noon);

    let kelvin = (BASE_KELVIN + (KELVIN_SPAN * fraction).round()).min(MAX_KELVIN);
    let brightness = (50.0 + 50.0 * fraction).round().min(MAX_BRIGHTNESS_PCT);

    // `as` saturates, so a huge negative ratio cannot overflow.
    SolarLighting {
        kelvin: kelvin as i32,
        brightness_pct: brightness as i32,
    }
}

/// Compute the sunlight colour for `location` at `now`.
///
/// # Errors
///
/// Propagates the [`SolarError`] of either altitude lookup.
pub fn solar_lighting<A>(
    source: &A,
    location: Location,
    now: Timestamp,
) -> Result<SolarLighting, SolarError>
where
    A: SolarAltitude + ?Sized,
{
    let angle_now = source.altitude(location.longitude, location.latitude, now)?;
    let angle_noon = source.altitude(location.longitude, location.latitude, noon_of(now))?;
    Ok(lighting_from_angles(angle_now, angle_noon))
}
