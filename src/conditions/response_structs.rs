use serde::Deserialize;

/// Latest reading from the wind oracle.
///
/// The oracle also reports auxiliary fields (`azimuth`, `destination`,
/// `threshold_percent`) that this client does not consume; unknown fields
/// are skipped during deserialization.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ConditionsResponse {
    /// Heading the wind blows from, in degrees.
    pub wind_direction: f64,
    /// Wind speed in mph.
    pub wind_speed: f64,
    /// Whether conditions currently permit registration.
    pub is_open: bool,
}
