use crate::consts::{LOCAL_API_URL, PRODUCTION_API_URL};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BaseUrl {
    Production,
    Localhost,
}

impl BaseUrl {
    pub fn get_url(&self) -> String {
        match self {
            BaseUrl::Production => PRODUCTION_API_URL.to_string(),
            BaseUrl::Localhost => LOCAL_API_URL.to_string(),
        }
    }
}

/// 16-point compass rose, clockwise from north.
const COMPASS_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// Map a heading in degrees into `[0, 360)`. 360 wraps to 0, negative
/// headings wrap backwards.
pub fn normalize_degrees(degrees: f64) -> f64 {
    let wrapped = degrees % 360.0;
    if wrapped < 0.0 {
        wrapped + 360.0
    } else {
        wrapped
    }
}

/// Convert a heading in degrees to its 16-point compass name.
pub fn cardinal_direction(degrees: f64) -> &'static str {
    let heading = normalize_degrees(degrees);
    let index = ((heading / 22.5).round() as usize) % 16;
    COMPASS_POINTS[index]
}
