use chrono::{DateTime, Utc};

use crate::{
    conditions::ConditionsResponse,
    helpers::{cardinal_direction, normalize_degrees},
};

/// Whether the feed has ever produced a reading.
///
/// `Warming` ends on the first successful fetch and never comes back, no
/// matter how many fetches fail afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedPhase {
    /// No reading has ever arrived; display a loading state.
    Warming,
    /// At least one reading has arrived; fields are last-known-good.
    Live,
}

/// Latest known state of the wind feed.
///
/// Single-writer: only the monitor's poll loop mutates this, by overwriting
/// the shared copy in place on each successful fetch. Failed fetches leave
/// every field untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionsSnapshot {
    /// When the current reading was fetched. `None` until the first success.
    pub updated_at: Option<DateTime<Utc>>,
    /// Wind heading in degrees, normalized into `[0, 360)`.
    pub direction_degrees: f64,
    /// Wind speed in mph, never negative.
    pub speed: f64,
    /// Whether registration is currently permitted.
    pub is_open: bool,
    pub phase: FeedPhase,
}

impl Default for ConditionsSnapshot {
    fn default() -> Self {
        ConditionsSnapshot {
            updated_at: None,
            direction_degrees: 0.0,
            speed: 0.0,
            is_open: false,
            phase: FeedPhase::Warming,
        }
    }
}

impl ConditionsSnapshot {
    pub fn is_warming(&self) -> bool {
        self.phase == FeedPhase::Warming
    }

    /// Compass name for the current heading.
    pub fn cardinal(&self) -> &'static str {
        cardinal_direction(self.direction_degrees)
    }

    /// Overwrite this snapshot with a fresh reading.
    pub(crate) fn absorb(&mut self, reading: &ConditionsResponse, fetched_at: DateTime<Utc>) {
        self.updated_at = Some(fetched_at);
        self.direction_degrees = normalize_degrees(reading.wind_direction);
        self.speed = reading.wind_speed.max(0.0);
        self.is_open = reading.is_open;
        self.phase = FeedPhase::Live;
    }
}
