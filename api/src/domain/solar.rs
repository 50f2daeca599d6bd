//! Daylight generation estimate for the dashboard
//!
//! Models the output of an installation as half a sine wave between sunrise
//! and sunset:
//!
//! `P(t) = Ppico · sin(π·(t − sunrise)/(sunset − sunrise))`
//!
//! It is a display aid only, not a calibrated forecast.

use serde::Serialize;

use crate::config::SolarWindow;
use crate::domain::validation::FieldErrors;
use crate::error::DomainError;

/// Finest curve resolution: one sample per minute
const MIN_STEP_HOURS: f64 = 1.0 / 60.0;
const MAX_SAMPLES: usize = 24 * 60;

/// Generation estimate for a given peak power
#[derive(Debug, Clone, Copy)]
pub struct SolarEstimate {
    peak_kw: f64,
    sunrise: f64,
    sunset: f64,
}

/// One sample of the daily curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurvePoint {
    pub hour: f64,
    pub power_kw: f64,
}

impl SolarEstimate {
    pub fn new(peak_kw: f64, window: SolarWindow) -> Result<Self, DomainError> {
        let mut errors = FieldErrors::new();
        errors.non_negative("peak_kw", peak_kw);
        if !(window.sunset_hour > window.sunrise_hour) {
            errors.add("sunset_hour", "Sunset must be after sunrise.");
        }
        if !(0.0..=24.0).contains(&window.sunrise_hour) || !(0.0..=24.0).contains(&window.sunset_hour)
        {
            errors.add("sunrise_hour", "Hours must be within 0 and 24.");
        }
        errors.into_result()?;

        Ok(Self {
            peak_kw,
            sunrise: window.sunrise_hour,
            sunset: window.sunset_hour,
        })
    }

    /// Instantaneous power at decimal hour `t`
    pub fn power_at(&self, t: f64) -> f64 {
        if t < self.sunrise || t > self.sunset {
            return 0.0;
        }
        let phase = std::f64::consts::PI * (t - self.sunrise) / (self.sunset - self.sunrise);
        (self.peak_kw * phase.sin()).max(0.0)
    }

    /// Curve sampled every `step_hours` from 0 to 24 inclusive, at most once a minute
    pub fn daily_curve(&self, step_hours: f64) -> Vec<CurvePoint> {
        let step = if step_hours.is_finite() && step_hours > 0.0 {
            step_hours.max(MIN_STEP_HOURS)
        } else {
            1.0
        };
        // Epsilon absorbs rounding in 24 / step for steps that divide the day
        let samples = ((24.0 / step + 1e-9).floor() as usize).min(MAX_SAMPLES);
        (0..=samples)
            .map(|i| {
                let hour = i as f64 * step;
                CurvePoint {
                    hour,
                    power_kw: self.power_at(hour),
                }
            })
            .collect()
    }

    /// Area under the curve: `Ppico · 2·(sunset − sunrise)/π`
    pub fn daily_energy_kwh(&self) -> f64 {
        self.peak_kw * 2.0 * (self.sunset - self.sunrise) / std::f64::consts::PI
    }
}
