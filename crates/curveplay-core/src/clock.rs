//! Scroll clock: turns elapsed time into subdivision steps and tells the
//! engine when a whole section has scrolled past.

use crate::buffer::BufferEnd;
use crate::{Error, Result};

#[derive(Debug, Clone)]
pub struct ScrollClock {
    /// Seconds for the curve to scroll across the whole display
    period_secs: f64,
    /// -1, 0 (paused) or +1
    direction: f64,
    subdivisions: u32,
    display_sections: u32,
    /// Subdivisions elapsed in the current section
    step: i64,
    /// Seconds elapsed in the current section
    phase: f64,
}

impl ScrollClock {
    pub fn new(period_secs: f64, direction: f64, subdivisions: u32, display_sections: u32) -> Result<Self> {
        if subdivisions == 0 {
            return Err(Error::InvalidConfiguration(
                "subdivision count must be positive".to_string(),
            ));
        }
        if display_sections == 0 {
            return Err(Error::InvalidConfiguration(
                "display section count must be positive".to_string(),
            ));
        }
        let mut clock = Self {
            period_secs: 1.0,
            direction: 0.0,
            subdivisions,
            display_sections,
            step: 0,
            phase: 0.0,
        };
        clock.set_period(period_secs)?;
        clock.set_direction(direction);
        Ok(clock)
    }

    pub fn period(&self) -> f64 {
        self.period_secs
    }

    pub fn set_period(&mut self, period_secs: f64) -> Result<()> {
        if !period_secs.is_finite() || period_secs <= 0.0 {
            return Err(Error::InvalidConfiguration(format!(
                "scroll period must be positive, got {}",
                period_secs
            )));
        }
        self.period_secs = period_secs;
        Ok(())
    }

    pub fn direction(&self) -> f64 {
        self.direction
    }

    /// Any sign is accepted; the magnitude is dropped
    pub fn set_direction(&mut self, direction: f64) {
        self.direction = if direction > 0.0 {
            1.0
        } else if direction < 0.0 {
            -1.0
        } else {
            0.0
        };
    }

    pub fn subdivisions(&self) -> u32 {
        self.subdivisions
    }

    /// Seconds per subdivision step
    pub fn step_duration(&self) -> f64 {
        self.period_secs / (self.subdivisions as f64 * self.display_sections as f64)
    }

    pub fn step(&self) -> i64 {
        self.step
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Progress through the current section in `[0, 1]`
    pub fn step_fraction(&self) -> f64 {
        self.step as f64 / self.subdivisions as f64
    }

    /// Advance by `dt` seconds. Returns the buffer end that needs a new point
    /// when a section boundary was crossed.
    pub fn tick(&mut self, dt: f64) -> Option<BufferEnd> {
        self.phase += dt * self.direction;
        self.step = (self.phase / self.step_duration()).floor() as i64;

        if self.step >= self.subdivisions as i64 {
            self.step = 0;
            self.phase = 0.0;
            Some(BufferEnd::Tail)
        } else if self.step < 0 {
            self.step = self.subdivisions as i64;
            self.phase = self.step as f64 * self.step_duration();
            Some(BufferEnd::Head)
        } else {
            None
        }
    }
}
