use std::ops::RangeInclusive;

use anyhow::{ensure, Result};

/// Values the scale slider offers
pub const SCALE_RANGE: RangeInclusive<f32> = 0.5..=2.0;

/// Uniform scale of the fridge, always positive
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct ScaleFactor(f32);

impl ScaleFactor {
    pub const ONE: ScaleFactor = ScaleFactor(1.0);

    pub fn new(value: f32) -> Result<Self> {
        ensure!(
            value.is_finite() && value > 0.0,
            "scale must be a positive number, got {}",
            value
        );
        Ok(Self(value))
    }

    pub fn get(self) -> f32 {
        self.0
    }

    /// Vertical offset applied to a fridge of `base_height` at this scale
    pub fn grounded_offset(self, base_height: f32) -> f32 {
        base_height * (self.0 - 1.0) / 2.0
    }
}

impl Default for ScaleFactor {
    fn default() -> Self {
        Self::ONE
    }
}
