/// Cubic ease-out: fast start, settles into the target
pub fn ease_out_cubic(p: f32) -> f32 {
    let rest = 1.0 - p.clamp(0.0, 1.0);
    1.0 - rest * rest * rest
}

/// One-shot scalar animation driven by frame deltas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    from: f32,
    to: f32,
    duration: f32,
    elapsed: f32,
}

impl Tween {
    pub fn new(from: f32, to: f32, duration: f32) -> Self {
        Self {
            from,
            to,
            duration,
            elapsed: 0.0,
        }
    }

    /// Advance by `delta` seconds, returns true once the tween has run out
    pub fn tick(&mut self, delta: f32) -> bool {
        self.elapsed += delta.max(0.0);
        self.is_finished()
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Get progress [0, 1]
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        (self.elapsed / self.duration).min(1.0)
    }

    /// Eased value at the current progress
    pub fn value(&self) -> f32 {
        if self.is_finished() {
            return self.to;
        }
        self.from + (self.to - self.from) * ease_out_cubic(self.progress())
    }

    pub fn target(&self) -> f32 {
        self.to
    }
}
