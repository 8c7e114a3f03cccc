use std::time::Instant;

/// Longest step handed to animations; longer stalls are cut short
pub const MAX_FRAME_DELTA: f32 = 0.1;
/// How often the FPS readout refreshes, in seconds
pub const FPS_UPDATE_INTERVAL: f32 = 1.0;

/// Frame metadata - carries frame number and timing info
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInfo {
    pub number: u64,
    pub time: f32,
    pub delta: f32,
}

/// Hands out one `FrameInfo` per rendered frame
#[derive(Debug)]
pub struct FrameClock {
    frame_number: u64,
    start_time: Instant,
    last_frame_time: Instant,
}

impl FrameClock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            frame_number: 0,
            start_time: now,
            last_frame_time: now,
        }
    }

    pub fn tick(&mut self) -> FrameInfo {
        self.tick_at(Instant::now())
    }

    /// Advance to `now`, clamping the delta to `MAX_FRAME_DELTA`
    pub fn tick_at(&mut self, now: Instant) -> FrameInfo {
        let delta = now
            .saturating_duration_since(self.last_frame_time)
            .as_secs_f32()
            .min(MAX_FRAME_DELTA);
        let info = FrameInfo {
            number: self.frame_number,
            time: now.saturating_duration_since(self.start_time).as_secs_f32(),
            delta,
        };
        self.frame_number += 1;
        self.last_frame_time = now;
        info
    }

    pub fn frame_number(&self) -> u64 {
        self.frame_number
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Frames-per-second averaged over `FPS_UPDATE_INTERVAL`
#[derive(Debug, Clone, Copy, Default)]
pub struct FpsCounter {
    frames: u32,
    elapsed: f32,
    fps: f32,
}

impl FpsCounter {
    /// Count one frame, returns the new average when the window closes
    pub fn record(&mut self, delta: f32) -> Option<f32> {
        self.frames += 1;
        self.elapsed += delta;
        if self.elapsed < FPS_UPDATE_INTERVAL {
            return None;
        }
        self.fps = self.frames as f32 / self.elapsed;
        self.frames = 0;
        self.elapsed = 0.0;
        Some(self.fps)
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_clock_counts_frames() {
        let mut clock = FrameClock::new();
        let start = clock.start_time;
        let a = clock.tick_at(start + Duration::from_millis(16));
        let b = clock.tick_at(start + Duration::from_millis(32));
        assert_eq!(a.number, 0);
        assert_eq!(b.number, 1);
        assert!((b.delta - 0.016).abs() < 1e-4);
        assert!((b.time - 0.032).abs() < 1e-4);
        assert_eq!(clock.frame_number(), 2);
    }

    #[test]
    fn test_long_stall_is_clamped() {
        let mut clock = FrameClock::new();
        let start = clock.start_time;
        let info = clock.tick_at(start + Duration::from_secs(3));
        assert_eq!(info.delta, MAX_FRAME_DELTA);
        assert!((info.time - 3.0).abs() < 1e-4);
    }

    #[test]
    fn test_fps_counter_reports_once_per_interval() {
        let mut counter = FpsCounter::default();
        let mut reports = Vec::new();
        for _ in 0..150 {
            if let Some(fps) = counter.record(1.0 / 60.0) {
                reports.push(fps);
            }
        }
        assert_eq!(reports.len(), 2);
        assert!((counter.fps() - 60.0).abs() < 1.0);
    }
}
