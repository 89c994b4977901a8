use std::time::{Duration, Instant};

/// Mesure le temps entre deux frames et le nombre de frames par seconde.
pub struct DeltaTimer {
    last_frame_time: Instant,
    delta_time: f32,
    /// Borne haute du delta (évite un saut de caméra après une pause)
    max_delta: f32,
    frames_this_second: u32,
    fps_timer: Instant,
    fps: f32,
}

impl Default for DeltaTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl DeltaTimer {
    pub const DEFAULT_MAX_DELTA: f32 = 1.0 / 30.0;

    pub fn new() -> Self {
        Self::with_max_delta(Self::DEFAULT_MAX_DELTA)
    }

    pub fn with_max_delta(max_delta: f32) -> Self {
        let now = Instant::now();
        Self {
            last_frame_time: now,
            delta_time: 0.0,
            max_delta,
            frames_this_second: 0,
            fps_timer: now,
            fps: 0.0,
        }
    }

    pub fn update(&mut self) -> f32 {
        self.tick(Instant::now())
    }

    fn tick(&mut self, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(self.last_frame_time);
        self.delta_time = elapsed.as_secs_f32().min(self.max_delta);
        self.last_frame_time = now;
        self.frames_this_second += 1;

        let window = now.saturating_duration_since(self.fps_timer);
        if window >= Duration::from_secs(1) {
            self.fps = self.frames_this_second as f32 / window.as_secs_f32();
            self.frames_this_second = 0;
            self.fps_timer = now;
        }

        self.delta_time
    }

    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    pub fn frame_time_ms(&self) -> f32 {
        self.delta_time * 1000.0
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }
}
