/// Simulation clock owned by the scene.
///
/// `delta` is the scaled delta of the last frame; `elapsed` is the sum of all
/// scaled deltas since the scene was loaded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldTime {
    pub elapsed: f32,
    pub delta: f32,
    pub time_scale: f32,
    pub frame_count: u64,
}

impl Default for WorldTime {
    fn default() -> Self {
        WorldTime {
            elapsed: 0.0,
            delta: 0.0,
            time_scale: 1.0,
            frame_count: 0,
        }
    }
}

impl WorldTime {
    /// Apply `time_scale` to the raw frame delta and advance the clock.
    /// Returns the scaled delta.
    pub fn advance(&mut self, dt: f32) -> f32 {
        let scaled_dt = dt.max(0.0) * self.time_scale;
        self.elapsed += scaled_dt;
        self.delta = scaled_dt;
        self.frame_count += 1;
        scaled_dt
    }
}
