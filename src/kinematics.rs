use libm::roundf;

/// Workspace limits for one axis, millimeters.
#[derive(Clone, Copy, Debug)]
pub struct AxisBounds {
    pub min: f32,
    pub max: f32,
}

impl AxisBounds {
    /// Pins a value to the nearest bound; out-of-range targets are never
    /// rejected.
    pub fn clamp(&self, value: f32) -> f32 {
        if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }
}

/// Cartesian-to-actuator mapping for the coupled (CoreXY/H-bot) drive.
#[derive(Clone, Copy, Debug)]
pub struct CoreXy {
    pub steps_per_mm_x: f32,
    pub steps_per_mm_y: f32,
    pub x: AxisBounds,
    pub y: AxisBounds,
}

impl CoreXy {
    pub fn clamp(&self, x: f32, y: f32) -> (f32, f32) {
        (self.x.clamp(x), self.y.clamp(y))
    }

    /// Maps clamped millimeters to the two motor step targets. The sign
    /// convention is load-bearing: the belts only resolve cartesian motion
    /// with `a = -(x + y)` and `b = -(x - y)` in step units.
    pub fn to_actuator(&self, x_mm: f32, y_mm: f32) -> (i32, i32) {
        let x_steps = roundf(x_mm * self.steps_per_mm_x) as i32;
        let y_steps = roundf(y_mm * self.steps_per_mm_y) as i32;
        (-(x_steps + y_steps), -(x_steps - y_steps))
    }
}
