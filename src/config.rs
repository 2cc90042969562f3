/// Line buffer capacity in bytes. The reader keeps one slot in reserve, so a
/// line may carry up to `LINE_CAP - 1` payload characters before it overflows.
pub const LINE_CAP: usize = 96;

/// Static machine configuration. One instance is built at startup and read
/// only from then on.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Belt scale, full steps per millimeter of carriage travel.
    pub steps_per_mm_x: f32,
    pub steps_per_mm_y: f32,

    /// Workspace bounds, millimeters. Requested targets are pinned to these.
    pub x_min: f32,
    pub x_max: f32,
    pub y_min: f32,
    pub y_max: f32,

    /// Logical pen height when down (`z_min`) and up (`z_max`).
    pub z_min: f32,
    pub z_max: f32,

    /// Servo PWM duty for the two pen positions.
    pub pen_up_duty: u16,
    pub pen_down_duty: u16,

    /// Pause after each co-step of the two motors.
    pub step_delay_us: u32,
    /// Pause after a whole move finishes.
    pub line_delay_ms: u32,
    /// Time the servo gets to reach a commanded pen position.
    pub pen_settle_ms: u32,

    /// Most steps a homing phase may issue before it gives up on its limit
    /// switch. Sized to cross the whole workspace with ample margin.
    pub homing_step_budget: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            steps_per_mm_x: 80.0,
            steps_per_mm_y: 80.0,
            x_min: 0.0,
            x_max: 210.0,
            y_min: 0.0,
            y_max: 297.0,
            z_min: 0.0,
            z_max: 5.0,
            pen_up_duty: 3900,
            pen_down_duty: 6400,
            step_delay_us: 400,
            line_delay_ms: 20,
            pen_settle_ms: 150,
            homing_step_budget: 40_000,
        }
    }
}
