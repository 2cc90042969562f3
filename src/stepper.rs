use embedded_hal::digital::v2::OutputPin;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Clockwise,
    CounterClockwise,
}

impl core::ops::Not for Direction {
    type Output = Direction;

    fn not(self) -> Self::Output {
        match self {
            Direction::Clockwise => Direction::CounterClockwise,
            Direction::CounterClockwise => Direction::Clockwise,
        }
    }
}

/// One step/dir motor driver. Position is counted in steps from wherever the
/// motor was last zeroed; which rotation counts as positive is fixed per
/// motor at construction so the two CoreXY motors can be mounted mirrored.
pub struct Stepper<SP, DP> {
    step_pin: SP,
    dir_pin: DP,
    positive_direction: Direction,
    cur_direction: Direction,
    pub cur_pos: i32,
}

impl<SP: OutputPin, DP: OutputPin> Stepper<SP, DP> {
    pub fn new(step_pin: SP, dir_pin: DP, positive_direction: Direction) -> Self {
        let mut stepper = Stepper {
            step_pin,
            dir_pin,
            positive_direction,
            cur_direction: positive_direction,
            cur_pos: 0,
        };
        // Write to the direction pin.
        stepper.set_direction(stepper.cur_direction);
        stepper
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.cur_direction = direction;
        match direction {
            Direction::Clockwise => {
                let _ = self.dir_pin.set_high();
            }
            Direction::CounterClockwise => {
                let _ = self.dir_pin.set_low();
            }
        }
    }

    /// Issues one full step pulse in the sign of `delta`.
    pub fn step(&mut self, delta: i32) {
        let direction = if delta >= 0 {
            self.positive_direction
        } else {
            !self.positive_direction
        };
        if direction != self.cur_direction {
            self.set_direction(direction);
        }
        let _ = self.step_pin.set_high();
        let _ = self.step_pin.set_low();
        self.cur_pos += delta.signum();
    }

    /// Makes the current physical position the new step origin.
    pub fn zero(&mut self) {
        self.cur_pos = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::MockPin;

    #[test]
    fn step_counts_signed_positions() {
        let mut stepper = Stepper::new(MockPin::default(), MockPin::default(), Direction::Clockwise);
        stepper.step(1);
        stepper.step(1);
        stepper.step(-1);
        assert_eq!(stepper.cur_pos, 1);
        stepper.zero();
        assert_eq!(stepper.cur_pos, 0);
    }

    #[test]
    fn direction_pin_follows_step_sign() {
        let mut stepper = Stepper::new(MockPin::default(), MockPin::default(), Direction::Clockwise);
        stepper.step(1);
        assert!(stepper.dir_pin.high);
        stepper.step(-1);
        assert!(!stepper.dir_pin.high);
    }

    #[test]
    fn mirrored_motor_inverts_the_pin_not_the_count() {
        let mut stepper = Stepper::new(
            MockPin::default(),
            MockPin::default(),
            Direction::CounterClockwise,
        );
        stepper.step(1);
        assert!(!stepper.dir_pin.high);
        assert_eq!(stepper.cur_pos, 1);
    }
}
