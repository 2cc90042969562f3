use embedded_hal::PwmPin;

/// `S` value that lowers the pen. Anything but the two exact sentinels is
/// ignored, which is what the host-side toolchains emit and rely on.
pub const PEN_DOWN_S: f32 = 123.0;
/// `S` value that raises the pen.
pub const PEN_UP_S: f32 = 0.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PenState {
    Up,
    Down,
}

/// Two-position pen lift on a servo PWM channel.
pub struct PenLift<P: PwmPin<Duty = u16>> {
    channel: P,
    state: PenState,
    up_duty: u16,
    down_duty: u16,
}

impl<P: PwmPin<Duty = u16>> PenLift<P> {
    /// Starts with the pen raised.
    pub fn new(mut channel: P, up_duty: u16, down_duty: u16) -> Self {
        channel.set_duty(up_duty);
        channel.enable();
        PenLift {
            channel,
            state: PenState::Up,
            up_duty,
            down_duty,
        }
    }

    pub fn state(&self) -> PenState {
        self.state
    }

    /// Applies an `S` word. Returns the commanded state on an exact sentinel
    /// match, `None` for every other value.
    pub fn command(&mut self, s: f32) -> Option<PenState> {
        if s == PEN_DOWN_S {
            self.lower();
            Some(PenState::Down)
        } else if s == PEN_UP_S {
            self.raise();
            Some(PenState::Up)
        } else {
            None
        }
    }

    pub fn raise(&mut self) {
        self.channel.set_duty(self.up_duty);
        self.state = PenState::Up;
    }

    pub fn lower(&mut self) {
        self.channel.set_duty(self.down_duty);
        self.state = PenState::Down;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::MockPwm;

    fn pen() -> PenLift<MockPwm> {
        PenLift::new(MockPwm::default(), 3900, 6400)
    }

    #[test]
    fn starts_raised_with_the_channel_enabled() {
        let pen = pen();
        assert_eq!(pen.state(), PenState::Up);
        assert!(pen.channel.enabled);
        assert_eq!(pen.channel.duty, 3900);
    }

    #[test]
    fn sentinels_move_the_pen() {
        let mut pen = pen();
        assert_eq!(pen.command(123.0), Some(PenState::Down));
        assert_eq!(pen.channel.duty, 6400);
        assert_eq!(pen.command(0.0), Some(PenState::Up));
        assert_eq!(pen.channel.duty, 3900);
    }

    #[test]
    fn any_other_value_is_ignored() {
        let mut pen = pen();
        pen.command(123.0);
        for s in [1.0, 122.9, 123.1, 64.0, -1.0] {
            assert_eq!(pen.command(s), None);
            assert_eq!(pen.state(), PenState::Down);
            assert_eq!(pen.channel.duty, 6400);
        }
    }
}
