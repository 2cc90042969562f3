use debugless_unwrap::DebuglessUnwrap;
use embedded_hal::digital::v2::{InputPin, OutputPin};

use crate::motion::Progress;
use crate::stepper::Stepper;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HomingError {
    /// The phase exhausted its step budget without the limit switch closing.
    LimitNotReached(Axis),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    SeekX,
    SeekY,
    Done,
}

/// Two-phase homing run: drive toward the X limit switch, then the Y limit
/// switch, then declare the current spot the actuator origin. Limit switches
/// read low when closed (pull-up inputs shorted to ground).
///
/// Each phase carries a step budget; a switch that never closes surfaces
/// `LimitNotReached` instead of pinning the machine against the frame
/// forever.
pub struct HomingSequence {
    phase: Phase,
    budget: u32,
    remaining: u32,
}

impl HomingSequence {
    pub fn new(step_budget: u32) -> Self {
        HomingSequence {
            phase: Phase::SeekX,
            budget: step_budget,
            remaining: step_budget,
        }
    }

    /// One polling iteration: check the active limit switch, step once
    /// toward it otherwise. The caller paces calls with the inter-step
    /// delay.
    pub fn advance<SA, DA, SB, DB, XL, YL>(
        &mut self,
        a: &mut Stepper<SA, DA>,
        b: &mut Stepper<SB, DB>,
        x_limit: &XL,
        y_limit: &YL,
    ) -> Result<Progress, HomingError>
    where
        SA: OutputPin,
        DA: OutputPin,
        SB: OutputPin,
        DB: OutputPin,
        XL: InputPin,
        YL: InputPin,
    {
        match self.phase {
            Phase::SeekX => {
                if x_limit.is_low().debugless_unwrap() {
                    log::debug!("homing: x limit reached");
                    self.phase = Phase::SeekY;
                    self.remaining = self.budget;
                    return Ok(Progress::Stepping);
                }
                if self.remaining == 0 {
                    return Err(HomingError::LimitNotReached(Axis::X));
                }
                self.remaining -= 1;
                // Toward +X both motors share a sign under the coupled drive.
                a.step(-1);
                b.step(-1);
                Ok(Progress::Stepping)
            }
            Phase::SeekY => {
                if y_limit.is_low().debugless_unwrap() {
                    log::debug!("homing: y limit reached");
                    a.zero();
                    b.zero();
                    self.phase = Phase::Done;
                    return Ok(Progress::Done);
                }
                if self.remaining == 0 {
                    return Err(HomingError::LimitNotReached(Axis::Y));
                }
                self.remaining -= 1;
                // Toward +Y the motors run antiparallel.
                a.step(-1);
                b.step(1);
                Ok(Progress::Stepping)
            }
            Phase::Done => Ok(Progress::Done),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{mock_stepper, MockSwitch};

    #[test]
    fn homes_both_phases_and_zeroes_the_motors() {
        let mut a = mock_stepper();
        let mut b = mock_stepper();
        a.cur_pos = 40;
        b.cur_pos = -3;
        let x_limit = MockSwitch::asserts_after(10);
        let y_limit = MockSwitch::asserts_after(6);

        let mut sequence = HomingSequence::new(1_000);
        loop {
            match sequence.advance(&mut a, &mut b, &x_limit, &y_limit) {
                Ok(Progress::Stepping) => {}
                Ok(Progress::Done) => break,
                Err(err) => panic!("homing failed: {:?}", err),
            }
        }
        assert_eq!((a.cur_pos, b.cur_pos), (0, 0));
    }

    #[test]
    fn phase_one_steps_parallel_phase_two_antiparallel() {
        let mut a = mock_stepper();
        let mut b = mock_stepper();
        let x_limit = MockSwitch::asserts_after(4);
        let y_limit = MockSwitch::asserts_after(3);

        let mut sequence = HomingSequence::new(1_000);
        for _ in 0..4 {
            sequence.advance(&mut a, &mut b, &x_limit, &y_limit).unwrap();
        }
        assert_eq!((a.cur_pos, b.cur_pos), (-4, -4));

        // Transition poll, then the antiparallel Y phase.
        sequence.advance(&mut a, &mut b, &x_limit, &y_limit).unwrap();
        for _ in 0..3 {
            sequence.advance(&mut a, &mut b, &x_limit, &y_limit).unwrap();
        }
        assert_eq!((a.cur_pos, b.cur_pos), (-7, -1));
    }

    #[test]
    fn stuck_switch_exhausts_the_budget() {
        let mut a = mock_stepper();
        let mut b = mock_stepper();
        let x_limit = MockSwitch::stuck_open();
        let y_limit = MockSwitch::asserts_after(0);

        let mut sequence = HomingSequence::new(5);
        let result = loop {
            match sequence.advance(&mut a, &mut b, &x_limit, &y_limit) {
                Ok(Progress::Stepping) => {}
                other => break other,
            }
        };
        assert_eq!(result, Err(HomingError::LimitNotReached(Axis::X)));
        assert_eq!((a.cur_pos, b.cur_pos), (-5, -5));
    }
}
