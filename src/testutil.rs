//! Mock hardware for host tests: plain structs implementing the
//! `embedded-hal` traits the core is generic over.

use core::cell::Cell;
use core::convert::Infallible;

use embedded_hal::blocking::delay::{DelayMs, DelayUs};
use embedded_hal::digital::v2::{InputPin, OutputPin};
use embedded_hal::PwmPin;

use crate::stepper::{Direction, Stepper};

#[derive(Default)]
pub struct MockPin {
    pub high: bool,
}

impl OutputPin for MockPin {
    type Error = Infallible;

    fn set_low(&mut self) -> Result<(), Infallible> {
        self.high = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.high = true;
        Ok(())
    }
}

/// Limit switch that reads open for a fixed number of polls, then closed.
pub struct MockSwitch {
    remaining: Cell<u32>,
}

impl MockSwitch {
    pub fn asserts_after(polls: u32) -> Self {
        MockSwitch {
            remaining: Cell::new(polls),
        }
    }

    pub fn stuck_open() -> Self {
        MockSwitch {
            remaining: Cell::new(u32::MAX),
        }
    }
}

impl InputPin for MockSwitch {
    type Error = Infallible;

    fn is_high(&self) -> Result<bool, Infallible> {
        Ok(!self.is_low()?)
    }

    fn is_low(&self) -> Result<bool, Infallible> {
        let left = self.remaining.get();
        if left == 0 {
            return Ok(true);
        }
        if left != u32::MAX {
            self.remaining.set(left - 1);
        }
        Ok(false)
    }
}

#[derive(Default)]
pub struct MockPwm {
    pub duty: u16,
    pub enabled: bool,
}

impl PwmPin for MockPwm {
    type Duty = u16;

    fn disable(&mut self) {
        self.enabled = false;
    }

    fn enable(&mut self) {
        self.enabled = true;
    }

    fn get_duty(&self) -> u16 {
        self.duty
    }

    fn get_max_duty(&self) -> u16 {
        u16::MAX
    }

    fn set_duty(&mut self, duty: u16) {
        self.duty = duty;
    }
}

pub struct NoDelay;

impl DelayUs<u32> for NoDelay {
    fn delay_us(&mut self, _us: u32) {}
}

impl DelayMs<u32> for NoDelay {
    fn delay_ms(&mut self, _ms: u32) {}
}

pub fn mock_stepper() -> Stepper<MockPin, MockPin> {
    Stepper::new(MockPin::default(), MockPin::default(), Direction::Clockwise)
}
