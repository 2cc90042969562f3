use core::fmt::Write;

use embedded_hal::blocking::delay::{DelayMs, DelayUs};
use embedded_hal::digital::v2::{InputPin, OutputPin};
use embedded_hal::PwmPin;

use crate::config::{Config, LINE_CAP};
use crate::gcode::{self, Command};
use crate::homing::{HomingError, HomingSequence};
use crate::kinematics::{AxisBounds, CoreXy};
use crate::line::{LineError, LineReader};
use crate::motion::{Progress, Segment};
use crate::pen::{PenLift, PenState};
use crate::stepper::Stepper;

/// Current logical tool position, millimeters.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// The motion controller context. Owns every piece of mutable machine state
/// (position, pen, motors, line accumulation) so the control loop is the
/// only thing touching any of it.
///
/// Commands run to completion inside `feed_byte`: while a move or homing
/// run is stepping, no further input is consumed, and the `ok` for a line
/// goes out only after its command has finished. Bytes arriving meanwhile
/// sit in the transport's own buffer.
pub struct Plotter<SA, DA, SB, DB, XL, YL, PW>
where
    PW: PwmPin<Duty = u16>,
{
    config: Config,
    kinematics: CoreXy,
    reader: LineReader<LINE_CAP>,
    position: Position,
    motor_a: Stepper<SA, DA>,
    motor_b: Stepper<SB, DB>,
    pen: PenLift<PW>,
    x_limit: XL,
    y_limit: YL,
}

impl<SA, DA, SB, DB, XL, YL, PW> Plotter<SA, DA, SB, DB, XL, YL, PW>
where
    SA: OutputPin,
    DA: OutputPin,
    SB: OutputPin,
    DB: OutputPin,
    XL: InputPin,
    YL: InputPin,
    PW: PwmPin<Duty = u16>,
{
    pub fn new(
        config: Config,
        motor_a: Stepper<SA, DA>,
        motor_b: Stepper<SB, DB>,
        x_limit: XL,
        y_limit: YL,
        pen_channel: PW,
    ) -> Self {
        let kinematics = CoreXy {
            steps_per_mm_x: config.steps_per_mm_x,
            steps_per_mm_y: config.steps_per_mm_y,
            x: AxisBounds {
                min: config.x_min,
                max: config.x_max,
            },
            y: AxisBounds {
                min: config.y_min,
                max: config.y_max,
            },
        };
        let pen = PenLift::new(pen_channel, config.pen_up_duty, config.pen_down_duty);
        Plotter {
            position: Position {
                x: 0.0,
                y: 0.0,
                z: config.z_max,
            },
            config,
            kinematics,
            reader: LineReader::new(),
            motor_a,
            motor_b,
            pen,
            x_limit,
            y_limit,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn pen_state(&self) -> PenState {
        self.pen.state()
    }

    pub fn actuator_position(&self) -> (i32, i32) {
        (self.motor_a.cur_pos, self.motor_b.cur_pos)
    }

    /// Single entry point of the control loop. Accumulates one byte; when a
    /// line completes, its command runs to the end before this returns, and
    /// the acknowledgment goes out afterwards. An overflowed line is
    /// reported, discarded and acknowledged the same way.
    pub fn feed_byte<W, D>(&mut self, byte: u8, out: &mut W, delay: &mut D)
    where
        W: Write,
        D: DelayUs<u32> + DelayMs<u32>,
    {
        match self.reader.push(byte) {
            Ok(None) => {}
            Ok(Some(line)) => {
                self.execute(&line, out, delay);
                let _ = writeln!(out, "ok");
            }
            Err(LineError::Overflow) => {
                log::warn!("line buffer overflow, input discarded");
                let _ = writeln!(out, "error: line overflow");
                let _ = writeln!(out, "ok");
            }
        }
    }

    fn execute<W, D>(&mut self, line: &[u8], out: &mut W, delay: &mut D)
    where
        W: Write,
        D: DelayUs<u32> + DelayMs<u32>,
    {
        match gcode::parse(line) {
            Some(Command::Move { x, y }) => self.linear_move(x, y, delay),
            Some(Command::Home) => self.home(out, delay),
            Some(Command::Pen { s }) => self.set_pen(s, delay),
            Some(Command::UnknownM(code)) => {
                let _ = writeln!(out, "error: unsupported M-code M{}", code);
            }
            None => {}
        }
    }

    /// Clamps the target, maps it through the coupled-drive transform and
    /// co-steps both motors there. Position is updated only once the move
    /// has finished.
    fn linear_move<D>(&mut self, x: Option<f32>, y: Option<f32>, delay: &mut D)
    where
        D: DelayUs<u32> + DelayMs<u32>,
    {
        let (x, y) = self.kinematics.clamp(
            x.unwrap_or(self.position.x),
            y.unwrap_or(self.position.y),
        );
        let target = self.kinematics.to_actuator(x, y);
        let mut segment = Segment::new((self.motor_a.cur_pos, self.motor_b.cur_pos), target);
        while segment.advance(&mut self.motor_a, &mut self.motor_b) == Progress::Stepping {
            delay.delay_us(self.config.step_delay_us);
        }
        delay.delay_ms(self.config.line_delay_ms);
        self.position.x = x;
        self.position.y = y;
    }

    fn home<W, D>(&mut self, out: &mut W, delay: &mut D)
    where
        W: Write,
        D: DelayUs<u32> + DelayMs<u32>,
    {
        let mut sequence = HomingSequence::new(self.config.homing_step_budget);
        loop {
            match sequence.advance(
                &mut self.motor_a,
                &mut self.motor_b,
                &self.x_limit,
                &self.y_limit,
            ) {
                Ok(Progress::Stepping) => delay.delay_us(self.config.step_delay_us),
                Ok(Progress::Done) => {
                    self.position.x = 0.0;
                    self.position.y = 0.0;
                    return;
                }
                Err(HomingError::LimitNotReached(axis)) => {
                    log::warn!("homing aborted, {:?} limit never asserted", axis);
                    let _ = writeln!(out, "error: {:?} limit not reached while homing", axis);
                    return;
                }
            }
        }
    }

    fn set_pen<D>(&mut self, s: f32, delay: &mut D)
    where
        D: DelayUs<u32> + DelayMs<u32>,
    {
        if let Some(state) = self.pen.command(s) {
            self.position.z = match state {
                PenState::Up => self.config.z_max,
                PenState::Down => self.config.z_min,
            };
            delay.delay_ms(self.config.pen_settle_ms);
        }
    }
}
