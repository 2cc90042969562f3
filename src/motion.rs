use embedded_hal::digital::v2::OutputPin;

use crate::stepper::Stepper;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Progress {
    /// A step was issued; call again after the inter-step delay.
    Stepping,
    /// Nothing left to do.
    Done,
}

/// One straight segment in actuator space, advanced one co-step at a time.
///
/// Classic integer error accumulation: the longer axis steps every call and
/// the shorter axis steps whenever the accumulator rolls over, so both
/// motors reach their targets on the same call. The caller owns the pacing;
/// `advance` never waits.
pub struct Segment {
    da: i32,
    db: i32,
    sa: i32,
    sb: i32,
    over: i32,
    remaining: i32,
}

impl Segment {
    pub fn new(from: (i32, i32), to: (i32, i32)) -> Self {
        let da = (to.0 - from.0).abs();
        let db = (to.1 - from.1).abs();
        Segment {
            da,
            db,
            sa: if to.0 >= from.0 { 1 } else { -1 },
            sb: if to.1 >= from.1 { 1 } else { -1 },
            over: 0,
            remaining: da.max(db),
        }
    }

    pub fn advance<SA, DA, SB, DB>(
        &mut self,
        a: &mut Stepper<SA, DA>,
        b: &mut Stepper<SB, DB>,
    ) -> Progress
    where
        SA: OutputPin,
        DA: OutputPin,
        SB: OutputPin,
        DB: OutputPin,
    {
        if self.remaining == 0 {
            return Progress::Done;
        }
        if self.da >= self.db {
            a.step(self.sa);
            self.over += self.db;
            if self.over >= self.da {
                self.over -= self.da;
                b.step(self.sb);
            }
        } else {
            b.step(self.sb);
            self.over += self.da;
            if self.over >= self.db {
                self.over -= self.db;
                a.step(self.sa);
            }
        }
        self.remaining -= 1;
        Progress::Stepping
    }
}
