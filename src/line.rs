use heapless::Vec;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineError {
    /// The line grew past the buffer capacity. The partial line is dropped
    /// and accumulation restarts at the next byte.
    Overflow,
}

/// Accumulates serial bytes into one command line.
///
/// Within a line, whitespace and `/` are dropped, `(`..`)` regions are
/// comments, and lowercase letters are folded to uppercase before storage.
/// A `;` swallows everything up to the line terminator: the flag is cleared
/// only when the terminator arrives, nowhere else. That matches the wire
/// behavior the plotters in the field expect, so it stays.
pub struct LineReader<const CAP: usize> {
    buf: Vec<u8, CAP>,
    in_comment: bool,
    trailing_comment: bool,
}

impl<const CAP: usize> LineReader<CAP> {
    pub fn new() -> Self {
        LineReader {
            buf: Vec::new(),
            in_comment: false,
            trailing_comment: false,
        }
    }

    /// Feeds one byte. Returns the finished line when a terminator closes a
    /// nonempty one; a bare terminator is ignored.
    pub fn push(&mut self, byte: u8) -> Result<Option<Vec<u8, CAP>>, LineError> {
        match byte {
            b'\n' | b'\r' => {
                self.in_comment = false;
                self.trailing_comment = false;
                if self.buf.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(core::mem::take(&mut self.buf)))
                }
            }
            _ if self.trailing_comment => Ok(None),
            b')' if self.in_comment => {
                self.in_comment = false;
                Ok(None)
            }
            _ if self.in_comment => Ok(None),
            b'(' => {
                self.in_comment = true;
                Ok(None)
            }
            b';' => {
                self.trailing_comment = true;
                Ok(None)
            }
            b'/' => Ok(None),
            b if b <= b' ' => Ok(None),
            b => {
                // One slot stays reserved, so payload tops out at CAP - 1.
                if self.buf.len() + 1 >= CAP {
                    self.buf.clear();
                    self.in_comment = false;
                    self.trailing_comment = false;
                    return Err(LineError::Overflow);
                }
                let _ = self.buf.push(b.to_ascii_uppercase());
                Ok(None)
            }
        }
    }
}

impl<const CAP: usize> Default for LineReader<CAP> {
    fn default() -> Self {
        Self::new()
    }
}
