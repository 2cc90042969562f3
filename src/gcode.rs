//! Turns one finished command line into a structured command. The line
//! reader has already stripped whitespace and comments and upper-cased
//! letters, so the scan here works on compact ASCII.

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    /// `G0`/`G1`. An absent axis holds its current value.
    Move { x: Option<f32>, y: Option<f32> },
    /// `G28`.
    Home,
    /// `M3 S<value>`, interpreted by the pen controller.
    Pen { s: f32 },
    /// Any other `M` word; reported, never acted on.
    UnknownM(u8),
}

/// Scans left to right for the first `G` or `M` word and builds the command
/// it names. Letters that lead neither word are skipped; a line with no
/// recognized word produces nothing. Unimplemented `G` codes are silent
/// no-ops.
pub fn parse(line: &[u8]) -> Option<Command> {
    let mut i = 0;
    while i < line.len() {
        match line[i] {
            b'G' => {
                return match code_after(line, i + 1) {
                    0 | 1 => Some(Command::Move {
                        x: field(line, b'X'),
                        y: field(line, b'Y'),
                    }),
                    28 => Some(Command::Home),
                    _ => None,
                };
            }
            b'M' => {
                return match code_after(line, i + 1) {
                    3 => Some(Command::Pen {
                        s: field(line, b'S').unwrap_or(0.0),
                    }),
                    code => Some(Command::UnknownM(code)),
                };
            }
            _ => i += 1,
        }
    }
    None
}

/// Reads at most two digits following a `G`/`M` letter.
fn code_after(line: &[u8], start: usize) -> u8 {
    let mut code = 0u8;
    let mut i = start;
    while i < line.len() && i < start + 2 && line[i].is_ascii_digit() {
        code = code * 10 + (line[i] - b'0');
        i += 1;
    }
    code
}

/// Finds `marker` and parses the number that follows it.
fn field(line: &[u8], marker: u8) -> Option<f32> {
    let at = line.iter().position(|&b| b == marker)?;
    Some(number_after(line, at + 1))
}

/// A field that does not parse as a float yields 0.0 and the command
/// proceeds; the wire protocol carries no malformed-number error.
fn number_after(line: &[u8], start: usize) -> f32 {
    let mut end = start;
    while end < line.len() && matches!(line[end], b'0'..=b'9' | b'.' | b'-' | b'+') {
        end += 1;
    }
    core::str::from_utf8(&line[start..end])
        .ok()
        .and_then(|s| s.parse::<f32>().ok())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_move_with_both_axes() {
        assert_eq!(
            parse(b"G1X250Y50"),
            Some(Command::Move {
                x: Some(250.0),
                y: Some(50.0)
            })
        );
    }

    #[test]
    fn rapid_move_with_one_axis() {
        assert_eq!(
            parse(b"G0Y-12.5"),
            Some(Command::Move {
                x: None,
                y: Some(-12.5)
            })
        );
    }

    #[test]
    fn home_word() {
        assert_eq!(parse(b"G28"), Some(Command::Home));
    }

    #[test]
    fn unimplemented_g_codes_are_silent() {
        assert_eq!(parse(b"G92X0Y0"), None);
        assert_eq!(parse(b"G4"), None);
    }

    #[test]
    fn pen_word_carries_the_raw_s_value() {
        assert_eq!(parse(b"M3S123"), Some(Command::Pen { s: 123.0 }));
        assert_eq!(parse(b"M3S0"), Some(Command::Pen { s: 0.0 }));
        assert_eq!(parse(b"M3S64.2"), Some(Command::Pen { s: 64.2 }));
    }

    #[test]
    fn other_m_codes_are_reported() {
        assert_eq!(parse(b"M7"), Some(Command::UnknownM(7)));
        assert_eq!(parse(b"M84"), Some(Command::UnknownM(84)));
    }

    #[test]
    fn leading_unknown_letters_are_skipped() {
        assert_eq!(parse(b"N10G28"), Some(Command::Home));
        assert_eq!(parse(b"T0"), None);
    }

    // Unparsable numeric fields fall back to zero instead of erroring.
    #[test]
    fn malformed_number_defaults_to_zero() {
        assert_eq!(
            parse(b"G1XABC"),
            Some(Command::Move {
                x: Some(0.0),
                y: None
            })
        );
    }

    #[test]
    fn pen_without_s_reads_as_zero() {
        assert_eq!(parse(b"M3"), Some(Command::Pen { s: 0.0 }));
    }
}
