//! Octal mode parsing for permission changes.

use thiserror::Error;

/// Mask of the user/group/other rwx bits.
pub const PERMISSION_MASK: u32 = 0o777;

/// Errors produced when parsing a permission argument.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModeParseError {
    /// The argument is not exactly three characters long.
    #[error("expected 3 octal digits (e.g. 755), got {0} characters")]
    WrongLength(usize),

    /// A character is not an octal digit.
    #[error("invalid octal digit {0:?} (use 0-7)")]
    InvalidDigit(char),
}

/// Parse three octal digits (`"755"`) into user/group/other permission bits.
///
/// Leading or trailing whitespace is not accepted; the caller decides
/// whether to trim input.
pub fn parse_mode(digits: &str) -> Result<u32, ModeParseError> {
    let count = digits.chars().count();
    if count != 3 {
        return Err(ModeParseError::WrongLength(count));
    }

    digits.chars().try_fold(0u32, |mode, ch| {
        let digit = ch
            .to_digit(8)
            .ok_or(ModeParseError::InvalidDigit(ch))?;
        Ok((mode << 3) | digit)
    })
}
