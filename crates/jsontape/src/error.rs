use thiserror::Error;

/// Every way a parse or a navigation can fail.
///
/// The numeric code of each variant (see [`Error::code`]) is stable across
/// releases; `0` is reserved for "no error" and is never constructed.
///
/// Scanner errors (`Utf8Error`, `UnescapedChars`, `UnclosedString`, `Empty`,
/// `Capacity`) are latched while blocks are scanned and surfaced once at end
/// of input. Walker errors abort the walk immediately. In the lazy cursor an
/// error poisons the cursor: every later navigation returns the first error
/// observed.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The input is larger than the configured maximum capacity.
    #[error("input exceeds the configured maximum capacity")]
    Capacity,
    /// An internal buffer could not be grown.
    #[error("memory allocation failed")]
    Memalloc,
    /// The document violates the JSON grammar.
    #[error("the document does not match the JSON grammar")]
    TapeError,
    /// Container nesting exceeds the configured maximum depth.
    #[error("nesting depth exceeds the configured maximum")]
    DepthError,
    /// A string contains a malformed escape or an unpaired surrogate.
    #[error("malformed escape sequence or unpaired surrogate in string")]
    StringError,
    /// A number does not match the JSON number grammar.
    #[error("malformed number")]
    NumberError,
    /// A number is syntactically valid but outside the representable range.
    #[error("number outside the representable range")]
    NumberOutOfRange,
    /// The input is not valid UTF-8.
    #[error("input is not valid UTF-8")]
    Utf8Error,
    /// A control character appears unescaped inside a string literal.
    #[error("unescaped control character inside a string")]
    UnescapedChars,
    /// A string literal is still open at end of input.
    #[error("string literal not terminated before end of input")]
    UnclosedString,
    /// A typed accessor was invoked on a value of a different kind.
    #[error("value is not of the requested type")]
    IncorrectType,
    /// The requested object key is absent.
    #[error("object has no such field")]
    NoSuchField,
    /// The input contains no structural characters at all.
    #[error("input contains no JSON to parse")]
    Empty,
    /// Reserved for file-loading front ends layered on top of this crate.
    #[error("i/o error while loading input")]
    IoError,
}

impl Error {
    /// Stable integer code for this error; `0` means "no error" and is never
    /// returned.
    #[must_use]
    pub const fn code(self) -> u32 {
        match self {
            Error::Capacity => 1,
            Error::Memalloc => 2,
            Error::TapeError => 3,
            Error::DepthError => 4,
            Error::StringError => 5,
            Error::NumberError => 6,
            Error::NumberOutOfRange => 7,
            Error::Utf8Error => 8,
            Error::UnescapedChars => 9,
            Error::UnclosedString => 10,
            Error::IncorrectType => 11,
            Error::NoSuchField => 12,
            Error::Empty => 13,
            Error::IoError => 14,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn codes_are_stable_and_distinct() {
        let all = [
            Error::Capacity,
            Error::Memalloc,
            Error::TapeError,
            Error::DepthError,
            Error::StringError,
            Error::NumberError,
            Error::NumberOutOfRange,
            Error::Utf8Error,
            Error::UnescapedChars,
            Error::UnclosedString,
            Error::IncorrectType,
            Error::NoSuchField,
            Error::Empty,
            Error::IoError,
        ];
        for (i, e) in all.iter().enumerate() {
            assert_eq!(e.code() as usize, i + 1);
        }
    }

    #[test]
    fn display_is_human_readable() {
        use alloc::string::ToString;
        assert_eq!(
            Error::UnclosedString.to_string(),
            "string literal not terminated before end of input"
        );
    }
}
