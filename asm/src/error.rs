use color_print::cprintln;
use thiserror::Error;

use crate::token::{Location, TokenKind};

/// Assembly failure. Every variant carries the offending source
/// location; the File* variants carry the path instead. Any error aborts
/// the whole pipeline, so no partial image is ever written.
#[derive(Debug, Error)]
pub enum Error {
    // Lexical
    #[error("unterminated string literal")]
    UnterminatedString { loc: Location },

    #[error("unexpected character `{ch}`")]
    UnexpectedChar { ch: char, loc: Location },

    // Syntax
    #[error("unexpected end of input: expected {expected}")]
    UnexpectedEof { expected: String, loc: Location },

    #[error("expected {expected}, found {found}")]
    UnexpectedToken {
        expected: String,
        found: TokenKind,
        loc: Location,
    },

    // Operands
    #[error("expected a register, found {found}")]
    ExpectedRegister { found: TokenKind, loc: Location },

    #[error("expected {expected}, found {found}")]
    ExpectedOperand {
        expected: &'static str,
        found: TokenKind,
        loc: Location,
    },

    // Symbols
    #[error("duplicate label `{name}`")]
    DuplicateLabel { name: String, loc: Location },

    #[error("undefined symbol `{name}`")]
    UndefinedSymbol { name: String, loc: Location },

    // Encoding
    #[error("unsupported mov operand combination: {detail}")]
    IllegalMove {
        detail: &'static str,
        loc: Location,
    },

    #[error("cannot parse `{text}` as a number")]
    MalformedNumber { text: String, loc: Location },

    #[error("value `{text}` exceeds the field maximum {max}")]
    ValueTooLarge {
        text: String,
        max: u32,
        loc: Location,
    },

    #[error("output image exceeds the 16-bit address space")]
    ImageTooLarge { loc: Location },

    // Driver
    #[error("failed to read {path}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}")]
    FileWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn location(&self) -> Option<&Location> {
        match self {
            Error::UnterminatedString { loc }
            | Error::UnexpectedChar { loc, .. }
            | Error::UnexpectedEof { loc, .. }
            | Error::UnexpectedToken { loc, .. }
            | Error::ExpectedRegister { loc, .. }
            | Error::ExpectedOperand { loc, .. }
            | Error::DuplicateLabel { loc, .. }
            | Error::UndefinedSymbol { loc, .. }
            | Error::IllegalMove { loc, .. }
            | Error::MalformedNumber { loc, .. }
            | Error::ValueTooLarge { loc, .. }
            | Error::ImageTooLarge { loc } => Some(loc),
            Error::FileRead { .. } | Error::FileWrite { .. } => None,
        }
    }

    /// Print the error with the offending source line and a caret.
    /// `source` must be the text the locations were produced against
    /// (after macro substitution).
    pub fn print_diag(&self, source: &str) {
        cprintln!("<red,bold>error</>: {}", self);
        let Some(loc) = self.location() else {
            return;
        };
        cprintln!("     <blue>--></> <underline>{}</>", loc);
        let line = source.lines().nth(loc.row as usize - 1).unwrap_or("");
        cprintln!("      <blue>|</>");
        cprintln!(" <blue>{:>4} |</> {}", loc.row, line);
        cprintln!(
            "      <blue>|</> {}<red,bold>^</>",
            " ".repeat(loc.col.saturating_sub(1) as usize)
        );
    }
}
