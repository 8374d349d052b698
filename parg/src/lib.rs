//! Re-entrant getopt-style option scanning.
//!
//! Scanning is driven one call at a time through an explicit [`State`]:
//! - [`State::scan_short`] matches `-a`, clustered `-abc` and `-rARG` tokens
//!   against a getopt option string such as `":no::r:"`
//! - [`State::scan_long`] additionally matches `--name` and `--name=value`
//!   against a table of [`LongOpt`] descriptors, accepting unambiguous
//!   prefixes
//! - [`reorder`] permutes a vector in place so options precede operands
//!
//! ```
//! use parg::{Outcome, State};
//!
//! let argv = ["app", "-n", "-rfile", "input"];
//! let mut state = State::new();
//! let mut seen = Vec::new();
//! loop {
//!     match state.scan_short(&argv, ":no::r:") {
//!         Outcome::Done => break,
//!         outcome => seen.push(outcome.code()),
//!     }
//! }
//! assert_eq!(seen, ['n' as i32, 'r' as i32, parg::OPERAND]);
//! ```

use std::cell::Cell;
use std::fmt;

mod error;
mod reorder;
mod scan;

pub use error::{Error, Result};
pub use reorder::reorder;
pub use scan::State;

// ============================================================================
// Sentinel codes
// ============================================================================

/// No more options remain.
pub const DONE: i32 = -1;
/// A bare operand was returned through the scanner.
pub const OPERAND: i32 = 1;
/// A long option wrote its value into a flag cell.
pub const FLAG_SET: i32 = 0;
/// Unknown or ambiguous option.
pub const UNKNOWN: i32 = '?' as i32;
/// Missing required argument, or an argument given to a long option that
/// takes none.
pub const MISSING: i32 = ':' as i32;

// ============================================================================
// ArgKind
// ============================================================================

/// Whether an option takes an argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    /// Takes no argument.
    None,
    /// Takes an argument only when it is attached: `-oARG` or
    /// `--name=ARG`. The next token is never consumed.
    Optional,
    /// Takes an argument, attached or from the next token, whatever that
    /// token looks like.
    Required,
}

// ============================================================================
// LongOpt — long option descriptor
// ============================================================================

/// A long option descriptor.
///
/// When `flag` is set, a match stores `val` into the cell and the scanner
/// reports [`FLAG_SET`]; otherwise `val` is reported as the option code.
#[derive(Debug, Clone, Copy)]
pub struct LongOpt<'f> {
    pub name: &'f str,
    pub arg: ArgKind,
    pub flag: Option<&'f Cell<i32>>,
    pub val: i32,
}

impl<'f> LongOpt<'f> {
    pub const fn new(name: &'f str, arg: ArgKind, val: i32) -> Self {
        LongOpt {
            name,
            arg,
            flag: None,
            val,
        }
    }

    /// Store `val` into `cell` on match instead of returning it.
    pub fn flag(mut self, cell: &'f Cell<i32>) -> Self {
        self.flag = Some(cell);
        self
    }

    /// Code reported for this descriptor in outcomes and offenders.
    fn code(&self) -> i32 {
        if self.flag.is_some() {
            FLAG_SET
        } else {
            self.val
        }
    }
}

// ============================================================================
// Offender — option that caused an error outcome
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Offender<'a> {
    Short(char),
    /// `name` is spelled as typed, so it may be an abbreviation. `index` and
    /// `code` describe the resolved descriptor; unresolved names carry
    /// `None` and 0.
    Long {
        name: &'a str,
        index: Option<usize>,
        code: i32,
    },
}

impl Offender<'_> {
    pub fn code(&self) -> i32 {
        match self {
            Offender::Short(c) => *c as i32,
            Offender::Long { code, .. } => *code,
        }
    }
}

impl fmt::Display for Offender<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Offender::Short(c) => write!(f, "-{}", c),
            Offender::Long { name, .. } => write!(f, "--{}", name),
        }
    }
}

// ============================================================================
// Outcome — result of one scanner call
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome<'a> {
    /// An option matched. `long_index` is the descriptor position for long
    /// options; `code` is [`FLAG_SET`] when a flag cell was written.
    Matched {
        code: i32,
        long_index: Option<usize>,
        arg: Option<&'a str>,
    },
    /// A non-option token, including a lone `-`.
    Operand(&'a str),
    /// Scanning is over: the vector is exhausted or a `--` was consumed.
    Done,
    /// An option character or long name that matches no descriptor.
    Unknown(Offender<'a>),
    /// A long name prefix shared by more than one descriptor.
    Ambiguous(Offender<'a>),
    /// A required argument with nothing left to take it from.
    MissingArgument(Offender<'a>),
    /// `--name=value` for a descriptor that takes no argument.
    UnexpectedArgument(Offender<'a>),
}

impl<'a> Outcome<'a> {
    /// The classic getopt return code for this outcome.
    pub fn code(&self) -> i32 {
        match self {
            Outcome::Matched { code, .. } => *code,
            Outcome::Operand(_) => OPERAND,
            Outcome::Done => DONE,
            Outcome::Unknown(_) | Outcome::Ambiguous(_) => UNKNOWN,
            Outcome::MissingArgument(_) | Outcome::UnexpectedArgument(_) => MISSING,
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Outcome::Done)
    }

    pub fn offender(&self) -> Option<Offender<'a>> {
        match self {
            Outcome::Unknown(o)
            | Outcome::Ambiguous(o)
            | Outcome::MissingArgument(o)
            | Outcome::UnexpectedArgument(o) => Some(*o),
            _ => None,
        }
    }

    /// Turn error outcomes into [`Error`] values.
    pub fn into_result(self) -> Result<Outcome<'a>> {
        match self {
            Outcome::Unknown(o) => Err(Error::UnknownOption(o.to_string())),
            Outcome::Ambiguous(o) => Err(Error::AmbiguousOption(o.to_string())),
            Outcome::MissingArgument(o) => Err(Error::MissingArgument(o.to_string())),
            Outcome::UnexpectedArgument(o) => Err(Error::UnexpectedArgument(o.to_string())),
            other => Ok(other),
        }
    }
}
