//! In-place permutation of an argument vector: options first, operands last.

use crate::scan::{step, Cursor, Step};
use crate::LongOpt;

/// Permute `argv` so that options and their arguments precede operands,
/// keeping the relative order inside both groups, and return the index of
/// the first operand.
///
/// Unknown options and options with missing or unexpected arguments stay
/// with the options, unless such an option is the last token. That token
/// is left at the end, after the operands, and the returned index does not
/// count it. A `--` that ends option scanning is moved to the end of the
/// option block, and the returned index points just past it; tokens after
/// that `--` keep their order. Flag cells in `long` are not written.
///
/// With `long` set to `None`, `--name` tokens are read as short clusters,
/// as [`State::scan_short`](crate::State::scan_short) does.
pub fn reorder<S: AsRef<str>>(
    argv: &mut [S],
    optstring: &str,
    long: Option<&[LongOpt<'_>]>,
) -> usize {
    if argv.len() < 2 {
        return argv.len();
    }

    let (end, terminator) = match scan_end(argv, optstring, long) {
        End::Terminator(i) => (i, true),
        End::TrailingError(i) => (i, false),
        End::Exhausted => (argv.len(), false),
    };
    let mut boundary = partition(&mut argv[..end], optstring, long);

    if terminator {
        tracing::trace!(from = end, to = boundary, "moving terminator");
        argv[boundary..=end].rotate_right(1);
        boundary += 1;
    }

    boundary
}

/// Where the region to partition stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum End {
    /// Index of the `--` that ends option scanning.
    Terminator(usize),
    /// Index of a last token that scanned as an error.
    TrailingError(usize),
    Exhausted,
}

fn scan_end<S: AsRef<str>>(argv: &[S], optstring: &str, long: Option<&[LongOpt<'_>]>) -> End {
    let mut cursor = Cursor::new(1);
    let mut trailing_error = None;

    loop {
        let (start, last) = step_token(&mut cursor, argv, optstring, long);
        match last {
            Step::Done if cursor.finished => {
                tracing::debug!(index = cursor.index - 1, "option scanning ends at --");
                return End::Terminator(cursor.index - 1);
            }
            Step::Done => {
                return match trailing_error {
                    Some(index) => {
                        tracing::debug!(index, "leaving trailing error in place");
                        End::TrailingError(index)
                    }
                    None => End::Exhausted,
                };
            }
            last => trailing_error = last.is_error().then_some(start),
        }
    }
}

/// Step over one whole token, cluster included. Returns the token index and
/// the last step taken in it.
fn step_token<S: AsRef<str>>(
    cursor: &mut Cursor,
    argv: &[S],
    optstring: &str,
    long: Option<&[LongOpt<'_>]>,
) -> (usize, Step) {
    let start = cursor.index;
    let mut last = step(cursor, argv, optstring, long);
    while cursor.offset != 0 {
        last = step(cursor, argv, optstring, long);
    }
    (start, last)
}

/// Stable partition of `argv[1..]` into options then operands, by rotation.
fn partition<S: AsRef<str>>(
    argv: &mut [S],
    optstring: &str,
    long: Option<&[LongOpt<'_>]>,
) -> usize {
    let mut cursor = Cursor::new(1);
    // argv[1..options_end] holds options, argv[options_end..cursor.index] operands
    let mut options_end = 1;

    loop {
        let (start, last) = step_token(&mut cursor, argv, optstring, long);
        match last {
            Step::Done => return options_end,
            Step::Operand(_) => {}
            _ => {
                let end = cursor.index;
                if start > options_end {
                    tracing::trace!(start, end, options_end, "rotating option past operands");
                    argv[options_end..end].rotate_right(end - start);
                }
                options_end += end - start;
            }
        }
    }
}
