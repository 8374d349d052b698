//! Scan state and the short/long option matchers.

use std::ops::Range;

use crate::{ArgKind, LongOpt, Offender, Outcome, FLAG_SET};

// ============================================================================
// Cursor — position of a scan
// ============================================================================

/// Token index, byte offset into a short-option cluster (0 between tokens)
/// and whether a `--` terminator has been consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Cursor {
    pub(crate) index: usize,
    pub(crate) offset: usize,
    pub(crate) finished: bool,
}

impl Cursor {
    pub(crate) fn new(index: usize) -> Self {
        Cursor {
            index,
            offset: 0,
            finished: false,
        }
    }

    fn next_token(&mut self) {
        self.index += 1;
        self.offset = 0;
    }

    fn advance_cluster(&mut self, next: usize, len: usize) {
        if next < len {
            self.offset = next;
        } else {
            self.next_token();
        }
    }
}

// ============================================================================
// Step — one classification, by position
// ============================================================================

/// Part of a token: `argv[token][range]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Span {
    token: usize,
    range: Range<usize>,
}

impl Span {
    fn whole(token: usize, text: &str) -> Self {
        Span {
            token,
            range: 0..text.len(),
        }
    }

    fn resolve<'a, S: AsRef<str>>(&self, argv: &'a [S]) -> &'a str {
        &argv[self.token].as_ref()[self.range.clone()]
    }
}

/// Result of one matcher call. Positions instead of borrows let the
/// reorder pass permute the vector between calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Step {
    Done,
    Operand(usize),
    Short { opt: char, arg: Option<Span> },
    Long { index: usize, arg: Option<Span> },
    UnknownShort(char),
    MissingShort(char),
    UnknownLong(Span),
    AmbiguousLong(Span),
    MissingLong { index: usize, name: Span },
    UnexpectedLong { index: usize, name: Span },
}

impl Step {
    /// Whether this step resolves to an `UNKNOWN` or `MISSING` outcome.
    pub(crate) fn is_error(&self) -> bool {
        matches!(
            self,
            Step::UnknownShort(_)
                | Step::MissingShort(_)
                | Step::UnknownLong(_)
                | Step::AmbiguousLong(_)
                | Step::MissingLong { .. }
                | Step::UnexpectedLong { .. }
        )
    }
}

// ============================================================================
// Token classification and lookup helpers
// ============================================================================

/// `-x...` or `--...`, but not a lone `-`.
fn is_option(token: &str) -> bool {
    token.len() > 1 && token.starts_with('-')
}

/// Argument class of `c` in a getopt option string.
pub(crate) fn short_kind(optstring: &str, c: char) -> Option<ArgKind> {
    if c == ':' {
        return None;
    }
    let pos = optstring.find(c)?;
    let rest = &optstring[pos + c.len_utf8()..];
    Some(if rest.starts_with("::") {
        ArgKind::Optional
    } else if rest.starts_with(':') {
        ArgKind::Required
    } else {
        ArgKind::None
    })
}

#[derive(Debug, PartialEq, Eq)]
enum Lookup {
    Found(usize),
    Unknown,
    Ambiguous,
}

/// Resolve a long option name: exact match first, then a unique prefix.
fn lookup_long(long: &[LongOpt<'_>], name: &str) -> Lookup {
    let mut first = None;
    let mut candidates = 0;
    for (i, opt) in long.iter().take_while(|o| !o.name.is_empty()).enumerate() {
        if opt.name == name {
            return Lookup::Found(i);
        }
        if !name.is_empty() && opt.name.starts_with(name) {
            first.get_or_insert(i);
            candidates += 1;
        }
    }
    match (candidates, first) {
        (1, Some(i)) => Lookup::Found(i),
        (0, _) => Lookup::Unknown,
        _ => Lookup::Ambiguous,
    }
}

// ============================================================================
// Matchers
// ============================================================================

/// Classify the next token or cluster character.
///
/// With `long` set, `--name` tokens go to the long matcher; without it they
/// are read as a short cluster starting with `-`.
pub(crate) fn step<S: AsRef<str>>(
    cursor: &mut Cursor,
    argv: &[S],
    optstring: &str,
    long: Option<&[LongOpt<'_>]>,
) -> Step {
    if cursor.offset == 0 {
        if cursor.finished || cursor.index >= argv.len() {
            return Step::Done;
        }
        let token = argv[cursor.index].as_ref();
        if !is_option(token) {
            cursor.next_token();
            return Step::Operand(cursor.index - 1);
        }
        if token == "--" {
            cursor.next_token();
            cursor.finished = true;
            return Step::Done;
        }
        if let Some(long) = long {
            if token.starts_with("--") {
                return match_long(cursor, argv, long);
            }
        }
        cursor.offset = 1;
    }
    match_short(cursor, argv, optstring)
}

fn match_short<S: AsRef<str>>(cursor: &mut Cursor, argv: &[S], optstring: &str) -> Step {
    let token = cursor.index;
    let text = argv[token].as_ref();
    // offset always points inside the token while a cluster is open
    let Some(opt) = text[cursor.offset..].chars().next() else {
        cursor.next_token();
        return Step::Done;
    };
    let after = cursor.offset + opt.len_utf8();

    let Some(kind) = short_kind(optstring, opt) else {
        cursor.advance_cluster(after, text.len());
        return Step::UnknownShort(opt);
    };

    match kind {
        ArgKind::None => {
            cursor.advance_cluster(after, text.len());
            Step::Short { opt, arg: None }
        }
        _ if after < text.len() => {
            cursor.next_token();
            Step::Short {
                opt,
                arg: Some(Span {
                    token,
                    range: after..text.len(),
                }),
            }
        }
        ArgKind::Optional => {
            cursor.next_token();
            Step::Short { opt, arg: None }
        }
        ArgKind::Required => {
            cursor.next_token();
            match take_next(cursor, argv) {
                Some(arg) => Step::Short {
                    opt,
                    arg: Some(arg),
                },
                None => Step::MissingShort(opt),
            }
        }
    }
}

fn match_long<S: AsRef<str>>(cursor: &mut Cursor, argv: &[S], long: &[LongOpt<'_>]) -> Step {
    let token = cursor.index;
    let text = argv[token].as_ref();
    cursor.next_token();

    let (name_end, value) = match text[2..].find('=') {
        Some(eq) => (2 + eq, Some(2 + eq + 1..text.len())),
        None => (text.len(), None),
    };
    let name = Span {
        token,
        range: 2..name_end,
    };

    let index = match lookup_long(long, &text[2..name_end]) {
        Lookup::Found(index) => index,
        Lookup::Unknown => return Step::UnknownLong(name),
        Lookup::Ambiguous => return Step::AmbiguousLong(name),
    };

    match (long[index].arg, value) {
        (ArgKind::None, Some(_)) => Step::UnexpectedLong { index, name },
        (_, Some(range)) => Step::Long {
            index,
            arg: Some(Span { token, range }),
        },
        (ArgKind::Required, None) => match take_next(cursor, argv) {
            Some(arg) => Step::Long {
                index,
                arg: Some(arg),
            },
            None => Step::MissingLong { index, name },
        },
        _ => Step::Long { index, arg: None },
    }
}

/// Consume the token at the cursor as an option argument.
fn take_next<S: AsRef<str>>(cursor: &mut Cursor, argv: &[S]) -> Option<Span> {
    let text = argv.get(cursor.index)?.as_ref();
    let span = Span::whole(cursor.index, text);
    cursor.next_token();
    Some(span)
}

// ============================================================================
// State — public scan state
// ============================================================================

/// State threaded through successive scanner calls over one argument
/// vector.
///
/// A fresh state starts at index 1, skipping the program name. `arg` is
/// cleared at the start of every call; `offending` is only written by
/// error outcomes and keeps its previous value otherwise.
#[derive(Debug, Clone)]
pub struct State<'a> {
    cursor: Cursor,
    arg: Option<&'a str>,
    offending: Option<Offender<'a>>,
}

impl Default for State<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> State<'a> {
    pub fn new() -> Self {
        Self::with_index(1)
    }

    /// Start scanning at `index`, e.g. at the boundary returned by
    /// [`reorder`](crate::reorder).
    pub fn with_index(index: usize) -> Self {
        State {
            cursor: Cursor::new(index),
            arg: None,
            offending: None,
        }
    }

    pub fn init(&mut self) {
        *self = Self::new();
    }

    /// Index of the next token to examine (or of the open cluster).
    pub fn index(&self) -> usize {
        self.cursor.index
    }

    /// Byte offset into the current cluster, 0 between tokens.
    pub fn offset(&self) -> usize {
        self.cursor.offset
    }

    /// Argument of the last match, or the operand text.
    pub fn arg(&self) -> Option<&'a str> {
        self.arg
    }

    /// Option behind the most recent error outcome.
    pub fn offending(&self) -> Option<Offender<'a>> {
        self.offending
    }

    /// Whether a `--` has ended option scanning.
    pub fn is_finished(&self) -> bool {
        self.cursor.finished
    }

    /// One step of short-option scanning.
    pub fn scan_short<S: AsRef<str>>(&mut self, argv: &'a [S], optstring: &str) -> Outcome<'a> {
        let step = step(&mut self.cursor, argv, optstring, None);
        self.resolve(step, argv, &[])
    }

    /// One step of long-option scanning. Tokens that do not start with `--`
    /// are matched against `optstring`.
    pub fn scan_long<S: AsRef<str>>(
        &mut self,
        argv: &'a [S],
        optstring: &str,
        long: &[LongOpt<'_>],
    ) -> Outcome<'a> {
        let step = step(&mut self.cursor, argv, optstring, Some(long));
        self.resolve(step, argv, long)
    }

    fn resolve<S: AsRef<str>>(
        &mut self,
        step: Step,
        argv: &'a [S],
        long: &[LongOpt<'_>],
    ) -> Outcome<'a> {
        self.arg = None;
        match step {
            Step::Done => Outcome::Done,
            Step::Operand(token) => {
                let text = argv[token].as_ref();
                self.arg = Some(text);
                Outcome::Operand(text)
            }
            Step::Short { opt, arg } => {
                self.arg = arg.map(|span| span.resolve(argv));
                Outcome::Matched {
                    code: opt as i32,
                    long_index: None,
                    arg: self.arg,
                }
            }
            Step::Long { index, arg } => {
                self.arg = arg.map(|span| span.resolve(argv));
                let opt = &long[index];
                let code = match opt.flag {
                    Some(cell) => {
                        cell.set(opt.val);
                        FLAG_SET
                    }
                    None => opt.val,
                };
                Outcome::Matched {
                    code,
                    long_index: Some(index),
                    arg: self.arg,
                }
            }
            Step::UnknownShort(c) => Outcome::Unknown(self.offend(Offender::Short(c))),
            Step::MissingShort(c) => Outcome::MissingArgument(self.offend(Offender::Short(c))),
            Step::UnknownLong(name) => {
                Outcome::Unknown(self.offend(unresolved(name.resolve(argv))))
            }
            Step::AmbiguousLong(name) => {
                Outcome::Ambiguous(self.offend(unresolved(name.resolve(argv))))
            }
            Step::MissingLong { index, name } => Outcome::MissingArgument(self.offend(
                Offender::Long {
                    name: name.resolve(argv),
                    index: Some(index),
                    code: long[index].code(),
                },
            )),
            Step::UnexpectedLong { index, name } => Outcome::UnexpectedArgument(self.offend(
                Offender::Long {
                    name: name.resolve(argv),
                    index: Some(index),
                    code: long[index].code(),
                },
            )),
        }
    }

    fn offend(&mut self, offender: Offender<'a>) -> Offender<'a> {
        self.offending = Some(offender);
        offender
    }
}

fn unresolved(name: &str) -> Offender<'_> {
    Offender::Long {
        name,
        index: None,
        code: 0,
    }
}
