//! Iterating every match in one subject

use super::context::RegexContext;
use super::error::RegexError;
use super::result::MatchSnapshot;

/// Iterator over successive matches of a context's pattern in a subject
///
/// Each step runs `match -> fetch -> advance -> free_for_next_match` and
/// yields an owned snapshot. Iteration ends once the next offset passes the
/// end of the subject, at the first non-match, or after yielding an engine
/// error. A match whose next offset does not move past the current one (a
/// `\K` inside a lookaround can end a match before it starts) is yielded and
/// then ends the iteration.
///
/// # Example
///
/// ```rust
/// use pcre2_context::RegexContext;
///
/// let mut ctx = RegexContext::new();
/// assert!(ctx.compile(b"a*"));
///
/// let spans: Vec<_> = ctx
///     .find_iter(b"aaa")
///     .map(|m| m.unwrap().whole)
///     .map(|s| (s.start, s.len))
///     .collect();
/// assert_eq!(spans, vec![(0, 3), (3, 0)]);
/// ```
pub struct MatchIter<'c, 's> {
    ctx: &'c mut RegexContext,
    subject: &'s [u8],
    offset: usize,
    done: bool,
}

impl<'c, 's> MatchIter<'c, 's> {
    /// Start iterating at offset 0
    pub fn new(ctx: &'c mut RegexContext, subject: &'s [u8]) -> Self {
        Self {
            ctx,
            subject,
            offset: 0,
            done: false,
        }
    }

    /// Offset the next step will start from
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl Iterator for MatchIter<'_, '_> {
    type Item = Result<MatchSnapshot, RegexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.offset > self.subject.len() {
            return None;
        }

        match self.ctx.find_at(self.subject, self.offset) {
            Ok(Some(found)) => {
                // \K in a lookaround can end a match before its start
                if found.next_offset < found.whole.start || found.next_offset <= self.offset {
                    log_debug!(
                        "match at {} ends at {}, behind the cursor {}; stopping",
                        found.whole.start,
                        found.next_offset,
                        self.offset
                    );
                    self.done = true;
                }
                self.offset = found.next_offset;
                Some(Ok(found))
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

impl std::iter::FusedIterator for MatchIter<'_, '_> {}
