//! The regex context: one mutable object holding all pattern and match state
//!
//! State falls into five bands:
//!
//! - **Error band**: last error number, error offset and message buffer
//! - **Option band**: compile, extra-compile and match options (survive resets)
//! - **Compile output**: compiled pattern, group-name table, capture count
//! - **Match output**: return code, offsets, whole-match span, group results
//! - **Scratch**: the engine's per-match workspace
//!
//! Operations form a strict sequence per context:
//!
//! ```text
//! compile -> (match_at -> fetch_match_results -> get_next_offset -> free_for_next_match)* -> free_context
//! ```
//!
//! Out-of-order calls degrade safely: fetching or advancing without a match
//! result is a no-op, matching without a compiled pattern returns 0.
//!
//! # Example
//!
//! ```rust
//! use pcre2_context::RegexContext;
//!
//! let mut ctx = RegexContext::new();
//! assert!(ctx.compile(br"(?<year>\d{4})-(?<mon>\d{2})"));
//!
//! let subject = b"2024-11";
//! assert_eq!(ctx.match_at(subject, 0), 3);
//! ctx.fetch_match_results();
//!
//! let year = ctx.group_by_name("year").unwrap();
//! assert_eq!(year.text(subject), Some(&b"2024"[..]));
//!
//! ctx.free_for_next_match();
//! ctx.free_context();
//! ```

use super::advance;
use super::engine::{self, CompiledCode, MatchData, PCRE2_ERROR_NOMEMORY, PCRE2_FINE};
use super::error::{format_compile_error, ErrorMessage, MatchOutcome, RegexError};
use super::iter::MatchIter;
use super::name_table::{GroupName, GroupNames};
use super::options::{RegexOptions, PCRE2_UTF};
use super::result::{materialize, GroupResult, GroupView, MatchSnapshot, MatchSpan};

/// Stateful regex context
#[derive(Debug)]
pub struct RegexContext {
    // error band
    error_number: i32,
    error_offset: usize,
    error_message: ErrorMessage,

    /// Options; set before `compile` / `match_at`
    pub options: RegexOptions,

    // compile output
    code: Option<CompiledCode>,
    group_names: GroupNames,
    total_capture_count: u32,
    utf: bool,

    // match output
    with_match_result: bool,
    rc: i64,
    origin_offset: usize,
    next_offset: usize,
    matched_count: i64,
    matched_result: MatchSpan,
    matched_group_results: Vec<GroupResult>,
    matched_group_count: usize,

    // scratch
    match_data: Option<MatchData>,
}

impl Default for RegexContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RegexContext {
    /// Create a context in the neutral state with no options
    pub fn new() -> Self {
        Self::with_options(RegexOptions::default())
    }

    /// Create a context in the neutral state with `options`
    pub fn with_options(options: RegexOptions) -> Self {
        Self {
            error_number: PCRE2_FINE,
            error_offset: 0,
            error_message: ErrorMessage::new(),
            options,
            code: None,
            group_names: GroupNames::default(),
            total_capture_count: 0,
            utf: false,
            with_match_result: false,
            rc: 0,
            origin_offset: 0,
            next_offset: 0,
            matched_count: 0,
            matched_result: MatchSpan::default(),
            matched_group_results: Vec::new(),
            matched_group_count: 0,
            match_data: None,
        }
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Return to the neutral state, keeping the options
    ///
    /// Everything else is cleared: error band, compiled pattern, name table,
    /// match output and scratch. This prepares the context for a new compile,
    /// not for new options.
    pub fn reset_context(&mut self) {
        let options = self.options;
        *self = Self::with_options(options);
    }

    /// Compile `pattern` with the stored compile and extra options
    ///
    /// The pattern ends at its first NUL byte, if any. On failure the error
    /// number and offset are recorded, no pattern is held, and `false` is
    /// returned.
    pub fn compile(&mut self, pattern: &[u8]) -> bool {
        self.reset_context();

        let pattern = match memchr::memchr(0, pattern) {
            Some(nul) => &pattern[..nul],
            None => pattern,
        };

        let code = match CompiledCode::compile(
            pattern,
            self.options.regex_options,
            self.options.regex_extra_options,
        ) {
            Ok(code) => code,
            Err(failure) => {
                self.error_number = failure.code;
                self.error_offset = failure.offset;
                log_debug!(
                    "compile failed: error {} at offset {}",
                    failure.code,
                    failure.offset
                );
                return false;
            }
        };

        self.total_capture_count = code.capture_count();
        self.utf = code.all_options() & PCRE2_UTF != 0;

        let name_count = code.name_count() as usize;
        if name_count > 0 {
            self.group_names =
                GroupNames::decode(code.name_table(), code.name_entry_size() as usize, name_count);
        }

        self.matched_group_results
            .reserve(self.total_capture_count as usize);

        log_debug!(
            "compiled pattern: {} captures, {} named, utf={}",
            self.total_capture_count,
            self.group_names.len(),
            self.utf
        );

        self.code = Some(code);
        true
    }

    /// Compile, returning the failure as a [`RegexError`]
    pub fn compile_checked(&mut self, pattern: &[u8]) -> Result<(), RegexError> {
        if self.compile(pattern) {
            Ok(())
        } else {
            Err(self.compile_error())
        }
    }

    /// Run one match against `subject` starting at `start_offset`
    ///
    /// Returns the engine's raw return code: `> 0` is a match with
    /// `rc - 1` populated groups, `0` is an ovector overflow, negative values
    /// are no-match or errors. Without a compiled pattern this returns 0 and
    /// leaves the context untouched.
    pub fn match_at(&mut self, subject: &[u8], start_offset: usize) -> i64 {
        let code = match self.code.as_ref() {
            Some(code) => code,
            None => return 0,
        };

        // stale results from an unreleased previous match
        self.matched_result = MatchSpan::default();
        self.matched_group_count = 0;
        self.matched_group_results.clear();

        let rc = match MatchData::for_code(code) {
            Some(mut data) => {
                let rc = data.run(code, subject, start_offset, self.options.match_options);
                self.match_data = Some(data);
                rc
            }
            None => {
                self.match_data = None;
                PCRE2_ERROR_NOMEMORY
            }
        };

        self.rc = i64::from(rc);
        self.matched_count = if rc > 0 { 1 } else { 0 };
        self.with_match_result = true;
        self.origin_offset = start_offset;

        log_debug!("match from offset {}: rc={}", start_offset, rc);

        self.rc
    }

    /// Decode the last match into the whole-match span and group results
    ///
    /// No-op unless a match result is outstanding. After a non-match nothing
    /// is materialized and the group count stays 0.
    pub fn fetch_match_results(&mut self) {
        if !self.with_match_result {
            return;
        }

        let data = match self.match_data.as_ref() {
            Some(data) if self.rc > 0 => data,
            _ => {
                self.matched_group_count = 0;
                return;
            }
        };

        self.matched_group_count = materialize(
            data.ovector(),
            self.rc as usize,
            &self.group_names,
            &mut self.matched_result,
            &mut self.matched_group_results,
        );
    }

    /// Compute where the next match on `subject` should start
    ///
    /// Stores the result in [`next_offset`](Self::next_offset). After a
    /// non-match the subject is treated as exhausted (`subject.len() + 1`).
    pub fn get_next_offset(&mut self, subject: &[u8]) {
        if !self.with_match_result {
            return;
        }

        self.next_offset = match self.match_data.as_ref() {
            Some(data) if self.rc > 0 => {
                let ovector = data.ovector();
                advance::next_offset(
                    ovector[0],
                    ovector[1],
                    data.startchar(),
                    subject,
                    self.utf,
                )
            }
            _ => subject.len() + 1,
        };

        log_debug!("next offset: {}", self.next_offset);
    }

    /// Release per-match scratch and clear the match output
    ///
    /// Keeps the compiled pattern, name table, capture count, options and the
    /// capacity of the group-result array. No-op when no match is outstanding.
    pub fn free_for_next_match(&mut self) {
        if !self.with_match_result {
            return;
        }

        log_debug!("releasing match scratch from offset {}", self.origin_offset);
        self.match_data = None;

        self.error_number = PCRE2_FINE;
        self.error_offset = 0;
        self.error_message.clear();

        self.with_match_result = false;
        self.next_offset = 0;
        self.origin_offset = 0;
        self.rc = 0;

        self.matched_count = 0;
        self.matched_result = MatchSpan::default();

        self.matched_group_count = 0;
        self.matched_group_results.clear();
    }

    /// Release everything the context owns, then reset it
    ///
    /// Options survive. Calling this twice is harmless.
    pub fn free_context(&mut self) {
        log_debug!("freeing context, pattern held: {}", self.code.is_some());
        self.match_data = None;
        self.code = None;
        self.group_names = GroupNames::default();
        self.matched_group_results = Vec::new();
        self.reset_context();
    }

    /// Format the last compile error into the message buffer
    pub fn get_last_error_message(&mut self) {
        let engine_message = engine::error_message(self.error_number);
        self.error_message
            .set(&format_compile_error(self.error_offset, &engine_message));
    }

    // ========================================================================
    // Error Band
    // ========================================================================

    /// Last engine error number ([`PCRE2_FINE`] when there is none)
    #[inline]
    pub fn error_number(&self) -> i32 {
        self.error_number
    }

    /// Offset in the pattern where compilation failed
    #[inline]
    pub fn error_offset(&self) -> usize {
        self.error_offset
    }

    /// Message buffer filled by [`get_last_error_message`](Self::get_last_error_message)
    #[inline]
    pub fn error_message(&self) -> &ErrorMessage {
        &self.error_message
    }

    /// The recorded compile failure as a typed error
    pub fn compile_error(&self) -> RegexError {
        RegexError::Compile {
            code: self.error_number,
            offset: self.error_offset,
            message: engine::error_message(self.error_number),
        }
    }

    // ========================================================================
    // Compile Output
    // ========================================================================

    /// Whether a compiled pattern is held
    #[inline]
    pub fn is_compiled(&self) -> bool {
        self.code.is_some()
    }

    /// Identity of the compiled pattern; equal across match cycles
    #[inline]
    pub fn compiled_id(&self) -> Option<usize> {
        self.code.as_ref().map(CompiledCode::id)
    }

    /// Whether the compiled pattern runs in UTF mode
    #[inline]
    pub fn is_utf(&self) -> bool {
        self.utf
    }

    /// Named groups of the compiled pattern, in name-table order
    #[inline]
    pub fn group_names(&self) -> &GroupNames {
        &self.group_names
    }

    /// Number of named groups
    #[inline]
    pub fn group_name_count(&self) -> usize {
        self.group_names.len()
    }

    /// Number of capture groups, named or not
    #[inline]
    pub fn total_capture_count(&self) -> u32 {
        self.total_capture_count
    }

    /// Name entry for capture group `capture_index`
    #[inline]
    pub fn group_name_for(&self, capture_index: u32) -> Option<&GroupName> {
        self.group_names.for_capture(capture_index)
    }

    // ========================================================================
    // Match Output
    // ========================================================================

    /// Whether a match ran and has not been released yet
    #[inline]
    pub fn with_match_result(&self) -> bool {
        self.with_match_result
    }

    /// Raw engine return code of the last match
    #[inline]
    pub fn rc(&self) -> i64 {
        self.rc
    }

    /// Classification of [`rc`](Self::rc)
    #[inline]
    pub fn outcome(&self) -> MatchOutcome {
        MatchOutcome::from_rc(self.rc)
    }

    /// Start offset passed to the last match
    #[inline]
    pub fn origin_offset(&self) -> usize {
        self.origin_offset
    }

    /// Offset computed by [`get_next_offset`](Self::get_next_offset)
    #[inline]
    pub fn next_offset(&self) -> usize {
        self.next_offset
    }

    /// 1 after a successful match, 0 otherwise
    #[inline]
    pub fn matched_count(&self) -> i64 {
        self.matched_count
    }

    /// Whole-match span
    #[inline]
    pub fn matched_result(&self) -> MatchSpan {
        self.matched_result
    }

    /// Populated group results, in capture-index order
    #[inline]
    pub fn matched_group_results(&self) -> &[GroupResult] {
        &self.matched_group_results[..self.matched_group_count]
    }

    /// Number of populated group results
    #[inline]
    pub fn matched_group_count(&self) -> usize {
        self.matched_group_count
    }

    /// Allocated capacity of the group-result array
    #[inline]
    pub fn matched_group_capacity(&self) -> usize {
        self.matched_group_results.capacity()
    }

    /// Name entry a group result refers to
    #[inline]
    pub fn group_name(&self, result: &GroupResult) -> Option<&GroupName> {
        result.name_slot.and_then(|slot| self.group_names.get(slot))
    }

    /// Group results with names resolved
    pub fn matched_groups(&self) -> impl Iterator<Item = GroupView<'_>> + '_ {
        self.matched_group_results()
            .iter()
            .map(move |result| GroupView::resolve(result, &self.group_names))
    }

    /// Group result for 1-based `capture_index`
    pub fn group(&self, capture_index: u32) -> Option<GroupView<'_>> {
        let slot = (capture_index as usize).checked_sub(1)?;
        self.matched_group_results()
            .get(slot)
            .map(|result| GroupView::resolve(result, &self.group_names))
    }

    /// First participating group called `name`
    pub fn group_by_name(&self, name: &str) -> Option<GroupView<'_>> {
        self.group_names
            .named(name.as_bytes())
            .filter_map(|entry| self.group(entry.capture_index()))
            .filter(|view| view.capture.is_set())
            .min_by_key(|view| view.capture_index)
    }

    /// Bytes of the whole match, re-extracted from `subject`
    pub fn matched_text<'s>(&self, subject: &'s [u8]) -> Option<&'s [u8]> {
        if self.matched_count == 0 {
            return None;
        }
        self.matched_result.slice(subject)
    }

    /// Bytes captured by group `capture_index`, re-extracted from `subject`
    ///
    /// `None` when the group is out of range or did not participate.
    pub fn group_text<'s>(&self, subject: &'s [u8], capture_index: u32) -> Option<&'s [u8]> {
        self.group(capture_index)?.text(subject)
    }

    /// Owned copy of the current results, if a match was fetched
    pub fn snapshot(&self) -> Option<MatchSnapshot> {
        if !self.with_match_result || self.matched_count == 0 {
            return None;
        }
        Some(MatchSnapshot {
            origin_offset: self.origin_offset,
            next_offset: self.next_offset,
            whole: self.matched_result,
            groups: self.matched_groups().map(Into::into).collect(),
        })
    }

    /// Current results as JSON (`null` when there is no match)
    pub fn results_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.snapshot())
    }

    // ========================================================================
    // Convenience
    // ========================================================================

    /// Run one full cycle: match, fetch, advance, release
    ///
    /// Returns the match as a snapshot, `None` on no match.
    pub fn find_at(
        &mut self,
        subject: &[u8],
        start_offset: usize,
    ) -> Result<Option<MatchSnapshot>, RegexError> {
        if !self.is_compiled() {
            return Err(RegexError::NotCompiled);
        }

        let rc = self.match_at(subject, start_offset);
        let outcome = MatchOutcome::from_rc(rc);

        let found = match outcome {
            MatchOutcome::Matched(_) => {
                self.fetch_match_results();
                self.get_next_offset(subject);
                self.snapshot()
            }
            _ => None,
        };

        self.free_for_next_match();

        match outcome {
            MatchOutcome::Failed(_) => outcome.into_result().map(|_| None),
            _ => Ok(found),
        }
    }

    /// Iterate every match in `subject`, advancing past empty matches
    pub fn find_iter<'c, 's>(&'c mut self, subject: &'s [u8]) -> MatchIter<'c, 's> {
        MatchIter::new(self, subject)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::engine::PCRE2_ERROR_NOMATCH;
    use crate::binding::options::{PCRE2_CASELESS, PCRE2_NOTEMPTY};
    use crate::binding::result::Capture;

    #[test]
    fn test_new_is_neutral() {
        let ctx = RegexContext::new();
        assert_eq!(ctx.error_number(), PCRE2_FINE);
        assert!(!ctx.is_compiled());
        assert!(!ctx.with_match_result());
        assert_eq!(ctx.matched_group_count(), 0);
        assert_eq!(ctx.group_name_count(), 0);
    }

    #[test]
    fn test_match_without_compile_returns_zero() {
        let mut ctx = RegexContext::new();
        assert_eq!(ctx.match_at(b"abc", 0), 0);
        assert!(!ctx.with_match_result());
        assert_eq!(ctx.rc(), 0);
    }

    #[test]
    fn test_fetch_and_advance_without_match_are_noops() {
        let mut ctx = RegexContext::new();
        assert!(ctx.compile(b"a"));
        ctx.fetch_match_results();
        ctx.get_next_offset(b"a");
        assert_eq!(ctx.matched_group_count(), 0);
        assert_eq!(ctx.next_offset(), 0);
    }

    #[test]
    fn test_compile_records_metadata() {
        let mut ctx = RegexContext::new();
        assert!(ctx.compile(br"(?<x>a)(b)(?<y>c)"));
        assert_eq!(ctx.total_capture_count(), 3);
        assert_eq!(ctx.group_name_count(), 2);
        assert_eq!(ctx.group_name_for(1).unwrap().as_str(), Some("x"));
        assert!(ctx.group_name_for(2).is_none());
        assert_eq!(ctx.group_name_for(3).unwrap().as_str(), Some("y"));
        assert!(ctx.matched_group_capacity() >= 3);
    }

    #[test]
    fn test_names_resolve_by_capture_index() {
        let mut ctx = RegexContext::new();
        assert!(ctx.compile(br"(?<zeta>a)(?<alpha>b)"));
        assert_eq!(ctx.group_names().get(0).unwrap().as_str(), Some("alpha"));

        assert_eq!(ctx.match_at(b"ab", 0), 3);
        ctx.fetch_match_results();
        assert_eq!(ctx.group(1).unwrap().name.unwrap().as_str(), Some("zeta"));
        assert_eq!(ctx.group(2).unwrap().name.unwrap().as_str(), Some("alpha"));
    }

    #[test]
    fn test_compile_stops_at_nul() {
        let mut ctx = RegexContext::new();
        assert!(ctx.compile(b"ab\0[garbage"));
        assert_eq!(ctx.match_at(b"xxab", 0), 1);
    }

    #[test]
    fn test_options_reach_compile_and_match() {
        let mut ctx = RegexContext::new();
        ctx.options.regex_options = PCRE2_CASELESS;
        assert!(ctx.compile(b"abc"));
        assert_eq!(ctx.match_at(b"ABC", 0), 1);

        ctx.free_for_next_match();
        ctx.options.match_options = PCRE2_NOTEMPTY;
        assert!(ctx.compile(b"x*"));
        assert_eq!(ctx.match_at(b"yyy", 0), i64::from(PCRE2_ERROR_NOMATCH));
    }

    #[test]
    fn test_unset_group_is_explicit() {
        let mut ctx = RegexContext::new();
        assert!(ctx.compile(b"(a)|(b)"));
        assert_eq!(ctx.match_at(b"b", 0), 3);
        ctx.fetch_match_results();

        let groups = ctx.matched_group_results();
        assert_eq!(groups[0].capture, Capture::Unset);
        assert_eq!(groups[1].capture, Capture::Set(MatchSpan::new(0, 1)));
    }

    #[test]
    fn test_trailing_unset_groups_are_not_counted() {
        let mut ctx = RegexContext::new();
        assert!(ctx.compile(b"(a)(b)?(c)?"));
        assert_eq!(ctx.match_at(b"a", 0), 2);
        ctx.fetch_match_results();
        assert_eq!(ctx.matched_group_count(), 1);
        assert_eq!(ctx.total_capture_count(), 3);
    }

    #[test]
    fn test_repeated_fetch_is_idempotent() {
        let mut ctx = RegexContext::new();
        assert!(ctx.compile(br"(\d)(\d)"));
        ctx.match_at(b"42", 0);
        ctx.fetch_match_results();
        ctx.fetch_match_results();
        assert_eq!(ctx.matched_group_count(), 2);
    }

    #[test]
    fn test_free_for_next_match_keeps_pattern() {
        let mut ctx = RegexContext::new();
        assert!(ctx.compile(br"(?<d>\d)"));
        let id = ctx.compiled_id();
        ctx.match_at(b"7", 0);
        ctx.fetch_match_results();
        let capacity = ctx.matched_group_capacity();

        ctx.free_for_next_match();

        assert!(!ctx.with_match_result());
        assert_eq!(ctx.rc(), 0);
        assert_eq!(ctx.matched_count(), 0);
        assert_eq!(ctx.matched_group_count(), 0);
        assert_eq!(ctx.compiled_id(), id);
        assert_eq!(ctx.group_name_count(), 1);
        assert_eq!(ctx.matched_group_capacity(), capacity);
    }

    #[test]
    fn test_free_context_releases_everything() {
        let mut ctx = RegexContext::new();
        ctx.options.match_options = PCRE2_NOTEMPTY;
        assert!(ctx.compile(br"(?<d>\d)"));
        ctx.match_at(b"7", 0);

        ctx.free_context();

        assert!(!ctx.is_compiled());
        assert_eq!(ctx.group_name_count(), 0);
        assert_eq!(ctx.total_capture_count(), 0);
        assert!(!ctx.with_match_result());
        assert_eq!(ctx.options.match_options, PCRE2_NOTEMPTY);

        ctx.free_context();
        assert!(!ctx.is_compiled());
    }

    #[test]
    fn test_group_text() {
        let mut ctx = RegexContext::new();
        assert!(ctx.compile(br"(\d+)-(x)?(\d+)"));

        let subject = b"ab 12-345";
        assert!(ctx.match_at(subject, 0) > 0);
        ctx.fetch_match_results();

        assert_eq!(ctx.group_text(subject, 1), Some(&b"12"[..]));
        assert_eq!(ctx.group_text(subject, 2), None);
        assert_eq!(ctx.group_text(subject, 3), Some(&b"345"[..]));
        assert_eq!(ctx.group_text(subject, 0), None);
        assert_eq!(ctx.group_text(subject, 4), None);

        ctx.free_for_next_match();
        assert_eq!(ctx.group_text(subject, 1), None);
    }

    #[test]
    fn test_group_by_name_with_duplicates() {
        let mut ctx = RegexContext::new();
        ctx.options.regex_options = crate::binding::options::PCRE2_DUPNAMES;
        assert!(ctx.compile(br"(?<n>a)|(?<n>b)"));
        ctx.match_at(b"b", 0);
        ctx.fetch_match_results();

        let view = ctx.group_by_name("n").unwrap();
        assert_eq!(view.capture_index, 2);
        assert!(ctx.group_by_name("missing").is_none());
    }

    #[test]
    fn test_find_at_reports_engine_errors() {
        let mut ctx = RegexContext::new();
        assert_eq!(ctx.find_at(b"abc", 0), Err(RegexError::NotCompiled));

        assert!(ctx.compile(b"a"));
        match ctx.find_at(b"abc", 10) {
            Err(RegexError::Match { code, .. }) => {
                assert_eq!(code, engine::PCRE2_ERROR_BADOFFSET)
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(!ctx.with_match_result());
    }

    #[test]
    fn test_results_json() {
        let mut ctx = RegexContext::new();
        assert_eq!(ctx.results_json().unwrap(), "null");

        assert!(ctx.compile(br"(?<w>\w+)"));
        ctx.match_at(b"hi", 0);
        ctx.fetch_match_results();
        ctx.get_next_offset(b"hi");

        let json: serde_json::Value = serde_json::from_str(&ctx.results_json().unwrap()).unwrap();
        assert_eq!(json["whole"]["len"], 2);
        assert_eq!(json["next_offset"], 2);
        assert_eq!(json["groups"][0]["name"], "w");
    }
}
