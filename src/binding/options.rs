//! Option bits and the option band of a regex context
//!
//! The bit values are copied from `pcre2.h` and must stay identical to the
//! engine's header. They are opaque to this crate: options are stored,
//! forwarded to the engine, and (for [`PCRE2_UTF`]) inspected when advancing
//! past an empty match.

// ============================================================================
// Compile + Match Options
// ============================================================================

// These bits can be passed to compile and to match. `PCRE2_NO_UTF_CHECK`
// only affects the call it is passed to.

/// Force the match to start at the start offset
pub const PCRE2_ANCHORED: u32 = 0x8000_0000;
/// Skip UTF validity checking of the pattern or subject
pub const PCRE2_NO_UTF_CHECK: u32 = 0x4000_0000;
/// Force the match to end at the end of the subject
pub const PCRE2_ENDANCHORED: u32 = 0x2000_0000;

// ============================================================================
// Compile Options
// ============================================================================

/// Allow an empty class `[]`
pub const PCRE2_ALLOW_EMPTY_CLASS: u32 = 0x0000_0001;
/// JavaScript-style `\u`, `\U` and `\x` escapes
pub const PCRE2_ALT_BSUX: u32 = 0x0000_0002;
/// Insert a callout before each pattern item
pub const PCRE2_AUTO_CALLOUT: u32 = 0x0000_0004;
/// Case-insensitive matching
pub const PCRE2_CASELESS: u32 = 0x0000_0008;
/// `$` matches only at the very end of the subject
pub const PCRE2_DOLLAR_ENDONLY: u32 = 0x0000_0010;
/// `.` also matches newlines
pub const PCRE2_DOTALL: u32 = 0x0000_0020;
/// Allow duplicate group names
pub const PCRE2_DUPNAMES: u32 = 0x0000_0040;
/// Ignore whitespace and `#` comments in the pattern
pub const PCRE2_EXTENDED: u32 = 0x0000_0080;
/// Unanchored match must start before the first newline
pub const PCRE2_FIRSTLINE: u32 = 0x0000_0100;
/// Backreference to an unset group matches the empty string
pub const PCRE2_MATCH_UNSET_BACKREF: u32 = 0x0000_0200;
/// `^` and `$` match at internal newlines
pub const PCRE2_MULTILINE: u32 = 0x0000_0400;
/// Lock out `(*UCP)`
pub const PCRE2_NEVER_UCP: u32 = 0x0000_0800;
/// Lock out `(*UTF)`
pub const PCRE2_NEVER_UTF: u32 = 0x0000_1000;
/// Plain parentheses do not capture
pub const PCRE2_NO_AUTO_CAPTURE: u32 = 0x0000_2000;
/// Disable auto-possessification
pub const PCRE2_NO_AUTO_POSSESS: u32 = 0x0000_4000;
/// Disable the implicit `.*` anchoring optimization
pub const PCRE2_NO_DOTSTAR_ANCHOR: u32 = 0x0000_8000;
/// Disable start-of-match optimizations
pub const PCRE2_NO_START_OPTIMIZE: u32 = 0x0001_0000;
/// Use Unicode properties for `\d`, `\w` and friends
pub const PCRE2_UCP: u32 = 0x0002_0000;
/// Invert greediness of quantifiers
pub const PCRE2_UNGREEDY: u32 = 0x0004_0000;
/// Treat pattern and subject as UTF-8
pub const PCRE2_UTF: u32 = 0x0008_0000;
/// Lock out `\C`
pub const PCRE2_NEVER_BACKSLASH_C: u32 = 0x0010_0000;
/// `^` also matches after a final newline in multiline mode
pub const PCRE2_ALT_CIRCUMFLEX: u32 = 0x0020_0000;
/// Process backslashes in verb names
pub const PCRE2_ALT_VERBNAMES: u32 = 0x0040_0000;
/// Enable the offset limit set in a match context
pub const PCRE2_USE_OFFSET_LIMIT: u32 = 0x0080_0000;
/// Like `PCRE2_EXTENDED`, also ignoring space and tab in classes
pub const PCRE2_EXTENDED_MORE: u32 = 0x0100_0000;
/// Treat the whole pattern as a literal string
pub const PCRE2_LITERAL: u32 = 0x0200_0000;
/// Allow matching in subjects containing invalid UTF
pub const PCRE2_MATCH_INVALID_UTF: u32 = 0x0400_0000;

// ============================================================================
// Extra Compile Options
// ============================================================================

/// Allow `\x{d800}` to `\x{dfff}` in non-UTF-16/32 modes
pub const PCRE2_EXTRA_ALLOW_SURROGATE_ESCAPES: u32 = 0x0000_0001;
/// Treat unrecognized escapes as literals
pub const PCRE2_EXTRA_BAD_ESCAPE_IS_LITERAL: u32 = 0x0000_0002;
/// Pattern must match whole words
pub const PCRE2_EXTRA_MATCH_WORD: u32 = 0x0000_0004;
/// Pattern must match whole lines
pub const PCRE2_EXTRA_MATCH_LINE: u32 = 0x0000_0008;
/// Interpret `\r` as `\n`
pub const PCRE2_EXTRA_ESCAPED_CR_IS_LF: u32 = 0x0000_0010;
/// ECMAScript 6 `\u{hhh..}` escapes
pub const PCRE2_EXTRA_ALT_BSUX: u32 = 0x0000_0020;
/// Allow `\K` inside lookarounds
pub const PCRE2_EXTRA_ALLOW_LOOKAROUND_BSK: u32 = 0x0000_0040;

// ============================================================================
// Match Options
// ============================================================================

/// Subject start is not the beginning of a line
pub const PCRE2_NOTBOL: u32 = 0x0000_0001;
/// Subject end is not the end of a line
pub const PCRE2_NOTEOL: u32 = 0x0000_0002;
/// An empty string is not a valid match
pub const PCRE2_NOTEMPTY: u32 = 0x0000_0004;
/// An empty string at the start offset is not a valid match
pub const PCRE2_NOTEMPTY_ATSTART: u32 = 0x0000_0008;
/// Return a partial match if no full match is found
pub const PCRE2_PARTIAL_SOFT: u32 = 0x0000_0010;
/// Prefer a partial match over a full match
pub const PCRE2_PARTIAL_HARD: u32 = 0x0000_0020;
/// Do not use JIT even if the pattern was JIT-compiled
pub const PCRE2_NO_JIT: u32 = 0x0000_2000;
/// Copy the subject into the match data
pub const PCRE2_COPY_MATCHED_SUBJECT: u32 = 0x0000_4000;

// ============================================================================
// Option Band
// ============================================================================

/// Options a caller sets once per context
///
/// Not cleared by [`RegexContext::reset_context`](super::RegexContext::reset_context)
/// or by per-match teardown.
///
/// # Example
///
/// ```rust
/// use pcre2_context::binding::options::{RegexOptions, PCRE2_CASELESS, PCRE2_UTF};
///
/// let options = RegexOptions::new().with_regex_options(PCRE2_UTF | PCRE2_CASELESS);
/// assert!(options.is_utf());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegexOptions {
    /// Options passed to compile
    pub regex_options: u32,

    /// Extra options passed to compile through a compile context
    pub regex_extra_options: u32,

    /// Options passed to every match
    pub match_options: u32,
}

impl RegexOptions {
    /// Create an empty option set
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the compile options
    pub fn with_regex_options(mut self, bits: u32) -> Self {
        self.regex_options = bits;
        self
    }

    /// Set the extra compile options
    pub fn with_regex_extra_options(mut self, bits: u32) -> Self {
        self.regex_extra_options = bits;
        self
    }

    /// Set the match options
    pub fn with_match_options(mut self, bits: u32) -> Self {
        self.match_options = bits;
        self
    }

    /// Whether the requested compile options include UTF mode
    ///
    /// The pattern itself can also switch UTF on with `(*UTF)`; the context
    /// asks the compiled pattern for that.
    #[inline]
    pub fn is_utf(&self) -> bool {
        self.regex_options & PCRE2_UTF != 0
    }
}
