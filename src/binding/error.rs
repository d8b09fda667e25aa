//! Errors: the context's message buffer, typed errors and rc classification
//!
//! The context records errors instead of raising them. [`ErrorMessage`] is the
//! fixed buffer the error reporter fills; [`RegexError`] and [`MatchOutcome`]
//! give Rust callers a typed view of the same information.

use std::fmt;

use super::engine::{PCRE2_ERROR_NOMATCH, PCRE2_ERROR_PARTIAL};

/// Capacity of the message buffer, including the trailing NUL
pub const ERROR_MESSAGE_CAPACITY: usize = 512;

// ============================================================================
// Message Buffer
// ============================================================================

/// Fixed-size, NUL-terminated message buffer
///
/// Longer messages are truncated on a UTF-8 character boundary.
#[derive(Clone)]
pub struct ErrorMessage {
    buffer: [u8; ERROR_MESSAGE_CAPACITY],
    len: usize,
}

impl ErrorMessage {
    /// Create an empty message
    pub const fn new() -> Self {
        Self {
            buffer: [0; ERROR_MESSAGE_CAPACITY],
            len: 0,
        }
    }

    /// Replace the contents with `message`, truncating if needed
    pub fn set(&mut self, message: &str) {
        let mut len = message.len().min(ERROR_MESSAGE_CAPACITY - 1);
        while !message.is_char_boundary(len) {
            len -= 1;
        }
        self.buffer[..len].copy_from_slice(&message.as_bytes()[..len]);
        self.buffer[len] = 0;
        self.len = len;
    }

    /// Empty the buffer
    pub fn clear(&mut self) {
        self.buffer[0] = 0;
        self.len = 0;
    }

    /// Message length in bytes, excluding the NUL
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no message is recorded
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Message bytes, excluding the NUL
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer[..self.len]
    }

    /// Message text
    pub fn as_str(&self) -> &str {
        // `set` only ever copies whole characters
        std::str::from_utf8(self.as_bytes()).unwrap_or_default()
    }

    /// Message bytes including the NUL terminator
    #[inline]
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        &self.buffer[..=self.len]
    }
}

impl Default for ErrorMessage {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ErrorMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ErrorMessage").field(&self.as_str()).finish()
    }
}

impl fmt::Display for ErrorMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Text the error reporter writes for a compile failure
pub fn format_compile_error(offset: usize, engine_message: &str) -> String {
    format!(
        "PCRE2 compilation failed at offset {}: {}\n",
        offset, engine_message
    )
}

// ============================================================================
// Typed Errors
// ============================================================================

/// Error type for the Rust-facing API
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegexError {
    /// The pattern did not compile
    Compile {
        /// Engine error number
        code: i32,
        /// Offset in the pattern
        offset: usize,
        /// Engine message
        message: String,
    },

    /// The subject did not match
    NoMatch,

    /// The engine failed while matching
    Match {
        /// Negative engine return code
        code: i32,
        /// Engine message
        message: String,
    },

    /// A match was requested before a successful compile
    NotCompiled,
}

impl fmt::Display for RegexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compile {
                code,
                offset,
                message,
            } => write!(
                f,
                "PCRE2 compilation failed at offset {}: {} (error {})",
                offset, message, code
            ),
            Self::NoMatch => write!(f, "no match"),
            Self::Match { code, message } => {
                write!(f, "PCRE2 matching error {}: {}", code, message)
            }
            Self::NotCompiled => write!(f, "no compiled pattern in context"),
        }
    }
}

impl std::error::Error for RegexError {}

// ============================================================================
// Match Outcome
// ============================================================================

/// Classification of an engine match return code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    /// One match; the payload is the number of populated group slots
    Matched(usize),
    /// The subject did not match (partial matches count as no match)
    NoMatch,
    /// The ovector was too small to hold every slot
    OvectorTooSmall,
    /// Any other engine error
    Failed(i32),
}

impl MatchOutcome {
    /// Classify a raw return code
    pub fn from_rc(rc: i64) -> Self {
        match rc {
            rc if rc > 0 => MatchOutcome::Matched((rc - 1) as usize),
            0 => MatchOutcome::OvectorTooSmall,
            rc if rc == i64::from(PCRE2_ERROR_NOMATCH) || rc == i64::from(PCRE2_ERROR_PARTIAL) => {
                MatchOutcome::NoMatch
            }
            rc => MatchOutcome::Failed(rc as i32),
        }
    }

    /// Whether a match was found
    #[inline]
    pub fn is_match(&self) -> bool {
        matches!(self, MatchOutcome::Matched(_))
    }

    /// Convert into a `Result`, mapping failures to [`RegexError`]
    pub fn into_result(self) -> Result<usize, RegexError> {
        match self {
            MatchOutcome::Matched(groups) => Ok(groups),
            MatchOutcome::NoMatch | MatchOutcome::OvectorTooSmall => Err(RegexError::NoMatch),
            MatchOutcome::Failed(code) => Err(RegexError::Match {
                code,
                message: super::engine::error_message(code),
            }),
        }
    }
}
