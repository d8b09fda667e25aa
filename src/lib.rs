//! pcre2-context - Stateful PCRE2 Regex Context
//!
//! This crate exposes a PCRE2 regular-expression engine through one mutable
//! context object. It provides:
//! - Compile-once, match-many lifecycle with two-tier teardown
//! - Whole-match and ordered capture-group results, including named groups
//! - Safe iteration over a subject, including zero-width matches in UTF-8
//! - Compile error reporting into a fixed message buffer
//! - A C ABI over the same context
//!
//! ## Quick Start
//!
//! ```rust
//! use pcre2_context::RegexContext;
//!
//! let mut ctx = RegexContext::new();
//! assert!(ctx.compile(br"(\d+)-(\d+)"));
//!
//! let subject = b"12-345";
//! assert_eq!(ctx.match_at(subject, 0), 3);
//! ctx.fetch_match_results();
//!
//! assert_eq!(ctx.matched_text(subject), Some(&b"12-345"[..]));
//! assert_eq!(ctx.group(2).unwrap().text(subject), Some(&b"345"[..]));
//! ```
//!
//! ## Options
//!
//! ```rust
//! use pcre2_context::binding::options::{PCRE2_CASELESS, PCRE2_UTF};
//! use pcre2_context::{RegexContext, RegexOptions};
//!
//! let options = RegexOptions::new().with_regex_options(PCRE2_UTF | PCRE2_CASELESS);
//! let mut ctx = RegexContext::with_options(options);
//! assert!(ctx.compile("straße".as_bytes()));
//! assert!(ctx.match_at("STRAßE".as_bytes(), 0) > 0);
//! ```
//!
//! ## Feature Flags
//!
//! - `logging` - Enable debug logging using the `log` crate

// Lint configuration for production quality
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(clippy::all)]

// Prelude module for convenient imports
pub mod prelude;

// Context, engine wrappers, results and C ABI
pub mod binding;

/// Re-export commonly used types for convenience
pub use binding::{
    // Results
    Capture,
    GroupName,
    GroupNames,
    GroupResult,
    GroupView,
    MatchSnapshot,
    MatchSpan,
    // Errors
    ErrorMessage,
    MatchOutcome,
    RegexError,
    // Context
    MatchIter,
    RegexContext,
    RegexOptions,
};
