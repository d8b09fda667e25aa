//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types from pcre2-context.
//! Importing this module with a wildcard import brings the core types into scope:
//!
//! ```
//! use pcre2_context::prelude::*;
//! ```
//!
//! # Re-exported Items
//!
//! ## Context
//! - [`RegexContext`] - The regex context
//! - [`RegexOptions`] - Compile, extra-compile and match options
//! - [`MatchIter`] - Iterator over every match in a subject
//!
//! ## Results
//! - [`MatchSpan`] - Byte range of a match or group
//! - [`Capture`] - A group span or "unset"
//! - [`GroupView`] - Group result with its name resolved
//! - [`MatchSnapshot`] - Owned copy of one match
//!
//! ## Error Handling
//! - [`RegexError`] - Typed error
//! - [`MatchOutcome`] - Classified match return code

// ============================================================================
// Context
// ============================================================================

pub use crate::binding::{MatchIter, RegexContext, RegexOptions};

// ============================================================================
// Results
// ============================================================================

pub use crate::binding::{Capture, GroupName, GroupView, MatchSnapshot, MatchSpan};

// ============================================================================
// Error Handling
// ============================================================================

pub use crate::binding::{MatchOutcome, RegexError};
