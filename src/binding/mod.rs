//! PCRE2 binding core
//!
//! This module holds the regex context and the components it is built from.
//!
//! # Module Organization
//!
//! ## Context
//! - [`RegexContext`] - The single mutable API object
//! - [`MatchIter`] - Iterate every match in a subject
//!
//! ## Engine
//! - [`engine`] - Safe owners for compiled patterns and match scratch
//! - [`options`] - Option bits (values from `pcre2.h`) and [`RegexOptions`]
//!
//! ## Results
//! - [`name_table`] - Group names decoded from the engine's name table
//! - [`result`] - Spans, captures and group results
//! - [`advance`] - Next start offset after a (possibly empty) match
//!
//! ## Error Handling
//! - [`error`] - Message buffer, typed errors and rc classification
//!
//! ## C ABI
//! - [`c_ffi`] - Opaque-handle C functions over the context

/// Logging macros - no-op when logging feature is disabled
#[cfg(not(feature = "logging"))]
macro_rules! log_debug {
    ($($arg:tt)*) => {};
}

/// Logging macros - use log crate when logging feature is enabled
#[cfg(feature = "logging")]
macro_rules! log_debug {
    ($($arg:tt)*) => { log::debug!($($arg)*) };
}

// ============================================================================
// Module Declarations
// ============================================================================

pub mod advance;
pub mod context;
pub mod engine;
pub mod error;
pub mod iter;
pub mod name_table;
pub mod options;
pub mod result;

// C ABI for external language bindings
pub mod c_ffi;

// ============================================================================
// Core Types
// ============================================================================

pub use context::RegexContext;
pub use iter::MatchIter;
pub use options::RegexOptions;

// ============================================================================
// Results
// ============================================================================

pub use name_table::{GroupName, GroupNames};
pub use result::{Capture, GroupResult, GroupSnapshot, GroupView, MatchSnapshot, MatchSpan};

// ============================================================================
// Error Handling
// ============================================================================

pub use engine::{PCRE2_ERROR_NOMATCH, PCRE2_FINE, PCRE2_UNSET};
pub use error::{ErrorMessage, MatchOutcome, RegexError, ERROR_MESSAGE_CAPACITY};
