//! C ABI for the regex context
//!
//! This module exposes a [`RegexContext`] to C and to any language that can
//! call C functions, through an opaque handle.
//!
//! # Example (C)
//!
//! ```c
//! #include <pcre2ctx.h>
//!
//! int main() {
//!     Pcre2Ctx* ctx = pcre2ctx_new();
//!     pcre2ctx_set_options(ctx, PCRE2_UTF, 0, 0);
//!
//!     if (!pcre2ctx_compile(ctx, "(?<word>\\w+)")) {
//!         printf("%s", pcre2ctx_last_error_message(ctx));
//!         pcre2ctx_free(ctx);
//!         return 1;
//!     }
//!
//!     const char* subject = "hello world";
//!     size_t len = strlen(subject);
//!     size_t offset = 0;
//!     while (offset <= len && pcre2ctx_match(ctx, subject, len, offset) > 0) {
//!         pcre2ctx_fetch_match_results(ctx);
//!         char* json = pcre2ctx_results_json(ctx);
//!         printf("%s\n", json);
//!         pcre2ctx_string_free(json);
//!         offset = pcre2ctx_next_offset(ctx, subject, len);
//!         pcre2ctx_free_for_next_match(ctx);
//!     }
//!
//!     pcre2ctx_free(ctx);
//!     return 0;
//! }
//! ```
//!
//! # Thread Safety
//!
//! A handle must not be used from several threads at once. Distinct handles
//! are independent.
//!
//! # Memory Management
//!
//! - Use `pcre2ctx_free()` to free a handle
//! - Use `pcre2ctx_string_free()` to free strings returned by `pcre2ctx_results_json()`
//! - Strings returned by `pcre2ctx_last_error_message()` and
//!   `pcre2ctx_group_name()` belong to the handle

use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int};
use std::ptr;

use super::context::RegexContext;

// ============================================================================
// Opaque Types
// ============================================================================

/// Opaque handle to a regex context
pub struct Pcre2Ctx {
    context: RegexContext,
}

// ============================================================================
// Error Codes
// ============================================================================

/// Success
pub const PCRE2CTX_OK: c_int = 0;
/// Null pointer passed
pub const PCRE2CTX_ERROR_NULL_POINTER: c_int = -1;
/// Group index out of range
pub const PCRE2CTX_ERROR_NO_GROUP: c_int = -2;
/// Group did not participate in the match
pub const PCRE2CTX_ERROR_UNSET_GROUP: c_int = -3;

/// Build a subject slice from a C pointer and length
///
/// # Safety
///
/// `subject` must be valid for `len` bytes, or null with `len == 0`.
unsafe fn subject_slice<'a>(subject: *const u8, len: usize) -> Option<&'a [u8]> {
    if subject.is_null() {
        return if len == 0 { Some(&[]) } else { None };
    }
    Some(std::slice::from_raw_parts(subject, len))
}

// ============================================================================
// Lifecycle Functions
// ============================================================================

/// Create a new context in the neutral state
///
/// The returned pointer must be freed with `pcre2ctx_free`.
#[no_mangle]
pub extern "C" fn pcre2ctx_new() -> *mut Pcre2Ctx {
    Box::into_raw(Box::new(Pcre2Ctx {
        context: RegexContext::new(),
    }))
}

/// Free a context and everything it owns
///
/// # Safety
///
/// - `ctx` must be a pointer returned by `pcre2ctx_new`, or null
/// - The pointer must not be used after this call
#[no_mangle]
pub unsafe extern "C" fn pcre2ctx_free(ctx: *mut Pcre2Ctx) {
    if !ctx.is_null() {
        let _ = Box::from_raw(ctx);
    }
}

/// Set compile, extra-compile and match options
///
/// # Safety
///
/// - `ctx` must be a valid pointer returned by `pcre2ctx_new`
#[no_mangle]
pub unsafe extern "C" fn pcre2ctx_set_options(
    ctx: *mut Pcre2Ctx,
    regex_options: u32,
    regex_extra_options: u32,
    match_options: u32,
) -> c_int {
    let Some(ctx) = ctx.as_mut() else {
        return PCRE2CTX_ERROR_NULL_POINTER;
    };

    let options = &mut ctx.context.options;
    options.regex_options = regex_options;
    options.regex_extra_options = regex_extra_options;
    options.match_options = match_options;
    PCRE2CTX_OK
}

/// Compile a NUL-terminated pattern; returns 1 on success, 0 on failure
///
/// # Safety
///
/// - `ctx` must be a valid pointer returned by `pcre2ctx_new`
/// - `pattern` must be a valid null-terminated C string
#[no_mangle]
pub unsafe extern "C" fn pcre2ctx_compile(ctx: *mut Pcre2Ctx, pattern: *const c_char) -> u8 {
    let Some(ctx) = ctx.as_mut() else {
        return 0;
    };
    if pattern.is_null() {
        return 0;
    }

    let pattern = CStr::from_ptr(pattern);
    u8::from(ctx.context.compile(pattern.to_bytes()))
}

/// Run one match; returns the engine's raw return code
///
/// # Safety
///
/// - `ctx` must be a valid pointer returned by `pcre2ctx_new`
/// - `subject` must be valid for `subject_len` bytes
#[no_mangle]
pub unsafe extern "C" fn pcre2ctx_match(
    ctx: *mut Pcre2Ctx,
    subject: *const u8,
    subject_len: usize,
    start_offset: usize,
) -> i64 {
    let Some(ctx) = ctx.as_mut() else {
        return 0;
    };
    let Some(subject) = subject_slice(subject, subject_len) else {
        return 0;
    };

    ctx.context.match_at(subject, start_offset)
}

/// Materialize the last match's whole-match span and groups
///
/// # Safety
///
/// - `ctx` must be a valid pointer returned by `pcre2ctx_new`
#[no_mangle]
pub unsafe extern "C" fn pcre2ctx_fetch_match_results(ctx: *mut Pcre2Ctx) {
    if let Some(ctx) = ctx.as_mut() {
        ctx.context.fetch_match_results();
    }
}

/// Compute and return the next start offset
///
/// A value greater than `subject_len` means the subject is exhausted.
///
/// # Safety
///
/// - `ctx` must be a valid pointer returned by `pcre2ctx_new`
/// - `subject` must be the subject of the last match, valid for `subject_len` bytes
#[no_mangle]
pub unsafe extern "C" fn pcre2ctx_next_offset(
    ctx: *mut Pcre2Ctx,
    subject: *const u8,
    subject_len: usize,
) -> usize {
    let Some(ctx) = ctx.as_mut() else {
        return subject_len.saturating_add(1);
    };
    let Some(subject) = subject_slice(subject, subject_len) else {
        return subject_len.saturating_add(1);
    };

    ctx.context.get_next_offset(subject);
    ctx.context.next_offset()
}

/// Release per-match scratch, keeping the compiled pattern
///
/// # Safety
///
/// - `ctx` must be a valid pointer returned by `pcre2ctx_new`
#[no_mangle]
pub unsafe extern "C" fn pcre2ctx_free_for_next_match(ctx: *mut Pcre2Ctx) {
    if let Some(ctx) = ctx.as_mut() {
        ctx.context.free_for_next_match();
    }
}

/// Release the compiled pattern and all match state; options survive
///
/// # Safety
///
/// - `ctx` must be a valid pointer returned by `pcre2ctx_new`
#[no_mangle]
pub unsafe extern "C" fn pcre2ctx_free_context(ctx: *mut Pcre2Ctx) {
    if let Some(ctx) = ctx.as_mut() {
        ctx.context.free_context();
    }
}

// ============================================================================
// Error Functions
// ============================================================================

/// Last engine error number
///
/// # Safety
///
/// - `ctx` must be a valid pointer returned by `pcre2ctx_new`
#[no_mangle]
pub unsafe extern "C" fn pcre2ctx_error_number(ctx: *const Pcre2Ctx) -> c_int {
    match ctx.as_ref() {
        Some(ctx) => ctx.context.error_number(),
        None => PCRE2CTX_ERROR_NULL_POINTER,
    }
}

/// Offset in the pattern where compilation failed
///
/// # Safety
///
/// - `ctx` must be a valid pointer returned by `pcre2ctx_new`
#[no_mangle]
pub unsafe extern "C" fn pcre2ctx_error_offset(ctx: *const Pcre2Ctx) -> usize {
    ctx.as_ref().map_or(0, |ctx| ctx.context.error_offset())
}

/// Format the last compile error and return it
///
/// # Safety
///
/// - `ctx` must be a valid pointer returned by `pcre2ctx_new`
/// - The returned string is valid until the next call on this handle
#[no_mangle]
pub unsafe extern "C" fn pcre2ctx_last_error_message(ctx: *mut Pcre2Ctx) -> *const c_char {
    let Some(ctx) = ctx.as_mut() else {
        return ptr::null();
    };

    ctx.context.get_last_error_message();
    ctx.context.error_message().as_bytes_with_nul().as_ptr() as *const c_char
}

// ============================================================================
// Result Functions
// ============================================================================

/// Whole-match span; returns 1 if a match was fetched, 0 otherwise
///
/// # Safety
///
/// - `ctx` must be a valid pointer returned by `pcre2ctx_new`
/// - `start` and `len` must be valid pointers
#[no_mangle]
pub unsafe extern "C" fn pcre2ctx_matched_span(
    ctx: *const Pcre2Ctx,
    start: *mut usize,
    len: *mut usize,
) -> c_int {
    let Some(ctx) = ctx.as_ref() else {
        return 0;
    };
    if start.is_null() || len.is_null() || ctx.context.matched_count() == 0 {
        return 0;
    }

    let span = ctx.context.matched_result();
    *start = span.start;
    *len = span.len;
    1
}

/// Number of populated group results
///
/// # Safety
///
/// - `ctx` must be a valid pointer returned by `pcre2ctx_new`
#[no_mangle]
pub unsafe extern "C" fn pcre2ctx_matched_group_count(ctx: *const Pcre2Ctx) -> usize {
    ctx.as_ref()
        .map_or(0, |ctx| ctx.context.matched_group_count())
}

/// Span of the group at 1-based `capture_index`
///
/// # Safety
///
/// - `ctx` must be a valid pointer returned by `pcre2ctx_new`
/// - `start` and `len` must be valid pointers
#[no_mangle]
pub unsafe extern "C" fn pcre2ctx_group_span(
    ctx: *const Pcre2Ctx,
    capture_index: u32,
    start: *mut usize,
    len: *mut usize,
) -> c_int {
    let Some(ctx) = ctx.as_ref() else {
        return PCRE2CTX_ERROR_NULL_POINTER;
    };
    if start.is_null() || len.is_null() {
        return PCRE2CTX_ERROR_NULL_POINTER;
    }

    let Some(group) = ctx.context.group(capture_index) else {
        return PCRE2CTX_ERROR_NO_GROUP;
    };
    match group.capture.span() {
        Some(span) => {
            *start = span.start;
            *len = span.len;
            PCRE2CTX_OK
        }
        None => PCRE2CTX_ERROR_UNSET_GROUP,
    }
}

/// Name of the group at 1-based `capture_index`, or NULL if unnamed
///
/// # Safety
///
/// - `ctx` must be a valid pointer returned by `pcre2ctx_new`
/// - The returned string is valid until the context is freed or recompiled
#[no_mangle]
pub unsafe extern "C" fn pcre2ctx_group_name(
    ctx: *const Pcre2Ctx,
    capture_index: u32,
) -> *const c_char {
    let Some(ctx) = ctx.as_ref() else {
        return ptr::null();
    };

    match ctx.context.group_name_for(capture_index) {
        Some(name) => name.as_c_str().as_ptr(),
        None => ptr::null(),
    }
}

/// Current results as a JSON string (`null` without a match)
///
/// Returns NULL on a null handle. Free with `pcre2ctx_string_free`.
///
/// # Safety
///
/// - `ctx` must be a valid pointer returned by `pcre2ctx_new`
#[no_mangle]
pub unsafe extern "C" fn pcre2ctx_results_json(ctx: *const Pcre2Ctx) -> *mut c_char {
    let Some(ctx) = ctx.as_ref() else {
        return ptr::null_mut();
    };

    ctx.context
        .results_json()
        .ok()
        .and_then(|json| CString::new(json).ok())
        .map_or(ptr::null_mut(), CString::into_raw)
}

// ============================================================================
// String Functions
// ============================================================================

/// Free a string returned by `pcre2ctx_results_json`
///
/// # Safety
///
/// - `s` must be a pointer returned by `pcre2ctx_results_json`, or null
/// - The pointer must not be used after this call
#[no_mangle]
pub unsafe extern "C" fn pcre2ctx_string_free(s: *mut c_char) {
    if !s.is_null() {
        let _ = CString::from_raw(s);
    }
}

// ============================================================================
// Version Functions
// ============================================================================

/// Get the library version
///
/// Returns a static string like "0.1.0". Must not be freed.
#[no_mangle]
pub extern "C" fn pcre2ctx_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}

// ============================================================================
// Tests
// ============================================================================
