//! Safe owners for PCRE2 engine objects
//!
//! Every call into `pcre2-sys` lives in this file. The rest of the crate
//! sees three things: [`CompiledCode`] (owns a `pcre2_code`), [`MatchData`]
//! (owns the per-match scratch) and [`error_message`]. Both owners free their
//! engine object in `Drop`, so every allocation has exactly one free path.

use std::os::raw::{c_int, c_void};
use std::ptr::{self, NonNull};

use pcre2_sys::{
    pcre2_code_8, pcre2_code_free_8, pcre2_compile_8, pcre2_compile_context_create_8,
    pcre2_compile_context_free_8, pcre2_get_error_message_8, pcre2_get_ovector_count_8,
    pcre2_get_ovector_pointer_8, pcre2_get_startchar_8, pcre2_match_8,
    pcre2_match_data_8, pcre2_match_data_create_from_pattern_8, pcre2_match_data_free_8,
    pcre2_pattern_info_8, pcre2_set_compile_extra_options_8, PCRE2_INFO_ALLOPTIONS,
    PCRE2_INFO_CAPTURECOUNT, PCRE2_INFO_NAMECOUNT, PCRE2_INFO_NAMEENTRYSIZE,
    PCRE2_INFO_NAMETABLE,
};

// ============================================================================
// Engine Constants
// ============================================================================

/// Error number meaning "no error" (the engine's message table maps 100 to it)
pub const PCRE2_FINE: i32 = 100;

/// The subject did not match
pub const PCRE2_ERROR_NOMATCH: i32 = -1;
/// A partial match was found
pub const PCRE2_ERROR_PARTIAL: i32 = -2;
/// The start offset is past the end of the subject
pub const PCRE2_ERROR_BADOFFSET: i32 = -33;
/// The engine failed to get memory
pub const PCRE2_ERROR_NOMEMORY: i32 = -48;

/// Ovector value of a capture slot that did not participate in the match
pub const PCRE2_UNSET: usize = usize::MAX;

/// Size of the scratch buffer handed to `pcre2_get_error_message`
const ENGINE_MESSAGE_BUFFER: usize = 256;

// ============================================================================
// Compiled Pattern
// ============================================================================

/// Why the engine refused a pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileFailure {
    /// Engine error number (positive for compile errors)
    pub code: i32,
    /// Offset in the pattern where the error was detected
    pub offset: usize,
}

/// An owned, immutable compiled pattern
#[derive(Debug)]
pub struct CompiledCode {
    code: NonNull<pcre2_code_8>,
}

// The compiled pattern is immutable after compile and owned by exactly one
// context, so moving it to another thread is sound.
unsafe impl Send for CompiledCode {}

impl CompiledCode {
    /// Compile `pattern` (explicit length, no terminator needed)
    ///
    /// `extra_options` go through a compile context; none is created when
    /// they are zero.
    pub fn compile(
        pattern: &[u8],
        options: u32,
        extra_options: u32,
    ) -> Result<Self, CompileFailure> {
        let mut error_code: c_int = 0;
        let mut error_offset: usize = 0;

        let ccontext = if extra_options != 0 {
            // SAFETY: a null general context selects the default allocator.
            let ccontext = unsafe { pcre2_compile_context_create_8(ptr::null_mut()) };
            if ccontext.is_null() {
                return Err(CompileFailure {
                    code: PCRE2_ERROR_NOMEMORY,
                    offset: 0,
                });
            }
            // SAFETY: `ccontext` was just created and is non-null.
            unsafe { pcre2_set_compile_extra_options_8(ccontext, extra_options) };
            ccontext
        } else {
            ptr::null_mut()
        };

        // SAFETY: `pattern` is valid for `pattern.len()` bytes and the error
        // out-pointers reference live locals.
        let code = unsafe {
            pcre2_compile_8(
                pattern.as_ptr(),
                pattern.len(),
                options,
                &mut error_code,
                &mut error_offset,
                ccontext,
            )
        };

        if !ccontext.is_null() {
            // SAFETY: the engine copies what it needs out of the context.
            unsafe { pcre2_compile_context_free_8(ccontext) };
        }

        match NonNull::new(code) {
            Some(code) => Ok(Self { code }),
            None => Err(CompileFailure {
                code: error_code,
                offset: error_offset,
            }),
        }
    }

    /// Stable identity of the compiled pattern (its engine address)
    #[inline]
    pub fn id(&self) -> usize {
        self.code.as_ptr() as usize
    }

    /// Query a `u32`-valued item of pattern info
    fn info_u32(&self, what: u32) -> u32 {
        let mut value: u32 = 0;
        // SAFETY: every item queried through here writes a uint32_t.
        let rc = unsafe {
            pcre2_pattern_info_8(
                self.code.as_ptr(),
                what,
                &mut value as *mut u32 as *mut c_void,
            )
        };
        if rc == 0 {
            value
        } else {
            0
        }
    }

    /// Highest capture group number in the pattern (named or not)
    pub fn capture_count(&self) -> u32 {
        self.info_u32(PCRE2_INFO_CAPTURECOUNT)
    }

    /// Number of entries in the name table
    pub fn name_count(&self) -> u32 {
        self.info_u32(PCRE2_INFO_NAMECOUNT)
    }

    /// Size in bytes of one name table entry
    pub fn name_entry_size(&self) -> u32 {
        self.info_u32(PCRE2_INFO_NAMEENTRYSIZE)
    }

    /// Final option bits, including those switched on inside the pattern
    pub fn all_options(&self) -> u32 {
        self.info_u32(PCRE2_INFO_ALLOPTIONS)
    }

    /// Raw name table: `name_count` records of `name_entry_size` bytes
    pub fn name_table(&self) -> &[u8] {
        let count = self.name_count() as usize;
        let entry_size = self.name_entry_size() as usize;
        if count == 0 || entry_size == 0 {
            return &[];
        }

        let mut table: *const u8 = ptr::null();
        // SAFETY: PCRE2_INFO_NAMETABLE writes a PCRE2_SPTR.
        let rc = unsafe {
            pcre2_pattern_info_8(
                self.code.as_ptr(),
                PCRE2_INFO_NAMETABLE,
                &mut table as *mut *const u8 as *mut c_void,
            )
        };
        if rc != 0 || table.is_null() {
            return &[];
        }

        // SAFETY: the table lives inside the compiled pattern, which outlives
        // the returned borrow, and holds exactly count * entry_size bytes.
        unsafe { std::slice::from_raw_parts(table, count * entry_size) }
    }
}

impl Drop for CompiledCode {
    fn drop(&mut self) {
        // SAFETY: we own the pointer and free it once.
        unsafe { pcre2_code_free_8(self.code.as_ptr()) };
    }
}

// ============================================================================
// Match Scratch
// ============================================================================

/// Per-match workspace sized from a compiled pattern
#[derive(Debug)]
pub struct MatchData {
    data: NonNull<pcre2_match_data_8>,
}

// Owned by one context and never shared.
unsafe impl Send for MatchData {}

impl MatchData {
    /// Allocate scratch with one ovector pair per capture slot of `code`
    ///
    /// Returns `None` when the engine cannot get memory.
    pub fn for_code(code: &CompiledCode) -> Option<Self> {
        // SAFETY: `code` is a live compiled pattern.
        let data =
            unsafe { pcre2_match_data_create_from_pattern_8(code.code.as_ptr(), ptr::null_mut()) };
        NonNull::new(data).map(|data| Self { data })
    }

    /// Run one match of `code` against `subject` from `start_offset`
    ///
    /// Returns the engine's raw return code.
    pub fn run(
        &mut self,
        code: &CompiledCode,
        subject: &[u8],
        start_offset: usize,
        options: u32,
    ) -> i32 {
        // SAFETY: `subject` is valid for its length, both engine objects are
        // live, and the ovector was sized from this very pattern or a
        // compatible one (the engine clamps to the ovector it is given).
        unsafe {
            pcre2_match_8(
                code.code.as_ptr(),
                subject.as_ptr(),
                subject.len(),
                start_offset,
                options,
                self.data.as_ptr(),
                ptr::null_mut(),
            )
        }
    }

    /// The ovector: pairs of `[start, end)` offsets, slot 0 first
    pub fn ovector(&self) -> &[usize] {
        // SAFETY: the pointer and pair count describe memory owned by the
        // match data, which outlives the borrow.
        unsafe {
            let pairs = pcre2_get_ovector_count_8(self.data.as_ptr()) as usize;
            let ovector = pcre2_get_ovector_pointer_8(self.data.as_ptr());
            if ovector.is_null() {
                return &[];
            }
            std::slice::from_raw_parts(ovector, pairs * 2)
        }
    }

    /// Offset of the first code unit the matcher inspected for the last match
    pub fn startchar(&self) -> usize {
        // SAFETY: the match data is live.
        unsafe { pcre2_get_startchar_8(self.data.as_ptr()) }
    }
}

impl Drop for MatchData {
    fn drop(&mut self) {
        // SAFETY: we own the pointer and free it once.
        unsafe { pcre2_match_data_free_8(self.data.as_ptr()) };
    }
}

// ============================================================================
// Error Messages
// ============================================================================

/// Text the engine associates with an error number
pub fn error_message(code: i32) -> String {
    let mut buffer = [0u8; ENGINE_MESSAGE_BUFFER];
    // SAFETY: the buffer is writable for its full length.
    let rc = unsafe { pcre2_get_error_message_8(code, buffer.as_mut_ptr(), buffer.len()) };

    if rc < 0 && rc != PCRE2_ERROR_NOMEMORY {
        return format!("unknown error code {}", code);
    }

    // On PCRE2_ERROR_NOMEMORY the buffer holds a truncated, terminated message.
    let len = memchr::memchr(0, &buffer).unwrap_or(buffer.len());
    String::from_utf8_lossy(&buffer[..len]).into_owned()
}
