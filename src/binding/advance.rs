//! Start offset for the next match on the same subject
//!
//! A pattern that can match the empty string would match forever at the same
//! offset if the caller simply restarted at the end of the last match. After
//! an empty match the cursor moves one character past the engine's
//! `startchar`, and in UTF-8 mode that means one whole code point.

/// Check if a byte continues a multi-byte UTF-8 sequence
#[inline(always)]
pub fn is_utf8_continuation(byte: u8) -> bool {
    (byte & 0xC0) == 0x80
}

/// Compute the next start offset after a match
///
/// * `start`, `end` - whole-match offsets (`ovector[0]`, `ovector[1]`)
/// * `startchar` - first code unit the matcher actually inspected
/// * `subject` - the subject the match ran against
/// * `utf8` - whether the compiled pattern is in UTF mode
///
/// A result greater than `subject.len()` means the subject is exhausted.
pub fn next_offset(start: usize, end: usize, startchar: usize, subject: &[u8], utf8: bool) -> usize {
    if start != end {
        return end;
    }

    let subject_len = subject.len();
    let mut offset = end;

    if offset <= startchar {
        if startchar >= subject_len {
            // nothing left to step over
            return subject_len + 1;
        }

        offset = startchar + 1;
        if utf8 {
            while offset < subject_len && is_utf8_continuation(subject[offset]) {
                offset += 1;
            }
        }
    }

    offset
}
