//! Result model: whole-match span plus ordered capture groups
//!
//! The engine reports a match as an ovector, pairs `[2i, 2i+1]` holding the
//! `[start, end)` offsets of slot `i`. Slot 0 is the whole match and slots
//! `1..rc` are capture groups in the order they open in the pattern. This
//! module turns that into [`MatchSpan`]s and [`GroupResult`]s.

use serde::Serialize;

use super::engine::PCRE2_UNSET;
use super::name_table::{GroupName, GroupNames};

// ============================================================================
// Spans
// ============================================================================

/// Half-open byte range `[start, start + len)` into the subject
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct MatchSpan {
    /// Start byte offset
    pub start: usize,
    /// Length in bytes (zero for a zero-width match)
    pub len: usize,
}

impl MatchSpan {
    /// Create a span from a start offset and a length
    #[inline]
    pub fn new(start: usize, len: usize) -> Self {
        Self { start, len }
    }

    /// Create a span from a pair of ovector offsets
    ///
    /// `\K` inside a lookaround can report an end before the start; such a
    /// span is clamped to zero length.
    #[inline]
    pub fn from_offsets(start: usize, end: usize) -> Self {
        Self {
            start,
            len: end.saturating_sub(start),
        }
    }

    /// End offset (exclusive)
    #[inline]
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    /// Whether this is a zero-width span
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The span as a range
    #[inline]
    pub fn range(&self) -> std::ops::Range<usize> {
        self.start..self.end()
    }

    /// Re-extract the spanned bytes from the subject
    pub fn slice<'s>(&self, subject: &'s [u8]) -> Option<&'s [u8]> {
        subject.get(self.range())
    }
}

/// A capture slot: either a span, or "did not participate"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Capture {
    /// The group matched this span (possibly empty)
    Set(MatchSpan),
    /// The group did not take part in the match
    Unset,
}

impl Capture {
    /// Decode one ovector pair
    #[inline]
    pub fn from_pair(start: usize, end: usize) -> Self {
        if start == PCRE2_UNSET || end == PCRE2_UNSET {
            Capture::Unset
        } else {
            Capture::Set(MatchSpan::from_offsets(start, end))
        }
    }

    /// The span, if the group participated
    #[inline]
    pub fn span(&self) -> Option<MatchSpan> {
        match self {
            Capture::Set(span) => Some(*span),
            Capture::Unset => None,
        }
    }

    /// Whether the group participated
    #[inline]
    pub fn is_set(&self) -> bool {
        matches!(self, Capture::Set(_))
    }
}

// ============================================================================
// Group Results
// ============================================================================

/// One populated capture slot as stored in a context
///
/// `name_slot` indexes the owning pattern's [`GroupNames`]; use
/// [`RegexContext::group_name`](super::RegexContext::group_name) or
/// [`GroupView`] to resolve it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupResult {
    /// 1-based capture index
    pub capture_index: u32,
    /// Slot in the group-name table, when the group is named
    pub name_slot: Option<usize>,
    /// Where the group matched
    pub capture: Capture,
}

/// A group result with its name resolved against the pattern's name table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupView<'c> {
    /// 1-based capture index
    pub capture_index: u32,
    /// The group's name entry, when the group is named
    pub name: Option<&'c GroupName>,
    /// Where the group matched
    pub capture: Capture,
}

impl<'c> GroupView<'c> {
    /// Resolve `result` against `names`
    pub fn resolve(result: &GroupResult, names: &'c GroupNames) -> Self {
        Self {
            capture_index: result.capture_index,
            name: result.name_slot.and_then(|slot| names.get(slot)),
            capture: result.capture,
        }
    }

    /// Bytes the group matched, if it participated
    pub fn text<'s>(&self, subject: &'s [u8]) -> Option<&'s [u8]> {
        self.capture.span().and_then(|span| span.slice(subject))
    }
}

/// Decode a successful match into `whole` and `groups`
///
/// `rc` is the engine's positive return code, so slots `1..rc` are the
/// populated groups. `groups` is cleared first and keeps its capacity.
/// Returns the number of group results written (`rc - 1`).
pub fn materialize(
    ovector: &[usize],
    rc: usize,
    names: &GroupNames,
    whole: &mut MatchSpan,
    groups: &mut Vec<GroupResult>,
) -> usize {
    groups.clear();

    let slots = rc.min(ovector.len() / 2);
    if slots == 0 {
        return 0;
    }

    *whole = MatchSpan::from_offsets(ovector[0], ovector[1]);

    groups.extend((1..slots).map(|i| GroupResult {
        capture_index: i as u32,
        name_slot: names.slot_for(i as u32),
        capture: Capture::from_pair(ovector[2 * i], ovector[2 * i + 1]),
    }));

    groups.len()
}

// ============================================================================
// Snapshots
// ============================================================================

/// An owned group result, detached from the context
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupSnapshot {
    /// 1-based capture index
    pub capture_index: u32,
    /// Group name, when the group is named
    pub name: Option<String>,
    /// Where the group matched
    pub capture: Capture,
}

impl From<GroupView<'_>> for GroupSnapshot {
    fn from(view: GroupView<'_>) -> Self {
        Self {
            capture_index: view.capture_index,
            name: view.name.map(|n| n.as_c_str().to_string_lossy().into_owned()),
            capture: view.capture,
        }
    }
}

/// An owned copy of one match's results
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchSnapshot {
    /// Offset the match was started from
    pub origin_offset: usize,
    /// Where the next match on the same subject should start
    pub next_offset: usize,
    /// The whole match
    pub whole: MatchSpan,
    /// Capture groups in capture-index order
    pub groups: Vec<GroupSnapshot>,
}

impl MatchSnapshot {
    /// Group with the given 1-based capture index
    pub fn group(&self, capture_index: u32) -> Option<&GroupSnapshot> {
        self.groups
            .get((capture_index as usize).checked_sub(1)?)
            .filter(|g| g.capture_index == capture_index)
    }

    /// First participating group called `name`
    pub fn named(&self, name: &str) -> Option<&GroupSnapshot> {
        self.groups
            .iter()
            .find(|g| g.name.as_deref() == Some(name) && g.capture.is_set())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;

    fn names(entries: &[(&str, u32)]) -> GroupNames {
        GroupNames::from_entries(
            entries
                .iter()
                .map(|(n, i)| GroupName::new(CString::new(*n).unwrap(), *i))
                .collect(),
        )
    }

    #[test]
    fn test_span_helpers() {
        let span = MatchSpan::from_offsets(3, 6);
        assert_eq!(span, MatchSpan::new(3, 3));
        assert_eq!(span.end(), 6);
        assert_eq!(span.slice(b"12-345"), Some(&b"345"[..]));
        assert!(MatchSpan::from_offsets(4, 4).is_empty());
        assert_eq!(MatchSpan::new(5, 3).slice(b"abc"), None);
    }

    #[test]
    fn test_backwards_offsets_clamp() {
        assert_eq!(MatchSpan::from_offsets(5, 2), MatchSpan::new(5, 0));
    }

    #[test]
    fn test_unset_is_distinct_from_empty() {
        assert_eq!(Capture::from_pair(PCRE2_UNSET, PCRE2_UNSET), Capture::Unset);
        assert_eq!(
            Capture::from_pair(0, 0),
            Capture::Set(MatchSpan::new(0, 0))
        );
    }

    #[test]
    fn test_materialize_orders_by_capture_index() {
        // (\d+)-(?<b>\d+) on "12-345"
        let ovector = [0, 6, 0, 2, 3, 6];
        let names = names(&[("b", 2)]);
        let mut whole = MatchSpan::default();
        let mut groups = Vec::new();

        let count = materialize(&ovector, 3, &names, &mut whole, &mut groups);

        assert_eq!(count, 2);
        assert_eq!(whole, MatchSpan::new(0, 6));
        assert_eq!(groups[0].capture_index, 1);
        assert_eq!(groups[0].name_slot, None);
        assert_eq!(groups[0].capture, Capture::Set(MatchSpan::new(0, 2)));
        assert_eq!(groups[1].capture_index, 2);
        assert_eq!(groups[1].name_slot, Some(0));
        assert_eq!(groups[1].capture, Capture::Set(MatchSpan::new(3, 3)));
    }

    #[test]
    fn test_materialize_keeps_capacity() {
        let mut groups = Vec::with_capacity(8);
        let mut whole = MatchSpan::default();
        materialize(&[0, 1], 1, &GroupNames::default(), &mut whole, &mut groups);

        assert!(groups.is_empty());
        assert!(groups.capacity() >= 8);
    }

    #[test]
    fn test_materialize_unset_middle_group() {
        // (a)|(b) on "b"
        let ovector = [0, 1, PCRE2_UNSET, PCRE2_UNSET, 0, 1];
        let mut whole = MatchSpan::default();
        let mut groups = Vec::new();

        materialize(&ovector, 3, &GroupNames::default(), &mut whole, &mut groups);

        assert_eq!(groups[0].capture, Capture::Unset);
        assert_eq!(groups[1].capture.span(), Some(MatchSpan::new(0, 1)));
    }

    #[test]
    fn test_view_and_snapshot() {
        let names = names(&[("year", 1)]);
        let result = GroupResult {
            capture_index: 1,
            name_slot: Some(0),
            capture: Capture::Set(MatchSpan::new(0, 4)),
        };

        let view = GroupView::resolve(&result, &names);
        assert_eq!(view.name.unwrap().as_str(), Some("year"));
        assert_eq!(view.text(b"2024-11"), Some(&b"2024"[..]));

        let snapshot = MatchSnapshot {
            origin_offset: 0,
            next_offset: 7,
            whole: MatchSpan::new(0, 7),
            groups: vec![GroupSnapshot::from(view)],
        };
        assert_eq!(snapshot.named("year").unwrap().capture_index, 1);
        assert!(snapshot.group(1).is_some());
        assert!(snapshot.group(0).is_none());
    }

    #[test]
    fn test_snapshot_json_shape() {
        let snapshot = MatchSnapshot {
            origin_offset: 0,
            next_offset: 1,
            whole: MatchSpan::new(0, 1),
            groups: vec![GroupSnapshot {
                capture_index: 1,
                name: None,
                capture: Capture::Unset,
            }],
        };
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["whole"]["start"], 0);
        assert_eq!(json["groups"][0]["capture"], "unset");
    }
}
