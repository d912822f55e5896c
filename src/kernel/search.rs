//! In-document find/replace over plain text.
//!
//! Offsets are byte offsets into the document. A match of a non-empty UTF-8
//! query always starts and ends on a char boundary, so spans returned here
//! can be sliced directly.

use memchr::memmem;

/// Half-open byte range `[start, end)` in the active document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn slice<'a>(&self, doc: &'a str) -> Option<&'a str> {
        doc.get(self.start..self.end)
    }
}

/// Forward search from `from`, wrapping to the start of the document once.
pub fn find_next(doc: &str, query: &str, from: usize) -> Option<Span> {
    if query.is_empty() {
        return None;
    }

    let from = from.min(doc.len());
    let haystack = doc.as_bytes();
    let needle = query.as_bytes();

    let start = match memmem::find(&haystack[from..], needle) {
        Some(rel) => from + rel,
        None if from > 0 => memmem::find(haystack, needle)?,
        None => return None,
    };

    Some(Span::new(start, start + query.len()))
}

/// Splices `replacement` over `span`; the returned cursor sits right after
/// the inserted text.
pub fn replace_one(doc: &str, span: Span, replacement: &str) -> (String, usize) {
    let start = span.start.min(doc.len());
    let end = span.end.clamp(start, doc.len());
    let (Some(head), Some(tail)) = (doc.get(..start), doc.get(end..)) else {
        return (doc.to_string(), start);
    };

    let mut out = String::with_capacity(head.len() + replacement.len() + tail.len());
    out.push_str(head);
    out.push_str(replacement);
    out.push_str(tail);

    (out, start + replacement.len())
}

/// Replaces every non-overlapping occurrence, left to right. An empty query
/// replaces nothing.
pub fn replace_all(doc: &str, query: &str, replacement: &str) -> (String, usize) {
    if query.is_empty() {
        return (doc.to_string(), 0);
    }

    let finder = memmem::Finder::new(query.as_bytes());
    let mut out = String::with_capacity(doc.len());
    let mut count = 0usize;
    let mut last = 0usize;

    for start in finder.find_iter(doc.as_bytes()) {
        out.push_str(&doc[last..start]);
        out.push_str(replacement);
        last = start + query.len();
        count += 1;
    }
    out.push_str(&doc[last..]);

    (out, count)
}

/// Where the previous successful find landed, tagged with the document and
/// query it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
struct MatchMark {
    path: String,
    query: String,
    index: usize,
}

#[derive(Debug, Clone, Default)]
pub struct SearchState {
    pub query: String,
    pub replacement: String,
    last_match: Option<MatchMark>,
}

impl SearchState {
    pub fn set_query(&mut self, query: impl Into<String>) -> bool {
        let query = query.into();
        if query == self.query {
            return false;
        }
        self.query = query;
        self.last_match = None;
        true
    }

    pub fn set_replacement(&mut self, replacement: impl Into<String>) -> bool {
        let replacement = replacement.into();
        if replacement == self.replacement {
            return false;
        }
        self.replacement = replacement;
        true
    }

    /// Index of the last match in `active`, or `None` once either the
    /// query or the active document changed since it was recorded.
    pub fn last_match_index(&self, active: Option<&str>) -> Option<usize> {
        let mark = self.last_match.as_ref()?;
        let active = active?;
        (mark.path == active && mark.query == self.query).then_some(mark.index)
    }

    pub fn record_match(&mut self, path: &str, index: usize) {
        self.last_match = Some(MatchMark {
            path: path.to_string(),
            query: self.query.clone(),
            index,
        });
    }

    pub fn clear_match(&mut self) {
        self.last_match = None;
    }

    /// Where the next forward search starts: the end of a live selection,
    /// else one past the last match, else the document start.
    pub fn search_from(&self, active: Option<&str>, selection: Option<Span>) -> usize {
        if let Some(selection) = selection {
            return selection.end;
        }
        self.last_match_index(active).map_or(0, |index| index + 1)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/search.rs"]
mod tests;
