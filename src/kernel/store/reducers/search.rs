use crate::kernel::search::{self, Span};
use crate::kernel::state::StatusKind;
use crate::kernel::store::{DispatchResult, Store};
use crate::kernel::Action;

impl Store {
    pub(in crate::kernel::store) fn reduce_search_action(&mut self, action: Action) -> DispatchResult {
        match action {
            Action::SearchSetQuery(query) => {
                DispatchResult::changed(self.state.search.set_query(query))
            }
            Action::SearchSetReplacement(replacement) => {
                DispatchResult::changed(self.state.search.set_replacement(replacement))
            }
            _ => unreachable!("non-search action passed to reduce_search_action"),
        }
    }

    pub(in crate::kernel::store) fn find_next(&mut self) -> DispatchResult {
        let Some(path) = self.state.session.active_path.clone() else {
            return DispatchResult::unchanged();
        };
        let query = self.state.search.query.clone();
        if query.is_empty() {
            return DispatchResult::unchanged();
        }
        let Some(text) = self.state.session.buffers.text(&path) else {
            return DispatchResult::unchanged();
        };

        let from = self
            .state
            .search
            .search_from(Some(&path), self.state.ui.selection);
        match search::find_next(text, &query, from) {
            Some(span) => {
                self.state.search.record_match(&path, span.start);
                self.state.ui.selection = Some(span);
            }
            None => self.set_status(StatusKind::Error, "No matches found", Some(&path)),
        }
        DispatchResult::changed(true)
    }

    /// Replaces the selection when it is exactly the query. Otherwise finds
    /// the next match first; the match is replaced in the same step only
    /// when the editor already had a cursor, else it is left selected for
    /// the next press.
    pub(in crate::kernel::store) fn replace_next(&mut self) -> DispatchResult {
        let Some(path) = self.state.session.active_path.clone() else {
            return DispatchResult::unchanged();
        };
        if self.state.search.query.is_empty() {
            return DispatchResult::unchanged();
        }

        if let Some(span) = self.selection_matching_query(&path) {
            return self.replace_span(&path, span);
        }

        let had_cursor = self.state.ui.selection.is_some();
        let mut result = self.find_next();
        if had_cursor {
            if let Some(span) = self.selection_matching_query(&path) {
                result.merge(self.replace_span(&path, span));
            }
        }
        result
    }

    pub(in crate::kernel::store) fn replace_all(&mut self) -> DispatchResult {
        let Some(path) = self.state.session.active_path.clone() else {
            return DispatchResult::unchanged();
        };
        if self.state.search.query.is_empty() {
            return DispatchResult::unchanged();
        }
        let Some(text) = self.state.session.buffers.text(&path) else {
            return DispatchResult::unchanged();
        };

        let (next, count) = search::replace_all(
            text,
            &self.state.search.query,
            &self.state.search.replacement,
        );
        if count == 0 {
            self.set_status(StatusKind::Error, "No matches found", Some(&path));
            return DispatchResult::changed(true);
        }

        if let Err(err) = self.state.session.buffers.edit(&path, next) {
            self.report_error("replace_all", &err, Some(&path));
            return DispatchResult::changed(true);
        }
        self.state.ui.selection = None;
        self.state.search.clear_match();
        let noun = if count == 1 { "match" } else { "matches" };
        self.set_status(
            StatusKind::Success,
            format!("Replaced {count} {noun}"),
            Some(&path),
        );
        DispatchResult::changed(true)
    }

    fn selection_matching_query(&self, path: &str) -> Option<Span> {
        let span = self.state.ui.selection.filter(|s| !s.is_empty())?;
        let text = self.state.session.buffers.text(path)?;
        (span.slice(text)? == self.state.search.query).then_some(span)
    }

    fn replace_span(&mut self, path: &str, span: Span) -> DispatchResult {
        let Some(text) = self.state.session.buffers.text(path) else {
            return DispatchResult::unchanged();
        };
        let (next, cursor) = search::replace_one(text, span, &self.state.search.replacement);
        if let Err(err) = self.state.session.buffers.edit(path, next) {
            self.report_error("replace", &err, Some(path));
            return DispatchResult::changed(true);
        }
        self.state.ui.selection = Some(Span::new(cursor, cursor));
        DispatchResult::changed(true)
    }
}
