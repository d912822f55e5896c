use crate::kernel::palette::visible_entries;
use crate::kernel::state::Overlay;
use crate::kernel::store::{DispatchResult, Store};
use crate::kernel::Action;

impl Store {
    pub(in crate::kernel::store) fn reduce_palette_action(&mut self, action: Action) -> DispatchResult {
        match action {
            Action::PaletteSetQuery(text) => {
                let Overlay::Palette {
                    query, selected, ..
                } = &mut self.state.ui.overlay
                else {
                    return DispatchResult::unchanged();
                };
                if *query == text {
                    return DispatchResult::unchanged();
                }
                *query = text;
                *selected = 0;
                DispatchResult::changed(true)
            }
            Action::PaletteMoveSelection(delta) => {
                if !self.state.ui.overlay.is_palette() || delta == 0 {
                    return DispatchResult::unchanged();
                }
                let len = visible_entries(&self.state).len();
                let Overlay::Palette { selected, .. } = &mut self.state.ui.overlay else {
                    return DispatchResult::unchanged();
                };

                let prev = *selected;
                let next = if delta > 0 {
                    selected.saturating_add(delta as usize)
                } else {
                    selected.saturating_sub(delta.unsigned_abs())
                };
                *selected = next.min(len.saturating_sub(1));
                DispatchResult::changed(*selected != prev)
            }
            _ => unreachable!("non-palette action passed to reduce_palette_action"),
        }
    }

    /// Runs the highlighted entry if it is enabled. The palette closes
    /// before the command runs, so the command sees the overlay underneath.
    pub(in crate::kernel::store) fn confirm_palette(&mut self) -> DispatchResult {
        let Overlay::Palette {
            selected,
            resume_search,
            ..
        } = self.state.ui.overlay
        else {
            return DispatchResult::unchanged();
        };

        let Some(entry) = visible_entries(&self.state).into_iter().nth(selected) else {
            return DispatchResult::unchanged();
        };
        if !entry.enabled {
            return DispatchResult::unchanged();
        }

        tracing::debug!(command = entry.command.name(), "palette command");
        self.state.ui.overlay = if resume_search {
            Overlay::Search
        } else {
            Overlay::None
        };
        let mut result = self.dispatch_command(entry.command);
        result.state_changed = true;
        result
    }
}
