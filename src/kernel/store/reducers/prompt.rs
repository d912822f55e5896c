use crate::kernel::state::{Prompt, PromptKind};
use crate::kernel::store::{DispatchResult, Store};
use crate::kernel::Action;

impl Store {
    pub(in crate::kernel::store) fn reduce_prompt_action(&mut self, action: Action) -> DispatchResult {
        match action {
            Action::OpenPrompt(kind) => {
                if self.state.ui.prompt.as_ref().is_some_and(|p| p.kind == kind) {
                    return DispatchResult::unchanged();
                }
                self.state.ui.prompt = Some(Prompt::new(kind));
                DispatchResult::changed(true)
            }
            Action::PromptSetText(text) => match self.state.ui.prompt.as_mut() {
                Some(prompt) if prompt.text != text => {
                    prompt.text = text;
                    DispatchResult::changed(true)
                }
                _ => DispatchResult::unchanged(),
            },
            Action::PromptSubmit => {
                let Some(prompt) = self.state.ui.prompt.clone() else {
                    return DispatchResult::unchanged();
                };
                match prompt.kind {
                    PromptKind::NewFile => self.create_file(&prompt.text),
                    PromptKind::NewProject => self.create_project(&prompt.text),
                }
            }
            Action::PromptCancel => DispatchResult::changed(self.state.ui.prompt.take().is_some()),
            _ => unreachable!("non-prompt action passed to reduce_prompt_action"),
        }
    }

    /// Closes the prompt of `kind` once its submission went through.
    pub(in crate::kernel::store) fn close_prompt(&mut self, kind: PromptKind) -> bool {
        if self.state.ui.prompt.as_ref().is_some_and(|p| p.kind == kind) {
            self.state.ui.prompt = None;
            return true;
        }
        false
    }
}
