//! Workbench: owns the store and routes input into it.
//!
//! - resolves key presses through the keybinding service
//! - hands effects to the async runtime
//! - drains completions from the kernel bus

use crate::core::event::KeyEvent;
use crate::kernel::palette::{visible_entries, CommandEntry};
use crate::kernel::services::adapters::{
    default_workspace_root, AsyncRuntime, KeybindingContext, KeybindingService, LocalWorkspace,
};
use crate::kernel::services::ports::{Settings, WorkspaceBackend};
use crate::kernel::services::{kernel_bus, KernelBusReceiver, KernelMessage};
use crate::kernel::{Action, AppState, Store};
use std::io;
use std::sync::mpsc::RecvTimeoutError;
use std::sync::Arc;
use std::time::{Duration, Instant};

const MAX_KERNEL_BUS_DRAIN_PER_TICK: usize = 256;
const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(10);
const QUEUE_WAIT_LOG_THRESHOLD: Duration = Duration::from_millis(50);

pub struct Workbench {
    store: Store,
    keybindings: KeybindingService,
    runtime: AsyncRuntime,
    kernel_bus: KernelBusReceiver,
}

impl Workbench {
    pub fn new(
        backend: Arc<dyn WorkspaceBackend>,
        keybindings: KeybindingService,
    ) -> io::Result<Self> {
        let (tx, kernel_bus) = kernel_bus();
        let runtime = AsyncRuntime::new(backend, tx)?;
        Ok(Self {
            store: Store::new(AppState::new()),
            keybindings,
            runtime,
            kernel_bus,
        })
    }

    /// Local-disk workbench configured from `settings`.
    pub fn from_settings(settings: &Settings) -> io::Result<Self> {
        let root = settings
            .workspace_root
            .clone()
            .or_else(default_workspace_root)
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    "Cannot determine workspace directory",
                )
            })?;
        std::fs::create_dir_all(&root)?;
        tracing::info!(root = %root.display(), "workspace root");

        let timeout = Duration::from_millis(settings.execution_timeout_ms);
        let backend = Arc::new(LocalWorkspace::new(root, timeout));

        let mut keybindings = KeybindingService::with_defaults();
        let applied = keybindings.apply_rules(&settings.keybindings);
        if applied > 0 {
            tracing::info!(applied, "keybinding overrides");
        }

        Self::new(backend, keybindings)
    }

    pub fn state(&self) -> &AppState {
        self.store.state()
    }

    pub fn keybindings(&self) -> &KeybindingService {
        &self.keybindings
    }

    pub fn palette_entries(&self) -> Vec<CommandEntry> {
        visible_entries(self.store.state())
    }

    /// The single key listener. Returns whether the press was handled.
    pub fn handle_key(&mut self, event: KeyEvent) -> bool {
        let context = if self.store.state().ui.overlay.is_palette() {
            KeybindingContext::CommandPalette
        } else {
            KeybindingContext::Global
        };
        let Some(command) = self.keybindings.resolve_event(context, &event) else {
            return false;
        };
        tracing::debug!(command = command.name(), "key command");
        self.dispatch(Action::RunCommand(command));
        true
    }

    /// Reduces `action` and starts its effects. Returns whether state changed.
    pub fn dispatch(&mut self, action: Action) -> bool {
        let result = self.store.dispatch(action);
        for effect in result.effects {
            self.runtime.spawn_effect(effect);
        }
        result.state_changed
    }

    /// Applies completions that have already arrived. Returns how many.
    pub fn pump(&mut self) -> usize {
        let mut drained = 0usize;
        while drained < MAX_KERNEL_BUS_DRAIN_PER_TICK {
            let Ok(msg) = self.kernel_bus.try_recv() else {
                break;
            };
            drained += 1;
            self.handle_message(msg);
        }
        drained
    }

    /// Pumps until no effect is in flight. Returns `false` if `timeout`
    /// elapsed first.
    pub fn run_until_idle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            // Completions are sent before the in-flight count drops.
            let idle = self.runtime.in_flight() == 0;
            let drained = self.pump();
            if idle && drained == 0 {
                return true;
            }
            if drained > 0 {
                continue;
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                tracing::warn!(in_flight = self.runtime.in_flight(), "effects still pending");
                return false;
            }
            match self
                .kernel_bus
                .recv_timeout(remaining.min(IDLE_POLL_INTERVAL))
            {
                Ok(msg) => self.handle_message(msg),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => return self.runtime.in_flight() == 0,
            }
        }
    }

    fn handle_message(&mut self, msg: KernelMessage) {
        match msg {
            KernelMessage::Completion {
                effect,
                action,
                sent_at,
            } => {
                let queue_wait = sent_at.elapsed();
                if queue_wait > QUEUE_WAIT_LOG_THRESHOLD {
                    tracing::debug!(
                        effect,
                        queue_wait_ms = queue_wait.as_millis() as u64,
                        "kernel bus queue wait"
                    );
                }
                self.dispatch(action);
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/app/workbench.rs"]
mod tests;
