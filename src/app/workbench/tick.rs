use super::{Workbench, MAX_MESSAGE_DRAIN_PER_TICK};
use crate::kernel::services::adapters::AppMessage;
use std::sync::mpsc::TryRecvError;
use std::time::Instant;

impl Workbench {
    /// Called by the host loop. Returns true when visible state changed.
    pub fn tick(&mut self) -> bool {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> bool {
        let mut changed = false;
        changed |= self.poll_messages(now);
        changed |= self.poll_suggestion_debounce(now);
        changed |= self.poll_autosave(now);
        changed
    }

    /// Earliest pending debounce or autosave, for hosts that sleep between ticks.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.editors
            .values()
            .flat_map(|open| open.values())
            .filter_map(|editor| editor.next_deadline())
            .min()
    }

    fn poll_messages(&mut self, now: Instant) -> bool {
        let mut changed = false;
        for _ in 0..MAX_MESSAGE_DRAIN_PER_TICK {
            let msg = match self.rx.try_recv() {
                Ok(msg) => msg,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    tracing::error!("assist runtime channel closed");
                    break;
                }
            };
            changed |= self.apply_message(msg, now);
        }
        changed
    }

    fn apply_message(&mut self, msg: AppMessage, now: Instant) -> bool {
        match msg {
            AppMessage::SuggestionReady {
                node,
                ticket,
                suggestion,
            } => {
                let applied = self
                    .editor_mut(node)
                    .is_some_and(|editor| editor.apply_suggestion(ticket, suggestion));
                if !applied {
                    tracing::trace!(node = %node, ticket = ticket.raw(), "stale suggestion dropped");
                }
                applied
            }
            AppMessage::QuickEditReady {
                node,
                ticket,
                edited,
            } => self
                .editor_mut(node)
                .is_some_and(|editor| editor.apply_quick_edit(ticket, edited, now)),
        }
    }

    fn poll_suggestion_debounce(&mut self, now: Instant) -> bool {
        let effects: Vec<_> = self
            .editors
            .values_mut()
            .flat_map(|open| open.values_mut())
            .filter_map(|editor| editor.tick(now))
            .collect();
        let fired = !effects.is_empty();
        for effect in effects {
            self.run_effect(effect);
        }
        fired
    }

    fn poll_autosave(&mut self, now: Instant) -> bool {
        let effects: Vec<_> = self
            .editors
            .values_mut()
            .flat_map(|open| open.values_mut())
            .filter_map(|editor| editor.poll_autosave(now))
            .collect();
        let saved = !effects.is_empty();
        for effect in effects {
            self.run_effect(effect);
        }
        saved
    }
}
