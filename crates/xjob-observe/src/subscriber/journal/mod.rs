use xjob_core::{RunEvent, Subscribe};

use crate::subscriber::view::log_event;

/// Writes every run event to the installed `tracing` subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct Journal;

impl Journal {
    pub fn new() -> Self {
        Self
    }
}

impl Subscribe for Journal {
    fn on_event(&self, event: &RunEvent) {
        log_event(event);
    }

    fn name(&self) -> &'static str {
        "journal"
    }
}
