use std::sync::Arc;

use crossterm::event::KeyCode;

use crate::monitoring::{HostRecord, HostTable};

/// Dashboard state: the latest snapshot plus scroll position.
pub struct AppState {
    table: Arc<HostTable>,
    pub hosts: Vec<HostRecord>,
    pub scroll: usize,
}

impl AppState {
    pub fn new(table: Arc<HostTable>) -> Self {
        let hosts = table.snapshot();
        Self { table, hosts, scroll: 0 }
    }

    /// Re-read every host record.
    pub fn refresh(&mut self) {
        self.hosts = self.table.snapshot();
        self.scroll = self.scroll.min(self.hosts.len().saturating_sub(1));
    }

    pub fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Up => self.scroll = self.scroll.saturating_sub(1),
            KeyCode::Down => {
                self.scroll = (self.scroll + 1).min(self.hosts.len().saturating_sub(1));
            }
            KeyCode::Home => self.scroll = 0,
            KeyCode::End => self.scroll = self.hosts.len().saturating_sub(1),
            _ => {}
        }
    }

    /// (total, online, offline) counts for the header.
    pub fn totals(&self) -> (usize, usize, usize) {
        let total = self.hosts.len();
        let up = self.hosts.iter().filter(|h| h.is_up).count();
        (total, up, total - up)
    }
}
