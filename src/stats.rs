// SPDX-License-Identifier: PMPL-1.0-or-later

//! Translation progress counters

use crate::types::{Catalog, Context, Status};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageStats {
    pub finished: usize,
    pub unfinished: usize,
    pub obsolete: usize,
    /// Non-obsolete numerus messages
    pub plural: usize,
    pub contexts: usize,
}

impl MessageStats {
    /// Messages a translator still sees: finished and unfinished.
    pub fn active(&self) -> usize {
        self.finished + self.unfinished
    }

    /// Share of active messages that are finished, in percent. A catalog
    /// with nothing left to translate is complete.
    pub fn completeness(&self) -> f64 {
        match self.active() {
            0 => 100.0,
            active => self.finished as f64 / active as f64 * 100.0,
        }
    }

    fn count(&mut self, context: &Context) {
        self.contexts += 1;
        for message in &context.messages {
            match message.status {
                Status::Finished => self.finished += 1,
                Status::Unfinished => self.unfinished += 1,
                Status::Obsolete => self.obsolete += 1,
            }
            if message.numerus && !message.is_obsolete() {
                self.plural += 1;
            }
        }
    }
}

impl std::ops::AddAssign for MessageStats {
    fn add_assign(&mut self, other: Self) {
        self.finished += other.finished;
        self.unfinished += other.unfinished;
        self.obsolete += other.obsolete;
        self.plural += other.plural;
        self.contexts += other.contexts;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextStats {
    pub name: String,
    pub stats: MessageStats,
}

pub fn message_stats(catalog: &Catalog) -> MessageStats {
    let mut stats = MessageStats::default();
    for context in &catalog.contexts {
        stats.count(context);
    }
    stats
}

/// Counters for each context, in file order.
pub fn context_stats(catalog: &Catalog) -> Vec<ContextStats> {
    catalog
        .contexts
        .iter()
        .map(|context| {
            let mut stats = MessageStats::default();
            stats.count(context);
            ContextStats {
                name: context.name.clone(),
                stats,
            }
        })
        .collect()
}
