//! # Delayed Tasks
//!
//! Virtual-clock queue for the simulated "processing" delays (assistant
//! replies, draft generation). The caller advances the clock; the core never
//! reads wall time.
//!
//! Tasks due at the same instant fire in the order they were scheduled.

use crate::navigation::Page;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default delay before an assistant reply appears.
pub const DEFAULT_CHAT_REPLY_DELAY_MS: u64 = 800;

/// Default delay before a generated draft is marked ready.
pub const DEFAULT_DRAFT_GENERATION_DELAY_MS: u64 = 2000;

/// Work deferred until its delay elapses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "task", rename_all = "snake_case")]
pub enum DelayedTask {
    /// Answer a chat prompt.
    ChatReply { prompt: String },
    /// Finish draft generation on the generate page.
    DraftGenerated,
    /// Append insight `index` to an uploaded tender file.
    TenderInsight { file: u64, index: usize },
    /// Switch the tender page to its generating view.
    TenderGenerating { file: u64 },
    /// Move tender generation from thinking to writing the document.
    TenderDrafting { file: u64 },
    /// Produce the tender document.
    TenderComplete { file: u64 },
}

impl DelayedTask {
    /// Page whose state the task updates.
    #[must_use]
    pub fn owner(&self) -> Page {
        match self {
            DelayedTask::ChatReply { .. } => Page::Requests,
            DelayedTask::DraftGenerated => Page::Generate,
            DelayedTask::TenderInsight { .. }
            | DelayedTask::TenderGenerating { .. }
            | DelayedTask::TenderDrafting { .. }
            | DelayedTask::TenderComplete { .. } => Page::TenderAi,
        }
    }

    /// Tender file the task works on, if any.
    #[must_use]
    pub fn tender_file(&self) -> Option<u64> {
        match self {
            DelayedTask::TenderInsight { file, .. }
            | DelayedTask::TenderGenerating { file }
            | DelayedTask::TenderDrafting { file }
            | DelayedTask::TenderComplete { file } => Some(*file),
            DelayedTask::ChatReply { .. } | DelayedTask::DraftGenerated => None,
        }
    }
}

/// Handle returned by [`Scheduler::schedule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TaskId(pub u64);

/// A task that has come due.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiredTask {
    pub id: TaskId,
    /// Virtual time (ms) at which the task was due.
    pub due_at: u64,
    pub task: DelayedTask,
}

#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    now: u64,
    next_id: u64,
    // Keyed by (due time, schedule order) so iteration is firing order.
    pending: BTreeMap<(u64, TaskId), DelayedTask>,
}

impl Scheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time in milliseconds.
    #[must_use]
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Queue `task` to fire `delay_ms` after the current virtual time.
    pub fn schedule(&mut self, delay_ms: u64, task: DelayedTask) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        let due = self.now.saturating_add(delay_ms);
        self.pending.insert((due, id), task);
        id
    }

    /// Remove the earliest task due at or before `until` and move the clock
    /// to its due time.
    ///
    /// Tasks scheduled while handling a fired task are measured from that
    /// task's due time, so a chain of delays lands where it would in real
    /// time even when the clock jumps far ahead.
    pub fn pop_due(&mut self, until: u64) -> Option<FiredTask> {
        let (&(due_at, _), _) = self.pending.first_key_value()?;
        if due_at > until {
            return None;
        }
        let ((due_at, id), task) = self.pending.pop_first()?;
        self.now = self.now.max(due_at);
        Some(FiredTask { id, due_at, task })
    }

    /// Move the clock to `until` without firing anything. Never goes back.
    pub fn advance_to(&mut self, until: u64) {
        self.now = self.now.max(until);
    }

    /// Milliseconds until the next task is due, if any is pending.
    #[must_use]
    pub fn next_due_in(&self) -> Option<u64> {
        self.pending
            .keys()
            .next()
            .map(|(due, _)| due.saturating_sub(self.now))
    }

    /// Drop every pending task owned by `page`. Returns how many were dropped.
    pub fn cancel_for(&mut self, page: Page) -> usize {
        self.cancel_where(|task| task.owner() == page)
    }

    /// Drop every pending task matching `predicate`. Returns how many were dropped.
    pub fn cancel_where(&mut self, predicate: impl Fn(&DelayedTask) -> bool) -> usize {
        let before = self.pending.len();
        self.pending.retain(|_, task| !predicate(task));
        before.saturating_sub(self.pending.len())
    }

    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(prompt: &str) -> DelayedTask {
        DelayedTask::ChatReply {
            prompt: prompt.to_string(),
        }
    }

    /// Fire everything due within `elapsed_ms`, then settle the clock.
    fn run(scheduler: &mut Scheduler, elapsed_ms: u64) -> Vec<FiredTask> {
        let until = scheduler.now().saturating_add(elapsed_ms);
        let fired: Vec<_> = std::iter::from_fn(|| scheduler.pop_due(until)).collect();
        scheduler.advance_to(until);
        fired
    }

    #[test]
    fn nothing_fires_before_due() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(800, reply("a"));

        assert!(run(&mut scheduler, 799).is_empty());
        assert_eq!(scheduler.next_due_in(), Some(1));

        let fired = run(&mut scheduler, 1);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].due_at, 800);
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn equal_due_times_fire_in_schedule_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(100, reply("first"));
        scheduler.schedule(100, reply("second"));
        scheduler.schedule(50, reply("earliest"));

        let prompts: Vec<_> = run(&mut scheduler, 100)
            .into_iter()
            .filter_map(|f| match f.task {
                DelayedTask::ChatReply { prompt } => Some(prompt),
                _ => None,
            })
            .collect();
        assert_eq!(prompts, vec!["earliest", "first", "second"]);
    }

    #[test]
    fn cancel_for_page_drops_owned_tasks() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(800, reply("a"));
        scheduler.schedule(2000, DelayedTask::DraftGenerated);
        scheduler.schedule(5000, DelayedTask::TenderInsight { file: 1, index: 0 });

        assert_eq!(scheduler.cancel_for(Page::Requests), 1);
        assert_eq!(scheduler.cancel_for(Page::TenderAi), 1);
        let fired = run(&mut scheduler, 5000);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].task, DelayedTask::DraftGenerated);
    }

    #[test]
    fn cancel_where_matches_tender_file() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(10, DelayedTask::TenderInsight { file: 1, index: 0 });
        scheduler.schedule(10, DelayedTask::TenderInsight { file: 2, index: 0 });
        scheduler.schedule(20, DelayedTask::DraftGenerated);

        assert_eq!(scheduler.cancel_where(|t| t.tender_file() == Some(1)), 1);
        assert_eq!(scheduler.pending_count(), 2);
    }

    #[test]
    fn pop_due_moves_clock_to_task() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(1000, DelayedTask::DraftGenerated);

        let fired = scheduler.pop_due(10_000).expect("due");
        assert_eq!(fired.due_at, 1000);
        assert_eq!(scheduler.now(), 1000);

        // A follow-up scheduled now is measured from the fired task.
        scheduler.schedule(500, DelayedTask::DraftGenerated);
        assert_eq!(scheduler.pop_due(10_000).map(|f| f.due_at), Some(1500));
        assert!(scheduler.pop_due(10_000).is_none());

        scheduler.advance_to(10_000);
        assert_eq!(scheduler.now(), 10_000);
    }

    #[test]
    fn delays_are_relative_to_current_time() {
        let mut scheduler = Scheduler::new();
        run(&mut scheduler, 1000);
        scheduler.schedule(500, DelayedTask::DraftGenerated);
        assert_eq!(scheduler.next_due_in(), Some(500));
        assert_eq!(run(&mut scheduler, 500).len(), 1);
        assert_eq!(scheduler.now(), 1500);
    }
}
