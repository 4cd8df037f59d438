//! Periodic task bookkeeping for the frame loop
//!
//! The scheduler never sleeps or spawns anything; the player asks it once
//! per frame which tasks are due and runs them inline.

use crate::config::TimingSettings;
use std::fmt;
use std::time::{Duration, Instant};

/// Work the player performs on a fixed interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    /// `update()` on every node in scene order
    NodeUpdate,
    /// Demonstration temperature control step
    DemoControl,
    /// Snapshot flush
    Autosave,
}

impl TaskKind {
    pub fn name(&self) -> &'static str {
        match self {
            TaskKind::NodeUpdate => "node-update",
            TaskKind::DemoControl => "demo-control",
            TaskKind::Autosave => "autosave",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone)]
struct PeriodicTask {
    kind: TaskKind,
    interval: Duration,
    last_run: Instant,
}

/// Interval clocks for the player's periodic tasks
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    tasks: Vec<PeriodicTask>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scheduler for the standard task set. The control step is only
    /// registered when `demo` is set.
    pub fn from_timing(timing: &TimingSettings, demo: bool, start: Instant) -> Self {
        let mut scheduler = Self::new();
        scheduler.add(TaskKind::NodeUpdate, timing.update_interval(), start);
        if demo {
            scheduler.add(TaskKind::DemoControl, timing.control_interval(), start);
        }
        scheduler.add(TaskKind::Autosave, timing.autosave_interval(), start);
        scheduler
    }

    /// Register (or re-register) a task whose clock starts at `start`
    pub fn add(&mut self, kind: TaskKind, interval: Duration, start: Instant) {
        self.tasks.retain(|t| t.kind != kind);
        self.tasks.push(PeriodicTask {
            kind,
            interval,
            last_run: start,
        });
    }

    pub fn contains(&self, kind: TaskKind) -> bool {
        self.tasks.iter().any(|t| t.kind == kind)
    }

    pub fn interval(&self, kind: TaskKind) -> Option<Duration> {
        self.tasks.iter().find(|t| t.kind == kind).map(|t| t.interval)
    }

    /// Tasks whose interval has elapsed at `now`, in registration order.
    /// Returned tasks have their clock reset to `now`.
    pub fn due(&mut self, now: Instant) -> Vec<TaskKind> {
        let mut due = Vec::new();
        for task in &mut self.tasks {
            if now.saturating_duration_since(task.last_run) >= task.interval {
                task.last_run = now;
                due.push(task.kind);
            }
        }
        if !due.is_empty() {
            tracing::trace!("Due tasks: {:?}", due);
        }
        due
    }
}
