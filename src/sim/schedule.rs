//! Fixed-rate spawn timers with cancellation handles
//!
//! Timers are driven by the wall-clock time the host passes to `due`; each
//! elapsed period yields one firing, with a bounded catch-up after stalls.

use crate::consts::MAX_TIMER_CATCHUP;

/// Work a timer triggers when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Gameplay obstacle spawn (level-scaled)
    SpawnObstacle,
    /// Decorative menu obstacle spawn
    SpawnMenuObstacle,
    /// Power-up roll
    CheckPowerUp,
}

/// Handle returned by `Timers::start`, used to cancel the timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u32);

#[derive(Debug, Clone)]
struct Timer {
    handle: TimerHandle,
    task: Task,
    period_ms: f64,
    next_due_ms: f64,
}

#[derive(Debug, Clone, Default)]
pub struct Timers {
    timers: Vec<Timer>,
    next_handle: u32,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a repeating timer; the first firing is one period from `now_ms`
    pub fn start(&mut self, task: Task, period_ms: f64, now_ms: f64) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        let period_ms = period_ms.max(1.0);
        self.timers.push(Timer {
            handle,
            task,
            period_ms,
            next_due_ms: now_ms + period_ms,
        });
        handle
    }

    /// Stop a timer; false if it was already gone
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.handle != handle);
        self.timers.len() != before
    }

    pub fn is_active(&self, handle: TimerHandle) -> bool {
        self.timers.iter().any(|t| t.handle == handle)
    }

    pub fn period_ms(&self, handle: TimerHandle) -> Option<f64> {
        self.timers
            .iter()
            .find(|t| t.handle == handle)
            .map(|t| t.period_ms)
    }

    pub fn clear(&mut self) {
        self.timers.clear();
    }

    /// Collect every firing due at `now_ms`, in due-time order
    pub fn due(&mut self, now_ms: f64) -> Vec<Task> {
        let mut fired: Vec<(f64, Task)> = Vec::new();
        for timer in &mut self.timers {
            let mut count = 0;
            while timer.next_due_ms <= now_ms && count < MAX_TIMER_CATCHUP {
                fired.push((timer.next_due_ms, timer.task));
                timer.next_due_ms += timer.period_ms;
                count += 1;
            }
            if timer.next_due_ms <= now_ms {
                // Too far behind: drop the backlog
                timer.next_due_ms = now_ms + timer.period_ms;
            }
        }
        fired.sort_by(|a, b| a.0.total_cmp(&b.0));
        fired.into_iter().map(|(_, task)| task).collect()
    }
}
