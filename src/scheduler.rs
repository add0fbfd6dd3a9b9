use std::time::{Duration, Instant};

/// Handle returned by [`Scheduler::schedule`]; pass it back to cancel the task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

#[derive(Debug, Clone)]
struct ScheduledTask<T> {
    handle: TaskHandle,
    due: Instant,
    action: T,
}

/// Delayed actions owned by a session.
///
/// Nothing runs on its own: the owner calls [`Scheduler::take_due`] from its
/// event loop and applies whatever comes back. Tasks are cancelled one at a
/// time by handle; dropping the scheduler discards whatever has not fired.
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    tasks: Vec<ScheduledTask<T>>,
    next_id: u64,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            next_id: 0,
        }
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, now: Instant, delay: Duration, action: T) -> TaskHandle {
        let handle = TaskHandle(self.next_id);
        self.next_id += 1;
        self.tasks.push(ScheduledTask {
            handle,
            due: now + delay,
            action,
        });
        handle
    }

    /// Returns true if the task was still pending.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.handle != handle);
        self.tasks.len() != before
    }

    pub fn is_pending(&self, handle: TaskHandle) -> bool {
        self.tasks.iter().any(|t| t.handle == handle)
    }

    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.tasks.iter().map(|t| t.due).min()
    }

    /// Removes and returns every task due at `now`, earliest first.
    pub fn take_due(&mut self, now: Instant) -> Vec<T> {
        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.tasks.drain(..).partition(|t| t.due <= now);
        self.tasks = pending;
        due.sort_by_key(|t| (t.due, t.handle.0));
        due.into_iter().map(|t| t.action).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nothing_due_before_delay() {
        let now = Instant::now();
        let mut s = Scheduler::new();
        s.schedule(now, Duration::from_millis(400), "advance");

        assert!(s.take_due(now + Duration::from_millis(399)).is_empty());
        assert_eq!(s.take_due(now + Duration::from_millis(400)), vec!["advance"]);
        assert_eq!(s.pending(), 0);
    }

    #[test]
    fn test_due_tasks_come_back_in_order() {
        let now = Instant::now();
        let mut s = Scheduler::new();
        s.schedule(now, Duration::from_millis(900), 3);
        s.schedule(now, Duration::from_millis(100), 1);
        s.schedule(now, Duration::from_millis(450), 2);

        assert_eq!(s.next_due(), Some(now + Duration::from_millis(100)));
        assert_eq!(s.take_due(now + Duration::from_secs(1)), vec![1, 2, 3]);
        assert_eq!(s.next_due(), None);
    }

    #[test]
    fn test_cancel_single_task() {
        let now = Instant::now();
        let mut s = Scheduler::new();
        let a = s.schedule(now, Duration::from_millis(10), 'a');
        let b = s.schedule(now, Duration::from_millis(10), 'b');

        assert!(s.cancel(a));
        assert!(!s.cancel(a));
        assert!(!s.is_pending(a));
        assert!(s.is_pending(b));
        assert_eq!(s.take_due(now + Duration::from_millis(10)), vec!['b']);
    }

    #[test]
    fn test_cancel_after_firing_is_a_no_op() {
        let now = Instant::now();
        let mut s = Scheduler::new();
        let a = s.schedule(now, Duration::ZERO, "finish");
        assert_eq!(s.take_due(now), vec!["finish"]);
        assert!(!s.cancel(a));
        assert_eq!(s.pending(), 0);
    }
}
