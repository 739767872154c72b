use std::collections::HashMap;
use std::time::{Duration, Instant};

/// What a pending timer is for. At most one timer per key is armed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimerKey {
    Tick,
    GameOverReset,
    FoodPulse,
}

/// Deadline-ordered, cancellable one-shot timers. Nothing here sleeps: the
/// event loop asks for the next deadline and calls `pop_due` when it wakes.
#[derive(Debug, Default)]
pub struct Scheduler {
    timers: HashMap<TimerKey, Instant>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms `key` for `deadline`, replacing any timer already armed for it.
    pub fn schedule(&mut self, key: TimerKey, deadline: Instant) {
        self.timers.insert(key, deadline);
    }

    pub fn schedule_in(&mut self, key: TimerKey, now: Instant, delay: Duration) {
        self.schedule(key, now + delay);
    }

    pub fn cancel(&mut self, key: TimerKey) -> bool {
        self.timers.remove(&key).is_some()
    }

    pub fn is_armed(&self, key: TimerKey) -> bool {
        self.timers.contains_key(&key)
    }

    #[cfg(test)]
    pub fn deadline(&self, key: TimerKey) -> Option<Instant> {
        self.timers.get(&key).copied()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.values().min().copied()
    }

    /// Disarms and returns every timer due at `now`, earliest first.
    pub fn pop_due(&mut self, now: Instant) -> Vec<TimerKey> {
        let mut due: Vec<(Instant, TimerKey)> = self
            .timers
            .iter()
            .filter(|&(_, &deadline)| deadline <= now)
            .map(|(&key, &deadline)| (deadline, key))
            .collect();
        due.sort_by_key(|&(deadline, key)| (deadline, key as u8));
        for (_, key) in &due {
            self.timers.remove(key);
        }
        due.into_iter().map(|(_, key)| key).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn fires_in_deadline_order() {
        let start = Instant::now();
        let mut timers = Scheduler::new();
        timers.schedule_in(TimerKey::GameOverReset, start, ms(2000));
        timers.schedule_in(TimerKey::Tick, start, ms(130));
        timers.schedule_in(TimerKey::FoodPulse, start, ms(50));

        assert!(timers.pop_due(start).is_empty());
        assert_eq!(timers.next_deadline(), Some(start + ms(50)));
        assert_eq!(
            timers.pop_due(start + ms(130)),
            vec![TimerKey::FoodPulse, TimerKey::Tick]
        );
        assert!(!timers.is_armed(TimerKey::Tick));
        assert_eq!(timers.pop_due(start + ms(5000)), vec![TimerKey::GameOverReset]);
        assert_eq!(timers.next_deadline(), None);
    }

    #[test]
    fn rescheduling_replaces_instead_of_duplicating() {
        let start = Instant::now();
        let mut timers = Scheduler::new();
        timers.schedule_in(TimerKey::Tick, start, ms(180));
        timers.schedule_in(TimerKey::Tick, start, ms(50));
        assert_eq!(timers.deadline(TimerKey::Tick), Some(start + ms(50)));
        assert_eq!(timers.pop_due(start + ms(500)), vec![TimerKey::Tick]);
        assert!(timers.pop_due(start + ms(500)).is_empty());
    }

    #[test]
    fn cancelled_timers_never_fire() {
        let start = Instant::now();
        let mut timers = Scheduler::new();
        timers.schedule_in(TimerKey::FoodPulse, start, ms(50));
        assert!(timers.cancel(TimerKey::FoodPulse));
        assert!(!timers.cancel(TimerKey::FoodPulse));
        assert!(timers.pop_due(start + ms(100)).is_empty());
    }
}
