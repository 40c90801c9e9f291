use std::time::{Duration, Instant};

/// Shortest interval a schedule will run at.
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Longest interval a schedule will run at.
pub const MAX_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Which controller step a schedule drives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick {
    Forward,
    Reverse,
}

/// Identifies one periodic schedule so it can be cancelled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScheduleHandle(u64);

/// Source of periodic ticks for the playback controller.
///
/// The controller never touches a UI timer; it registers schedules here and
/// drains due ticks with [`Scheduler::poll_due`] from the host's event loop.
pub trait Scheduler {
    /// Start firing `tick` every `interval`, first firing one interval from now.
    fn schedule_periodic(&mut self, interval: Duration, tick: Tick) -> ScheduleHandle;

    /// Stop a schedule. Cancelling an unknown or already cancelled handle is a no-op.
    fn cancel(&mut self, handle: ScheduleHandle);

    /// Return the next tick that is due, if any. Each call yields at most one tick.
    fn poll_due(&mut self) -> Option<Tick>;

    /// Time until the earliest schedule fires, `None` when nothing is scheduled.
    fn next_due_in(&self) -> Option<Duration>;

    /// Interval of a live schedule.
    fn interval_of(&self, handle: ScheduleHandle) -> Option<Duration>;
}

#[derive(Clone, Debug)]
struct Periodic<T> {
    handle: ScheduleHandle,
    interval: Duration,
    tick: Tick,
    next_due: T,
}

/// Wall-clock scheduler polled from the UI update loop.
///
/// Like a UI timer it coalesces: a schedule that fell more than one interval
/// behind fires once and restarts from now instead of bursting.
#[derive(Debug, Default)]
pub struct IntervalScheduler {
    schedules: Vec<Periodic<Instant>>,
    next_id: u64,
}

impl IntervalScheduler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Scheduler for IntervalScheduler {
    fn schedule_periodic(&mut self, interval: Duration, tick: Tick) -> ScheduleHandle {
        let interval = interval.clamp(MIN_INTERVAL, MAX_INTERVAL);
        let handle = ScheduleHandle(self.next_id);
        self.next_id += 1;
        self.schedules.push(Periodic {
            handle,
            interval,
            tick,
            next_due: after(Instant::now(), interval),
        });
        handle
    }

    fn cancel(&mut self, handle: ScheduleHandle) {
        self.schedules.retain(|s| s.handle != handle);
    }

    fn poll_due(&mut self) -> Option<Tick> {
        let now = Instant::now();
        let schedule = self
            .schedules
            .iter_mut()
            .filter(|s| s.next_due <= now)
            .min_by_key(|s| s.next_due)?;

        schedule.next_due = after(schedule.next_due, schedule.interval);
        if schedule.next_due <= now {
            schedule.next_due = after(now, schedule.interval);
        }
        Some(schedule.tick)
    }

    fn next_due_in(&self) -> Option<Duration> {
        let now = Instant::now();
        self.schedules
            .iter()
            .map(|s| s.next_due.saturating_duration_since(now))
            .min()
    }

    fn interval_of(&self, handle: ScheduleHandle) -> Option<Duration> {
        self.schedules
            .iter()
            .find(|s| s.handle == handle)
            .map(|s| s.interval)
    }
}

fn after(instant: Instant, interval: Duration) -> Instant {
    instant.checked_add(interval).unwrap_or(instant)
}

/// Deterministic scheduler driven by a virtual clock.
///
/// Time only moves when [`ManualScheduler::advance`] is called, and every
/// elapsed interval fires exactly once.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now: Duration,
    schedules: Vec<Periodic<Duration>>,
    next_id: u64,
    created: Vec<(Tick, Duration)>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the virtual clock forward.
    pub fn advance(&mut self, by: Duration) {
        self.now = self.now.saturating_add(by);
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of schedules currently live.
    pub fn active_count(&self) -> usize {
        self.schedules.len()
    }

    /// Tick kind and interval of the live schedules.
    pub fn active(&self) -> Vec<(Tick, Duration)> {
        self.schedules.iter().map(|s| (s.tick, s.interval)).collect()
    }

    /// Every schedule ever created, in order.
    pub fn history(&self) -> &[(Tick, Duration)] {
        &self.created
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_periodic(&mut self, interval: Duration, tick: Tick) -> ScheduleHandle {
        let interval = interval.clamp(MIN_INTERVAL, MAX_INTERVAL);
        let handle = ScheduleHandle(self.next_id);
        self.next_id += 1;
        self.created.push((tick, interval));
        self.schedules.push(Periodic {
            handle,
            interval,
            tick,
            next_due: self.now.saturating_add(interval),
        });
        handle
    }

    fn cancel(&mut self, handle: ScheduleHandle) {
        self.schedules.retain(|s| s.handle != handle);
    }

    fn poll_due(&mut self) -> Option<Tick> {
        let now = self.now;
        let schedule = self
            .schedules
            .iter_mut()
            .filter(|s| s.next_due <= now)
            .min_by_key(|s| s.next_due)?;
        schedule.next_due = schedule.next_due.saturating_add(schedule.interval);
        Some(schedule.tick)
    }

    fn next_due_in(&self) -> Option<Duration> {
        self.schedules
            .iter()
            .map(|s| s.next_due.saturating_sub(self.now))
            .min()
    }

    fn interval_of(&self, handle: ScheduleHandle) -> Option<Duration> {
        self.schedules
            .iter()
            .find(|s| s.handle == handle)
            .map(|s| s.interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    fn drain(scheduler: &mut impl Scheduler) -> Vec<Tick> {
        std::iter::from_fn(|| scheduler.poll_due()).collect()
    }

    #[test]
    fn test_manual_fires_once_per_elapsed_interval() {
        let mut scheduler = ManualScheduler::new();
        scheduler.schedule_periodic(100 * MS, Tick::Forward);

        scheduler.advance(99 * MS);
        assert!(drain(&mut scheduler).is_empty());

        scheduler.advance(MS);
        assert_eq!(drain(&mut scheduler), vec![Tick::Forward]);

        scheduler.advance(300 * MS);
        assert_eq!(drain(&mut scheduler).len(), 3);
    }

    #[test]
    fn test_manual_cancel_stops_firing() {
        let mut scheduler = ManualScheduler::new();
        let handle = scheduler.schedule_periodic(10 * MS, Tick::Reverse);
        scheduler.advance(50 * MS);
        scheduler.cancel(handle);

        assert!(scheduler.poll_due().is_none());
        assert_eq!(scheduler.active_count(), 0);
        assert_eq!(scheduler.next_due_in(), None);
        assert_eq!(scheduler.interval_of(handle), None);

        // cancelling twice is harmless
        scheduler.cancel(handle);
    }

    #[test]
    fn test_manual_next_due_in() {
        let mut scheduler = ManualScheduler::new();
        scheduler.schedule_periodic(40 * MS, Tick::Forward);
        scheduler.advance(15 * MS);
        assert_eq!(scheduler.next_due_in(), Some(25 * MS));
    }

    #[test]
    fn test_interval_is_clamped_to_minimum() {
        let mut scheduler = ManualScheduler::new();
        let handle = scheduler.schedule_periodic(Duration::ZERO, Tick::Forward);
        assert_eq!(scheduler.interval_of(handle), Some(MIN_INTERVAL));

        let mut wall = IntervalScheduler::new();
        let handle = wall.schedule_periodic(Duration::from_micros(10), Tick::Forward);
        assert_eq!(wall.interval_of(handle), Some(MIN_INTERVAL));
    }

    #[test]
    fn test_interval_is_clamped_to_maximum() {
        let mut wall = IntervalScheduler::new();
        let handle = wall.schedule_periodic(Duration::MAX, Tick::Forward);
        assert_eq!(wall.interval_of(handle), Some(MAX_INTERVAL));
        assert!(wall.poll_due().is_none());
        assert!(wall.next_due_in().unwrap() <= MAX_INTERVAL);

        let mut scheduler = ManualScheduler::new();
        scheduler.advance(Duration::from_secs(5));
        let handle = scheduler.schedule_periodic(Duration::MAX, Tick::Reverse);
        assert_eq!(scheduler.interval_of(handle), Some(MAX_INTERVAL));
        assert_eq!(scheduler.next_due_in(), Some(MAX_INTERVAL));
    }

    #[test]
    fn test_manual_clock_saturates() {
        let mut scheduler = ManualScheduler::new();
        scheduler.schedule_periodic(MAX_INTERVAL, Tick::Forward);
        scheduler.advance(Duration::MAX);
        scheduler.advance(Duration::MAX);
        assert_eq!(scheduler.now(), Duration::MAX);

        // due once the clock saturates, then pinned at the end of time
        assert_eq!(scheduler.poll_due(), Some(Tick::Forward));
        assert_eq!(scheduler.poll_due(), Some(Tick::Forward));
    }

    #[test]
    fn test_interval_scheduler_not_due_before_interval() {
        let mut scheduler = IntervalScheduler::new();
        scheduler.schedule_periodic(Duration::from_secs(60), Tick::Forward);
        assert!(scheduler.poll_due().is_none());
        assert!(scheduler.next_due_in().unwrap() > Duration::from_secs(59));
    }

    #[test]
    fn test_interval_scheduler_coalesces_missed_ticks() {
        let mut scheduler = IntervalScheduler::new();
        scheduler.schedule_periodic(10 * MS, Tick::Reverse);
        std::thread::sleep(100 * MS);

        // ten intervals elapsed but only one catch-up tick is delivered
        let ticks = drain(&mut scheduler);
        assert_eq!(ticks, vec![Tick::Reverse]);
    }
}
