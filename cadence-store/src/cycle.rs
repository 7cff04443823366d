/// Cycle / completion engine
///
/// Pure functions deciding, for a task and "now", which cycle window is
/// current and how far along its quota is. Windows of fixed length
/// (the task's timeframe duration) tile time starting at the task's
/// creation, with no gaps or overlaps.
///
/// Nothing here touches the database and nothing is ever cached: status is
/// recomputed on every read so a completion recorded a moment ago is
/// immediately visible.
///
/// # Example
///
/// ```
/// use cadence_store::cycle::{current_window, CycleStatus};
/// use cadence_store::models::task::Timeframe;
/// use chrono::{Duration, Utc};
///
/// let created = Utc::now() - Duration::hours(30);
/// let window = current_window(created, Timeframe::Day, Utc::now());
///
/// // 30 hours in, the second daily window is current
/// assert_eq!(window.start, created + Duration::days(1));
///
/// let status = CycleStatus::new(window, 1, 2);
/// assert!(!status.is_complete());
/// assert_eq!(status.progress(), 0.5);
/// ```

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::task::{Task, Timeframe};

/// One cycle window: the half-open interval `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CycleWindow {
    /// Inclusive start of the window
    pub start: DateTime<Utc>,

    /// Exclusive end of the window
    pub end: DateTime<Utc>,
}

impl CycleWindow {
    /// Checks whether a timestamp falls inside the window
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && at < self.end
    }
}

/// Computes the cycle window containing `now`
///
/// Windows are anchored to `created_at` and advance by the timeframe
/// duration. A `now` before `created_at` (clock skew) clamps to the first
/// window rather than producing a window in the past.
pub fn current_window(
    created_at: DateTime<Utc>,
    timeframe: Timeframe,
    now: DateTime<Utc>,
) -> CycleWindow {
    let duration = timeframe.duration();
    let elapsed_ms = (now - created_at).num_milliseconds().max(0);
    let periods = elapsed_ms / duration.num_milliseconds();

    let start = created_at + duration * periods as i32;
    CycleWindow {
        start,
        end: start + duration,
    }
}

/// Computed completion status of a task's current cycle
///
/// Derived, never denormalized: there is no stored "is complete" flag
/// anywhere that could go stale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CycleStatus {
    /// The current cycle window
    pub window: CycleWindow,

    /// Completions recorded inside the window
    pub count: i64,

    /// Completions required per window
    pub quota: i32,
}

impl CycleStatus {
    /// Builds a status from a window, an in-window count and the task quota
    pub fn new(window: CycleWindow, count: i64, quota: i32) -> Self {
        Self { window, count, quota }
    }

    /// Derives the status for a task from its completion timestamps
    ///
    /// `completions` may include events from any window; only those inside
    /// the current one count.
    pub fn for_task(task: &Task, completions: &[DateTime<Utc>], now: DateTime<Utc>) -> Self {
        let window = current_window(task.created_at, task.timeframe, now);
        let count = completions.iter().filter(|at| window.contains(**at)).count() as i64;

        Self::new(window, count, task.times_to_complete)
    }

    /// Whether the current cycle's quota is met
    pub fn is_complete(&self) -> bool {
        self.count >= self.quota as i64
    }

    /// Progress fraction, capped at 1.0
    pub fn progress(&self) -> f64 {
        if self.quota <= 0 {
            // quota >= 1 is a store invariant; guard anyway
            return 1.0;
        }
        (self.count as f64 / self.quota as f64).min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
    }

    fn task(timeframe: Timeframe, quota: i32) -> Task {
        Task {
            id: "task00000001".to_string(),
            title: "water the plants".to_string(),
            user_id: "user00000001".to_string(),
            times_to_complete: quota,
            timeframe,
            created_at: t0(),
            updated_at: t0(),
        }
    }

    #[test]
    fn test_first_window_starts_at_creation() {
        let window = current_window(t0(), Timeframe::Day, t0() + Duration::hours(5));
        assert_eq!(window.start, t0());
        assert_eq!(window.end, t0() + Duration::days(1));
    }

    #[test]
    fn test_windows_tile_without_gaps_or_overlaps() {
        for timeframe in [
            Timeframe::Day,
            Timeframe::Week,
            Timeframe::Fortnight,
            Timeframe::Month,
        ] {
            let duration = timeframe.duration();
            let mut prev_end = t0();
            for i in 0..5 {
                let inside = t0() + duration * i + Duration::minutes(1);
                let window = current_window(t0(), timeframe, inside);
                assert_eq!(window.start, prev_end, "{:?} window {}", timeframe, i);
                assert_eq!(window.end, window.start + duration);
                prev_end = window.end;
            }
        }
    }

    #[test]
    fn test_window_boundary_belongs_to_next_window() {
        // Half-open: the instant one day in starts the second window
        let boundary = t0() + Duration::days(1);
        let window = current_window(t0(), Timeframe::Day, boundary);
        assert_eq!(window.start, boundary);
        assert!(window.contains(boundary));
    }

    #[test]
    fn test_now_before_creation_clamps_to_first_window() {
        let window = current_window(t0(), Timeframe::Week, t0() - Duration::hours(3));
        assert_eq!(window.start, t0());
    }

    #[test]
    fn test_quota_met_exactly() {
        let task = task(Timeframe::Week, 3);
        let now = t0() + Duration::days(2);
        let times: Vec<_> = (0..3).map(|i| t0() + Duration::hours(i)).collect();

        let status = CycleStatus::for_task(&task, &times, now);
        assert!(status.is_complete());

        let status = CycleStatus::for_task(&task, &times[..2], now);
        assert!(!status.is_complete());
        assert_eq!(status.count, 2);
    }

    #[test]
    fn test_fresh_task_progress_is_zero() {
        let task = task(Timeframe::Week, 3);
        let status = CycleStatus::for_task(&task, &[], t0());
        assert!(!status.is_complete());
        assert_eq!(status.progress(), 0.0);
    }

    #[test]
    fn test_progress_caps_at_one() {
        let task = task(Timeframe::Day, 2);
        let times: Vec<_> = (0..5).map(|i| t0() + Duration::minutes(i)).collect();
        let status = CycleStatus::for_task(&task, &times, t0() + Duration::hours(1));
        assert_eq!(status.progress(), 1.0);
    }

    #[test]
    fn test_daily_task_scenario() {
        // Task created at day 0, timeframe DAY, quota 2.
        let task = task(Timeframe::Day, 2);
        let mut completions = Vec::new();

        // Completion at hour 5: 1/2, incomplete
        completions.push(t0() + Duration::hours(5));
        let status = CycleStatus::for_task(&task, &completions, t0() + Duration::hours(5));
        assert_eq!(status.count, 1);
        assert_eq!(status.progress(), 0.5);
        assert!(!status.is_complete());

        // Completion at hour 20: 2/2, complete
        completions.push(t0() + Duration::hours(20));
        let status = CycleStatus::for_task(&task, &completions, t0() + Duration::hours(20));
        assert_eq!(status.count, 2);
        assert!(status.is_complete());

        // Completion at hour 30: next window, fresh count of 1/2
        completions.push(t0() + Duration::hours(30));
        let status = CycleStatus::for_task(&task, &completions, t0() + Duration::hours(30));
        assert_eq!(status.window.start, t0() + Duration::days(1));
        assert_eq!(status.count, 1);
        assert_eq!(status.progress(), 0.5);
        assert!(!status.is_complete());

        // The hour-5/20 completions stay attributed to the prior window
        let prior = CycleWindow {
            start: t0(),
            end: t0() + Duration::days(1),
        };
        let prior_count = completions.iter().filter(|at| prior.contains(**at)).count();
        assert_eq!(prior_count, 2);
    }
}
