//! Watchdog thread for flagging slow event dispatch.
//!
//! A background thread that polls how long the main loop has been
//! sitting on the current event and prints a diagnostic if it exceeds a
//! configured timeout, described in terms of this engine's
//! `EventKindTag`/`SimTime` model.

use mcsim_common::{EventKindTag, SimTime};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Information about the event currently being dispatched.
#[derive(Debug, Clone)]
pub struct CurrentEventInfo {
    pub event_number: u64,
    pub sim_time: SimTime,
    pub kind: EventKindTag,
    pub started_at: Instant,
}

impl CurrentEventInfo {
    pub fn new(event_number: u64, sim_time: SimTime, kind: EventKindTag) -> Self {
        CurrentEventInfo { event_number, sim_time, kind, started_at: Instant::now() }
    }
}

/// Shared state between the scheduler loop and the watchdog thread.
pub struct WatchdogState {
    current_event: Mutex<Option<CurrentEventInfo>>,
    stop_flag: AtomicBool,
    alert_count: AtomicU64,
    seed: AtomicU64,
}

impl WatchdogState {
    pub fn new() -> Self {
        WatchdogState {
            current_event: Mutex::new(None),
            stop_flag: AtomicBool::new(false),
            alert_count: AtomicU64::new(0),
            seed: AtomicU64::new(0),
        }
    }

    pub fn set_seed(&self, seed: u64) {
        self.seed.store(seed, Ordering::Relaxed);
    }

    pub fn get_seed(&self) -> u64 {
        self.seed.load(Ordering::Relaxed)
    }

    pub fn set_current_event(&self, info: Option<CurrentEventInfo>) {
        *self.current_event.lock().unwrap() = info;
    }

    pub fn get_current_event(&self) -> Option<CurrentEventInfo> {
        self.current_event.lock().unwrap().clone()
    }

    pub fn stop(&self) {
        self.stop_flag.store(true, Ordering::Relaxed);
    }

    pub fn should_stop(&self) -> bool {
        self.stop_flag.load(Ordering::Relaxed)
    }

    pub fn increment_alert_count(&self) -> u64 {
        self.alert_count.fetch_add(1, Ordering::Relaxed) + 1
    }
}

impl Default for WatchdogState {
    fn default() -> Self {
        Self::new()
    }
}

/// Watchdog thread handle. Purely a diagnostic aid: it never touches
/// engine state, only reads `WatchdogState` the scheduler loop updates as
/// it dispatches events.
pub struct Watchdog {
    state: Arc<WatchdogState>,
    thread_handle: Option<JoinHandle<()>>,
}

impl Watchdog {
    pub fn new(timeout: Duration) -> Self {
        let state = Arc::new(WatchdogState::new());
        let watchdog_state = Arc::clone(&state);
        let check_interval = Duration::from_millis(500).min(timeout);

        let thread_handle = thread::spawn(move || {
            let mut last_alerted: Option<u64> = None;
            while !watchdog_state.should_stop() {
                thread::sleep(check_interval);
                if let Some(info) = watchdog_state.get_current_event() {
                    let elapsed = info.started_at.elapsed();
                    if elapsed >= timeout && last_alerted != Some(info.event_number) {
                        last_alerted = Some(info.event_number);
                        let alert_num = watchdog_state.increment_alert_count();
                        eprintln!(
                            "watchdog alert #{alert_num}: event #{} ({:?} @ {}) has been dispatching for {:.1}s (seed={})",
                            info.event_number,
                            info.kind,
                            info.sim_time,
                            elapsed.as_secs_f64(),
                            watchdog_state.get_seed(),
                        );
                    }
                }
            }
        });

        Watchdog { state, thread_handle: Some(thread_handle) }
    }

    pub fn state(&self) -> &Arc<WatchdogState> {
        &self.state
    }

    pub fn stop(mut self) {
        self.state.stop();
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Watchdog {
    fn drop(&mut self) {
        self.state.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alert_count_increments() {
        let state = WatchdogState::new();
        assert_eq!(state.increment_alert_count(), 1);
        assert_eq!(state.increment_alert_count(), 2);
    }

    #[test]
    fn current_event_round_trips() {
        let state = WatchdogState::new();
        state.set_current_event(Some(CurrentEventInfo::new(3, SimTime::from_millis(10), EventKindTag::Send)));
        let info = state.get_current_event().unwrap();
        assert_eq!(info.event_number, 3);
        assert_eq!(info.kind, EventKindTag::Send);
    }
}
