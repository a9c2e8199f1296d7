//! The recurring alert scheduler.
//!
//! One scheduler instance owns a registry of armed time slots. Replacing the
//! schedule tears down every old slot before arming any new one, so a stale
//! timer can never fire after a replace and no slot is ever armed twice.
//!
//! Each slot runs as a single cancellable task: wait out the initial delay,
//! fire, then tick on a fixed period. Cancellation cancels the slot's token
//! and aborts its task, which covers both phases at once. On a multi-threaded
//! runtime a firing that is already past its timer await may still complete
//! once after a cancel; on the default current-thread test runtime the cancel
//! is exact.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use dashmap::DashMap;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::time_of_day::{next_fire_delay, TimeOfDay};
use crate::core::clock::Clock;
use crate::core::config::SchedulerConfig;
use crate::core::error::ScheduleError;
use crate::features::alerts::{AlertSink, PermissionState};
use crate::features::analytics::FiringLog;

/// One notification request from the list owner: a message and the `HH:mm`
/// wall-clock time it should fire at every day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSpec {
    pub message: String,
    pub time: String,
}

impl NotificationSpec {
    pub fn new(message: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            time: time.into(),
        }
    }

    /// Check shape and range, returning the parsed slot key and the trimmed
    /// message.
    fn validated(&self) -> Result<(TimeOfDay, String), ScheduleError> {
        let message = self.message.trim();
        if message.is_empty() {
            return Err(ScheduleError::EmptyMessage);
        }
        let time: TimeOfDay = self.time.parse()?;
        Ok((time, message.to_string()))
    }
}

/// Lifecycle phase of an armed slot. A time key absent from the registry has
/// no live timer at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    /// Waiting for its first firing.
    ArmedOnce,
    /// Has fired at least once and now repeats on the configured period.
    Recurring,
}

/// Registry entry for one time slot. Owns the slot task exclusively; dropping
/// it without `shutdown` would leak the task, so every removal path calls
/// `shutdown` first.
struct SlotHandle {
    messages: Vec<String>,
    recurring: Arc<AtomicBool>,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl SlotHandle {
    fn state(&self) -> SlotState {
        if self.recurring.load(Ordering::SeqCst) {
            SlotState::Recurring
        } else {
            SlotState::ArmedOnce
        }
    }

    /// Stop the slot task. Once this returns the slot will not fire again.
    fn shutdown(self) {
        self.cancel.cancel();
        self.task.abort();
    }
}

/// Daily recurring alert scheduler.
///
/// Construct one per application with the platform capabilities injected and
/// hand it to whoever owns the notification list. Must be used inside a Tokio
/// runtime; slot timers are spawned tasks.
pub struct AlertScheduler {
    registry: DashMap<TimeOfDay, SlotHandle>,
    sink: Arc<dyn AlertSink>,
    clock: Arc<dyn Clock>,
    firing_log: Arc<FiringLog>,
    config: SchedulerConfig,
}

impl AlertScheduler {
    /// Scheduler with daily recurrence and automatic permission requests.
    pub fn new(sink: Arc<dyn AlertSink>, clock: Arc<dyn Clock>) -> Self {
        Self::with_config(sink, clock, SchedulerConfig::default())
    }

    pub fn with_config(
        sink: Arc<dyn AlertSink>,
        clock: Arc<dyn Clock>,
        config: SchedulerConfig,
    ) -> Self {
        Self {
            registry: DashMap::new(),
            sink,
            clock,
            firing_log: Arc::new(FiringLog::new()),
            config,
        }
    }

    /// The diagnostic log every firing is recorded to.
    pub fn firing_log(&self) -> Arc<FiringLog> {
        Arc::clone(&self.firing_log)
    }

    /// Replace the whole schedule with `specs`.
    ///
    /// Tears down every existing slot first, so calling this twice with the
    /// same list is idempotent and a replaced slot can never fire again. A
    /// spec that fails validation is logged and skipped without affecting the
    /// rest of the batch. Specs sharing a time merge into one slot that fires
    /// all of their messages in submission order.
    pub fn schedule_notifications(&self, specs: &[NotificationSpec]) {
        self.clear_all_notifications();

        if self.config.request_permission_on_schedule
            && self.sink.permission() == PermissionState::Undetermined
        {
            // Fire-and-forget: arming never waits on the user's decision.
            let sink = Arc::clone(&self.sink);
            tokio::spawn(async move {
                let state = sink.request_permission().await;
                info!("Notification permission request resolved to {state}");
            });
        }

        let mut slots: BTreeMap<TimeOfDay, Vec<String>> = BTreeMap::new();
        for spec in specs {
            match spec.validated() {
                Ok((time, message)) => slots.entry(time).or_default().push(message),
                Err(e) => warn!("Skipping notification spec for {:?}: {e}", spec.time),
            }
        }

        for (time, messages) in slots {
            self.arm_slot(time, messages);
        }
    }

    /// Cancel the slot armed for `time`, if any. Returns whether a slot was
    /// torn down; an absent or unparseable key is a no-op, not an error.
    pub fn clear_notification(&self, time: &str) -> bool {
        let Ok(key) = time.parse::<TimeOfDay>() else {
            debug!("Clear for unparseable time {time:?}: nothing to do");
            return false;
        };
        match self.registry.remove(&key) {
            Some((_, handle)) => {
                handle.shutdown();
                info!("Cancelled daily alert for {key}");
                true
            }
            None => {
                debug!("No daily alert armed for {key}");
                false
            }
        }
    }

    /// Cancel every armed slot. No-op on an empty registry.
    pub fn clear_all_notifications(&self) {
        let keys: Vec<TimeOfDay> = self.registry.iter().map(|entry| *entry.key()).collect();
        let mut cancelled = 0;
        for key in keys {
            if let Some((_, handle)) = self.registry.remove(&key) {
                handle.shutdown();
                cancelled += 1;
            }
        }
        if cancelled > 0 {
            info!("Cancelled {cancelled} daily alert slot(s)");
        }
    }

    /// Present `message` immediately through the permission gate, outside of
    /// any schedule. The firing is recorded like a scheduled one.
    pub fn notify_now(&self, message: &str) {
        fire(&*self.sink, &self.firing_log, self.clock.now(), message);
    }

    /// Lifecycle phase of the slot for `time`, or `None` when nothing is
    /// armed there.
    pub fn slot_state(&self, time: &str) -> Option<SlotState> {
        let key = time.parse::<TimeOfDay>().ok()?;
        self.registry.get(&key).map(|handle| handle.state())
    }

    /// Messages that will fire for `time`, in firing order.
    pub fn slot_messages(&self, time: &str) -> Vec<String> {
        let Ok(key) = time.parse::<TimeOfDay>() else {
            return Vec::new();
        };
        self.registry
            .get(&key)
            .map(|handle| handle.messages.clone())
            .unwrap_or_default()
    }

    /// Number of armed time slots.
    pub fn armed_len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    fn arm_slot(&self, time: TimeOfDay, messages: Vec<String>) {
        let now = self.clock.now();
        let target = time.on_day_of(now);
        let delay = next_fire_delay(target, now);

        info!(
            "Armed daily alert for {time}: {} message(s), first firing in {}",
            messages.len(),
            format_delay(delay)
        );

        let cancel = CancellationToken::new();
        let recurring = Arc::new(AtomicBool::new(false));
        let task = tokio::spawn(run_slot(
            messages.clone(),
            delay,
            self.config.recurrence_period,
            cancel.clone(),
            Arc::clone(&recurring),
            Arc::clone(&self.sink),
            Arc::clone(&self.clock),
            Arc::clone(&self.firing_log),
        ));

        self.registry.insert(
            time,
            SlotHandle {
                messages,
                recurring,
                cancel,
                task,
            },
        );
    }
}

impl Drop for AlertScheduler {
    fn drop(&mut self) {
        self.clear_all_notifications();
    }
}

/// The life of one armed slot: initial delay, first firing, then fixed-period
/// repeats until cancelled.
#[allow(clippy::too_many_arguments)]
async fn run_slot(
    messages: Vec<String>,
    initial_delay: Duration,
    period: Duration,
    cancel: CancellationToken,
    recurring: Arc<AtomicBool>,
    sink: Arc<dyn AlertSink>,
    clock: Arc<dyn Clock>,
    firing_log: Arc<FiringLog>,
) {
    tokio::select! {
        _ = cancel.cancelled() => return,
        _ = sleep(initial_delay) => {}
    }

    fire_all(&messages, &*sink, &firing_log, &*clock);
    recurring.store(true, Ordering::SeqCst);

    let mut ticker = interval_at(Instant::now() + period, period);
    // A host stall or suspend across several periods must not burst a backlog
    // of stale alerts: deliver at most one catch-up firing, like the
    // platform's own repeating timers do.
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = ticker.tick() => fire_all(&messages, &*sink, &firing_log, &*clock),
        }
    }
}

fn fire_all(messages: &[String], sink: &dyn AlertSink, firing_log: &FiringLog, clock: &dyn Clock) {
    let fired_at = clock.now();
    for message in messages {
        fire(sink, firing_log, fired_at, message);
    }
}

/// Present one message if permission allows, and record the firing either way.
/// Nothing is queued or retried on a skip or a presentation failure.
fn fire(sink: &dyn AlertSink, firing_log: &FiringLog, fired_at: DateTime<Local>, message: &str) {
    let presented = match sink.permission() {
        PermissionState::Granted => match sink.present(message) {
            Ok(()) => true,
            Err(e) => {
                warn!("Platform failed to present alert {message:?}: {e}");
                false
            }
        },
        state => {
            debug!("Skipping presentation of {message:?}: permission is {state}");
            false
        }
    };
    firing_log.record(message, fired_at, presented);
}

/// Human-readable delay for log lines, e.g. "23h 55m".
fn format_delay(delay: Duration) -> String {
    let secs = delay.as_secs();
    let hours = secs / 3600;
    let mins = (secs % 3600) / 60;
    if hours > 0 {
        format!("{hours}h {mins}m")
    } else if mins > 0 {
        format!("{mins}m")
    } else {
        format!("{secs}s")
    }
}
