// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Inf and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Session timers.
//!
//! Each kind of timer has exactly one slot. Arming a slot aborts whatever was in it, so a
//! periodic callback can never be stacked twice. Timers are tokio tasks spawned on the runtime
//! the caller is running in; arming without one fails with [`TimerError::NoRuntime`].

use std::fmt;
use std::future::Future;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep, Instant, MissedTickBehavior};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerError {
    NoRuntime,
}

impl fmt::Display for TimerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoRuntime => f.write_str("timers need a running tokio runtime"),
        }
    }
}

impl std::error::Error for TimerError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    AutoSave,
    AutoSaveStatus,
    CursorBlink,
}

#[derive(Debug, Default)]
pub struct SessionTimers {
    auto_save: Option<JoinHandle<()>>,
    auto_save_status: Option<JoinHandle<()>>,
    cursor_blink: Option<JoinHandle<()>>,
}

impl SessionTimers {
    /// Cancels every timer and clears its slot.
    pub fn reset(&mut self) {
        for kind in [
            TimerKind::AutoSave,
            TimerKind::AutoSaveStatus,
            TimerKind::CursorBlink,
        ] {
            self.cancel(kind);
        }
    }

    pub fn cancel(&mut self, kind: TimerKind) {
        if let Some(handle) = self.slot(kind).take() {
            handle.abort();
        }
    }

    /// True while the timer of `kind` is armed and has not fired (or, for the blink, not stopped).
    pub fn is_armed(&self, kind: TimerKind) -> bool {
        let slot = match kind {
            TimerKind::AutoSave => &self.auto_save,
            TimerKind::AutoSaveStatus => &self.auto_save_status,
            TimerKind::CursorBlink => &self.cursor_blink,
        };
        slot.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// Runs `task` once `delay` has passed without another auto-save being scheduled.
    pub fn schedule_auto_save<F>(&mut self, delay: Duration, task: F) -> Result<(), TimerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = spawn(async move {
            sleep(delay).await;
            task.await;
        })?;
        self.arm(TimerKind::AutoSave, handle);
        Ok(())
    }

    /// Calls `on_expire` after `duration`, typically to clear a "Saved" indicator.
    pub fn show_auto_save_status<F>(
        &mut self,
        duration: Duration,
        on_expire: F,
    ) -> Result<(), TimerError>
    where
        F: FnOnce() + Send + 'static,
    {
        let handle = spawn(async move {
            sleep(duration).await;
            on_expire();
        })?;
        self.arm(TimerKind::AutoSaveStatus, handle);
        Ok(())
    }

    /// Calls `tick` every `period`, starting one period from now.
    pub fn start_cursor_blink<F>(&mut self, period: Duration, mut tick: F) -> Result<(), TimerError>
    where
        F: FnMut() + Send + 'static,
    {
        let handle = spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                tick();
            }
        })?;
        self.arm(TimerKind::CursorBlink, handle);
        Ok(())
    }

    fn arm(&mut self, kind: TimerKind, handle: JoinHandle<()>) {
        if let Some(previous) = self.slot(kind).replace(handle) {
            previous.abort();
        }
    }

    fn slot(&mut self, kind: TimerKind) -> &mut Option<JoinHandle<()>> {
        match kind {
            TimerKind::AutoSave => &mut self.auto_save,
            TimerKind::AutoSaveStatus => &mut self.auto_save_status,
            TimerKind::CursorBlink => &mut self.cursor_blink,
        }
    }
}

fn spawn<F>(task: F) -> Result<JoinHandle<()>, TimerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let runtime = Handle::try_current().map_err(|_| TimerError::NoRuntime)?;
    Ok(runtime.spawn(task))
}

impl Drop for SessionTimers {
    fn drop(&mut self) {
        self.reset();
    }
}
