//! Scoped polling task.
//!
//! Panels that refresh external state on a timer own a [`ScopedPoller`] for
//! exactly as long as they are visible. Stopping (or dropping) the poller
//! aborts the task, so remounting a panel never leaves a timer behind.
//! A tick that returns [`ControlFlow::Break`] ends the task on its own.

use std::future::Future;
use std::ops::ControlFlow;
use std::time::Duration;

use log::debug;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

pub struct ScopedPoller {
    name: String,
    handle: Option<JoinHandle<()>>,
}

impl ScopedPoller {
    /// Spawns `tick` immediately and then every `period` until it breaks.
    /// Must be called from within a tokio runtime.
    pub fn start<F, Fut>(name: &str, period: Duration, mut tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ControlFlow<()>> + Send + 'static,
    {
        let task_name = name.to_string();
        let handle = tokio::spawn(async move {
            let mut interval = time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tick().await.is_break() {
                    debug!("poller '{}' finished", task_name);
                    break;
                }
            }
        });
        debug!("poller '{}' started every {:?}", name, period);
        Self {
            name: name.to_string(),
            handle: Some(handle),
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Cancels the task. Idempotent.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            debug!("poller '{}' stopped", self.name);
        }
    }
}

impl Drop for ScopedPoller {
    fn drop(&mut self) {
        self.stop();
    }
}
