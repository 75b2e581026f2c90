//! Scheduler loop: fires due triggers against the bound handlers.
//!
//! ## Lifecycle
//! A [`Scheduler`] is built from a [`TriggerRegistry`], a [`HandlerTable`]
//! and a [`Clock`]. Weekly triggers are queued for their next occurrence and
//! window triggers for every minute. [`Scheduler::start`] checks that every
//! slot a trigger needs is bound, then moves the scheduler onto a background
//! task that calls [`Scheduler::run_pending`] once per poll interval.
//!
//! ## Failure isolation
//! Each handler runs to completion on its own task before the next one
//! starts. An error or a panic inside a handler is logged with the trigger
//! and its devices; the loop keeps going. Only an unbound slot stops it.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDateTime;
use geppetto_domain::time::ClockTime;
use tokio::task::{JoinError, JoinHandle};

use crate::handlers::{HandlerSlot, HandlerTable, UnboundHandler};
use crate::job_queue::JobQueue;
use crate::ports::Clock;
use crate::registry::TriggerRegistry;

/// Sleep between two checks of the job queue.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Errors that stop the scheduler.
#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    #[error(transparent)]
    UnboundHandler(#[from] UnboundHandler),

    #[error("scheduler task failed")]
    Task(#[source] JoinError),
}

#[derive(Debug, Clone, Copy)]
enum Job {
    Event(usize),
    Window(usize),
}

/// Polls the job queue and dispatches due triggers.
pub struct Scheduler<C> {
    registry: Arc<TriggerRegistry>,
    handlers: HandlerTable,
    clock: C,
    queue: JobQueue<Job>,
    poll_interval: Duration,
}

impl<C: Clock + 'static> Scheduler<C> {
    /// Queue every trigger of `registry` relative to the current local time.
    pub fn new(registry: Arc<TriggerRegistry>, handlers: HandlerTable, clock: C) -> Self {
        let now = clock.local();
        let mut queue = JobQueue::new();
        for (index, trigger) in registry.events().iter().enumerate() {
            queue.schedule_weekly_at(now, trigger.weekday, trigger.time, Job::Event(index));
        }
        for index in 0..registry.windows().len() {
            queue.schedule_every_minute(now, Job::Window(index));
        }

        Self {
            registry,
            handlers,
            clock,
            queue,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    #[must_use]
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    #[must_use]
    pub fn registry(&self) -> &TriggerRegistry {
        &self.registry
    }

    /// Local time of the earliest queued run.
    #[must_use]
    pub fn next_run(&self) -> Option<NaiveDateTime> {
        self.queue.next_run()
    }

    /// Make sure every slot a registered trigger can fire is bound.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::UnboundHandler`] naming the first missing slot.
    pub fn check_bindings(&self) -> Result<(), SchedulerError> {
        match self
            .registry
            .required_slots()
            .into_iter()
            .find(|slot| !self.handlers.is_bound(*slot))
        {
            Some(slot) => Err(UnboundHandler(slot).into()),
            None => Ok(()),
        }
    }

    /// Fire every trigger due at the clock's current time.
    ///
    /// Weekly triggers fire once per occurrence. Window triggers fire when
    /// their minute job is due and the current time is inside the window.
    /// Returns the number of handlers invoked.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::UnboundHandler`] when a due trigger's slot
    /// has no handler. Handler failures are logged, not returned.
    pub async fn run_pending(&mut self) -> Result<usize, SchedulerError> {
        let now = self.clock.local();
        let due = self.queue.run_pending(now);
        if due.is_empty() {
            return Ok(0);
        }

        let tick = ClockTime::of(&now.time());
        let registry = Arc::clone(&self.registry);
        let mut fired = 0;
        for job in due {
            match job {
                Job::Event(index) => {
                    let trigger = &registry.events()[index];
                    self.dispatch(
                        trigger.action.into(),
                        trigger.to_string(),
                        &trigger.device_names,
                    )
                    .await?;
                    fired += 1;
                }
                Job::Window(index) => {
                    let trigger = &registry.windows()[index];
                    if !trigger.is_active(tick) {
                        continue;
                    }
                    self.dispatch(trigger.kind.into(), trigger.to_string(), &trigger.light_names)
                        .await?;
                    fired += 1;
                }
            }
        }
        Ok(fired)
    }

    async fn dispatch(
        &self,
        slot: HandlerSlot,
        trigger: String,
        devices: &[String],
    ) -> Result<(), UnboundHandler> {
        let handler = self.handlers.invoke(slot, devices.to_vec())?;
        tracing::debug!(%trigger, ?devices, "firing trigger");

        match tokio::spawn(handler).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                tracing::error!(%trigger, ?devices, error = %err, "trigger handler failed");
            }
            Err(err) => {
                tracing::error!(%trigger, ?devices, error = %err, "trigger handler panicked");
            }
        }
        Ok(())
    }

    /// Validate bindings and run the loop on a background task.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::UnboundHandler`] if a registered trigger
    /// would invoke an unbound slot; nothing is spawned in that case.
    #[tracing::instrument(skip(self), fields(
        events = self.registry.events().len(),
        windows = self.registry.windows().len(),
    ))]
    pub fn start(self) -> Result<SchedulerHandle, SchedulerError> {
        self.check_bindings()?;
        tracing::info!(next_run = ?self.next_run(), "scheduler started");
        Ok(SchedulerHandle {
            task: tokio::spawn(self.run()),
        })
    }

    async fn run(mut self) -> Result<(), SchedulerError> {
        loop {
            if let Err(err) = self.run_pending().await {
                tracing::error!(error = %err, "scheduler stopped");
                return Err(err);
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

/// Handle to a running scheduler task.
#[derive(Debug)]
pub struct SchedulerHandle {
    task: JoinHandle<Result<(), SchedulerError>>,
}

impl SchedulerHandle {
    /// Stop the loop at its next suspension point.
    pub fn abort(&self) {
        self.task.abort();
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the task to end. An aborted loop ends with `Ok(())`.
    ///
    /// # Errors
    ///
    /// Returns the error that stopped the loop, or
    /// [`SchedulerError::Task`] if the task itself panicked.
    pub async fn join(self) -> Result<(), SchedulerError> {
        match self.task.await {
            Ok(result) => result,
            Err(err) if err.is_cancelled() => Ok(()),
            Err(err) => Err(SchedulerError::Task(err)),
        }
    }
}
