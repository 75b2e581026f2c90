//! Handler table: host callbacks bound to trigger kinds.
//!
//! Each [`HandlerSlot`] starts unbound. The host binds a callback per slot
//! before starting the scheduler; invoking a slot that was never bound is
//! reported as [`UnboundHandler`] rather than silently ignored.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use geppetto_domain::trigger::{ActionKind, ScheduleKind};

/// Error a handler may return. It is logged at the dispatch boundary.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Boxed future produced by a handler invocation.
pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<(), HandlerError>> + Send>>;

type Handler = Arc<dyn Fn(Vec<String>) -> HandlerFuture + Send + Sync>;

/// The five callback slots the host can bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HandlerSlot {
    EventPowerOn,
    EventPowerOff,
    EventWakeup,
    ScheduleBright,
    ScheduleSunlight,
}

impl HandlerSlot {
    pub const ALL: [Self; 5] = [
        Self::EventPowerOn,
        Self::EventPowerOff,
        Self::EventWakeup,
        Self::ScheduleBright,
        Self::ScheduleSunlight,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EventPowerOn => "event_power_on",
            Self::EventPowerOff => "event_power_off",
            Self::EventWakeup => "event_wakeup",
            Self::ScheduleBright => "schedule_bright",
            Self::ScheduleSunlight => "schedule_sunlight",
        }
    }
}

impl fmt::Display for HandlerSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ActionKind> for HandlerSlot {
    fn from(kind: ActionKind) -> Self {
        match kind {
            ActionKind::PowerOn => Self::EventPowerOn,
            ActionKind::PowerOff => Self::EventPowerOff,
            ActionKind::Wakeup => Self::EventWakeup,
        }
    }
}

impl From<ScheduleKind> for HandlerSlot {
    fn from(kind: ScheduleKind) -> Self {
        match kind {
            ScheduleKind::Bright => Self::ScheduleBright,
            ScheduleKind::Sunlight => Self::ScheduleSunlight,
        }
    }
}

/// A slot was invoked without a bound handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("missing handler for {0}")]
pub struct UnboundHandler(pub HandlerSlot);

/// Callbacks by slot.
#[derive(Default)]
pub struct HandlerTable {
    slots: HashMap<HandlerSlot, Handler>,
}

impl HandlerTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `handler` to `slot`, replacing any previous binding.
    pub fn bind<F, Fut>(&mut self, slot: HandlerSlot, handler: F) -> &mut Self
    where
        F: Fn(Vec<String>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
    {
        self.slots
            .insert(slot, Arc::new(move |devices| Box::pin(handler(devices))));
        self
    }

    #[must_use]
    pub fn is_bound(&self, slot: HandlerSlot) -> bool {
        self.slots.contains_key(&slot)
    }

    /// Prepare a run of the handler bound to `slot` with `devices`.
    ///
    /// The handler itself is only called once the returned future is
    /// polled, so a panic while it builds its future surfaces there.
    ///
    /// # Errors
    ///
    /// Returns [`UnboundHandler`] when nothing is bound to `slot`.
    pub fn invoke(
        &self,
        slot: HandlerSlot,
        devices: Vec<String>,
    ) -> Result<HandlerFuture, UnboundHandler> {
        let handler = Arc::clone(self.slots.get(&slot).ok_or(UnboundHandler(slot))?);
        Ok(Box::pin(async move { handler(devices).await }))
    }
}

impl fmt::Debug for HandlerTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bound: Vec<_> = HandlerSlot::ALL
            .into_iter()
            .filter(|slot| self.is_bound(*slot))
            .collect();
        f.debug_struct("HandlerTable").field("bound", &bound).finish()
    }
}
