//! View event types and synchronous dispatch.
//!
//! The host's event mechanism is modeled as explicit handler registration:
//! [`Dispatcher::subscribe`] returns a [`Subscription`] capability that the
//! owner cancels to unsubscribe. Dispatch is synchronous on the caller's
//! thread, in registration order, and each event is processed to completion
//! before the next is delivered. There is no global listener registry.
//!
//! Handlers must not re-dispatch into the dispatcher that is invoking them;
//! that is a host contract violation and the `RefCell` wiring in
//! [`crate::band::attach`] will panic rather than corrupt state.

use crate::model::LineLayout;
use std::cell::Cell;
use std::rc::Rc;

/// Identity of a text snapshot, as assigned by the host buffer.
///
/// The engine only ever compares snapshot ids for equality; a change in
/// identity means the buffer text was superseded between layout passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SnapshotId(u64);

impl SnapshotId {
    /// Create a snapshot id from the host's raw version number.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw id value.
    pub fn get(&self) -> u64 {
        self.0
    }
}

/// Host notification that visible line geometry has been (re)computed.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutChanged {
    /// Snapshot the previous layout was computed against.
    pub old_snapshot: SnapshotId,
    /// Snapshot the current layout is computed against.
    pub new_snapshot: SnapshotId,
    /// Whether the snapshot change inserted or deleted lines (as opposed to
    /// cosmetic reformatting within existing lines).
    pub includes_line_edits: bool,
    /// Lines that are new or reformatted in this layout pass.
    pub reformatted: Vec<LineLayout>,
    /// The complete current set of visible lines. Consulted only on the
    /// full-invalidation path.
    pub visible: Vec<LineLayout>,
}

impl LayoutChanged {
    /// Whether the buffer text changed between the two layout passes.
    pub fn snapshot_changed(&self) -> bool {
        self.old_snapshot != self.new_snapshot
    }

    /// Whether this event requires discarding all bands and rebuilding from
    /// the complete visible set.
    pub fn is_full_invalidation(&self) -> bool {
        self.snapshot_changed() && self.includes_line_edits
    }
}

/// Host notification that the viewport width changed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportWidthChanged {
    /// The new viewport width, in host units.
    pub width: f64,
}

/// Host notification that the viewport's left edge moved (horizontal
/// scroll).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportLeftChanged {
    /// The new left offset, in host units.
    pub left: f64,
}

/// Error type handlers may surface through dispatch.
///
/// Handler failures are host-layer failures (for the band engine, a rejected
/// adornment add); they pass through dispatch unmodified.
pub type HandlerError = Box<dyn std::error::Error>;

type Handler<E> = Box<dyn FnMut(&E) -> Result<(), HandlerError>>;

/// Capability to cancel a registered handler.
///
/// The host (or whoever wired the handler) owns the subscription; cancelling
/// it removes the handler from future dispatches. Dropping a subscription
/// without cancelling leaves the handler registered, matching hosts where
/// teardown is an explicit disposal step.
#[derive(Debug)]
pub struct Subscription {
    alive: Rc<Cell<bool>>,
}

impl Subscription {
    /// Unregister the handler. Idempotent.
    pub fn cancel(&self) {
        self.alive.set(false);
    }

    /// Whether the handler is still registered.
    pub fn is_active(&self) -> bool {
        self.alive.get()
    }
}

/// Synchronous single-threaded event dispatcher for one event class.
pub struct Dispatcher<E> {
    handlers: Vec<(Rc<Cell<bool>>, Handler<E>)>,
}

impl<E> Default for Dispatcher<E> {
    fn default() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }
}

impl<E> Dispatcher<E> {
    /// Create an empty dispatcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler, returning the capability to cancel it.
    pub fn subscribe(
        &mut self,
        handler: impl FnMut(&E) -> Result<(), HandlerError> + 'static,
    ) -> Subscription {
        let alive = Rc::new(Cell::new(true));
        self.handlers.push((alive.clone(), Box::new(handler)));
        Subscription { alive }
    }

    /// Deliver an event to every live handler, in registration order.
    ///
    /// Stops at the first handler error and returns it unmodified; handlers
    /// registered later do not see the event in that case. Cancelled
    /// handlers are pruned as a side effect.
    pub fn dispatch(&mut self, event: &E) -> Result<(), HandlerError> {
        self.handlers.retain(|(alive, _)| alive.get());
        for (_, handler) in &mut self.handlers {
            handler(event)?;
        }
        Ok(())
    }

    /// Number of live handlers.
    pub fn handler_count(&self) -> usize {
        self.handlers
            .iter()
            .filter(|(alive, _)| alive.get())
            .count()
    }
}

/// The three event classes a view exposes to the band engine.
#[derive(Default)]
pub struct ViewEvents {
    /// Layout passes (full or incremental).
    pub layout: Dispatcher<LayoutChanged>,
    /// Viewport width changes (resize).
    pub width: Dispatcher<ViewportWidthChanged>,
    /// Viewport left-edge changes (horizontal scroll).
    pub left: Dispatcher<ViewportLeftChanged>,
}

impl ViewEvents {
    /// Create an event set with no registered handlers.
    pub fn new() -> Self {
        Self::default()
    }
}
