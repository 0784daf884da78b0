//! The line-band renderer.
//!
//! Reactive core of the crate: consumes layout and viewport events from the
//! host and keeps the adornment layer's bands in 1:1 correspondence with the
//! visible lines whose logical line number is odd.
//!
//! The renderer has no state machine of its own. Its behavior is a pure
//! function of (current layer contents, incoming event): layout events
//! add/rebuild bands, viewport events broadcast geometry mutations, and
//! parity is re-derived from buffer offsets on every pass rather than
//! cached.

use crate::band::brush::{BandStyle, Brush};
use crate::host::events::{
    HandlerError, LayoutChanged, Subscription, ViewEvents, ViewportLeftChanged,
    ViewportWidthChanged,
};
use crate::host::{AdornmentLayer, TextView};
use crate::model::{AttachError, Band, LineLayout};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, info};

/// Synchronizes band decorations with the host's line layout.
///
/// Owns a view handle (read-only) and an adornment layer (commanded). The
/// shared fill brush is computed once at construction and never recomputed,
/// even when the opacity was sampled from the viewport background.
pub struct LineBandRenderer<V, L> {
    view: V,
    layer: L,
    brush: Brush,
}

impl<V: TextView, L: AdornmentLayer> LineBandRenderer<V, L> {
    /// Construct a renderer for a view.
    ///
    /// Fails with [`AttachError::MissingView`] when the host hands over no
    /// view handle; in that case no brush is computed and no bands exist.
    /// No bands are created on success either — only the first layout event
    /// produces decorations.
    pub fn new(view: Option<V>, layer: L, style: BandStyle) -> Result<Self, AttachError> {
        let view = view.ok_or(AttachError::MissingView)?;
        let brush = style.resolve(&view.viewport());
        Ok(Self { view, layer, brush })
    }

    /// Handle a layout pass.
    ///
    /// A snapshot-identity change that inserted or deleted lines invalidates
    /// every band: line numbers below the edit shifted, so parity derived
    /// from the old layout is stale everywhere. Anything else (cosmetic
    /// reformatting, scrolling) refreshes only the lines the host reports as
    /// new or reformatted, leaving other bands untouched.
    ///
    /// Layer failures propagate unmodified.
    pub fn handle_layout_changed(&mut self, event: &LayoutChanged) -> Result<(), L::Error> {
        if event.is_full_invalidation() {
            info!(
                visible = event.visible.len(),
                "line structure changed, rebuilding all bands"
            );
            self.layer.remove_all();
            self.refresh(&event.visible)
        } else {
            debug!(reformatted = event.reformatted.len(), "incremental refresh");
            self.refresh(&event.reformatted)
        }
    }

    /// Create bands for the odd-numbered lines of `lines`.
    ///
    /// Order-independent: each line is decided purely by the parity of its
    /// own line number, looked up from its start offset. Even lines are
    /// skipped without removing a stale band for their extent; stale bands
    /// only ever leave the layer via full invalidation.
    fn refresh(&mut self, lines: &[LineLayout]) -> Result<(), L::Error> {
        let viewport = self.view.viewport();
        for line in lines {
            let number = self.view.line_number_at(line.extent.start);
            if number.is_odd() {
                self.layer.add(
                    line.extent,
                    Band {
                        width: viewport.width,
                        height: line.height,
                        left: viewport.left,
                        top: line.top,
                        fill: self.brush,
                    },
                )?;
            }
        }
        Ok(())
    }

    /// Broadcast a new viewport width to every band.
    ///
    /// Pure width mutation: no bands are added or removed, no positions or
    /// line numbers are recomputed.
    pub fn handle_viewport_width_changed(&mut self, event: &ViewportWidthChanged) {
        debug!(width = event.width, "broadcasting viewport width");
        self.layer
            .for_each_mut(&mut |_, band| band.width = event.width);
    }

    /// Broadcast a new viewport left offset to every band.
    ///
    /// Pure reposition: widths and heights are untouched.
    pub fn handle_viewport_left_changed(&mut self, event: &ViewportLeftChanged) {
        debug!(left = event.left, "broadcasting viewport left");
        self.layer
            .for_each_mut(&mut |_, band| band.left = event.left);
    }

    /// The shared fill brush.
    pub fn brush(&self) -> Brush {
        self.brush
    }

    /// Read access to the adornment layer.
    pub fn layer(&self) -> &L {
        &self.layer
    }
}

/// A renderer wired into a view's event stream.
///
/// Holds the shared renderer handle plus the three subscriptions created by
/// [`attach`]. Detaching cancels the subscriptions; the renderer performs no
/// other teardown.
pub struct BandBinding<V, L> {
    renderer: Rc<RefCell<LineBandRenderer<V, L>>>,
    subscriptions: [Subscription; 3],
}

impl<V, L> BandBinding<V, L> {
    /// The shared renderer handle.
    pub fn renderer(&self) -> &Rc<RefCell<LineBandRenderer<V, L>>> {
        &self.renderer
    }

    /// Cancel the three event subscriptions.
    pub fn detach(self) {
        for sub in &self.subscriptions {
            sub.cancel();
        }
    }
}

/// Construct a renderer and register it for the three view event classes.
///
/// On [`AttachError::MissingView`] nothing is registered: the subscriptions
/// are only created after construction succeeds. Layer failures raised
/// inside the layout handler surface through [`ViewEvents::layout`]'s
/// dispatch result, unmodified.
pub fn attach<V, L>(
    view: Option<V>,
    layer: L,
    style: BandStyle,
    events: &mut ViewEvents,
) -> Result<BandBinding<V, L>, AttachError>
where
    V: TextView + 'static,
    L: AdornmentLayer + 'static,
{
    let renderer = Rc::new(RefCell::new(LineBandRenderer::new(view, layer, style)?));

    let layout_sub = {
        let renderer = renderer.clone();
        events.layout.subscribe(move |event: &LayoutChanged| {
            renderer
                .borrow_mut()
                .handle_layout_changed(event)
                .map_err(|err| Box::new(err) as HandlerError)
        })
    };
    let width_sub = {
        let renderer = renderer.clone();
        events.width.subscribe(move |event: &ViewportWidthChanged| {
            renderer.borrow_mut().handle_viewport_width_changed(event);
            Ok(())
        })
    };
    let left_sub = {
        let renderer = renderer.clone();
        events.left.subscribe(move |event: &ViewportLeftChanged| {
            renderer.borrow_mut().handle_viewport_left_changed(event);
            Ok(())
        })
    };

    Ok(BandBinding {
        renderer,
        subscriptions: [layout_sub, width_sub, left_sub],
    })
}

#[cfg(test)]
#[path = "renderer_tests.rs"]
mod renderer_tests;
