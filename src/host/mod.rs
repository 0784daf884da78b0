//! Abstract host capability set consumed by the engine.
//!
//! The engine treats the host editor as three capabilities: a view it can
//! snapshot ([`TextView`]), a decoration surface it can command
//! ([`AdornmentLayer`]), and an event stream it subscribes to
//! ([`events::ViewEvents`]). The host implements these; the engine never
//! reaches past them.

pub mod events;

use crate::model::{Band, BufferOffset, Extent, LineNumber, ViewportSnapshot};

/// Read-only access to the host's view and buffer.
///
/// The engine reads a fresh [`ViewportSnapshot`] on every event rather than
/// caching viewport geometry, and re-derives line numbers from buffer
/// offsets on every refresh pass rather than caching parity state.
pub trait TextView {
    /// Current viewport geometry and background opacity.
    fn viewport(&self) -> ViewportSnapshot;

    /// Map a buffer offset to the 0-based logical line containing it.
    fn line_number_at(&self, offset: BufferOffset) -> LineNumber;
}

/// The host's decoration surface.
///
/// The layer is the source of truth for "currently rendered bands". The
/// engine issues add / remove-all / mutate commands against it and never
/// shadows its contents.
///
/// # Contract
/// - At most one band per extent: `add` with an extent already present
///   replaces the existing band. This is what makes a repeated refresh over
///   identical input observationally idempotent.
/// - `for_each_mut` visits every band exactly once; visit order is
///   unspecified.
pub trait AdornmentLayer {
    /// Host-side failure type for rejected adds. Propagates out of the
    /// engine's handlers unmodified.
    type Error: std::error::Error + 'static;

    /// Register a band against a text extent, replacing any band already
    /// keyed by that extent.
    fn add(&mut self, extent: Extent, band: Band) -> Result<(), Self::Error>;

    /// Remove every band from the layer.
    fn remove_all(&mut self);

    /// Visit every rendered band.
    fn for_each(&self, f: &mut dyn FnMut(&Extent, &Band));

    /// Visit every rendered band with mutable access to its geometry.
    fn for_each_mut(&mut self, f: &mut dyn FnMut(&Extent, &mut Band));

    /// Number of bands currently rendered.
    fn len(&self) -> usize;

    /// Whether the layer holds no bands.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
