//! Core geometry and identity newtypes.

use crate::band::Brush;

/// Absolute character offset from the start of the host's text buffer.
/// 0-indexed. The host's buffer model is the authority on what an offset
/// addresses; the engine only compares and forwards them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct BufferOffset(usize);

impl BufferOffset {
    /// Create a new offset from a raw value.
    pub fn new(offset: usize) -> Self {
        Self(offset)
    }

    /// Get the raw usize value.
    pub fn get(&self) -> usize {
        self.0
    }
}

impl From<usize> for BufferOffset {
    fn from(offset: usize) -> Self {
        Self(offset)
    }
}

/// Logical line index within the buffer. 0-indexed.
///
/// Parity of the line number is the single input to the band-presence
/// decision: odd lines get a band, even lines do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct LineNumber(usize);

impl LineNumber {
    /// Create a new line number from a raw 0-based value.
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Get the raw 0-based index value.
    pub fn get(&self) -> usize {
        self.0
    }

    /// Whether this line is odd-numbered (receives a band).
    pub fn is_odd(&self) -> bool {
        self.0 % 2 == 1
    }
}

impl From<usize> for LineNumber {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

/// A (start, end) buffer-offset range identifying the text a band is
/// anchored to. Extents are the identity key inside the adornment layer:
/// one band per extent.
///
/// # Invariants
/// - `start <= end` (enforced by the constructor in debug builds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Extent {
    /// Start offset (inclusive).
    pub start: BufferOffset,
    /// End offset (exclusive).
    pub end: BufferOffset,
}

impl Extent {
    /// Create a new extent.
    ///
    /// # Panics
    /// In debug builds, panics if `start > end`.
    pub fn new(start: BufferOffset, end: BufferOffset) -> Self {
        debug_assert!(start <= end, "extent start must not exceed end");
        Self { start, end }
    }

    /// Length of the extent in buffer characters.
    pub fn len(&self) -> usize {
        self.end.get() - self.start.get()
    }

    /// Whether the extent covers no characters.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Geometry of one visible line, produced by the host on every layout pass.
///
/// Immutable once produced; superseded wholesale on re-layout. When the host
/// soft-wraps a logical line, each visual segment arrives as its own
/// `LineLayout` with its own top/height, and band parity is keyed on the
/// shared logical line number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineLayout {
    /// Buffer range this visual line covers.
    pub extent: Extent,
    /// Vertical offset of the line's top edge, in host units.
    pub top: f64,
    /// Rendered height of the line, in host units.
    pub height: f64,
}

impl LineLayout {
    /// Create a new line layout.
    pub fn new(extent: Extent, top: f64, height: f64) -> Self {
        Self {
            extent,
            top,
            height,
        }
    }
}

/// Snapshot of the host viewport, read fresh on each event.
///
/// The engine never caches a snapshot across events; the host owns the
/// mutable viewport and this struct is a momentary copy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportSnapshot {
    /// Viewport width, in host units.
    pub width: f64,
    /// Horizontal scroll offset of the viewport's left edge, in host units.
    pub left: f64,
    /// Alpha of the host's background, 0 (transparent) to 255 (opaque).
    /// Sampled only when the brush is configured to derive its opacity
    /// from the viewport, and only at renderer construction.
    pub background_opacity: u8,
}

impl ViewportSnapshot {
    /// Create a new viewport snapshot.
    pub fn new(width: f64, left: f64, background_opacity: u8) -> Self {
        Self {
            width,
            left,
            background_opacity,
        }
    }
}

/// A decoration rectangle behind one odd-numbered line.
///
/// Owned by the adornment layer; the renderer creates bands during refresh
/// passes and mutates their `width`/`left` in place on viewport events.
/// `fill` is shared by every band and never changes after construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    /// Rectangle width, kept equal to the viewport width.
    pub width: f64,
    /// Rectangle height, equal to the line's rendered height.
    pub height: f64,
    /// Horizontal position, kept equal to the viewport left offset.
    pub left: f64,
    /// Vertical position, equal to the line's top.
    pub top: f64,
    /// Shared fill brush.
    pub fill: Brush,
}
