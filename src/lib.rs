//! Alternating line-band decoration engine (lineband)
//!
//! Keeps a set of tinted rectangles ("bands") behind the odd-numbered lines
//! of an editor viewport in sync with scrolling, resizing, and text edits.
//! The engine is a reactive consumer of host layout events and an imperative
//! producer of decoration commands; it owns no thread and no rendering
//! surface of its own.

pub mod band;
pub mod buffer;
pub mod config;
pub mod host;
pub mod layer;
pub mod logging;
pub mod model;
pub mod view;

pub use band::{attach, BandBinding, LineBandRenderer};
pub use model::{Band, BufferOffset, Extent, LineLayout, LineNumber, ViewportSnapshot};
