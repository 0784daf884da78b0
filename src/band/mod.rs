//! The band engine: shared fill brush and the line-band renderer.

pub mod brush;
pub mod renderer;

pub use brush::{BandStyle, Brush, OpacitySource, Rgb};
pub use renderer::{attach, BandBinding, LineBandRenderer};
