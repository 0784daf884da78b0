//! The shared fill brush.
//!
//! Every band in a renderer's lifetime is filled with one immutable brush,
//! computed exactly once at construction. Upstream adornment code existed in
//! two near-identical variants differing only in where the alpha came from
//! (a hardcoded constant vs. the view background at construction time);
//! [`OpacitySource`] collapses both into one explicit configuration knob.
//!
//! Note the fixed-at-construction assumption: even with
//! [`OpacitySource::FromViewport`], the opacity is sampled once and never
//! recomputed when the host background later changes. Live tracking would
//! need a background-change event the engine does not subscribe to.

use crate::model::ViewportSnapshot;
use serde::Deserialize;

/// Default alpha applied when no opacity is configured.
pub const DEFAULT_OPACITY: u8 = 160;

/// Default band tint (a pale mint).
pub const DEFAULT_TINT: Rgb = Rgb {
    r: 194,
    g: 252,
    b: 233,
};

/// An opaque RGB tint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Create a tint from raw channels.
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl Default for Rgb {
    fn default() -> Self {
        DEFAULT_TINT
    }
}

/// Where the brush alpha comes from at renderer construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpacitySource {
    /// A fixed alpha value.
    Fixed(u8),
    /// Sample the view background's alpha once, at construction.
    #[default]
    FromViewport,
}

impl OpacitySource {
    /// Resolve the alpha against a viewport snapshot.
    pub fn resolve(&self, viewport: &ViewportSnapshot) -> u8 {
        match self {
            OpacitySource::Fixed(alpha) => *alpha,
            OpacitySource::FromViewport => viewport.background_opacity,
        }
    }
}

/// Style inputs to brush construction: a tint plus an opacity source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BandStyle {
    /// Band tint.
    pub tint: Rgb,
    /// Where the alpha comes from.
    pub opacity: OpacitySource,
}

impl BandStyle {
    /// Resolve the style into an immutable brush against a viewport
    /// snapshot. Called once, at renderer construction.
    pub fn resolve(&self, viewport: &ViewportSnapshot) -> Brush {
        Brush::new(self.tint, self.opacity.resolve(viewport))
    }
}

/// Immutable RGBA fill shared by all bands of one renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Brush {
    tint: Rgb,
    alpha: u8,
}

impl Brush {
    /// Create a brush from a tint and resolved alpha.
    pub fn new(tint: Rgb, alpha: u8) -> Self {
        Self { tint, alpha }
    }

    /// The brush tint.
    pub fn tint(&self) -> Rgb {
        self.tint
    }

    /// The resolved alpha.
    pub fn alpha(&self) -> u8 {
        self.alpha
    }

    /// Composite the brush over an opaque base color.
    ///
    /// Hosts with no native alpha support (terminals) use this to collapse
    /// the RGBA fill into an opaque color per band.
    pub fn over(&self, base: Rgb) -> Rgb {
        let blend = |fg: u8, bg: u8| {
            let alpha = self.alpha as u32;
            (((fg as u32 * alpha) + (bg as u32 * (255 - alpha))) / 255) as u8
        };
        Rgb {
            r: blend(self.tint.r, base.r),
            g: blend(self.tint.g, base.g),
            b: blend(self.tint.b, base.b),
        }
    }
}
