//! In-memory reference adornment layer.
//!
//! Hosts with a native decoration surface implement
//! [`AdornmentLayer`](crate::host::AdornmentLayer) over it directly.
//! [`VecLayer`] is for everyone else: a plain in-memory layer keyed by
//! extent, used by the `bandview` demo host and throughout the test suite.

use crate::host::AdornmentLayer;
use crate::model::{Band, Extent};
use std::convert::Infallible;

/// Adornment layer backed by a `Vec`, keyed by extent.
///
/// Re-adding an extent replaces the existing band in place, which is what
/// makes a repeated refresh over identical input idempotent. Iteration
/// visits bands in insertion order; callers must not rely on that order.
#[derive(Debug, Default)]
pub struct VecLayer {
    bands: Vec<(Extent, Band)>,
}

impl VecLayer {
    /// Create an empty layer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the band registered for an extent.
    pub fn band_for(&self, extent: &Extent) -> Option<&Band> {
        self.bands
            .iter()
            .find(|(candidate, _)| candidate == extent)
            .map(|(_, band)| band)
    }

    /// Snapshot the layer contents, for assertions and painting.
    pub fn bands(&self) -> Vec<(Extent, Band)> {
        self.bands.clone()
    }
}

impl AdornmentLayer for VecLayer {
    type Error = Infallible;

    fn add(&mut self, extent: Extent, band: Band) -> Result<(), Self::Error> {
        match self.bands.iter().position(|(existing, _)| *existing == extent) {
            Some(i) => self.bands[i].1 = band,
            None => self.bands.push((extent, band)),
        }
        Ok(())
    }

    fn remove_all(&mut self) {
        self.bands.clear();
    }

    fn for_each(&self, f: &mut dyn FnMut(&Extent, &Band)) {
        for (extent, band) in &self.bands {
            f(extent, band);
        }
    }

    fn for_each_mut(&mut self, f: &mut dyn FnMut(&Extent, &mut Band)) {
        for (extent, band) in &mut self.bands {
            f(extent, band);
        }
    }

    fn len(&self) -> usize {
        self.bands.len()
    }
}
