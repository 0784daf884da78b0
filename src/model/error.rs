//! Error types for the decoration engine.
//!
//! The taxonomy is deliberately small. Construction has exactly one failure
//! mode (a missing view handle). Everything downstream of construction is a
//! host-layer concern: adornment-layer failures carry the layer's own error
//! type and propagate out of the handlers unmodified, with no translation or
//! retry — each event is a one-shot recomputation and the next event starts
//! fresh.

use thiserror::Error;

/// Failure to construct or attach a [`LineBandRenderer`].
///
/// Fatal and immediate: when construction fails, no brush is computed, no
/// bands are created, and no event subscriptions are registered.
///
/// [`LineBandRenderer`]: crate::band::LineBandRenderer
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AttachError {
    /// The host supplied no view handle.
    ///
    /// The host's dispatch mechanism hands views around as optional handles;
    /// an absent handle means there is nothing to decorate and nothing to
    /// subscribe to.
    #[error("Cannot attach renderer: view handle is missing")]
    MissingView,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_view_display_names_the_handle() {
        let msg = AttachError::MissingView.to_string();
        assert!(msg.contains("view handle"));
    }
}
