//! Collaborator contracts with the embedding editor

mod mirrored;

pub use mirrored::MirroredHost;

use crate::config::MarkerStyle;
use crate::error::BreakError;
use crate::render::MarkerPatch;
use crate::{ContainerId, ViewId};

/// Live height observation on one container. Dropping the box without
/// calling [`HeightSubscription::dispose`] leaks the host-side observer.
pub trait HeightSubscription {
    fn dispose(self: Box<Self>);
}

/// The document editing environment
pub trait Host {
    /// Currently open document views
    fn views(&self) -> Vec<ViewId>;

    /// Primary scrollable content region of a view, if it has one right now
    fn content_region(&self, view: ViewId) -> Option<ContainerId>;

    /// Current rendered (scroll) height of a container in pixels
    fn rendered_height(&self, container: ContainerId) -> Option<f32>;

    /// Start delivering "content height may have changed" signals for a
    /// container
    fn observe_height(
        &mut self,
        container: ContainerId,
    ) -> Result<Box<dyn HeightSubscription>, BreakError>;
}

/// Materializes markers on screen
pub trait MarkerRenderer {
    /// Apply a patch to a container's marker layer. Offsets are relative to
    /// the container's top edge and increase monotonically.
    fn apply(&mut self, container: ContainerId, patch: &MarkerPatch, style: &MarkerStyle);

    /// Show or hide every marker layer
    fn set_visible(&mut self, visible: bool);

    /// Tear down a container's marker layer
    fn detach(&mut self, container: ContainerId);
}
