//! Host whose view state is pushed in by the embedding layer

use crate::error::BreakError;
use crate::host::{HeightSubscription, Host};
use crate::{ContainerId, ViewId};
use rustc_hash::{FxHashMap, FxHashSet};
use std::cell::RefCell;
use std::rc::Rc;

type ObservedSet = Rc<RefCell<FxHashSet<ContainerId>>>;

/// Mirror of the editor's view state.
///
/// The embedding layer reports views, content regions and heights as they
/// change; the synchronizer reads them back through [`Host`].
#[derive(Debug, Default)]
pub struct MirroredHost {
    views: FxHashMap<ViewId, Option<ContainerId>>,
    heights: FxHashMap<ContainerId, f32>,
    observed: ObservedSet,
    unobservable: FxHashSet<ContainerId>,
}

impl MirroredHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a view and its content region (`None` while it has none)
    pub fn set_view(&mut self, view: ViewId, container: Option<ContainerId>) {
        self.views.insert(view, container);
    }

    /// Forget a view. Returns the container it was showing.
    pub fn close_view(&mut self, view: ViewId) -> Option<ContainerId> {
        let container = self.views.remove(&view).flatten()?;
        let still_shown = self.views.values().any(|c| *c == Some(container));
        if !still_shown {
            self.heights.remove(&container);
        }
        Some(container)
    }

    pub fn set_height(&mut self, container: ContainerId, height: f32) {
        self.heights.insert(container, height);
    }

    /// Make height observation fail for a container
    pub fn set_unobservable(&mut self, container: ContainerId) {
        self.unobservable.insert(container);
    }

    pub fn is_observed(&self, container: ContainerId) -> bool {
        self.observed.borrow().contains(&container)
    }
}

impl Host for MirroredHost {
    fn views(&self) -> Vec<ViewId> {
        let mut views: Vec<_> = self.views.keys().copied().collect();
        views.sort();
        views
    }

    fn content_region(&self, view: ViewId) -> Option<ContainerId> {
        self.views.get(&view).copied().flatten()
    }

    fn rendered_height(&self, container: ContainerId) -> Option<f32> {
        self.heights.get(&container).copied()
    }

    fn observe_height(
        &mut self,
        container: ContainerId,
    ) -> Result<Box<dyn HeightSubscription>, BreakError> {
        if self.unobservable.contains(&container) {
            return Err(BreakError::ObservationFailure {
                container,
                reason: "resize observation unavailable".to_string(),
            });
        }

        self.observed.borrow_mut().insert(container);
        Ok(Box::new(MirroredSubscription {
            container,
            observed: Rc::clone(&self.observed),
        }))
    }
}

struct MirroredSubscription {
    container: ContainerId,
    observed: ObservedSet,
}

impl HeightSubscription for MirroredSubscription {
    fn dispose(self: Box<Self>) {
        self.observed.borrow_mut().remove(&self.container);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_views_and_regions() {
        let mut host = MirroredHost::new();
        host.set_view(ViewId(2), Some(ContainerId(20)));
        host.set_view(ViewId(1), None);

        assert_eq!(host.views(), vec![ViewId(1), ViewId(2)]);
        assert_eq!(host.content_region(ViewId(1)), None);
        assert_eq!(host.content_region(ViewId(2)), Some(ContainerId(20)));
    }

    #[test]
    fn test_close_view_keeps_shared_height() {
        let mut host = MirroredHost::new();
        host.set_view(ViewId(1), Some(ContainerId(10)));
        host.set_view(ViewId(2), Some(ContainerId(10)));
        host.set_height(ContainerId(10), 1200.0);

        assert_eq!(host.close_view(ViewId(1)), Some(ContainerId(10)));
        assert_eq!(host.rendered_height(ContainerId(10)), Some(1200.0));

        assert_eq!(host.close_view(ViewId(2)), Some(ContainerId(10)));
        assert_eq!(host.rendered_height(ContainerId(10)), None);
        assert_eq!(host.close_view(ViewId(3)), None);
    }

    #[test]
    fn test_subscription_dispose() {
        let mut host = MirroredHost::new();
        let sub = host.observe_height(ContainerId(1)).unwrap();
        assert!(host.is_observed(ContainerId(1)));
        sub.dispose();
        assert!(!host.is_observed(ContainerId(1)));
    }

    #[test]
    fn test_unobservable_container() {
        let mut host = MirroredHost::new();
        host.set_unobservable(ContainerId(1));
        assert!(matches!(
            host.observe_height(ContainerId(1)),
            Err(BreakError::ObservationFailure { .. })
        ));
        assert!(!host.is_observed(ContainerId(1)));
    }
}
