//! View synchronizer: decides when breaks are recomputed, extended or
//! served from cache, and pushes the result to the marker renderer.

pub mod schedule;

pub use schedule::{TaskKey, TaskQueue, SETTLE_DELAY_MS, STRUCTURAL_DEBOUNCE_MS};

use crate::cache::{BreakCache, BreakState, CacheStats, Lookup};
use crate::config::{PageConfiguration, Settings};
use crate::error::BreakError;
use crate::host::{HeightSubscription, Host, MarkerRenderer};
use crate::layout::{BreakParams, BreakSequence};
use crate::render::{BreakMarker, MarkerPatch};
use crate::{ContainerId, ViewId};
use log::{debug, info, warn};
use rustc_hash::{FxHashMap, FxHashSet};

/// Height changes at or below this many pixels are layout jitter
pub const GROWTH_HYSTERESIS_PX: f32 = 4.0;

/// Owns the break cache for every open view and keeps marker layers in step
/// with the host's signals.
///
/// Everything runs on the host's event thread. Time is passed in by the
/// caller, and deferred work only happens inside [`ViewSynchronizer::tick`].
pub struct ViewSynchronizer<H, R> {
    host: H,
    renderer: R,
    settings: Settings,
    /// `None` while the page configuration is invalid
    params: Option<BreakParams>,
    cache: BreakCache,
    subscriptions: FxHashMap<ContainerId, Box<dyn HeightSubscription>>,
    tasks: TaskQueue,
}

impl<H: Host, R: MarkerRenderer> ViewSynchronizer<H, R> {
    pub fn new(host: H, renderer: R, settings: Settings) -> Self {
        let params = resolve_params(&settings.page);
        Self {
            host,
            renderer,
            settings,
            params,
            cache: BreakCache::new(),
            subscriptions: FxHashMap::default(),
            tasks: TaskQueue::new(),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn params(&self) -> Option<BreakParams> {
        self.params
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn tasks(&self) -> &TaskQueue {
        &self.tasks
    }

    pub fn state(&self, container: ContainerId) -> Option<BreakState> {
        self.cache.state(container)
    }

    /// Cached breaks, without triggering computation
    pub fn breaks(&self, container: ContainerId) -> Option<&BreakSequence> {
        self.cache.breaks(container)
    }

    pub fn markers(&self, container: ContainerId) -> Vec<BreakMarker> {
        self.cache
            .breaks(container)
            .map(BreakMarker::for_sequence)
            .unwrap_or_default()
    }

    pub fn is_observed(&self, container: ContainerId) -> bool {
        self.subscriptions.contains_key(&container)
    }

    /// Containers currently tracked
    pub fn containers(&self) -> Vec<ContainerId> {
        let mut containers: Vec<_> = self.cache.containers().collect();
        containers.sort();
        containers
    }

    // --- host signals ---

    /// Layout or mode changed somewhere. Invalidates everything now and
    /// recomputes once the burst of signals settles.
    pub fn on_layout_changed(&mut self, now_ms: u64) {
        self.cache.invalidate_all();
        if self
            .tasks
            .schedule(TaskKey::RefreshAll, now_ms + STRUCTURAL_DEBOUNCE_MS)
        {
            debug!("structural refresh pushed back to {}", now_ms + STRUCTURAL_DEBOUNCE_MS);
        }
    }

    /// A view became active; measure it once the host has laid it out
    pub fn on_active_view_changed(&mut self, view: ViewId, now_ms: u64) {
        self.schedule_settle(view, now_ms);
    }

    pub fn on_document_opened(&mut self, view: ViewId, now_ms: u64) {
        self.schedule_settle(view, now_ms);
    }

    /// Observation callback: a container's content height may have changed.
    ///
    /// Growth beyond the hysteresis threshold extends the cached breaks in
    /// place; a comparable shrink recomputes that container alone.
    pub fn on_height_changed(&mut self, container: ContainerId) {
        let Some(entry) = self.cache.entry(container) else {
            debug!("height change for untracked container {:?}", container);
            return;
        };
        let (state, cached_height) = (entry.state, entry.height);

        let Some(params) = self.params else {
            return;
        };
        let Some(height) = self.host.rendered_height(container) else {
            debug!("container {:?} reported no height", container);
            return;
        };

        if !state.is_fresh() {
            let result = self.update(container).map(|_| ());
            self.report(container, result);
            return;
        }

        let delta = height - cached_height;
        if delta > GROWTH_HYSTERESIS_PX {
            let existing_len = self.cache.breaks(container).map_or(0, BreakSequence::len);
            if let Some(additional) = self.cache.extend(container, height, &params) {
                debug!(
                    "container {:?} grew {} -> {} px, {} new breaks",
                    container,
                    cached_height,
                    height,
                    additional.len()
                );
                let patch = MarkerPatch::append(existing_len, &additional);
                if !patch.is_noop() {
                    self.renderer
                        .apply(container, &patch, &self.settings.markers);
                }
            }
        } else if delta < -GROWTH_HYSTERESIS_PX {
            debug!(
                "container {:?} shrank {} -> {} px, recomputing",
                container, cached_height, height
            );
            self.cache.invalidate(container);
            let result = self.update(container).map(|_| ());
            self.report(container, result);
        }
    }

    /// The view was closed or replaced. Call after the host stopped
    /// reporting it.
    pub fn on_view_closed(&mut self, view: ViewId) {
        self.tasks.cancel(TaskKey::Settle(view));
        self.sweep();
    }

    // --- user actions ---

    /// Persisted settings were saved
    pub fn apply_settings(&mut self, settings: Settings, now_ms: u64) {
        let visibility_changed = settings.markers.visible != self.settings.markers.visible;

        self.params = resolve_params(&settings.page);
        self.settings = settings;
        info!("settings applied, invalidating {} containers", self.cache.len());

        if visibility_changed {
            self.renderer.set_visible(self.settings.markers.visible);
        }
        self.on_layout_changed(now_ms);
    }

    /// Load and apply settings from their persisted JSON form
    pub fn load_settings(&mut self, json: &str, now_ms: u64) -> Result<(), BreakError> {
        let settings = Settings::from_json(json)?;
        self.apply_settings(settings, now_ms);
        Ok(())
    }

    /// Drop every cached sequence and recompute immediately
    pub fn recalibrate(&mut self) {
        info!("recalibrating {} containers", self.cache.len());
        self.tasks.cancel(TaskKey::RefreshAll);
        self.cache.invalidate_all();
        self.refresh_all();
    }

    /// Flip marker visibility. Breaks are untouched.
    pub fn toggle_visibility(&mut self) -> bool {
        let visible = !self.settings.markers.visible;
        self.settings.markers.visible = visible;
        self.renderer.set_visible(visible);
        visible
    }

    // --- scheduling ---

    /// Run every scheduled task due at `now_ms`. Returns how many ran.
    pub fn tick(&mut self, now_ms: u64) -> usize {
        let due = self.tasks.take_due(now_ms);
        for key in &due {
            match *key {
                TaskKey::RefreshAll => self.refresh_all(),
                TaskKey::Settle(view) => self.settle(view),
            }
        }
        due.len()
    }

    fn schedule_settle(&mut self, view: ViewId, now_ms: u64) {
        if self
            .tasks
            .schedule(TaskKey::Settle(view), now_ms + SETTLE_DELAY_MS)
        {
            debug!("settle for view {:?} superseded", view);
        }
    }

    fn settle(&mut self, view: ViewId) {
        // The view may now show a different region than it did when tracked
        self.sweep();
        if !self.host.views().contains(&view) {
            debug!("view {:?} closed before settling", view);
            return;
        }
        if let Err(err) = self.update_view(view).map(|_| ()) {
            self.report_view(err);
        }
    }

    // --- read/update ---

    /// Bring every open view up to date. One view failing never stops the
    /// others.
    pub fn refresh_all(&mut self) {
        self.sweep();

        let mut seen = FxHashSet::default();
        for view in self.host.views() {
            let Some(container) = self.host.content_region(view) else {
                self.report_view(BreakError::MissingTarget(view));
                continue;
            };
            if !seen.insert(container) {
                continue;
            }
            let result = self.update(container).map(|_| ());
            self.report(container, result);
        }
    }

    /// Read/update request for the container behind `view`
    pub fn update_view(&mut self, view: ViewId) -> Result<&BreakSequence, BreakError> {
        let container = self
            .host
            .content_region(view)
            .ok_or(BreakError::MissingTarget(view))?;
        self.update(container)
    }

    /// Read/update request for one container.
    ///
    /// Serves the cached sequence when it is fresh; otherwise runs the full
    /// computation, stores it, then hands a replacement patch to the
    /// renderer.
    pub fn update(&mut self, container: ContainerId) -> Result<&BreakSequence, BreakError> {
        self.track(container);

        let Some(params) = self.params else {
            self.cache.invalidate(container);
            self.renderer
                .apply(container, &MarkerPatch::Clear, &self.settings.markers);
            return Err(match BreakParams::resolve(&self.settings.page) {
                Err(err) => err,
                Ok(_) => BreakError::configuration("page configuration unresolved"),
            });
        };

        let fresh = self.cache.state(container).is_some_and(BreakState::is_fresh);
        let height = if fresh {
            0.0
        } else {
            self.host
                .rendered_height(container)
                .ok_or(BreakError::Unmeasured(container))?
        };

        let lookup = self.cache.get_or_compute(container, height, &params);
        if let Lookup::Computed(breaks) = lookup {
            debug!(
                "container {:?}: {} breaks for {} px",
                container,
                breaks.len(),
                height
            );
            let patch = MarkerPatch::replace(breaks);
            self.renderer
                .apply(container, &patch, &self.settings.markers);
        }

        Ok(lookup.breaks())
    }

    // --- registry ---

    fn track(&mut self, container: ContainerId) {
        if !self.cache.register(container) {
            return;
        }
        info!("tracking container {:?}", container);

        match self.host.observe_height(container) {
            Ok(subscription) => {
                self.subscriptions.insert(container, subscription);
            }
            Err(err) => {
                warn!("{err}; growth of {container:?} will only be seen on structural signals");
            }
        }
    }

    /// Tear down a container: cache entry, subscription and marker layer
    pub fn remove_container(&mut self, container: ContainerId) {
        if self.cache.remove(container).is_none() {
            return;
        }
        if let Some(subscription) = self.subscriptions.remove(&container) {
            subscription.dispose();
        }
        self.renderer.detach(container);
        info!("container {:?} removed", container);
    }

    /// Remove containers no open view shows any more
    fn sweep(&mut self) {
        let live: FxHashSet<ContainerId> = self
            .host
            .views()
            .into_iter()
            .filter_map(|view| self.host.content_region(view))
            .collect();

        let stale: Vec<_> = self
            .cache
            .containers()
            .filter(|c| !live.contains(c))
            .collect();
        for container in stale {
            self.remove_container(container);
        }
    }

    /// Dispose every subscription and forget every container
    pub fn shutdown(&mut self) {
        for container in self.containers() {
            self.remove_container(container);
        }
        self.tasks = TaskQueue::new();
    }

    fn report(&self, container: ContainerId, result: Result<(), BreakError>) {
        match result {
            Ok(()) => {}
            Err(err) if err.is_benign() => debug!("{container:?}: {err}"),
            Err(err) => warn!("{container:?}: {err}; no markers this cycle"),
        }
    }

    fn report_view(&self, err: BreakError) {
        if err.is_benign() {
            debug!("{err}");
        } else {
            warn!("{err}");
        }
    }
}

impl<H, R> Drop for ViewSynchronizer<H, R> {
    fn drop(&mut self) {
        for (_, subscription) in self.subscriptions.drain() {
            subscription.dispose();
        }
    }
}

fn resolve_params(config: &PageConfiguration) -> Option<BreakParams> {
    match BreakParams::resolve(config) {
        Ok(params) => {
            debug!("page height resolved to {} px", params.page_height);
            Some(params)
        }
        Err(err) => {
            warn!("{err}; page breaks disabled until the configuration is fixed");
            None
        }
    }
}
