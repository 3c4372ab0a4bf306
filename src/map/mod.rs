//! Map interaction
//!
//! Owns the viewport, the single selected-location marker and the
//! resolution pipeline for place selections and map clicks.
//!
//! Every trigger gets a sequence number. Issuing a trigger cancels the one
//! still in flight, and a completion is only applied if its number is the
//! latest issued. The most recently issued trigger therefore wins no matter
//! in which order provider calls come back.
//!
//! A trigger is split into three steps so several can be outstanding at
//! once: [`MapInteractionController::place_selected`] or
//! [`MapInteractionController::map_clicked`] issue it,
//! [`PendingResolution::run`] performs the provider calls without borrowing
//! the controller, and [`MapInteractionController::finish`] applies the
//! outcome.

pub mod surface;

use crate::constants::geo::MARKER_TITLE;
use crate::error::ResolveError;
use crate::form::FormModel;
use crate::geo::{
    AddressResolver, Coordinates, DirectionsProvider, Geocoder, PlaceDescriptor, ResolvedLocation,
};
use crate::lifecycle::SubscriptionLifecycle;
use crate::ui::{Notice, Presenter};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub use surface::{HeadlessSurface, MapSurface, MarkerId, SelectedMarker, Viewport};

/// Controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapState {
    Uninitialized,
    Ready,
    Resolving { request: u64 },
}

/// What started a resolution
#[derive(Debug, Clone, PartialEq)]
pub enum Trigger {
    PlaceSelected(PlaceDescriptor),
    MapClicked(Coordinates),
}

/// An issued resolution, ready to run
#[derive(Debug)]
pub struct PendingResolution<G, D> {
    request: u64,
    trigger: Trigger,
    resolver: Arc<AddressResolver<G, D>>,
    cancel: CancellationToken,
    lifecycle: SubscriptionLifecycle,
}

/// Result of a run, tagged with its sequence number
#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionOutcome {
    pub request: u64,
    pub result: Result<ResolvedLocation, ResolveError>,
}

/// What [`MapInteractionController::finish`] did with an outcome
#[derive(Debug, Clone, PartialEq)]
pub enum Applied {
    /// Marker replaced and draft patched
    Accepted(ResolvedLocation),
    /// Shown to the user; draft and marker untouched
    Failed(ResolveError),
    /// Superseded or cancelled; dropped silently
    Discarded,
}

impl<G, D> PendingResolution<G, D>
where
    G: Geocoder,
    D: DirectionsProvider,
{
    pub fn request(&self) -> u64 {
        self.request
    }

    pub fn trigger(&self) -> &Trigger {
        &self.trigger
    }

    /// Perform the provider calls
    pub async fn run(self) -> ResolutionOutcome {
        let resolver = &self.resolver;
        let cancel = &self.cancel;
        let resolution = async {
            match &self.trigger {
                Trigger::PlaceSelected(place) => resolver.resolve_from_selection(place, cancel).await,
                Trigger::MapClicked(at) => resolver.resolve_from_coordinate(*at, cancel).await,
            }
        };

        let result = self
            .lifecycle
            .track(resolution)
            .await
            .unwrap_or(Err(ResolveError::Cancelled));

        ResolutionOutcome {
            request: self.request,
            result,
        }
    }
}

/// Map state machine
#[derive(Debug)]
pub struct MapInteractionController<G, D, S> {
    resolver: Arc<AddressResolver<G, D>>,
    surface: S,
    lifecycle: SubscriptionLifecycle,
    overview: Viewport,
    focused_zoom: u8,
    state: MapState,
    marker: Option<SelectedMarker>,
    latest_request: u64,
    in_flight: Option<CancellationToken>,
}

impl<G, D, S> MapInteractionController<G, D, S>
where
    G: Geocoder,
    D: DirectionsProvider,
    S: MapSurface,
{
    pub fn new(
        resolver: Arc<AddressResolver<G, D>>,
        surface: S,
        lifecycle: SubscriptionLifecycle,
        overview: Viewport,
        focused_zoom: u8,
    ) -> Self {
        Self {
            resolver,
            surface,
            lifecycle,
            overview,
            focused_zoom,
            state: MapState::Uninitialized,
            marker: None,
            latest_request: 0,
            in_flight: None,
        }
    }

    pub fn state(&self) -> MapState {
        self.state
    }

    pub fn marker(&self) -> Option<&SelectedMarker> {
        self.marker.as_ref()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Set up the viewport for the current draft
    ///
    /// A draft that already has a location is shown up close with its
    /// marker, without resolving anything. Otherwise the overview is shown
    /// with no marker. Calling this again (map reopened) starts over.
    pub fn initialize(&mut self, form: &FormModel) {
        self.cancel_in_flight();
        if let Some(old) = self.marker.take() {
            self.surface.detach_marker(old.id);
        }

        match form.draft().location {
            Some(location) => {
                self.surface.set_viewport(Viewport {
                    center: location,
                    zoom: self.focused_zoom,
                });
                self.place_marker(location);
            }
            None => self.surface.set_viewport(self.overview),
        }

        self.state = MapState::Ready;
        debug!(has_marker = self.marker.is_some(), "map initialized");
    }

    /// Issue a resolution for an autocomplete selection
    pub fn place_selected(&mut self, place: PlaceDescriptor) -> PendingResolution<G, D> {
        self.issue(Trigger::PlaceSelected(place))
    }

    /// Issue a resolution for a click on the map
    pub fn map_clicked(&mut self, at: Coordinates) -> PendingResolution<G, D> {
        self.issue(Trigger::MapClicked(at))
    }

    fn issue(&mut self, trigger: Trigger) -> PendingResolution<G, D> {
        self.cancel_in_flight();

        self.latest_request += 1;
        let request = self.latest_request;
        let cancel = self.lifecycle.child_token();
        self.in_flight = Some(cancel.clone());
        self.state = MapState::Resolving { request };
        debug!(request, ?trigger, "resolution issued");

        PendingResolution {
            request,
            trigger,
            resolver: self.resolver.clone(),
            cancel,
            lifecycle: self.lifecycle.clone(),
        }
    }

    fn cancel_in_flight(&mut self) {
        if let Some(token) = self.in_flight.take() {
            token.cancel();
        }
    }

    /// Apply an outcome
    ///
    /// Only the latest issued request is applied. Failures leave the marker
    /// and the draft as they were and surface an error.
    pub fn finish<P: Presenter>(
        &mut self,
        outcome: ResolutionOutcome,
        form: &mut FormModel,
        presenter: &P,
    ) -> Applied {
        if outcome.request != self.latest_request {
            debug!(
                request = outcome.request,
                latest = self.latest_request,
                "discarding superseded resolution"
            );
            return Applied::Discarded;
        }

        self.in_flight = None;
        self.state = MapState::Ready;

        match outcome.result {
            Ok(resolved) => {
                self.place_marker(resolved.coordinates);
                form.patch_location(&resolved);
                info!(
                    request = outcome.request,
                    address = %resolved.formatted_address,
                    location = %resolved.coordinates,
                    "location resolved"
                );
                Applied::Accepted(resolved)
            }
            Err(ResolveError::Cancelled) => Applied::Discarded,
            Err(err) => {
                warn!(request = outcome.request, error = %err, "resolution failed");
                presenter.show_error(&Notice::address_unresolved());
                Applied::Failed(err)
            }
        }
    }

    /// Issue, run and apply a map click in one go
    pub async fn handle_map_click<P: Presenter>(
        &mut self,
        at: Coordinates,
        form: &mut FormModel,
        presenter: &P,
    ) -> Applied {
        let pending = self.map_clicked(at);
        let outcome = pending.run().await;
        self.finish(outcome, form, presenter)
    }

    /// Issue, run and apply a place selection in one go
    pub async fn handle_place_selected<P: Presenter>(
        &mut self,
        place: PlaceDescriptor,
        form: &mut FormModel,
        presenter: &P,
    ) -> Applied {
        let pending = self.place_selected(place);
        let outcome = pending.run().await;
        self.finish(outcome, form, presenter)
    }

    /// Detach the old marker before attaching the new one
    fn place_marker(&mut self, position: Coordinates) {
        if let Some(old) = self.marker.take() {
            self.surface.detach_marker(old.id);
        }
        let id = self.surface.attach_marker(position, MARKER_TITLE);
        self.marker = Some(SelectedMarker { id, position });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{CustomerDraft, Field};
    use crate::testing::{
        geocode_hit, geocode_status, route_status, route_to, RecordingPresenter,
        ScriptedDirections, ScriptedGeocoder,
    };
    use std::time::Duration;
    use tokio::sync::Notify;

    type Controller =
        MapInteractionController<Arc<ScriptedGeocoder>, Arc<ScriptedDirections>, HeadlessSurface>;

    const OVERVIEW: Viewport = Viewport {
        center: Coordinates { lat: 6.25670, lng: -75.57496 },
        zoom: 11,
    };

    fn controller(
        geocoder: ScriptedGeocoder,
        directions: ScriptedDirections,
    ) -> (Controller, Arc<ScriptedGeocoder>, Arc<ScriptedDirections>) {
        let geocoder = Arc::new(geocoder);
        let directions = Arc::new(directions);
        let resolver = Arc::new(AddressResolver::new(
            geocoder.clone(),
            directions.clone(),
            Coordinates::new(6.29051, -75.57353),
            Duration::from_secs(5),
        ));
        let controller = MapInteractionController::new(
            resolver,
            HeadlessSurface::new(),
            SubscriptionLifecycle::new(),
            OVERVIEW,
            15,
        );
        (controller, geocoder, directions)
    }

    #[test]
    fn test_initialize_without_location_shows_overview() {
        let (mut map, _, _) = controller(ScriptedGeocoder::default(), ScriptedDirections::default());
        assert_eq!(map.state(), MapState::Uninitialized);

        map.initialize(&FormModel::new());

        assert_eq!(map.state(), MapState::Ready);
        assert_eq!(map.surface().viewport(), Some(OVERVIEW));
        assert!(map.marker().is_none());
        assert!(map.surface().live_markers().is_empty());
    }

    #[test]
    fn test_initialize_with_location_focuses_and_marks_without_resolving() {
        let (mut map, geocoder, directions) =
            controller(ScriptedGeocoder::default(), ScriptedDirections::default());
        let location = Coordinates::new(6.3001, -75.57);
        let form = FormModel::from_draft(CustomerDraft {
            address: "Calle 10 #5-20, Medellín".to_string(),
            location: Some(location),
            ..CustomerDraft::default()
        });

        map.initialize(&form);

        assert_eq!(
            map.surface().viewport(),
            Some(Viewport { center: location, zoom: 15 })
        );
        assert_eq!(map.marker().map(|m| m.position), Some(location));
        assert!(geocoder.calls().is_empty());
        assert!(directions.requests().is_empty());
    }

    #[test]
    fn test_reinitialize_keeps_single_marker() {
        let (mut map, _, _) = controller(ScriptedGeocoder::default(), ScriptedDirections::default());
        let form = FormModel::from_draft(CustomerDraft {
            location: Some(Coordinates::new(6.3, -75.57)),
            ..CustomerDraft::default()
        });

        map.initialize(&form);
        map.initialize(&form);
        assert_eq!(map.surface().live_markers().len(), 1);
    }

    #[tokio::test]
    async fn test_place_selection_patches_leg_endpoint() {
        let anchor = Coordinates::new(6.2999, -75.5698);
        let endpoint = Coordinates::new(6.3001, -75.5700);
        let (mut map, _, _) = controller(
            ScriptedGeocoder::default(),
            ScriptedDirections::default().on(anchor, route_to(endpoint)),
        );
        let presenter = RecordingPresenter::default();
        let mut form = FormModel::new();
        form.set(Field::DocumentNumber, "1234567").unwrap();
        form.set(Field::Phone, "3001234567").unwrap();
        form.set(Field::Email, "ana@example.com").unwrap();
        map.initialize(&form);

        let applied = map
            .handle_place_selected(
                PlaceDescriptor::new("Calle 10 #5-20, Medellín", anchor),
                &mut form,
                &presenter,
            )
            .await;

        assert!(matches!(applied, Applied::Accepted(_)));
        assert_eq!(form.draft().location, Some(endpoint));
        assert_eq!(form.draft().address, "Calle 10 #5-20, Medellín");
        assert_eq!(map.surface().live_markers(), vec![endpoint]);
        assert_eq!(map.state(), MapState::Ready);
        assert!(presenter.errors().is_empty());
    }

    #[tokio::test]
    async fn test_map_click_geocode_failure_leaves_everything() {
        let click = Coordinates::new(6.31, -75.58);
        let (mut map, _, directions) = controller(
            ScriptedGeocoder::default().on(click, geocode_status("ZERO_RESULTS")),
            ScriptedDirections::default(),
        );
        let presenter = RecordingPresenter::default();
        let mut form = FormModel::new();
        map.initialize(&form);

        let applied = map.handle_map_click(click, &mut form, &presenter).await;

        assert!(matches!(applied, Applied::Failed(ResolveError::AddressNotFound(_))));
        assert!(map.marker().is_none());
        assert!(map.surface().live_markers().is_empty());
        assert_eq!(form.draft().location, None);
        assert_eq!(form.draft().address, "");
        assert!(!form.is_dirty());
        assert!(directions.requests().is_empty());
        assert_eq!(presenter.errors(), vec![Notice::address_unresolved()]);
        assert_eq!(map.state(), MapState::Ready);
    }

    #[tokio::test]
    async fn test_route_failure_keeps_previous_location() {
        let first = Coordinates::new(6.30, -75.57);
        let second = Coordinates::new(6.35, -75.60);
        let (mut map, _, _) = controller(
            ScriptedGeocoder::default()
                .on(first, geocode_hit("Primera", first))
                .on(second, geocode_hit("Segunda", second)),
            ScriptedDirections::default()
                .on(first, route_to(first))
                .on(second, route_status("ZERO_RESULTS")),
        );
        let presenter = RecordingPresenter::default();
        let mut form = FormModel::new();
        map.initialize(&form);

        map.handle_map_click(first, &mut form, &presenter).await;
        let applied = map.handle_map_click(second, &mut form, &presenter).await;

        assert!(matches!(applied, Applied::Failed(ResolveError::RouteUnavailable(_))));
        assert_eq!(form.draft().address, "Primera");
        assert_eq!(form.draft().location, Some(first));
        assert_eq!(map.surface().live_markers(), vec![first]);
        assert_eq!(presenter.errors().len(), 1);
    }

    #[tokio::test]
    async fn test_n_resolutions_leave_one_marker_at_last_result() {
        let points: Vec<Coordinates> = (0..5)
            .map(|i| Coordinates::new(6.30 + i as f64 * 0.01, -75.57))
            .collect();
        let mut geocoder = ScriptedGeocoder::default();
        let mut directions = ScriptedDirections::default();
        for (i, p) in points.iter().enumerate() {
            geocoder = geocoder.on(*p, geocode_hit(&format!("Dirección {}", i), *p));
            directions = directions.on(*p, route_to(Coordinates::new(p.lat + 0.0001, p.lng)));
        }
        let (mut map, _, _) = controller(geocoder, directions);
        let presenter = RecordingPresenter::default();
        let mut form = FormModel::new();
        map.initialize(&form);

        for p in &points {
            map.handle_map_click(*p, &mut form, &presenter).await;
            assert_eq!(map.surface().live_markers().len(), 1);
        }

        let last = points[4];
        let expected = Coordinates::new(last.lat + 0.0001, last.lng);
        assert_eq!(map.surface().live_markers(), vec![expected]);
        assert_eq!(form.draft().location, Some(expected));
        assert_eq!(form.draft().address, "Dirección 4");
    }

    #[tokio::test]
    async fn test_newer_click_cancels_older_in_flight() {
        let first = Coordinates::new(6.30, -75.57);
        let second = Coordinates::new(6.31, -75.58);
        let gate = Arc::new(Notify::new());
        let (mut map, geocoder, directions) = controller(
            ScriptedGeocoder::default()
                .on_gated(first, geocode_hit("Primera", first), gate.clone())
                .on(second, geocode_hit("Segunda", second)),
            ScriptedDirections::default()
                .on(first, route_to(first))
                .on(second, route_to(second)),
        );
        let presenter = RecordingPresenter::default();
        let mut form = FormModel::new();
        map.initialize(&form);

        let older = tokio::spawn(map.map_clicked(first).run());
        while geocoder.calls().is_empty() {
            tokio::task::yield_now().await;
        }

        let newer = map.map_clicked(second);
        assert_eq!(map.state(), MapState::Resolving { request: 2 });
        let newer_outcome = newer.run().await;
        // release the older geocode; its run is already cancelled
        gate.notify_one();
        let older_outcome = older.await.unwrap();

        assert_eq!(older_outcome.result, Err(ResolveError::Cancelled));
        assert!(matches!(
            map.finish(newer_outcome, &mut form, &presenter),
            Applied::Accepted(_)
        ));
        assert_eq!(map.finish(older_outcome, &mut form, &presenter), Applied::Discarded);

        assert_eq!(form.draft().location, Some(second));
        assert_eq!(map.surface().live_markers(), vec![second]);
        assert!(presenter.errors().is_empty());
        // the cancelled request never reached the router
        assert!(directions.requests().iter().all(|r| r.destination != first));
    }

    #[tokio::test]
    async fn test_late_stale_success_is_discarded() {
        let first = Coordinates::new(6.30, -75.57);
        let second = Coordinates::new(6.31, -75.58);
        let (mut map, _, _) = controller(
            ScriptedGeocoder::default()
                .on(first, geocode_hit("Primera", first))
                .on(second, geocode_hit("Segunda", second)),
            ScriptedDirections::default()
                .on(first, route_to(first))
                .on(second, route_to(second)),
        );
        let presenter = RecordingPresenter::default();
        let mut form = FormModel::new();
        map.initialize(&form);

        // the first completes successfully but its result is only delivered
        // after the second was issued and applied
        let first_outcome = map.map_clicked(first).run().await;
        assert!(first_outcome.result.is_ok());
        let second_outcome = map.map_clicked(second).run().await;

        map.finish(second_outcome, &mut form, &presenter);
        assert_eq!(map.finish(first_outcome, &mut form, &presenter), Applied::Discarded);

        assert_eq!(form.draft().address, "Segunda");
        assert_eq!(form.draft().location, Some(second));
        assert_eq!(map.surface().live_markers(), vec![second]);
    }

    #[tokio::test]
    async fn test_stale_failure_is_not_shown() {
        let first = Coordinates::new(6.30, -75.57);
        let second = Coordinates::new(6.31, -75.58);
        let (mut map, _, _) = controller(
            ScriptedGeocoder::default()
                .on(first, geocode_status("ZERO_RESULTS"))
                .on(second, geocode_hit("Segunda", second)),
            ScriptedDirections::default().on(second, route_to(second)),
        );
        let presenter = RecordingPresenter::default();
        let mut form = FormModel::new();
        map.initialize(&form);

        let first_outcome = map.map_clicked(first).run().await;
        let second_outcome = map.map_clicked(second).run().await;

        assert_eq!(map.finish(first_outcome, &mut form, &presenter), Applied::Discarded);
        assert!(matches!(
            map.finish(second_outcome, &mut form, &presenter),
            Applied::Accepted(_)
        ));
        assert!(presenter.errors().is_empty());
    }

    #[tokio::test]
    async fn test_released_lifecycle_discards_resolution() {
        let click = Coordinates::new(6.31, -75.58);
        let (mut map, geocoder, _) = controller(
            ScriptedGeocoder::default().on(click, geocode_hit("x", click)),
            ScriptedDirections::default().on(click, route_to(click)),
        );
        let presenter = RecordingPresenter::default();
        let mut form = FormModel::new();
        map.initialize(&form);

        let pending = map.map_clicked(click);
        map.lifecycle.release_all();
        let outcome = pending.run().await;

        assert_eq!(outcome.result, Err(ResolveError::Cancelled));
        assert_eq!(map.finish(outcome, &mut form, &presenter), Applied::Discarded);
        assert!(geocoder.calls().is_empty());
        assert!(presenter.errors().is_empty());
        assert_eq!(form.draft().location, None);
    }
}
