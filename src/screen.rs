//! The intake screen
//!
//! Wires the form controller, the map controller and the unsaved-changes
//! guard to one presenter, one navigator and one lifecycle. Dropping the
//! screen tears it down.

use crate::backend::CustomerBackend;
use crate::config::MapsConfig;
use crate::error::Result;
use crate::form::{Field, FormModel, IntakeFormController, SubmitOutcome};
use crate::geo::{AddressResolver, Coordinates, DirectionsProvider, Geocoder, PlaceDescriptor};
use crate::guard::{UnloadDecision, UnsavedChangesGuard};
use crate::lifecycle::SubscriptionLifecycle;
use crate::map::{Applied, MapInteractionController, MapSurface};
use crate::ui::{Navigator, Presenter};
use std::sync::Arc;
use tracing::info;

pub struct IntakeScreen<B, G, D, S, P, N> {
    lifecycle: SubscriptionLifecycle,
    form: IntakeFormController<B>,
    map: MapInteractionController<G, D, S>,
    guard: UnsavedChangesGuard,
    presenter: P,
    navigator: N,
}

impl<B, G, D, S, P, N> IntakeScreen<B, G, D, S, P, N>
where
    B: CustomerBackend,
    G: Geocoder,
    D: DirectionsProvider,
    S: MapSurface,
    P: Presenter,
    N: Navigator,
{
    pub fn new(
        backend: B,
        resolver: Arc<AddressResolver<G, D>>,
        surface: S,
        maps: &MapsConfig,
        presenter: P,
        navigator: N,
    ) -> Self {
        let lifecycle = SubscriptionLifecycle::new();
        let form = IntakeFormController::new(backend, lifecycle.clone());
        let map = MapInteractionController::new(
            resolver,
            surface,
            lifecycle.clone(),
            maps.overview(),
            maps.focused_zoom,
        );

        Self {
            lifecycle,
            form,
            map,
            guard: UnsavedChangesGuard,
            presenter,
            navigator,
        }
    }

    /// Prefill with a draft the user is returning to
    pub fn with_form(mut self, form: FormModel) -> Self {
        *self.form.model_mut() = form;
        self
    }

    /// Load document types and set up the map
    pub async fn open(&mut self) -> bool {
        let loaded = self.form.load_document_types(&self.presenter).await;
        self.map.initialize(self.form.model());
        self.form.mark_ready();
        info!(document_types = self.form.document_types().len(), "intake screen opened");
        loaded
    }

    /// Map dialog opened again
    pub fn reopen_map(&mut self) {
        self.map.initialize(self.form.model());
    }

    pub fn edit(&mut self, field: Field, value: &str) -> Result<()> {
        self.form.model_mut().set(field, value)
    }

    pub async fn select_place(&mut self, place: PlaceDescriptor) -> Applied {
        self.map
            .handle_place_selected(place, self.form.model_mut(), &self.presenter)
            .await
    }

    pub async fn click_map(&mut self, at: Coordinates) -> Applied {
        self.map
            .handle_map_click(at, self.form.model_mut(), &self.presenter)
            .await
    }

    pub async fn submit(&mut self) -> SubmitOutcome {
        self.form.submit(&self.presenter, &self.navigator).await
    }

    pub async fn go_back(&mut self) -> bool {
        self.form.go_back(&self.presenter, &self.navigator).await
    }

    /// Window/tab unload
    pub fn on_before_unload(&mut self) -> UnloadDecision {
        self.form.mark_ready();
        self.guard.before_unload(self.form.model())
    }

    /// Route change initiated elsewhere in the app
    pub async fn on_navigate_away(&mut self) -> bool {
        self.form.mark_ready();
        self.guard
            .allow_navigation(self.form.model(), &self.presenter)
            .await
    }

    pub fn form(&self) -> &IntakeFormController<B> {
        &self.form
    }

    pub fn map(&self) -> &MapInteractionController<G, D, S> {
        &self.map
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }
}

impl<B, G, D, S, P, N> IntakeScreen<B, G, D, S, P, N> {
    pub fn lifecycle(&self) -> &SubscriptionLifecycle {
        &self.lifecycle
    }

    /// Release every pending call
    pub fn teardown(&self) {
        if !self.lifecycle.is_released() {
            info!(pending = self.lifecycle.pending(), "intake screen torn down");
            self.lifecycle.release_all();
        }
    }
}

impl<B, G, D, S, P, N> Drop for IntakeScreen<B, G, D, S, P, N> {
    fn drop(&mut self) {
        self.teardown();
    }
}
