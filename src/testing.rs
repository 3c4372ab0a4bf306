//! Scripted collaborators shared by unit tests

use crate::backend::{CustomerBackend, CustomerPayload, DocumentTypeOption, SubmitResponse};
use crate::error::{Error, Result};
use crate::form::CustomerDraft;
use crate::geo::{
    AutocompleteOptions, Coordinates, DirectionsProvider, DirectionsResponse, GeocodeResponse,
    GeocodeResult, Geocoder, PlaceDescriptor, PlaceSearch, PlaceSuggestion, Route, RouteLeg,
    RouteRequest,
};
use crate::ui::{Confirmation, Navigator, Notice, Presenter};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// A draft that passes the standard rules
pub(crate) fn valid_draft() -> CustomerDraft {
    CustomerDraft {
        document_number: "1234567".to_string(),
        document_type_id: Some(1),
        name: "Ana Restrepo".to_string(),
        phone: "3001234567".to_string(),
        email: "ana.restrepo@example.com.co".to_string(),
        address: "Calle 10 #5-20, Medellín".to_string(),
        address_detail: String::new(),
        location: Some(Coordinates::new(6.3001, -75.57)),
    }
}

pub(crate) fn geocode_hit(address: &str, at: Coordinates) -> GeocodeResponse {
    GeocodeResponse {
        status: "OK".to_string(),
        results: vec![GeocodeResult {
            formatted_address: address.to_string(),
            location: at,
        }],
    }
}

pub(crate) fn geocode_status(status: &str) -> GeocodeResponse {
    GeocodeResponse {
        status: status.to_string(),
        results: Vec::new(),
    }
}

pub(crate) fn route_to(end: Coordinates) -> DirectionsResponse {
    DirectionsResponse {
        status: "OK".to_string(),
        routes: vec![Route {
            legs: vec![RouteLeg {
                start_location: Coordinates::new(6.29051, -75.57353),
                end_location: end,
            }],
        }],
    }
}

pub(crate) fn route_status(status: &str) -> DirectionsResponse {
    DirectionsResponse {
        status: status.to_string(),
        routes: Vec::new(),
    }
}

/// One scripted answer, optionally held back until its gate is notified
struct Step<T> {
    key: Coordinates,
    answer: std::result::Result<T, String>,
    gate: Option<Arc<Notify>>,
}

async fn play<T: Clone>(steps: &Mutex<Vec<Step<T>>>, key: Coordinates, fallback: T) -> Result<T> {
    let (answer, gate) = {
        let steps = steps.lock().unwrap();
        match steps.iter().find(|s| s.key == key) {
            Some(step) => (step.answer.clone(), step.gate.clone()),
            None => (Ok(fallback), None),
        }
    };
    if let Some(gate) = gate {
        gate.notified().await;
    }
    answer.map_err(Error::Geo)
}

#[derive(Default)]
pub(crate) struct ScriptedGeocoder {
    steps: Mutex<Vec<Step<GeocodeResponse>>>,
    calls: Mutex<Vec<Coordinates>>,
}

impl ScriptedGeocoder {
    pub fn on(self, at: Coordinates, response: GeocodeResponse) -> Self {
        self.push(at, Ok(response), None)
    }

    pub fn on_gated(self, at: Coordinates, response: GeocodeResponse, gate: Arc<Notify>) -> Self {
        self.push(at, Ok(response), Some(gate))
    }

    pub fn failing(self, at: Coordinates, message: &str) -> Self {
        self.push(at, Err(message.to_string()), None)
    }

    fn push(
        self,
        key: Coordinates,
        answer: std::result::Result<GeocodeResponse, String>,
        gate: Option<Arc<Notify>>,
    ) -> Self {
        self.steps.lock().unwrap().push(Step { key, answer, gate });
        self
    }

    pub fn calls(&self) -> Vec<Coordinates> {
        self.calls.lock().unwrap().clone()
    }
}

impl Geocoder for ScriptedGeocoder {
    async fn reverse_geocode(&self, at: Coordinates) -> Result<GeocodeResponse> {
        self.calls.lock().unwrap().push(at);
        play(&self.steps, at, geocode_status("ZERO_RESULTS")).await
    }
}

/// Directions keyed by destination
#[derive(Default)]
pub(crate) struct ScriptedDirections {
    steps: Mutex<Vec<Step<DirectionsResponse>>>,
    requests: Mutex<Vec<RouteRequest>>,
}

impl ScriptedDirections {
    pub fn on(self, destination: Coordinates, response: DirectionsResponse) -> Self {
        self.push(destination, Ok(response), None)
    }

    pub fn on_gated(
        self,
        destination: Coordinates,
        response: DirectionsResponse,
        gate: Arc<Notify>,
    ) -> Self {
        self.push(destination, Ok(response), Some(gate))
    }

    pub fn failing(self, destination: Coordinates, message: &str) -> Self {
        self.push(destination, Err(message.to_string()), None)
    }

    fn push(
        self,
        key: Coordinates,
        answer: std::result::Result<DirectionsResponse, String>,
        gate: Option<Arc<Notify>>,
    ) -> Self {
        self.steps.lock().unwrap().push(Step { key, answer, gate });
        self
    }

    pub fn requests(&self) -> Vec<RouteRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl DirectionsProvider for ScriptedDirections {
    async fn route(&self, request: RouteRequest) -> Result<DirectionsResponse> {
        self.requests.lock().unwrap().push(request);
        play(&self.steps, request.destination, route_status("NOT_FOUND")).await
    }
}

/// Place search with fixed suggestions and details
#[derive(Default)]
pub(crate) struct ScriptedPlaces {
    pub suggestions: Vec<PlaceSuggestion>,
    pub details: Vec<(String, PlaceDescriptor)>,
    pub queries: Mutex<Vec<(String, AutocompleteOptions)>>,
}

impl PlaceSearch for ScriptedPlaces {
    async fn autocomplete(
        &self,
        input: &str,
        options: &AutocompleteOptions,
    ) -> Result<Vec<PlaceSuggestion>> {
        self.queries
            .lock()
            .unwrap()
            .push((input.to_string(), options.clone()));
        Ok(self.suggestions.clone())
    }

    async fn place_details(&self, place_id: &str) -> Result<Option<PlaceDescriptor>> {
        Ok(self
            .details
            .iter()
            .find(|(id, _)| id == place_id)
            .map(|(_, place)| place.clone()))
    }
}

/// Presenter that records everything and answers confirmations from a queue
///
/// An empty queue confirms.
#[derive(Default)]
pub(crate) struct RecordingPresenter {
    answers: Mutex<VecDeque<bool>>,
    pub confirmations: Mutex<Vec<Confirmation>>,
    pub errors: Mutex<Vec<Notice>>,
    pub toasts: Mutex<Vec<Notice>>,
}

impl RecordingPresenter {
    pub fn answering(answers: &[bool]) -> Self {
        Self {
            answers: Mutex::new(answers.iter().copied().collect()),
            ..Self::default()
        }
    }

    pub fn errors(&self) -> Vec<Notice> {
        self.errors.lock().unwrap().clone()
    }

    pub fn toasts(&self) -> Vec<Notice> {
        self.toasts.lock().unwrap().clone()
    }

    pub fn confirmations(&self) -> Vec<Confirmation> {
        self.confirmations.lock().unwrap().clone()
    }
}

impl Presenter for RecordingPresenter {
    async fn confirm(&self, prompt: &Confirmation) -> bool {
        self.confirmations.lock().unwrap().push(prompt.clone());
        self.answers.lock().unwrap().pop_front().unwrap_or(true)
    }

    fn show_error(&self, notice: &Notice) {
        self.errors.lock().unwrap().push(notice.clone());
    }

    fn show_success_toast(&self, notice: &Notice) {
        self.toasts.lock().unwrap().push(notice.clone());
    }
}

#[derive(Default)]
pub(crate) struct RecordingNavigator {
    pub routes: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn routes(&self) -> Vec<String> {
        self.routes.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: &str) {
        self.routes.lock().unwrap().push(route.to_string());
    }
}

/// Backend answering from a script; `Err` strings are transport failures
pub(crate) struct ScriptedBackend {
    document_types: std::result::Result<Vec<DocumentTypeOption>, String>,
    document_types_gate: Option<Arc<Notify>>,
    submit_gate: Option<Arc<Notify>>,
    submit_answers: Mutex<VecDeque<std::result::Result<SubmitResponse, String>>>,
    pub submitted: Mutex<Vec<CustomerPayload>>,
}

impl Default for ScriptedBackend {
    fn default() -> Self {
        Self {
            document_types: Ok(vec![
                DocumentTypeOption {
                    id: 1,
                    label: "Cédula de ciudadanía".to_string(),
                },
                DocumentTypeOption {
                    id: 2,
                    label: "NIT".to_string(),
                },
            ]),
            document_types_gate: None,
            submit_gate: None,
            submit_answers: Mutex::new(VecDeque::new()),
            submitted: Mutex::new(Vec::new()),
        }
    }
}

impl ScriptedBackend {
    pub fn answering(answers: Vec<std::result::Result<SubmitResponse, String>>) -> Self {
        Self {
            submit_answers: Mutex::new(answers.into()),
            ..Self::default()
        }
    }

    pub fn with_document_types_gate(mut self, gate: Arc<Notify>) -> Self {
        self.document_types_gate = Some(gate);
        self
    }

    /// Hold every submission until `gate` is notified
    pub fn with_submit_gate(mut self, gate: Arc<Notify>) -> Self {
        self.submit_gate = Some(gate);
        self
    }

    pub fn with_document_types_error(mut self, message: &str) -> Self {
        self.document_types = Err(message.to_string());
        self
    }

    pub fn submitted(&self) -> Vec<CustomerPayload> {
        self.submitted.lock().unwrap().clone()
    }
}

impl CustomerBackend for ScriptedBackend {
    async fn document_types(&self) -> Result<Vec<DocumentTypeOption>> {
        if let Some(gate) = &self.document_types_gate {
            gate.notified().await;
        }
        self.document_types.clone().map_err(Error::Backend)
    }

    async fn create_customer(&self, payload: &CustomerPayload) -> Result<SubmitResponse> {
        self.submitted.lock().unwrap().push(payload.clone());
        if let Some(gate) = &self.submit_gate {
            gate.notified().await;
        }
        self.submit_answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(SubmitResponse::ok()))
            .map_err(Error::Backend)
    }
}
