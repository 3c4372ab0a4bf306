//! Submission flow
//!
//! `Editing -> ConfirmPending -> Submitting -> Editing`, with the outcome of
//! each pass reported as a [`SubmitOutcome`]. Backend calls run through the
//! screen's [`SubscriptionLifecycle`].
//!
//! The loading indicator and the submission state are published on a watch
//! channel, so a view can follow them while a submit is awaiting the backend.

use crate::backend::{CustomerBackend, CustomerPayload, DocumentTypeOption};
use crate::constants::routes::CUSTOMER_LIST;
use crate::form::validation::{FieldError, StandardRules, ValidationRules};
use crate::form::FormModel;
use crate::guard::UnsavedChangesGuard;
use crate::lifecycle::SubscriptionLifecycle;
use crate::ui::{Confirmation, Navigator, Notice, Presenter};
use tokio::sync::watch;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    Editing,
    ConfirmPending,
    Submitting,
}

/// What a view renders from the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormStatus {
    pub loading: bool,
    pub state: SubmissionState,
}

/// How a submission attempt ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Rules failed; nothing was asked or sent
    NotOffered(Vec<FieldError>),
    /// User declined the confirmation
    Declined,
    /// Backend accepted; draft reset and screen left
    Created,
    /// Backend answered with a non-ok status and this message
    Rejected(String),
    /// Backend could not be reached
    TransportFailed,
    /// Screen torn down while the call was pending
    Released,
}

/// Owns the draft and drives it against the backend
#[derive(Debug)]
pub struct IntakeFormController<B, R = StandardRules> {
    backend: B,
    rules: R,
    lifecycle: SubscriptionLifecycle,
    form: FormModel,
    document_types: Vec<DocumentTypeOption>,
    status: watch::Sender<FormStatus>,
}

impl<B: CustomerBackend> IntakeFormController<B> {
    /// Controller using the standard field rules
    pub fn new(backend: B, lifecycle: SubscriptionLifecycle) -> Self {
        Self::with_rules(backend, StandardRules, lifecycle)
    }
}

impl<B, R> IntakeFormController<B, R>
where
    B: CustomerBackend,
    R: ValidationRules,
{
    pub fn with_rules(backend: B, rules: R, lifecycle: SubscriptionLifecycle) -> Self {
        Self {
            backend,
            rules,
            lifecycle,
            form: FormModel::new(),
            document_types: Vec::new(),
            status: watch::Sender::new(FormStatus {
                loading: true,
                state: SubmissionState::Editing,
            }),
        }
    }

    /// Start from an existing draft instead of an empty one
    pub fn with_form(mut self, form: FormModel) -> Self {
        self.form = form;
        self
    }

    pub fn model(&self) -> &FormModel {
        &self.form
    }

    pub fn model_mut(&mut self) -> &mut FormModel {
        &mut self.form
    }

    pub fn document_types(&self) -> &[DocumentTypeOption] {
        &self.document_types
    }

    pub fn status(&self) -> FormStatus {
        *self.status.borrow()
    }

    /// Follow status changes, including those made during a pending submit
    pub fn subscribe(&self) -> watch::Receiver<FormStatus> {
        self.status.subscribe()
    }

    pub fn state(&self) -> SubmissionState {
        self.status().state
    }

    pub fn is_loading(&self) -> bool {
        self.status().loading
    }

    fn set_loading(&self, loading: bool) {
        self.status.send_if_modified(|status| {
            let changed = status.loading != loading;
            status.loading = loading;
            changed
        });
    }

    fn set_state(&self, state: SubmissionState) {
        self.status.send_if_modified(|status| {
            let changed = status.state != state;
            status.state = state;
            changed
        });
    }

    /// Initial data is in; clear the loading indicator
    pub fn mark_ready(&mut self) {
        if self.is_loading() {
            debug!("intake screen ready");
        }
        self.set_loading(false);
    }

    /// Fetch the document type options once
    ///
    /// Returns whether options are available. A transport failure shows the
    /// connectivity dialog and leaves the list empty.
    pub async fn load_document_types<P: Presenter>(&mut self, presenter: &P) -> bool {
        match self.lifecycle.track(self.backend.document_types()).await {
            Ok(Ok(options)) => {
                debug!(count = options.len(), "document types loaded");
                self.document_types = options;
                true
            }
            Ok(Err(e)) => {
                warn!(error = %e, "failed to load document types");
                presenter.show_error(&Notice::server_unreachable());
                false
            }
            Err(_) => false,
        }
    }

    /// Current rule failures for the draft
    pub fn validate(&self) -> Vec<FieldError> {
        self.rules.validate(self.form.draft())
    }

    /// Run one submission attempt
    pub async fn submit<P, N>(&mut self, presenter: &P, navigator: &N) -> SubmitOutcome
    where
        P: Presenter,
        N: Navigator,
    {
        let errors = self.validate();
        if !errors.is_empty() {
            debug!(failures = errors.len(), "submission not offered");
            return SubmitOutcome::NotOffered(errors);
        }

        self.set_state(SubmissionState::ConfirmPending);
        if !presenter.confirm(&Confirmation::create_customer()).await {
            self.set_state(SubmissionState::Editing);
            return SubmitOutcome::Declined;
        }

        self.status.send_modify(|status| {
            status.state = SubmissionState::Submitting;
            status.loading = true;
        });
        let payload = CustomerPayload::from(self.form.draft());
        let response = self
            .lifecycle
            .track(self.backend.create_customer(&payload))
            .await;
        self.status.send_modify(|status| {
            status.loading = false;
            status.state = SubmissionState::Editing;
        });

        match response {
            Ok(Ok(answer)) if answer.is_ok() => {
                info!(document = %payload.document_number, "customer created");
                self.form.reset();
                navigator.navigate(CUSTOMER_LIST);
                presenter.show_success_toast(&Notice::customer_created());
                SubmitOutcome::Created
            }
            Ok(Ok(answer)) => {
                let message = answer.message.unwrap_or_default();
                warn!(status = %answer.status, %message, "customer rejected");
                presenter.show_error(&Notice::create_rejected(&message));
                SubmitOutcome::Rejected(message)
            }
            Ok(Err(e)) => {
                warn!(error = %e, "customer submission failed");
                presenter.show_error(&Notice::server_unreachable());
                SubmitOutcome::TransportFailed
            }
            Err(_) => SubmitOutcome::Released,
        }
    }

    /// Leave for the customer list, asking first if there are unsaved edits
    ///
    /// Returns whether the screen was left.
    pub async fn go_back<P, N>(&mut self, presenter: &P, navigator: &N) -> bool
    where
        P: Presenter,
        N: Navigator,
    {
        if !UnsavedChangesGuard.allow_navigation(&self.form, presenter).await {
            return false;
        }
        self.set_loading(true);
        navigator.navigate(CUSTOMER_LIST);
        true
    }
}
