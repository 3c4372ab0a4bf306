//! Presentation and navigation capabilities
//!
//! The intake logic never draws anything itself. It asks a [`Presenter`]
//! for confirmations, errors and toasts, and a [`Navigator`] to leave the
//! screen.

pub mod console;

use crate::constants::messages::*;
use std::future::Future;

/// A yes/no prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub title: String,
    pub text: Option<String>,
    pub confirm_label: String,
    pub cancel_label: String,
}

impl Confirmation {
    /// Asked before a customer is created
    pub fn create_customer() -> Self {
        Self {
            title: CONFIRM_CREATE_TITLE.to_string(),
            text: None,
            confirm_label: CONFIRM_BUTTON.to_string(),
            cancel_label: CANCEL_BUTTON.to_string(),
        }
    }

    /// Asked before leaving with unsaved changes
    pub fn discard_changes() -> Self {
        Self {
            title: CONFIRM_DISCARD_TITLE.to_string(),
            text: Some(CONFIRM_DISCARD_TEXT.to_string()),
            confirm_label: CONFIRM_BUTTON.to_string(),
            cancel_label: CANCEL_BUTTON.to_string(),
        }
    }
}

/// Title and body of an error dialog or toast
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub text: String,
}

impl Notice {
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
        }
    }

    pub fn customer_created() -> Self {
        Self::new(CREATED_TITLE, CREATED_TEXT)
    }

    /// Backend refused the record; its message is shown verbatim
    pub fn create_rejected(message: &str) -> Self {
        Self::new(CREATE_FAILED_TITLE, message)
    }

    pub fn server_unreachable() -> Self {
        Self::new(SERVER_ERROR_TITLE, SERVER_ERROR_TEXT)
    }

    pub fn address_unresolved() -> Self {
        Self::new(ADDRESS_ERROR_TITLE, ADDRESS_ERROR_TEXT)
    }
}

/// Dialog and toast chrome
pub trait Presenter: Send + Sync {
    /// Blocking confirmation; true when the user explicitly accepts
    fn confirm(&self, prompt: &Confirmation) -> impl Future<Output = bool> + Send;

    /// Blocking error dialog
    fn show_error(&self, notice: &Notice);

    /// Transient, non-blocking success notification
    fn show_success_toast(&self, notice: &Notice);
}

/// Screen routing
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: &str);
}
