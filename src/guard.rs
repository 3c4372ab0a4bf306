//! Unsaved-changes guard
//!
//! Two exit paths ask the same question: window/tab unload and in-page
//! navigation. Unload can only be suppressed, never prompted; navigation is
//! gated behind a confirmation.

use crate::form::FormModel;
use crate::ui::{Confirmation, Presenter};
use tracing::debug;

/// What the unload handler should do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnloadDecision {
    Proceed,
    /// Suppress the default unload; the host shows its native prompt
    Suppress,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UnsavedChangesGuard;

impl UnsavedChangesGuard {
    /// True iff the draft was touched since load or the last successful submit
    pub fn has_unsaved_changes(&self, form: &FormModel) -> bool {
        form.is_dirty()
    }

    /// Unload path
    pub fn before_unload(&self, form: &FormModel) -> UnloadDecision {
        if self.has_unsaved_changes(form) {
            UnloadDecision::Suppress
        } else {
            UnloadDecision::Proceed
        }
    }

    /// In-page navigation path: clean forms leave freely, dirty ones ask
    pub async fn allow_navigation<P: Presenter>(&self, form: &FormModel, presenter: &P) -> bool {
        if !self.has_unsaved_changes(form) {
            return true;
        }
        let allowed = presenter.confirm(&Confirmation::discard_changes()).await;
        debug!(allowed, "navigation with unsaved changes");
        allowed
    }
}
