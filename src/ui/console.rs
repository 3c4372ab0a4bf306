//! Terminal presenter and navigator used by the `register` command

use crate::ui::{Confirmation, Navigator, Notice, Presenter};
use dialoguer::theme::ColorfulTheme;
use dialoguer::Confirm;
use std::sync::Mutex;
use tracing::{info, warn};

/// Prompts on stdin, prints notices to stderr
#[derive(Debug, Default)]
pub struct ConsolePresenter;

impl Presenter for ConsolePresenter {
    async fn confirm(&self, prompt: &Confirmation) -> bool {
        let mut question = prompt.title.clone();
        if let Some(text) = &prompt.text {
            question = format!("{}\n{}", question, text);
        }

        let answer = tokio::task::spawn_blocking(move || {
            Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt(question)
                .default(false)
                .interact()
        })
        .await;

        match answer {
            Ok(Ok(accepted)) => accepted,
            Ok(Err(e)) => {
                warn!(error = %e, "confirmation prompt failed");
                false
            }
            Err(e) => {
                warn!(error = %e, "confirmation prompt aborted");
                false
            }
        }
    }

    fn show_error(&self, notice: &Notice) {
        eprintln!("✗ {}\n  {}", notice.title, notice.text);
    }

    fn show_success_toast(&self, notice: &Notice) {
        eprintln!("✓ {}: {}", notice.title, notice.text);
    }
}

/// Records where the screen navigated to
#[derive(Debug, Default)]
pub struct ConsoleNavigator {
    destination: Mutex<Option<String>>,
}

impl ConsoleNavigator {
    /// Route the screen left for, if it has left
    pub fn destination(&self) -> Option<String> {
        self.destination.lock().ok().and_then(|d| d.clone())
    }
}

impl Navigator for ConsoleNavigator {
    fn navigate(&self, route: &str) {
        info!(route, "leaving intake screen");
        if let Ok(mut destination) = self.destination.lock() {
            *destination = Some(route.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigator_records_destination() {
        let navigator = ConsoleNavigator::default();
        assert_eq!(navigator.destination(), None);

        navigator.navigate("cliente/list-clientes");
        assert_eq!(navigator.destination().as_deref(), Some("cliente/list-clientes"));
    }
}
