//! Register command handler
//!
//! Interactive intake on the terminal: field prompts, address search or
//! map coordinates, confirmation and submission through [`IntakeScreen`].

use crate::backend::{CustomerBackend, HttpBackend};
use crate::cli::init_logging;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::form::{CustomerDraft, Field, SubmitOutcome};
use crate::geo::google::GoogleMapsClient;
use crate::geo::{
    AddressResolver, AutocompleteOptions, Coordinates, DirectionsProvider, Geocoder, PlaceSearch,
};
use crate::map::{Applied, HeadlessSurface};
use crate::screen::IntakeScreen;
use crate::ui::console::{ConsoleNavigator, ConsolePresenter};
use clap::Args;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};
use std::sync::Arc;

type ConsoleScreen<B, G, D> =
    IntakeScreen<B, G, D, HeadlessSurface, ConsolePresenter, ConsoleNavigator>;

/// Register command arguments
#[derive(Args)]
pub struct RegisterArgs {
    /// Enter map coordinates instead of searching addresses
    #[arg(long)]
    pub coordinates: bool,
}

/// Run the register command
pub async fn run(args: RegisterArgs) -> Result<()> {
    init_logging("warn");

    let config = Config::load()?;
    let client = Arc::new(GoogleMapsClient::new(&config.maps)?);
    let backend = HttpBackend::new(&config.backend)?;
    let resolver = Arc::new(AddressResolver::new(
        client.clone(),
        client.clone(),
        config.maps.origin(),
        config.maps.resolve_timeout(),
    ));
    let options = config.maps.autocomplete_options();

    let mut screen = IntakeScreen::new(
        backend,
        resolver,
        HeadlessSurface::new(),
        &config.maps,
        ConsolePresenter,
        ConsoleNavigator::default(),
    );
    screen.open().await;

    let theme = ColorfulTheme::default();
    loop {
        prompt_fields(&mut screen, &theme)?;
        prompt_location(&mut screen, client.as_ref(), &options, args.coordinates, &theme).await?;

        match screen.submit().await {
            SubmitOutcome::Created => {
                if let Some(route) = screen.navigator().destination() {
                    eprintln!("→ {}", route);
                }
                return Ok(());
            }
            SubmitOutcome::NotOffered(errors) => {
                eprintln!("Revisa los campos:");
                for error in errors {
                    eprintln!("  - {}", error);
                }
            }
            SubmitOutcome::Released => return Ok(()),
            SubmitOutcome::Declined
            | SubmitOutcome::Rejected(_)
            | SubmitOutcome::TransportFailed => {}
        }

        let keep_editing = Confirm::with_theme(&theme)
            .with_prompt("¿Seguir editando?")
            .default(true)
            .interact()
            .map_err(prompt_error)?;
        if !keep_editing && screen.go_back().await {
            return Ok(());
        }
    }
}

fn prompt_error(e: dialoguer::Error) -> Error {
    Error::Prompt(e.to_string())
}

fn current_value(draft: &CustomerDraft, field: Field) -> String {
    match field {
        Field::DocumentNumber => draft.document_number.clone(),
        Field::DocumentType => draft
            .document_type_id
            .map(|id| id.to_string())
            .unwrap_or_default(),
        Field::Name => draft.name.clone(),
        Field::Phone => draft.phone.clone(),
        Field::Email => draft.email.clone(),
        Field::Address => draft.address.clone(),
        Field::AddressDetail => draft.address_detail.clone(),
    }
}

fn prompt_text(theme: &ColorfulTheme, field: Field, current: &str) -> Result<Option<String>> {
    let mut input = Input::<String>::with_theme(theme)
        .with_prompt(field.label())
        .allow_empty(true);
    if !current.is_empty() {
        input = input.with_initial_text(current);
    }
    let value = input.interact_text().map_err(prompt_error)?;
    Ok((value != current).then_some(value))
}

/// Ask every field except the address line, which comes from resolution
fn prompt_fields<B, G, D>(screen: &mut ConsoleScreen<B, G, D>, theme: &ColorfulTheme) -> Result<()>
where
    B: CustomerBackend,
    G: Geocoder,
    D: DirectionsProvider,
{
    for field in Field::all() {
        if field == Field::Address {
            continue;
        }
        let current = current_value(screen.form().model().draft(), field);

        if field == Field::DocumentType && !screen.form().document_types().is_empty() {
            let options = screen.form().document_types().to_vec();
            let labels: Vec<&str> = options.iter().map(|o| o.label.as_str()).collect();
            let selected = options
                .iter()
                .position(|o| Some(o.id) == screen.form().model().draft().document_type_id)
                .unwrap_or(0);
            let choice = Select::with_theme(theme)
                .with_prompt(field.label())
                .items(&labels)
                .default(selected)
                .interact()
                .map_err(prompt_error)?;
            let id = options[choice].id.to_string();
            if id != current {
                screen.edit(field, &id)?;
            }
            continue;
        }

        if let Some(value) = prompt_text(theme, field, &current)? {
            if let Err(e) = screen.edit(field, &value) {
                eprintln!("{}", e);
            }
        }
    }
    Ok(())
}

async fn prompt_location<B, G, D, P>(
    screen: &mut ConsoleScreen<B, G, D>,
    places: &P,
    options: &AutocompleteOptions,
    coordinates_only: bool,
    theme: &ColorfulTheme,
) -> Result<()>
where
    B: CustomerBackend,
    G: Geocoder,
    D: DirectionsProvider,
    P: PlaceSearch,
{
    loop {
        let draft = screen.form().model().draft();
        if let Some(location) = draft.location {
            let keep = Confirm::with_theme(theme)
                .with_prompt(format!("Ubicación: {} {}. ¿Mantener?", draft.address, location))
                .default(true)
                .interact()
                .map_err(prompt_error)?;
            if keep {
                return Ok(());
            }
        }

        let applied = if coordinates_only {
            let at = prompt_coordinates(theme)?;
            screen.click_map(at).await
        } else {
            let query: String = Input::with_theme(theme)
                .with_prompt(Field::Address.label())
                .interact_text()
                .map_err(prompt_error)?;
            let suggestions = places.autocomplete(&query, options).await?;
            if suggestions.is_empty() {
                eprintln!("Sin resultados para '{}'", query);
                continue;
            }
            let labels: Vec<&str> = suggestions.iter().map(|s| s.description.as_str()).collect();
            let choice = Select::with_theme(theme)
                .items(&labels)
                .default(0)
                .interact()
                .map_err(prompt_error)?;
            match places.place_details(&suggestions[choice].place_id).await? {
                Some(place) => screen.select_place(place).await,
                None => {
                    eprintln!("No se encontró el detalle de la dirección");
                    continue;
                }
            }
        };

        if let Applied::Accepted(resolved) = applied {
            eprintln!("✓ {} {}", resolved.formatted_address, resolved.coordinates);
            return Ok(());
        }
    }
}

fn prompt_coordinates(theme: &ColorfulTheme) -> Result<Coordinates> {
    loop {
        let lat: f64 = Input::with_theme(theme)
            .with_prompt("Latitud")
            .interact_text()
            .map_err(prompt_error)?;
        let lng: f64 = Input::with_theme(theme)
            .with_prompt("Longitud")
            .interact_text()
            .map_err(prompt_error)?;
        let at = Coordinates::new(lat, lng);
        match at.validate() {
            Ok(()) => return Ok(at),
            Err(e) => eprintln!("{}", e),
        }
    }
}
