//! Centralized constants for the client-intake crate
//!
//! Endpoints, map anchors and the user-facing texts shown by the intake
//! screen.

/// Geographic anchors
pub mod geo {
    /// Fixed route origin: every stored location is a route endpoint from here
    pub const ORIGIN_LAT: f64 = 6.29051;
    pub const ORIGIN_LNG: f64 = -75.57353;

    /// Viewport center used when the draft has no location yet
    pub const DEFAULT_CENTER_LAT: f64 = 6.25670;
    pub const DEFAULT_CENTER_LNG: f64 = -75.57496;

    /// Zoom for the regional overview
    pub const DEFAULT_ZOOM: u8 = 11;

    /// Zoom when centering on an already resolved location
    pub const FOCUSED_ZOOM: u8 = 15;

    /// Autocomplete country restriction (ISO 3166-1 alpha-2)
    pub const AUTOCOMPLETE_COUNTRY: &str = "CO";

    /// Marker title
    pub const MARKER_TITLE: &str = "Ubicación seleccionada";
}

/// External API endpoints
pub mod api {
    /// Google Maps web services root
    pub const GOOGLE_MAPS_URL: &str = "https://maps.googleapis.com/maps/api";

    /// Customer backend root
    pub const BACKEND_URL: &str =
        "https://star-routing-backend-brabckhpgve4fkes.eastus-01.azurewebsites.net";

    /// Status string the mapping provider uses for success
    pub const PROVIDER_OK: &str = "OK";

    /// Status string the backend uses for logical success
    pub const BACKEND_OK: &str = "ok";
}

/// Navigation targets
pub mod routes {
    /// Customer list, where the screen returns on success or go-back
    pub const CUSTOMER_LIST: &str = "cliente/list-clientes";
}

/// User-facing texts
pub mod messages {
    pub const CONFIRM_CREATE_TITLE: &str = "¿Estás seguro de que deseas crear este cliente?";
    pub const CONFIRM_BUTTON: &str = "Confirmar";
    pub const CANCEL_BUTTON: &str = "Cancelar";

    pub const CONFIRM_DISCARD_TITLE: &str = "Hay cambios sin guardar";
    pub const CONFIRM_DISCARD_TEXT: &str = "Si sales ahora perderás los datos ingresados. ¿Deseas continuar?";

    pub const CREATED_TITLE: &str = "Cliente creado";
    pub const CREATED_TEXT: &str = "El cliente ha sido creado exitosamente.";

    pub const CREATE_FAILED_TITLE: &str = "Error al crear";

    pub const SERVER_ERROR_TITLE: &str = "Error en el servidor";
    pub const SERVER_ERROR_TEXT: &str = "Ha ocurrido un error al comunicarse con el servidor. Por favor, revisa tu conexión a internet o inténtalo nuevamente";

    pub const ADDRESS_ERROR_TITLE: &str = "Error al obtener la dirección";
    pub const ADDRESS_ERROR_TEXT: &str = "No se ha podido obtener la dirección seleccionada. Por favor, revisa tu conexión a internet o inténtalo nuevamente.";
}
