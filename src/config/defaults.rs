//! Default configuration values
//!
//! Named constants for all tunable parameters

pub use crate::constants::geo::{
    AUTOCOMPLETE_COUNTRY as DEFAULT_COUNTRY, DEFAULT_CENTER_LAT, DEFAULT_CENTER_LNG,
    DEFAULT_ZOOM, FOCUSED_ZOOM as DEFAULT_FOCUSED_ZOOM, ORIGIN_LAT as DEFAULT_ORIGIN_LAT,
    ORIGIN_LNG as DEFAULT_ORIGIN_LNG,
};

/// Default customer backend root
pub const DEFAULT_BACKEND_URL: &str = crate::constants::api::BACKEND_URL;

/// Default backend request timeout in seconds
pub const DEFAULT_BACKEND_TIMEOUT_SECS: u64 = 30;

/// Default mapping provider root
pub const DEFAULT_MAPS_URL: &str = crate::constants::api::GOOGLE_MAPS_URL;

/// Default per-stage timeout for address resolution, in seconds
pub const DEFAULT_RESOLVE_TIMEOUT_SECS: u64 = 10;

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 7979;

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "client-intake";
