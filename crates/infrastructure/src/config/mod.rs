//! Settings file and environment overrides.

mod settings_file;

pub use settings_file::{
    ENV_ACTIVE, ENV_BASE_URL, ENV_CLIENT_ID, ENV_CLIENT_SECRET, SettingsError, SettingsFile,
};
