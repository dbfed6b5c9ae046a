//! Configuration loading utilities

use config::{Config, ConfigError, File};
use tracing::debug;

use crate::Settings;

/// Load configuration from the optional config file, falling back to
/// built-in defaults for anything unspecified
pub fn load_config() -> Result<Settings, ConfigError> {
	let defaults = Config::try_from(&Settings::default())?;

	let merged = Config::builder()
		.add_source(defaults)
		.add_source(File::with_name("config/config").required(false))
		.build()?;

	let settings: Settings = merged.try_deserialize()?;
	debug!(
		"loaded settings: {} chains in scope, catalog at {}",
		settings.allowed_networks().len(),
		settings.catalog.base_url
	);
	Ok(settings)
}
