/// `load_config` module: merges the positional CLI arguments with the credential from the
/// environment into the core [`UploadConfig`].
///
/// # Responsibilities
/// - Read `GH_TOKEN` (after `.env` has been loaded by `main`)
/// - Treat an unset or empty token as absent; the remote API rejects the request, not us
/// - Log what was found without ever logging the secret itself
///
/// # Errors
/// Errors use `anyhow::Error` and are surfaced at the CLI boundary.
use anyhow::{bail, Result};
use release_asset_core::config::UploadConfig;
use release_asset_core::request::TOKEN_ENV;
use std::env;
use tracing::{error, info, warn};

use crate::cli::Cli;

pub fn load_config(cli: &Cli) -> Result<UploadConfig> {
    info!(filename = %cli.filename, "Loading upload configuration from arguments and environment");

    let token = match env::var(TOKEN_ENV) {
        Ok(token) if !token.is_empty() => {
            info!("{TOKEN_ENV} found in env");
            Some(token)
        }
        Ok(_) => {
            warn!("{TOKEN_ENV} is empty; sending unauthenticated request");
            None
        }
        Err(env::VarError::NotPresent) => {
            warn!("{TOKEN_ENV} environment variable not set; sending unauthenticated request");
            None
        }
        Err(e) => {
            error!(error = ?e, "{TOKEN_ENV} environment variable is not valid unicode");
            bail!("{TOKEN_ENV} environment variable is not valid unicode: {e}");
        }
    };

    let config = UploadConfig {
        owner: cli.owner.clone(),
        repo: cli.repo.clone(),
        release_id: cli.release_id.clone(),
        filename: cli.filename.clone(),
        content_type: cli.content_type.clone(),
        api_host: cli.api_host.clone(),
        token,
    };
    config.trace_loaded();
    Ok(config)
}
