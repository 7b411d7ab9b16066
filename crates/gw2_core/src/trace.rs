use miette::{IntoDiagnostic, Result, WrapErr};

/// env var read for log directives, eg: `GW2API_LOG=gw2api=trace`
pub const LOG_ENV_VAR: &str = "GW2API_LOG";

/// Installs a global fmt subscriber filtered by [LOG_ENV_VAR].
/// If the env var is unset or invalid, `default_directives` is used instead (eg: "info,ureq=warn").
///
/// A library shouldn't force a subscriber on its users, so this is opt-in for binaries and tests.
/// Calling it when a global subscriber already exists returns an error.
pub fn install_tracing(default_directives: &str) -> Result<()> {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::{fmt, EnvFilter};

    let filter_layer = EnvFilter::try_from_env(LOG_ENV_VAR)
        .or_else(|_| EnvFilter::try_new(default_directives))
        .into_diagnostic()
        .wrap_err_with(|| format!("invalid log directives: {default_directives}"))?;
    let fmt_layer = fmt::layer().with_target(true);
    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init()
        .into_diagnostic()
        .wrap_err("failed to install global tracing subscriber")?;
    tracing::debug!(env = LOG_ENV_VAR, "tracing installed");
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn second_install_is_an_error_not_a_panic() {
        // only test in this crate that touches the global subscriber
        install_tracing("debug").expect("failed to install tracing");
        assert!(install_tracing("debug").is_err());
    }
}
