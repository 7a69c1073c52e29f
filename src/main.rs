use dataplotter::server::AppServer;
use dataplotter::settings::{Settings, default_settings_path};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let settings = Settings::load();
    // Write defaults on first launch so they can be edited
    if default_settings_path().is_some_and(|path| !path.exists()) {
        settings.save();
    }

    let server = AppServer::bind(settings.clone())?;
    if settings.open_browser
        && let Err(e) = open::that(server.url())
    {
        tracing::warn!("Failed to open browser: {}", e);
    }

    server.run();
    Ok(())
}
