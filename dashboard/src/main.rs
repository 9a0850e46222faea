//! Dashboard entry-point: loads settings, wires the identity backend into
//! the session store and resolves the startup view.

use std::env;
use std::io;
use std::path::Path;
use std::sync::Arc;

use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use dashboard::DashboardSettings;
use dashboard::domain::SessionStore;
use dashboard::domain::ports::{FIXTURE_EMAIL, FixtureIdentityService, IdentityService};
use dashboard::inbound::view::{LOADING_CAPTION, PointerBus, View, ViewRouter};
use dashboard::outbound::identity::{
    FileTokenStore, HttpIdentityService, MemoryTokenStore, SessionTokenStore,
};

fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<()> {
    let settings = DashboardSettings::load_from_iter(env::args_os())
        .map_err(|error| io::Error::other(format!("load settings: {error}")))?;
    let identity = identity_service(&settings)?;

    let store = SessionStore::new(identity);
    let mut router = ViewRouter::new(&store, PointerBus::default());
    info!(view = describe(&router.view()), "starting");

    store.restore_session().await;
    router.sync();
    info!(view = describe(&router.view()), "session resolved");
    Ok(())
}

fn identity_service(settings: &DashboardSettings) -> io::Result<Arc<dyn IdentityService>> {
    let endpoint = settings
        .identity_endpoint()
        .map_err(|error| io::Error::new(io::ErrorKind::InvalidInput, error))?;
    let Some(endpoint) = endpoint else {
        warn!(
            account = FIXTURE_EMAIL,
            "identity_url not configured; using in-memory fixture accounts"
        );
        return Ok(Arc::new(FixtureIdentityService::default()));
    };

    let tokens = token_store(settings.session_file.as_deref());
    let service = HttpIdentityService::new(endpoint, settings.request_timeout(), tokens)
        .map_err(|error| io::Error::other(format!("build HTTP client: {error}")))?;
    let service = match settings.api_key() {
        Some(key) => service.with_api_key(key),
        None => service,
    };
    info!(base = %service.base_url(), "using remote identity service");
    Ok(Arc::new(service))
}

fn token_store(session_file: Option<&Path>) -> Arc<dyn SessionTokenStore> {
    match session_file {
        Some(path) => Arc::new(FileTokenStore::new(path)),
        None => Arc::new(MemoryTokenStore::default()),
    }
}

fn describe(view: &View) -> &'static str {
    match view {
        View::Loading => LOADING_CAPTION,
        View::SignIn => "sign-in",
        View::SignUp => "sign-up",
        View::Dashboard(_) => "dashboard",
    }
}
