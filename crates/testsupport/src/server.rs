use anyhow::Result;
use harness_api::{build_router, AppState};
use harness_control::Dispatcher;
use harness_functions::BuiltinRegistry;
use harness_metrics::MetricsService;
use harness_models::Config;
use std::path::Path;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// The sample handler's template, as shipped in the repository.
pub const DYNAMIC_HTML_TEMPLATE: &str =
    include_str!("../../../functions/dynamic-html/templates/template.html");

/// An execution server running in-process on an ephemeral port.
pub struct TestServer {
    pub base_url: String,
    pub dispatcher: Arc<Dispatcher>,
    handle: JoinHandle<()>,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Spawn the full router over a fresh dispatcher. Functions listed in
/// `config.functions.preload` are registered before the server accepts
/// requests, as in the real binary.
pub async fn spawn_server(config: Config) -> Result<TestServer> {
    let dispatcher = Arc::new(Dispatcher::new(
        config.clone(),
        Arc::new(BuiltinRegistry::with_defaults()),
    ));
    dispatcher.preload()?;

    let metrics = Arc::new(MetricsService::new()?);
    let state = AppState::new(config, dispatcher.clone(), metrics);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let handle = tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok(TestServer {
        base_url: format!("http://{}", addr),
        dispatcher,
        handle,
    })
}

/// Write the sample handler's template under `functions_dir`, mirroring
/// the repository's functions/ layout.
pub fn seed_dynamic_html(functions_dir: &Path) -> std::io::Result<()> {
    let path = functions_dir.join("dynamic-html/templates/template.html");
    std::fs::create_dir_all(path.parent().unwrap())?;
    std::fs::write(path, DYNAMIC_HTML_TEMPLATE)
}
