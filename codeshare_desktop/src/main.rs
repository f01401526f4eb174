use anyhow::{anyhow, Result};
use codeshare_backend::api;
use codeshare_backend::config::CodeshareConfig;
use codeshare_backend::node::CodeshareNode;
use codeshare_backend::telemetry;
use tokio::runtime::Runtime;
use tracing::error;

fn main() -> Result<()> {
    telemetry::init_tracing();

    let runtime = Runtime::new()?;
    let config = CodeshareConfig::from_env()?;
    let node = CodeshareNode::start(config)?;
    let snapshot = node.snapshot();
    drop(node);

    let server_snapshot = snapshot.clone();
    let server = runtime.spawn(async move {
        if let Err(err) = api::serve_http(server_snapshot.config, server_snapshot.database).await {
            error!(error = ?err, "embedded HTTP server exited");
        }
    });

    let base_url = format!("http://127.0.0.1:{}", snapshot.config.api_port);
    std::env::set_var("CODESHARE_API_URL", &base_url);

    let ui_result = codeshare_frontend::run_frontend();

    server.abort();

    ui_result.map_err(|err| anyhow!(err.to_string()))
}
