use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use super::flag_value;
use crate::core::config::{self, Config};
use crate::core::dispatch::{EscalationDispatcher, HttpAgentBoundary};
use crate::core::store::SqliteStore;
use crate::core::terminal::{self, print_link, print_status};
use crate::interfaces::web::ApiServer;

pub async fn run_serve(args: &[String]) -> Result<()> {
    let data_dir = flag_value(args, 2, &["--data-dir"])
        .map(PathBuf::from)
        .unwrap_or_else(config::data_dir);

    let mut config = Config::load(&data_dir)?;
    if let Some(host) = flag_value(args, 2, &["--api-host"]) {
        config.api_host = host;
    }
    if let Some(port) = flag_value(args, 2, &["--api-port"])
        && let Ok(port) = port.parse()
    {
        config.api_port = port;
    }
    if let Some(url) = flag_value(args, 2, &["--agent-url"]) {
        config.agent_base_url = url;
    }

    crate::logging::init();
    terminal::print_banner();
    print_status("Data dir", &data_dir.display().to_string());
    print_status("Agent backend", &config.agent_base_url);
    print_link(
        "API",
        &format!("http://{}:{}", config.api_host, config.api_port),
    );
    println!();

    let store = Arc::new(SqliteStore::open(&data_dir).await?);
    let boundary = Arc::new(HttpAgentBoundary::new(&config.agent_base_url));
    let dispatcher = Arc::new(EscalationDispatcher::new(boundary));

    ApiServer::new(store, dispatcher, config.api_host.clone(), config.api_port)
        .serve()
        .await
}
