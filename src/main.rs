mod cli;

use anyhow::Context;
use github_tools::config::Config;
use github_tools::server::{self, Server};
use github_tools::tools::tool_descriptors;
use log::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = cli::build_cli().get_matches();
    cli::init_logging(cli::log_level(&matches));

    if matches.get_flag("version") {
        println!("github-tools {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    if matches.get_flag("list-tools") {
        println!("{}", serde_json::to_string_pretty(tool_descriptors())?);
        return Ok(());
    }

    let cfg = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;
    info!("Using GitHub API at {}", cfg.api_url);
    let server = Server::new(cfg).context("failed to initialize GitHub client")?;
    server::run_stdio(server).await
}
