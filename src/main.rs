use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use dataset_auditor::config::{missing_env_vars, Config};
use dataset_auditor::error::AuditError;
use dataset_auditor::gateway::ReqwestGateway;
use dataset_auditor::logging;
use dataset_auditor::pipeline::ResolutionPipeline;
use dataset_auditor::report::write_report;

#[derive(Parser)]
#[command(name = "dataset_auditor")]
#[command(about = "Audits which datasets deployed application instances reference and serve")]
#[command(version = "0.1.0")]
struct Cli {
    /// Host of the configuration lookup API
    #[arg(default_value = "staging-bellerophon.herokuapp.com")]
    host: String,

    /// Where to write the tab-separated report
    #[arg(default_value = "bellerophon_fxfs")]
    output: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();

    let missing = missing_env_vars();
    if !missing.is_empty() {
        return Err(AuditError::MissingEnv { names: missing }.into());
    }

    let config = Config::load()?;
    let gateway = Arc::new(ReqwestGateway::new(Duration::from_secs(
        config.http.timeout_seconds,
    ))?);

    let pipeline = ResolutionPipeline::new(gateway, cli.host, config.probe.workers);
    let rows = pipeline.run().await?;
    info!("Collected {} report rows", rows.len());

    write_report(&cli.output, &rows)?;
    println!("Wrote {} rows to {}", rows.len(), cli.output.display());
    Ok(())
}
