use clap::Parser;
use fedtest::config::client::VERSION;
use fedtest::utils::logger;
use fedtest::{CliConfig, DiagnosticSession, FedError, HttpFedClient, OutputFormat, RunConfig};
use std::process::ExitCode;

const CONFIG_ERROR_EXIT: u8 = 2;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose, cli.log_format);
    tracing::info!("Starting fedtest {}", VERSION);
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let config = match RunConfig::load(&cli) {
        Ok(config) => config,
        Err(e) => return config_failure(&e),
    };

    let api = match HttpFedClient::new(config.client.clone()) {
        Ok(api) => api,
        Err(e) => return config_failure(&e),
    };
    tracing::info!(
        "Target {} (user-agent: {})",
        api.config().base_url(),
        api.config().user_agent()
    );

    let output = config.output;
    let session = DiagnosticSession::new(api, config);
    let report = session.run().await;

    if output == OutputFormat::Json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => tracing::error!("Failed to render run report: {}", e),
        }
    }

    ExitCode::from(report.outcome.exit_code())
}

fn config_failure(e: &FedError) -> ExitCode {
    tracing::error!(
        "❌ Configuration failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    ExitCode::from(CONFIG_ERROR_EXIT)
}
