use clap::Parser;
use gh_publish::cli::Cli;
use gh_publish::{
    init_telemetry, ExitCode, FileConfig, ProcessCommandExecutor, PublishConfig, PublishError,
    PublishWorkflow, StandardFileSystem,
};
use std::sync::Arc;

fn main() -> std::process::ExitCode {
    // .env must be loaded before clap reads REPO_PATH / REPO_NAME
    let env_file = FileConfig::load_env_file();

    let cli = Cli::parse();

    if let Err(e) = init_telemetry(cli.verbose) {
        eprintln!("warning: could not initialize logging: {e}");
    }
    if let Err(e) = env_file {
        tracing::warn!(error = %e, "failed to load .env file");
    }

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            println!("❌ Failed to start runtime: {e}");
            return ExitCode::Error.into();
        }
    };

    runtime.block_on(publish(cli)).into()
}

async fn publish(cli: Cli) -> ExitCode {
    let file_config = match FileConfig::load(cli.config.as_deref()) {
        Ok(file_config) => file_config,
        Err(e) => {
            println!("❌ Failed to load configuration: {e:#}");
            return ExitCode::Config;
        }
    };

    let config = match PublishConfig::resolve(cli.overrides(), file_config) {
        Ok(config) => config,
        Err(e @ PublishError::ConfigurationMissing { .. }) => {
            println!("❌ repo_path and repo_name must be provided via arguments or environment variables");
            println!("   {e}");
            return ExitCode::from_error(&e);
        }
        Err(e) => {
            println!("❌ {e}");
            return ExitCode::from_error(&e);
        }
    };
    tracing::info!(path = %config.repo_path.display(), name = %config.repo_name, "configuration resolved");

    let workflow = PublishWorkflow::new(
        config,
        Arc::new(ProcessCommandExecutor),
        Arc::new(StandardFileSystem),
    );

    let mut stdout = std::io::stdout();
    match workflow.run(&mut stdout).await {
        Ok(outcome) => {
            tracing::info!(?outcome, "publish finished");
            ExitCode::Success
        }
        Err(e) => {
            tracing::debug!(error = %e, "publish stopped");
            ExitCode::from_error(&e)
        }
    }
}
