use clusterman::cli::{Args, ConfigDiscovery, ExecutionMode, execute, resolve_config, run_shell};
use clusterman::container::{ContainerOrchestrator, ContainerOrchestratorConfig};
use clusterman::ClusterManager;
use std::io;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Logs go to stderr so command output stays clean
    let default_filter = if args.verbose {
        "clusterman=debug"
    } else {
        "clusterman=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(io::stderr)
        .init();

    let mode = match args.mode() {
        Ok(mode) => mode,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };

    let command = match mode {
        ExecutionMode::ShowConfig => {
            ConfigDiscovery::show_discovery_info();
            return Ok(());
        }
        ExecutionMode::InitConfig => {
            let path = ConfigDiscovery::create_default_user_config()?;
            println!("Configuration file: {}", path.display());
            return Ok(());
        }
        ExecutionMode::Shell => None,
        ExecutionMode::Cluster(command) => Some(command),
    };

    let config = resolve_config(&args)?;
    info!("Using cluster '{}'", config.name);

    let orchestrator_config = ContainerOrchestratorConfig {
        stop_timeout: config.stop_timeout,
        ..Default::default()
    };
    let orchestrator = match ContainerOrchestrator::with_config(orchestrator_config).await {
        Ok(orchestrator) => orchestrator,
        Err(e) => {
            error!("Runtime connection failed: {}", e);
            println!("Cannot connect with docker server, please check if docker server is on.");
            std::process::exit(1);
        }
    };

    let manager = ClusterManager::new(orchestrator, config);
    let mut stdout = io::stdout();

    match command {
        Some(command) => {
            if let Err(e) = execute(&manager, &command, &mut stdout).await {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        None => run_shell(&manager, io::stdin().lock(), &mut stdout).await?,
    }

    Ok(())
}
