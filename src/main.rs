mod chain;
mod compiler;
mod config;
mod contracts;
mod deployer;
mod project;

use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use color_eyre::Result;
use eyre::WrapErr;

use crate::chain::{Chain, RpcChain};
use crate::compiler::{Compiler, ToolchainCompiler};
use crate::config::{DeployConfig, Environment, Overrides, UserSettings};
use crate::contracts::{ArtifactRegistry, ArtifactSource};
use crate::deployer::{Deployer, DeploymentRequest};

#[derive(Parser, Debug)]
#[command(name = "mover-deploy")]
#[command(about = "Compile and deploy the Mover contract")]
#[command(version)]
struct Cli {
    /// Path to the project directory. A Hardhat config takes precedence over
    /// foundry.toml; use --project-type foundry to build with forge instead
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Network to deploy to (hardhat, localhost, rinkeby, or one from the config file)
    #[arg(long, short)]
    network: Option<String>,

    /// Contract to deploy, by name or as path/File.sol:Name
    #[arg(long, short)]
    contract: Option<String>,

    /// Skip project detection and force a specific project type
    #[arg(long, value_parser = ["foundry", "hardhat"])]
    project_type: Option<String>,

    /// Settings file to use instead of the default one in the user config directory
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    // Diagnostics go to stderr and stay silent unless RUST_LOG asks for them
    {
        use tracing_subscriber::{EnvFilter, fmt, prelude::*};
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .with(EnvFilter::from_default_env())
            .init();
    }

    // An Err here is rendered on stderr by color-eyre and exits with code 1
    run(cli, &mut std::io::stdout()).await
}

/// Deploy according to the command line, writing the address to `out` on success
async fn run(cli: Cli, out: &mut impl Write) -> Result<()> {
    let project_path = cli.path.canonicalize().unwrap_or(cli.path);

    // Detect project type
    let project = match cli.project_type.as_deref() {
        Some("foundry") => project::Project::new_foundry(&project_path)?,
        Some("hardhat") => project::Project::new_hardhat(&project_path)?,
        _ => project::detect(&project_path)?,
    };
    tracing::info!("Using {} project '{}'", project.project_type, project.name);

    let settings = match &cli.config {
        Some(path) => UserSettings::load_from(path)?,
        None => UserSettings::load()?,
    };
    let env = Environment::capture(&project.root)?;
    let overrides = Overrides {
        network: cli.network,
        contract: cli.contract,
    };

    let config = DeployConfig::resolve(&project, &settings, &env, &overrides)
        .wrap_err("Invalid deployment configuration")?;
    let signer = config.signer()?;

    let mut deployer = Deployer::new(
        ToolchainCompiler::new(&project, &config.compiler),
        ArtifactRegistry::new(&project.out_dir),
        RpcChain::new(config.network.clone(), signer),
    );

    deploy_and_report(&mut deployer, &config, out).await
}

async fn deploy_and_report<C, A, N>(
    deployer: &mut Deployer<C, A, N>,
    config: &DeployConfig,
    out: &mut impl Write,
) -> Result<()>
where
    C: Compiler,
    A: ArtifactSource,
    N: Chain,
{
    let result = deployer
        .deploy(&DeploymentRequest::new(&config.contract))
        .await?;

    deployer::log_summary(&result, config);
    writeln!(out, "{}", result.address)?;
    out.flush()?;

    Ok(())
}
