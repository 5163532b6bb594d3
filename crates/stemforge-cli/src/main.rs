mod commands;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "stemforge", about = "Build BOSH Windows stemcells with Packer")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a stemcell for a target IaaS
    Build {
        #[command(subcommand)]
        target: BuildTarget,
    },
    /// Write a starter stemforge.toml and .env.example
    Init,
    /// Check tooling, configuration, and environment readiness
    Doctor,
}

#[derive(Subcommand)]
enum BuildTarget {
    /// Full vSphere stemcell from a source VMX image
    Vsphere(BuildArgs),
    /// Apply Windows updates to a source VMX image, without packaging
    VsphereAddUpdates(BuildArgs),
    /// Light Azure stemcell captured into a storage account
    Azure(BuildArgs),
}

#[derive(Args)]
struct BuildArgs {
    /// Path to the configuration file
    #[arg(long, default_value = "stemforge.toml")]
    config: PathBuf,

    /// Override the configured output directory
    #[arg(long)]
    output_directory: Option<PathBuf>,

    /// Extra build variable passed to the tool (repeatable)
    #[arg(long = "var", value_name = "KEY=VALUE")]
    vars: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build { target } => match target {
            BuildTarget::Vsphere(args) => {
                commands::build_vsphere(&args.config, args.output_directory.as_deref(), &args.vars)
                    .await?
            }
            BuildTarget::VsphereAddUpdates(args) => {
                commands::build_vsphere_add_updates(
                    &args.config,
                    args.output_directory.as_deref(),
                    &args.vars,
                )
                .await?
            }
            BuildTarget::Azure(args) => {
                commands::build_azure(&args.config, args.output_directory.as_deref(), &args.vars)
                    .await?
            }
        },
        Commands::Init => commands::init().await?,
        Commands::Doctor => commands::doctor().await?,
    }

    Ok(())
}
