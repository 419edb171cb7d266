use clap::{Parser, Subcommand};
use std::path::PathBuf;
use synth::{
    render_routes, render_summary, resolve_services, synthesize, write_templates,
    EnvironmentSelection, Targets, DEFAULT_OUT_DIR,
};
use topology::config::ENVIRONMENTS;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "synth")]
#[command(about = "Synthesize Fargate deployment templates for each environment")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the stacks and write one template per stack
    Synth {
        /// Environment(s) to synthesize
        #[arg(short, long, value_enum, default_value = "all")]
        env: EnvironmentSelection,
        /// TOML file with service descriptors (defaults to the built-in services)
        #[arg(short, long)]
        services: Option<PathBuf>,
        /// Output directory for the templates
        #[arg(short, long, default_value = DEFAULT_OUT_DIR)]
        out: PathBuf,
    },
    /// Build the stacks without writing anything
    Validate {
        #[arg(short, long, value_enum, default_value = "all")]
        env: EnvironmentSelection,
        #[arg(short, long)]
        services: Option<PathBuf>,
    },
    /// Print the listener routing table
    Routes {
        #[arg(short, long, value_enum, default_value = "all")]
        env: EnvironmentSelection,
        #[arg(short, long)]
        services: Option<PathBuf>,
    },
    /// List known environments and configured services
    List {
        #[arg(short, long)]
        services: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let targets = Targets::from_env();

    match cli.command {
        Commands::Synth { env, services, out } => {
            let services = resolve_services(services.as_deref())?;
            let stacks = synthesize(env.environments(), &services, &targets)?;
            for path in write_templates(&stacks, &out)? {
                println!("{}", path.display());
            }
        }
        Commands::Validate { env, services } => {
            let services = resolve_services(services.as_deref())?;
            match synthesize(env.environments(), &services, &targets) {
                Ok(stacks) => {
                    for stack in &stacks {
                        print!("{}", render_summary(stack));
                    }
                    println!("✓ {} stack(s) valid", stacks.len());
                    info!("Validation successful");
                }
                Err(e) => {
                    println!("✗ Validation failed: {}", e);
                    error!("Validation failed: {}", e);
                    return Err(e.into());
                }
            }
        }
        Commands::Routes { env, services } => {
            let services = resolve_services(services.as_deref())?;
            for stack in synthesize(env.environments(), &services, &targets)? {
                print!("{}", render_routes(&stack));
            }
        }
        Commands::List { services } => {
            let services = resolve_services(services.as_deref())?;
            println!("Environments:");
            for name in ENVIRONMENTS {
                println!("  - {name}");
            }
            println!("Services:");
            if services.is_empty() {
                println!("  No services configured.");
            }
            for service in &services {
                println!(
                    "  - {} (/{}, priority {}, image {})",
                    service.name, service.path, service.priority, service.image
                );
            }
        }
    }

    Ok(())
}
