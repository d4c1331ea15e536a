use anyhow::Result;
use clap::{Parser, Subcommand};
use kit::areas::repository::Repository;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "kit",
    version = "0.1.0",
    about = "A content-addressable version control core",
    long_about = "kit is a small version control tool built around a \
    content-addressable object store, a versioned object model, and a staging \
    index that reconciles recorded state against the live file tree."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Initialize a new repository",
        long_about = "This command initializes a new repository in the current directory or at the specified path."
    )]
    Init {
        #[arg(index = 1, help = "The path to the repository")]
        path: Option<String>,
    },
    #[command(
        name = "add",
        about = "Store files as blobs and stage them in the index",
        long_about = "This command hashes matching working-tree files into the object store \
        and records them in the staging index."
    )]
    Add {
        #[arg(index = 1, help = "The file or directory to add", default_value = ".")]
        path: String,
    },
    #[command(
        name = "status",
        about = "Show the difference between the index and the working tree"
    )]
    Status,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Init { path } => {
            let mut repository = match path {
                Some(path) => Repository::new(path, Box::new(std::io::stdout()))?,
                None => {
                    let pwd = std::env::current_dir()?;
                    Repository::new(&pwd.to_string_lossy(), Box::new(std::io::stdout()))?
                }
            };

            repository.init()?
        }
        Commands::Add { path } => {
            let pwd = std::env::current_dir()?;
            let mut repository =
                Repository::new(&pwd.to_string_lossy(), Box::new(std::io::stdout()))?;

            repository.add(Some(path.as_str()))?
        }
        Commands::Status => {
            let pwd = std::env::current_dir()?;
            let mut repository =
                Repository::new(&pwd.to_string_lossy(), Box::new(std::io::stdout()))?;

            repository.status()?
        }
    }

    Ok(())
}
