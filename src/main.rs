// src/main.rs

use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use debfetch::repository::{
    self, DEFAULT_ARCHITECTURE, DEFAULT_COMPONENT, DEFAULT_DISTRIBUTION, DEFAULT_REPOSITORY,
    DebianRepository, Fetcher, RepositoryClient,
};
use debfetch::version::VersionOrder;
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser)]
#[command(name = "debfetch")]
#[command(author, version, about = "Fetch the latest build of a package from a Debian-style repository", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Where to look for the package index
#[derive(Args, Debug, Clone)]
struct RepoArgs {
    /// Repository base URL
    #[arg(short, long, env = "DEBFETCH_REPO", default_value = DEFAULT_REPOSITORY)]
    repo: String,
    /// Target architecture
    #[arg(short, long, env = "DEBFETCH_ARCH", default_value = DEFAULT_ARCHITECTURE)]
    arch: String,
    /// Distribution (suite) name
    #[arg(short, long, env = "DEBFETCH_DIST", default_value = DEFAULT_DISTRIBUTION)]
    dist: String,
    /// Repository component
    #[arg(short, long, env = "DEBFETCH_COMPONENT", default_value = DEFAULT_COMPONENT)]
    component: String,
    /// How versions are ordered when picking the newest (lexical, debian)
    #[arg(long, default_value_t = VersionOrder::Lexical)]
    version_order: VersionOrder,
}

impl RepoArgs {
    fn repository(&self) -> DebianRepository {
        DebianRepository::new(self.repo.clone())
            .with_distribution(self.dist.clone())
            .with_component(self.component.clone())
            .with_architecture(self.arch.clone())
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Download the newest build of a package as <package>.deb
    Fetch {
        /// Package name (exact match)
        package: String,
        #[command(flatten)]
        repo: RepoArgs,
        /// Output file (default: ./<package>.deb)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show the record that would be downloaded
    Show {
        /// Package name (exact match)
        package: String,
        #[command(flatten)]
        repo: RepoArgs,
        /// Print the resolved package as JSON
        #[arg(long)]
        json: bool,
    },
    /// List every published version of a package, newest first
    Versions {
        /// Package name (exact match)
        package: String,
        #[command(flatten)]
        repo: RepoArgs,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell type
        shell: Shell,
    },
}

/// Report a failed invocation; the process still exits normally
fn report_failure(err: &debfetch::Error) {
    debug!("Invocation failed: {:?}", err);
    eprintln!("Error: {}", err);
}

/// Dispatch a subcommand; `connect` is only called by subcommands that need the network
fn run<F, C>(command: Commands, connect: C) -> Result<()>
where
    F: Fetcher,
    C: FnOnce() -> debfetch::Result<F>,
{
    match command {
        Commands::Fetch {
            package,
            repo,
            output,
        } => {
            let fetcher = connect()?;
            let dest = output.unwrap_or_else(|| repository::default_output_path(&package));
            match repository::fetch_package(&fetcher, &repo.repository(), &package, repo.version_order, &dest) {
                Ok(path) => println!("Saved to {}", path.display()),
                Err(e) => report_failure(&e),
            }
        }
        Commands::Show {
            package,
            repo,
            json,
        } => {
            let fetcher = connect()?;
            match repository::resolve_package(&fetcher, &repo.repository(), &package, repo.version_order) {
                Ok(resolved) if json => println!("{}", serde_json::to_string_pretty(&resolved)?),
                Ok(resolved) => {
                    for (field, value) in resolved.record.iter() {
                        println!("{}: {}", field, value.replace('\n', "\n "));
                    }
                    println!();
                    println!("Download: {}", resolved.download_url);
                }
                Err(e) => report_failure(&e),
            }
        }
        Commands::Versions { package, repo } => {
            let fetcher = connect()?;
            match repository::list_versions(&fetcher, &repo.repository(), &package, repo.version_order) {
                Ok(versions) => {
                    for version in versions {
                        println!("{}", version);
                    }
                }
                Err(e) => report_failure(&e),
            }
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "debfetch", &mut std::io::stdout());
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    run(cli.command, RepositoryClient::new)
}
