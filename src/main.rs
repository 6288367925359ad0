mod commands;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand};
use git_sops::error::{GitSopsError, Result};
use git_sops::setup::DecryptChoice;
use git_sops::{GitRepo, Settings, SopsCli};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Log filter directives, e.g. `GIT_SOPS_LOG=debug`.
const LOG_ENV: &str = "GIT_SOPS_LOG";

#[derive(Parser)]
#[command(name = "git-sops")]
#[command(version)]
#[command(about = "Transparent sops encryption of files in git", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Register the sops filter in the current repository
    Init {
        /// Decrypt encrypted files in the working tree without asking
        #[arg(long, conflicts_with = "no_decrypt")]
        decrypt: bool,

        /// Skip the offer to decrypt the working tree
        #[arg(long)]
        no_decrypt: bool,
    },

    /// Smudge filter (used internally by git)
    Smudge {
        /// Path of the file being checked out
        file: Option<PathBuf>,
    },

    /// Clean filter (used internally by git)
    Clean {
        /// Path of the file being staged
        file: Option<PathBuf>,
    },
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
            ErrorKind::InvalidSubcommand => print_usage(),
            ErrorKind::UnknownArgument if !names_subcommand() => print_usage(),
            _ => {
                let _ = e.print();
                std::process::exit(1);
            }
        },
    };

    let Some(command) = cli.command else {
        print_usage();
    };

    init_tracing();

    if let Err(e) = run(command) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Whether any argument is a known subcommand, so a parse error belongs to it.
fn names_subcommand() -> bool {
    let command = Cli::command();
    std::env::args_os()
        .skip(1)
        .any(|arg| command.find_subcommand(&arg).is_some())
}

fn print_usage() -> ! {
    let _ = Cli::command().print_help();
    std::process::exit(0);
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(command: Commands) -> Result<()> {
    let settings = Settings::from_env()?;
    let engine_path = settings.check()?;
    let repo = GitRepo::open(".")?;
    let engine = SopsCli::new(engine_path, &settings.sops_config);

    match command {
        Commands::Init {
            decrypt,
            no_decrypt,
        } => {
            let choice = match (decrypt, no_decrypt) {
                (true, _) => Some(DecryptChoice::Always),
                (_, true) => Some(DecryptChoice::Never),
                _ => None,
            };
            commands::init(&repo, choice)
        }
        Commands::Smudge { file } => {
            let file = file.ok_or(GitSopsError::MissingFilename("smudge"))?;
            commands::smudge(&engine, &file)
        }
        Commands::Clean { file } => {
            let file = file.ok_or(GitSopsError::MissingFilename("clean"))?;
            commands::clean(&repo, &engine, &file)
        }
    }
}
