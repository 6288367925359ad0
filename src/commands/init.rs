use git_sops::error::Result;
use git_sops::git::FILTER_NAME;
use git_sops::prompt::TerminalConfirm;
use git_sops::setup::{self, DecryptChoice, InitReport};
use git_sops::GitRepo;
use std::io::{self, IsTerminal};

/// Initialize the sops filter in the repository
pub fn init(repo: &GitRepo, choice: Option<DecryptChoice>) -> Result<()> {
    println!("Initializing git-sops...");

    // Without a terminal there is nobody to answer the prompt
    let choice = choice.unwrap_or_else(|| {
        if io::stdin().is_terminal() {
            DecryptChoice::Ask
        } else {
            DecryptChoice::Never
        }
    });

    let program = shell_quote(&std::env::current_exe()?.to_string_lossy());

    match setup::initialize(repo, &TerminalConfirm, &program, choice)? {
        InitReport::AlreadyInitialized => {
            println!("Repository already initialized for git-sops");
        }
        InitReport::Initialized { decrypted } => {
            println!("Configured git filters");
            if !decrypted.is_empty() {
                println!("Decrypted {} file(s):", decrypted.len());
                for path in &decrypted {
                    println!("  {}", path.display());
                }
            }

            println!("\nInitialization complete!");
            println!("\nNext steps:");
            println!("1. Create a .gitattributes file to specify which files to encrypt");
            println!(
                "   Example: echo '*.env filter={}' >> .gitattributes",
                FILTER_NAME
            );
            println!("2. Commit the .gitattributes file");
        }
    }

    Ok(())
}

/// Quote a value for the shell git runs filter commands through.
fn shell_quote(value: &str) -> String {
    if value
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || "-_.:/+=,@".contains(ch))
    {
        value.to_string()
    } else {
        format!("'{}'", value.replace('\'', "'\"'\"'"))
    }
}
