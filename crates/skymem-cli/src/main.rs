// skymem — command surface for the Skymem memory store.
// Thin argument parsing over `skymem_core::MemoryStore`; every command is a
// single load → operate → (maybe) save cycle against the fixed backing file.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use log::debug;
use skymem_core::{MemoryResult, MemoryStore, UserChange, DEFAULT_MEMORY_FILE};

#[derive(Parser)]
#[command(
    name = "skymem",
    version,
    about = "Track and manage persistent memory about Bluesky users and conversations"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print memory data for a user as JSON.
    GetUser {
        /// User handle
        handle: String,
    },

    /// Update memory data for a user.
    UpdateUser {
        /// User handle
        handle: String,

        /// Add an interest to the user
        #[arg(long)]
        add_interest: Option<String>,

        /// Add a note about the user
        #[arg(long)]
        add_note: Option<String>,
    },

    /// Search for users by handle, interest, or note content.
    Search {
        /// Search query
        query: String,
    },

    /// Manage topic associations.
    Topic {
        /// Topic name
        topic: String,

        /// Add a topic association (requires --handle)
        #[arg(long)]
        add: bool,

        /// Get users by topic
        #[arg(long)]
        get: bool,

        /// User handle (for --add)
        #[arg(long)]
        handle: Option<String>,
    },

    /// Generate shell completions for skymem.
    Completions {
        /// Target shell
        shell: Shell,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> MemoryResult<()> {
    if let Command::Completions { shell } = &cli.command {
        clap_complete::generate(*shell, &mut Cli::command(), "skymem", &mut std::io::stdout());
        return Ok(());
    }

    debug!("[cli] Using backing file {DEFAULT_MEMORY_FILE}");
    let mut store = MemoryStore::open(DEFAULT_MEMORY_FILE)?;

    match cli.command {
        Command::GetUser { handle } => {
            let user = store.get_user(&handle);
            println!("{}", serde_json::to_string_pretty(user)?);
        }

        Command::UpdateUser {
            handle,
            add_interest,
            add_note,
        } => {
            let mut changes = Vec::new();
            if let Some(interest) = add_interest {
                changes.push(UserChange::AddInterest(interest));
            }
            if let Some(note) = add_note {
                changes.push(UserChange::AddNote(note));
            }
            store.update_user(&handle, &changes)?;
            println!("Updated user {handle}");
        }

        Command::Search { query } => {
            let results = store.search_users(&query);
            println!("{}", serde_json::to_string_pretty(&results)?);
        }

        Command::Topic {
            topic,
            add,
            get,
            handle,
        } => match (add, handle) {
            (true, Some(handle)) => {
                store.add_topic_association(&topic, &handle)?;
                println!("Associated topic '{topic}' with user '{handle}'");
            }
            _ if get => {
                println!("Users interested in '{topic}':");
                for user in store.get_users_by_topic(&topic) {
                    println!("- {user}");
                }
            }
            _ => {}
        },

        Command::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definitions_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_update_user_flags() {
        let cli = Cli::try_parse_from([
            "skymem",
            "update-user",
            "alice.bsky.social",
            "--add-interest",
            "rust",
            "--add-note",
            "met at rustconf",
        ])
        .unwrap();

        match cli.command {
            Command::UpdateUser {
                handle,
                add_interest,
                add_note,
            } => {
                assert_eq!(handle, "alice.bsky.social");
                assert_eq!(add_interest.as_deref(), Some("rust"));
                assert_eq!(add_note.as_deref(), Some("met at rustconf"));
            }
            _ => panic!("wrong subcommand"),
        }
    }

    #[test]
    fn parses_topic_add() {
        let cli = Cli::try_parse_from([
            "skymem", "topic", "rust", "--add", "--handle", "alice",
        ])
        .unwrap();

        match cli.command {
            Command::Topic {
                topic,
                add,
                get,
                handle,
            } => {
                assert_eq!(topic, "rust");
                assert!(add);
                assert!(!get);
                assert_eq!(handle.as_deref(), Some("alice"));
            }
            _ => panic!("wrong subcommand"),
        }
    }
}
