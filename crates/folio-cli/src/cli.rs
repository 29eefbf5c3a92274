//! Command-line arguments.

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use folio_core::TokenStoreKind;

#[derive(Debug, Parser)]
#[command(name = "folio", version, about = "Manage the portfolio admin session")]
pub struct Cli {
    /// Backend base URL
    #[arg(long, env = "FOLIO_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Where to persist the access token
    #[arg(long, value_enum, global = true)]
    pub store: Option<StoreArg>,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in with email and password
    Login {
        /// Admin email (defaults to the last one used)
        #[arg(short, long, env = "FOLIO_EMAIL")]
        email: Option<String>,
    },
    /// Sign out and forget the stored token
    Logout,
    /// Restore the stored session and show who is signed in
    Status,
    /// Renew the access token now
    Refresh,
    /// Keep the session alive, printing every change until Ctrl-C
    Watch,
    /// Send a signed GET request and print the JSON response
    Get {
        /// Path relative to the backend, e.g. /api/projects
        path: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreArg {
    File,
    Keyring,
}

impl From<StoreArg> for TokenStoreKind {
    fn from(arg: StoreArg) -> Self {
        match arg {
            StoreArg::File => TokenStoreKind::File,
            StoreArg::Keyring => TokenStoreKind::Keyring,
        }
    }
}
