use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "b2session", version, about = "Authorize a B2 account and hand the session to your shell")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Exchange an application key for a session and cache it
    Authorize(AuthorizeArgs),
    /// Print the cached session
    Show {
        #[arg(long, value_enum, default_value_t)]
        format: Format,
    },
    /// Remove the cached session
    Logout {
        /// Also delete the stored application key from the keychain
        #[arg(long)]
        forget_key: bool,
    },
}

#[derive(Debug, Args)]
pub struct AuthorizeArgs {
    /// Authorize endpoint URL
    #[arg(long, env = "B2_AUTH_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Application key ID (defaults to the last one used)
    #[arg(long, env = "B2_APPLICATION_KEY_ID")]
    pub key_id: Option<String>,

    /// Store the application key in the OS keychain after a successful authorize
    #[arg(long)]
    pub remember: bool,

    #[arg(long, value_enum, default_value_t)]
    pub format: Format,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Human readable summary
    #[default]
    Text,
    /// POSIX shell `export` lines
    Env,
    /// JSON object with the four session fields
    Json,
}
