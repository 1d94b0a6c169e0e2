//! Command line arguments

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "fln-identity", version, about = "Freelancer Identity OAuth2 client")]
pub struct Opt {
    /// Settings file (defaults to `fln-identity.toml` when present).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the URL the user must visit to authorise this client.
    AuthorizeUrl {
        /// Use this `state` instead of a random one.
        #[arg(long)]
        state: Option<String>,
    },

    /// Exchange an authorization code for an access token.
    Exchange {
        /// Code received on the redirect URI.
        #[arg(long)]
        code: String,

        /// Write the token to this file instead of stdout.
        #[arg(long = "token-out")]
        token_out: Option<PathBuf>,
    },

    /// Fetch the profile of the token's owner.
    Me {
        /// Token file written by `exchange`.
        #[arg(long = "token-file")]
        token_file: PathBuf,
    },
}
