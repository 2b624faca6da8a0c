use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Affiliation dictionary (JSON); the built-in one is used if omitted
    #[arg(long, global = true, env = "AUTHORMATCH_DICTIONARY")]
    pub dictionary: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Normalize a collaborator file or a directory of them
    Normalize {
        /// File or directory to normalize
        path: String,

        /// Output file path
        #[arg(short, long, default_value = "output.json")]
        output_file: String,

        /// Strip lettered sub-items and split lines holding several groups
        #[arg(long)]
        lettered: bool,

        /// Maximum recursion depth (0 means no recursion)
        #[arg(short, long, default_value = "50")]
        max_depth: usize,

        /// Exclude patterns (glob patterns like "*.tmp" or "drafts")
        #[arg(short, long, value_delimiter = ',')]
        exclude: Vec<String>,
    },

    /// Check an author list against a collaborator list
    Conflicts {
        /// Free-form collaborator list
        #[arg(long)]
        collaborators: PathBuf,

        /// One author per line, e.g. "Jane Doe (MIT)"
        #[arg(long)]
        authors: PathBuf,

        /// Output file path
        #[arg(short, long, default_value = "output.json")]
        output_file: String,

        #[arg(long)]
        lettered: bool,
    },

    /// Report whether each text looks like an affiliation
    Classify {
        #[arg(required = true)]
        texts: Vec<String>,
    },
}
