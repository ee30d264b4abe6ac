use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format: "0.3.0" for releases, "0.3.0@abc1234 2024-01-15 14:30" for dev builds
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum PendingList {
    Tag,
    File,
}

#[derive(Parser, Debug)]
#[command(name = "memo", bin_name = "memo", version = get_version())]
#[command(about = "Capture web snippets as notes and commit them to GitHub", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Capture a note from a saved page and stage it
    Capture {
        /// HTML file of the page, or "-" for stdin
        page: PathBuf,

        /// URL the page was loaded from
        #[arg(long)]
        url: String,

        /// Highlighted text, used as the description
        #[arg(short, long)]
        selection: Option<String>,

        /// Tag to add (repeatable)
        #[arg(short, long = "tag")]
        tags: Vec<String>,

        /// Target file in the repository
        #[arg(short, long)]
        file: Option<String>,

        /// Override the extracted title
        #[arg(long)]
        title: Option<String>,

        /// Override the extracted link
        #[arg(long)]
        href: Option<String>,

        /// Override the description
        #[arg(short, long)]
        description: Option<String>,

        /// Do not contact the repository for tag and file suggestions
        #[arg(long)]
        offline: bool,
    },

    /// List staged notes
    #[command(alias = "ls")]
    Status,

    /// Remove one staged note
    Unstage {
        /// Target file the note is staged for
        file: String,

        /// Position in the file's list, 0 is the most recent
        index: usize,
    },

    /// Drop one pending manifest addition, keeping staged notes
    Forget {
        /// Which list to edit
        #[arg(value_enum)]
        list: PendingList,

        /// Position in the list, as shown by status
        index: usize,
    },

    /// Commit all staged notes to the repository
    Save,

    /// Discard all staged notes
    Clear,

    /// Get or set settings
    Config {
        /// Setting key (access-token, username, repo, place, manifest, api-url, branch, user-agent)
        key: Option<String>,

        /// Value to set
        value: Option<String>,
    },
}
