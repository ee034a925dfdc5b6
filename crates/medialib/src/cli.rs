//! Clap derive structures for the `medialib` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use medialib_core::{Role, SourceKind};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// medialib -- browse, search and import portal workspace documents
#[derive(Debug, Parser)]
#[command(
    name = "medialib",
    version,
    about = "Browse and import documents from the portal's media library",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Portal profile to use
    #[arg(long, short = 'p', env = "MEDIALIB_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Portal URL (overrides profile)
    #[arg(long, env = "MEDIALIB_PORTAL", global = true)]
    pub portal: Option<String>,

    /// Portal session id (oneSessionId cookie)
    #[arg(long, env = "MEDIALIB_SESSION", global = true, hide_env_values = true)]
    pub session: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "MEDIALIB_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', env = "MEDIALIB_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "MEDIALIB_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

/// Document source as typed on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SourceArg {
    /// Media library copies (protected documents)
    App,
    /// Your own documents
    Mine,
    /// Documents shared with you
    Shared,
}

impl From<SourceArg> for SourceKind {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::App => SourceKind::App,
            SourceArg::Mine => SourceKind::Mine,
            SourceArg::Shared => SourceKind::Shared,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RoleArg {
    Doc,
    Xls,
    Img,
    Pdf,
    Ppt,
    Video,
    Audio,
    Unknown,
}

impl From<RoleArg> for Role {
    fn from(arg: RoleArg) -> Self {
        match arg {
            RoleArg::Doc => Role::Doc,
            RoleArg::Xls => Role::Xls,
            RoleArg::Img => Role::Img,
            RoleArg::Pdf => Role::Pdf,
            RoleArg::Ppt => Role::Ppt,
            RoleArg::Video => Role::Video,
            RoleArg::Audio => Role::Audio,
            RoleArg::Unknown => Role::Unknown,
        }
    }
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List and search documents
    #[command(alias = "ls")]
    Docs(DocsArgs),

    /// Browse your folders
    Folders(FoldersArgs),

    /// Upload files into the media library
    #[command(alias = "import")]
    Upload(UploadArgs),

    /// Make protected media-library copies of documents
    Duplicate(DuplicateArgs),

    /// List portal widgets
    Widgets(WidgetsArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct DocsArgs {
    /// Where to list from (defaults to what your rights allow)
    #[arg(long, short = 's', value_enum)]
    pub source: Option<SourceArg>,

    /// Only documents of this kind
    #[arg(long, short = 'r', value_enum)]
    pub role: Option<RoleArg>,

    /// Accent- and case-insensitive filename filter
    #[arg(long, short = 'f')]
    pub search: Option<String>,
}

#[derive(Debug, Args)]
pub struct FoldersArgs {
    #[command(subcommand)]
    pub command: FoldersCommand,
}

#[derive(Debug, Subcommand)]
pub enum FoldersCommand {
    /// List top-level folders
    List {
        /// Folder name filter
        #[arg(long, short = 'f')]
        search: Option<String>,
    },

    /// Open a folder and list its sub-folders and documents
    Open {
        /// Full folder path, e.g. Cours_Maths
        path: String,
    },
}

#[derive(Debug, Args)]
pub struct UploadArgs {
    /// Files to upload
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Args)]
pub struct DuplicateArgs {
    /// Source the documents are picked from
    #[arg(long, short = 's', value_enum, default_value = "shared")]
    pub source: SourceArg,

    /// Document ids
    #[arg(required = true)]
    pub ids: Vec<String>,
}

#[derive(Debug, Args)]
pub struct WidgetsArgs {
    /// Only this widget
    #[arg(long)]
    pub name: Option<String>,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file path
    Path,

    /// Show the current configuration
    Show,

    /// Set a profile value
    Set {
        /// portal, session_env, ca_cert, insecure, timeout, can_create, can_list, widgets
        key: String,
        value: String,
    },

    /// Store a session id for the active profile
    SetSession {
        /// Session id (oneSessionId cookie value)
        session_id: String,

        /// Write it into the config file instead of the system keyring
        #[arg(long)]
        plaintext: bool,
    },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}
