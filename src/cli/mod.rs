//! CLI definitions and entry point.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

pub mod commands;

/// Revenge of the Simple Issue Tracker: flat-file issues with a query language
#[derive(Parser, Debug)]
#[command(name = "rotsit", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Issue database path (default: issues.sitdb)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Actor name recorded on changes
    #[arg(long, global = true)]
    pub actor: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an empty issue database
    Init {
        /// Overwrite an existing database
        #[arg(long)]
        force: bool,
    },

    /// Open a new issue
    #[command(alias = "new")]
    Add(MessageArgs),

    /// Show issues in full, with comments
    Show {
        /// Issue GUIDs or unique prefixes
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Comment on an issue
    Comment(IdMessageArgs),

    /// Assign an issue to someone
    Assign(AssignArgs),

    /// Close an issue
    Close(IdMessageArgs),

    /// Reopen a closed or duplicate issue
    Reopen(IdMessageArgs),

    /// Mark an issue as a duplicate of another
    #[command(alias = "duplicate")]
    Dup(DupArgs),

    /// Dump every issue
    Export,

    /// List issues matching a query expression
    #[command(long_about = "List issues matching a query expression.

With no expression every issue is listed. Field names in the expression
are replaced by the issue's values before evaluation:

  guid order opened_by opened_on message status assigned_by assigned_to
  assigned_on closed_by closed_on closed_msg dup_by duplicates dup_msg

Operators, loosest binding first:  |  &  == !=  < <= > >=  + -  * /
'==' on text means \"left is contained in right\". Dates such as
'12 June 2016', 'Jun 12' or '12/6/2016 10:30' compare chronologically.

EXAMPLES:
  rotsit list 'status == \"open\"'
  rotsit list 'opened_on > \"1 Oct 2026\" & \"alice\" == assigned_to'
  rotsit list '\"crash\" == message'")]
    List(ListArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Where a message comes from. With neither flag set the editor is opened.
#[derive(Args, Debug, Clone, Default)]
pub struct MessageSource {
    /// Message text
    #[arg(short, long, conflicts_with = "file")]
    pub message: Option<String>,

    /// Read the message from a file ('-' for stdin)
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct MessageArgs {
    #[command(flatten)]
    pub source: MessageSource,
}

#[derive(Args, Debug, Clone)]
pub struct IdMessageArgs {
    /// Issue GUID or unique prefix
    pub id: String,

    #[command(flatten)]
    pub source: MessageSource,
}

#[derive(Args, Debug, Clone)]
pub struct AssignArgs {
    /// Issue GUID or unique prefix
    pub id: String,

    /// User the issue is assigned to
    pub user: String,
}

#[derive(Args, Debug, Clone)]
pub struct DupArgs {
    /// Issue GUID or unique prefix of the duplicate
    pub id: String,

    /// Issue GUID or unique prefix of the original
    pub original: String,

    #[command(flatten)]
    pub source: MessageSource,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Query expression (words are joined with spaces)
    pub expr: Vec<String>,
}

/// Arguments for the completions command.
#[derive(Args, Debug, Clone)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: ShellType,

    /// Output file (default: stdout)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

/// Supported shells for completion generation.
#[derive(ValueEnum, Debug, Clone, Copy, Eq, PartialEq)]
pub enum ShellType {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    #[value(name = "powershell")]
    #[value(alias = "pwsh")]
    /// `PowerShell`
    PowerShell,
    /// Elvish
    Elvish,
}
