use clap::Parser;

/// Argument grammar for the `history` builtin:
/// `history [n]`, `history -r <path>`, `history -w <path>`,
/// `history -a <path>`.
#[derive(Parser, Debug, PartialEq, Eq)]
#[command(name = "history", about = "Display or persist command history", no_binary_name = true)]
pub struct HistoryArgs {
    /// Show only the last N entries.
    pub limit: Option<usize>,

    /// Read entries from a file and append them to the in-memory history.
    #[arg(short = 'r', value_name = "PATH")]
    pub read: Option<String>,

    /// Write the whole history to a file, one entry per line.
    #[arg(short = 'w', value_name = "PATH")]
    pub write: Option<String>,

    /// Append entries recorded since the previous `-a` to a file.
    #[arg(short = 'a', value_name = "PATH")]
    pub append: Option<String>,
}

impl HistoryArgs {
    pub fn parse_args(args: &[String]) -> Result<Self, clap::Error> {
        Self::try_parse_from(args)
    }
}
