//! CLI argument parsing.
//!
//! Each subcommand maps onto one widget operation; `session` keeps the widgets
//! alive across many inputs the way the interactive page does.
use crate::qr::QrFormat;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "splitpay",
    version,
    about = "Split a bill and render a PromptPay QR code for each share",
    after_help = "Examples:\n  splitpay id add 081-234-5678 --label Personal\n  splitpay split --amount 1250 --people 4\n  splitpay split --amount 300 --format svg --out share.svg\n  splitpay session",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Config file (defaults to the platform config directory)
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Identifier store file, overriding the config
    #[arg(long, value_name = "PATH", global = true)]
    pub store: Option<PathBuf>,

    /// Read saved IDs but keep every change in memory
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Log debug detail to stderr
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Split(SplitArgs),
    /// Manage saved PromptPay IDs
    #[command(subcommand)]
    Id(IdCommand),
    Session(SessionArgs),
}

/// Split inputs; amounts are taken as typed so bad input behaves like the form.
#[derive(Parser, Debug)]
#[command(about = "Compute the per-person share and render its QR code")]
pub struct SplitArgs {
    /// Total bill amount
    #[arg(long, value_name = "AMOUNT", allow_hyphen_values = true)]
    pub amount: String,

    /// Number of people sharing the bill
    #[arg(long, value_name = "N", default_value = "1", allow_hyphen_values = true)]
    pub people: String,

    /// Bitmap format, overriding the config
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,

    /// Write the bitmap here instead of stdout
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum IdCommand {
    /// Save a PromptPay ID (the first one saved becomes selected)
    Add {
        /// Phone number or national ID; non-digits are ignored
        id: String,
        #[arg(long, default_value = "")]
        label: String,
    },
    /// List saved PromptPay IDs
    List {
        #[arg(long)]
        json: bool,
    },
    /// Select the PromptPay ID used for new QR codes
    Select { id: String },
    /// Delete the saved PromptPay ID at INDEX (as shown by `list`)
    Delete { index: usize },
}

#[derive(Parser, Debug)]
#[command(about = "Read commands from stdin and redraw after each one")]
pub struct SessionArgs {
    /// Print every published event as JSON on stderr
    #[arg(long)]
    pub trace_events: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum FormatArg {
    Terminal,
    Svg,
}

impl From<FormatArg> for QrFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Terminal => QrFormat::Terminal,
            FormatArg::Svg => QrFormat::Svg,
        }
    }
}
