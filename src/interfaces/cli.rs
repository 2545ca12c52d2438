use crate::infrastructure::config::BackendKind;
use clap::{Parser, ValueEnum};

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum BackendArg {
    Local,
    Remote,
}

impl From<BackendArg> for BackendKind {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Local => BackendKind::Local,
            BackendArg::Remote => BackendKind::Remote,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "tt")]
#[command(about = "Translate as you type.")]
#[command(version)]
pub struct Cli {
    /// Translation backend (overrides config)
    #[arg(short = 'b', long, value_enum)]
    pub backend: Option<BackendArg>,

    /// Quiet period before a lookup starts, in milliseconds
    #[arg(short = 'd', long)]
    pub debounce_ms: Option<u64>,

    /// Minimum query length in characters
    #[arg(short = 'm', long)]
    pub min_chars: Option<usize>,

    /// Simulate typing TEXT one character at a time, then exit
    #[arg(long = "type", value_name = "TEXT")]
    pub type_text: Option<String>,

    /// Delay between simulated keystrokes, in milliseconds
    #[arg(long, default_value_t = 120)]
    pub interval_ms: u64,

    /// Choose color theme
    #[arg(short = 'T', long)]
    pub theme: Option<String>,

    /// Generate config sample
    #[arg(long)]
    pub generate_config: bool,

    /// Edit configuration file
    #[arg(long)]
    pub edit_config: bool,

    /// Show status
    #[arg(long)]
    pub status: bool,
}
