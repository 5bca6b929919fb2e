use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Args {
    /// Play audio in realtime
    #[arg(long, default_value_t = true, num_args = 0..=1, default_missing_value = "true")]
    pub play: bool,

    /// Write audio to wav file
    #[arg(long)]
    pub wav: Option<String>,

    /// Performance score path (.toml); a built-in demo plays when omitted
    #[arg(value_name = "SCORE_PATH")]
    pub score: Option<String>,

    /// Path to config TOML
    #[arg(long, default_value = "physiboard.toml")]
    pub config: String,

    /// Stop after this many seconds (default: score end plus a short tail)
    #[arg(long)]
    pub duration: Option<f32>,
}
