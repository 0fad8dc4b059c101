use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "theatre")]
#[command(about = "Terminal Theatre interactive fiction player")]
#[command(version)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Mode,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Mode {
    /// Play a story interactively over stdin/stdout.
    Play(PlayArgs),
    /// Step a story one boundary at a time through state files.
    Agent(AgentArgs),
    /// Inspect and manage save slots.
    Saves(SavesArgs),
    /// Report story connectivity.
    Check(CheckArgs),
}

#[derive(Debug, Args)]
pub(crate) struct PlayArgs {
    #[arg(long = "story", conflicts_with = "stories_dir")]
    pub(crate) story: Option<String>,
    #[arg(long = "stories-dir")]
    pub(crate) stories_dir: Option<String>,
    #[arg(long = "save-dir", env = "THEATRE_SAVE_DIR")]
    pub(crate) save_dir: Option<String>,
    #[arg(
        long = "autosave-interval",
        env = "THEATRE_AUTOSAVE_INTERVAL",
        default_value_t = 1
    )]
    pub(crate) autosave_interval: u32,
    #[arg(long = "load", conflicts_with = "continue_game")]
    pub(crate) load: Option<u32>,
    #[arg(long = "continue")]
    pub(crate) continue_game: bool,
}

#[derive(Debug, Args)]
pub(crate) struct AgentArgs {
    #[command(subcommand)]
    pub(crate) command: AgentCommand,
}

#[derive(Debug, Subcommand)]
pub(crate) enum AgentCommand {
    Start(StartArgs),
    Choose(ChooseArgs),
}

#[derive(Debug, Args)]
pub(crate) struct StartArgs {
    #[arg(long = "story")]
    pub(crate) story: Option<String>,
    #[arg(long = "state-out")]
    pub(crate) state_out: String,
}

#[derive(Debug, Args)]
pub(crate) struct ChooseArgs {
    #[arg(long = "state-in")]
    pub(crate) state_in: String,
    #[arg(long = "choice")]
    pub(crate) choice: usize,
    #[arg(long = "state-out")]
    pub(crate) state_out: String,
    #[arg(long = "story")]
    pub(crate) story: Option<String>,
}

#[derive(Debug, Args)]
pub(crate) struct SavesArgs {
    #[arg(long = "save-dir", env = "THEATRE_SAVE_DIR", global = true)]
    pub(crate) save_dir: Option<String>,
    #[command(subcommand)]
    pub(crate) command: SavesCommand,
}

#[derive(Debug, Subcommand)]
pub(crate) enum SavesCommand {
    List,
    Delete { slot: u32 },
    Export { slot: u32, path: String },
    Import { path: String, slot: u32 },
}

#[derive(Debug, Args)]
pub(crate) struct CheckArgs {
    #[arg(long = "story")]
    pub(crate) story: Option<String>,
}
