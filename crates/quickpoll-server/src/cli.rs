use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "quickpoll-server", version, about = "Poll and voting server")]
pub struct Args {
    /// Path to the TOML config file. Missing files fall back to defaults.
    #[arg(short, long, default_value = "quickpoll.toml")]
    pub config: String,

    /// Override `server.bind_address`.
    #[arg(long)]
    pub bind: Option<String>,
}
