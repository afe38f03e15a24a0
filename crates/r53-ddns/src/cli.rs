use clap::{Parser, Subcommand, ValueEnum};
use tracing::Level;

macro_rules! env_prefix {
    () => {
        "DDNS_"
    };
}

#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Set the log level of the application
    #[arg(
        value_enum,
        short = 'l',
        long,
        global = true,
        default_value_t = LogLevel::Info,
        value_name = "LEVEL",
        env = concat!(env_prefix!(), "LOG_LEVEL")
    )]
    pub log_level: LogLevel,

    /// What to do; defaults to `run`
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// The requested command, `run` when none was given
    pub fn selected_command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Run { json: false })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Point the record at the current public IP if it differs
    Run {
        /// Print the outcome as JSON on stdout
        #[arg(long, action, default_value_t = false)]
        json: bool,
    },

    /// Print the current public IP and exit
    WhatsMyIp,

    /// Print the IP currently published in the record and exit
    RegisteredIp,
}

/// Used to set the application's log level
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}
