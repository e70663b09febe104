use std::path::PathBuf;

mod lint;
mod terminal;

use clap::ArgAction;
use lint::Lint;
use sshd_config::{ConfigFile, Directives, storage};
use terminal::Colorize;
use tracing::{debug, instrument};

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The sshd configuration file to read and modify
    #[arg(short, long, default_value = storage::DEFAULT_PATH, global = true)]
    filename: PathBuf,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let file = ConfigFile::new(self.filename);
        let directives = load(&file);
        self.command.run(&file, directives)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        // stdout is reserved for command output
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

/// Load the configuration, falling back to an empty one.
///
/// Failures are reported on stderr but are never fatal.
fn load(file: &ConfigFile) -> Directives {
    file.load().unwrap_or_else(|error| {
        debug!(path = %file.path().display(), %error, "continuing with no directives");
        match error {
            storage::Error::Parse(_) => eprintln!("{}", format!("warning: {error}").warning()),
            storage::Error::FileAccess { .. } => {
                eprintln!("{}", format!("error: {error}").error());
            }
        }
        Directives::default()
    })
}

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Print each value of a key on its own line
    Get(Get),

    /// Add a value to a key, keeping existing values
    Add(Add),

    /// Replace all values of a key with a single value
    Set(Set),

    /// Remove all instances of a key
    Unset(Unset),

    /// Lint the configuration against security best practices
    ///
    /// Exits with status 1 if any violation is found.
    Lint(Lint),
}

impl Command {
    fn run(self, file: &ConfigFile, directives: Directives) -> anyhow::Result<()> {
        match self {
            Self::Get(command) => command.run(&directives),
            Self::Add(command) => command.run(file, directives)?,
            Self::Set(command) => command.run(file, directives)?,
            Self::Unset(command) => command.run(file, directives)?,
            Self::Lint(command) => command.run(&directives)?,
        }
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Get {
    /// The directive name, e.g. 'PermitRootLogin'
    key: String,
}

impl Get {
    #[instrument(skip(directives))]
    fn run(self, directives: &Directives) {
        for value in directives.values(&self.key) {
            println!("{value}");
        }
    }
}

#[derive(Debug, clap::Parser)]
pub struct Add {
    /// The directive name, e.g. 'Port'
    key: String,

    /// The value to add in front of any existing values
    #[arg(allow_hyphen_values = true)]
    value: String,
}

impl Add {
    #[instrument(skip(file, directives))]
    fn run(self, file: &ConfigFile, mut directives: Directives) -> anyhow::Result<()> {
        directives.add(&self.key, self.value);
        file.save(&directives)?;
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Set {
    /// The directive name, e.g. 'UsePAM'
    key: String,

    /// The value that replaces all existing values
    #[arg(allow_hyphen_values = true)]
    value: String,
}

impl Set {
    #[instrument(skip(file, directives))]
    fn run(self, file: &ConfigFile, mut directives: Directives) -> anyhow::Result<()> {
        directives.set(&self.key, self.value);
        file.save(&directives)?;
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Unset {
    /// The directive name to remove
    key: String,
}

impl Unset {
    #[instrument(skip(file, directives))]
    fn run(self, file: &ConfigFile, mut directives: Directives) -> anyhow::Result<()> {
        directives.unset(&self.key);
        file.save(&directives)?;
        Ok(())
    }
}
