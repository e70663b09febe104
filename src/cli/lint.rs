use clap::Parser;
use sshd_config::{Directives, Report};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
pub struct Lint {
    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "text")]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    /// One diagnostic per line on stderr
    #[default]
    Text,
    /// A JSON report on stdout
    Json,
}

impl Lint {
    #[instrument(level = "debug", skip(directives))]
    pub fn run(self, directives: &Directives) -> anyhow::Result<()> {
        let report = sshd_config::lint::lint(directives);

        match self.output {
            OutputFormat::Text => Self::output_text(&report),
            OutputFormat::Json => Self::output_json(&report)?,
        }

        if !report.is_ok() {
            std::process::exit(1);
        }

        Ok(())
    }

    fn output_text(report: &Report) {
        let mut messages: Vec<String> = report
            .violations()
            .iter()
            .map(ToString::to_string)
            .collect();
        messages.sort();

        for message in messages {
            eprintln!("{}", format!("error: {message}").error());
        }
    }

    fn output_json(report: &Report) -> anyhow::Result<()> {
        println!("{}", serde_json::to_string_pretty(report)?);
        Ok(())
    }
}
