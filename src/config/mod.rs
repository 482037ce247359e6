//! # Command line configuration

use crate::model::Range;
use color_eyre::eyre::WrapErr;
use color_eyre::Report;
use serde::{de, Deserialize, Deserializer};
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use structopt::StructOpt;
use tokio::fs::read_to_string;
use tracing::instrument;

/// The commandline flags for the editor
#[derive(Debug, StructOpt)]
pub struct Flags {
    /// Which config file to use
    #[structopt(long = "cfg", short = "c")]
    pub cfg: Option<PathBuf>,
    /// The HTML document to edit (if cfg isn't present)
    #[structopt(long = "input", short = "i")]
    pub input: Option<PathBuf>,
    /// A file with one editor command per line
    #[structopt(long = "script", short = "s")]
    pub script: Option<PathBuf>,
    /// Where to write the resulting HTML, stdout if missing
    #[structopt(long = "output", short = "o")]
    pub output: Option<PathBuf>,
    /// Print the document, toolbar state and statistics as JSON
    #[structopt(long = "json")]
    pub json: bool,
    /// Print word and character counts
    #[structopt(long = "stats")]
    pub stats: bool,
}

/// What to print after the script ran
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ReportOptions {
    #[serde(default)]
    pub json: bool,
    #[serde(default)]
    pub stats: bool,
}

/// The setup that we are actually using
#[derive(Debug, Default)]
pub struct Setup {
    /// The document to load
    pub document: Option<PathBuf>,
    /// The commands to run
    pub script: Option<PathBuf>,
    /// Where to save the document
    pub output: Option<PathBuf>,
    /// The selection to start with
    pub selection: Option<Range>,
    /// What to print
    pub report: ReportOptions,
}

impl Flags {
    #[instrument]
    /// Load the configuration from a file
    pub async fn load_cfg(&self) -> Result<Setup, Report> {
        if let Some(cfg) = &self.cfg {
            let cfg_string: String = read_to_string(cfg)
                .await
                .wrap_err("Could not read config file")?;
            let config: Config =
                toml::from_str(&cfg_string).wrap_err("Could not parse config file")?;
            Ok(Setup {
                document: config.document,
                script: config.script,
                output: config.output,
                selection: config.selection,
                report: config.report,
            })
        } else {
            Ok(Setup {
                document: self.input.clone(),
                script: self.script.clone(),
                output: self.output.clone(),
                selection: None,
                report: ReportOptions {
                    json: self.json,
                    stats: self.stats,
                },
            })
        }
    }
}

/// A configuration file
#[derive(Debug, Deserialize)]
pub struct Config {
    /// The document to load
    pub document: Option<PathBuf>,
    /// The commands to run
    pub script: Option<PathBuf>,
    /// Where to save the document
    pub output: Option<PathBuf>,
    /// The selection to start with, e.g. `0.0:0-0.0:5`
    #[serde(default, deserialize_with = "deserialize_opt_from_str")]
    pub selection: Option<Range>,
    /// What to print
    #[serde(default)]
    pub report: ReportOptions,
}

// Reads an optional string and parses it with FromStr
fn deserialize_opt_from_str<'de, S, D>(deserializer: D) -> Result<Option<S>, D::Error>
where
    S: FromStr,
    S::Err: Display,
    D: Deserializer<'de>,
{
    let s: Option<String> = Deserialize::deserialize(deserializer)?;
    s.map(|s| S::from_str(&s).map_err(de::Error::custom))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::{Config, Flags};
    use crate::model::{Point, Range};
    use structopt::StructOpt;

    #[test]
    fn test_config() {
        let config: Config = toml::from_str(
            r#"
            document = "entry.html"
            selection = "0.0:0-1.0:2"

            [report]
            json = true
            "#,
        )
        .unwrap();
        assert_eq!(config.document.unwrap().to_str(), Some("entry.html"));
        assert_eq!(
            config.selection,
            Some(Range::new(Point::new(vec![0, 0], 0), Point::new(vec![1, 0], 2)))
        );
        assert!(config.report.json);
        assert!(!config.report.stats);

        assert!(toml::from_str::<Config>(r#"selection = "0.x""#).is_err());
        let empty: Config = toml::from_str("").unwrap();
        assert!(empty.selection.is_none());
    }

    #[tokio::test]
    async fn test_flags() {
        let flags = Flags::from_iter(&["journal-editor", "-i", "a.html", "--stats"]);
        let setup = flags.load_cfg().await.unwrap();
        assert_eq!(setup.document.unwrap().to_str(), Some("a.html"));
        assert!(setup.report.stats);
        assert!(!setup.report.json);
        assert!(setup.output.is_none());
    }
}
