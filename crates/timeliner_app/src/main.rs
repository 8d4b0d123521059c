// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timeliner - headless timeline host
//!
//! Replays a pointer script against a timeline view, the way an interactive
//! host would feed it, and prints the result:
//! - the built scene as RON (default)
//! - a document summary as JSON (`--json`)
//!
//! ```text
//! timeliner [--config view.ron] [--json] script.ron
//! ```

mod error;
mod script;
mod summary;

use clap::Parser;
use error::Result;
use script::Script;
use std::path::PathBuf;
use summary::DocumentSummary;
use timeliner_view::ViewConfig;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Parsed command line
#[derive(Debug, Default, PartialEq, Parser)]
#[command(name = "timeliner", about = "Replay a pointer script against a timeline view", version)]
struct Options {
    /// View configuration (RON); defaults apply when absent
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print a JSON document summary instead of the RON scene
    #[arg(long)]
    json: bool,

    /// Pointer script (RON)
    script: PathBuf,
}

fn run(options: &Options) -> Result<String> {
    let config = match &options.config {
        Some(path) => ViewConfig::load(path)?,
        None => ViewConfig::default(),
    };
    let script = Script::load(&options.script)?;
    tracing::info!(
        "Replaying {} ({} tracks, {} steps)",
        options.script.display(),
        script.tracks.len(),
        script.steps.len()
    );

    let mut view = script.replay(config)?;

    if options.json {
        Ok(serde_json::to_string_pretty(&DocumentSummary::of(&view))?)
    } else {
        let root = view.build_svg_root();
        Ok(ron::ser::to_string_pretty(root, ron::ser::PrettyConfig::default())?)
    }
}

fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("timeliner=debug,timeliner_view=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting Timeliner v{}", env!("CARGO_PKG_VERSION"));

    let options = Options::parse();
    match run(&options) {
        Ok(output) => println!("{output}"),
        Err(e) => {
            tracing::error!("Replay failed: {e}");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HarnessError;
    use clap::error::ErrorKind;

    #[test]
    fn test_parse_options() {
        let options =
            Options::try_parse_from(["timeliner", "--json", "--config", "view.ron", "s.ron"]).unwrap();
        assert_eq!(
            options,
            Options {
                config: Some(PathBuf::from("view.ron")),
                json: true,
                script: PathBuf::from("s.ron"),
            }
        );

        let plain = Options::try_parse_from(["timeliner", "s.ron"]).unwrap();
        assert_eq!(plain.config, None);
        assert!(!plain.json);
    }

    #[test]
    fn test_parse_rejects_bad_usage() {
        let kind = |args: &[&str]| Options::try_parse_from(args).unwrap_err().kind();

        assert_eq!(kind(&["timeliner"]), ErrorKind::MissingRequiredArgument);
        assert_eq!(kind(&["timeliner", "s.ron", "--config"]), ErrorKind::InvalidValue);
        assert_eq!(kind(&["timeliner", "--fast", "s.ron"]), ErrorKind::UnknownArgument);
        assert_eq!(kind(&["timeliner", "a.ron", "b.ron"]), ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_missing_script_file_is_io_error() {
        let options = Options {
            script: PathBuf::from("/nonexistent/script.ron"),
            ..Options::default()
        };
        assert!(matches!(run(&options), Err(HarnessError::Io(_))));
    }
}
