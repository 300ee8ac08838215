mod catalog;
mod cli;
mod flow;
mod merge;
mod options;
mod prompt;
mod store;

use anyhow::{Context, Result, anyhow};
use clap::Parser;

use crate::cli::Args;
use crate::flow::Flow;
use crate::options::{OptionSet, key};
use crate::prompt::Terminal;
use crate::store::PresetStore;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    let preset_path = match &args.presets {
        Some(path) => path.clone(),
        None => store::default_location().context("failed to locate the preset file")?,
    };
    tracing::debug!("using preset file {}", preset_path.display());

    let program = std::env::args()
        .next()
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string());
    let live = args.to_options(&program);

    let mut flow = Flow::new(PresetStore::new(preset_path), Terminal::stdio());

    // A failed load has already been reported; there is nothing to run.
    match flow.dispatch(live, run).await {
        Some(result) => result,
        None => Ok(()),
    }
}

/// Hand-off point to the downloader once the options are final.
fn run(options: OptionSet) -> Result<()> {
    tracing::debug!("resolved options: {options:?}");

    let download_path = options
        .text(key::DOWNLOAD_PATH)
        .ok_or_else(|| anyhow!("missing download path, pass -d <PATH>"))?;

    let source = if options.flag(key::HANDOUTS) {
        "handouts"
    } else if options.flag(key::COURSEWARE) || options.flag(key::DUMP_LIST) {
        "courseware"
    } else {
        "wiki"
    };

    let switches: Vec<&str> = [
        (key::HIGH_QUALITY, "hq"),
        (key::CLOSED_CAPTIONS, "cc"),
        (key::COURSE_ORDER, "seq-order"),
        (key::DUMP_LIST, "dump-list"),
        (key::UNZIP, "unzip"),
        (key::NO_CHECK_CERT, "no-check-cert"),
        (key::PROXY_TEST, "proxy-test"),
    ]
    .into_iter()
    .filter(|(flag, _)| options.flag(flag))
    .map(|(_, label)| label)
    .collect();

    println!();
    println!("=== Options ===");
    println!("  Download path: {download_path}");
    println!("  Source: {source}");
    if let Some(user) = options.text(key::USER) {
        println!("  User: {user}");
    }
    if let Some(proxy) = options.text(key::PROXY) {
        println!("  Proxy: {proxy}");
    }
    if let Some(py) = options.text(key::PYTHON) {
        println!("  Python: {py}");
    }
    if !switches.is_empty() {
        println!("  Switches: {}", switches.join(", "));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::OptionValue;

    #[test]
    fn test_run_requires_download_path() {
        let options: OptionSet = [("cw", true)].into_iter().collect();
        let err = run(options).unwrap_err();
        assert!(err.to_string().contains("download path"));
    }

    #[test]
    fn test_run_accepts_loaded_preset_with_live_path() {
        let options: OptionSet = [
            ("d", OptionValue::from("/tmp/videos")),
            ("cw", true.into()),
            ("hq", true.into()),
        ]
        .into_iter()
        .collect();
        assert!(run(options).is_ok());
    }
}
