use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::options::{OptionSet, OptionValue, key};

const EXAMPLES: &str = "\
Examples:
  courseware-dl -d DIR                                   download videos from wiki
  courseware-dl -d DIR -u EMAIL --cw --hq --cc           HQ courseware videos with captions
  courseware-dl -d DIR -u EMAIL --cw --hq --save myvideo save options as `myvideo` and run
  courseware-dl -d DIR --load                            pick a saved preset and run
  courseware-dl -d DIR --load ..                         list saved presets, then pick one
  courseware-dl -d DIR -h --uz                           download and unzip handouts";

/// Course video and handout downloader
#[derive(Parser, Debug)]
#[command(version, about, disable_help_flag = true, after_help = EXAMPLES)]
pub struct Args {
    /// Download path
    #[arg(short = 'd', value_name = "PATH")]
    pub download_path: Option<String>,

    /// Email address
    #[arg(short = 'u', value_name = "EMAIL")]
    pub user: Option<String>,

    /// Switch from videos (default) to handouts
    #[arg(short = 'h')]
    pub handouts: bool,

    /// Python interpreter used by the video fetcher
    #[arg(long, value_name = "PATH")]
    pub py: Option<String>,

    /// Proxy for video download
    #[arg(long, value_name = "URL")]
    pub proxy: Option<String>,

    /// Use with --proxy to test if it is usable
    #[arg(long)]
    pub test: bool,

    /// Save options under a preset name (`..` to skip, no value to be asked)
    #[arg(long, value_name = "NAME", num_args = 0..=1, default_missing_value = "")]
    pub save: Option<String>,

    /// Load a preset by name (`..` to list presets, no value to pick one)
    #[arg(long, value_name = "NAME", num_args = 0..=1, default_missing_value = "")]
    pub load: Option<String>,

    /// Switch from wiki video lists (default) to courseware
    #[arg(long)]
    pub cw: bool,

    /// Same as --cw and dump the list of videos to a file in -d
    #[arg(long)]
    pub cwd: bool,

    /// Get closed captions
    #[arg(long)]
    pub cc: bool,

    /// Get high quality videos
    #[arg(long)]
    pub hq: bool,

    /// No check certificate
    #[arg(long)]
    pub ncc: bool,

    /// Unzip handout files
    #[arg(long)]
    pub uz: bool,

    /// Sequence video files in order of the courseware
    #[arg(long)]
    pub co: bool,

    /// Print debug information
    #[arg(long)]
    pub verbose: bool,

    /// Preset file (defaults to args.json next to the executable)
    #[arg(long, env = "COURSEWARE_DL_PRESETS", value_name = "FILE")]
    pub presets: Option<PathBuf>,

    /// Extra arguments
    pub args: Vec<String>,

    /// Print help
    #[allow(dead_code)]
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,
}

/// `--save`/`--load` given without a value mean "ask me".
fn control_value(value: &str) -> OptionValue {
    if value.is_empty() {
        OptionValue::Flag(true)
    } else {
        OptionValue::Text(value.to_string())
    }
}

impl Args {
    /// Flatten the parsed flags into an option set.
    ///
    /// Switches are always present (`false` when not given); valued flags only
    /// when given. The preset file location is not part of the set.
    pub fn to_options(&self, program: &str) -> OptionSet {
        let mut options = OptionSet::new();
        options.insert(key::PROGRAM, program);
        options.insert(key::POSITIONAL, OptionValue::List(self.args.clone()));

        let switches = [
            (key::HANDOUTS, self.handouts),
            (key::PROXY_TEST, self.test),
            (key::COURSEWARE, self.cw),
            (key::DUMP_LIST, self.cwd),
            (key::CLOSED_CAPTIONS, self.cc),
            (key::HIGH_QUALITY, self.hq),
            (key::NO_CHECK_CERT, self.ncc),
            (key::UNZIP, self.uz),
            (key::COURSE_ORDER, self.co),
            (key::VERBOSE, self.verbose),
        ];
        for (name, on) in switches {
            options.insert(name, on);
        }

        let values = [
            (key::DOWNLOAD_PATH, &self.download_path),
            (key::USER, &self.user),
            (key::PYTHON, &self.py),
            (key::PROXY, &self.proxy),
        ];
        for (name, value) in values {
            if let Some(value) = value {
                options.insert(name, value.as_str());
            }
        }

        for (name, value) in [(key::SAVE, &self.save), (key::LOAD, &self.load)] {
            if let Some(value) = value {
                options.insert(name, control_value(value));
            }
        }

        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> OptionSet {
        let argv = std::iter::once("courseware-dl").chain(argv.iter().copied());
        let args = Args::try_parse_from(argv).unwrap();
        args.to_options("courseware-dl")
    }

    #[test]
    fn test_switches_default_to_false() {
        let options = parse(&["-d", "/tmp/videos"]);

        assert_eq!(options.get("hq"), Some(&OptionValue::Flag(false)));
        assert_eq!(options.get("h"), Some(&OptionValue::Flag(false)));
        assert_eq!(options.text("d"), Some("/tmp/videos"));
        assert_eq!(options.text("$0"), Some("courseware-dl"));
        assert!(options.get("u").is_none());
        assert!(options.get("save").is_none());
        assert!(options.get("load").is_none());
    }

    #[test]
    fn test_short_h_is_handouts() {
        let options = parse(&["-d", "x", "-h", "--uz"]);
        assert!(options.flag("h"));
        assert!(options.flag("uz"));
    }

    #[test]
    fn test_bare_save_and_load_are_flags() {
        let options = parse(&["--save", "--load"]);
        assert_eq!(options.get("save"), Some(&OptionValue::Flag(true)));
        assert_eq!(options.get("load"), Some(&OptionValue::Flag(true)));
    }

    #[test]
    fn test_named_and_sentinel_values() {
        let options = parse(&["--save", "myvideo", "--load=.."]);
        assert_eq!(options.text("save"), Some("myvideo"));
        assert_eq!(options.text("load"), Some(".."));
    }

    #[test]
    fn test_valued_flags() {
        let options = parse(&[
            "-u",
            "a@b.com",
            "--proxy",
            "http://10.0.0.1:3128",
            "--py",
            "python2",
            "--test",
        ]);
        assert_eq!(options.text("u"), Some("a@b.com"));
        assert_eq!(options.text("proxy"), Some("http://10.0.0.1:3128"));
        assert_eq!(options.text("py"), Some("python2"));
        assert!(options.flag("test"));
    }

    #[test]
    fn test_download_path_is_optional_at_parse_time() {
        let options = parse(&["--load", "work"]);
        assert!(options.get("d").is_none());
    }
}
