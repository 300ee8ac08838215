use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Reserved `--save`/`--load` value: show the catalog, or skip saving.
pub const SENTINEL: &str = "..";

/// Flag names as they appear in the option set and in the preset file.
pub mod key {
    pub const SAVE: &str = "save";
    pub const LOAD: &str = "load";
    pub const DOWNLOAD_PATH: &str = "d";
    pub const POSITIONAL: &str = "_";
    pub const PROGRAM: &str = "$0";

    pub const USER: &str = "u";
    pub const HANDOUTS: &str = "h";
    pub const PYTHON: &str = "py";
    pub const PROXY: &str = "proxy";
    pub const PROXY_TEST: &str = "test";
    pub const COURSEWARE: &str = "cw";
    pub const DUMP_LIST: &str = "cwd";
    pub const CLOSED_CAPTIONS: &str = "cc";
    pub const HIGH_QUALITY: &str = "hq";
    pub const NO_CHECK_CERT: &str = "ncc";
    pub const UNZIP: &str = "uz";
    pub const COURSE_ORDER: &str = "co";
    pub const VERBOSE: &str = "verbose";
}

/// A single flag value, stored untagged so the preset file stays plain JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Flag(bool),
    Number(serde_json::Number),
    Text(String),
    List(Vec<String>),
}

impl OptionValue {
    /// Whether the value counts as "set": `false`, `0` and `""` do not.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Flag(b) => *b,
            Self::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
            Self::Text(s) => !s.is_empty(),
            Self::List(_) => true,
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
            Self::List(items) => f.write_str(&items.join(" ")),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Flag name to value mapping, either a live invocation or a stored preset.
///
/// Unknown keys are carried through untouched so presets written by newer
/// versions of the tool survive a round trip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionSet(BTreeMap<String, OptionValue>);

impl OptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<OptionValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<OptionValue> {
        self.0.remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &OptionValue)> {
        self.0.iter()
    }

    /// Truthiness of a flag; a missing key is false.
    pub fn flag(&self, key: &str) -> bool {
        self.get(key).is_some_and(OptionValue::is_truthy)
    }

    /// The value of a text flag, if it holds non-empty text.
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.get(key) {
            Some(OptionValue::Text(s)) if !s.is_empty() => Some(s),
            _ => None,
        }
    }

    /// Copy of the set with `keys` removed.
    pub fn without(&self, keys: &[&str]) -> Self {
        let mut out = self.clone();
        for key in keys {
            out.remove(key);
        }
        out
    }
}

impl<K: Into<String>, V: Into<OptionValue>> FromIterator<(K, V)> for OptionSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
