use crate::options::{OptionSet, key};

/// Keys stripped from every resolved option set so a loaded preset never
/// triggers another save or load.
pub const CONTROL_KEYS: [&str; 2] = [key::SAVE, key::LOAD];

/// Keys that are never written into a preset.
pub const UNSAVED_KEYS: [&str; 5] = [
    key::SAVE,
    key::LOAD,
    key::DOWNLOAD_PATH,
    key::POSITIONAL,
    key::PROGRAM,
];

/// Combine a stored preset with the live invocation.
///
/// Stored values win wherever the preset has the key; everything else falls
/// back to the live value. Control keys are removed afterwards regardless of
/// which side they came from.
pub fn merge(stored: &OptionSet, live: &OptionSet) -> OptionSet {
    let mut merged = live.clone();
    for (key, value) in stored.iter() {
        merged.insert(key.clone(), value.clone());
    }
    merged.without(&CONTROL_KEYS)
}

/// The part of the live invocation that is worth persisting.
pub fn sanitize(live: &OptionSet) -> OptionSet {
    live.without(&UNSAVED_KEYS)
}
