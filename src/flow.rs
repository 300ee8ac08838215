use crate::catalog::Catalog;
use crate::options::{OptionSet, OptionValue, SENTINEL, key};
use crate::prompt::Prompt;
use crate::store::PresetStore;

/// What a `--save` or `--load` flag asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Request {
    /// Flag absent or false.
    Absent,
    /// A preset name was given.
    Named(String),
    /// The reserved `..` value.
    Sentinel,
    /// Bare flag: ask the user.
    Interactive,
}

impl Request {
    fn of(value: Option<&OptionValue>) -> Self {
        match value {
            None => Self::Absent,
            Some(v) if !v.is_truthy() => Self::Absent,
            Some(OptionValue::Text(s)) if s == SENTINEL => Self::Sentinel,
            Some(OptionValue::Text(s)) => Self::Named(s.clone()),
            Some(OptionValue::Number(n)) => Self::Named(n.to_string()),
            Some(OptionValue::Flag(_) | OptionValue::List(_)) => Self::Interactive,
        }
    }
}

/// Result of the load step.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Options to run with.
    Run(OptionSet),
    /// A problem was reported to the user; nothing should run.
    Stopped,
}

/// Applies `--save` and `--load` to the live invocation.
pub struct Flow<P> {
    store: PresetStore,
    prompt: P,
}

impl<P: Prompt> Flow<P> {
    pub fn new(store: PresetStore, prompt: P) -> Self {
        Self { store, prompt }
    }

    /// Save if asked, then resolve `--load`, then hand the result to `run`.
    ///
    /// `run` is called at most once, and not at all when loading failed.
    pub async fn dispatch<F, T>(&mut self, live: OptionSet, run: F) -> Option<T>
    where
        F: FnOnce(OptionSet) -> T,
    {
        let live = self.check_if_save(live).await;
        match self.check_if_load(live).await {
            Resolution::Run(options) => Some(run(options)),
            Resolution::Stopped => None,
        }
    }

    /// Persist the invocation when `--save` is set.
    ///
    /// Saving never stops the run: failures are reported and the options are
    /// returned unchanged (apart from `save` receiving a prompted name).
    pub async fn check_if_save(&mut self, mut live: OptionSet) -> OptionSet {
        match Request::of(live.get(key::SAVE)) {
            Request::Absent => {}
            Request::Sentinel => tracing::debug!("preset save skipped"),
            Request::Named(name) => self.save(&name, &live).await,
            Request::Interactive => match self.prompt.text("Preset name") {
                Ok(name) => {
                    live.insert(key::SAVE, name.clone());
                    self.save(&name, &live).await;
                }
                Err(e) => tracing::warn!("preset not saved: {e}"),
            },
        }
        live
    }

    /// Resolve the options to run with according to `--load`.
    pub async fn check_if_load(&mut self, mut live: OptionSet) -> Resolution {
        match Request::of(live.get(key::LOAD)) {
            Request::Absent => Resolution::Run(live),
            Request::Named(name) => self.load(&name, &live).await,
            Request::Interactive => self.choose(&live).await,
            Request::Sentinel => {
                if !self.show_catalog().await {
                    return Resolution::Stopped;
                }
                live.insert(key::LOAD, true);
                live.remove(key::SAVE);
                self.choose(&live).await
            }
        }
    }

    async fn save(&self, name: &str, live: &OptionSet) {
        match self.store.save(name, live).await {
            Ok(()) => tracing::info!(
                "preset '{name}' saved to {}",
                self.store.path().display()
            ),
            Err(e) => tracing::warn!("unable to save preset '{name}': {e}"),
        }
    }

    async fn load(&self, name: &str, live: &OptionSet) -> Resolution {
        match self.store.load(name, live).await {
            Ok(Some(options)) => {
                tracing::info!("loaded preset '{name}'");
                Resolution::Run(options)
            }
            Ok(None) => {
                tracing::warn!("preset '{name}' not found");
                Resolution::Stopped
            }
            Err(e) => {
                tracing::warn!("unable to load preset '{name}': {e}");
                Resolution::Stopped
            }
        }
    }

    async fn choose(&mut self, live: &OptionSet) -> Resolution {
        let names = match self.store.list_names().await {
            Ok(names) if !names.is_empty() => names,
            Ok(_) => {
                tracing::warn!("no presets found");
                return Resolution::Stopped;
            }
            Err(e) => {
                tracing::warn!("no presets found: {e}");
                return Resolution::Stopped;
            }
        };

        match self.prompt.choose("Select preset", &names) {
            Ok(name) => self.load(&name, live).await,
            Err(e) => {
                tracing::warn!("no preset selected: {e}");
                Resolution::Stopped
            }
        }
    }

    /// Print the preset table. Returns false when there is nothing to show.
    async fn show_catalog(&self) -> bool {
        match self.store.read().await {
            Ok(presets) => {
                println!("{}", Catalog::build(&presets));
                true
            }
            Err(e) => {
                tracing::warn!("no presets found: {e}");
                false
            }
        }
    }
}
