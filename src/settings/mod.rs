//! User preferences with change notification.
//!
//! [`SettingsStore`] owns the current [`Settings`], persists every change
//! through an injected [`SettingsBackend`] and notifies subscribers with a
//! [`SettingsEvent`] after each effective change. Setting a value to what it
//! already is neither writes nor notifies.
//!
//! ```
//! use molsift::settings::{Language, MemoryBackend, SettingsEvent, SettingsStore};
//! use std::sync::{Arc, Mutex};
//!
//! let store = SettingsStore::open(MemoryBackend::new())?;
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&seen);
//! store.subscribe(move |event: &SettingsEvent| sink.lock().unwrap().push(*event));
//!
//! store.set_language(Language::Zh)?;
//! assert_eq!(store.current().language, Language::Zh);
//! assert_eq!(seen.lock().unwrap().len(), 1);
//! # Ok::<(), molsift::settings::Error>(())
//! ```

mod backend;
mod error;

pub use backend::{MemoryBackend, SettingsBackend, TomlFileBackend};
pub use error::Error;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Zh,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::En => write!(f, "en"),
            Language::Zh => write!(f, "zh"),
        }
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Ok(Language::En),
            "zh" | "chinese" | "zh-cn" => Ok(Language::Zh),
            _ => Err(Error::UnknownValue {
                kind: "language",
                value: s.to_string(),
                expected: "en, zh",
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

impl FromStr for Theme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(Error::UnknownValue {
                kind: "theme",
                value: s.to_string(),
                expected: "light, dark",
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub language: Language,
    pub theme: Theme,
}

/// Published after a setting actually changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsEvent {
    LanguageChanged { old: Language, new: Language },
    ThemeChanged { old: Theme, new: Theme },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Callback = Arc<dyn Fn(&SettingsEvent) + Send + Sync>;

pub struct SettingsStore<B: SettingsBackend> {
    backend: B,
    current: RwLock<Settings>,
    subscribers: Mutex<Vec<(SubscriptionId, Callback)>>,
    next_id: AtomicU64,
}

impl<B: SettingsBackend> SettingsStore<B> {
    /// Loads settings from `backend`, falling back to defaults when empty.
    pub fn open(backend: B) -> Result<Self, Error> {
        let current = backend.load()?.unwrap_or_default();
        debug!(language = %current.language, theme = %current.theme, "settings loaded");
        Ok(Self {
            backend,
            current: RwLock::new(current),
            subscribers: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        })
    }

    pub fn current(&self) -> Settings {
        *self.current.read().unwrap_or_else(|e| e.into_inner())
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn set_language(&self, language: Language) -> Result<(), Error> {
        self.apply(|s| {
            let old = s.language;
            s.language = language;
            (old != language).then_some(SettingsEvent::LanguageChanged { old, new: language })
        })
    }

    pub fn set_theme(&self, theme: Theme) -> Result<(), Error> {
        self.apply(|s| {
            let old = s.theme;
            s.theme = theme;
            (old != theme).then_some(SettingsEvent::ThemeChanged { old, new: theme })
        })
    }

    /// Registers `callback` for every future [`SettingsEvent`].
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&SettingsEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscribers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((id, Arc::new(callback)));
        id
    }

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.lock().unwrap_or_else(|e| e.into_inner());
        let before = subscribers.len();
        subscribers.retain(|(sid, _)| *sid != id);
        subscribers.len() != before
    }

    fn apply<F>(&self, change: F) -> Result<(), Error>
    where
        F: FnOnce(&mut Settings) -> Option<SettingsEvent>,
    {
        let event = {
            let mut current = self.current.write().unwrap_or_else(|e| e.into_inner());
            let mut next = *current;
            let Some(event) = change(&mut next) else {
                return Ok(());
            };
            self.backend.save(&next)?;
            *current = next;
            event
        };

        debug!(?event, "settings changed");
        self.publish(&event);
        Ok(())
    }

    /// Callbacks run without the subscriber lock held, so they may
    /// subscribe or unsubscribe on this store.
    fn publish(&self, event: &SettingsEvent) {
        let callbacks: Vec<Callback> = self
            .subscribers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();
        for callback in callbacks {
            callback(event);
        }
    }
}

impl<B: SettingsBackend + fmt::Debug> fmt::Debug for SettingsStore<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettingsStore")
            .field("backend", &self.backend)
            .field("current", &self.current())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::OnceLock;
    use std::sync::atomic::AtomicUsize;

    struct FailingBackend;

    impl SettingsBackend for FailingBackend {
        fn load(&self) -> Result<Option<Settings>, Error> {
            Ok(None)
        }

        fn save(&self, _settings: &Settings) -> Result<(), Error> {
            Err(Error::Io {
                path: "unwritable".into(),
                source: std::io::Error::other("read-only"),
            })
        }
    }

    fn recorder<B: SettingsBackend>(
        store: &SettingsStore<B>,
    ) -> (SubscriptionId, Arc<Mutex<Vec<SettingsEvent>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let id = store.subscribe(move |e| sink.lock().unwrap().push(*e));
        (id, events)
    }

    #[test]
    fn opens_with_defaults_when_backend_is_empty() {
        let store = SettingsStore::open(MemoryBackend::new()).unwrap();
        assert_eq!(store.current(), Settings::default());
        assert_eq!(store.current().language, Language::En);
        assert_eq!(store.current().theme, Theme::Light);
    }

    #[test]
    fn opens_with_stored_settings() {
        let stored = Settings {
            language: Language::Zh,
            theme: Theme::Dark,
        };
        let store = SettingsStore::open(MemoryBackend::with_settings(stored)).unwrap();
        assert_eq!(store.current(), stored);
    }

    #[test]
    fn changes_are_persisted_and_published() {
        let store = SettingsStore::open(MemoryBackend::new()).unwrap();
        let (_, events) = recorder(&store);

        store.set_theme(Theme::Dark).unwrap();
        store.set_language(Language::Zh).unwrap();

        assert_eq!(
            store.backend().stored(),
            Some(Settings {
                language: Language::Zh,
                theme: Theme::Dark
            })
        );
        assert_eq!(
            *events.lock().unwrap(),
            vec![
                SettingsEvent::ThemeChanged {
                    old: Theme::Light,
                    new: Theme::Dark
                },
                SettingsEvent::LanguageChanged {
                    old: Language::En,
                    new: Language::Zh
                },
            ]
        );
    }

    #[test]
    fn unchanged_values_do_not_notify_or_save() {
        let store = SettingsStore::open(MemoryBackend::new()).unwrap();
        let (_, events) = recorder(&store);

        store.set_language(Language::En).unwrap();

        assert!(events.lock().unwrap().is_empty());
        assert!(store.backend().stored().is_none());
    }

    #[test]
    fn unsubscribed_callbacks_stop_receiving() {
        let store = SettingsStore::open(MemoryBackend::new()).unwrap();
        let (first, first_events) = recorder(&store);
        let (_, second_events) = recorder(&store);

        assert!(store.unsubscribe(first));
        assert!(!store.unsubscribe(first));

        store.set_theme(Theme::Dark).unwrap();
        assert!(first_events.lock().unwrap().is_empty());
        assert_eq!(second_events.lock().unwrap().len(), 1);
    }

    #[test]
    fn callback_may_unsubscribe_itself() {
        let store = Arc::new(SettingsStore::open(MemoryBackend::new()).unwrap());
        let own_id = Arc::new(OnceLock::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let weak = Arc::downgrade(&store);
        let id_slot = Arc::clone(&own_id);
        let counter = Arc::clone(&calls);
        let id = store.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            if let (Some(store), Some(id)) = (weak.upgrade(), id_slot.get()) {
                assert!(store.unsubscribe(*id));
                store.subscribe(|_| {});
            }
        });
        own_id.set(id).unwrap();

        store.set_language(Language::Zh).unwrap();
        store.set_theme(Theme::Dark).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!store.unsubscribe(id));
    }

    #[test]
    fn failed_save_leaves_state_untouched() {
        let store = SettingsStore::open(FailingBackend).unwrap();
        let (_, events) = recorder(&store);

        assert!(store.set_theme(Theme::Dark).is_err());
        assert_eq!(store.current().theme, Theme::Light);
        assert!(events.lock().unwrap().is_empty());
    }

    #[test]
    fn store_is_shareable_across_threads() {
        let store = Arc::new(SettingsStore::open(MemoryBackend::new()).unwrap());
        let (_, events) = recorder(&store);

        let handles: Vec<_> = [Theme::Dark, Theme::Light, Theme::Dark]
            .into_iter()
            .map(|theme| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || store.set_theme(theme).unwrap())
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let events = events.lock().unwrap();
        assert!(events.len() <= 3);
        if let Some(SettingsEvent::ThemeChanged { new, .. }) = events.last() {
            assert_eq!(*new, store.current().theme);
        }
    }

    #[test]
    fn language_and_theme_parse_from_strings() {
        assert_eq!("ZH".parse::<Language>().unwrap(), Language::Zh);
        assert_eq!("english".parse::<Language>().unwrap(), Language::En);
        assert_eq!(" Dark ".parse::<Theme>().unwrap(), Theme::Dark);

        let err = "fr".parse::<Language>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown language 'fr' (expected one of: en, zh)"
        );
        assert!("sepia".parse::<Theme>().is_err());
    }
}
