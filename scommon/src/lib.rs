//! Shared utilities and strongly-typed common values for workspace crates.
//!
//! ```rust
//! use scommon::{GenerationOptions, MetadataMap, RunId, ThreadId};
//!
//! let thread = ThreadId::from("thread_1");
//! let run = RunId::new("run_1");
//! let mut metadata = MetadataMap::new();
//! metadata.insert("tenant".to_string(), "acme".to_string());
//!
//! let options = GenerationOptions::default().with_temperature(0.3).with_top_p(0.9);
//! assert_eq!(thread.as_str(), "thread_1");
//! assert_eq!(run.to_string(), "run_1");
//! assert_eq!(options.top_p, Some(0.9));
//! ```

pub mod future {
    //! Shared async future aliases.
    //!
    //! ```rust
    //! use scommon::BoxFuture;
    //!
    //! fn str_len<'a>(value: &'a str) -> BoxFuture<'a, usize> {
    //!     Box::pin(async move { value.len() })
    //! }
    //!
    //! let _future = str_len("hello");
    //! ```

    use std::future::Future;
    use std::pin::Pin;

    pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
}

pub mod context {
    //! Shared metadata and backend identifier newtypes.
    //!
    //! ```rust
    //! use scommon::{RunId, ThreadId};
    //!
    //! let thread = ThreadId::new("thread_42");
    //! let run = RunId::from("run_42");
    //!
    //! assert_eq!(thread.to_string(), "thread_42");
    //! assert_eq!(run.as_str(), "run_42");
    //! ```

    use std::collections::HashMap;
    use std::fmt::{Display, Formatter};

    pub type MetadataMap = HashMap<String, String>;

    /// Identifier of a backend-persisted conversation thread.
    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    pub struct ThreadId(String);

    impl ThreadId {
        pub fn new(value: impl Into<String>) -> Self {
            Self(value.into())
        }

        pub fn as_str(&self) -> &str {
            self.0.as_str()
        }
    }

    impl Display for ThreadId {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            f.write_str(&self.0)
        }
    }

    impl From<String> for ThreadId {
        fn from(value: String) -> Self {
            Self(value)
        }
    }

    impl From<&str> for ThreadId {
        fn from(value: &str) -> Self {
            Self(value.to_string())
        }
    }

    /// Identifier of one backend-tracked run on a thread.
    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    pub struct RunId(String);

    impl RunId {
        pub fn new(value: impl Into<String>) -> Self {
            Self(value.into())
        }

        pub fn as_str(&self) -> &str {
            self.0.as_str()
        }
    }

    impl Display for RunId {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            f.write_str(&self.0)
        }
    }

    impl From<String> for RunId {
        fn from(value: String) -> Self {
            Self(value)
        }
    }

    impl From<&str> for RunId {
        fn from(value: &str) -> Self {
            Self(value.to_string())
        }
    }
}

pub mod model {
    //! Shared generation settings used by request types.
    //!
    //! ```rust
    //! use scommon::GenerationOptions;
    //!
    //! let options = GenerationOptions::default()
    //!     .with_temperature(0.2)
    //!     .with_max_tokens(128);
    //!
    //! assert_eq!(options.temperature, Some(0.2));
    //! assert_eq!(options.max_tokens, Some(128));
    //! assert_eq!(options.top_p, None);
    //! ```

    #[derive(Debug, Clone, Copy, PartialEq, Default)]
    pub struct GenerationOptions {
        pub temperature: Option<f32>,
        pub top_p: Option<f32>,
        pub max_tokens: Option<u32>,
    }

    impl GenerationOptions {
        pub fn with_temperature(mut self, temperature: f32) -> Self {
            self.temperature = Some(temperature);
            self
        }

        pub fn with_top_p(mut self, top_p: f32) -> Self {
            self.top_p = Some(top_p);
            self
        }

        pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
            self.max_tokens = Some(max_tokens);
            self
        }
    }
}

pub mod registry {
    //! Generic registry map wrapper used by runtime registries.
    //!
    //! ```rust
    //! use scommon::Registry;
    //!
    //! let mut registry = Registry::new();
    //! registry.insert("alpha".to_string(), 1_u32);
    //!
    //! assert_eq!(registry.get("alpha"), Some(&1));
    //! assert!(registry.contains_key("alpha"));
    //! ```

    use std::borrow::Borrow;
    use std::collections::HashMap;
    use std::hash::Hash;

    #[derive(Debug, Clone)]
    pub struct Registry<K, V> {
        items: HashMap<K, V>,
    }

    impl<K, V> Default for Registry<K, V>
    where
        K: Eq + Hash,
    {
        fn default() -> Self {
            Self {
                items: HashMap::new(),
            }
        }
    }

    impl<K, V> Registry<K, V>
    where
        K: Eq + Hash,
    {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn insert(&mut self, key: K, value: V) -> Option<V> {
            self.items.insert(key, value)
        }

        pub fn get<Q>(&self, key: &Q) -> Option<&V>
        where
            K: Borrow<Q>,
            Q: Eq + Hash + ?Sized,
        {
            self.items.get(key)
        }

        pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
        where
            K: Borrow<Q>,
            Q: Eq + Hash + ?Sized,
        {
            self.items.remove(key)
        }

        pub fn contains_key<Q>(&self, key: &Q) -> bool
        where
            K: Borrow<Q>,
            Q: Eq + Hash + ?Sized,
        {
            self.items.contains_key(key)
        }

        pub fn keys(&self) -> impl Iterator<Item = &K> {
            self.items.keys()
        }

        pub fn len(&self) -> usize {
            self.items.len()
        }

        pub fn is_empty(&self) -> bool {
            self.items.is_empty()
        }
    }
}

pub mod time {
    //! Injectable suspension for backoff and polling waits.
    //!
    //! ```rust
    //! use std::time::Duration;
    //!
    //! use scommon::{DelaySleeper, Sleeper};
    //!
    //! fn accepts_sleeper(_sleeper: &dyn Sleeper) {}
    //!
    //! let sleeper = DelaySleeper;
    //! accepts_sleeper(&sleeper);
    //! let _pending = sleeper.sleep(Duration::from_millis(1));
    //! ```

    use std::sync::Mutex;
    use std::time::Duration;

    use crate::BoxFuture;

    pub trait Sleeper: Send + Sync {
        fn sleep<'a>(&'a self, duration: Duration) -> BoxFuture<'a, ()>;
    }

    /// Timer-backed sleeper used outside of tests.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct DelaySleeper;

    impl Sleeper for DelaySleeper {
        fn sleep<'a>(&'a self, duration: Duration) -> BoxFuture<'a, ()> {
            Box::pin(futures_timer::Delay::new(duration))
        }
    }

    /// Returns immediately and remembers every requested duration.
    #[derive(Debug, Default)]
    pub struct RecordingSleeper {
        sleeps: Mutex<Vec<Duration>>,
    }

    impl RecordingSleeper {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn recorded(&self) -> Vec<Duration> {
            self.sleeps
                .lock()
                .map(|sleeps| sleeps.clone())
                .unwrap_or_default()
        }

        pub fn count(&self) -> usize {
            self.sleeps.lock().map(|sleeps| sleeps.len()).unwrap_or(0)
        }
    }

    impl Sleeper for RecordingSleeper {
        fn sleep<'a>(&'a self, duration: Duration) -> BoxFuture<'a, ()> {
            if let Ok(mut sleeps) = self.sleeps.lock() {
                sleeps.push(duration);
            }
            Box::pin(async {})
        }
    }
}

pub use context::{MetadataMap, RunId, ThreadId};
pub use future::BoxFuture;
pub use model::GenerationOptions;
pub use registry::Registry;
pub use time::{DelaySleeper, RecordingSleeper, Sleeper};

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{GenerationOptions, RecordingSleeper, Registry, RunId, Sleeper, ThreadId};

    #[test]
    fn id_newtypes_round_trip_strings() {
        let thread = ThreadId::new("thread_1");
        let run = RunId::from("run_1");

        assert_eq!(thread.as_str(), "thread_1");
        assert_eq!(run.as_str(), "run_1");
        assert_eq!(thread.to_string(), "thread_1");
        assert_eq!(run.to_string(), "run_1");
    }

    #[test]
    fn generation_options_builder_helpers_set_values() {
        let options = GenerationOptions::default()
            .with_temperature(0.3)
            .with_top_p(0.5)
            .with_max_tokens(123);

        assert_eq!(options.temperature, Some(0.3));
        assert_eq!(options.top_p, Some(0.5));
        assert_eq!(options.max_tokens, Some(123));
    }

    #[test]
    fn generic_registry_basic_lifecycle() {
        let mut registry = Registry::new();
        assert!(registry.is_empty());

        registry.insert("alpha".to_string(), 1_u32);
        assert_eq!(registry.get("alpha"), Some(&1));
        assert!(registry.contains_key("alpha"));
        assert_eq!(registry.keys().count(), 1);

        let removed = registry.remove("alpha");
        assert_eq!(removed, Some(1));
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn recording_sleeper_returns_immediately_and_records() {
        let sleeper = RecordingSleeper::new();
        sleeper.sleep(Duration::from_secs(30)).await;
        sleeper.sleep(Duration::from_millis(500)).await;

        assert_eq!(sleeper.count(), 2);
        assert_eq!(
            sleeper.recorded(),
            vec![Duration::from_secs(30), Duration::from_millis(500)]
        );
    }
}
