//! Values shared by the voicelane crates.
//!
//! ```rust
//! use vcommon::{GenerationOptions, SessionId};
//!
//! let session = SessionId::parse("sess_01HZX3K9ABCDEFGHJKMNPQRSTV").expect("non-blank id");
//! assert_eq!(session.log_label(), "sess_01HZX3K9ABCDEFG");
//! assert!(SessionId::parse("   ").is_none());
//!
//! let options = GenerationOptions::default().with_max_tokens(256);
//! assert!(!options.is_unset());
//! ```

pub mod future {
    use std::future::Future;
    use std::pin::Pin;

    /// Object-safe future returned by transport, store and tool traits.
    pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
}

pub mod session {
    //! Backend session identifiers.
    //!
    //! ```rust
    //! use vcommon::SessionId;
    //!
    //! let session = SessionId::new("sess-42");
    //! assert_eq!(session.to_string(), "sess-42");
    //! assert_eq!(session.log_label(), "sess-42");
    //! ```

    use std::fmt::{Display, Formatter};

    /// Identifier of the backend conversation that turns are saved under.
    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    pub struct SessionId(String);

    impl SessionId {
        /// Leading characters kept when a session id is written to logs.
        pub const LOG_CHARS: usize = 20;

        pub fn new(value: impl Into<String>) -> Self {
            Self(value.into())
        }

        /// `None` for blank input, so a missing id and an empty one behave alike.
        pub fn parse(raw: &str) -> Option<Self> {
            (!raw.trim().is_empty()).then(|| Self(raw.to_string()))
        }

        pub fn as_str(&self) -> &str {
            self.0.as_str()
        }

        pub fn is_empty(&self) -> bool {
            self.0.trim().is_empty()
        }

        /// The id cut to [`SessionId::LOG_CHARS`] characters.
        pub fn log_label(&self) -> &str {
            match self.0.char_indices().nth(Self::LOG_CHARS) {
                Some((index, _)) => &self.0[..index],
                None => self.0.as_str(),
            }
        }
    }

    impl Display for SessionId {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            f.write_str(&self.0)
        }
    }

    impl From<String> for SessionId {
        fn from(value: String) -> Self {
            Self(value)
        }
    }

    impl From<&str> for SessionId {
        fn from(value: &str) -> Self {
            Self(value.to_string())
        }
    }
}

pub mod generation {
    /// Sampling limits forwarded to whichever provider answers.
    #[derive(Debug, Clone, Copy, PartialEq, Default)]
    pub struct GenerationOptions {
        pub temperature: Option<f32>,
        pub max_tokens: Option<u32>,
    }

    impl GenerationOptions {
        pub const TEMPERATURE_RANGE: std::ops::RangeInclusive<f32> = 0.0..=2.0;

        pub fn with_temperature(mut self, temperature: f32) -> Self {
            self.temperature = Some(temperature);
            self
        }

        pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
            self.max_tokens = Some(max_tokens);
            self
        }

        /// Neither limit is set; providers use their own defaults.
        pub fn is_unset(&self) -> bool {
            self.temperature.is_none() && self.max_tokens.is_none()
        }

        /// Describes the first out-of-range limit.
        pub fn validate(&self) -> Result<(), &'static str> {
            if self.max_tokens == Some(0) {
                return Err("max_tokens must be greater than zero");
            }

            if let Some(temperature) = self.temperature
                && !Self::TEMPERATURE_RANGE.contains(&temperature)
            {
                return Err("temperature must be in the inclusive range 0.0..=2.0");
            }

            Ok(())
        }
    }
}

pub mod registry {
    //! Ordered map behind the provider and tool registries.
    //!
    //! ```rust
    //! use vcommon::Registry;
    //!
    //! let mut tools = Registry::new();
    //! tools.insert("web_search".to_string(), 2_u8);
    //! tools.insert("clock".to_string(), 1_u8);
    //!
    //! assert_eq!(tools.values().copied().collect::<Vec<_>>(), vec![1, 2]);
    //! ```

    use std::borrow::Borrow;
    use std::collections::BTreeMap;

    /// Entries iterate in key order, so anything derived from a registry is stable.
    #[derive(Debug, Clone)]
    pub struct Registry<K, V> {
        entries: BTreeMap<K, V>,
    }

    impl<K, V> Default for Registry<K, V> {
        fn default() -> Self {
            Self {
                entries: BTreeMap::new(),
            }
        }
    }

    impl<K: Ord, V> Registry<K, V> {
        pub fn new() -> Self {
            Self::default()
        }

        /// Replaces and returns any entry already under `key`.
        pub fn insert(&mut self, key: K, value: V) -> Option<V> {
            self.entries.insert(key, value)
        }

        pub fn get<Q>(&self, key: &Q) -> Option<&V>
        where
            K: Borrow<Q>,
            Q: Ord + ?Sized,
        {
            self.entries.get(key)
        }

        pub fn contains_key<Q>(&self, key: &Q) -> bool
        where
            K: Borrow<Q>,
            Q: Ord + ?Sized,
        {
            self.entries.contains_key(key)
        }

        pub fn values(&self) -> impl Iterator<Item = &V> {
            self.entries.values()
        }

        pub fn len(&self) -> usize {
            self.entries.len()
        }

        pub fn is_empty(&self) -> bool {
            self.entries.is_empty()
        }
    }
}

pub use future::BoxFuture;
pub use generation::GenerationOptions;
pub use registry::Registry;
pub use session::SessionId;
