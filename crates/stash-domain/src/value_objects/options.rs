//! Per-call cache options
//!
//! [`Options`] travels with every `set`, [`InvalidateOptions`] with every
//! `invalidate`.
//!
//! # Example
//!
//! ```
//! use stash_domain::value_objects::{Expiration, Options};
//! use std::time::Duration;
//!
//! let options = Options::new()
//!     .with_expiration(Duration::from_secs(3600))
//!     .with_tag("users");
//!
//! assert_eq!(options.expiration, Expiration::After(Duration::from_secs(3600)));
//! assert_eq!(options.tags, vec!["users".to_string()]);
//! ```

use std::time::Duration;

/// How long an entry lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Expiration {
    /// Use the store's default expiration
    #[default]
    Default,
    /// Never expire
    Never,
    /// Expire after the given duration
    After(Duration),
}

/// Alias for an entry that is never removed by expiry
pub const REMEMBER_FOREVER: Expiration = Expiration::Never;

impl Expiration {
    /// Resolve against a store default, `None` meaning no expiry
    ///
    /// `After(0)` resolves like `Default`.
    pub fn resolve(self, store_default: Option<Duration>) -> Option<Duration> {
        match self {
            Self::Default => store_default,
            Self::Never => None,
            Self::After(ttl) if ttl.is_zero() => store_default,
            Self::After(ttl) => Some(ttl),
        }
    }
}

impl From<Duration> for Expiration {
    /// A zero duration falls back to the store default
    fn from(ttl: Duration) -> Self {
        if ttl.is_zero() {
            Self::Default
        } else {
            Self::After(ttl)
        }
    }
}

/// Options accepted by `set`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    /// Entry expiration
    pub expiration: Expiration,
    /// Tags the entry can later be invalidated by
    pub tags: Vec<String>,
}

impl Options {
    /// Options with the store's default expiration and no tags
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the expiration
    pub fn with_expiration<E: Into<Expiration>>(mut self, expiration: E) -> Self {
        self.expiration = expiration.into();
        self
    }

    /// Never expire the entry
    pub fn forever(mut self) -> Self {
        self.expiration = Expiration::Never;
        self
    }

    /// Add a single tag
    pub fn with_tag<S: Into<String>>(mut self, tag: S) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Add several tags
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }
}

/// Options accepted by `invalidate`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvalidateOptions {
    /// Tag groups to invalidate
    pub tags: Vec<String>,
}

impl InvalidateOptions {
    /// Invalidate the given tags
    pub fn tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }
}
