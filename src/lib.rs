//! A segment trie for matching urls against route patterns.
//!
//! Patterns are `/` delimited, and each segment is a literal, a key (`:name`), or a trailing
//! wildcard (`*`). Every pattern is bound to a value of your choosing:
//!
//! ```
//! use trellis::Router;
//!
//! let mut router = Router::new();
//! router.add_route("/users/:id", "user");
//! router.add_route("/users/me", "me");
//! router.add_route("/static/*", "static");
//!
//! let m = router.lookup("/users/42").unwrap();
//! assert_eq!(Some(&"user"), m.value);
//! assert_eq!(Some("42"), m.key("id"));
//!
//! // literals always win over keys
//! let m = router.lookup("/users/me").unwrap();
//! assert_eq!(Some(&"me"), m.value);
//!
//! let m = router.lookup("http://example.com/static/css/site.css?v=3").unwrap();
//! assert_eq!(Some(&"static"), m.value);
//! assert_eq!(Some("css/site.css"), m.extra.as_deref());
//!
//! let m = router.lookup("/nothing/here").unwrap();
//! assert!(!m.is_match());
//! ```
//!
//! # Matching
//! A url is split into segments, and the trie is walked one segment at a time. At each step a
//! literal child is preferred over a key, and a key over falling back to an ancestor's key. The
//! walk never backtracks; instead, every node caches where to fall back to when nothing below it
//! accepts the next segment.
//!
//! If the walk doesn't end on a registered pattern, the deepest wildcard passed along the way
//! is used instead. A registered pattern always beats a wildcard, even a deeper one.
//!
//! Registering the same pattern twice replaces its value. Keys are matched by position, so
//! `/a/:x` and `/a/:y` are the same pattern.
//!
//! # Routers are built, then queried
//! [Router::add_route] takes `&mut self` and [Router::lookup] takes `&self`, so a router that
//! is done being built can be shared freely between threads (given `V: Sync`).
use std::iter::FromIterator;
use thiserror::Error;
use tracing::{debug, trace};

pub mod params;
pub mod pattern;
pub mod prelude;
pub mod tree;
pub mod uri;

#[doc(inline)]
pub use params::{ParamError, Params};
#[doc(inline)]
pub use pattern::Pattern;
#[doc(inline)]
pub use uri::Url;

use serde::{Deserialize, Serialize};
use tree::Tree;

/// Builds a [Router] from a list of `pattern => value` pairs.
///
/// ```
/// use trellis::router;
///
/// let router = router![
///     "/" => 0,
///     "/one/:two" => 1,
///     "/one/:two/*" => 2,
/// ];
///
/// assert_eq!(Some(&1), router.lookup("/one/x").unwrap().value);
/// assert_eq!(Some(&2), router.lookup("/one/x/y/z").unwrap().value);
/// ```
#[macro_export]
macro_rules! router {
    ($( $pattern:expr => $value:expr ),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut router = $crate::Router::new();
        $( router.add_route($pattern, $value); )*
        router
    }};
}

/// An error encountered while parsing a url.
///
/// Failing to match a route is *not* an error; see [Match::is_match].
#[derive(Debug, Error)]
pub enum Error {
    /// The url could not be parsed.
    #[error("invalid uri: {0}")]
    Uri(#[from] http::uri::InvalidUri),

    /// The query string could not be deserialized.
    #[error("malformed query: {0}")]
    Query(#[from] serde_urlencoded::de::Error),
}

/// Router configuration.
///
/// ```
/// use trellis::{Config, Router};
///
/// let config: Config = serde_json::from_str(r#"{"key_sigil": "$"}"#).unwrap();
/// let mut router = Router::with_config(config);
/// router.add_route("/users/$id", ());
///
/// let m = router.lookup("/users/7").unwrap();
/// assert_eq!(Some("7"), m.key("id"));
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The character that marks a pattern segment as a key. Defaults to `:`.
    pub key_sigil: char,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            key_sigil: pattern::KEY_SIGIL,
        }
    }
}

/// The result of a [Router::lookup].
#[derive(Clone, Debug)]
pub struct Match<'r, V> {
    /// The parsed url.
    pub url: Url,

    /// The value bound to the matched pattern, if any pattern matched.
    pub value: Option<&'r V>,

    /// Segments of the url's path.
    pub segments: Vec<String>,

    /// Values captured by the matched pattern's keys, if any pattern matched.
    pub keys: Option<Params>,

    /// The remainder of the path captured by a wildcard, if a wildcard matched.
    pub extra: Option<String>,
}

impl<'r, V> Match<'r, V> {
    /// Returns true if some pattern matched.
    pub fn is_match(&self) -> bool {
        self.value.is_some()
    }

    /// Returns the segment captured by the key `name`.
    pub fn key(&self, name: &str) -> Option<&str> {
        self.keys.as_ref()?.get(name)
    }
}

/// A set of route patterns, each bound to a `V`.
///
/// Every router owns its own trie; routers never share state.
#[derive(Clone, Debug)]
pub struct Router<V> {
    tree: Tree<V>,
    config: Config,
}

impl<V> Default for Router<V> {
    fn default() -> Self {
        Self::with_config(Config::default())
    }
}

impl<V> Router<V> {
    /// Returns a new, empty router.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a new, empty router with the provided configuration.
    pub fn with_config(config: Config) -> Self {
        Self {
            tree: Tree::default(),
            config,
        }
    }

    /// The configuration this router was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Bind `pattern` to `value`.
    ///
    /// This never fails. Segments after a wildcard are ignored, and registering a pattern that
    /// is already present replaces its value.
    pub fn add_route(&mut self, pattern: &str, value: V) {
        let pattern = Pattern::parse(pattern, self.config.key_sigil);
        let (node, old) = self.tree.insert(pattern.tokens(), value);

        debug!(
            %pattern,
            depth = self.tree[node].depth,
            replaced = old.is_some(),
            "added route"
        );
    }

    /// Number of distinct patterns in this router.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns true if no patterns have been added.
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Parse `url` and find the pattern that matches its path.
    ///
    /// Returns an error only if `url` can't be parsed even after escaping (e.g. it's empty, or has
    /// a malformed authority). If nothing matches, the returned
    /// [Match] has no value.
    pub fn lookup(&self, url: &str) -> Result<Match<'_, V>, Error> {
        Ok(self.lookup_url(Url::parse(url)?))
    }

    /// Find the pattern that matches the path of an already parsed uri.
    pub fn lookup_uri(&self, uri: http::Uri) -> Match<'_, V> {
        self.lookup_url(Url::from(uri))
    }

    /// Find the pattern that matches the path of `url`.
    pub fn lookup_url(&self, url: Url) -> Match<'_, V> {
        let segments: Vec<String> = url.segments().map(String::from).collect();

        let (value, keys, extra) = match self.tree.find(&segments) {
            Some(found) => {
                let keys = Params::extract(found.keys, &segments);
                let extra = found.rest.map(|i| segments[i..].join("/"));

                (Some(found.value), Some(keys), extra)
            }

            None => (None, None, None),
        };

        trace!(
            path = url.path(),
            matched = value.is_some(),
            wildcard = extra.is_some(),
            "route lookup"
        );

        Match {
            url,
            value,
            segments,
            keys,
            extra,
        }
    }
}

impl<P: AsRef<str>, V> Extend<(P, V)> for Router<V> {
    fn extend<I: IntoIterator<Item = (P, V)>>(&mut self, iter: I) {
        for (pattern, value) in iter {
            self.add_route(pattern.as_ref(), value);
        }
    }
}

impl<P: AsRef<str>, V> FromIterator<(P, V)> for Router<V> {
    fn from_iter<I: IntoIterator<Item = (P, V)>>(iter: I) -> Self {
        let mut router = Self::new();
        router.extend(iter);
        router
    }
}
