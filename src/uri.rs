//! Parsed urls, as consumed by [Router::lookup][crate::Router::lookup].
use super::Error;
use http::Uri;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::de::DeserializeOwned;
use std::{fmt, str::FromStr};

/// Bytes that [Uri] refuses but that can still be routed once escaped. Non-ascii is always
/// escaped.
const UNSAFE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// A parsed url.
///
/// Both absolute urls (`http://host/a/b?c=d`) and bare paths (`/a/b?c=d`) are accepted. Routing
/// only looks at the path; the rest is carried along for the caller.
#[derive(Clone, Debug, PartialEq)]
pub struct Url {
    uri: Uri,
}

impl Url {
    /// Parse a raw url.
    ///
    /// Spaces, non-ascii characters and the like are percent encoded rather than rejected,
    /// so they show up escaped in [segments][Url::segments]. Existing escapes are kept as is.
    ///
    /// ```
    /// use trellis::Url;
    ///
    /// let url = Url::parse("/a/b c/café").unwrap();
    /// assert_eq!("/a/b%20c/caf%C3%A9", url.path());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, Error> {
        let uri = match raw.parse::<Uri>() {
            Ok(uri) => uri,
            Err(_) => utf8_percent_encode(raw, UNSAFE).to_string().parse::<Uri>()?,
        };

        Ok(Self { uri })
    }

    /// The underlying [Uri].
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    pub fn into_uri(self) -> Uri {
        self.uri
    }

    /// The path component. Absolute urls with an empty path yield `"/"`.
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// The raw query string, without the leading `?`.
    pub fn query(&self) -> Option<&str> {
        self.uri.query()
    }

    /// The `/` separated segments of the path, with the empty segment before a leading `/`
    /// dropped. Segments are not percent decoded.
    ///
    /// ```
    /// use trellis::Url;
    ///
    /// let url = Url::parse("http://example.com/a/b%20c//d?e=f").unwrap();
    /// assert_eq!(vec!["a", "b%20c", "", "d"], url.segments().collect::<Vec<_>>());
    /// ```
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        let path = self.path();
        let path = path.strip_prefix('/').unwrap_or(path);
        path.split('/')
    }

    /// Decoded `(name, value)` pairs of the query string, in order.
    pub fn query_pairs(&self) -> Result<Vec<(String, String)>, Error> {
        self.query_as()
    }

    /// Deserialize the query string into a `T`.
    ///
    /// A missing query string is treated as an empty one.
    ///
    /// ```
    /// use serde::Deserialize;
    /// use trellis::Url;
    ///
    /// #[derive(Deserialize)]
    /// struct Page {
    ///     n: u32,
    ///     sort: Option<String>,
    /// }
    ///
    /// let url = Url::parse("/list?n=4").unwrap();
    /// let page: Page = url.query_as().unwrap();
    /// assert_eq!(4, page.n);
    /// assert!(page.sort.is_none());
    /// ```
    pub fn query_as<T: DeserializeOwned>(&self) -> Result<T, Error> {
        let query = self.query().unwrap_or_default();
        Ok(serde_urlencoded::from_str(query)?)
    }
}

impl FromStr for Url {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Uri> for Url {
    fn from(uri: Uri) -> Self {
        Self { uri }
    }
}

impl fmt::Display for Url {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.uri, f)
    }
}
