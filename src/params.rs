//! Values captured by the keys of a matched pattern.
use serde::Serialize;
use std::{collections::HashMap, error::Error, str::FromStr};
use thiserror::Error;

/// An error encountered while parsing a captured key.
///
/// This struct wraps some type's [FromStr::Err][std::str::FromStr::Err].
#[derive(Clone, Debug, Error)]
#[error("failed to parse {:?} in uri: {}", .item, .err)]
pub struct ParamError<E: Error> {
    /// The segment that failed to parse.
    pub item: String,

    /// The inner error.
    pub err: E,
}

/// A mapping of key names to the path segments they captured.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Params(HashMap<String, String>);

impl Params {
    /// Collect the segments named by `keys`, a list of `(name, segment index)` pairs.
    ///
    /// If a name appears more than once, the first occurrence wins.
    pub(crate) fn extract<S: AsRef<str>>(keys: &[(String, usize)], segments: &[S]) -> Self {
        let mut map = HashMap::with_capacity(keys.len());

        for (name, i) in keys.iter().rev() {
            if let Some(seg) = segments.get(*i) {
                map.insert(name.clone(), seg.as_ref().to_owned());
            }
        }

        Self(map)
    }

    /// Returns the raw segment captured by `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Parse the segment captured by `name` via its [FromStr] impl.
    ///
    /// Returns `None` if no such key was captured.
    ///
    /// ```
    /// let router = trellis::router!["/users/:id" => ()];
    /// let m = router.lookup("/users/42").unwrap();
    /// let keys = m.keys.unwrap();
    ///
    /// assert_eq!(42u32, keys.parse("id").unwrap().unwrap());
    /// assert!(keys.parse::<u32>("name").is_none());
    /// ```
    pub fn parse<T>(&self, name: &str) -> Option<Result<T, ParamError<T::Err>>>
    where
        T: FromStr,
        T::Err: Error,
    {
        let item = self.get(name)?;

        Some(item.parse::<T>().map_err(|err| ParamError {
            item: item.to_owned(),
            err,
        }))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// An iterator over `(name, value)` pairs, in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the inner map.
    pub fn into_inner(self) -> HashMap<String, String> {
        self.0
    }
}

impl IntoIterator for Params {
    type Item = (String, String);
    type IntoIter = std::collections::hash_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    fn keys(ks: &[(&str, usize)]) -> Vec<(String, usize)> {
        ks.iter().map(|&(k, i)| (k.to_owned(), i)).collect()
    }

    #[test]
    fn test_extract() {
        let p = Params::extract(&keys(&[("a", 0), ("c", 2)]), &["x", "y", "z"]);

        assert_eq!(2, p.len());
        assert_eq!(Some("x"), p.get("a"));
        assert_eq!(Some("z"), p.get("c"));
        assert_eq!(None, p.get("b"));
    }

    #[test]
    fn test_extract_first_name_wins() {
        let p = Params::extract(&keys(&[("id", 0), ("id", 1)]), &["first", "second"]);

        assert_eq!(1, p.len());
        assert_eq!(Some("first"), p.get("id"));
    }

    #[test]
    fn test_extract_skips_missing_segments() {
        let p = Params::extract(&keys(&[("a", 0), ("b", 5)]), &["x"]);
        assert_eq!(1, p.len());
        assert!(!p.contains("b"));
    }

    #[test]
    fn test_parse_error() {
        let p = Params::extract(&keys(&[("n", 0)]), &["nope"]);
        let err = p.parse::<u32>("n").unwrap().unwrap_err();

        assert_eq!("nope", err.item);
        assert_eq!(
            r#"failed to parse "nope" in uri: invalid digit found in string"#,
            err.to_string(),
        );
    }

    #[test]
    fn test_serialize() {
        let p = Params::extract(&keys(&[("id", 0)]), &["42"]);
        assert_eq!(r#"{"id":"42"}"#, serde_json::to_string(&p).unwrap());
    }

    #[quickcheck]
    fn test_parse_segments(x: u32, y: f64) -> bool {
        let segs = [x.to_string(), y.to_string()];
        let p = Params::extract(&keys(&[("x", 0), ("y", 1)]), &segs);

        let px: u32 = p.parse("x").unwrap().unwrap();
        let py: f64 = p.parse("y").unwrap().unwrap();

        px == x && (py == y || (py.is_nan() && y.is_nan()))
    }
}
