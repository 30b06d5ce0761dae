//! Tokenizer for route patterns.
//!
//! A pattern is a `/` delimited list of segments. Each segment is one of:
//!
//! * `*` - a wildcard, which captures the remainder of a path. Anything after it is ignored.
//! * `:name` - a key, which captures exactly one segment under `name`.
//! * anything else - a literal, which must be matched verbatim.
//!
//! The key sigil defaults to `:`, but may be changed through [Config][crate::Config].
//!
//! ```
//! use trellis::pattern::{Pattern, Token};
//!
//! let p = Pattern::parse("/one/:two/*/ignored", ':');
//! assert_eq!(p.tokens(), &[
//!     Token::Literal("one"),
//!     Token::Key("two"),
//!     Token::Wildcard,
//! ]);
//! ```
use std::fmt;

/// The segment that marks a wildcard.
pub const WILDCARD: &str = "*";

/// The default key sigil.
pub const KEY_SIGIL: char = ':';

/// A single tokenized pattern segment.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Token<'a> {
    /// Matched verbatim.
    Literal(&'a str),

    /// Matches any one segment, captured under the given name.
    Key(&'a str),

    /// Matches every remaining segment.
    Wildcard,
}

/// A tokenized route pattern.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pattern<'a> {
    tokens: Vec<Token<'a>>,
    sigil: char,
}

impl<'a> Pattern<'a> {
    /// Tokenize `src`, treating segments that begin with `sigil` as keys.
    ///
    /// A single leading empty segment (i.e. a leading `/`) is dropped. Any other empty segment
    /// is a literal empty string, so `"/a//b"` has three segments.
    pub fn parse(src: &'a str, sigil: char) -> Self {
        Self {
            tokens: tokenize(src, sigil),
            sigil,
        }
    }

    /// The tokens of this pattern, in order.
    pub fn tokens(&self) -> &[Token<'a>] {
        &self.tokens
    }

    /// Returns the number of keys in this pattern.
    pub fn key_count(&self) -> usize {
        (self.tokens.iter())
            .filter(|t| matches!(t, Token::Key(_)))
            .count()
    }

    /// Returns true if this pattern ends in a wildcard.
    pub fn is_wildcard(&self) -> bool {
        matches!(self.tokens.last(), Some(Token::Wildcard))
    }
}

impl fmt::Display for Pattern<'_> {
    /// Writes the normalized form of the pattern (anything past a wildcard is omitted).
    ///
    /// ```
    /// use trellis::pattern::Pattern;
    ///
    /// let p = Pattern::parse("a/:b/*/c", ':');
    /// assert_eq!("/a/:b/*", p.to_string());
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.tokens.is_empty() {
            return Ok(());
        }

        for token in &self.tokens {
            match token {
                Token::Literal(text) => write!(f, "/{}", text)?,
                Token::Key(name) => write!(f, "/{}{}", self.sigil, name)?,
                Token::Wildcard => write!(f, "/{}", WILDCARD)?,
            }
        }

        Ok(())
    }
}

/// Split `src` into tokens.
pub fn tokenize(src: &str, sigil: char) -> Vec<Token<'_>> {
    let mut parts = src.split('/').peekable();

    // strip the empty segment before a leading slash
    if parts.peek() == Some(&"") {
        parts.next();
    }

    let mut tokens = vec![];

    for part in parts {
        if part == WILDCARD {
            tokens.push(Token::Wildcard);
            break;
        }

        match part.strip_prefix(sigil) {
            Some(name) => tokens.push(Token::Key(name)),
            None => tokens.push(Token::Literal(part)),
        }
    }

    tokens
}
