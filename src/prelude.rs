//! A prelude designed to be bulk imported for ease of use.
//!
//! ```
//! # #[allow(unused_imports)]
//! use trellis::prelude::*;
//! ```

#[doc(inline)]
pub use super::{router, Config, Error, Match, ParamError, Params, Router, Url};
