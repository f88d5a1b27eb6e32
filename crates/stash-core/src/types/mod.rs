//! Core types for Stash

mod constraints;
mod key;
mod object;
mod range;
mod url;

pub use constraints::*;
pub use key::*;
pub use object::*;
pub use range::*;
pub use url::*;
