//! Auxiliary request data sent alongside uploads

use serde::de::DeserializeOwned;
use stash_core::{Error, Result, EXTRA_ARGS_FIELD};
use std::collections::HashMap;

/// Decode the JSON carried in the `extraArgs` form field.
///
/// A missing field, a JSON `null`, or text that does not decode into `T` all
/// yield [`Error::NoExtraArgs`].
pub fn parse_extra_args<T: DeserializeOwned>(form: &HashMap<String, String>) -> Result<T> {
    let raw = form.get(EXTRA_ARGS_FIELD).ok_or(Error::NoExtraArgs)?;

    serde_json::from_str::<Option<T>>(raw)
        .ok()
        .flatten()
        .ok_or(Error::NoExtraArgs)
}
