//! Environment variable helpers
//!
//! Configuration loaders take an [`EnvLookup`] instead of reading
//! `std::env` directly, so they can be exercised with a plain map in tests.

use std::str::FromStr;

/// Function resolving a variable name to its value
pub type EnvLookup<'a> = &'a dyn Fn(&str) -> Option<String>;

/// Lookup backed by the process environment
pub fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Value of `name`, trimmed, or `None` when unset or blank
pub fn non_empty(lookup: EnvLookup<'_>, name: &str) -> Option<String> {
    lookup(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse `name` into `T`
///
/// Returns `Ok(None)` when the variable is unset and an error message naming
/// the variable when it is set but unparseable.
pub fn parse_var<T: FromStr>(lookup: EnvLookup<'_>, name: &str) -> Result<Option<T>, String> {
    match non_empty(lookup, name) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|_| format!("{name} has an invalid value: {raw}")),
    }
}

/// Boolean flag: `1/true/yes/on` and `0/false/no/off`, case-insensitive
pub fn flag(lookup: EnvLookup<'_>, name: &str) -> Result<Option<bool>, String> {
    match non_empty(lookup, name) {
        None => Ok(None),
        Some(raw) => match raw.to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(Some(true)),
            "0" | "false" | "no" | "off" => Ok(Some(false)),
            _ => Err(format!("{name} has an invalid value: {raw}")),
        },
    }
}
