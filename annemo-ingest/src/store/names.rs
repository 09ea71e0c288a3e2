//! Log file name validation
//!
//! Client-supplied names are reduced to their basename and then matched
//! against a whitelist before any filesystem call. Raw input is never joined
//! onto the results directory.

use annemo_common::{Error, Result};

/// Extension of every log file
pub const LOG_EXTENSION: &str = "csv";

const MAX_NAME_LEN: usize = 255;

/// True if `name` looks like a file this store could have written
///
/// Accepted: `[A-Za-z0-9_-][A-Za-z0-9._-]*\.csv`, at most 255 bytes.
pub fn is_log_file_name(name: &str) -> bool {
    let Some(stem) = name.strip_suffix(".csv") else {
        return false;
    };
    let mut chars = stem.chars();
    let Some(first) = chars.next() else {
        return false;
    };

    name.len() <= MAX_NAME_LEN
        && (first.is_ascii_alphanumeric() || first == '_' || first == '-')
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

/// Basename of `raw`, accepted only if it is a valid log file name
pub fn resolve_target(raw: &str) -> Result<String> {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or(raw);
    if is_log_file_name(base) {
        Ok(base.to_string())
    } else {
        Err(Error::InvalidDeletionTarget(raw.to_string()))
    }
}
