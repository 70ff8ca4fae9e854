//! Params Extraction
//!
//! Reads optional routing arguments out of a JSON-RPC `params` field.
//!
//! The only supported shape is an array holding a single object of string
//! values. Within that object the reserved key `path` is appended to the
//! upstream path, the reserved key `method` overrides the HTTP verb, and all
//! other keys become query parameters.
//!
//! The path suffix may not contain `.` or `..` segments, which would let the
//! resolved URI climb out of the upstream base URL.

use serde_json::Value;
use std::collections::BTreeMap;
use url::form_urlencoded;

/// Reserved key appended to the upstream path
pub const PATH_KEY: &str = "path";

/// Reserved key overriding the upstream verb
pub const METHOD_KEY: &str = "method";

/// Routing arguments taken from `params`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedParams {
    /// Extra path segment, appended after a `/`
    pub path_suffix: Option<String>,
    /// HTTP verb replacing the default `GET`
    pub verb_override: Option<String>,
    /// Query parameters, ordered by key
    pub query: BTreeMap<String, String>,
}

impl ParsedParams {
    /// Extract routing arguments from the `params` field.
    ///
    /// Absent, empty or wrongly shaped params yield empty arguments. An array
    /// of more than one element is rejected whatever the elements are, as is
    /// a path suffix with dot segments.
    pub fn extract(params: Option<&Value>) -> Result<Self, ParamsError> {
        let items = match params {
            Some(Value::Array(items)) => items,
            Some(other) => {
                tracing::debug!("Ignoring params that are not an array: {}", other);
                return Ok(Self::default());
            }
            None => return Ok(Self::default()),
        };

        match items.as_slice() {
            [] => Ok(Self::default()),
            [item] => match string_map(item) {
                Some(object) => Self::from_object(object),
                None => {
                    tracing::debug!("Ignoring params element that is not a string map: {}", item);
                    Ok(Self::default())
                }
            },
            items => Err(ParamsError::MultipleObjects(items.len())),
        }
    }

    fn from_object(mut object: BTreeMap<String, String>) -> Result<Self, ParamsError> {
        let path_suffix = object.remove(PATH_KEY);
        if let Some(suffix) = &path_suffix {
            if has_dot_segment(suffix) {
                return Err(ParamsError::DotSegment(suffix.clone()));
            }
        }

        Ok(Self {
            path_suffix,
            verb_override: object.remove(METHOD_KEY),
            query: object,
        })
    }

    /// Form-encoded query string, or `None` when there are no query entries
    pub fn query_string(&self) -> Option<String> {
        if self.query.is_empty() {
            return None;
        }

        let mut serializer = form_urlencoded::Serializer::new(String::new());
        serializer.extend_pairs(&self.query);
        Some(serializer.finish())
    }
}

/// Object whose values are all strings
fn string_map(item: &Value) -> Option<BTreeMap<String, String>> {
    item.as_object()?
        .iter()
        .map(|(k, v)| Some((k.clone(), v.as_str()?.to_string())))
        .collect()
}

/// True when any segment resolves as `.` or `..`, percent-encoded dots and
/// backslash separators included
fn has_dot_segment(path: &str) -> bool {
    path.split(|c| c == '/' || c == '\\').any(|segment| {
        let segment = segment.to_ascii_lowercase().replace("%2e", ".");
        segment == "." || segment == ".."
    })
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParamsError {
    #[error("params must hold at most one object, got {0}")]
    MultipleObjects(usize),
    #[error("path {0:?} must not contain '.' or '..' segments")]
    DotSegment(String),
}
