//! Method Encoder
//!
//! Turns a JSON-RPC method name such as `addon_restApiPath` into the REST
//! path `rest_api_path` under the upstream base URL.
//!
//! A method name is read as a sequence of words. A word is either a run of
//! lowercase letters introduced by an underscore (`_rest`) or a capital letter
//! followed by lowercase letters (`Api`). Anything else is skipped. The first
//! word of the name is the addon namespace and never reaches the path: for
//! `addon_restApiPath` the leading `addon` is not a word at all, for
//! `AddonRestApiPath` the leading `Addon` word is dropped. A leading capital
//! that does not start a word (`X_getBlock`, `V2GetBlock`) is no namespace,
//! so nothing is dropped there.

use std::sync::Arc;

/// Encodes method names into upstream paths
#[derive(Debug, Clone)]
pub struct MethodEncoder {
    base_url: Arc<str>,
}

impl MethodEncoder {
    /// Create an encoder rooted at the upstream base URL
    pub fn new(base_url: impl Into<Arc<str>>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Upstream base URL every encoded path starts with
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Encode a method name as `<base><word>_<word>...`, lowercased.
    ///
    /// A name without any words encodes to the bare base URL.
    pub fn encode(&self, method: &str) -> String {
        let mut path = String::with_capacity(self.base_url.len() + method.len());
        path.push_str(&self.base_url);
        path.push_str(&rest_path(method));
        path
    }
}

/// Path segment for a method name, without the base URL
pub fn rest_path(method: &str) -> String {
    let words = words(method);
    // Only a capital-led word at offset 0 is a namespace
    let namespace = usize::from(words.first().is_some_and(|(start, _)| *start == 0));

    words
        .iter()
        .skip(namespace)
        .map(|(_, w)| w.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// Split a method name into words, leading underscores stripped.
///
/// Scans left to right and takes the leftmost word at each position, so
/// `ns_getBlockHash` yields `["get", "Block", "Hash"]` and `AddonRestApi`
/// yields `["Addon", "Rest", "Api"]`.
pub fn tokenize(method: &str) -> Vec<&str> {
    words(method).into_iter().map(|(_, w)| w).collect()
}

/// Words paired with their byte offset in the method name
fn words(method: &str) -> Vec<(usize, &str)> {
    let bytes = method.as_bytes();
    let mut words = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let lead = bytes[i];
        if lead != b'_' && !lead.is_ascii_uppercase() {
            i += 1;
            continue;
        }

        let end = lowercase_run_end(bytes, i + 1);
        if end == i + 1 {
            i += 1;
            continue;
        }

        // Underscore-led words keep only the lowercase run
        let start = if lead == b'_' { i + 1 } else { i };
        words.push((start, &method[start..end]));
        i = end;
    }

    words
}

/// Index one past the run of ASCII lowercase letters starting at `from`
fn lowercase_run_end(bytes: &[u8], from: usize) -> usize {
    bytes[from..]
        .iter()
        .position(|b| !b.is_ascii_lowercase())
        .map_or(bytes.len(), |n| from + n)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://api.example.com/";

    #[test]
    fn test_underscore_and_capitalized_forms_agree() {
        let encoder = MethodEncoder::new(BASE);
        assert_eq!(
            encoder.encode("addon_restApiPath"),
            "https://api.example.com/rest_api_path"
        );
        assert_eq!(
            encoder.encode("AddonRestApiPath"),
            "https://api.example.com/rest_api_path"
        );
    }

    #[test]
    fn test_namespace_prefix_dropped() {
        let encoder = MethodEncoder::new(BASE);
        assert_eq!(
            encoder.encode("namespace_getBalance"),
            "https://api.example.com/get_balance"
        );
        assert_eq!(encoder.encode("ns_getBlock"), "https://api.example.com/get_block");
        assert_eq!(encoder.encode("ns_resource"), "https://api.example.com/resource");
    }

    #[test]
    fn test_leading_capital_without_word_keeps_first_word() {
        let encoder = MethodEncoder::new(BASE);
        for method in ["X_getBlock", "ABC_getBlock", "V2GetBlock"] {
            assert_eq!(
                encoder.encode(method),
                "https://api.example.com/get_block",
                "{method}"
            );
        }
    }

    #[test]
    fn test_tokenize_words() {
        assert_eq!(tokenize("ns_getBlockHash"), vec!["get", "Block", "Hash"]);
        assert_eq!(tokenize("AddonRestApi"), vec!["Addon", "Rest", "Api"]);
        assert_eq!(tokenize("a_b_c"), vec!["b", "c"]);
    }

    #[test]
    fn test_tokenize_skips_unmatched_characters() {
        // Digits, lone capitals and trailing underscores are not words
        assert_eq!(tokenize("ns_get2Blocks"), vec!["get", "Blocks"]);
        assert_eq!(tokenize("ns_getURLPath"), vec!["get", "Path"]);
        assert_eq!(tokenize("ns__"), Vec::<&str>::new());
    }

    #[test]
    fn test_no_words_yields_base() {
        let encoder = MethodEncoder::new(BASE);
        assert_eq!(encoder.encode("namespace"), BASE);
        assert_eq!(encoder.encode("1234"), BASE);
        assert_eq!(encoder.encode(""), BASE);
        assert_eq!(encoder.encode("Addon"), BASE);
    }

    #[test]
    fn test_non_ascii_input() {
        assert_eq!(rest_path("ns_getÜber"), "get");
        assert_eq!(rest_path("été_getBlock"), "get_block");
    }

    #[test]
    fn test_encode_is_deterministic() {
        let encoder = MethodEncoder::new(BASE);
        let first = encoder.encode("ns_getBlockHeader");
        for _ in 0..10 {
            assert_eq!(encoder.encode("ns_getBlockHeader"), first);
        }
        assert_eq!(encoder.base_url(), BASE);
    }
}
