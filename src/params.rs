// src/params.rs
//! Query parameter lookup for share links. Keys match case-insensitively so a
//! link survives messengers that mangle casing.

/// Exact `key`, `Key`, `KEY` first (first non-empty wins), then the first
/// pair whose key matches ignoring case. Empty values count as absent.
pub fn lookup<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    let variants = [key.to_lowercase(), capitalize(key), key.to_uppercase()];

    let exact = variants.iter().find_map(|variant| {
        pairs
            .iter()
            .find(|(k, _)| k == variant)
            .map(|(_, v)| v.as_str())
            .filter(|v| !v.is_empty())
    });

    exact
        .or_else(|| {
            pairs
                .iter()
                .find(|(k, _)| k.to_lowercase() == variants[0])
                .map(|(_, v)| v.as_str())
        })
        .filter(|v| !v.is_empty())
}

fn capitalize(key: &str) -> String {
    let lower = key.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => lower,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShareParams {
    pub name: Option<String>,
    pub token: Option<String>,
}

impl ShareParams {
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            name: lookup(pairs, "name").map(str::to_string),
            token: lookup(pairs, "token").map(str::to_string),
        }
    }
}
