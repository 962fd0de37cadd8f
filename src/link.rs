// src/link.rs
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;
use thiserror::Error;

use crate::token::generate_token;

/// Everything `encodeURIComponent` escapes.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

#[derive(Error, Debug, PartialEq, Eq)]
pub enum LinkError {
    #[error("name must not be empty")]
    EmptyName,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShareLink {
    pub name: String,
    pub token: String,
    pub url: String,
}

pub fn encode_component(s: &str) -> String {
    utf8_percent_encode(s, COMPONENT).to_string()
}

pub fn build_share_link(raw_name: &str, origin: &str) -> Result<ShareLink, LinkError> {
    let name = raw_name.trim();
    if name.is_empty() {
        return Err(LinkError::EmptyName);
    }

    let token = generate_token(name);
    let url = format!(
        "{}/?name={}&token={}",
        origin.trim_end_matches('/'),
        encode_component(name),
        token
    );

    Ok(ShareLink {
        name: name.to_string(),
        token,
        url,
    })
}
