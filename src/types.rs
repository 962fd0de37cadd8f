// src/types.rs
use serde::{Deserialize, Serialize};

use crate::page::Choice;

#[derive(Deserialize)]
pub struct LinkReq {
    #[serde(default)]
    pub name: String,
}

/// Yes/No form posted back to the page that rendered it.
#[derive(Deserialize)]
pub struct AnswerForm {
    #[serde(default)]
    pub no_clicks: u32,
    pub choice: Choice,
}

#[derive(Serialize)]
pub struct ValidateRes {
    pub valid: bool,
}
