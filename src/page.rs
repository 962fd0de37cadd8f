// src/page.rs
//! Landing page state machine.
//!
//! ```text
//! Loading --finish_loading--> Pending --press_yes--> Accepted
//!                              |   ^
//!                              +---+ press_no
//! NotFound (terminal)
//! ```
//!
//! Transitions that do not apply to the current state leave it unchanged.

use std::str::FromStr;

use serde::Deserialize;
use tracing::debug;

use crate::{params::ShareParams, token::validate_token};

pub const YES_SCALE_STEP: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Loading,
    NotFound,
    Pending,
    Accepted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageState {
    Loading { name: String },
    NotFound,
    Pending { name: String, no_clicks: u32 },
    Accepted { name: String },
}

/// Button pressed on the pending view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Choice {
    Yes,
    No,
}

impl PageState {
    /// Fails closed: a missing name, a missing token and a wrong token all
    /// end up as `NotFound` with nothing to tell them apart.
    pub fn resolve(params: &ShareParams) -> Self {
        let Some(name) = params.name.as_deref() else {
            debug!("no name parameter");
            return PageState::NotFound;
        };
        match params.token.as_deref() {
            Some(token) if validate_token(name, token) => PageState::Loading {
                name: name.to_string(),
            },
            _ => {
                debug!("rejected share link");
                PageState::NotFound
            }
        }
    }

    /// Fixed-name pages skip the token check.
    pub fn dedicated(name: &str) -> Self {
        PageState::Loading {
            name: name.to_string(),
        }
    }

    pub fn finish_loading(self) -> Self {
        match self {
            PageState::Loading { name } => PageState::Pending { name, no_clicks: 0 },
            other => other,
        }
    }

    pub fn press_yes(self) -> Self {
        match self {
            PageState::Pending { name, .. } => PageState::Accepted { name },
            other => other,
        }
    }

    pub fn press_no(self) -> Self {
        match self {
            PageState::Pending { name, no_clicks } => PageState::Pending {
                name,
                no_clicks: no_clicks.saturating_add(1),
            },
            other => other,
        }
    }

    pub fn press(self, choice: Choice) -> Self {
        match choice {
            Choice::Yes => self.press_yes(),
            Choice::No => self.press_no(),
        }
    }

    /// Puts a pending view back where the visitor left it.
    pub fn with_no_clicks(self, clicks: u32) -> Self {
        match self.finish_loading() {
            PageState::Pending { name, .. } => PageState::Pending {
                name,
                no_clicks: clicks,
            },
            other => other,
        }
    }

    pub fn visibility(&self) -> Visibility {
        match self {
            PageState::Loading { .. } => Visibility::Loading,
            PageState::NotFound => Visibility::NotFound,
            PageState::Pending { .. } => Visibility::Pending,
            PageState::Accepted { .. } => Visibility::Accepted,
        }
    }

    pub fn displayed_name(&self) -> Option<&str> {
        match self {
            PageState::Loading { name }
            | PageState::Pending { name, .. }
            | PageState::Accepted { name } => Some(name),
            PageState::NotFound => None,
        }
    }

    pub fn no_clicks(&self) -> u32 {
        match self {
            PageState::Pending { no_clicks, .. } => *no_clicks,
            _ => 0,
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, PageState::Accepted { .. })
    }

    pub fn yes_button_scale(&self) -> f64 {
        1.0 + YES_SCALE_STEP * f64::from(self.no_clicks())
    }
}

const NO_PHRASES_BG: [&str; 15] = [
    "Не",
    "Ама наистина ли?",
    "Помисли пак! 💔",
    "Ще плача...",
    "Последен шанс!",
    "Моля те! 🥺",
    "Не може да бъде!",
    "Ще ми е много тъжно...",
    "Помисли още малко!",
    "Не ме отказвай! 💔",
    "Ще се разстроя много...",
    "Моля, помисли отново!",
    "Недей да отказваш!",
    "Ще ми счупиш сърцето...",
    "Последна молба! 🙏",
];

const NO_PHRASES_EN: [&str; 15] = [
    "No",
    "Are you sure?",
    "Think again! 💔",
    "I'll cry...",
    "Last chance!",
    "Please! 🥺",
    "It can't be!",
    "I'll be very sad...",
    "Think a bit more!",
    "Don't reject me! 💔",
    "I'll be very upset...",
    "Please, think again!",
    "Don't say no!",
    "You'll break my heart...",
    "Last request! 🙏",
];

/// Copy for one language. Only the wording differs between locales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    Bulgarian,
    English,
}

impl Locale {
    pub fn no_phrases(self) -> &'static [&'static str] {
        match self {
            Locale::Bulgarian => &NO_PHRASES_BG,
            Locale::English => &NO_PHRASES_EN,
        }
    }

    /// Clamps at the last phrase once the list runs out.
    pub fn no_phrase(self, clicks: u32) -> &'static str {
        let phrases = self.no_phrases();
        let index = usize::try_from(clicks).unwrap_or(usize::MAX);
        phrases[index.min(phrases.len() - 1)]
    }

    pub fn lang(self) -> &'static str {
        match self {
            Locale::Bulgarian => "bg",
            Locale::English => "en",
        }
    }

    pub fn question(self, name: &str) -> String {
        match self {
            Locale::Bulgarian => format!("{name}, ще бъдеш ли моята Валентинка? 🌹"),
            Locale::English => format!("{name}, will you be my Valentine? 🌹"),
        }
    }

    pub fn yes(self) -> &'static str {
        match self {
            Locale::Bulgarian => "Да",
            Locale::English => "Yes",
        }
    }

    pub fn loading(self) -> &'static str {
        match self {
            Locale::Bulgarian => "Зареждане...",
            Locale::English => "Loading...",
        }
    }

    pub fn accepted_title(self) -> &'static str {
        match self {
            Locale::Bulgarian => "Йей! Знаех си! ❤️",
            Locale::English => "Yay! I knew it! ❤️",
        }
    }

    pub fn accepted_line(self) -> &'static str {
        match self {
            Locale::Bulgarian => "Обичам те!",
            Locale::English => "I love you!",
        }
    }

    pub fn not_found_title(self) -> &'static str {
        match self {
            Locale::Bulgarian => "Страницата не е намерена",
            Locale::English => "Page not found",
        }
    }

    pub fn not_found_body(self) -> &'static str {
        match self {
            Locale::Bulgarian => {
                "Извиняваме се, но тази страница не съществува или линкът е невалиден."
            }
            Locale::English => "Sorry, this page does not exist or the link is invalid.",
        }
    }

    pub fn back_home(self) -> &'static str {
        match self {
            Locale::Bulgarian => "Назад към главната страница",
            Locale::English => "Back to the home page",
        }
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bg" | "bulgarian" => Ok(Locale::Bulgarian),
            "en" | "english" => Ok(Locale::English),
            other => Err(format!("unknown locale '{other}'")),
        }
    }
}
