use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{Storage, read_json, write_json};

pub const LOGGED_IN_KEY: &str = "isLoggedIn";
pub const THEME_KEY: &str = "theme";

/// Colour scheme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => f.write_str("light"),
            Theme::Dark => f.write_str("dark"),
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme '{other}', expected light or dark")),
        }
    }
}

/// Login flag and theme, each stored under its own key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Preferences {
    pub logged_in: bool,
    pub theme: Theme,
}

impl Preferences {
    /// Each value falls back to its default on its own.
    pub fn load(storage: &impl Storage) -> Self {
        Self {
            logged_in: read_json(storage, LOGGED_IN_KEY).unwrap_or_default(),
            theme: read_json(storage, THEME_KEY).unwrap_or_default(),
        }
    }

    pub fn set_logged_in(&mut self, storage: &mut impl Storage, logged_in: bool) {
        self.logged_in = logged_in;
        write_json(storage, LOGGED_IN_KEY, &logged_in);
    }

    pub fn set_theme(&mut self, storage: &mut impl Storage, theme: Theme) {
        self.theme = theme;
        write_json(storage, THEME_KEY, &theme);
    }
}
