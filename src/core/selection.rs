//! # Selection Normalization
//!
//! A selection screen hands back whatever record it listed: a user, a
//! channel, or a static option. Everything downstream wants the same
//! `{text, value}` pair, so this module folds the three shapes into one.
//!
//! ```text
//! User    { id, username, .. }  ──display_username()──┐
//! Channel { id, display_name }  ──────────────────────┼──▶ SelectedOption { text, value }
//! Option  { text, value }       ──────────────────────┘
//! ```

use clap::ValueEnum;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::core::directory::{ChannelRecord, UserRecord};
use crate::core::schema::{DataSource, SelectOption};

/// Normalized result of a selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedOption {
    pub text: String,
    pub value: String,
}

/// Identifies one in-flight selection request.
///
/// A completion carrying a stale token (the selector was torn down or a
/// different request was issued since) is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SelectionToken(pub u64);

/// Raw record returned by a selection screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionRecord {
    User(UserRecord),
    Channel(ChannelRecord),
    Option(SelectOption),
}

/// How user names are shown to teammates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum TeammateNameDisplay {
    #[default]
    #[value(name = "username")]
    Username,
    #[value(name = "nickname_full_name")]
    NicknameFullName,
    #[value(name = "full_name")]
    FullName,
}

impl TeammateNameDisplay {
    /// Parse the config/env spelling of a setting.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "username" => Some(Self::Username),
            "nickname_full_name" => Some(Self::NicknameFullName),
            "full_name" => Some(Self::FullName),
            _ => None,
        }
    }
}

/// Formats a user for display. Injected so callers can swap the convention.
pub type NameFormatter = fn(&UserRecord, TeammateNameDisplay) -> String;

/// "first last", or whichever half is present.
pub fn full_name(user: &UserRecord) -> String {
    let first = user.first_name.trim();
    let last = user.last_name.trim();
    match (first.is_empty(), last.is_empty()) {
        (false, false) => format!("{first} {last}"),
        (false, true) => first.to_string(),
        (true, false) => last.to_string(),
        (true, true) => String::new(),
    }
}

/// Default name formatter. Blank results fall back to the username.
pub fn display_username(user: &UserRecord, setting: TeammateNameDisplay) -> String {
    let name = match setting {
        TeammateNameDisplay::NicknameFullName => {
            if user.nickname.trim().is_empty() {
                full_name(user)
            } else {
                user.nickname.clone()
            }
        }
        TeammateNameDisplay::FullName => full_name(user),
        TeammateNameDisplay::Username => user.username.clone(),
    };

    if name.trim().is_empty() {
        user.username.clone()
    } else {
        name
    }
}

impl SelectionRecord {
    /// Text shown for this record in a list.
    pub fn label(&self, setting: TeammateNameDisplay, formatter: NameFormatter) -> String {
        match self {
            SelectionRecord::User(user) => formatter(user, setting),
            SelectionRecord::Channel(channel) => channel.display_name.clone(),
            SelectionRecord::Option(option) => option.text.clone(),
        }
    }

    /// Case-insensitive filter used by the selection screen.
    pub fn matches(&self, query: &str, setting: TeammateNameDisplay, formatter: NameFormatter) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        let label = self.label(setting, formatter).to_lowercase();
        let secondary = match self {
            SelectionRecord::User(user) => user.username.to_lowercase(),
            SelectionRecord::Channel(channel) => channel.name.to_lowercase(),
            SelectionRecord::Option(option) => option.value.to_lowercase(),
        };
        label.contains(&query) || secondary.contains(&query)
    }

    fn kind_matches(&self, data_source: DataSource) -> bool {
        matches!(
            (data_source, self),
            (DataSource::Users, SelectionRecord::User(_))
                | (DataSource::Channels, SelectionRecord::Channel(_))
                | (DataSource::Custom, SelectionRecord::Option(_))
        )
    }
}

/// Fold a raw record into a `SelectedOption`.
///
/// Users are formatted with `formatter`, channels show their display name,
/// static options pass through. The pair is not checked against any list.
pub fn normalize(
    data_source: DataSource,
    record: &SelectionRecord,
    setting: TeammateNameDisplay,
    formatter: NameFormatter,
) -> SelectedOption {
    if !record.kind_matches(data_source) {
        warn!(
            "Selection record {:?} does not match data source {:?}",
            record, data_source
        );
    }

    match record {
        SelectionRecord::User(user) => SelectedOption {
            text: formatter(user, setting),
            value: user.id.clone(),
        },
        SelectionRecord::Channel(channel) => SelectedOption {
            text: channel.display_name.clone(),
            value: channel.id.clone(),
        },
        SelectionRecord::Option(option) => SelectedOption {
            text: option.text.clone(),
            value: option.value.clone(),
        },
    }
}

/// Derive the display text from an externally supplied selection.
///
/// A new, different selection replaces the display text; anything else
/// (no selection, or the one already seen) keeps the previous text.
pub fn reconcile_display(
    prev_selection: Option<&SelectedOption>,
    next_selection: Option<&SelectedOption>,
    prev_display: Option<&str>,
) -> Option<String> {
    match next_selection {
        Some(next) if prev_selection != Some(next) => Some(next.text.clone()),
        _ => prev_display.map(str::to_string),
    }
}
