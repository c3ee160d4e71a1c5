//! # Directory
//!
//! The users and channels a selection screen can offer. Records come from
//! the `[[users]]` and `[[channels]]` tables of the config file.

use serde::{Deserialize, Serialize};

use crate::core::schema::{DataSource, SelectOption};
use crate::core::selection::SelectionRecord;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct UserRecord {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub nickname: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChannelRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub display_name: String,
}

#[derive(Debug, Clone, Default)]
pub struct Directory {
    pub users: Vec<UserRecord>,
    pub channels: Vec<ChannelRecord>,
}

impl Directory {
    pub fn new(users: Vec<UserRecord>, channels: Vec<ChannelRecord>) -> Self {
        Self { users, channels }
    }

    /// Records to list for a data source. Static selects list their own options.
    pub fn entries(&self, data_source: DataSource, options: &[SelectOption]) -> Vec<SelectionRecord> {
        match data_source {
            DataSource::Users => self
                .users
                .iter()
                .cloned()
                .map(SelectionRecord::User)
                .collect(),
            DataSource::Channels => self
                .channels
                .iter()
                .cloned()
                .map(SelectionRecord::Channel)
                .collect(),
            DataSource::Custom => options
                .iter()
                .cloned()
                .map(SelectionRecord::Option)
                .collect(),
        }
    }
}
