//! Records returned by the top.gg API and the parameters sent to it.
//!
//! # Design
//! Field names follow the remote JSON (camelCase, with a few all-lowercase
//! legacy names such as `shortdesc`). Fields the service may leave out are
//! `Option` or default to empty, so partial records such as vote listings
//! still deserialize into `User`.

use serde::{Deserialize, Serialize};

/// A bot listed on top.gg.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Bot {
    pub id: String,
    pub username: String,
    pub discriminator: String,
    pub avatar: Option<String>,
    #[serde(default)]
    pub def_avatar: String,
    #[serde(default)]
    pub lib: String,
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub shortdesc: String,
    pub longdesc: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub website: Option<String>,
    pub github: Option<String>,
    #[serde(default)]
    pub owners: Vec<String>,
    #[serde(default)]
    pub guilds: Vec<String>,
    pub invite: Option<String>,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub certified_bot: bool,
    pub vanity: Option<String>,
    #[serde(default)]
    pub points: u64,
    #[serde(default)]
    pub monthly_points: u64,
    #[serde(default)]
    pub donatebotguildid: String,
}

/// Social links on a user profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserSocials {
    pub youtube: Option<String>,
    pub reddit: Option<String>,
    pub twitter: Option<String>,
    pub instagram: Option<String>,
    pub github: Option<String>,
}

/// A top.gg user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub discriminator: String,
    pub avatar: Option<String>,
    #[serde(default)]
    pub def_avatar: String,
    pub bio: Option<String>,
    pub banner: Option<String>,
    #[serde(default)]
    pub social: UserSocials,
    pub color: Option<String>,
    #[serde(default)]
    pub supporter: bool,
    #[serde(default)]
    pub certified_dev: bool,
    #[serde(default)]
    pub r#mod: bool,
    #[serde(default)]
    pub web_mod: bool,
    #[serde(default)]
    pub admin: bool,
}

/// Stats payload as sent by the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BotStatsPayload {
    pub server_count: Option<u64>,
    #[serde(default)]
    pub shards: Vec<u64>,
    pub shard_count: Option<u64>,
}

/// A bot's posted statistics.
///
/// `shards` holds per-shard guild counts and is empty when the server
/// reported none.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BotStats {
    pub server_count: Option<u64>,
    pub shards: Vec<u64>,
    pub shard_count: Option<u64>,
}

impl From<BotStatsPayload> for BotStats {
    fn from(payload: BotStatsPayload) -> Self {
        Self {
            server_count: payload.server_count,
            shards: payload.shards,
            shard_count: payload.shard_count,
        }
    }
}

/// Search parameters for `GET /bots`.
///
/// Sent as query parameters in field order; `None` fields are left out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BotQuery {
    /// Number of bots to return. The service caps this at 500.
    pub limit: Option<u32>,
    /// Number of bots to skip.
    pub offset: Option<u32>,
    /// Search string in the form `field: value field2: value2`.
    pub search: Option<String>,
    /// Field to sort by; prefix with `-` to reverse the order.
    pub sort: Option<String>,
    /// Comma separated list of fields to return.
    pub fields: Option<String>,
}

impl BotQuery {
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(offset) = self.offset {
            pairs.push(("offset".to_string(), offset.to_string()));
        }
        let strings = [
            ("search", &self.search),
            ("sort", &self.sort),
            ("fields", &self.fields),
        ];
        for (key, value) in strings {
            if let Some(value) = value {
                pairs.push((key.to_string(), value.clone()));
            }
        }
        pairs
    }
}

/// Request body for `POST /bots/stats`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatsUpdate {
    pub server_count: u64,
    pub shard_id: u64,
    pub shard_count: u64,
}

impl StatsUpdate {
    /// Stats for an unsharded bot: shard 0 of 1.
    pub fn new(server_count: u64) -> Self {
        Self {
            server_count,
            shard_id: 0,
            shard_count: 1,
        }
    }

    pub fn with_shard(mut self, shard_id: u64, shard_count: u64) -> Self {
        self.shard_id = shard_id;
        self.shard_count = shard_count;
        self
    }
}
