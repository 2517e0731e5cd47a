//! TikTok shapes.
//!
//! The aggregator wraps every payload as `{"code": 0, "msg": "success",
//! "data": {...}}`; a non-zero `code` means the lookup failed upstream even
//! though the HTTP status is 200. The `user`/`stats` objects it returns are
//! the same camelCase shapes the web page embeds under
//! `__DEFAULT_SCOPE__["webapp.user-detail"].userInfo`.

use serde::Deserialize;
use serde_json::Value;

use crate::adapters::de;

#[derive(Debug, Deserialize)]
pub(super) struct Envelope {
    pub code: i64,
    #[serde(default)]
    pub msg: Option<String>,
    /// Decoded only after `code` is checked; failures carry `[]` or `null`.
    #[serde(default)]
    pub data: Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct UserInfo {
    pub user: Option<User>,
    pub stats: Option<Stats>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(super) struct User {
    #[serde(deserialize_with = "de::opt_string")]
    pub unique_id: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    pub nickname: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    pub avatar_larger: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    pub avatar_medium: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    pub avatar_thumb: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    pub signature: Option<String>,
    pub verified: Option<bool>,
    #[serde(deserialize_with = "de::opt_string")]
    pub sec_uid: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(super) struct Stats {
    #[serde(deserialize_with = "de::opt_count")]
    pub follower_count: Option<u64>,
    #[serde(deserialize_with = "de::opt_count")]
    pub following_count: Option<u64>,
    #[serde(deserialize_with = "de::opt_count")]
    pub heart_count: Option<u64>,
    #[serde(deserialize_with = "de::opt_count")]
    pub heart: Option<u64>,
    #[serde(deserialize_with = "de::opt_count")]
    pub video_count: Option<u64>,
}

/// `data` of both `/api/user/posts` and `/api/user/story`.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub(super) struct MediaList<T> {
    #[serde(default, deserialize_with = "de::nullable")]
    pub videos: Vec<T>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct Video {
    #[serde(deserialize_with = "de::opt_string")]
    pub video_id: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    pub title: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    pub cover: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    pub origin_cover: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    pub play: Option<String>,
    #[serde(deserialize_with = "de::opt_count")]
    pub digg_count: Option<u64>,
    #[serde(deserialize_with = "de::opt_count")]
    pub comment_count: Option<u64>,
    #[serde(deserialize_with = "de::opt_count")]
    pub share_count: Option<u64>,
    #[serde(deserialize_with = "de::opt_count")]
    pub play_count: Option<u64>,
    pub create_time: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct Story {
    #[serde(deserialize_with = "de::opt_string")]
    pub video_id: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    pub cover: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    pub origin_cover: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    pub play: Option<String>,
    #[serde(deserialize_with = "de::opt_count")]
    pub duration: Option<u64>,
    pub create_time: Option<i64>,
    #[serde(deserialize_with = "de::nullable")]
    pub images: Vec<String>,
    #[serde(deserialize_with = "de::opt_string")]
    pub music: Option<String>,
    pub music_info: Option<MusicInfo>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct MusicInfo {
    #[serde(deserialize_with = "de::opt_string")]
    pub title: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    pub play: Option<String>,
}
