//! Instagram user shapes.
//!
//! The same GraphQL-style `user` object is served by three sources:
//! `window._sharedData` at `entry_data.ProfilePage[0].graphql.user`,
//! `__additionalDataLoaded(...)` at `graphql.user` or `user`, and the
//! `web_profile_info` endpoint at `data.user`. Counters are wrapped as
//! `{"count": n}` edges and any field may be `null`.

use serde::Deserialize;

use crate::adapters::de;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct GraphUser {
    #[serde(deserialize_with = "de::opt_string")]
    pub username: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    pub full_name: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    pub biography: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    pub profile_pic_url: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    pub profile_pic_url_hd: Option<String>,
    pub edge_followed_by: Option<EdgeCount>,
    pub edge_follow: Option<EdgeCount>,
    pub edge_owner_to_timeline_media: Option<Timeline>,
    pub is_verified: Option<bool>,
    pub is_private: Option<bool>,
    #[serde(deserialize_with = "de::opt_string")]
    pub external_url: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    pub category_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct EdgeCount {
    #[serde(deserialize_with = "de::opt_count")]
    pub count: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct Timeline {
    #[serde(deserialize_with = "de::opt_count")]
    pub count: Option<u64>,
    #[serde(deserialize_with = "de::nullable")]
    pub edges: Vec<MediaEdge>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct MediaEdge {
    #[serde(deserialize_with = "de::nullable")]
    pub node: MediaNode,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct MediaNode {
    #[serde(deserialize_with = "de::opt_string")]
    pub id: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    pub shortcode: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    pub display_url: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    pub thumbnail_src: Option<String>,
    pub edge_liked_by: Option<EdgeCount>,
    pub edge_media_to_comment: Option<EdgeCount>,
    pub is_video: Option<bool>,
    #[serde(deserialize_with = "de::opt_string")]
    pub video_url: Option<String>,
    pub edge_media_to_caption: Option<CaptionEdges>,
    pub taken_at_timestamp: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct CaptionEdges {
    #[serde(deserialize_with = "de::nullable")]
    pub edges: Vec<CaptionEdge>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct CaptionEdge {
    #[serde(deserialize_with = "de::nullable")]
    pub node: CaptionNode,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct CaptionNode {
    #[serde(deserialize_with = "de::opt_string")]
    pub text: Option<String>,
}
