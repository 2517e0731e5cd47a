//! Instagram page and payload parsing.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use socialscope_core::{InstagramPost, InstagramProfile, MAX_CONTENT_ITEMS};

use super::types::{GraphUser, MediaEdge};
use crate::adapters::contains_any;
use crate::error::ExtractError;
use crate::locate::{extract_balanced_object, find_by_signature, object_after_marker, str_field};
use crate::meta::{bio_after_posts, name_from_title, parse_stat_triplet, MetaTags, ThirdStat};
use crate::normalize::sanitize_identity;

static ADDITIONAL_DATA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"__additionalDataLoaded\s*\([^,]+,\s*").expect("valid regex"));

/// Strategy 1: `window._sharedData = {...};`.
///
/// The object must close inside its own `<script>` element.
pub(super) fn from_shared_data(
    html: &str,
    identity: &str,
) -> Result<Option<InstagramProfile>, ExtractError> {
    let Some(raw) = object_after_marker(html, "window._sharedData") else {
        return Ok(None);
    };
    let data: Value =
        serde_json::from_str(raw).map_err(|e| ExtractError::decode("instagram _sharedData", e))?;
    match data.pointer("/entry_data/ProfilePage/0/graphql/user") {
        Some(user) => user_from_value(user, identity).map(Some),
        None => Ok(None),
    }
}

/// Strategy 2: `__additionalDataLoaded('/handle/', {...});`.
pub(super) fn from_additional_data(
    html: &str,
    identity: &str,
) -> Result<Option<InstagramProfile>, ExtractError> {
    let Some(start) = ADDITIONAL_DATA_RE.find(html) else {
        return Ok(None);
    };
    let Some(raw) = extract_balanced_object(&html[start.end()..]) else {
        return Ok(None);
    };
    let data: Value = serde_json::from_str(raw)
        .map_err(|e| ExtractError::decode("instagram __additionalDataLoaded", e))?;
    match data
        .pointer("/graphql/user")
        .or_else(|| data.get("user"))
        .filter(|u| u.is_object())
    {
        Some(user) => user_from_value(user, identity).map(Some),
        None => Ok(None),
    }
}

/// Strategy 3: the query preloader blob, a string-escaped JSON document
/// following a `profilePage` key.
pub(super) fn from_query_preloader(
    html: &str,
    identity: &str,
) -> Result<Option<InstagramProfile>, ExtractError> {
    let Some(preloader) = html.find("PolarisQueryPreloader") else {
        return Ok(None);
    };
    let after = &html[preloader..];
    let Some(page) = after.find("profilePage") else {
        return Ok(None);
    };
    let unescaped = after[page..].replace("\\\"", "\"");
    let Some(brace) = unescaped.find('{') else {
        return Ok(None);
    };
    let Some(raw) = extract_balanced_object(&unescaped[brace..]) else {
        return Ok(None);
    };
    let data: Value = serde_json::from_str(raw)
        .map_err(|e| ExtractError::decode("instagram query preloader", e))?;
    let user = data
        .get("user")
        .filter(|u| u.is_object())
        .or_else(|| find_by_signature(&data, is_user_shaped));
    match user {
        Some(user) => user_from_value(user, identity).map(Some),
        None => Ok(None),
    }
}

/// Strategy 4: `og:` tags.
pub(super) fn from_meta_tags(html: &str, identity: &str) -> Option<InstagramProfile> {
    let tags = MetaTags::from_html(html);
    let stats = parse_stat_triplet(tags.description_or_empty(), ThirdStat::Posts);
    if stats.is_none() && tags.image.is_none() {
        return None;
    }

    let is_private = html.contains(r#""is_private":true"#);
    Some(InstagramProfile {
        username: identity.to_owned(),
        full_name: name_from_title(tags.title_or_empty()).unwrap_or_else(|| identity.to_owned()),
        bio: bio_after_posts(tags.description_or_empty()),
        profile_pic_url: tags.image.clone().unwrap_or_default(),
        profile_pic_url_hd: tags.image,
        followers_count: stats.map(|s| s.followers),
        following_count: stats.map(|s| s.following),
        posts_count: stats.map(|s| s.third),
        is_verified: contains_any(html, &[r#""is_verified":true"#]),
        is_private,
        external_url: None,
        category: None,
        posts: Vec::new(),
    })
}

/// Decodes a GraphQL-style user and maps it.
pub(super) fn user_from_value(
    user: &Value,
    identity: &str,
) -> Result<InstagramProfile, ExtractError> {
    let user = GraphUser::deserialize(user).map_err(|e| ExtractError::decode("instagram user", e))?;
    Ok(map_user(user, identity))
}

fn is_user_shaped(map: &serde_json::Map<String, Value>) -> bool {
    str_field(map, "username").is_some()
        && ["full_name", "biography", "profile_pic_url"]
            .iter()
            .any(|k| map.contains_key(*k))
}

fn map_user(user: GraphUser, identity: &str) -> InstagramProfile {
    let username = user
        .username
        .as_deref()
        .map(sanitize_identity)
        .filter(|u| !u.is_empty())
        .unwrap_or_else(|| identity.to_owned());
    let full_name = user.full_name.unwrap_or_else(|| username.clone());
    let is_private = user.is_private.unwrap_or(false);
    let profile_pic_url = user.profile_pic_url.unwrap_or_default();
    let (posts_count, edges) = match user.edge_owner_to_timeline_media {
        Some(timeline) => (timeline.count, timeline.edges),
        None => (None, Vec::new()),
    };
    let posts = if is_private {
        Vec::new()
    } else {
        edges
            .into_iter()
            .take(MAX_CONTENT_ITEMS)
            .enumerate()
            .map(|(idx, edge)| map_post(idx, edge))
            .collect()
    };

    InstagramProfile {
        username,
        full_name,
        bio: user.biography,
        profile_pic_url_hd: user
            .profile_pic_url_hd
            .or_else(|| Some(profile_pic_url.clone()).filter(|u| !u.is_empty())),
        profile_pic_url,
        followers_count: user.edge_followed_by.and_then(|e| e.count),
        following_count: user.edge_follow.and_then(|e| e.count),
        posts_count,
        is_verified: user.is_verified.unwrap_or(false),
        is_private,
        external_url: user.external_url,
        category: user.category_name,
        posts,
    }
}

fn map_post(idx: usize, edge: MediaEdge) -> InstagramPost {
    let node = edge.node;
    let caption = node
        .edge_media_to_caption
        .and_then(|c| c.edges.into_iter().next())
        .and_then(|e| e.node.text);
    InstagramPost {
        id: node
            .id
            .or_else(|| node.shortcode.clone())
            .unwrap_or_else(|| format!("post-{idx}")),
        shortcode: node.shortcode,
        image_url: node.display_url,
        thumbnail_url: node.thumbnail_src,
        likes: node.edge_liked_by.and_then(|e| e.count),
        comments: node.edge_media_to_comment.and_then(|e| e.count),
        is_video: node.is_video.unwrap_or(false),
        video_url: node.video_url,
        caption,
        timestamp: node.taken_at_timestamp,
    }
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
