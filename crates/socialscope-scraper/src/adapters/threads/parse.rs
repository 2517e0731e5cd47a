//! Threads payload search and mapping.
//!
//! The profile page ships its state as a set of `<script data-sjs>` JSON
//! blobs whose layout changes often, so the user object is located by
//! shape rather than by path.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};
use serde::Deserialize;
use serde_json::{Map, Value};
use socialscope_core::{ThreadsPost, ThreadsProfile, MAX_CONTENT_ITEMS};

use crate::adapters::{contains_any, de};
use crate::error::ExtractError;
use crate::locate::{extract_balanced_object, find_by_signature, str_field};
use crate::meta::{first_count, name_from_title, MetaTags};
use crate::normalize::sanitize_identity;

static SJS_SCRIPT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("script[data-sjs]").expect("valid selector"));
static FOLLOWERS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([0-9][0-9,.]*[KMB]?)\s*followers?").expect("valid regex"));

const SERVER_JS_MARKER: &str = r#"require("ServerJS")"#;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct User {
    #[serde(deserialize_with = "de::opt_string")]
    username: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    full_name: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    biography: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    bio: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    profile_pic_url: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    hd_profile_pic_url: Option<String>,
    #[serde(deserialize_with = "de::opt_count")]
    follower_count: Option<u64>,
    is_verified: Option<bool>,
    #[serde(deserialize_with = "de::nullable")]
    threads: Vec<Post>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Post {
    #[serde(deserialize_with = "de::opt_string")]
    id: Option<String>,
    caption: Option<Caption>,
    image_versions2: Option<ImageVersions>,
    #[serde(deserialize_with = "de::opt_count")]
    like_count: Option<u64>,
    #[serde(deserialize_with = "de::opt_count")]
    reply_count: Option<u64>,
    #[serde(deserialize_with = "de::opt_count")]
    repost_count: Option<u64>,
    taken_at: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Caption {
    #[serde(deserialize_with = "de::opt_string")]
    text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ImageVersions {
    #[serde(deserialize_with = "de::nullable")]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Candidate {
    #[serde(deserialize_with = "de::opt_string")]
    url: Option<String>,
}

/// A non-empty `username` plus at least one descriptive field.
fn is_user_shaped(map: &Map<String, Value>) -> bool {
    str_field(map, "username").is_some()
        && ["full_name", "biography", "profile_pic_url"]
            .iter()
            .any(|k| str_field(map, k).is_some())
}

/// Strategy 1: `<script data-sjs>` payloads.
///
/// Scripts that are not JSON are skipped.
pub(super) fn from_sjs_scripts(
    html: &str,
    identity: &str,
) -> Result<Option<ThreadsProfile>, ExtractError> {
    let payloads: Vec<Value> = {
        let document = Html::parse_document(html);
        document
            .select(&SJS_SCRIPT)
            .filter_map(|script| serde_json::from_str(&script.text().collect::<String>()).ok())
            .collect()
    };
    payloads
        .iter()
        .find_map(|payload| find_by_signature(payload, is_user_shaped))
        .map(|user| map_user(user, identity))
        .transpose()
}

/// Strategy 2: the object following `require("ServerJS")`.
pub(super) fn from_server_js(
    html: &str,
    identity: &str,
) -> Result<Option<ThreadsProfile>, ExtractError> {
    let Some(at) = html.find(SERVER_JS_MARKER) else {
        return Ok(None);
    };
    let after = &html[at + SERVER_JS_MARKER.len()..];
    let Some(raw) = after.find('{').and_then(|i| extract_balanced_object(&after[i..])) else {
        return Ok(None);
    };
    let payload: Value =
        serde_json::from_str(raw).map_err(|e| ExtractError::decode("threads ServerJS", e))?;
    find_by_signature(&payload, is_user_shaped)
        .map(|user| map_user(user, identity))
        .transpose()
}

/// Strategy 3: `og:` tags with an "N followers" description.
pub(super) fn from_meta_tags(html: &str, identity: &str) -> Option<ThreadsProfile> {
    let tags = MetaTags::from_html(html);
    let followers = first_count(&FOLLOWERS_RE, tags.description_or_empty());
    if followers.is_none() && tags.image.is_none() {
        return None;
    }
    Some(ThreadsProfile {
        username: identity.to_owned(),
        full_name: name_from_title(tags.title_or_empty()).unwrap_or_else(|| identity.to_owned()),
        bio: None,
        profile_pic_url: tags.image.unwrap_or_default(),
        followers_count: followers,
        is_verified: contains_any(html, &[r#""is_verified":true"#, "verified"]),
        threads: Vec::new(),
    })
}

fn map_user(value: &Value, identity: &str) -> Result<ThreadsProfile, ExtractError> {
    let user = User::deserialize(value).map_err(|e| ExtractError::decode("threads user", e))?;
    let username = user
        .username
        .as_deref()
        .map(sanitize_identity)
        .filter(|u| !u.is_empty())
        .unwrap_or_else(|| identity.to_owned());
    let threads = user
        .threads
        .into_iter()
        .take(MAX_CONTENT_ITEMS)
        .enumerate()
        .map(|(idx, post)| ThreadsPost {
            id: post.id.unwrap_or_else(|| format!("thread-{idx}")),
            content: post.caption.and_then(|c| c.text),
            image_url: post
                .image_versions2
                .and_then(|v| v.candidates.into_iter().next())
                .and_then(|c| c.url),
            likes: post.like_count,
            replies: post.reply_count,
            reposts: post.repost_count,
            timestamp: post.taken_at,
        })
        .collect();
    Ok(ThreadsProfile {
        full_name: user.full_name.unwrap_or_else(|| username.clone()),
        username,
        bio: user.biography.or(user.bio),
        profile_pic_url: user
            .profile_pic_url
            .or(user.hd_profile_pic_url)
            .unwrap_or_default(),
        followers_count: user.follower_count,
        is_verified: user.is_verified.unwrap_or(false),
        threads,
    })
}
