//! Facebook markup parsing.
//!
//! The mobile site still renders server-side HTML with `data-sigil`
//! attributes; the desktop site only reliably exposes JSON-LD and `og:` tags.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;
use serde_json::Value;
use socialscope_core::{FacebookPost, FacebookProfile, MAX_FACEBOOK_POSTS};

use crate::adapters::{contains_any, de};
use crate::meta::{first_count, MetaTags};

/// Post bodies are cut to this many characters.
const MAX_POST_CHARS: usize = 500;

macro_rules! selector {
    ($name:ident, $css:expr) => {
        static $name: LazyLock<Selector> =
            LazyLock::new(|| Selector::parse($css).expect("valid selector"));
    };
}

selector!(TITLE, "title");
selector!(H1, "h1");
selector!(AVATAR_ALT, r#"img[alt*="profile"]"#);
selector!(AVATAR_PROFPIC, "img.profpic");
selector!(AVATAR_LAZY, "img[data-src]");
selector!(COVER_INTRO, r#"div[data-sigil="timeline-cover-intro"]"#);
selector!(COVER_PHOTO, r#"img[data-sigil="cover-photo"]"#);
selector!(STORY, r#"article, div[data-sigil="story-div"]"#);
selector!(STORY_BODY, r#"div[data-sigil="story-body"]"#);
selector!(IMG, "img");
selector!(REACTIONS, r#"[data-sigil="reactions-sentence-container"]"#);
selector!(COMMENT_LINK, r#"a[href*="comment"]"#);
selector!(SHARE_LINK, r#"a[href*="share"]"#);
selector!(LD_JSON, r#"script[type="application/ld+json"]"#);

static TITLE_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\|.*$").expect("valid regex"));
static FOLLOWERS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([0-9][0-9,.]*[KMB]?)\s*(?:people follow this|followers?)")
        .expect("valid regex")
});
static FRIENDS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([0-9][0-9,.]*[KMB]?)\s*friends?").expect("valid regex"));
static META_FOLLOWERS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([0-9][0-9,.]*[KMB]?)\s*(?:like|follow)").expect("valid regex")
});
static LEADING_COUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9][0-9,.]*[KMB]?)").expect("valid regex"));

/// A name of exactly "Facebook" means the login wall, not a profile.
fn is_real_name(name: &str) -> bool {
    !name.is_empty() && name != "Facebook"
}

fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_owned()
}

fn first_text(scope: ElementRef<'_>, selector: &Selector) -> Option<String> {
    scope
        .select(selector)
        .next()
        .map(text_of)
        .filter(|s| !s.is_empty())
}

fn first_attr(scope: ElementRef<'_>, selector: &Selector, attr: &str) -> Option<String> {
    scope
        .select(selector)
        .next()
        .and_then(|el| el.value().attr(attr))
        .map(str::to_owned)
        .filter(|s| !s.is_empty())
}

/// Strategy 1: server-rendered mobile timeline.
pub(super) fn from_mobile_html(html: &str, identity: &str) -> Option<FacebookProfile> {
    let document = Html::parse_document(html);
    let root = document.root_element();

    let name = first_text(root, &TITLE)
        .map(|t| TITLE_SUFFIX_RE.replace(&t, "").trim().to_owned())
        .filter(|t| !t.is_empty())
        .or_else(|| first_text(root, &H1))
        .unwrap_or_default();
    if !is_real_name(&name) {
        return None;
    }

    let profile_pic_url = first_attr(root, &AVATAR_ALT, "src")
        .or_else(|| first_attr(root, &AVATAR_PROFPIC, "src"))
        .or_else(|| first_attr(root, &AVATAR_LAZY, "data-src"))
        .unwrap_or_default();

    let page_text = root.text().collect::<String>();

    Some(FacebookProfile {
        username: identity.to_owned(),
        name,
        bio: first_text(root, &COVER_INTRO),
        profile_pic_url,
        cover_photo_url: first_attr(root, &COVER_PHOTO, "src"),
        followers_count: first_count(&FOLLOWERS_RE, &page_text),
        friends_count: first_count(&FRIENDS_RE, &page_text),
        is_verified: contains_any(html, &["verified", "Verified"]),
        posts: mobile_posts(root),
    })
}

fn mobile_posts(root: ElementRef<'_>) -> Vec<FacebookPost> {
    let mut posts = Vec::new();
    for story in root.select(&STORY).take(MAX_FACEBOOK_POSTS) {
        let content = first_text(story, &STORY_BODY)
            .map(|body| body.chars().take(MAX_POST_CHARS).collect::<String>());
        let image_url = first_attr(story, &IMG, "src");
        if content.is_none() && image_url.is_none() {
            continue;
        }
        let count_in = |selector: &Selector| {
            let text = story
                .select(selector)
                .map(text_of)
                .collect::<Vec<_>>()
                .join(" ");
            first_count(&LEADING_COUNT_RE, &text)
        };
        posts.push(FacebookPost {
            id: format!("post-{}", posts.len()),
            content,
            image_url,
            likes: count_in(&REACTIONS),
            comments: count_in(&COMMENT_LINK),
            shares: count_in(&SHARE_LINK),
            timestamp: None,
        });
    }
    posts
}

/// JSON-LD node for a person or page.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LdNode {
    #[serde(rename = "@type")]
    kind: Option<Value>,
    #[serde(deserialize_with = "de::opt_string")]
    name: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    description: Option<String>,
    image: Option<LdImage>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LdImage {
    Url(String),
    Object {
        #[serde(default)]
        url: Option<String>,
    },
}

impl LdNode {
    fn is_profile(&self) -> bool {
        let is_profile_type = |t: &str| t == "Person" || t == "Organization";
        match &self.kind {
            Some(Value::String(t)) => is_profile_type(t),
            Some(Value::Array(types)) => types
                .iter()
                .filter_map(Value::as_str)
                .any(is_profile_type),
            _ => false,
        }
    }
}

/// Strategy 2: desktop JSON-LD.
///
/// Scripts that fail to decode are skipped; the first Person or
/// Organization node wins.
pub(super) fn from_ld_json(html: &str, identity: &str) -> Option<FacebookProfile> {
    let document = Html::parse_document(html);
    let node = document
        .select(&LD_JSON)
        .filter_map(|script| serde_json::from_str::<Value>(&script.text().collect::<String>()).ok())
        .flat_map(|value| match value {
            Value::Array(items) => items,
            other => vec![other],
        })
        .filter_map(|value| LdNode::deserialize(value).ok())
        .find(LdNode::is_profile)?;

    let profile_pic_url = match node.image {
        Some(LdImage::Url(url)) => url,
        Some(LdImage::Object { url }) => url.unwrap_or_default(),
        None => String::new(),
    };
    Some(FacebookProfile {
        username: identity.to_owned(),
        name: node.name.unwrap_or_else(|| identity.to_owned()),
        bio: node.description,
        profile_pic_url,
        cover_photo_url: None,
        followers_count: None,
        friends_count: None,
        is_verified: false,
        posts: Vec::new(),
    })
}

/// Strategies 3 and 4: `og:` tags on either page.
pub(super) fn from_meta_tags(html: &str, identity: &str) -> Option<FacebookProfile> {
    let tags = MetaTags::from_html(html);
    let name = tags.title.clone().filter(|t| is_real_name(t))?;
    let description = tags.description_or_empty();
    Some(FacebookProfile {
        username: identity.to_owned(),
        name,
        followers_count: first_count(&META_FOLLOWERS_RE, description),
        bio: tags.description.clone(),
        profile_pic_url: tags.image.unwrap_or_default(),
        cover_photo_url: None,
        friends_count: None,
        is_verified: contains_any(html, &[r#""is_verified":true"#, "verified-icon"]),
        posts: Vec::new(),
    })
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
