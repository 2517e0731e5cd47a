//! Canonical, platform-typed profile records.
//!
//! Every adapter maps its upstream shapes into one of these families. Values
//! are built once per request and handed to the caller; nothing here is
//! shared or mutated after construction.
//!
//! Counters are `Option<u64>`: `None` means the source did not expose the
//! number, which is different from an exposed zero.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::platform::Platform;

/// Upper bound on content items carried by a profile.
pub const MAX_CONTENT_ITEMS: usize = 12;

/// Upper bound on posts read from the Facebook mobile timeline.
pub const MAX_FACEBOOK_POSTS: usize = 6;

/// Behaviour shared by all per-platform profile records.
pub trait CanonicalProfile {
    const PLATFORM: Platform;

    /// Normalized handle (lower-case, no leading `@`).
    fn username(&self) -> &str;

    fn display_name(&self) -> &str;

    /// A profile is usable when it names someone.
    fn is_minimally_valid(&self) -> bool {
        !self.username().trim().is_empty() || !self.display_name().trim().is_empty()
    }
}

/// Converts an epoch-seconds timestamp as exposed upstream.
#[must_use]
pub fn timestamp_to_datetime(epoch_secs: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(epoch_secs, 0)
}

// ---------------------------------------------------------------------------
// Instagram
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstagramProfile {
    pub username: String,
    pub full_name: String,
    pub bio: Option<String>,
    pub profile_pic_url: String,
    pub profile_pic_url_hd: Option<String>,
    pub followers_count: Option<u64>,
    pub following_count: Option<u64>,
    pub posts_count: Option<u64>,
    pub is_verified: bool,
    /// Private accounts never carry posts.
    pub is_private: bool,
    pub external_url: Option<String>,
    pub category: Option<String>,
    pub posts: Vec<InstagramPost>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstagramPost {
    pub id: String,
    pub shortcode: Option<String>,
    pub image_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub likes: Option<u64>,
    pub comments: Option<u64>,
    pub is_video: bool,
    pub video_url: Option<String>,
    pub caption: Option<String>,
    pub timestamp: Option<i64>,
}

impl CanonicalProfile for InstagramProfile {
    const PLATFORM: Platform = Platform::Instagram;

    fn username(&self) -> &str {
        &self.username
    }

    fn display_name(&self) -> &str {
        &self.full_name
    }
}

// ---------------------------------------------------------------------------
// Facebook
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacebookProfile {
    pub username: String,
    pub name: String,
    pub bio: Option<String>,
    pub profile_pic_url: String,
    pub cover_photo_url: Option<String>,
    pub followers_count: Option<u64>,
    pub friends_count: Option<u64>,
    pub is_verified: bool,
    pub posts: Vec<FacebookPost>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacebookPost {
    pub id: String,
    pub content: Option<String>,
    pub image_url: Option<String>,
    pub likes: Option<u64>,
    pub comments: Option<u64>,
    pub shares: Option<u64>,
    pub timestamp: Option<i64>,
}

impl CanonicalProfile for FacebookProfile {
    const PLATFORM: Platform = Platform::Facebook;

    fn username(&self) -> &str {
        &self.username
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}

// ---------------------------------------------------------------------------
// TikTok
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TikTokProfile {
    pub username: String,
    pub nickname: String,
    pub bio: Option<String>,
    pub profile_pic_url: String,
    pub followers_count: Option<u64>,
    pub following_count: Option<u64>,
    pub likes_count: Option<u64>,
    pub video_count: Option<u64>,
    pub is_verified: bool,
    pub videos: Vec<TikTokVideo>,
    pub stories: Vec<TikTokStory>,
    /// Not exposed by any current source; kept so renderers have a stable shape.
    pub reposts: Vec<TikTokVideo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TikTokVideo {
    pub id: String,
    pub description: Option<String>,
    pub cover_url: Option<String>,
    pub video_url: Option<String>,
    pub likes: Option<u64>,
    pub comments: Option<u64>,
    pub shares: Option<u64>,
    pub views: Option<u64>,
    pub timestamp: Option<i64>,
}

/// An ephemeral TikTok item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TikTokStory {
    pub id: String,
    pub cover_url: Option<String>,
    pub media: StoryMedia,
    pub duration_secs: u64,
    pub timestamp: Option<i64>,
    pub audio: Option<StoryAudio>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StoryMedia {
    Photo { images: Vec<String> },
    Video { video_url: Option<String> },
}

impl StoryMedia {
    #[must_use]
    pub fn is_photo(&self) -> bool {
        matches!(self, StoryMedia::Photo { .. })
    }
}

/// Background audio attached to a story.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryAudio {
    pub url: Option<String>,
    pub title: Option<String>,
}

impl CanonicalProfile for TikTokProfile {
    const PLATFORM: Platform = Platform::TikTok;

    fn username(&self) -> &str {
        &self.username
    }

    fn display_name(&self) -> &str {
        &self.nickname
    }
}

// ---------------------------------------------------------------------------
// Threads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadsProfile {
    pub username: String,
    pub full_name: String,
    pub bio: Option<String>,
    pub profile_pic_url: String,
    pub followers_count: Option<u64>,
    pub is_verified: bool,
    pub threads: Vec<ThreadsPost>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadsPost {
    pub id: String,
    pub content: Option<String>,
    pub image_url: Option<String>,
    pub likes: Option<u64>,
    pub replies: Option<u64>,
    pub reposts: Option<u64>,
    pub timestamp: Option<i64>,
}

impl CanonicalProfile for ThreadsProfile {
    const PLATFORM: Platform = Platform::Threads;

    fn username(&self) -> &str {
        &self.username
    }

    fn display_name(&self) -> &str {
        &self.full_name
    }
}

// ---------------------------------------------------------------------------
// Platform-tagged union
// ---------------------------------------------------------------------------

/// A resolved profile from any supported platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "platform", rename_all = "lowercase")]
pub enum Profile {
    Instagram(InstagramProfile),
    Facebook(FacebookProfile),
    #[serde(rename = "tiktok")]
    TikTok(TikTokProfile),
    Threads(ThreadsProfile),
}

impl Profile {
    #[must_use]
    pub fn platform(&self) -> Platform {
        match self {
            Profile::Instagram(_) => Platform::Instagram,
            Profile::Facebook(_) => Platform::Facebook,
            Profile::TikTok(_) => Platform::TikTok,
            Profile::Threads(_) => Platform::Threads,
        }
    }

    #[must_use]
    pub fn username(&self) -> &str {
        match self {
            Profile::Instagram(p) => p.username(),
            Profile::Facebook(p) => p.username(),
            Profile::TikTok(p) => p.username(),
            Profile::Threads(p) => p.username(),
        }
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        match self {
            Profile::Instagram(p) => p.display_name(),
            Profile::Facebook(p) => p.display_name(),
            Profile::TikTok(p) => p.display_name(),
            Profile::Threads(p) => p.display_name(),
        }
    }

    /// Only Instagram exposes privacy; everything else reports `false`.
    #[must_use]
    pub fn is_private(&self) -> bool {
        matches!(self, Profile::Instagram(p) if p.is_private)
    }

    #[must_use]
    pub fn is_verified(&self) -> bool {
        match self {
            Profile::Instagram(p) => p.is_verified,
            Profile::Facebook(p) => p.is_verified,
            Profile::TikTok(p) => p.is_verified,
            Profile::Threads(p) => p.is_verified,
        }
    }

    #[must_use]
    pub fn followers_count(&self) -> Option<u64> {
        match self {
            Profile::Instagram(p) => p.followers_count,
            Profile::Facebook(p) => p.followers_count,
            Profile::TikTok(p) => p.followers_count,
            Profile::Threads(p) => p.followers_count,
        }
    }

    /// Number of child content items (posts, videos, stories, threads).
    #[must_use]
    pub fn content_len(&self) -> usize {
        match self {
            Profile::Instagram(p) => p.posts.len(),
            Profile::Facebook(p) => p.posts.len(),
            Profile::TikTok(p) => p.videos.len() + p.stories.len(),
            Profile::Threads(p) => p.threads.len(),
        }
    }

    /// Most recent content timestamp, when any item carries one.
    #[must_use]
    pub fn latest_activity(&self) -> Option<DateTime<Utc>> {
        let latest = match self {
            Profile::Instagram(p) => p.posts.iter().filter_map(|i| i.timestamp).max(),
            Profile::Facebook(p) => p.posts.iter().filter_map(|i| i.timestamp).max(),
            Profile::TikTok(p) => p
                .videos
                .iter()
                .filter_map(|i| i.timestamp)
                .chain(p.stories.iter().filter_map(|s| s.timestamp))
                .max(),
            Profile::Threads(p) => p.threads.iter().filter_map(|i| i.timestamp).max(),
        };
        latest.and_then(timestamp_to_datetime)
    }
}

impl From<InstagramProfile> for Profile {
    fn from(p: InstagramProfile) -> Self {
        Profile::Instagram(p)
    }
}

impl From<FacebookProfile> for Profile {
    fn from(p: FacebookProfile) -> Self {
        Profile::Facebook(p)
    }
}

impl From<TikTokProfile> for Profile {
    fn from(p: TikTokProfile) -> Self {
        Profile::TikTok(p)
    }
}

impl From<ThreadsProfile> for Profile {
    fn from(p: ThreadsProfile) -> Self {
        Profile::Threads(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn threads_profile(username: &str, full_name: &str) -> ThreadsProfile {
        ThreadsProfile {
            username: username.to_owned(),
            full_name: full_name.to_owned(),
            bio: None,
            profile_pic_url: String::new(),
            followers_count: None,
            is_verified: false,
            threads: vec![],
        }
    }

    fn instagram_profile(is_private: bool) -> InstagramProfile {
        InstagramProfile {
            username: "natgeo".to_owned(),
            full_name: "National Geographic".to_owned(),
            bio: None,
            profile_pic_url: String::new(),
            profile_pic_url_hd: None,
            followers_count: Some(10),
            following_count: None,
            posts_count: None,
            is_verified: true,
            is_private,
            external_url: None,
            category: None,
            posts: vec![],
        }
    }

    #[test]
    fn minimally_valid_requires_a_username_or_name() {
        assert!(threads_profile("zuck", "").is_minimally_valid());
        assert!(threads_profile("", "Mark").is_minimally_valid());
        assert!(!threads_profile("  ", "").is_minimally_valid());
    }

    #[test]
    fn only_instagram_reports_privacy() {
        assert!(Profile::from(instagram_profile(true)).is_private());
        assert!(!Profile::from(instagram_profile(false)).is_private());
        assert!(!Profile::from(threads_profile("zuck", "Mark")).is_private());
    }

    #[test]
    fn serializes_with_platform_tag() {
        let value = serde_json::to_value(Profile::from(threads_profile("zuck", "Mark"))).unwrap();
        assert_eq!(value["platform"], "threads");
        assert_eq!(value["username"], "zuck");
        assert!(value["followers_count"].is_null());
    }

    #[test]
    fn tiktok_tag_is_lowercase() {
        let profile = TikTokProfile {
            username: "khaby.lame".to_owned(),
            nickname: "Khabane lame".to_owned(),
            bio: None,
            profile_pic_url: String::new(),
            followers_count: None,
            following_count: None,
            likes_count: None,
            video_count: None,
            is_verified: true,
            videos: vec![],
            stories: vec![TikTokStory {
                id: "1".to_owned(),
                cover_url: None,
                media: StoryMedia::Photo {
                    images: vec!["https://cdn.example/1.jpg".to_owned()],
                },
                duration_secs: 0,
                timestamp: Some(1_700_000_000),
                audio: None,
            }],
            reposts: vec![],
        };
        let value = serde_json::to_value(Profile::from(profile)).unwrap();
        assert_eq!(value["platform"], "tiktok");
        assert_eq!(value["stories"][0]["media"]["kind"], "photo");
    }

    #[test]
    fn latest_activity_picks_newest_item() {
        let mut profile = threads_profile("zuck", "Mark");
        for (id, ts) in [("a", 1_600_000_000), ("b", 1_700_000_000)] {
            profile.threads.push(ThreadsPost {
                id: id.to_owned(),
                content: None,
                image_url: None,
                likes: None,
                replies: None,
                reposts: None,
                timestamp: Some(ts),
            });
        }
        let latest = Profile::from(profile).latest_activity().unwrap();
        assert_eq!(latest.timestamp(), 1_700_000_000);
    }
}
