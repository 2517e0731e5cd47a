//! TikTok payload mapping and page extraction.

use std::sync::LazyLock;

use scraper::{Html, Selector};
use serde::Deserialize;
use serde_json::Value;
use socialscope_core::{
    StoryAudio, StoryMedia, TikTokProfile, TikTokStory, TikTokVideo, MAX_CONTENT_ITEMS,
};

use super::types::{Envelope, MediaList, Stats, Story, User, UserInfo, Video};
use crate::error::ExtractError;
use crate::meta::{name_from_title, parse_stat_triplet, MetaTags, ThirdStat};
use crate::normalize::sanitize_identity;

static REHYDRATION_SCRIPT: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("script#__UNIVERSAL_DATA_FOR_REHYDRATION__").expect("valid selector")
});

/// `data` of a successful envelope, or `None` when `code` is non-zero.
pub(super) fn envelope_data(body: Value, context: &str) -> Result<Option<Value>, ExtractError> {
    let envelope =
        Envelope::deserialize(body).map_err(|e| ExtractError::decode(context.to_owned(), e))?;
    if envelope.code != 0 {
        tracing::debug!(
            context,
            code = envelope.code,
            msg = envelope.msg.as_deref().unwrap_or(""),
            "aggregator reported failure"
        );
        return Ok(None);
    }
    Ok(Some(envelope.data))
}

/// `user` and `stats` from the aggregator's `user/info` data.
pub(super) fn user_info(data: Value) -> Result<Option<(User, Stats)>, ExtractError> {
    let info =
        UserInfo::deserialize(data).map_err(|e| ExtractError::decode("tiktok user info", e))?;
    Ok(info.user.map(|user| (user, info.stats.unwrap_or_default())))
}

pub(super) fn videos(data: Value) -> Result<Vec<TikTokVideo>, ExtractError> {
    let list = MediaList::<Video>::deserialize(data)
        .map_err(|e| ExtractError::decode("tiktok video list", e))?;
    Ok(list
        .videos
        .into_iter()
        .take(MAX_CONTENT_ITEMS)
        .enumerate()
        .map(|(idx, v)| TikTokVideo {
            id: v.video_id.unwrap_or_else(|| format!("video-{idx}")),
            description: v.title,
            cover_url: v.cover.or(v.origin_cover),
            video_url: v.play,
            likes: v.digg_count,
            comments: v.comment_count,
            shares: v.share_count,
            views: v.play_count,
            timestamp: v.create_time,
        })
        .collect())
}

pub(super) fn stories(data: Value) -> Result<Vec<TikTokStory>, ExtractError> {
    let list = MediaList::<Story>::deserialize(data)
        .map_err(|e| ExtractError::decode("tiktok story list", e))?;
    Ok(list
        .videos
        .into_iter()
        .take(MAX_CONTENT_ITEMS)
        .enumerate()
        .map(|(idx, s)| map_story(idx, s))
        .collect())
}

/// A story is a photo when it carries images or has no duration.
fn map_story(idx: usize, story: Story) -> TikTokStory {
    let duration_secs = story.duration.unwrap_or(0);
    let is_photo = !story.images.is_empty() || duration_secs == 0;
    let media = if is_photo {
        StoryMedia::Photo {
            images: story.images,
        }
    } else {
        StoryMedia::Video {
            video_url: story.play,
        }
    };
    let (music_url, music_title) = match story.music_info {
        Some(info) => (story.music.or(info.play), info.title),
        None => (story.music, None),
    };
    let audio = (music_url.is_some() || music_title.is_some()).then_some(StoryAudio {
        url: music_url,
        title: music_title,
    });
    TikTokStory {
        id: story.video_id.unwrap_or_else(|| format!("story-{idx}")),
        cover_url: story.cover.or(story.origin_cover),
        media,
        duration_secs,
        timestamp: story.create_time,
        audio,
    }
}

/// Canonical profile with no content attached yet.
pub(super) fn map_user(user: User, stats: Stats, identity: &str) -> TikTokProfile {
    let username = user
        .unique_id
        .as_deref()
        .map(sanitize_identity)
        .filter(|u| !u.is_empty())
        .unwrap_or_else(|| identity.to_owned());
    TikTokProfile {
        nickname: user.nickname.unwrap_or_else(|| username.clone()),
        username,
        bio: user.signature,
        profile_pic_url: user
            .avatar_larger
            .or(user.avatar_medium)
            .or(user.avatar_thumb)
            .unwrap_or_default(),
        followers_count: stats.follower_count,
        following_count: stats.following_count,
        likes_count: stats.heart_count.or(stats.heart),
        video_count: stats.video_count,
        is_verified: user.verified.unwrap_or(false),
        videos: Vec::new(),
        stories: Vec::new(),
        reposts: Vec::new(),
    }
}

/// Web strategy: the rehydration script's `webapp.user-detail` scope.
pub(super) fn from_rehydration_data(
    html: &str,
    identity: &str,
) -> Result<Option<TikTokProfile>, ExtractError> {
    let raw = {
        let document = Html::parse_document(html);
        document
            .select(&REHYDRATION_SCRIPT)
            .next()
            .map(|script| script.text().collect::<String>())
    };
    let Some(raw) = raw else {
        return Ok(None);
    };
    let data: Value = serde_json::from_str(&raw)
        .map_err(|e| ExtractError::decode("tiktok rehydration data", e))?;
    let Some(info) = data.pointer("/__DEFAULT_SCOPE__/webapp.user-detail/userInfo") else {
        return Ok(None);
    };
    Ok(user_info(info.clone())?.map(|(user, stats)| map_user(user, stats, identity)))
}

/// Last resort: `og:` tags with "Followers, Following, Likes".
pub(super) fn from_meta_tags(html: &str, identity: &str) -> Option<TikTokProfile> {
    let tags = MetaTags::from_html(html);
    let stats = parse_stat_triplet(tags.description_or_empty(), ThirdStat::Likes);
    if stats.is_none() && tags.image.is_none() {
        return None;
    }
    Some(TikTokProfile {
        username: identity.to_owned(),
        nickname: name_from_title(tags.title_or_empty()).unwrap_or_else(|| identity.to_owned()),
        bio: None,
        profile_pic_url: tags.image.unwrap_or_default(),
        followers_count: stats.map(|s| s.followers),
        following_count: stats.map(|s| s.following),
        likes_count: stats.map(|s| s.third),
        video_count: None,
        is_verified: html.contains(r#""verified":true"#),
        videos: Vec::new(),
        stories: Vec::new(),
        reposts: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn failed_envelope_yields_none() {
        let body = json!({"code": -1, "msg": "User doesn't exist", "data": []});
        assert!(envelope_data(body, "user info").unwrap().is_none());
    }

    #[test]
    fn user_info_prefers_heart_count_then_heart() {
        let data = json!({
            "user": {"uniqueId": "Khaby.Lame", "nickname": "Khabane lame", "avatarMedium": "m.jpg",
                     "signature": "If u wanna laugh u r in the right place", "verified": true, "secUid": "MS4w"},
            "stats": {"followerCount": 162000000, "followingCount": 80, "heart": 2500000000_u64, "videoCount": 1200}
        });
        let (user, stats) = user_info(data).unwrap().unwrap();
        let profile = map_user(user, stats, "khaby.lame");
        assert_eq!(profile.username, "khaby.lame");
        assert_eq!(profile.nickname, "Khabane lame");
        assert_eq!(profile.profile_pic_url, "m.jpg");
        assert_eq!(profile.likes_count, Some(2_500_000_000));
        assert_eq!(profile.followers_count, Some(162_000_000));
        assert!(profile.is_verified);
    }

    #[test]
    fn user_info_without_user_is_none() {
        assert!(user_info(json!({"stats": {}})).unwrap().is_none());
    }

    #[test]
    fn stories_classify_photo_and_video() {
        let data = json!({"videos": [
            {"video_id": "1", "duration": 0, "play": "p1.mp4", "music_info": {"title": "Song", "play": "s.mp3"}},
            {"video_id": "2", "duration": 9, "images": ["a.jpg", "b.jpg"]},
            {"video_id": "3", "duration": 15, "play": "p3.mp4", "create_time": 1700000000}
        ]});
        let stories = stories(data).unwrap();
        assert_eq!(stories.len(), 3);
        assert!(stories[0].media.is_photo());
        let audio = stories[0].audio.as_ref().unwrap();
        assert_eq!(audio.url.as_deref(), Some("s.mp3"));
        assert_eq!(audio.title.as_deref(), Some("Song"));
        assert_eq!(
            stories[1].media,
            StoryMedia::Photo {
                images: vec!["a.jpg".to_owned(), "b.jpg".to_owned()]
            }
        );
        assert_eq!(
            stories[2].media,
            StoryMedia::Video {
                video_url: Some("p3.mp4".to_owned())
            }
        );
        assert!(stories[2].audio.is_none());
    }

    #[test]
    fn videos_are_capped_and_mapped() {
        let items: Vec<Value> = (0..15)
            .map(|i| json!({"video_id": i.to_string(), "origin_cover": "c.jpg", "digg_count": 10, "play_count": 100}))
            .collect();
        let videos = videos(json!({ "videos": items })).unwrap();
        assert_eq!(videos.len(), MAX_CONTENT_ITEMS);
        assert_eq!(videos[0].cover_url.as_deref(), Some("c.jpg"));
        assert_eq!(videos[0].views, Some(100));
    }

    #[test]
    fn rehydration_script_is_read() {
        let html = r#"<html><body><script id="__UNIVERSAL_DATA_FOR_REHYDRATION__" type="application/json">{"__DEFAULT_SCOPE__":{"webapp.user-detail":{"userInfo":{"user":{"uniqueId":"webuser","nickname":"Web User","avatarLarger":"l.jpg"},"stats":{"followerCount":5,"heartCount":7}}}}}</script></body></html>"#;
        let profile = from_rehydration_data(html, "webuser").unwrap().unwrap();
        assert_eq!(profile.nickname, "Web User");
        assert_eq!(profile.profile_pic_url, "l.jpg");
        assert_eq!(profile.likes_count, Some(7));
        assert!(profile.videos.is_empty());
    }

    #[test]
    fn rehydration_without_user_detail_is_none() {
        let html = r#"<script id="__UNIVERSAL_DATA_FOR_REHYDRATION__">{"__DEFAULT_SCOPE__":{}}</script>"#;
        assert!(from_rehydration_data(html, "x").unwrap().is_none());
    }

    #[test]
    fn meta_tags_parse_likes_triplet() {
        let html = r#"<head>
            <meta property="og:title" content="Web User (@webuser) | TikTok">
            <meta property="og:description" content="Web User on TikTok | 1.1M Followers, 20 Following, 30.5M Likes">
            </head><body>{"verified":true}</body>"#;
        let profile = from_meta_tags(html, "webuser").unwrap();
        assert_eq!(profile.nickname, "Web User");
        assert_eq!(profile.followers_count, Some(1_100_000));
        assert_eq!(profile.likes_count, Some(30_500_000));
        assert!(profile.is_verified);
    }
}
