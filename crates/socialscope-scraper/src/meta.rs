//! Open Graph tag reading and the count patterns found in their text.
//!
//! When a platform hides its structured state, the `og:` tags still carry
//! a display name, an avatar, and a description such as
//! `"1.2M Followers, 340 Following, 58 Posts - Travel blogger"`.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};

use crate::normalize::parse_count;

static OG_TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[property="og:title"]"#).expect("valid selector"));
static OG_DESCRIPTION: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"meta[property="og:description"]"#).expect("valid selector")
});
static OG_IMAGE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[property="og:image"]"#).expect("valid selector"));

static POSTS_TRIPLET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)([0-9][0-9,.]*[KMB]?)\s*Followers?,?\s*([0-9][0-9,.]*[KMB]?)\s*Following,?\s*([0-9][0-9,.]*[KMB]?)\s*Posts?",
    )
    .expect("valid regex")
});
static LIKES_TRIPLET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)([0-9][0-9,.]*[KMB]?)\s*Followers?,?\s*([0-9][0-9,.]*[KMB]?)\s*Following,?\s*([0-9][0-9,.]*[KMB]?)\s*Likes?",
    )
    .expect("valid regex")
});
static NAME_BEFORE_HANDLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?)\s*\(@").expect("valid regex"));
static BIO_AFTER_POSTS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Posts?\s*[-–—]\s*(.+)").expect("valid regex"));

/// The `og:` tags a profile page exposes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetaTags {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}

impl MetaTags {
    /// Reads the `og:title`, `og:description` and `og:image` tags.
    ///
    /// Empty `content` attributes are treated as missing.
    #[must_use]
    pub fn from_html(html: &str) -> Self {
        Self::from_document(&Html::parse_document(html))
    }

    fn from_document(document: &Html) -> Self {
        Self {
            title: meta_content(document, &OG_TITLE),
            description: meta_content(document, &OG_DESCRIPTION),
            image: meta_content(document, &OG_IMAGE),
        }
    }

    #[must_use]
    pub fn description_or_empty(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    #[must_use]
    pub fn title_or_empty(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }
}

fn meta_content(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
}

/// Which counter follows "Followers, Following" in a description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThirdStat {
    Posts,
    Likes,
}

/// Three counters read from a meta description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatTriplet {
    pub followers: u64,
    pub following: u64,
    /// Posts or likes, depending on the [`ThirdStat`] requested.
    pub third: u64,
}

/// Parses `"<n> Followers, <n> Following, <n> Posts|Likes"`.
#[must_use]
pub fn parse_stat_triplet(description: &str, third: ThirdStat) -> Option<StatTriplet> {
    let re = match third {
        ThirdStat::Posts => &*POSTS_TRIPLET_RE,
        ThirdStat::Likes => &*LIKES_TRIPLET_RE,
    };
    let caps = re.captures(description)?;
    Some(StatTriplet {
        followers: parse_count(&caps[1]),
        following: parse_count(&caps[2]),
        third: parse_count(&caps[3]),
    })
}

/// Display name from a title shaped like `"Name (@handle) ..."`.
#[must_use]
pub fn name_from_title(title: &str) -> Option<String> {
    NAME_BEFORE_HANDLE_RE
        .captures(title)
        .map(|caps| caps[1].trim().to_owned())
        .filter(|s| !s.is_empty())
}

/// Free text that follows the "N Posts - " prefix of a description.
#[must_use]
pub fn bio_after_posts(description: &str) -> Option<String> {
    BIO_AFTER_POSTS_RE
        .captures(description)
        .map(|caps| caps[1].trim().to_owned())
        .filter(|s| !s.is_empty())
}

/// First capture of `re` in `text`, parsed as a count.
#[must_use]
pub fn first_count(re: &Regex, text: &str) -> Option<u64> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|s| s.starts_with(|c: char| c.is_ascii_digit()))
        .map(parse_count)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRAVEL: &str = "1.2M Followers, 340 Following, 58 Posts - Travel blogger";

    #[test]
    fn reads_og_tags_in_any_attribute_order() {
        let html = r#"<html><head>
            <meta property="og:title" content="Jane Doe (@jane) • Instagram photos and videos">
            <meta content="https://cdn.example/jane.jpg" property="og:image">
            <meta property="og:description" content="">
        </head><body></body></html>"#;
        let tags = MetaTags::from_html(html);
        assert_eq!(
            tags.title.as_deref(),
            Some("Jane Doe (@jane) • Instagram photos and videos")
        );
        assert_eq!(tags.image.as_deref(), Some("https://cdn.example/jane.jpg"));
        assert_eq!(tags.description, None);
    }

    #[test]
    fn parses_posts_triplet_and_bio() {
        let stats = parse_stat_triplet(TRAVEL, ThirdStat::Posts).unwrap();
        assert_eq!(stats.followers, 1_200_000);
        assert_eq!(stats.following, 340);
        assert_eq!(stats.third, 58);
        assert_eq!(bio_after_posts(TRAVEL).as_deref(), Some("Travel blogger"));
    }

    #[test]
    fn parses_likes_triplet_case_insensitively() {
        let stats =
            parse_stat_triplet("5.1m followers, 12 following, 300.2K likes", ThirdStat::Likes)
                .unwrap();
        assert_eq!(stats.followers, 5_100_000);
        assert_eq!(stats.following, 12);
        assert_eq!(stats.third, 300_200);
    }

    #[test]
    fn triplet_with_wrong_third_label_is_none() {
        assert!(parse_stat_triplet(TRAVEL, ThirdStat::Likes).is_none());
    }

    #[test]
    fn name_from_title_stops_before_handle() {
        assert_eq!(
            name_from_title("National Geographic (@natgeo) on Threads").as_deref(),
            Some("National Geographic")
        );
        assert_eq!(name_from_title("no handle here"), None);
    }

    #[test]
    fn first_count_parses_suffix() {
        let re = Regex::new(r"(?i)([0-9][0-9,.]*[KMB]?)\s*followers?").unwrap();
        assert_eq!(first_count(&re, "Mark. 3.2M followers"), Some(3_200_000));
        assert_eq!(first_count(&re, "nothing"), None);
    }

    #[test]
    fn first_count_ignores_punctuation_only_captures() {
        let loose = Regex::new(r"(?i)([0-9,.]+)\s*friends?").unwrap();
        assert_eq!(first_count(&loose, "Say hello. Friends welcome"), None);
    }

    #[test]
    fn stat_triplet_needs_digits() {
        assert_eq!(
            parse_stat_triplet(". Followers, . Following, . Posts", ThirdStat::Posts),
            None
        );
    }
}
