use super::*;

const MOBILE_PAGE: &str = r#"<html><head><title>Jane Cooks | Facebook</title></head><body>
<div id="root">
  <img class="profpic" src="https://scontent.example/jane.jpg">
  <img data-sigil="cover-photo" src="https://scontent.example/cover.jpg">
  <div data-sigil="timeline-cover-intro">  Home cook sharing recipes  </div>
  <div>12K people follow this</div>
  <div>340 friends</div>
  <article>
    <div data-sigil="story-body">Tonight: lasagna</div>
    <div data-sigil="reactions-sentence-container">1.2K reactions</div>
    <a href="/story/comments?id=1">45 comments</a>
    <a href="/share?id=1">3 shares</a>
  </article>
  <article><div>no body or image</div></article>
  <div data-sigil="story-div"><img src="https://scontent.example/p2.jpg"></div>
</div></body></html>"#;

#[test]
fn mobile_html_maps_profile() {
    let profile = from_mobile_html(MOBILE_PAGE, "janecooks").unwrap();
    assert_eq!(profile.username, "janecooks");
    assert_eq!(profile.name, "Jane Cooks");
    assert_eq!(profile.profile_pic_url, "https://scontent.example/jane.jpg");
    assert_eq!(
        profile.cover_photo_url.as_deref(),
        Some("https://scontent.example/cover.jpg")
    );
    assert_eq!(profile.bio.as_deref(), Some("Home cook sharing recipes"));
    assert_eq!(profile.followers_count, Some(12_000));
    assert_eq!(profile.friends_count, Some(340));
    assert!(!profile.is_verified);
}

#[test]
fn mobile_html_without_counts_leaves_them_unset() {
    let html = r#"<html><head><title>Jane Cooks | Facebook</title></head><body>
<div>Say hello. Friends and family welcome</div>
<div>Open daily. Followers get first dibs</div>
</body></html>"#;
    let profile = from_mobile_html(html, "janecooks").unwrap();
    assert_eq!(profile.friends_count, None);
    assert_eq!(profile.followers_count, None);
}

#[test]
fn meta_description_punctuation_is_not_a_count() {
    let html = r#"<html><head>
<meta property="og:title" content="Acme Bakery">
<meta property="og:description" content="Fresh bread from Acme. Like us for daily specials">
</head></html>"#;
    let profile = from_meta_tags(html, "acmebakery").unwrap();
    assert_eq!(profile.followers_count, None);
}

#[test]
fn mobile_html_reads_posts_and_skips_empty_ones() {
    let profile = from_mobile_html(MOBILE_PAGE, "janecooks").unwrap();
    assert_eq!(profile.posts.len(), 2);
    let first = &profile.posts[0];
    assert_eq!(first.id, "post-0");
    assert_eq!(first.content.as_deref(), Some("Tonight: lasagna"));
    assert_eq!(first.likes, Some(1_200));
    assert_eq!(first.comments, Some(45));
    assert_eq!(first.shares, Some(3));
    let second = &profile.posts[1];
    assert_eq!(second.id, "post-1");
    assert_eq!(second.image_url.as_deref(), Some("https://scontent.example/p2.jpg"));
    assert_eq!(second.likes, None);
}

#[test]
fn mobile_posts_are_capped_and_truncated() {
    let long_body = "x".repeat(800);
    let stories: String = (0..10)
        .map(|_| format!(r#"<article><div data-sigil="story-body">{long_body}</div></article>"#))
        .collect();
    let html = format!("<html><head><title>Page</title></head><body>{stories}</body></html>");
    let profile = from_mobile_html(&html, "page").unwrap();
    assert_eq!(profile.posts.len(), MAX_FACEBOOK_POSTS);
    assert_eq!(
        profile.posts[0].content.as_ref().map(|c| c.chars().count()),
        Some(MAX_POST_CHARS)
    );
}

#[test]
fn login_wall_is_rejected() {
    let html = "<html><head><title>Facebook</title></head><body><h1>Log in</h1></body></html>";
    assert!(from_mobile_html(html, "someone").is_none());
}

#[test]
fn name_falls_back_to_heading() {
    let html = "<html><head><title> | Facebook</title></head><body><h1>Heading Name</h1></body></html>";
    let profile = from_mobile_html(html, "someone").unwrap();
    assert_eq!(profile.name, "Heading Name");
}

#[test]
fn ld_json_accepts_string_or_object_image() {
    let html = r#"<html><head>
        <script type="application/ld+json">{"@type":"WebSite","name":"Facebook"}</script>
        <script type="application/ld+json">{"@type":"Organization","name":"Acme","description":"We make things","image":{"url":"https://cdn.example/acme.png"}}</script>
        </head></html>"#;
    let profile = from_ld_json(html, "acme").unwrap();
    assert_eq!(profile.name, "Acme");
    assert_eq!(profile.bio.as_deref(), Some("We make things"));
    assert_eq!(profile.profile_pic_url, "https://cdn.example/acme.png");

    let html = r#"<script type="application/ld+json">[{"@type":["Person"],"name":"Solo","image":"https://cdn.example/solo.png"}]</script>"#;
    let profile = from_ld_json(html, "solo").unwrap();
    assert_eq!(profile.profile_pic_url, "https://cdn.example/solo.png");
}

#[test]
fn ld_json_without_profile_node_is_none() {
    let html = r#"<script type="application/ld+json">{"@type":"WebSite"}</script><script type="application/ld+json">not json</script>"#;
    assert!(from_ld_json(html, "acme").is_none());
}

#[test]
fn meta_tags_read_followers_and_verification() {
    let html = r#"<html><head>
        <meta property="og:title" content="Acme Corp">
        <meta property="og:description" content="Acme Corp. 2.5M likes · 3M followers. Makers of things.">
        <meta property="og:image" content="https://cdn.example/acme.png">
        </head><body><i class="verified-icon"></i></body></html>"#;
    let profile = from_meta_tags(html, "acme").unwrap();
    assert_eq!(profile.name, "Acme Corp");
    assert_eq!(profile.followers_count, Some(2_500_000));
    assert!(profile.is_verified);
}

#[test]
fn meta_tags_reject_generic_title() {
    let html = r#"<meta property="og:title" content="Facebook">"#;
    assert!(from_meta_tags(html, "acme").is_none());
}
