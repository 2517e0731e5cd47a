//! TikTok: the public aggregator API first, then the web page.
//!
//! The aggregator answers user info, videos and stories from separate
//! endpoints. Only user info is required; the two content lookups run
//! concurrently and degrade to empty lists on failure.

mod parse;
mod types;

use futures::FutureExt;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use socialscope_core::{Platform, TikTokProfile, TikTokStory, TikTokVideo, MAX_CONTENT_ITEMS};

use super::{profile_url, AdapterContext, SharedPage};
use crate::chain::{ChainOutcome, StrategyChain};
use crate::error::ExtractError;
use crate::transport::{FetchOptions, DESKTOP_USER_AGENT, HTML_ACCEPT};

pub(crate) async fn resolve(ctx: AdapterContext<'_>, identity: &str) -> ChainOutcome<TikTokProfile> {
    let page = SharedPage::new(
        ctx.transport,
        profile_url(&ctx.endpoints.tiktok_web, "@", identity, ""),
        FetchOptions::new()
            .header(USER_AGENT, DESKTOP_USER_AGENT)
            .header(ACCEPT, HTML_ACCEPT)
            .header(ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .timeout(ctx.timeouts.web),
    );

    StrategyChain::new(Platform::TikTok, identity)
        .strategy("aggregator-api", from_aggregator(ctx, identity).boxed())
        .strategy(
            "web-rehydration",
            async { parse::from_rehydration_data(page.text().await?, identity) }.boxed(),
        )
        .strategy(
            "meta-tags",
            async {
                let html = page.text().await?;
                Ok::<_, ExtractError>(parse::from_meta_tags(html, identity))
            }
            .boxed(),
        )
        .run()
        .await
}

fn api_options(ctx: AdapterContext<'_>) -> FetchOptions {
    FetchOptions::new()
        .header(USER_AGENT, DESKTOP_USER_AGENT)
        .header(ACCEPT, "application/json")
        .timeout(ctx.timeouts.api)
}

fn api_url(ctx: AdapterContext<'_>, path: &str) -> String {
    format!("{}/api/{path}", ctx.endpoints.tikwm_api.trim_end_matches('/'))
}

async fn from_aggregator(
    ctx: AdapterContext<'_>,
    identity: &str,
) -> Result<Option<TikTokProfile>, ExtractError> {
    let options = api_options(ctx).query("unique_id", identity);
    let body = ctx
        .transport
        .fetch_json(&api_url(ctx, "user/info"), &options)
        .await?;
    let Some(data) = parse::envelope_data(body, "tiktok user info")? else {
        return Ok(None);
    };
    let Some((user, stats)) = parse::user_info(data)? else {
        return Ok(None);
    };

    let sec_uid = user.sec_uid.clone();
    let mut profile = parse::map_user(user, stats, identity);
    let (videos, stories) = tokio::join!(
        fetch_videos(ctx, identity, sec_uid.as_deref()),
        fetch_stories(ctx, identity)
    );
    profile.videos = videos;
    profile.stories = stories;
    Ok(Some(profile))
}

async fn fetch_videos(
    ctx: AdapterContext<'_>,
    identity: &str,
    sec_uid: Option<&str>,
) -> Vec<TikTokVideo> {
    let Some(sec_uid) = sec_uid else {
        tracing::debug!(identity, "no sec_uid, skipping video lookup");
        return Vec::new();
    };
    let options = api_options(ctx)
        .query("sec_uid", sec_uid)
        .query("count", MAX_CONTENT_ITEMS);
    let result = async {
        let body = ctx
            .transport
            .fetch_json(&api_url(ctx, "user/posts"), &options)
            .await?;
        match parse::envelope_data(body, "tiktok video list")? {
            Some(data) => parse::videos(data),
            None => Ok(Vec::new()),
        }
    }
    .await;
    result.unwrap_or_else(|e: ExtractError| {
        tracing::warn!(identity, error = %e, "video lookup failed, continuing without videos");
        Vec::new()
    })
}

async fn fetch_stories(ctx: AdapterContext<'_>, identity: &str) -> Vec<TikTokStory> {
    let options = api_options(ctx).query("unique_id", identity);
    let result = async {
        let body = ctx
            .transport
            .fetch_json(&api_url(ctx, "user/story"), &options)
            .await?;
        match parse::envelope_data(body, "tiktok story list")? {
            Some(data) => parse::stories(data),
            None => Ok(Vec::new()),
        }
    }
    .await;
    result.unwrap_or_else(|e: ExtractError| {
        tracing::warn!(identity, error = %e, "story lookup failed, continuing without stories");
        Vec::new()
    })
}
