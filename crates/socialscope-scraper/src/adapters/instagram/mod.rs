//! Instagram: embedded page state, then `og:` tags, then the mobile API.

mod parse;
mod types;

use futures::FutureExt;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use serde_json::Value;
use socialscope_core::{InstagramProfile, Platform};

use super::{profile_url, AdapterContext, SharedPage};
use crate::chain::{ChainOutcome, StrategyChain};
use crate::error::ExtractError;
use crate::transport::{FetchOptions, HTML_ACCEPT, MOBILE_USER_AGENT};

const MOBILE_API_USER_AGENT: &str = "Instagram 219.0.0.12.117 Android";
const WEB_APP_ID: &str = "936619743392459";

/// Runs the Instagram strategies for an already sanitized handle.
pub(crate) async fn resolve(
    ctx: AdapterContext<'_>,
    identity: &str,
) -> ChainOutcome<InstagramProfile> {
    let page = SharedPage::new(
        ctx.transport,
        profile_url(&ctx.endpoints.instagram_web, "", identity, "/"),
        page_options(ctx),
    );

    StrategyChain::new(Platform::Instagram, identity)
        .strategy(
            "shared-data",
            async { parse::from_shared_data(page.text().await?, identity) }.boxed(),
        )
        .strategy(
            "additional-data",
            async { parse::from_additional_data(page.text().await?, identity) }.boxed(),
        )
        .strategy(
            "query-preloader",
            async { parse::from_query_preloader(page.text().await?, identity) }.boxed(),
        )
        .strategy(
            "meta-tags",
            async {
                let html = page.text().await?;
                Ok::<_, ExtractError>(parse::from_meta_tags(html, identity))
            }
            .boxed(),
        )
        .strategy("mobile-api", mobile_api(ctx, identity).boxed())
        .run()
        .await
}

fn page_options(ctx: AdapterContext<'_>) -> FetchOptions {
    FetchOptions::new()
        .header(USER_AGENT, MOBILE_USER_AGENT)
        .header(ACCEPT, HTML_ACCEPT)
        .header(ACCEPT_LANGUAGE, "en-US,en;q=0.9")
        .custom_header("sec-ch-ua", r#""Not_A Brand";v="8", "Chromium";v="120""#)
        .custom_header("sec-ch-ua-mobile", "?1")
        .custom_header("sec-ch-ua-platform", r#""iOS""#)
        .custom_header("sec-fetch-dest", "document")
        .custom_header("sec-fetch-mode", "navigate")
        .custom_header("sec-fetch-site", "none")
        .custom_header("sec-fetch-user", "?1")
        .timeout(ctx.timeouts.page)
}

/// The `web_profile_info` endpoint, reachable even when the page is walled.
async fn mobile_api(
    ctx: AdapterContext<'_>,
    identity: &str,
) -> Result<Option<InstagramProfile>, ExtractError> {
    let url = format!(
        "{}/api/v1/users/web_profile_info/",
        ctx.endpoints.instagram_api.trim_end_matches('/')
    );
    let options = FetchOptions::new()
        .header(USER_AGENT, MOBILE_API_USER_AGENT)
        .header(ACCEPT, "application/json")
        .custom_header("x-ig-app-id", WEB_APP_ID)
        .query("username", identity)
        .timeout(ctx.timeouts.api);

    let body: Value = ctx.transport.fetch_json(&url, &options).await?;
    match body.pointer("/data/user").filter(|u| u.is_object()) {
        Some(user) => parse::user_from_value(user, identity).map(Some),
        None => Ok(None),
    }
}
