//! Facebook: mobile markup first, then the desktop page, then `og:` tags.

mod parse;

use futures::FutureExt;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, COOKIE, USER_AGENT};
use socialscope_core::{FacebookProfile, Platform};

use super::{profile_url, AdapterContext, SharedPage};
use crate::chain::{ChainOutcome, StrategyChain};
use crate::error::ExtractError;
use crate::transport::{FetchOptions, DESKTOP_USER_AGENT, HTML_ACCEPT, MOBILE_USER_AGENT};

/// Empty consent cookies keep the desktop site from redirecting to login.
const DESKTOP_COOKIES: &str = "datr=; sb=;";

pub(crate) async fn resolve(
    ctx: AdapterContext<'_>,
    identity: &str,
) -> ChainOutcome<FacebookProfile> {
    let mobile = SharedPage::new(
        ctx.transport,
        profile_url(&ctx.endpoints.facebook_mobile, "", identity, ""),
        html_options(ctx, MOBILE_USER_AGENT),
    );
    let desktop = SharedPage::new(
        ctx.transport,
        profile_url(&ctx.endpoints.facebook_web, "", identity, ""),
        html_options(ctx, DESKTOP_USER_AGENT).header(COOKIE, DESKTOP_COOKIES),
    );

    StrategyChain::new(Platform::Facebook, identity)
        .strategy(
            "mobile-html",
            async {
                let html = mobile.text().await?;
                Ok::<_, ExtractError>(parse::from_mobile_html(html, identity))
            }
            .boxed(),
        )
        .strategy(
            "desktop-ld-json",
            async {
                let html = desktop.text().await?;
                Ok::<_, ExtractError>(parse::from_ld_json(html, identity))
            }
            .boxed(),
        )
        .strategy(
            "desktop-meta-tags",
            async {
                let html = desktop.text().await?;
                Ok::<_, ExtractError>(parse::from_meta_tags(html, identity))
            }
            .boxed(),
        )
        .strategy(
            "mobile-meta-tags",
            async {
                let html = mobile.text().await?;
                Ok::<_, ExtractError>(parse::from_meta_tags(html, identity))
            }
            .boxed(),
        )
        .run()
        .await
}

fn html_options(ctx: AdapterContext<'_>, user_agent: &str) -> FetchOptions {
    FetchOptions::new()
        .header(USER_AGENT, user_agent)
        .header(ACCEPT, HTML_ACCEPT)
        .header(ACCEPT_LANGUAGE, "en-US,en;q=0.9")
        .timeout(ctx.timeouts.page)
}
