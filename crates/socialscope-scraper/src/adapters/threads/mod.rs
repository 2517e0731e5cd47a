//! Threads: embedded JSON payloads, then `og:` tags.

mod parse;

use futures::FutureExt;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use socialscope_core::{Platform, ThreadsProfile};

use super::{profile_url, AdapterContext, SharedPage};
use crate::chain::{ChainOutcome, StrategyChain};
use crate::error::ExtractError;
use crate::transport::{FetchOptions, DESKTOP_USER_AGENT, HTML_ACCEPT};

pub(crate) async fn resolve(
    ctx: AdapterContext<'_>,
    identity: &str,
) -> ChainOutcome<ThreadsProfile> {
    let page = SharedPage::new(
        ctx.transport,
        profile_url(&ctx.endpoints.threads_web, "@", identity, ""),
        FetchOptions::new()
            .header(USER_AGENT, DESKTOP_USER_AGENT)
            .header(ACCEPT, HTML_ACCEPT)
            .header(ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .custom_header("sec-fetch-dest", "document")
            .custom_header("sec-fetch-mode", "navigate")
            .custom_header("sec-fetch-site", "none")
            .timeout(ctx.timeouts.page),
    );

    StrategyChain::new(Platform::Threads, identity)
        .strategy(
            "sjs-payload",
            async { parse::from_sjs_scripts(page.text().await?, identity) }.boxed(),
        )
        .strategy(
            "server-js",
            async { parse::from_server_js(page.text().await?, identity) }.boxed(),
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
