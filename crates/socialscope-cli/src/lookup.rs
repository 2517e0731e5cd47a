//! Concurrent lookups and their rendering.
//!
//! Identities are resolved with bounded concurrency; output keeps the order
//! they were given on the command line. A handle that cannot be resolved is
//! reported and skipped rather than aborting the run.

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use socialscope_core::{AppConfig, Platform, Profile};
use socialscope_scraper::{format_count, ProfileResolver};

#[derive(Debug, Serialize)]
pub(crate) struct LookupResult {
    pub identity: String,
    pub platform: Platform,
    pub profile: Option<Profile>,
}

/// Resolves every identity on `platform`.
///
/// # Errors
///
/// Returns an error only if the HTTP client cannot be built.
pub(crate) async fn run_lookups(
    config: &AppConfig,
    platform: Platform,
    identities: &[String],
) -> anyhow::Result<Vec<LookupResult>> {
    let resolver = ProfileResolver::from_config(config)?;
    tracing::info!(
        platform = %platform,
        count = identities.len(),
        concurrency = config.max_concurrent_lookups,
        "resolving profiles"
    );

    let results = stream::iter(identities.iter().cloned())
        .map(|identity| {
            let resolver = resolver.clone();
            async move {
                let profile = resolver.resolve(platform, &identity).await.into_profile();
                LookupResult {
                    identity,
                    platform,
                    profile,
                }
            }
        })
        .buffered(config.max_concurrent_lookups)
        .collect::<Vec<_>>()
        .await;
    Ok(results)
}

pub(crate) fn render_json(results: &[LookupResult]) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(results)?)
}

/// One line per identity, plus an indented detail line for resolved profiles.
pub(crate) fn render_summary(results: &[LookupResult], now: DateTime<Utc>) -> Vec<String> {
    let mut lines = Vec::with_capacity(results.len() * 2);
    for result in results {
        let Some(profile) = &result.profile else {
            lines.push(format!(
                "\u{2717} {:<10} {:<24} not found",
                result.platform, result.identity
            ));
            continue;
        };

        let mut flags = Vec::new();
        if profile.is_verified() {
            flags.push("verified");
        }
        if profile.is_private() {
            flags.push("private");
        }
        let flags = if flags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", flags.join(", "))
        };
        lines.push(format!(
            "\u{2713} {:<10} {:<24} {}{flags}",
            result.platform,
            profile.username(),
            profile.display_name()
        ));

        let followers = profile
            .followers_count()
            .map_or_else(|| "?".to_owned(), format_count);
        let content = if profile.is_private() {
            "content hidden".to_owned()
        } else {
            format!("{} items", profile.content_len())
        };
        let activity = profile
            .latest_activity()
            .map_or_else(|| "no recent activity".to_owned(), |at| time_ago(at, now));
        lines.push(format!("    {followers} followers, {content}, {activity}"));
    }
    lines
}

/// Coarse relative time such as "3d ago".
fn time_ago(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(at);
    if elapsed.num_days() >= 365 {
        format!("{}y ago", elapsed.num_days() / 365)
    } else if elapsed.num_days() >= 1 {
        format!("{}d ago", elapsed.num_days())
    } else if elapsed.num_hours() >= 1 {
        format!("{}h ago", elapsed.num_hours())
    } else {
        format!("{}m ago", elapsed.num_minutes().max(0))
    }
}
