//! Ordered strategy chains.
//!
//! Each adapter registers its extraction strategies in priority order. The
//! chain awaits them one at a time and stops at the first one that yields a
//! minimally valid profile. Errors and panics inside a strategy are logged
//! and recorded, never propagated.

use std::panic::AssertUnwindSafe;

use futures::future::BoxFuture;
use futures::FutureExt;
use socialscope_core::{CanonicalProfile, Platform};

use crate::error::ExtractError;

/// A strategy that has not started yet. Futures are inert until the chain
/// polls them, so later strategies never touch the network once an earlier
/// one wins.
pub type StrategyFuture<'a, P> = BoxFuture<'a, Result<Option<P>, ExtractError>>;

/// What happened when the chain ran a single strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Accepted,
    /// Ran to completion but found no matching structure.
    Empty,
    /// Produced a profile with neither a username nor a name.
    Invalid,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    pub strategy: &'static str,
    pub outcome: AttemptOutcome,
}

/// Result of running a chain, with the per-strategy trail for diagnostics.
#[derive(Debug)]
pub struct ChainOutcome<P> {
    pub profile: Option<P>,
    pub attempts: Vec<Attempt>,
}

impl<P> ChainOutcome<P> {
    #[must_use]
    pub fn into_profile(self) -> Option<P> {
        self.profile
    }
}

pub struct StrategyChain<'a, P> {
    platform: Platform,
    identity: &'a str,
    strategies: Vec<(&'static str, StrategyFuture<'a, P>)>,
}

impl<'a, P> StrategyChain<'a, P>
where
    P: CanonicalProfile + Send + 'a,
{
    #[must_use]
    pub fn new(platform: Platform, identity: &'a str) -> Self {
        Self {
            platform,
            identity,
            strategies: Vec::new(),
        }
    }

    /// Appends a strategy. Strategies run in the order they are added.
    #[must_use]
    pub fn strategy(mut self, name: &'static str, strategy: StrategyFuture<'a, P>) -> Self {
        self.strategies.push((name, strategy));
        self
    }

    pub async fn run(self) -> ChainOutcome<P> {
        let Self {
            platform,
            identity,
            strategies,
        } = self;
        let mut attempts = Vec::with_capacity(strategies.len());

        for (name, strategy) in strategies {
            let result = match AssertUnwindSafe(strategy).catch_unwind().await {
                Ok(result) => result,
                Err(_) => Err(ExtractError::Panicked { strategy: name }),
            };

            let outcome = match result {
                Ok(Some(profile)) if profile.is_minimally_valid() => {
                    tracing::debug!(
                        platform = %platform,
                        identity,
                        strategy = name,
                        "strategy produced a profile"
                    );
                    attempts.push(Attempt {
                        strategy: name,
                        outcome: AttemptOutcome::Accepted,
                    });
                    return ChainOutcome {
                        profile: Some(profile),
                        attempts,
                    };
                }
                Ok(Some(_)) => {
                    tracing::debug!(
                        platform = %platform,
                        identity,
                        strategy = name,
                        "strategy produced a profile without a username or name"
                    );
                    AttemptOutcome::Invalid
                }
                Ok(None) => {
                    tracing::debug!(
                        platform = %platform,
                        identity,
                        strategy = name,
                        "strategy found nothing"
                    );
                    AttemptOutcome::Empty
                }
                Err(e) => {
                    tracing::warn!(
                        platform = %platform,
                        identity,
                        strategy = name,
                        error = %e,
                        "strategy failed, trying next"
                    );
                    AttemptOutcome::Failed(e.to_string())
                }
            };
            attempts.push(Attempt {
                strategy: name,
                outcome,
            });
        }

        tracing::info!(
            platform = %platform,
            identity,
            attempts = attempts.len(),
            "all strategies exhausted"
        );
        ChainOutcome {
            profile: None,
            attempts,
        }
    }
}
