//! Social profile extraction.
//!
//! [`ProfileResolver`] turns a handle on Instagram, Facebook, TikTok or
//! Threads into a canonical [`socialscope_core::Profile`] by running the
//! platform's extraction strategies in order over a shared, retrying
//! [`HttpTransport`].

mod adapters;
pub mod chain;
pub mod endpoints;
pub mod error;
pub mod locate;
pub mod meta;
pub mod normalize;
mod resolver;
mod retry;
pub mod transport;

pub use adapters::LookupTimeouts;
pub use chain::{Attempt, AttemptOutcome, ChainOutcome, StrategyChain, StrategyFuture};
pub use endpoints::Endpoints;
pub use error::{ExtractError, ScraperError};
pub use normalize::{format_count, parse_count, sanitize_identity};
pub use resolver::{ProfileResolver, Resolution};
pub use transport::{FetchOptions, HttpTransport, TransportConfig};
