use std::sync::Arc;

use async_trait::async_trait;

use crate::cache::MatchCache;
use crate::fetcher::HttpFetcher;

pub use common::{FunctionRequest, FunctionResponse};
pub use matches::{FootballConfig, MatchDataHandler};
pub use subscribe::{is_valid_email, SubscriptionConfig, SubscriptionHandler};

mod common;
mod matches;
mod subscribe;

/// A request handler deployed under its own name.
#[async_trait]
pub trait Function: Send + Sync {
    fn name(&self) -> &'static str;

    /// Always resolves to a response; failures are mapped to a status code and
    /// a JSON body inside the function.
    async fn invoke(&self, request: FunctionRequest) -> FunctionResponse;
}

pub fn all_functions(
    fetcher: Arc<dyn HttpFetcher>,
    football: FootballConfig,
    cache: Arc<MatchCache>,
    subscription: SubscriptionConfig,
) -> Vec<Box<dyn Function>> {
    vec![
        Box::new(MatchDataHandler::new(fetcher.clone(), football, cache)) as Box<dyn Function>,
        Box::new(SubscriptionHandler::new(fetcher, subscription)) as Box<dyn Function>,
    ]
}
