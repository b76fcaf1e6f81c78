use crate::config::GatewayConfig;
use crate::dispatcher::ChannelDispatcher;
use crate::rate_limit::RateLimiter;
use std::sync::Arc;
use swipe_session::{CandidateSource, RoomRegistry};

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<RoomRegistry>,
    pub dispatcher: Arc<ChannelDispatcher>,
    pub rate_limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(config: &GatewayConfig, source: Arc<dyn CandidateSource>) -> Self {
        let dispatcher = Arc::new(ChannelDispatcher::new());
        let registry = RoomRegistry::new(source, dispatcher.clone(), config.session.clone());

        Self {
            registry: Arc::new(registry),
            dispatcher,
            rate_limiter: Arc::new(RateLimiter::new(config.frame_burst, config.frame_rate)),
        }
    }
}
