use axum::extract::FromRef;

use crate::resolver::Resolver;
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;

pub type GuardedResolver = Arc<Resolver>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub resolver: GuardedResolver,
}

impl ServerState {
    pub fn new(config: ServerConfig, resolver: GuardedResolver) -> ServerState {
        ServerState {
            config,
            start_time: Instant::now(),
            resolver,
        }
    }
}

impl FromRef<ServerState> for GuardedResolver {
    fn from_ref(input: &ServerState) -> Self {
        input.resolver.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
