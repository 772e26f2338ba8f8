pub mod error;
pub mod identity;
pub mod poll;
pub mod results;
pub mod vote;

use quickpoll_db::DbPool;
use std::sync::Arc;

use identity::VoterIdentifier;

/// Worker id embedded in every snowflake this process generates.
pub const ID_WORKER: u16 = 1;

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub config: AppConfig,
    /// Resolves the voter token for vote requests.
    pub voter_identifier: Arc<dyn VoterIdentifier>,
}

impl AppState {
    pub fn new(db: DbPool, config: AppConfig) -> Self {
        Self {
            db,
            config,
            voter_identifier: Arc::new(identity::ProxyHeaderIdentifier::default()),
        }
    }

    pub fn with_voter_identifier(mut self, identifier: Arc<dyn VoterIdentifier>) -> Self {
        self.voter_identifier = identifier;
        self
    }
}

#[derive(Clone, Debug, Default)]
pub struct AppConfig {
    /// Shared secret for the admin listing. Empty disables the listing.
    pub admin_secret: String,
}
