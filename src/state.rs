use std::sync::Arc;

use crate::auth::IdentityVerifier;
use crate::config::ListingConfig;
use crate::database::models::{Account, BlogPost, DonationRequest, Funding};
use crate::database::{Collection, DocumentStore, Repository};
use crate::services::{PaymentGateway, StatusTransitionPolicy};

/// Process-scoped handles shared by every request. Built once in `main`
/// (or by a test) and cloned into each handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub verifier: Arc<dyn IdentityVerifier>,
    pub payments: Arc<dyn PaymentGateway>,
    pub transitions: Arc<dyn StatusTransitionPolicy>,
    pub listing: ListingConfig,
}

impl AppState {
    pub fn users(&self) -> Repository<Account> {
        Repository::new(Collection::Users, self.store.clone())
    }

    pub fn donations(&self) -> Repository<DonationRequest> {
        Repository::new(Collection::Donations, self.store.clone())
    }

    pub fn fundings(&self) -> Repository<Funding> {
        Repository::new(Collection::Fundings, self.store.clone())
    }

    pub fn blogs(&self) -> Repository<BlogPost> {
        Repository::new(Collection::Blogs, self.store.clone())
    }
}
