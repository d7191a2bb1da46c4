//! In-process test world: a registry plus the demo session machinery,
//! with one entry point per role.

use ayur_common::batch::{Batch, BatchId, BatchStatus};
use ayur_common::herb::HerbCategory;
use ayur_common::identity::{UserProfile, UserRole};
use ayur_registry::anchor::MockAnchor;
use ayur_registry::demo::demo_registry;
use ayur_registry::session::{
    demo_users, DemoDirectory, InMemorySessionStore, Session, SessionManager, DEMO_SECRET,
};
use ayur_registry::{BatchRegistry, RecipientRole, RegistryError};

use crate::sample_harvest;

pub struct TestHarness {
    pub registry: BatchRegistry,
    pub sessions: SessionManager<DemoDirectory, InMemorySessionStore>,
}

impl TestHarness {
    /// Empty registry, stock demo directory.
    pub fn new() -> Self {
        Self {
            registry: BatchRegistry::new(Box::new(MockAnchor)),
            sessions: SessionManager::new(DemoDirectory::demo(), InMemorySessionStore::new()),
        }
    }

    /// Registry pre-seeded with the demo world.
    pub fn with_demo_world() -> Self {
        Self {
            registry: demo_registry(),
            sessions: SessionManager::new(DemoDirectory::demo(), InMemorySessionStore::new()),
        }
    }

    pub fn farmer(&self) -> UserProfile {
        self.demo_profile(UserRole::Farmer)
    }

    pub fn distributor(&self) -> UserProfile {
        self.demo_profile(UserRole::Distributor)
    }

    pub fn consumer(&self) -> UserProfile {
        self.demo_profile(UserRole::Consumer)
    }

    fn demo_profile(&self, role: UserRole) -> UserProfile {
        demo_users()
            .into_iter()
            .find(|u| u.role == role)
            .expect("demo directory covers every role")
    }

    /// Log in with the shared demo secret.
    pub fn login(&mut self, email: &str) -> Session {
        self.sessions
            .login(email, DEMO_SECRET)
            .expect("demo login should succeed")
    }

    /// Register a valid harvest as the demo farmer and return its id.
    pub fn register(&mut self, herb: HerbCategory) -> BatchId {
        let farmer = self.farmer();
        self.registry
            .register(&farmer, sample_harvest(herb))
            .expect("sample registration should succeed")
            .id
            .clone()
    }

    /// Register and verify a batch, returning its id.
    pub fn register_verified(&mut self, herb: HerbCategory) -> BatchId {
        let id = self.register(herb);
        let distributor = self.distributor();
        self.registry
            .transition(&distributor, &id, BatchStatus::Verified, None)
            .expect("verification of a pending batch should succeed");
        id
    }

    /// Hand a batch over to the demo retail outlet.
    pub fn transfer_to_retail(&mut self, id: &BatchId) -> Result<Batch, RegistryError> {
        let distributor = self.distributor();
        self.registry
            .transfer(&distributor, id, "Ayurvedic Health Store", RecipientRole::Retailer)
            .map(Batch::clone)
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
