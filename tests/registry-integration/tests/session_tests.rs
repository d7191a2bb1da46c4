//! Role-session behavior against the demo directory.

use ayur_common::identity::UserRole;
use ayur_registry::session::{
    DemoDirectory, IdentityProvider, InMemorySessionStore, SessionManager, DEMO_SECRET,
};

use ayur_registry_integration::harness::TestHarness;

#[test]
fn scenario_farmer_login_and_bad_secret() {
    let mut h = TestHarness::new();

    let session = h.sessions.login("farmer@ayur.com", DEMO_SECRET).unwrap();
    assert_eq!(session.role(), UserRole::Farmer);

    h.sessions.logout();
    assert!(h.sessions.login("farmer@ayur.com", "wrong").is_err());
    assert!(h.sessions.current().is_none());
}

#[test]
fn one_session_at_a_time() {
    let mut h = TestHarness::new();
    h.login("farmer@ayur.com");
    let session = h.login("distributor@ayur.com");
    assert_eq!(session.role(), UserRole::Distributor);
    assert_eq!(h.sessions.current().unwrap().user.email, "distributor@ayur.com");
}

#[test]
fn provider_is_swappable_without_touching_session_logic() {
    struct SingleUser;
    impl IdentityProvider for SingleUser {
        fn authenticate(
            &self,
            email: &str,
            secret: &str,
        ) -> Option<ayur_common::identity::UserProfile> {
            (email == "only@example.com" && secret == "s3cret").then(|| {
                ayur_common::identity::UserProfile {
                    id: ayur_common::identity::UserId("42".into()),
                    name: "Only User".into(),
                    email: email.into(),
                    role: UserRole::Consumer,
                    phone: None,
                    verified: false,
                    badges: vec![],
                }
            })
        }
    }

    let mut mgr = SessionManager::new(SingleUser, InMemorySessionStore::new());
    assert!(mgr.login("only@example.com", DEMO_SECRET).is_err());
    let session = mgr.login("only@example.com", "s3cret").unwrap();
    assert_eq!(session.user.name, "Only User");
}

#[test]
fn demo_directory_exposes_every_role() {
    let dir = DemoDirectory::demo();
    let roles: Vec<UserRole> = dir.users().iter().map(|u| u.role).collect();
    assert!(roles.contains(&UserRole::Farmer));
    assert!(roles.contains(&UserRole::Distributor));
    assert!(roles.contains(&UserRole::Consumer));
}
