//! Identity helpers: seed users and mint bearer tokens the test server's
//! middleware will accept.

use cliphost_api::auth::models::issue_token;
use cliphost_api::test_support::{seed_channel_owner, test_user, InMemoryDb};
use cliphost_core::models::{Channel, User};

use super::TEST_JWT_SECRET;

/// Insert a user with no channel and mint a token for them.
pub fn login_test_user(db: &InMemoryDb) -> (User, String) {
    let user = test_user();
    db.insert_user(user.clone());
    let token = issue_token(user.id, TEST_JWT_SECRET, 24).expect("Failed to issue test token");
    (user, token)
}

/// Insert a user who already owns a channel and mint a token for them.
pub fn login_channel_owner(db: &InMemoryDb, channel_name: &str) -> (User, Channel, String) {
    let (user, channel) = seed_channel_owner(db, channel_name);
    let token = issue_token(user.id, TEST_JWT_SECRET, 24).expect("Failed to issue test token");
    (user, channel, token)
}
