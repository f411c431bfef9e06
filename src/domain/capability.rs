//! What a signed-in user may do, decided in one place.

use crate::domain::user::{SubscriptionStatus, UserProfile, UserRole};

/// Actions gated by role or subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Browse the category-filtered video feed.
    BrowseVideos,
    /// Create, edit and delete own categories and videos.
    ManageCatalog,
    /// Grant or revoke linked students.
    ManageStudents,
    /// Start a billing checkout.
    Subscribe,
    /// Open the billing customer portal.
    ManageBilling,
}

fn is_professional(user: &UserProfile) -> bool {
    matches!(user.role, UserRole::Professional | UserRole::Admin)
}

/// Admins always count as subscribed.
pub fn has_active_subscription(user: &UserProfile) -> bool {
    match user.role {
        UserRole::Admin => true,
        UserRole::Professional => {
            user.has_active_subscription || user.subscription_status == SubscriptionStatus::Active
        }
        UserRole::User => false,
    }
}

/// Returns `true` when `user` holds `capability`.
pub fn can(user: &UserProfile, capability: Capability) -> bool {
    match capability {
        Capability::BrowseVideos => true,
        Capability::ManageCatalog | Capability::ManageBilling => is_professional(user),
        Capability::ManageStudents => is_professional(user) && has_active_subscription(user),
        Capability::Subscribe => user.role == UserRole::Professional,
    }
}
