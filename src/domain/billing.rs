use serde::{Deserialize, Serialize};

use crate::domain::types::RedirectUrl;

/// Hosted checkout page for starting a subscription.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckoutSession {
    pub checkout_url: RedirectUrl,
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Hosted customer portal for managing an existing subscription.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PortalSession {
    pub portal_url: RedirectUrl,
}
