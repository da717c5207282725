use std::sync::Arc;

use crate::{
    db::{FleetStore, UserStore},
    services::{gateway::Downstream, token::TokenKeys, verifier::TokenVerifier},
};

/// Identity Provider state: the user store plus the signing keys.
#[derive(Clone)]
pub struct IdentityState {
    pub store: Arc<dyn UserStore>,
    pub keys: Arc<TokenKeys>,
    pub bcrypt_cost: u32,
}

/// Resource Service state. Identity is only learned through `verifier`.
#[derive(Clone)]
pub struct ResourceState {
    pub store: Arc<dyn FleetStore>,
    pub verifier: Arc<dyn TokenVerifier>,
}

#[derive(Clone)]
pub struct GatewayState {
    pub downstream: Downstream,
    pub verifier: Arc<dyn TokenVerifier>,
}
