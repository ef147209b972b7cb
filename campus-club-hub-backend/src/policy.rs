//! Who may delete an entity they may or may not own. Deployments disagree
//! on this (owner-only vs. admins-may-moderate), so the predicate is
//! injected into the registry instead of being hard-coded.

use std::sync::Arc;

use campus_club_hub_config::PolicyVariant;

use crate::entities::{Identity, Role};

pub trait ModifyPolicy: Send + Sync {
    fn can_modify(&self, requester: &Identity, owner: &str) -> bool;
}

pub struct OwnerOnly;

impl ModifyPolicy for OwnerOnly {
    fn can_modify(&self, requester: &Identity, owner: &str) -> bool {
        requester.username == owner
    }
}

pub struct OwnerOrAdmin;

impl ModifyPolicy for OwnerOrAdmin {
    fn can_modify(&self, requester: &Identity, owner: &str) -> bool {
        requester.username == owner || requester.role == Role::Admin
    }
}

pub fn policy_for(variant: PolicyVariant) -> Arc<dyn ModifyPolicy> {
    match variant {
        PolicyVariant::OwnerOnly => Arc::new(OwnerOnly),
        PolicyVariant::OwnerOrAdmin => Arc::new(OwnerOrAdmin),
    }
}
