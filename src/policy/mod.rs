// policy/mod.rs - Access decisions for complex-scoped resources
//
// Admins may act anywhere. Everyone else acts through a per-complex
// membership: any membership grants read access to the complex, a moderator
// membership grants write access.

pub mod actor;

pub use actor::Actor;

use async_trait::async_trait;
use std::fmt::Display;
use tracing::{debug, warn};

use crate::database::manager::DatabaseError;
use crate::services::error::ServiceError;
use crate::types::{BuildingId, ComplexId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    NotRelated,
    NotModerator,
    NotAdmin,
}

impl DenialReason {
    pub fn message(&self) -> &'static str {
        match self {
            DenialReason::NotRelated => "The user is not related to the specified complex.",
            DenialReason::NotModerator => "You don't have access to this action!",
            DenialReason::NotAdmin => "Admin privileges are required for this action.",
        }
    }
}

/// Outcome of one authorization check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Granted,
    Denied(DenialReason),
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Granted)
    }

    /// Denials become `ServiceError::Forbidden`
    pub fn into_result(self) -> Result<(), ServiceError> {
        match self {
            AccessDecision::Granted => Ok(()),
            AccessDecision::Denied(reason) => Err(ServiceError::forbidden(reason.message())),
        }
    }
}

/// Resolves the complex that owns a resource.
#[async_trait]
pub trait OwnerLookup<Id>: Send + Sync
where
    Id: Copy + Display + Send + Sync + 'static,
{
    /// Human readable resource name used in not-found messages
    fn resource_kind(&self) -> &'static str;

    async fn owning_complex(&self, id: Id) -> Result<Option<ComplexId>, DatabaseError>;
}

pub struct AccessPolicy;

impl AccessPolicy {
    /// Write access to anything scoped to `complex_id`
    pub fn evaluate_complex_access(
        actor: &Actor,
        complex_id: ComplexId,
        building_id: Option<BuildingId>,
    ) -> AccessDecision {
        if actor.is_admin() {
            return AccessDecision::Granted;
        }

        let decision = match actor.membership(complex_id) {
            None => AccessDecision::Denied(DenialReason::NotRelated),
            Some(membership) if !membership.moderator => {
                AccessDecision::Denied(DenialReason::NotModerator)
            }
            Some(_) => AccessDecision::Granted,
        };

        if let AccessDecision::Denied(reason) = decision {
            warn!(
                "Access denied for user {} on complex {} (building {:?}): {:?}",
                actor.user_id(),
                complex_id,
                building_id,
                reason
            );
        }
        decision
    }

    /// Read access: admins and members of the complex, moderator or not
    pub fn evaluate_membership(actor: &Actor, complex_id: ComplexId) -> AccessDecision {
        if actor.is_admin() || actor.membership(complex_id).is_some() {
            AccessDecision::Granted
        } else {
            AccessDecision::Denied(DenialReason::NotRelated)
        }
    }

    pub fn evaluate_admin(actor: &Actor) -> AccessDecision {
        if actor.is_admin() {
            AccessDecision::Granted
        } else {
            AccessDecision::Denied(DenialReason::NotAdmin)
        }
    }

    /// Write access to an existing resource, addressed by its own id.
    ///
    /// A missing resource is `NotFound` for every actor, admins included, and
    /// is reported before any permission is evaluated.
    pub async fn evaluate_resource_access<Id>(
        actor: &Actor,
        resource_id: Id,
        lookup: &dyn OwnerLookup<Id>,
    ) -> Result<AccessDecision, ServiceError>
    where
        Id: Copy + Display + Send + Sync + 'static,
    {
        let Some(complex_id) = lookup.owning_complex(resource_id).await? else {
            debug!("{} {} not found", lookup.resource_kind(), resource_id);
            return Err(ServiceError::not_found(format!(
                "{} not found",
                lookup.resource_kind()
            )));
        };
        Ok(Self::evaluate_complex_access(actor, complex_id, None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::BuildingMembership;
    use crate::types::{ContactInfoId, UserId};
    use std::collections::HashMap;

    fn member(complex_id: ComplexId, moderator: bool) -> BuildingMembership {
        BuildingMembership { complex_id, moderator }
    }

    struct FixedOwners(HashMap<ContactInfoId, ComplexId>);

    #[async_trait]
    impl OwnerLookup<ContactInfoId> for FixedOwners {
        fn resource_kind(&self) -> &'static str {
            "Contact info"
        }

        async fn owning_complex(&self, id: ContactInfoId) -> Result<Option<ComplexId>, DatabaseError> {
            Ok(self.0.get(&id).copied())
        }
    }

    #[test]
    fn admin_is_granted_everywhere() {
        let c1 = ComplexId::generate();
        let memberships = [vec![], vec![member(c1, false)], vec![member(c1, true)]];
        for buildings in memberships {
            let admin = Actor::new(UserId::generate(), true, buildings);
            assert!(AccessPolicy::evaluate_complex_access(&admin, c1, None).is_allowed());
            assert!(AccessPolicy::evaluate_complex_access(&admin, ComplexId::generate(), None).is_allowed());
        }
    }

    #[test]
    fn non_admin_needs_moderator_membership() {
        let c1 = ComplexId::generate();
        let c2 = ComplexId::generate();
        let actor = Actor::new(UserId::generate(), false, vec![member(c1, true), member(c2, false)]);

        assert_eq!(
            AccessPolicy::evaluate_complex_access(&actor, c1, None),
            AccessDecision::Granted
        );
        assert_eq!(
            AccessPolicy::evaluate_complex_access(&actor, c2, Some(BuildingId::generate())),
            AccessDecision::Denied(DenialReason::NotModerator)
        );
        assert_eq!(
            AccessPolicy::evaluate_complex_access(&actor, ComplexId::generate(), None),
            AccessDecision::Denied(DenialReason::NotRelated)
        );
    }

    #[test]
    fn membership_compares_ids_by_value() {
        let raw = "0f8fad5b-d9cb-469f-a165-70867728950e";
        let actor = Actor::new(UserId::generate(), false, vec![member(raw.parse().unwrap(), true)]);
        let same: ComplexId = raw.to_uppercase().parse().unwrap();
        assert!(AccessPolicy::evaluate_complex_access(&actor, same, None).is_allowed());
    }

    #[test]
    fn read_access_accepts_any_member() {
        let c1 = ComplexId::generate();
        let resident = Actor::new(UserId::generate(), false, vec![member(c1, false)]);
        assert!(AccessPolicy::evaluate_membership(&resident, c1).is_allowed());
        assert!(!AccessPolicy::evaluate_membership(&resident, ComplexId::generate()).is_allowed());
        assert!(!AccessPolicy::evaluate_admin(&resident).is_allowed());
    }

    #[test]
    fn denial_maps_to_forbidden() {
        let decision = AccessDecision::Denied(DenialReason::NotModerator);
        match decision.into_result() {
            Err(ServiceError::Forbidden(msg)) => assert_eq!(msg, "You don't have access to this action!"),
            other => panic!("expected Forbidden, got {:?}", other),
        }
        assert!(AccessDecision::Granted.into_result().is_ok());
    }

    #[tokio::test]
    async fn missing_resource_is_not_found_even_for_admin() {
        let lookup = FixedOwners(HashMap::new());
        let admin = Actor::new(UserId::generate(), true, vec![]);
        let err = AccessPolicy::evaluate_resource_access(&admin, ContactInfoId::generate(), &lookup)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(msg) if msg == "Contact info not found"));
    }

    #[tokio::test]
    async fn resource_access_delegates_to_owning_complex() {
        let c1 = ComplexId::generate();
        let id = ContactInfoId::generate();
        let lookup = FixedOwners(HashMap::from([(id, c1)]));

        let moderator = Actor::new(UserId::generate(), false, vec![member(c1, true)]);
        let outsider = Actor::new(UserId::generate(), false, vec![member(ComplexId::generate(), true)]);

        assert!(AccessPolicy::evaluate_resource_access(&moderator, id, &lookup)
            .await
            .unwrap()
            .is_allowed());
        assert_eq!(
            AccessPolicy::evaluate_resource_access(&outsider, id, &lookup).await.unwrap(),
            AccessDecision::Denied(DenialReason::NotRelated)
        );
    }
}
