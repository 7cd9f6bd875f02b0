//! Store error types.

use crate::entity::Entity;

/// Errors returned by [`World`](crate::World) mutations.
///
/// Lookups never fail with an error: a missing component or an unregistered
/// capability simply yields `None` or an empty query result.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EcsError {
    /// The entity was never created or has been despawned.
    #[error("{0} does not exist")]
    EntityNotFound(Entity),

    /// The entity already carries a different component from the same
    /// mutually exclusive group.
    #[error("{entity} cannot take {incoming}: it already has {existing} in group '{group}'")]
    ExclusiveConflict {
        /// The entity being modified.
        entity: Entity,
        /// Name of the exclusive group.
        group: &'static str,
        /// The component already attached.
        existing: &'static str,
        /// The component that was rejected.
        incoming: &'static str,
    },
}
