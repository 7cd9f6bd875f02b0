//! # xr_component
//!
//! The entity/component store the interaction runtime is built on.
//!
//! This crate provides:
//!
//! - [`Component`] trait: the contract all ECS data must satisfy.
//! - [`Entity`]: lightweight `u64` entity identifiers.
//! - [`EntityAllocator`]: monotonically increasing ID allocator.
//! - [`ArchetypeTable`]: entities grouped by their exact component set.
//! - [`Query`]: capability-set queries with filters.
//! - [`World`]: entity lifecycle, typed component storage and queries.

pub mod archetype;
pub mod component;
pub mod entity;
pub mod error;
pub mod query;
pub mod storage;
pub mod world;

pub use archetype::{ArchetypeId, ArchetypeTable};
pub use component::{Component, ComponentTypeId};
pub use entity::{Entity, EntityAllocator};
pub use error::EcsError;
pub use query::{Query, QueryFilter};
pub use world::World;
