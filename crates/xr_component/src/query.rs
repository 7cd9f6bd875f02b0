//! Capability queries.
//!
//! A [`Query`] selects every entity whose attached component set is a
//! superset of the required capability set, optionally narrowed by
//! [`QueryFilter`]s.

use std::collections::BTreeSet;

use crate::component::{Component, ComponentTypeId};

/// A filter that narrows the set of entities matched by a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryFilter {
    /// Only match entities that do NOT have this component.
    Without(ComponentTypeId),
    /// Only match entities that have at least one of these components.
    AnyOf(Vec<ComponentTypeId>),
}

impl QueryFilter {
    fn accepts(&self, types: &BTreeSet<ComponentTypeId>) -> bool {
        match self {
            Self::Without(ty) => !types.contains(ty),
            Self::AnyOf(any) => any.iter().any(|ty| types.contains(ty)),
        }
    }
}

/// Describes which entities a system wants to visit.
///
/// ```rust
/// use xr_component::{Component, Query};
///
/// #[derive(Debug)]
/// struct Visible;
/// impl Component for Visible {
///     fn type_name() -> &'static str { "Visible" }
/// }
///
/// let query = Query::new().with::<Visible>();
/// assert_eq!(query.required.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    /// Component types every matched entity must carry.
    pub required: Vec<ComponentTypeId>,
    /// Additional filters applied after the required set.
    pub filters: Vec<QueryFilter>,
}

impl Query {
    /// Create a new empty query (matches every entity).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Require component `T`.
    #[must_use]
    pub fn with<T: Component>(self) -> Self {
        self.with_id(T::component_type_id())
    }

    /// Require the component with the given type ID.
    #[must_use]
    pub fn with_id(mut self, type_id: ComponentTypeId) -> Self {
        self.required.push(type_id);
        self
    }

    /// Exclude entities carrying component `T`.
    #[must_use]
    pub fn without<T: Component>(self) -> Self {
        self.filter(QueryFilter::Without(T::component_type_id()))
    }

    /// Add a query filter.
    #[must_use]
    pub fn filter(mut self, f: QueryFilter) -> Self {
        self.filters.push(f);
        self
    }

    /// Returns `true` if an entity with exactly `types` attached matches.
    #[must_use]
    pub fn matches(&self, types: &BTreeSet<ComponentTypeId>) -> bool {
        self.required.iter().all(|ty| types.contains(ty))
            && self.filters.iter().all(|f| f.accepts(types))
    }
}
