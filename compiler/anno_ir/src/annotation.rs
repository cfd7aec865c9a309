//! Resolved annotation nodes and the arena that holds stereotype trees.

use std::sync::Arc;

use crate::{AnnoId, ElementId, MemberMap, Name, RetentionPolicy, Value};

/// One resolved annotation.
///
/// `stereotypes` distinguishes "not yet computed" (`None`) from "computed,
/// none apply" (`Some(empty)`). Once `Some`, the resolver never recomputes
/// it for this node; a freshly constructed value always starts at `None`.
#[derive(Clone, Debug, PartialEq)]
pub struct AnnotationValue {
    /// Fully qualified annotation type name.
    pub name: Name,
    /// Member values, in declaration order.
    pub members: MemberMap,
    /// The annotation type's own declared defaults, attached lazily.
    pub default_values: Option<Arc<MemberMap>>,
    pub retention: RetentionPolicy,
    /// Resolved meta-annotations of the annotation type.
    pub stereotypes: Option<Vec<AnnoId>>,
}

impl AnnotationValue {
    /// Create an annotation with no members and unresolved stereotypes.
    pub fn new(name: Name) -> Self {
        AnnotationValue {
            name,
            members: MemberMap::default(),
            default_values: None,
            retention: RetentionPolicy::default(),
            stereotypes: None,
        }
    }

    /// Create an annotation with the given members.
    pub fn with_members(name: Name, members: MemberMap) -> Self {
        AnnotationValue {
            members,
            ..Self::new(name)
        }
    }

    /// Add a member value.
    #[must_use]
    pub fn with_member(mut self, member: Name, value: impl Into<Value>) -> Self {
        self.members.insert(member, value.into());
        self
    }

    #[must_use]
    pub fn with_retention(mut self, retention: RetentionPolicy) -> Self {
        self.retention = retention;
        self
    }

    pub fn member(&self, member: Name) -> Option<&Value> {
        self.members.get(&member)
    }

    /// Explicit member value, falling back to the declared default.
    pub fn member_or_default(&self, member: Name) -> Option<&Value> {
        self.members
            .get(&member)
            .or_else(|| self.default_values.as_ref()?.get(&member))
    }

    /// Stereotype ids, empty when unresolved.
    pub fn stereotype_ids(&self) -> &[AnnoId] {
        self.stereotypes.as_deref().unwrap_or(&[])
    }
}

/// Append-only storage for resolved stereotype nodes.
///
/// Stereotype trees may be arbitrarily deep and the same annotation type may
/// appear on many paths, so nodes reference their stereotypes by `AnnoId`
/// rather than owning them. Parallel arrays keep the annotation type handle
/// next to each node for placement.
#[derive(Clone, Debug, Default)]
pub struct AnnotationArena {
    /// Resolved nodes.
    values: Vec<AnnotationValue>,
    /// Native annotation type of each node (parallel with `values`).
    types: Vec<Option<ElementId>>,
}

impl AnnotationArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a resolved node.
    ///
    /// # Panics
    /// Panics if the arena exceeds `u32::MAX` nodes.
    pub fn alloc(&mut self, value: AnnotationValue, annotation_type: Option<ElementId>) -> AnnoId {
        let raw = u32::try_from(self.values.len())
            .unwrap_or_else(|_| panic!("annotation arena exceeded {} nodes", u32::MAX));
        self.values.push(value);
        self.types.push(annotation_type);
        AnnoId::new(raw)
    }

    /// Get a node.
    ///
    /// # Panics
    /// Panics if `id` was not allocated by this arena.
    #[inline]
    pub fn get(&self, id: AnnoId) -> &AnnotationValue {
        &self.values[id.index()]
    }

    /// Native annotation type of a node, `None` when it was not on the classpath.
    #[inline]
    pub fn annotation_type(&self, id: AnnoId) -> Option<ElementId> {
        self.types[id.index()]
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Drop every node. Ids handed out before are invalid afterwards.
    pub fn clear(&mut self) {
        self.values.clear();
        self.types.clear();
    }
}
