//! Per-element resolved annotation metadata.
//!
//! Four parallel layers plus indices:
//!
//! ```text
//! declared_annotations   written directly on the element
//! declared_stereotypes   meta-annotations reached through declared annotations
//! all_annotations        declared + inherited annotations
//! all_stereotypes        declared + inherited stereotypes
//! annotations_by_stereotype   stereotype -> owning annotations on every path
//! repeatable_containers       repeatable annotation -> container annotation
//! ```
//!
//! Repeatable annotations never get an entry of their own: they are appended
//! to the `value` array of their container's entry.
//!
//! Every stereotype placement is also recorded with the annotation path that
//! reached it. Removing an annotation drops the placements made through it
//! and rebuilds the stereotypes that survive from the rest.

use std::fmt;
use std::sync::Arc;

use bitflags::bitflags;
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

use crate::{
    MemberMap, Name, NestedAnnotation, SharedInterner, Value, EVALUATED_EXPRESSION_PREFIX,
    PROPERTY_PLACEHOLDER_PREFIX,
};

/// Annotation name → member values, in placement order.
pub type AnnotationMap = IndexMap<Name, MemberMap, FxBuildHasher>;

bitflags! {
    /// Facts about the member values of placed annotations.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct MetadataFlags: u8 {
        /// Some member holds a `${...}` property placeholder.
        const HAS_PROPERTY_EXPRESSIONS = 1 << 0;
        /// Some member holds a `#{...}` evaluated expression.
        const HAS_EVALUATED_EXPRESSIONS = 1 << 1;
    }
}

impl MetadataFlags {
    /// Expression flags of one member value, nested values included.
    ///
    /// Evaluated expressions count whether already wrapped by the reader or
    /// still a plain string, as in values handed to a mutation.
    pub fn of_value(value: &Value) -> Self {
        match value {
            Value::Str(s) => {
                let mut flags = MetadataFlags::empty();
                flags.set(
                    MetadataFlags::HAS_PROPERTY_EXPRESSIONS,
                    s.contains(PROPERTY_PLACEHOLDER_PREFIX),
                );
                flags.set(
                    MetadataFlags::HAS_EVALUATED_EXPRESSIONS,
                    s.contains(EVALUATED_EXPRESSION_PREFIX),
                );
                flags
            }
            Value::Expression(_) => MetadataFlags::HAS_EVALUATED_EXPRESSIONS,
            Value::Array(items) => items.iter().map(MetadataFlags::of_value).collect(),
            Value::Annotation(nested) => MetadataFlags::of_members(&nested.members),
            _ => MetadataFlags::empty(),
        }
    }

    pub fn of_members(members: &MemberMap) -> Self {
        members.values().map(MetadataFlags::of_value).collect()
    }
}

/// One stereotype placement and the annotation path that reached it.
#[derive(Clone, Debug)]
struct StereotypeSource {
    /// Outermost annotation first; excludes the stereotype itself.
    path: Vec<Name>,
    declared: bool,
    contribution: Contribution,
}

#[derive(Clone, Debug)]
enum Contribution {
    /// Members merged into a plain stereotype entry.
    Members(MemberMap),
    /// An instance appended to a repeatable container entry.
    Instance(NestedAnnotation),
}

/// Borrowed view of one annotation occurrence.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AnnotationView<'a> {
    pub name: Name,
    pub members: &'a MemberMap,
}

impl<'a> AnnotationView<'a> {
    pub fn member(&self, member: Name) -> Option<&'a Value> {
        self.members.get(&member)
    }
}

/// Resolved annotation metadata of one program element.
///
/// Query methods take annotation and member names as strings and resolve
/// them through the shared interner without interning.
#[derive(Clone)]
pub struct AnnotationMetadata {
    declared_annotations: AnnotationMap,
    declared_stereotypes: AnnotationMap,
    all_annotations: AnnotationMap,
    all_stereotypes: AnnotationMap,
    annotations_by_stereotype: IndexMap<Name, Vec<Name>, FxBuildHasher>,
    repeatable_containers: IndexMap<Name, Name, FxBuildHasher>,
    /// Declared defaults of every annotation type that was placed.
    default_values: IndexMap<Name, Arc<MemberMap>, FxBuildHasher>,
    /// Stereotype (or container) entry → its placements, in order.
    stereotype_sources: IndexMap<Name, Vec<StereotypeSource>, FxBuildHasher>,
    interner: SharedInterner,
}

impl AnnotationMetadata {
    /// Create empty metadata.
    pub fn new(interner: SharedInterner) -> Self {
        AnnotationMetadata {
            declared_annotations: AnnotationMap::default(),
            declared_stereotypes: AnnotationMap::default(),
            all_annotations: AnnotationMap::default(),
            all_stereotypes: AnnotationMap::default(),
            annotations_by_stereotype: IndexMap::default(),
            repeatable_containers: IndexMap::default(),
            default_values: IndexMap::default(),
            stereotype_sources: IndexMap::default(),
            interner,
        }
    }

    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    /// True when no annotation or stereotype applies.
    pub fn is_empty(&self) -> bool {
        self.all_annotations.is_empty() && self.all_stereotypes.is_empty()
    }

    // === Placement ===

    /// Place a plain annotation. Members merge into an existing entry of the
    /// same name, later values winning.
    pub fn add_annotation(&mut self, name: Name, members: &MemberMap, declared: bool) {
        merge_into(&mut self.all_annotations, name, members);
        if declared {
            merge_into(&mut self.declared_annotations, name, members);
        }
    }

    /// Place a stereotype reached through the annotations in `parents`
    /// (outermost first).
    pub fn add_stereotype(
        &mut self,
        parents: &[Name],
        name: Name,
        members: &MemberMap,
        declared: bool,
    ) {
        merge_into(&mut self.all_stereotypes, name, members);
        if declared {
            merge_into(&mut self.declared_stereotypes, name, members);
        }
        self.register_owners(parents, name);
        self.record_source(name, parents, declared, Contribution::Members(members.clone()));
    }

    /// Place one instance of a repeatable annotation inside its container.
    ///
    /// Every occurrence gets its own entry, even one equal to an earlier
    /// instance.
    pub fn add_repeatable(&mut self, container: Name, value: NestedAnnotation, declared: bool) {
        self.repeatable_containers.insert(value.name, container);
        if declared {
            push_repeatable(&mut self.declared_annotations, container, value.clone(), false);
        }
        push_repeatable(&mut self.all_annotations, container, value, false);
    }

    /// Place one instance of a repeatable stereotype inside its container.
    ///
    /// An instance equal to one already in the container is not added again:
    /// two annotations carrying the same meta-annotation contribute it once.
    pub fn add_repeatable_stereotype(
        &mut self,
        parents: &[Name],
        container: Name,
        value: NestedAnnotation,
        declared: bool,
    ) {
        self.repeatable_containers.insert(value.name, container);
        self.register_owners(parents, container);
        self.register_owners(parents, value.name);
        if declared {
            push_repeatable(&mut self.declared_stereotypes, container, value.clone(), true);
        }
        push_repeatable(&mut self.all_stereotypes, container, value.clone(), true);
        self.record_source(container, parents, declared, Contribution::Instance(value));
    }

    /// Record the declared defaults of an annotation type.
    pub fn add_default_values(&mut self, name: Name, defaults: Arc<MemberMap>) {
        if !defaults.is_empty() {
            self.default_values.entry(name).or_insert(defaults);
        }
    }

    fn record_source(
        &mut self,
        entry: Name,
        parents: &[Name],
        declared: bool,
        contribution: Contribution,
    ) {
        self.stereotype_sources
            .entry(entry)
            .or_default()
            .push(StereotypeSource {
                path: parents.to_vec(),
                declared,
                contribution,
            });
    }

    fn register_owners(&mut self, parents: &[Name], stereotype: Name) {
        let owners = self.annotations_by_stereotype.entry(stereotype).or_default();
        for parent in parents {
            if !owners.contains(parent) {
                owners.push(*parent);
            }
        }
    }

    // === Queries ===

    fn name(&self, s: &str) -> Option<Name> {
        self.interner.get(s)
    }

    fn find_members(&self, name: Name) -> Option<&MemberMap> {
        self.all_annotations
            .get(&name)
            .or_else(|| self.all_stereotypes.get(&name))
    }

    fn repeatable_in(&self, map: &AnnotationMap, name: Name) -> bool {
        self.repeatable_containers
            .get(&name)
            .and_then(|container| map.get(container))
            .and_then(|members| members.get(&Name::VALUE))
            .and_then(Value::as_array)
            .is_some_and(|items| {
                items
                    .iter()
                    .filter_map(Value::as_annotation)
                    .any(|nested| nested.name == name)
            })
    }

    /// Whether the annotation applies, directly or inherited.
    pub fn has_annotation(&self, annotation: &str) -> bool {
        self.name(annotation).is_some_and(|name| {
            self.all_annotations.contains_key(&name)
                || self.repeatable_in(&self.all_annotations, name)
        })
    }

    /// Whether the annotation is written directly on the element.
    pub fn has_declared_annotation(&self, annotation: &str) -> bool {
        self.name(annotation).is_some_and(|name| {
            self.declared_annotations.contains_key(&name)
                || self.repeatable_in(&self.declared_annotations, name)
        })
    }

    /// Whether the annotation applies either directly or as a stereotype.
    pub fn has_stereotype(&self, stereotype: &str) -> bool {
        self.has_annotation(stereotype)
            || self.name(stereotype).is_some_and(|name| {
                self.all_stereotypes.contains_key(&name)
                    || self.repeatable_in(&self.all_stereotypes, name)
            })
    }

    /// Like [`has_stereotype`](Self::has_stereotype), restricted to what
    /// the element itself declares.
    pub fn has_declared_stereotype(&self, stereotype: &str) -> bool {
        self.has_declared_annotation(stereotype)
            || self.name(stereotype).is_some_and(|name| {
                self.declared_stereotypes.contains_key(&name)
                    || self.repeatable_in(&self.declared_stereotypes, name)
            })
    }

    /// Member value of an annotation or stereotype, falling back to the
    /// annotation type's declared default.
    pub fn value(&self, annotation: &str, member: &str) -> Option<&Value> {
        let annotation = self.name(annotation)?;
        let member = self.name(member)?;
        self.find_members(annotation)
            .and_then(|members| members.get(&member))
            .or_else(|| self.default_values.get(&annotation)?.get(&member))
    }

    pub fn string_value(&self, annotation: &str, member: &str) -> Option<&str> {
        self.value(annotation, member)?.as_str()
    }

    /// Every string of an array member (or the single string).
    pub fn string_values(&self, annotation: &str, member: &str) -> Vec<&str> {
        match self.value(annotation, member) {
            Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
            Some(value) => value.as_str().into_iter().collect(),
            None => Vec::new(),
        }
    }

    pub fn bool_value(&self, annotation: &str, member: &str) -> Option<bool> {
        self.value(annotation, member)?.as_bool()
    }

    pub fn int_value(&self, annotation: &str, member: &str) -> Option<i64> {
        self.value(annotation, member)?.as_int()
    }

    pub fn enum_value(&self, annotation: &str, member: &str) -> Option<&str> {
        self.value(annotation, member)?.as_enum_constant()
    }

    pub fn class_value(&self, annotation: &str, member: &str) -> Option<&str> {
        self.value(annotation, member)?.as_class()
    }

    /// Every occurrence of an annotation.
    ///
    /// Repeatable annotations yield one view per instance (annotations
    /// first, then stereotypes); others yield at most one view.
    pub fn annotation_values(&self, annotation: &str) -> Vec<AnnotationView<'_>> {
        let Some(name) = self.name(annotation) else {
            return Vec::new();
        };
        if let Some(container) = self.repeatable_containers.get(&name) {
            return [&self.all_annotations, &self.all_stereotypes]
                .into_iter()
                .filter_map(|map| map.get(container)?.get(&Name::VALUE)?.as_array())
                .flatten()
                .filter_map(Value::as_annotation)
                .filter(|nested| nested.name == name)
                .map(|nested| AnnotationView {
                    name,
                    members: &nested.members,
                })
                .collect();
        }
        self.find_members(name)
            .map(|members| AnnotationView { name, members })
            .into_iter()
            .collect()
    }

    /// Annotations carrying `stereotype`, on every path; includes the
    /// stereotype itself when it is present as an annotation.
    pub fn annotation_names_by_stereotype(&self, stereotype: &str) -> Vec<&'static str> {
        let Some(name) = self.name(stereotype) else {
            return Vec::new();
        };
        let mut names = Vec::new();
        if self.all_annotations.contains_key(&name) {
            names.push(self.interner.lookup(name));
        }
        if let Some(owners) = self.annotations_by_stereotype.get(&name) {
            names.extend(owners.iter().map(|owner| self.interner.lookup(*owner)));
        }
        names
    }

    fn names_of(&self, map: &AnnotationMap) -> Vec<&'static str> {
        map.keys().map(|name| self.interner.lookup(*name)).collect()
    }

    pub fn annotation_names(&self) -> Vec<&'static str> {
        self.names_of(&self.all_annotations)
    }

    pub fn declared_annotation_names(&self) -> Vec<&'static str> {
        self.names_of(&self.declared_annotations)
    }

    pub fn stereotype_names(&self) -> Vec<&'static str> {
        self.names_of(&self.all_stereotypes)
    }

    pub fn declared_stereotype_names(&self) -> Vec<&'static str> {
        self.names_of(&self.declared_stereotypes)
    }

    /// Container annotation of a repeatable annotation.
    pub fn find_repeatable_container(&self, annotation: &str) -> Option<&'static str> {
        let name = self.name(annotation)?;
        self.repeatable_containers
            .get(&name)
            .map(|container| self.interner.lookup(*container))
    }

    /// Declared defaults of an annotation type.
    pub fn default_values(&self, annotation: &str) -> Option<&MemberMap> {
        self.default_values
            .get(&self.name(annotation)?)
            .map(|defaults| &**defaults)
    }

    pub fn has_property_expressions(&self) -> bool {
        self.flags().contains(MetadataFlags::HAS_PROPERTY_EXPRESSIONS)
    }

    pub fn has_evaluated_expressions(&self) -> bool {
        self.flags().contains(MetadataFlags::HAS_EVALUATED_EXPRESSIONS)
    }

    /// Expression flags of every member value currently placed.
    ///
    /// Derived from the layers, so placements made by mutations count and
    /// removed annotations stop counting. Declared layers are subsets of the
    /// `all_*` layers and need no separate scan.
    pub fn flags(&self) -> MetadataFlags {
        self.all_annotations
            .values()
            .chain(self.all_stereotypes.values())
            .map(MetadataFlags::of_members)
            .collect()
    }

    pub fn declared_annotations(&self) -> &AnnotationMap {
        &self.declared_annotations
    }

    pub fn declared_stereotypes(&self) -> &AnnotationMap {
        &self.declared_stereotypes
    }

    pub fn all_annotations(&self) -> &AnnotationMap {
        &self.all_annotations
    }

    pub fn all_stereotypes(&self) -> &AnnotationMap {
        &self.all_stereotypes
    }

    pub fn annotations_by_stereotype(&self) -> &IndexMap<Name, Vec<Name>, FxBuildHasher> {
        &self.annotations_by_stereotype
    }

    pub fn repeatable_containers(&self) -> &IndexMap<Name, Name, FxBuildHasher> {
        &self.repeatable_containers
    }

    // === Removal ===

    /// Remove an annotation and every stereotype only it contributed.
    ///
    /// Returns whether anything was removed.
    pub fn remove_annotation(&mut self, annotation: &str) -> bool {
        match self.name(annotation) {
            Some(name) => self.remove_annotation_named(name),
            None => false,
        }
    }

    fn remove_annotation_named(&mut self, name: Name) -> bool {
        let mut removed = self.all_annotations.shift_remove(&name).is_some();
        removed |= self.declared_annotations.shift_remove(&name).is_some();

        if let Some(container) = self.repeatable_containers.get(&name).copied() {
            removed |= strip_repeatable(&mut self.all_annotations, container, name);
            strip_repeatable(&mut self.declared_annotations, container, name);
            if !self.repeatable_in(&self.all_stereotypes, name) {
                self.repeatable_containers.shift_remove(&name);
            }
            if !self.all_annotations.contains_key(&container) {
                self.cascade_removal(container);
            }
        }

        self.cascade_removal(name);
        self.resync_stereotypes();
        self.prune_default_values();
        removed
    }

    /// Remove a stereotype, its index entry, and every stereotype reached
    /// only through it.
    pub fn remove_stereotype(&mut self, stereotype: &str) -> bool {
        let Some(name) = self.name(stereotype) else {
            return false;
        };
        let mut removed = self.all_stereotypes.shift_remove(&name).is_some();
        removed |= self.declared_stereotypes.shift_remove(&name).is_some();
        removed |= self.annotations_by_stereotype.shift_remove(&name).is_some();

        if let Some(container) = self.repeatable_containers.get(&name).copied() {
            removed |= strip_repeatable(&mut self.all_stereotypes, container, name);
            strip_repeatable(&mut self.declared_stereotypes, container, name);
            if !self.repeatable_in(&self.all_annotations, name) {
                self.repeatable_containers.shift_remove(&name);
            }
            if let Some(placed) = self.stereotype_sources.get_mut(&container) {
                placed.retain(|source| match &source.contribution {
                    Contribution::Instance(nested) => nested.name != name,
                    Contribution::Members(_) => true,
                });
            }
        }
        self.stereotype_sources.shift_remove(&name);

        self.cascade_removal(name);
        self.resync_stereotypes();
        self.prune_default_values();
        removed
    }

    /// Remove every annotation matching `predicate`.
    ///
    /// A repeatable annotation is removed (all instances) when any of its
    /// instances matches.
    pub fn remove_annotation_if(
        &mut self,
        mut predicate: impl FnMut(AnnotationView<'_>) -> bool,
    ) -> bool {
        let mut matching: Vec<Name> = self
            .all_annotations
            .iter()
            .filter(|(name, _)| !self.is_container_only(**name))
            .filter(|(name, members)| {
                predicate(AnnotationView {
                    name: **name,
                    members: *members,
                })
            })
            .map(|(name, _)| *name)
            .collect();

        for (repeatable, container) in &self.repeatable_containers {
            let Some(items) = self
                .all_annotations
                .get(container)
                .and_then(|members| members.get(&Name::VALUE))
                .and_then(Value::as_array)
            else {
                continue;
            };
            let hit = items
                .iter()
                .filter_map(Value::as_annotation)
                .filter(|nested| nested.name == *repeatable)
                .any(|nested| {
                    predicate(AnnotationView {
                        name: nested.name,
                        members: &nested.members,
                    })
                });
            if hit {
                matching.push(*repeatable);
            }
        }

        let mut removed = false;
        for name in matching {
            removed |= self.remove_annotation_named(name);
        }
        removed
    }

    /// A container entry holding nothing but repeatable instances.
    fn is_container_only(&self, name: Name) -> bool {
        self.repeatable_containers.values().any(|c| *c == name)
            && self
                .all_annotations
                .get(&name)
                .is_some_and(|members| members.len() == 1 && members.contains_key(&Name::VALUE))
    }

    /// Drop `root` from every owner list; stereotypes left without owners
    /// are removed and cascade in turn.
    fn cascade_removal(&mut self, root: Name) {
        let mut pending = vec![root];
        while let Some(owner) = pending.pop() {
            let mut orphaned = Vec::new();
            self.annotations_by_stereotype.retain(|stereotype, owners| {
                owners.retain(|o| *o != owner);
                if owners.is_empty() {
                    orphaned.push(*stereotype);
                    false
                } else {
                    true
                }
            });
            for stereotype in orphaned {
                self.all_stereotypes.shift_remove(&stereotype);
                self.declared_stereotypes.shift_remove(&stereotype);
                pending.push(stereotype);
            }
        }
    }

    /// Whether the annotation a placement path starts from is still placed.
    fn path_is_live(&self, path: &[Name]) -> bool {
        path.first().map_or(true, |&root| {
            self.all_annotations.contains_key(&root)
                || self.repeatable_in(&self.all_annotations, root)
        })
    }

    /// Drop placements made through removed annotations and rebuild the
    /// stereotype entries they fed.
    fn resync_stereotypes(&mut self) {
        let mut sources = std::mem::take(&mut self.stereotype_sources);
        let mut changed = Vec::new();
        for (entry, placed) in &mut sources {
            let before = placed.len();
            placed.retain(|source| self.path_is_live(&source.path));
            if placed.len() != before {
                changed.push(*entry);
            }
        }
        sources.retain(|_, placed| !placed.is_empty());

        for entry in changed {
            let placed = sources.get(&entry).map_or(&[][..], Vec::as_slice);
            self.rebuild_stereotype(entry, placed);
        }
        self.stereotype_sources = sources;
    }

    fn rebuild_stereotype(&mut self, entry: Name, placed: &[StereotypeSource]) {
        match replay(placed.iter()) {
            Some(members) => replace_entry(&mut self.all_stereotypes, entry, members),
            None => {
                self.all_stereotypes.shift_remove(&entry);
                self.annotations_by_stereotype.shift_remove(&entry);
            }
        }
        match replay(placed.iter().filter(|source| source.declared)) {
            Some(members) => replace_entry(&mut self.declared_stereotypes, entry, members),
            None => {
                self.declared_stereotypes.shift_remove(&entry);
            }
        }
    }

    fn prune_default_values(&mut self) {
        self.default_values.retain(|name, _| {
            self.all_annotations.contains_key(name)
                || self.all_stereotypes.contains_key(name)
                || self.repeatable_containers.contains_key(name)
        });
    }
}

fn merge_into(map: &mut AnnotationMap, name: Name, members: &MemberMap) {
    let entry = map.entry(name).or_default();
    for (member, value) in members {
        entry.insert(*member, value.clone());
    }
}

fn push_repeatable(map: &mut AnnotationMap, container: Name, value: NestedAnnotation, dedup: bool) {
    let entry = map.entry(container).or_default();
    push_instance(entry, value, dedup);
}

fn push_instance(members: &mut MemberMap, value: NestedAnnotation, dedup: bool) {
    let value = Value::Annotation(Box::new(value));
    match members.get_mut(&Name::VALUE) {
        Some(Value::Array(items)) => {
            if !(dedup && items.contains(&value)) {
                items.push(value);
            }
        }
        _ => {
            members.insert(Name::VALUE, Value::Array(vec![value]));
        }
    }
}

/// Members of a stereotype entry as `placed` would build them; `None` when
/// nothing was placed.
fn replay<'a>(placed: impl Iterator<Item = &'a StereotypeSource>) -> Option<MemberMap> {
    let mut members: Option<MemberMap> = None;
    for source in placed {
        let entry = members.get_or_insert_with(MemberMap::default);
        match &source.contribution {
            Contribution::Members(merged) => {
                for (member, value) in merged {
                    entry.insert(*member, value.clone());
                }
            }
            Contribution::Instance(nested) => push_instance(entry, nested.clone(), true),
        }
    }
    members
}

/// Swap the members of `name`, keeping its position in the layer.
fn replace_entry(map: &mut AnnotationMap, name: Name, members: MemberMap) {
    match map.get_mut(&name) {
        Some(existing) => *existing = members,
        None => {
            map.insert(name, members);
        }
    }
}

/// Remove every `name` instance from a container's `value` array; an
/// emptied container entry is dropped.
fn strip_repeatable(map: &mut AnnotationMap, container: Name, name: Name) -> bool {
    let Some(members) = map.get_mut(&container) else {
        return false;
    };
    let Some(Value::Array(items)) = members.get_mut(&Name::VALUE) else {
        return false;
    };
    let before = items.len();
    items.retain(|item| item.as_annotation().map_or(true, |nested| nested.name != name));
    let changed = items.len() != before;
    let now_empty = items.is_empty();

    if now_empty {
        members.shift_remove(&Name::VALUE);
    }
    if members.is_empty() {
        map.shift_remove(&container);
    }
    changed
}

impl PartialEq for AnnotationMetadata {
    fn eq(&self, other: &Self) -> bool {
        self.declared_annotations == other.declared_annotations
            && self.declared_stereotypes == other.declared_stereotypes
            && self.all_annotations == other.all_annotations
            && self.all_stereotypes == other.all_stereotypes
            && self.annotations_by_stereotype == other.annotations_by_stereotype
            && self.repeatable_containers == other.repeatable_containers
            && self.default_values == other.default_values
    }
}

impl fmt::Debug for AnnotationMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnnotationMetadata")
            .field("declared_annotations", &self.declared_annotations)
            .field("declared_stereotypes", &self.declared_stereotypes)
            .field("all_annotations", &self.all_annotations)
            .field("all_stereotypes", &self.all_stereotypes)
            .field("annotations_by_stereotype", &self.annotations_by_stereotype)
            .field("repeatable_containers", &self.repeatable_containers)
            .field("flags", &self.flags())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
