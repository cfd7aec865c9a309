//! In-memory [`AnnotationSource`] for tests and embedders without a host
//! compiler.
//!
//! Every program entity is an element: classes, methods, annotation types
//! and annotation members alike. Annotating an element with a type name
//! that was never declared registers that annotation type on the spot;
//! use [`MockSource::annotate_unresolved`] for a type missing from the
//! classpath.

use std::cell::Cell;

use anno_ir::{ElementId, MirrorId, RetentionPolicy};
use indexmap::IndexMap;
use rustc_hash::{FxBuildHasher, FxHashMap};

use crate::{AnnotationSource, RawValue, SourceError};

const UNKNOWN_ELEMENT: &str = "UnknownElement";
const UNKNOWN_MIRROR: &str = "UnknownMirror";

#[derive(Debug)]
struct ElementData {
    name: String,
    annotations: Vec<MirrorId>,
    parent: Option<ElementId>,
}

#[derive(Debug)]
struct MirrorData {
    type_name: String,
    resolved: bool,
    values: Vec<(ElementId, RawValue)>,
}

#[derive(Debug, Default)]
struct AnnotationTypeData {
    members: IndexMap<String, ElementId, FxBuildHasher>,
    defaults: Vec<(ElementId, RawValue)>,
    retention: RetentionPolicy,
    container: Option<String>,
}

/// A hand-built element model.
#[derive(Debug, Default)]
pub struct MockSource {
    elements: Vec<ElementData>,
    mirrors: Vec<MirrorData>,
    /// Named types: classes and annotation types.
    types: FxHashMap<String, ElementId>,
    annotation_types: FxHashMap<ElementId, AnnotationTypeData>,
    failures: FxHashMap<ElementId, SourceError>,
    default_value_calls: Cell<usize>,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare (or fetch) an annotation type.
    pub fn declare_annotation(&mut self, name: &str) -> ElementId {
        let ty = self.class(name);
        self.annotation_types.entry(ty).or_default();
        ty
    }

    /// Declare (or fetch) a member of an annotation type.
    pub fn member(&mut self, annotation_type: ElementId, name: &str) -> ElementId {
        if let Some(member) = self
            .annotation_types
            .get(&annotation_type)
            .and_then(|data| data.members.get(name))
        {
            return *member;
        }
        let member = self.push_element(name, None);
        self.annotation_types
            .entry(annotation_type)
            .or_default()
            .members
            .insert(name.to_owned(), member);
        member
    }

    /// Declare a member with a default value.
    pub fn member_with_default(
        &mut self,
        annotation_type: ElementId,
        name: &str,
        default: RawValue,
    ) -> ElementId {
        let member = self.member(annotation_type, name);
        self.annotation_types
            .entry(annotation_type)
            .or_default()
            .defaults
            .push((member, default));
        member
    }

    /// Declare (or fetch) a named type.
    pub fn class(&mut self, name: &str) -> ElementId {
        if let Some(ty) = self.types.get(name) {
            return *ty;
        }
        let ty = self.push_element(name, None);
        self.types.insert(name.to_owned(), ty);
        ty
    }

    /// An element that is not a type, such as a method or a field.
    pub fn element(&mut self, name: &str) -> ElementId {
        self.push_element(name, None)
    }

    /// Make `child` inherit annotations from `parent`.
    pub fn extend(&mut self, child: ElementId, parent: ElementId) {
        self.elements[child.index()].parent = Some(parent);
    }

    /// Write `@annotation(values...)` on `element`.
    pub fn annotate(
        &mut self,
        element: ElementId,
        annotation: &str,
        values: &[(&str, RawValue)],
    ) -> MirrorId {
        let mirror = self.mirror(annotation, true, values);
        self.elements[element.index()].annotations.push(mirror);
        mirror
    }

    /// Write an annotation whose type is not on the classpath.
    pub fn annotate_unresolved(
        &mut self,
        element: ElementId,
        annotation: &str,
        values: &[(&str, RawValue)],
    ) -> MirrorId {
        let mirror = self.mirror(annotation, false, values);
        self.elements[element.index()].annotations.push(mirror);
        mirror
    }

    /// A nested annotation value.
    pub fn nested(&mut self, annotation: &str, values: &[(&str, RawValue)]) -> RawValue {
        RawValue::Annotation(self.mirror(annotation, true, values))
    }

    /// Mark an annotation type repeatable inside `container`.
    pub fn set_repeatable(&mut self, annotation_type: ElementId, container: &str) {
        self.annotation_types
            .entry(annotation_type)
            .or_default()
            .container = Some(container.to_owned());
    }

    pub fn set_retention(&mut self, annotation_type: ElementId, retention: RetentionPolicy) {
        self.annotation_types
            .entry(annotation_type)
            .or_default()
            .retention = retention;
    }

    /// Make reading the annotations of `element` fail.
    pub fn fail_on(&mut self, element: ElementId, error: SourceError) {
        self.failures.insert(element, error);
    }

    /// How often default member values were requested.
    pub fn default_value_calls(&self) -> usize {
        self.default_value_calls.get()
    }

    #[allow(clippy::cast_possible_truncation)]
    fn push_element(&mut self, name: &str, parent: Option<ElementId>) -> ElementId {
        let id = ElementId::new(self.elements.len() as u32);
        self.elements.push(ElementData {
            name: name.to_owned(),
            annotations: Vec::new(),
            parent,
        });
        id
    }

    #[allow(clippy::cast_possible_truncation)]
    fn mirror(
        &mut self,
        annotation: &str,
        resolved: bool,
        values: &[(&str, RawValue)],
    ) -> MirrorId {
        let values: Vec<(ElementId, RawValue)> = if resolved {
            let ty = self.declare_annotation(annotation);
            values
                .iter()
                .map(|(name, raw)| (self.member(ty, name), raw.clone()))
                .collect()
        } else {
            values
                .iter()
                .map(|(name, raw)| (self.push_element(name, None), raw.clone()))
                .collect()
        };
        let id = MirrorId::new(self.mirrors.len() as u32);
        self.mirrors.push(MirrorData {
            type_name: annotation.to_owned(),
            resolved,
            values,
        });
        id
    }

    fn element_data(&self, element: ElementId) -> Result<&ElementData, SourceError> {
        self.elements
            .get(element.index())
            .ok_or_else(|| SourceError::new(UNKNOWN_ELEMENT, format!("{element:?}")))
    }

    fn mirror_data(&self, mirror: MirrorId) -> Result<&MirrorData, SourceError> {
        self.mirrors
            .get(mirror.index())
            .ok_or_else(|| SourceError::new(UNKNOWN_MIRROR, format!("{mirror:?}")))
    }
}

impl AnnotationSource for MockSource {
    fn annotations_of(&self, element: ElementId) -> Result<Vec<MirrorId>, SourceError> {
        if let Some(error) = self.failures.get(&element) {
            return Err(error.clone());
        }
        Ok(self.element_data(element)?.annotations.clone())
    }

    fn annotation_type(&self, mirror: MirrorId) -> Result<Option<ElementId>, SourceError> {
        let data = self.mirror_data(mirror)?;
        if !data.resolved {
            return Ok(None);
        }
        Ok(self.types.get(&data.type_name).copied())
    }

    fn annotation_type_name(&self, mirror: MirrorId) -> Result<String, SourceError> {
        Ok(self.mirror_data(mirror)?.type_name.clone())
    }

    fn raw_values(&self, mirror: MirrorId) -> Result<Vec<(ElementId, RawValue)>, SourceError> {
        Ok(self.mirror_data(mirror)?.values.clone())
    }

    fn element_name(&self, element: ElementId) -> Result<String, SourceError> {
        Ok(self.element_data(element)?.name.clone())
    }

    fn annotation_member(
        &self,
        annotation_type: ElementId,
        name: &str,
    ) -> Result<Option<ElementId>, SourceError> {
        Ok(self
            .annotation_types
            .get(&annotation_type)
            .and_then(|data| data.members.get(name))
            .copied())
    }

    fn type_element(&self, name: &str) -> Result<Option<ElementId>, SourceError> {
        Ok(self.types.get(name).copied())
    }

    fn hierarchy(
        &self,
        element: ElementId,
        inherit_type_annotations: bool,
        declared_only: bool,
    ) -> Result<Vec<ElementId>, SourceError> {
        let mut chain = vec![element];
        if declared_only || !inherit_type_annotations {
            return Ok(chain);
        }
        let mut current = self.element_data(element)?.parent;
        while let Some(parent) = current {
            if chain.contains(&parent) {
                break;
            }
            chain.push(parent);
            current = self.element_data(parent)?.parent;
        }
        Ok(chain)
    }

    fn retention_policy(&self, annotation_type: ElementId) -> Result<RetentionPolicy, SourceError> {
        Ok(self
            .annotation_types
            .get(&annotation_type)
            .map(|data| data.retention)
            .unwrap_or_default())
    }

    fn repeatable_container_name(
        &self,
        annotation_type: ElementId,
    ) -> Result<Option<String>, SourceError> {
        Ok(self
            .annotation_types
            .get(&annotation_type)
            .and_then(|data| data.container.clone()))
    }

    fn default_member_values(
        &self,
        _annotation: &str,
        annotation_type: ElementId,
    ) -> Result<Vec<(ElementId, RawValue)>, SourceError> {
        self.default_value_calls.set(self.default_value_calls.get() + 1);
        Ok(self
            .annotation_types
            .get(&annotation_type)
            .map(|data| data.defaults.clone())
            .unwrap_or_default())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Tests can panic")]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_annotate_registers_type_and_members() {
        let mut source = MockSource::new();
        let class = source.class("app.Service");
        let mirror = source.annotate(class, "web.Get", &[("value", RawValue::from("/x"))]);

        let ty = source.type_element("web.Get").unwrap().unwrap();
        let member = source.annotation_member(ty, "value").unwrap().unwrap();
        assert_eq!(source.annotation_type(mirror).unwrap(), Some(ty));
        assert_eq!(
            source.raw_values(mirror).unwrap(),
            vec![(member, RawValue::from("/x"))]
        );
        assert_eq!(source.element_name(member).unwrap(), "value");
    }

    #[test]
    fn test_unresolved_mirror_has_no_type() {
        let mut source = MockSource::new();
        let class = source.class("app.Service");
        let mirror = source.annotate_unresolved(class, "missing.Thing", &[]);

        assert_eq!(source.annotation_type(mirror).unwrap(), None);
        assert_eq!(source.annotation_type_name(mirror).unwrap(), "missing.Thing");
        assert_eq!(source.type_element("missing.Thing").unwrap(), None);
    }

    #[test]
    fn test_hierarchy_most_specific_first() {
        let mut source = MockSource::new();
        let base = source.class("app.Base");
        let middle = source.class("app.Middle");
        let leaf = source.class("app.Leaf");
        source.extend(middle, base);
        source.extend(leaf, middle);

        assert_eq!(
            source.hierarchy(leaf, true, false).unwrap(),
            vec![leaf, middle, base]
        );
        assert_eq!(source.hierarchy(leaf, true, true).unwrap(), vec![leaf]);
        assert_eq!(source.hierarchy(leaf, false, false).unwrap(), vec![leaf]);
    }

    #[test]
    fn test_unknown_handles_are_errors() {
        let source = MockSource::new();
        let error = source.element_name(ElementId::new(7)).unwrap_err();
        assert_eq!(error.kind, UNKNOWN_ELEMENT);
        assert!(source.raw_values(MirrorId::new(0)).is_err());
    }

    #[test]
    fn test_failure_injection() {
        let mut source = MockSource::new();
        let class = source.class("app.Broken");
        source.fail_on(class, SourceError::new("Boom", "broken"));
        assert_eq!(
            source.annotations_of(class).unwrap_err(),
            SourceError::new("Boom", "broken")
        );
    }
}
