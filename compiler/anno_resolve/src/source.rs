//! The boundary to the host compiler's element model.

use anno_ir::{ElementId, MirrorId, RetentionPolicy};

use crate::SourceError;

/// A member value as the host reports it, before resolution.
#[derive(Clone, Debug, PartialEq)]
pub enum RawValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Char(char),
    Str(String),
    /// Class literal, by fully qualified name.
    Class(String),
    Enum {
        ty: String,
        constant: String,
    },
    /// Nested annotation mirror.
    Annotation(MirrorId),
    Array(Vec<RawValue>),
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Str(s.to_owned())
    }
}

/// Read access to annotations in a host compiler.
///
/// Element and mirror handles are minted by the implementor and must stay
/// valid for the lifetime of the resolver that owns the source.
pub trait AnnotationSource {
    /// Annotation mirrors written directly on `element`, in source order.
    fn annotations_of(&self, element: ElementId) -> Result<Vec<MirrorId>, SourceError>;

    /// The annotation type of a mirror, `None` when it is not on the classpath.
    fn annotation_type(&self, mirror: MirrorId) -> Result<Option<ElementId>, SourceError>;

    /// Fully qualified annotation type name of a mirror. Available even when
    /// the type itself cannot be resolved.
    fn annotation_type_name(&self, mirror: MirrorId) -> Result<String, SourceError>;

    /// Explicitly written member values, keyed by member element.
    fn raw_values(&self, mirror: MirrorId) -> Result<Vec<(ElementId, RawValue)>, SourceError>;

    /// Simple name of an element (member names for annotation members).
    fn element_name(&self, element: ElementId) -> Result<String, SourceError>;

    /// Member element `name` of an annotation type.
    fn annotation_member(
        &self,
        annotation_type: ElementId,
        name: &str,
    ) -> Result<Option<ElementId>, SourceError>;

    /// Look up a type by fully qualified name.
    fn type_element(&self, name: &str) -> Result<Option<ElementId>, SourceError>;

    /// `element` followed by the elements it inherits annotations from,
    /// most specific first. With `declared_only` only `element` is returned.
    fn hierarchy(
        &self,
        element: ElementId,
        inherit_type_annotations: bool,
        declared_only: bool,
    ) -> Result<Vec<ElementId>, SourceError>;

    fn retention_policy(&self, annotation_type: ElementId) -> Result<RetentionPolicy, SourceError>;

    /// Container annotation name when `annotation_type` is repeatable.
    fn repeatable_container_name(
        &self,
        annotation_type: ElementId,
    ) -> Result<Option<String>, SourceError>;

    /// Declared default values of an annotation type's members.
    fn default_member_values(
        &self,
        annotation: &str,
        annotation_type: ElementId,
    ) -> Result<Vec<(ElementId, RawValue)>, SourceError>;
}
