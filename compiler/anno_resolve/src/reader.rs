//! Raw annotation mirrors to resolved values.
//!
//! Reading also reports deprecated annotations and runs the member
//! validator.

use anno_diagnostic::{Diagnostic, ErrorCode};
use anno_ir::{
    AnnotationMetadata, AnnotationValue, ElementId, ExpressionRef, MirrorId, Name,
    NestedAnnotation, RetentionPolicy, Value, EVALUATED_EXPRESSION_PREFIX,
};

use crate::config::simple_name;
use crate::{
    AnnotationResolver, AnnotationSource, CacheKey, ProcessedAnnotation, RawValue, ResolveError,
};

/// An annotation member element handed to the validator.
pub trait ValidatedElement {
    /// Member name.
    fn name(&self) -> &str;

    fn element(&self) -> ElementId;

    /// Annotations on the member declaration itself (constraints such as
    /// `@Min`).
    fn metadata(&self) -> &AnnotationMetadata;
}

/// Validates annotation member values against the constraints declared on
/// the member.
pub trait AnnotatedElementValidator {
    /// Failure messages; empty when `value` is valid.
    fn validate(&self, member: &dyn ValidatedElement, value: &Value) -> Vec<String>;
}

struct MemberElement<'a> {
    name: &'a str,
    element: ElementId,
    metadata: &'a AnnotationMetadata,
}

impl ValidatedElement for MemberElement<'_> {
    fn name(&self) -> &str {
        self.name
    }

    fn element(&self) -> ElementId {
        self.element
    }

    fn metadata(&self) -> &AnnotationMetadata {
        self.metadata
    }
}

impl<S: AnnotationSource> AnnotationResolver<S> {
    /// Read one annotation occurrence.
    ///
    /// With an `origin`, the occurrence was written on that element: its
    /// members are validated and deprecation is reported. Stereotypes are
    /// read without one.
    pub(crate) fn read_mirror(
        &mut self,
        origin: Option<ElementId>,
        mirror: MirrorId,
    ) -> Result<ProcessedAnnotation, ResolveError> {
        let type_name = self.source.annotation_type_name(mirror)?;
        let name = self.interner.try_intern(&type_name)?;
        let annotation_type = self.source.annotation_type(mirror)?;
        let retention = match annotation_type {
            Some(ty) => self.source.retention_policy(ty)?,
            None => RetentionPolicy::default(),
        };

        if let Some(origin) = origin {
            self.report_deprecation(origin, &type_name);
        }

        let mut value = AnnotationValue::new(name).with_retention(retention);
        for (member_element, raw) in self.source.raw_values(mirror)? {
            let member_name = self.source.element_name(member_element)?;
            let member = self.interner.try_intern(&member_name)?;
            let read = self.read_value(name, member, &raw)?;
            if let Some(origin) = origin {
                self.validate_member(origin, &type_name, &member_name, member_element, &read)?;
            }
            value.members.insert(member, read);
        }

        Ok(ProcessedAnnotation {
            annotation_type,
            value,
        })
    }

    /// Convert a raw member value of `annotation.member`.
    pub(crate) fn read_value(
        &self,
        annotation: Name,
        member: Name,
        raw: &RawValue,
    ) -> Result<Value, ResolveError> {
        Ok(match raw {
            RawValue::Bool(b) => Value::Bool(*b),
            RawValue::Int(i) => Value::Int(*i),
            RawValue::Float(f) => Value::Float(*f),
            RawValue::Char(c) => Value::Char(*c),
            RawValue::Str(s) if s.contains(EVALUATED_EXPRESSION_PREFIX) => {
                Value::Expression(ExpressionRef {
                    annotation,
                    member,
                    expression: s.clone(),
                })
            }
            RawValue::Str(s) => Value::Str(s.clone()),
            RawValue::Class(class) => Value::Class(class.clone()),
            RawValue::Enum { ty, constant } => Value::Enum {
                ty: self.interner.try_intern(ty)?,
                constant: constant.clone(),
            },
            RawValue::Annotation(mirror) => Value::Annotation(Box::new(self.read_nested(*mirror)?)),
            RawValue::Array(items) => Value::Array(
                items
                    .iter()
                    .map(|item| self.read_value(annotation, member, item))
                    .collect::<Result<_, _>>()?,
            ),
        })
    }

    fn read_nested(&self, mirror: MirrorId) -> Result<NestedAnnotation, ResolveError> {
        let type_name = self.source.annotation_type_name(mirror)?;
        let mut nested = NestedAnnotation::new(self.interner.try_intern(&type_name)?);
        for (member_element, raw) in self.source.raw_values(mirror)? {
            let member = self
                .interner
                .try_intern(&self.source.element_name(member_element)?)?;
            let value = self.read_value(nested.name, member, &raw)?;
            nested.members.insert(member, value);
        }
        Ok(nested)
    }

    fn report_deprecation(&mut self, origin: ElementId, annotation: &str) {
        let Some(message) = self.config.deprecation(annotation).map(str::to_owned) else {
            return;
        };
        tracing::debug!(annotation, ?origin, "deprecated annotation used");
        self.diagnostics.add(
            Diagnostic::warning(ErrorCode::W1001)
                .with_message(format!("@{} is deprecated", simple_name(annotation)))
                .with_element(origin)
                .with_note(message),
        );
    }

    /// Validate one member value written on `origin`.
    ///
    /// The member element's own metadata is built through the regular cache
    /// entry point; values inside that build are not validated.
    fn validate_member(
        &mut self,
        origin: ElementId,
        annotation: &str,
        member_name: &str,
        member_element: ElementId,
        value: &Value,
    ) -> Result<(), ResolveError> {
        if self.validator.is_none()
            || self.validating
            || self.diagnostics.is_erroneous(origin)
            || value.contains_property_placeholder()
        {
            return Ok(());
        }

        self.validating = true;
        let member_metadata =
            self.lookup_or_build(CacheKey::Element(member_element), member_element);
        self.validating = false;
        let member_metadata = member_metadata?;
        if member_metadata.is_empty() {
            return Ok(());
        }

        let member = MemberElement {
            name: member_name,
            element: member_element,
            metadata: &member_metadata,
        };
        let failures = match &self.validator {
            Some(validator) => validator.validate(&member, value),
            None => return Ok(()),
        };
        if failures.is_empty() {
            return Ok(());
        }

        tracing::debug!(
            annotation,
            member = member_name,
            failures = failures.len(),
            "annotation member failed validation"
        );
        for failure in failures {
            self.diagnostics.add(
                Diagnostic::error(ErrorCode::E1001)
                    .with_message(format!(
                        "@{}.{member_name}: {failure}",
                        simple_name(annotation)
                    ))
                    .with_element(origin),
            );
        }
        self.diagnostics.mark_erroneous(origin);
        Ok(())
    }
}
