//! Repeatable container flattening.
//!
//! `@Tags({@Tag("a"), @Tag("b")})` becomes the container `@Tags` without
//! its `value` plus one `@Tag` per instance, so instances are placed (and
//! queried) like annotations written one by one.

use anno_ir::{AnnotationValue, ElementId, Name, NestedAnnotation, Value};

use crate::pipeline::{Processed, ProcessedAnnotation, Stage};
use crate::{AnnotationResolver, AnnotationSource, ProcessingContext, ResolveError};

impl<S: AnnotationSource> AnnotationResolver<S> {
    /// Split a repeatable container into its instances; `None` when
    /// `annotation` is not one.
    pub(crate) fn flatten_repeatable(
        &mut self,
        cx: &ProcessingContext,
        annotation: &ProcessedAnnotation,
    ) -> Result<Option<Processed>, ResolveError> {
        let Some(instances) = self.repeatable_instances(annotation)? else {
            return Ok(None);
        };

        tracing::trace!(
            container = self.interner.lookup(annotation.value.name),
            count = instances.len(),
            "repeatable container flattened"
        );

        let mut container = annotation.clone();
        container.value.members.shift_remove(&Name::VALUE);
        let mut out = self.run_from(cx, container, Stage::Aliases)?;

        for (annotation_type, instance) in instances {
            let retention = self.source.retention_policy(annotation_type)?;
            let value = AnnotationValue::with_members(instance.name, instance.members)
                .with_retention(retention);
            out.extend(self.process(
                cx,
                ProcessedAnnotation {
                    annotation_type: Some(annotation_type),
                    value,
                },
            )?);
        }
        Ok(Some(out))
    }

    /// The nested annotations of `value` with their types, when every one of
    /// them is of a repeatable type.
    fn repeatable_instances(
        &self,
        annotation: &ProcessedAnnotation,
    ) -> Result<Option<Vec<(ElementId, NestedAnnotation)>>, ResolveError> {
        let Some(Value::Array(items)) = annotation.value.members.get(&Name::VALUE) else {
            return Ok(None);
        };
        if items.is_empty() {
            return Ok(None);
        }

        let mut instances = Vec::with_capacity(items.len());
        for item in items {
            let Some(nested) = item.as_annotation() else {
                return Ok(None);
            };
            let Some(annotation_type) = self.type_of(nested.name)? else {
                return Ok(None);
            };
            if self
                .source
                .repeatable_container_name(annotation_type)?
                .is_none()
            {
                return Ok(None);
            }
            instances.push((annotation_type, nested.clone()));
        }
        Ok(Some(instances))
    }
}
