//! Alias propagation.
//!
//! A member marked `@AliasFor(member = "value")` copies its value to
//! `value` of the same annotation. With `annotation = Other.class` (or
//! `annotationName = "..."`) it instead synthesizes `@Other(value = ...)`
//! and attaches it as a stereotype of the aliasing annotation.

use anno_ir::{AnnotationValue, ElementId, MirrorId, Name, RetentionPolicy, Value};
use smallvec::SmallVec;

use crate::pipeline::ProcessedAnnotation;
use crate::source::RawValue;
use crate::{AnnotationResolver, AnnotationSource, ProcessingContext, ResolveError};

const MEMBER: &str = "member";
const ANNOTATION: &str = "annotation";
const ANNOTATION_NAME: &str = "annotationName";
const VALUE: &str = "value";

/// One `@AliasFor` on a member.
#[derive(Clone, Debug, PartialEq, Eq)]
struct AliasTarget {
    /// Target annotation; `None` for the aliasing annotation itself.
    annotation: Option<String>,
    member: String,
}

impl<S: AnnotationSource> AnnotationResolver<S> {
    /// Propagate every aliased member value of `annotation`.
    pub(crate) fn propagate_aliases(
        &mut self,
        cx: &ProcessingContext,
        annotation: &mut ProcessedAnnotation,
    ) -> Result<(), ResolveError> {
        let Some(annotation_type) = annotation.annotation_type else {
            return Ok(());
        };
        let own_name = self.interner.lookup(annotation.value.name);
        let members: Vec<(Name, Value)> = annotation
            .value
            .members
            .iter()
            .map(|(member, value)| (*member, value.clone()))
            .collect();

        for (member, value) in members {
            let Some(member_element) = self
                .source
                .annotation_member(annotation_type, self.interner.lookup(member))?
            else {
                continue;
            };

            for target in self.aliases_of(member_element)? {
                match target.annotation.as_deref() {
                    Some(other) if other != own_name => {
                        self.alias_to_annotation(cx, annotation, other, &target.member, &value)?;
                    }
                    _ => {
                        let aliased = self.interner.try_intern(&target.member)?;
                        // An explicit value wins over the alias.
                        annotation
                            .value
                            .members
                            .entry(aliased)
                            .or_insert_with(|| value.clone());
                    }
                }
            }
        }
        Ok(())
    }

    /// Synthesize `@other(member = value)` and attach its resolved form as
    /// a stereotype of `annotation`.
    fn alias_to_annotation(
        &mut self,
        cx: &ProcessingContext,
        annotation: &mut ProcessedAnnotation,
        other: &str,
        member: &str,
        value: &Value,
    ) -> Result<(), ResolveError> {
        let other_name = self.interner.try_intern(other)?;
        if cx.is_ancestor(other_name) {
            return Ok(());
        }
        let annotation_type = self.source.type_element(other)?;
        let retention = match annotation_type {
            Some(ty) => self.source.retention_policy(ty)?,
            None => RetentionPolicy::default(),
        };
        let synthesized = AnnotationValue::new(other_name)
            .with_member(self.interner.try_intern(member)?, value.clone())
            .with_retention(retention);

        tracing::trace!(
            annotation = self.interner.lookup(annotation.value.name),
            target = other,
            member,
            "alias synthesized"
        );
        let cx = cx.with_ancestor(annotation.value.name);
        let resolved = self.process(
            &cx,
            ProcessedAnnotation {
                annotation_type,
                value: synthesized,
            },
        )?;
        let stereotypes = annotation.value.stereotypes.get_or_insert_with(Vec::new);
        for resolved in resolved {
            stereotypes.push(self.arena.alloc(resolved.value, resolved.annotation_type));
        }
        Ok(())
    }

    /// Alias targets declared on an annotation member, singular or wrapped.
    fn aliases_of(
        &self,
        member_element: ElementId,
    ) -> Result<SmallVec<[AliasTarget; 1]>, ResolveError> {
        let mut targets = SmallVec::new();
        for mirror in self.source.annotations_of(member_element)? {
            let name = self.source.annotation_type_name(mirror)?;
            if name == self.config.alias_for {
                targets.push(self.read_alias(mirror)?);
            } else if name == self.config.aliases {
                for (member, raw) in self.source.raw_values(mirror)? {
                    if self.source.element_name(member)? != VALUE {
                        continue;
                    }
                    let nested = match raw {
                        RawValue::Array(items) => items,
                        single => vec![single],
                    };
                    for item in nested {
                        if let RawValue::Annotation(alias) = item {
                            targets.push(self.read_alias(alias)?);
                        }
                    }
                }
            }
        }
        Ok(targets)
    }

    fn read_alias(&self, mirror: MirrorId) -> Result<AliasTarget, ResolveError> {
        let mut target = AliasTarget {
            annotation: None,
            member: VALUE.to_owned(),
        };
        let mut annotation_name = None;
        for (member, raw) in self.source.raw_values(mirror)? {
            match (self.source.element_name(member)?.as_str(), raw) {
                (MEMBER, RawValue::Str(s)) if !s.is_empty() => target.member = s,
                (ANNOTATION, RawValue::Class(class))
                    if class != self.config.alias_annotation_sentinel =>
                {
                    target.annotation = Some(class);
                }
                (ANNOTATION_NAME, RawValue::Str(s)) if !s.is_empty() => annotation_name = Some(s),
                _ => {}
            }
        }
        if annotation_name.is_some() {
            target.annotation = annotation_name;
        }
        Ok(target)
    }
}
