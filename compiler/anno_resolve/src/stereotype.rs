//! Stereotype attachment: resolving the annotations declared on an
//! annotation type.

use anno_ir::MirrorId;

use crate::pipeline::ProcessedAnnotation;
use crate::source::RawValue;
use crate::{
    AnnotationResolver, AnnotationSource, ConditionalStereotype, ProcessingContext, ResolveError,
};

impl<S: AnnotationSource> AnnotationResolver<S> {
    /// Resolve and attach the stereotypes of `annotation`, once.
    pub(crate) fn attach_stereotypes(
        &mut self,
        cx: &ProcessingContext,
        annotation: &mut ProcessedAnnotation,
    ) -> Result<(), ResolveError> {
        if annotation.value.stereotypes.is_some() {
            return Ok(());
        }
        let Some(annotation_type) = annotation.annotation_type else {
            annotation.value.stereotypes = Some(Vec::new());
            return Ok(());
        };

        let name = annotation.value.name;
        let annotation_name = self.interner.lookup(name);
        annotation.value.default_values = Some(self.default_values_for(name, annotation_type)?);

        let cx = cx.with_ancestor(name);
        let excluded_owner = self.config.excludes_stereotypes_of(annotation_name);
        let mut stereotypes = Vec::new();
        for mirror in self.source.annotations_of(annotation_type)? {
            let stereotype = self.source.annotation_type_name(mirror)?;
            if !self.keeps_stereotype(&cx, excluded_owner, &stereotype, mirror)? {
                tracing::trace!(annotation = annotation_name, stereotype = %stereotype, "stereotype skipped");
                continue;
            }
            let read = self.read_mirror(None, mirror)?;
            for resolved in self.process(&cx, read)? {
                stereotypes.push(self.arena.alloc(resolved.value, resolved.annotation_type));
            }
        }

        tracing::trace!(
            annotation = annotation_name,
            count = stereotypes.len(),
            "stereotypes attached"
        );
        annotation.value.stereotypes = Some(stereotypes);
        Ok(())
    }

    fn keeps_stereotype(
        &self,
        cx: &ProcessingContext,
        excluded_owner: bool,
        stereotype: &str,
        mirror: MirrorId,
    ) -> Result<bool, ResolveError> {
        if stereotype == self.config.inherited {
            return Ok(true);
        }
        if self.config.is_internal(stereotype) {
            return Ok(false);
        }
        if excluded_owner && self.config.is_excluded_stereotype(stereotype) {
            return Ok(false);
        }
        if let Some(rule) = self.config.conditional(stereotype) {
            if self.is_suppressed(rule, mirror)? {
                return Ok(false);
            }
        }
        // On the current path, including the annotation being expanded.
        Ok(!self
            .interner
            .get(stereotype)
            .is_some_and(|name| cx.is_ancestor(name)))
    }

    /// Whether the rule's member holds one of its suppressing constants.
    fn is_suppressed(
        &self,
        rule: &ConditionalStereotype,
        mirror: MirrorId,
    ) -> Result<bool, ResolveError> {
        for (member, raw) in self.source.raw_values(mirror)? {
            if self.source.element_name(member)? != rule.member {
                continue;
            }
            let constant = match &raw {
                RawValue::Enum { constant, .. } => constant.as_str(),
                RawValue::Str(s) => s.as_str(),
                _ => continue,
            };
            return Ok(rule.is_suppressed_by(constant));
        }
        Ok(false)
    }
}
