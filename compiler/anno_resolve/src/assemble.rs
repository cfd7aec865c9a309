//! Metadata assembly: walking an element's hierarchy and placing resolved
//! annotations into the four metadata layers.
//!
//! Placement picks one of eight paths:
//!
//! ```text
//!                   plain              repeatable
//! annotation        add_annotation     add_repeatable              (x declared / inherited)
//! stereotype        add_stereotype     add_repeatable_stereotype   (x declared / inherited)
//! ```

use std::sync::Arc;

use anno_ir::{AnnoId, AnnotationMetadata, AnnotationValue, ElementId, Name, NestedAnnotation};

use crate::context::ProcessingContext;
use crate::pipeline::ProcessedAnnotation;
use crate::stack::ensure_sufficient_stack;
use crate::{AnnotationResolver, AnnotationSource, ResolveError};

impl<S: AnnotationSource> AnnotationResolver<S> {
    /// Build the metadata of `element` from the source.
    ///
    /// Host failures of a swallowed kind yield empty metadata.
    pub(crate) fn build_metadata(
        &mut self,
        element: ElementId,
    ) -> Result<AnnotationMetadata, ResolveError> {
        match self.assemble(element) {
            Ok(metadata) => Ok(metadata),
            Err(ResolveError::Source(error)) if self.config.swallows(&error) => {
                tracing::warn!(
                    ?element,
                    kind = %error.kind,
                    message = %error.message,
                    "host failure while reading annotations; element treated as unannotated"
                );
                Ok(AnnotationMetadata::new(self.interner.clone()))
            }
            Err(error) => Err(error),
        }
    }

    fn assemble(&mut self, element: ElementId) -> Result<AnnotationMetadata, ResolveError> {
        let mut metadata = AnnotationMetadata::new(self.interner.clone());
        let hierarchy = self.source.hierarchy(
            element,
            self.config.inherit_type_annotations,
            self.config.declared_only,
        )?;

        // Most general first, so the most specific declaration wins.
        for &current in hierarchy.iter().rev() {
            let declared = current == element;
            let cx = ProcessingContext::new(Some(current));
            for mirror in self.source.annotations_of(current)? {
                let read = self.read_mirror(Some(current), mirror)?;
                for resolved in self.process(&cx, read)? {
                    self.place(&mut metadata, &resolved, declared, false)?;
                }
            }
        }
        Ok(metadata)
    }

    /// Place a resolved annotation and its stereotype tree.
    ///
    /// Annotations not declared on the element are only placed when forced
    /// or when their type carries the inherited marker.
    pub(crate) fn place(
        &mut self,
        metadata: &mut AnnotationMetadata,
        resolved: &ProcessedAnnotation,
        declared: bool,
        force: bool,
    ) -> Result<(), ResolveError> {
        let value = &resolved.value;
        if !(declared || force || self.is_inherited(value)) {
            tracing::trace!(
                annotation = self.interner.lookup(value.name),
                "not inherited, skipped"
            );
            return Ok(());
        }

        match self.container_of(resolved.annotation_type)? {
            Some(container) => metadata.add_repeatable(
                container,
                NestedAnnotation {
                    name: value.name,
                    members: value.members.clone(),
                },
                declared,
            ),
            None => metadata.add_annotation(value.name, &value.members, declared),
        }
        if let Some(defaults) = &value.default_values {
            metadata.add_default_values(value.name, Arc::clone(defaults));
        }

        self.place_stereotypes(metadata, &[value.name], value.stereotype_ids(), declared)
    }

    /// Place stereotype nodes reached through `parents` (outermost first).
    fn place_stereotypes(
        &mut self,
        metadata: &mut AnnotationMetadata,
        parents: &[Name],
        stereotypes: &[AnnoId],
        declared: bool,
    ) -> Result<(), ResolveError> {
        ensure_sufficient_stack(|| {
            for &id in stereotypes {
                let node = self.arena.get(id).clone();
                match self.container_of(self.arena.annotation_type(id))? {
                    Some(container) => metadata.add_repeatable_stereotype(
                        parents,
                        container,
                        NestedAnnotation {
                            name: node.name,
                            members: node.members.clone(),
                        },
                        declared,
                    ),
                    None => metadata.add_stereotype(parents, node.name, &node.members, declared),
                }
                if let Some(defaults) = &node.default_values {
                    metadata.add_default_values(node.name, Arc::clone(defaults));
                }

                let mut chain = Vec::with_capacity(parents.len() + 1);
                chain.extend_from_slice(parents);
                chain.push(node.name);
                self.place_stereotypes(metadata, &chain, node.stereotype_ids(), declared)?;
            }
            Ok(())
        })
    }

    /// Whether the annotation's type is marked inherited.
    fn is_inherited(&self, value: &AnnotationValue) -> bool {
        value
            .stereotype_ids()
            .iter()
            .any(|id| self.arena.get(*id).name == self.names.inherited)
    }

    /// Interned container name when `annotation_type` is repeatable.
    fn container_of(
        &self,
        annotation_type: Option<ElementId>,
    ) -> Result<Option<Name>, ResolveError> {
        let Some(annotation_type) = annotation_type else {
            return Ok(None);
        };
        match self.source.repeatable_container_name(annotation_type)? {
            Some(container) => Ok(Some(self.interner.try_intern(&container)?)),
            None => Ok(None),
        }
    }
}
