//! Edits to cached metadata.
//!
//! Each operation starts from the cached (or freshly built) metadata of the
//! element, applies the edit to a copy, and writes the copy back marked as
//! mutated.

use anno_ir::{AnnotationMetadata, AnnotationValue, AnnotationView, ElementId};

use crate::pipeline::ProcessedAnnotation;
use crate::{
    AnnotationResolver, AnnotationSource, CacheKey, CachedAnnotationMetadata, ProcessingContext,
    ResolveError,
};

impl<S: AnnotationSource> AnnotationResolver<S> {
    /// Add `annotation` to the element as if it were declared on it.
    ///
    /// The annotation runs through the full pipeline, so its stereotypes,
    /// aliases and plugin rewrites are applied as well.
    pub fn annotate(
        &mut self,
        key: CacheKey,
        element: ElementId,
        annotation: AnnotationValue,
    ) -> Result<AnnotationMetadata, ResolveError> {
        let mut metadata = self.lookup_or_build(key, element)?;
        let annotation_type = self.type_of(annotation.name)?;

        tracing::debug!(
            ?key,
            annotation = self.interner.lookup(annotation.name),
            "annotating element"
        );

        let resolved = self.process(
            &ProcessingContext::new(Some(element)),
            ProcessedAnnotation {
                annotation_type,
                value: annotation,
            },
        )?;
        for resolved in resolved {
            self.place(&mut metadata, &resolved, true, true)?;
        }
        Ok(self.store_mutated(key, metadata))
    }

    /// Remove an annotation and the stereotypes only it contributed.
    pub fn remove_annotation(
        &mut self,
        key: CacheKey,
        element: ElementId,
        annotation: &str,
    ) -> Result<AnnotationMetadata, ResolveError> {
        self.mutate(key, element, |metadata| metadata.remove_annotation(annotation))
    }

    /// Remove a stereotype and its index entry.
    pub fn remove_stereotype(
        &mut self,
        key: CacheKey,
        element: ElementId,
        stereotype: &str,
    ) -> Result<AnnotationMetadata, ResolveError> {
        self.mutate(key, element, |metadata| metadata.remove_stereotype(stereotype))
    }

    /// Remove every annotation matching `predicate`.
    pub fn remove_annotation_if(
        &mut self,
        key: CacheKey,
        element: ElementId,
        predicate: impl FnMut(AnnotationView<'_>) -> bool,
    ) -> Result<AnnotationMetadata, ResolveError> {
        self.mutate(key, element, |metadata| {
            metadata.remove_annotation_if(predicate)
        })
    }

    fn mutate(
        &mut self,
        key: CacheKey,
        element: ElementId,
        edit: impl FnOnce(&mut AnnotationMetadata) -> bool,
    ) -> Result<AnnotationMetadata, ResolveError> {
        let mut metadata = self.lookup_or_build(key, element)?;
        let removed = edit(&mut metadata);
        tracing::debug!(?key, removed, "metadata edited");
        Ok(self.store_mutated(key, metadata))
    }

    fn store_mutated(&mut self, key: CacheKey, metadata: AnnotationMetadata) -> AnnotationMetadata {
        self.metadata.insert(CachedAnnotationMetadata {
            key,
            metadata: metadata.clone(),
            mutated: true,
        });
        metadata
    }
}
