//! The annotation processing pipeline.
//!
//! One annotation occurrence goes in, zero or more resolved annotations
//! come out:
//!
//! ```text
//! Stereotypes ─> Mappers ─> Remappers ─> Transformers ─> Repeatable ─> Aliases
//!                  │            │              │              │
//!                  └ additive   └ first change replaces       └ container + instances
//! ```
//!
//! A rewrite output with a new name starts over at the first stage; one that
//! kept its name continues after the stage that produced it.

use anno_ir::{AnnotationValue, ElementId, Name};
use smallvec::SmallVec;

use crate::stack::ensure_sufficient_stack;
use crate::{
    AnnotationResolver, AnnotationSource, PluginContext, PluginId, ProcessingContext,
    ResolveError,
};

/// An annotation on its way through the pipeline.
#[derive(Clone, Debug, PartialEq)]
pub struct ProcessedAnnotation {
    /// Native annotation type, `None` when not on the classpath. Unresolved
    /// annotations are still recorded but get no stereotypes or defaults.
    pub annotation_type: Option<ElementId>,
    pub value: AnnotationValue,
}

pub(crate) type Processed = SmallVec<[ProcessedAnnotation; 1]>;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug)]
pub(crate) enum Stage {
    Stereotypes,
    Mappers,
    Remappers,
    Transformers,
    Repeatable,
    Aliases,
}

impl Stage {
    fn next(self) -> Stage {
        match self {
            Stage::Stereotypes => Stage::Mappers,
            Stage::Mappers => Stage::Remappers,
            Stage::Remappers => Stage::Transformers,
            Stage::Transformers => Stage::Repeatable,
            Stage::Repeatable | Stage::Aliases => Stage::Aliases,
        }
    }
}

impl<S: AnnotationSource> AnnotationResolver<S> {
    /// Run an annotation through every stage.
    pub(crate) fn process(
        &mut self,
        cx: &ProcessingContext,
        annotation: ProcessedAnnotation,
    ) -> Result<Processed, ResolveError> {
        self.run_from(cx, annotation, Stage::Stereotypes)
    }

    /// Run an annotation through `stage` and every later stage.
    ///
    /// Stereotypes are attached first whatever the stage; attachment is a
    /// no-op for annotations that already carry them.
    pub(crate) fn run_from(
        &mut self,
        cx: &ProcessingContext,
        mut annotation: ProcessedAnnotation,
        stage: Stage,
    ) -> Result<Processed, ResolveError> {
        ensure_sufficient_stack(|| {
            self.attach_stereotypes(cx, &mut annotation)?;

            let mapped = if stage <= Stage::Mappers {
                self.apply_mappers(cx, &annotation)?
            } else {
                Processed::new()
            };

            for rewrite in [Stage::Remappers, Stage::Transformers] {
                if stage <= rewrite {
                    if let Some(mut rewritten) = self.apply_rewrites(cx, &annotation, rewrite)? {
                        rewritten.extend(mapped);
                        return Ok(rewritten);
                    }
                }
            }

            if stage <= Stage::Repeatable {
                if let Some(mut flattened) = self.flatten_repeatable(cx, &annotation)? {
                    flattened.extend(mapped);
                    return Ok(flattened);
                }
            }

            self.propagate_aliases(cx, &mut annotation)?;
            let mut out = Processed::new();
            out.push(annotation);
            out.extend(mapped);
            Ok(out)
        })
    }

    /// Outputs of every mapper keyed on this annotation. The annotation
    /// itself continues unchanged.
    fn apply_mappers(
        &mut self,
        cx: &ProcessingContext,
        annotation: &ProcessedAnnotation,
    ) -> Result<Processed, ResolveError> {
        let name = self.interner.lookup(annotation.value.name);
        let mappers: SmallVec<[PluginId; 2]> = self
            .plugins
            .mappers_for(name)
            .iter()
            .copied()
            .filter(|id| !cx.has_applied(*id))
            .collect();

        let mut out = Processed::new();
        for id in mappers {
            let outputs =
                self.plugins
                    .apply(id, &annotation.value, &PluginContext::new(&self.interner));
            tracing::debug!(annotation = name, plugin = ?id, outputs = outputs.len(), "mapper applied");
            let cx = cx.with_plugin(id);
            for output in outputs {
                out.extend(self.reenter(&cx, annotation, output, Stage::Remappers)?);
            }
        }
        Ok(out)
    }

    /// Try the remappers or transformers of this annotation in order. The
    /// first one that changes anything replaces the annotation with its
    /// outputs; `None` when none did.
    fn apply_rewrites(
        &mut self,
        cx: &ProcessingContext,
        annotation: &ProcessedAnnotation,
        stage: Stage,
    ) -> Result<Option<Processed>, ResolveError> {
        let name = self.interner.lookup(annotation.value.name);
        let candidates: SmallVec<[PluginId; 4]> = match stage {
            Stage::Remappers => self.plugins.remappers_for(name),
            Stage::Transformers => self.plugins.transformers_for(name).iter().copied().collect(),
            _ => return Ok(None),
        };

        for id in candidates {
            if cx.has_applied(id) {
                continue;
            }
            let outputs =
                self.plugins
                    .apply(id, &annotation.value, &PluginContext::new(&self.interner));
            if let [only] = outputs.as_slice() {
                if *only == annotation.value {
                    continue;
                }
            }

            tracing::debug!(
                annotation = name,
                plugin = ?id,
                ?stage,
                outputs = outputs.len(),
                "annotation rewritten"
            );
            let cx = cx.with_plugin(id);
            let mut out = Processed::new();
            for output in outputs {
                out.extend(self.reenter(&cx, annotation, output, stage.next())?);
            }
            return Ok(Some(out));
        }
        Ok(None)
    }

    /// Feed a plugin output back into the pipeline.
    fn reenter(
        &mut self,
        cx: &ProcessingContext,
        input: &ProcessedAnnotation,
        output: AnnotationValue,
        next: Stage,
    ) -> Result<Processed, ResolveError> {
        if output.name == input.value.name {
            let annotation = ProcessedAnnotation {
                annotation_type: input.annotation_type,
                value: output,
            };
            return self.run_from(cx, annotation, next);
        }

        let annotation_type = self.type_of(output.name)?;
        self.process(
            cx,
            ProcessedAnnotation {
                annotation_type,
                value: output,
            },
        )
    }

    /// Native type of an annotation known only by name.
    pub(crate) fn type_of(&self, annotation: Name) -> Result<Option<ElementId>, ResolveError> {
        Ok(self
            .source
            .type_element(self.interner.lookup(annotation))?)
    }
}
