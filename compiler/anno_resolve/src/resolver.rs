use anno_diagnostic::{Diagnostic, DiagnosticQueue};
use anno_ir::{AnnotationArena, AnnotationMetadata, ElementId, Name, SharedInterner};

use crate::{
    AnnotatedElementValidator, AnnotationMapper, AnnotationRemapper, AnnotationSource,
    AnnotationTransformer, CacheKey, CachedAnnotationMetadata, DefaultValueCache, MetadataCache,
    PluginId, PluginRegistry, ResolveError, ResolverConfig,
};

/// Interned names the resolver compares against on every annotation.
#[derive(Copy, Clone, Debug)]
pub(crate) struct WellKnownNames {
    pub(crate) inherited: Name,
}

impl WellKnownNames {
    fn new(interner: &SharedInterner, config: &ResolverConfig) -> Self {
        WellKnownNames {
            inherited: interner.intern(&config.inherited),
        }
    }
}

/// Resolves and caches annotation metadata of program elements.
///
/// One resolver serves one compilation unit. It owns the source adapter,
/// both caches and the stereotype arena; nothing is reset until
/// [`clear_mutated`](Self::clear_mutated) or
/// [`clear_caches`](Self::clear_caches) is called.
pub struct AnnotationResolver<S> {
    pub(crate) source: S,
    pub(crate) interner: SharedInterner,
    pub(crate) config: ResolverConfig,
    pub(crate) plugins: PluginRegistry,
    pub(crate) validator: Option<Box<dyn AnnotatedElementValidator>>,
    pub(crate) defaults: DefaultValueCache,
    pub(crate) metadata: MetadataCache,
    pub(crate) arena: AnnotationArena,
    pub(crate) diagnostics: DiagnosticQueue,
    /// Re-entrancy guard for member validation.
    pub(crate) validating: bool,
    pub(crate) names: WellKnownNames,
}

impl<S: AnnotationSource> AnnotationResolver<S> {
    pub fn new(source: S, interner: SharedInterner, config: ResolverConfig) -> Self {
        let names = WellKnownNames::new(&interner, &config);
        let diagnostics = DiagnosticQueue::with_config(config.diagnostics.clone());
        AnnotationResolver {
            source,
            interner,
            config,
            plugins: PluginRegistry::new(),
            validator: None,
            defaults: DefaultValueCache::default(),
            metadata: MetadataCache::default(),
            arena: AnnotationArena::new(),
            diagnostics,
            validating: false,
            names,
        }
    }

    /// Install the member value validator.
    #[must_use]
    pub fn with_validator(mut self, validator: impl AnnotatedElementValidator + 'static) -> Self {
        self.validator = Some(Box::new(validator));
        self
    }

    /// Register a mapper.
    ///
    /// # Panics
    /// Panics once `u32::MAX` plugins are registered. Use
    /// [`PluginRegistry::register_mapper`] through
    /// [`plugins_mut`](Self::plugins_mut) for fallible registration.
    pub fn register_mapper(&mut self, mapper: impl AnnotationMapper + 'static) -> PluginId {
        self.plugins
            .register_mapper(Box::new(mapper))
            .unwrap_or_else(|e| panic!("{e}"))
    }

    /// Register a remapper.
    ///
    /// # Panics
    /// Panics once `u32::MAX` plugins are registered.
    pub fn register_remapper(&mut self, remapper: impl AnnotationRemapper + 'static) -> PluginId {
        self.plugins
            .register_remapper(Box::new(remapper))
            .unwrap_or_else(|e| panic!("{e}"))
    }

    /// Register a transformer.
    ///
    /// # Panics
    /// Panics once `u32::MAX` plugins are registered.
    pub fn register_transformer(
        &mut self,
        transformer: impl AnnotationTransformer + 'static,
    ) -> PluginId {
        self.plugins
            .register_transformer(Box::new(transformer))
            .unwrap_or_else(|e| panic!("{e}"))
    }

    /// Metadata of `element`, built on first request and cached under `key`.
    pub fn lookup_or_build(
        &mut self,
        key: CacheKey,
        element: ElementId,
    ) -> Result<AnnotationMetadata, ResolveError> {
        if let Some(cached) = self.metadata.get(&key) {
            tracing::trace!(?key, "metadata cache hit");
            return Ok(cached.metadata.clone());
        }

        tracing::debug!(?key, ?element, "building annotation metadata");
        let metadata = self.build_metadata(element)?;
        self.metadata.insert(CachedAnnotationMetadata {
            key,
            metadata: metadata.clone(),
            mutated: false,
        });
        Ok(metadata)
    }

    /// Metadata of a standalone element (a class, package or field).
    pub fn metadata_for(&mut self, element: ElementId) -> Result<AnnotationMetadata, ResolveError> {
        self.lookup_or_build(CacheKey::Element(element), element)
    }

    pub fn cached(&self, key: &CacheKey) -> Option<&CachedAnnotationMetadata> {
        self.metadata.get(key)
    }

    /// Drop entries changed through the mutation API; they are rebuilt from
    /// the source on next lookup.
    pub fn clear_mutated(&mut self) {
        let dropped = self.metadata.clear_mutated();
        tracing::debug!(dropped, "mutated metadata cleared");
    }

    /// Empty the metadata cache, the default-value cache and the arena.
    pub fn clear_caches(&mut self) {
        self.metadata.clear();
        self.defaults.clear();
        self.arena.clear();
        tracing::debug!("annotation caches cleared");
    }

    pub fn diagnostics(&self) -> &DiagnosticQueue {
        &self.diagnostics
    }

    /// Take every diagnostic reported so far.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        self.diagnostics.flush()
    }

    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn plugins(&self) -> &PluginRegistry {
        &self.plugins
    }

    pub fn plugins_mut(&mut self) -> &mut PluginRegistry {
        &mut self.plugins
    }

    /// Stereotype nodes resolved so far.
    pub fn arena(&self) -> &AnnotationArena {
        &self.arena
    }

    pub fn default_values(&self) -> &DefaultValueCache {
        &self.defaults
    }
}
