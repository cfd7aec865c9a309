//! Annotation rewrite plugins.
//!
//! Three kinds, applied in this order by the pipeline:
//!
//! - **Mappers** add annotations next to the one they are keyed on.
//! - **Remappers** replace annotations of a package (or of every package,
//!   keyed on [`ALL_PACKAGES`]).
//! - **Transformers** replace annotations of one name.
//!
//! Every plugin is a function from one annotation to a list of annotations.
//! Plugins are registered once and addressed by [`PluginId`], which the
//! pipeline records to apply each plugin at most once per path.

use std::fmt;

use anno_ir::{AnnotationValue, Name, SharedInterner};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::config::package_of;

/// Package key of remappers that apply to every annotation.
pub const ALL_PACKAGES: &str = "*";

/// Handle to a registered plugin.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct PluginId(u32);

impl PluginId {
    pub const fn new(raw: u32) -> Self {
        PluginId(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Id of the plugin registered after `count` others.
    fn next(count: usize) -> Result<Self, RegistryFull> {
        u32::try_from(count)
            .map(PluginId)
            .map_err(|_| RegistryFull { count })
    }
}

/// The registry has handed out every `PluginId`.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("plugin registry is full: {count} plugins already registered")]
pub struct RegistryFull {
    pub count: usize,
}

impl fmt::Debug for PluginId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PluginId({})", self.0)
    }
}

/// What a plugin can see besides the annotation it rewrites.
pub struct PluginContext<'a> {
    interner: &'a SharedInterner,
}

impl<'a> PluginContext<'a> {
    pub fn new(interner: &'a SharedInterner) -> Self {
        PluginContext { interner }
    }

    /// Intern a name for a produced annotation or member.
    pub fn name(&self, s: &str) -> Name {
        self.interner.intern(s)
    }

    pub fn lookup(&self, name: Name) -> &'static str {
        self.interner.lookup(name)
    }

    pub fn interner(&self) -> &SharedInterner {
        self.interner
    }
}

/// Adds annotations whenever `annotation_name` is present.
pub trait AnnotationMapper {
    fn annotation_name(&self) -> &str;

    /// Annotations to add. The mapped annotation itself is always kept.
    fn map(&self, annotation: &AnnotationValue, cx: &PluginContext<'_>) -> Vec<AnnotationValue>;
}

/// Rewrites annotations of a package.
pub trait AnnotationRemapper {
    /// Package to remap, or [`ALL_PACKAGES`].
    fn package_name(&self) -> &str;

    /// Replacement annotations. Returning the input unchanged passes it on
    /// to the next remapper.
    fn remap(&self, annotation: &AnnotationValue, cx: &PluginContext<'_>) -> Vec<AnnotationValue>;
}

/// Rewrites annotations of one name.
pub trait AnnotationTransformer {
    fn annotation_name(&self) -> &str;

    /// Replacement annotations. Returning the input unchanged passes it on
    /// to the next transformer.
    fn transform(
        &self,
        annotation: &AnnotationValue,
        cx: &PluginContext<'_>,
    ) -> Vec<AnnotationValue>;
}

enum Plugin {
    Mapper(Box<dyn AnnotationMapper>),
    Remapper(Box<dyn AnnotationRemapper>),
    Transformer(Box<dyn AnnotationTransformer>),
}

type PluginIds = SmallVec<[PluginId; 2]>;

/// Registered plugins, indexed by the name or package they apply to.
#[derive(Default)]
pub struct PluginRegistry {
    plugins: Vec<Plugin>,
    mappers: FxHashMap<String, PluginIds>,
    remappers: FxHashMap<String, PluginIds>,
    transformers: FxHashMap<String, PluginIds>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, plugin: Plugin) -> Result<PluginId, RegistryFull> {
        let id = PluginId::next(self.plugins.len())?;
        self.plugins.push(plugin);
        Ok(id)
    }

    pub fn register_mapper(
        &mut self,
        mapper: Box<dyn AnnotationMapper>,
    ) -> Result<PluginId, RegistryFull> {
        let key = mapper.annotation_name().to_owned();
        let id = self.push(Plugin::Mapper(mapper))?;
        self.mappers.entry(key).or_default().push(id);
        Ok(id)
    }

    pub fn register_remapper(
        &mut self,
        remapper: Box<dyn AnnotationRemapper>,
    ) -> Result<PluginId, RegistryFull> {
        let key = remapper.package_name().to_owned();
        let id = self.push(Plugin::Remapper(remapper))?;
        self.remappers.entry(key).or_default().push(id);
        Ok(id)
    }

    pub fn register_transformer(
        &mut self,
        transformer: Box<dyn AnnotationTransformer>,
    ) -> Result<PluginId, RegistryFull> {
        let key = transformer.annotation_name().to_owned();
        let id = self.push(Plugin::Transformer(transformer))?;
        self.transformers.entry(key).or_default().push(id);
        Ok(id)
    }

    pub fn mappers_for(&self, annotation: &str) -> &[PluginId] {
        self.mappers
            .get(annotation)
            .map(|ids| ids.as_slice())
            .unwrap_or_default()
    }

    /// Remappers of the annotation's package, then wildcard remappers, each
    /// group in registration order.
    pub fn remappers_for(&self, annotation: &str) -> SmallVec<[PluginId; 4]> {
        let mut ids = SmallVec::new();
        let package = package_of(annotation);
        if let Some(own) = self.remappers.get(package) {
            ids.extend(own.iter().copied());
        }
        if package != ALL_PACKAGES {
            if let Some(all) = self.remappers.get(ALL_PACKAGES) {
                ids.extend(all.iter().copied());
            }
        }
        ids
    }

    pub fn transformers_for(&self, annotation: &str) -> &[PluginId] {
        self.transformers
            .get(annotation)
            .map(|ids| ids.as_slice())
            .unwrap_or_default()
    }

    /// Run one plugin.
    ///
    /// # Panics
    /// Panics if `id` was not returned by this registry.
    pub fn apply(
        &self,
        id: PluginId,
        annotation: &AnnotationValue,
        cx: &PluginContext<'_>,
    ) -> Vec<AnnotationValue> {
        match &self.plugins[id.raw() as usize] {
            Plugin::Mapper(mapper) => mapper.map(annotation, cx),
            Plugin::Remapper(remapper) => remapper.remap(annotation, cx),
            Plugin::Transformer(transformer) => transformer.transform(annotation, cx),
        }
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

impl fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("plugins", &self.plugins.len())
            .field("mappers", &self.mappers)
            .field("remappers", &self.remappers)
            .field("transformers", &self.transformers)
            .finish()
    }
}
