//! Per-element metadata cache and per-annotation default-value cache.

use std::sync::Arc;

use anno_ir::{AnnotationMetadata, ElementId, MemberMap, Name};
use rustc_hash::FxHashMap;

use crate::{AnnotationResolver, AnnotationSource, ResolveError};

/// Identity of a cached metadata entry.
///
/// Members and parameters are keyed together with their owners so hosts
/// whose member handles are only unique per owner can still cache them.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum CacheKey {
    Element(ElementId),
    /// Owner and member.
    Pair(ElementId, ElementId),
    /// Owner, method and parameter.
    Triple(ElementId, ElementId, ElementId),
}

#[derive(Clone, Debug, PartialEq)]
pub struct CachedAnnotationMetadata {
    pub key: CacheKey,
    pub metadata: AnnotationMetadata,
    /// Set once the entry was changed through the mutation API.
    pub mutated: bool,
}

/// Resolved metadata by element.
#[derive(Clone, Debug, Default)]
pub struct MetadataCache {
    entries: FxHashMap<CacheKey, CachedAnnotationMetadata>,
}

impl MetadataCache {
    pub fn get(&self, key: &CacheKey) -> Option<&CachedAnnotationMetadata> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, entry: CachedAnnotationMetadata) {
        self.entries.insert(entry.key, entry);
    }

    /// Drop mutated entries; returns how many were dropped.
    pub fn clear_mutated(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.mutated);
        before - self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Declared member defaults by annotation name, computed once per name.
#[derive(Clone, Debug, Default)]
pub struct DefaultValueCache {
    entries: FxHashMap<Name, Arc<MemberMap>>,
}

impl DefaultValueCache {
    pub fn get(&self, annotation: Name) -> Option<Arc<MemberMap>> {
        self.entries.get(&annotation).cloned()
    }

    /// Store computed defaults; an existing entry wins.
    pub fn insert(&mut self, annotation: Name, defaults: MemberMap) -> Arc<MemberMap> {
        Arc::clone(
            self.entries
                .entry(annotation)
                .or_insert_with(|| Arc::new(defaults)),
        )
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: AnnotationSource> AnnotationResolver<S> {
    /// Declared defaults of `annotation`, read from the source on first use.
    ///
    /// A member declared twice keeps its first default.
    pub(crate) fn default_values_for(
        &mut self,
        annotation: Name,
        annotation_type: ElementId,
    ) -> Result<Arc<MemberMap>, ResolveError> {
        if let Some(defaults) = self.defaults.get(annotation) {
            return Ok(defaults);
        }

        let annotation_name = self.interner.lookup(annotation);
        let mut defaults = MemberMap::default();
        for (member_element, raw) in self
            .source
            .default_member_values(annotation_name, annotation_type)?
        {
            let member_name = self.source.element_name(member_element)?;
            let member = self.interner.try_intern(&member_name)?;
            if defaults.contains_key(&member) {
                continue;
            }
            let value = self.read_value(annotation, member, &raw)?;
            defaults.insert(member, value);
        }

        tracing::trace!(
            annotation = annotation_name,
            count = defaults.len(),
            "default values cached"
        );
        Ok(self.defaults.insert(annotation, defaults))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anno_ir::{SharedInterner, Value};

    fn entry(key: CacheKey, mutated: bool) -> CachedAnnotationMetadata {
        CachedAnnotationMetadata {
            key,
            metadata: AnnotationMetadata::new(SharedInterner::new()),
            mutated,
        }
    }

    #[test]
    fn test_clear_mutated_keeps_clean_entries() {
        let clean = CacheKey::Element(ElementId::new(1));
        let dirty = CacheKey::Pair(ElementId::new(1), ElementId::new(2));
        let mut cache = MetadataCache::default();
        cache.insert(entry(clean, false));
        cache.insert(entry(dirty, true));

        assert_eq!(cache.clear_mutated(), 1);
        assert!(cache.get(&clean).is_some());
        assert!(cache.get(&dirty).is_none());

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_keys_distinguish_owners() {
        let member = ElementId::new(9);
        let mut cache = MetadataCache::default();
        cache.insert(entry(CacheKey::Pair(ElementId::new(1), member), false));

        assert!(cache
            .get(&CacheKey::Pair(ElementId::new(2), member))
            .is_none());
        assert!(cache.get(&CacheKey::Element(member)).is_none());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_default_values_first_insert_wins() {
        let name = Name::from_raw(5);
        let mut first = MemberMap::default();
        first.insert(Name::VALUE, Value::Int(1));
        let mut second = MemberMap::default();
        second.insert(Name::VALUE, Value::Int(2));

        let mut cache = DefaultValueCache::default();
        cache.insert(name, first);
        let stored = cache.insert(name, second);

        assert_eq!(stored.get(&Name::VALUE), Some(&Value::Int(1)));
        assert_eq!(cache.len(), 1);
        assert!(cache.get(Name::from_raw(6)).is_none());
    }
}
