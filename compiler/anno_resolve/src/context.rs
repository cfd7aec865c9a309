use anno_ir::{ElementId, Name};

use crate::PluginId;

/// State threaded through one recursive processing path.
///
/// Both sets are persistent; each recursive step extends its own copy
/// without affecting siblings.
#[derive(Clone, Debug, Default)]
pub struct ProcessingContext {
    origin: Option<ElementId>,
    /// Annotation names on the current stereotype path.
    ancestors: im::HashSet<Name>,
    /// Plugins already applied on the current path.
    applied: im::HashSet<PluginId>,
}

impl ProcessingContext {
    pub fn new(origin: Option<ElementId>) -> Self {
        ProcessingContext {
            origin,
            ..Self::default()
        }
    }

    /// Element the annotations on this path were written on.
    pub fn origin(&self) -> Option<ElementId> {
        self.origin
    }

    pub fn is_ancestor(&self, name: Name) -> bool {
        self.ancestors.contains(&name)
    }

    #[must_use]
    pub fn with_ancestor(&self, name: Name) -> Self {
        ProcessingContext {
            origin: self.origin,
            ancestors: self.ancestors.update(name),
            applied: self.applied.clone(),
        }
    }

    pub fn has_applied(&self, plugin: PluginId) -> bool {
        self.applied.contains(&plugin)
    }

    #[must_use]
    pub fn with_plugin(&self, plugin: PluginId) -> Self {
        ProcessingContext {
            origin: self.origin,
            ancestors: self.ancestors.clone(),
            applied: self.applied.update(plugin),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_does_not_leak_to_parent() {
        let root = ProcessingContext::new(Some(ElementId::new(1)));
        let a = Name::from_raw(10);
        let b = Name::from_raw(11);

        let left = root.with_ancestor(a);
        let right = root.with_ancestor(b);

        assert!(!root.is_ancestor(a));
        assert!(left.is_ancestor(a));
        assert!(!left.is_ancestor(b));
        assert!(right.is_ancestor(b));
        assert_eq!(left.origin(), Some(ElementId::new(1)));
    }

    #[test]
    fn test_plugins_per_path() {
        let root = ProcessingContext::default();
        let plugin = PluginId::new(0);
        let applied = root.with_plugin(plugin).with_ancestor(Name::from_raw(4));

        assert!(applied.has_applied(plugin));
        assert!(applied.is_ancestor(Name::from_raw(4)));
        assert!(!root.has_applied(plugin));
        assert_eq!(root.origin(), None);
    }
}
