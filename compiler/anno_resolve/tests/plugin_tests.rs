#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]
//! Mapper, remapper and transformer plugins inside the pipeline.

use anno_ir::{AnnotationValue, Name, SharedInterner, Value};
use anno_resolve::testing::MockSource;
use anno_resolve::{
    AnnotationMapper, AnnotationRemapper, AnnotationResolver, AnnotationTransformer, PluginContext,
    RawValue, ResolverConfig, ALL_PACKAGES,
};
use pretty_assertions::assert_eq;

fn resolver(source: MockSource) -> AnnotationResolver<MockSource> {
    AnnotationResolver::new(source, SharedInterner::new(), ResolverConfig::default())
}

/// Adds `@target` carrying the mapped annotation's `value`.
struct CopyValue {
    from: &'static str,
    to: &'static str,
}

impl AnnotationMapper for CopyValue {
    fn annotation_name(&self) -> &str {
        self.from
    }

    fn map(&self, annotation: &AnnotationValue, cx: &PluginContext<'_>) -> Vec<AnnotationValue> {
        let mut mapped = AnnotationValue::new(cx.name(self.to));
        if let Some(value) = annotation.member(Name::VALUE) {
            mapped = mapped.with_member(Name::VALUE, value.clone());
        }
        vec![mapped]
    }
}

/// Moves annotations of one package into another.
struct MovePackage {
    from: &'static str,
    to: &'static str,
}

impl AnnotationRemapper for MovePackage {
    fn package_name(&self) -> &str {
        self.from
    }

    fn remap(&self, annotation: &AnnotationValue, cx: &PluginContext<'_>) -> Vec<AnnotationValue> {
        let name = cx.lookup(annotation.name);
        let Some(simple) = name.strip_prefix(self.from).and_then(|s| s.strip_prefix('.')) else {
            return vec![annotation.clone()];
        };
        let renamed = cx.name(&format!("{}.{simple}", self.to));
        vec![AnnotationValue::with_members(renamed, annotation.members.clone())]
    }
}

/// Leaves every annotation of a package unchanged.
struct Identity(&'static str);

impl AnnotationRemapper for Identity {
    fn package_name(&self) -> &str {
        self.0
    }

    fn remap(&self, annotation: &AnnotationValue, _: &PluginContext<'_>) -> Vec<AnnotationValue> {
        vec![annotation.clone()]
    }
}

/// Increments `count`.
struct Increment(&'static str);

impl AnnotationTransformer for Increment {
    fn annotation_name(&self) -> &str {
        self.0
    }

    fn transform(
        &self,
        annotation: &AnnotationValue,
        cx: &PluginContext<'_>,
    ) -> Vec<AnnotationValue> {
        let count = cx.name("count");
        let current = annotation
            .member(count)
            .and_then(Value::as_int)
            .unwrap_or(0);
        vec![annotation.clone().with_member(count, current + 1)]
    }
}

/// Renames one annotation to another.
struct Rename {
    from: &'static str,
    to: &'static str,
}

impl AnnotationTransformer for Rename {
    fn annotation_name(&self) -> &str {
        self.from
    }

    fn transform(
        &self,
        annotation: &AnnotationValue,
        cx: &PluginContext<'_>,
    ) -> Vec<AnnotationValue> {
        vec![AnnotationValue::with_members(
            cx.name(self.to),
            annotation.members.clone(),
        )]
    }
}

/// Drops the annotation entirely.
struct Discard(&'static str);

impl AnnotationTransformer for Discard {
    fn annotation_name(&self) -> &str {
        self.0
    }

    fn transform(&self, _: &AnnotationValue, _: &PluginContext<'_>) -> Vec<AnnotationValue> {
        Vec::new()
    }
}

#[test]
fn test_mapper_adds_annotation() {
    let mut source = MockSource::new();
    let class = source.class("app.Controller");
    source.annotate(class, "web.Get", &[("value", RawValue::from("/x"))]);

    let mut resolver = resolver(source);
    resolver.register_mapper(CopyValue {
        from: "web.Get",
        to: "web.Route",
    });
    let metadata = resolver.metadata_for(class).unwrap();

    assert!(metadata.has_declared_annotation("web.Get"));
    assert!(metadata.has_declared_annotation("web.Route"));
    assert_eq!(metadata.string_value("web.Route", "value"), Some("/x"));
}

#[test]
fn test_mapped_annotation_gets_stereotypes() {
    let mut source = MockSource::new();
    let route = source.declare_annotation("web.Route");
    source.annotate(route, "web.Endpoint", &[]);
    let class = source.class("app.Controller");
    source.annotate(class, "web.Get", &[]);

    let mut resolver = resolver(source);
    resolver.register_mapper(CopyValue {
        from: "web.Get",
        to: "web.Route",
    });
    let metadata = resolver.metadata_for(class).unwrap();

    assert!(metadata.has_stereotype("web.Endpoint"));
    assert_eq!(
        metadata.annotation_names_by_stereotype("web.Endpoint"),
        vec!["web.Route"]
    );
}

#[test]
fn test_remapper_replaces_annotation() {
    let mut source = MockSource::new();
    let class = source.class("app.Service");
    source.annotate(class, "legacy.Inject", &[("value", RawValue::from("db"))]);

    let mut resolver = resolver(source);
    resolver.register_remapper(MovePackage {
        from: "legacy",
        to: "app",
    });
    let metadata = resolver.metadata_for(class).unwrap();

    assert!(!metadata.has_annotation("legacy.Inject"));
    assert!(metadata.has_annotation("app.Inject"));
    assert_eq!(metadata.string_value("app.Inject", "value"), Some("db"));
}

#[test]
fn test_unchanged_remapper_output_passes_through() {
    let mut source = MockSource::new();
    let class = source.class("app.Service");
    source.annotate(class, "legacy.Inject", &[]);

    let mut resolver = resolver(source);
    resolver.register_remapper(Identity("legacy"));
    resolver.register_remapper(MovePackage {
        from: "legacy",
        to: "app",
    });
    let metadata = resolver.metadata_for(class).unwrap();

    assert!(metadata.has_annotation("app.Inject"));
    assert!(!metadata.has_annotation("legacy.Inject"));
}

#[test]
fn test_transformer_applies_once_per_path() {
    let mut source = MockSource::new();
    let class = source.class("app.Service");
    source.annotate(class, "app.Counter", &[]);

    let mut resolver = resolver(source);
    resolver.register_transformer(Increment("app.Counter"));
    let metadata = resolver.metadata_for(class).unwrap();

    assert_eq!(metadata.int_value("app.Counter", "count"), Some(1));
}

#[test]
fn test_transformer_cycle_terminates() {
    let mut source = MockSource::new();
    let class = source.class("app.Service");
    source.annotate(class, "app.A", &[]);

    let mut resolver = resolver(source);
    resolver.register_transformer(Rename {
        from: "app.A",
        to: "app.B",
    });
    resolver.register_transformer(Rename {
        from: "app.B",
        to: "app.A",
    });
    let metadata = resolver.metadata_for(class).unwrap();

    assert_eq!(metadata.annotation_names(), vec!["app.A"]);
}

#[test]
fn test_transformer_can_drop_annotation() {
    let mut source = MockSource::new();
    let class = source.class("app.Service");
    source.annotate(class, "app.Internal", &[]);
    source.annotate(class, "app.Kept", &[]);

    let mut resolver = resolver(source);
    resolver.register_transformer(Discard("app.Internal"));
    let metadata = resolver.metadata_for(class).unwrap();

    assert_eq!(metadata.annotation_names(), vec!["app.Kept"]);
}

#[test]
fn test_plugins_apply_to_stereotypes() {
    let mut source = MockSource::new();
    let get = source.declare_annotation("web.Get");
    source.annotate(get, "legacy.Action", &[]);
    let class = source.class("app.Controller");
    source.annotate(class, "web.Get", &[]);

    let mut resolver = resolver(source);
    resolver.register_remapper(MovePackage {
        from: "legacy",
        to: "web",
    });
    let metadata = resolver.metadata_for(class).unwrap();

    assert!(metadata.has_stereotype("web.Action"));
    assert!(!metadata.has_stereotype("legacy.Action"));
}

#[test]
fn test_registry_lookup_order() {
    let mut resolver = resolver(MockSource::new());
    let wildcard = resolver.register_remapper(Identity(ALL_PACKAGES));
    let own = resolver.register_remapper(MovePackage {
        from: "legacy",
        to: "app",
    });

    assert_eq!(
        resolver.plugins().remappers_for("legacy.Inject").as_slice(),
        &[own, wildcard]
    );
    assert_eq!(
        resolver.plugins().remappers_for("other.Inject").as_slice(),
        &[wildcard]
    );
    assert_eq!(resolver.plugins().len(), 2);
}

/// Replaces `@app.Port` with `@app.Value("${server.port}")`.
struct PortProperty;

impl AnnotationMapper for PortProperty {
    fn annotation_name(&self) -> &str {
        "app.Port"
    }

    fn map(&self, _: &AnnotationValue, cx: &PluginContext<'_>) -> Vec<AnnotationValue> {
        vec![AnnotationValue::new(cx.name("app.Value")).with_member(Name::VALUE, "${server.port}")]
    }
}

#[test]
fn test_mapper_output_sets_expression_flags() {
    let mut source = MockSource::new();
    let class = source.class("app.Server");
    source.annotate(class, "app.Port", &[]);

    let mut resolver = resolver(source);
    resolver.register_mapper(PortProperty);
    let metadata = resolver.metadata_for(class).unwrap();

    assert_eq!(metadata.string_value("app.Value", "value"), Some("${server.port}"));
    assert!(metadata.has_property_expressions());
}

#[test]
fn test_fallible_registration_through_registry() {
    let mut source = MockSource::new();
    let class = source.class("app.Server");
    source.annotate(class, "app.Port", &[]);

    let mut resolver = resolver(source);
    let id = resolver
        .plugins_mut()
        .register_mapper(Box::new(PortProperty))
        .unwrap();

    assert_eq!(resolver.plugins().mappers_for("app.Port"), &[id]);
    assert!(resolver.metadata_for(class).unwrap().has_annotation("app.Value"));
}
