use super::*;
use crate::ExpressionRef;
use pretty_assertions::assert_eq;

struct Names {
    interner: SharedInterner,
}

impl Names {
    fn new() -> Self {
        Names {
            interner: SharedInterner::new(),
        }
    }

    fn get(&self, s: &str) -> Name {
        self.interner.intern(s)
    }

    fn metadata(&self) -> AnnotationMetadata {
        AnnotationMetadata::new(self.interner.clone())
    }

    fn members(&self, pairs: &[(&str, Value)]) -> MemberMap {
        pairs
            .iter()
            .map(|(member, value)| (self.get(member), value.clone()))
            .collect()
    }
}

#[test]
fn declared_annotation_is_also_in_all() {
    let names = Names::new();
    let mut metadata = names.metadata();
    let get = names.get("web.Get");

    metadata.add_annotation(get, &names.members(&[("value", Value::from("/x"))]), true);

    assert!(metadata.has_annotation("web.Get"));
    assert!(metadata.has_declared_annotation("web.Get"));
    assert!(metadata.has_stereotype("web.Get"));
    assert_eq!(metadata.string_value("web.Get", "value"), Some("/x"));
    assert_eq!(metadata.declared_annotation_names(), vec!["web.Get"]);
    assert_eq!(metadata.annotation_names(), vec!["web.Get"]);
}

#[test]
fn inherited_annotation_is_not_declared() {
    let names = Names::new();
    let mut metadata = names.metadata();
    metadata.add_annotation(names.get("di.Singleton"), &MemberMap::default(), false);

    assert!(metadata.has_annotation("di.Singleton"));
    assert!(!metadata.has_declared_annotation("di.Singleton"));
}

#[test]
fn later_placement_overwrites_members() {
    let names = Names::new();
    let mut metadata = names.metadata();
    let x = names.get("X");

    metadata.add_annotation(
        x,
        &names.members(&[("v", Value::Int(1)), ("w", Value::Int(9))]),
        false,
    );
    metadata.add_annotation(x, &names.members(&[("v", Value::Int(2))]), true);

    assert_eq!(metadata.int_value("X", "v"), Some(2));
    assert_eq!(metadata.int_value("X", "w"), Some(9));
    assert_eq!(
        metadata.declared_annotations().get(&x),
        Some(&names.members(&[("v", Value::Int(2))]))
    );
}

#[test]
fn stereotype_registers_owner_chain() {
    let names = Names::new();
    let mut metadata = names.metadata();
    let get = names.get("web.Get");
    let action = names.get("web.Action");
    let mapping = names.get("web.Mapping");

    metadata.add_annotation(get, &MemberMap::default(), true);
    metadata.add_stereotype(
        &[get],
        action,
        &names.members(&[("method", Value::from("GET"))]),
        true,
    );
    metadata.add_stereotype(&[get, action], mapping, &MemberMap::default(), true);

    assert!(metadata.has_stereotype("web.Action"));
    assert!(metadata.has_declared_stereotype("web.Mapping"));
    assert!(!metadata.has_annotation("web.Action"));
    assert_eq!(metadata.string_value("web.Action", "method"), Some("GET"));
    assert_eq!(
        metadata.annotation_names_by_stereotype("web.Mapping"),
        vec!["web.Get", "web.Action"]
    );
    assert_eq!(
        metadata.annotation_names_by_stereotype("web.Get"),
        vec!["web.Get"]
    );
}

#[test]
fn unknown_names_are_absent() {
    let names = Names::new();
    let metadata = names.metadata();
    let before = names.interner.len();

    assert!(!metadata.has_annotation("never.Seen"));
    assert_eq!(metadata.value("never.Seen", "value"), None);
    assert!(metadata.annotation_values("never.Seen").is_empty());
    assert_eq!(names.interner.len(), before);
}

#[test]
fn repeatable_instances_live_in_container() {
    let names = Names::new();
    let mut metadata = names.metadata();
    let tag = names.get("Tag");
    let tags = names.get("Tags");

    metadata.add_repeatable(tags, NestedAnnotation::new(tag).with_member(Name::VALUE, "a"), true);
    metadata.add_repeatable(tags, NestedAnnotation::new(tag).with_member(Name::VALUE, "b"), true);
    metadata.add_repeatable(tags, NestedAnnotation::new(tag).with_member(Name::VALUE, "a"), true);

    assert!(metadata.has_annotation("Tag"));
    assert!(metadata.has_annotation("Tags"));
    assert_eq!(metadata.find_repeatable_container("Tag"), Some("Tags"));

    let values: Vec<&str> = metadata
        .annotation_values("Tag")
        .iter()
        .filter_map(|view| view.member(Name::VALUE)?.as_str())
        .collect();
    assert_eq!(values, vec!["a", "b", "a"]);
    assert!(!metadata.all_annotations().contains_key(&tag));
}

#[test]
fn default_values_back_queries() {
    let names = Names::new();
    let mut metadata = names.metadata();
    let cfg = names.get("Cfg");

    metadata.add_annotation(cfg, &MemberMap::default(), true);
    metadata.add_default_values(
        cfg,
        Arc::new(names.members(&[("enabled", Value::Bool(true))])),
    );

    assert_eq!(metadata.bool_value("Cfg", "enabled"), Some(true));
    assert_eq!(
        metadata.default_values("Cfg"),
        Some(&names.members(&[("enabled", Value::Bool(true))]))
    );
}

#[test]
fn remove_annotation_cascades_through_stereotypes() {
    let names = Names::new();
    let mut metadata = names.metadata();
    let keep = names.get("Keep");
    let x = names.get("X");
    let s = names.get("S");
    let t = names.get("T");
    let shared = names.get("Shared");

    metadata.add_annotation(keep, &MemberMap::default(), true);
    metadata.add_stereotype(&[keep], shared, &MemberMap::default(), true);
    let before = metadata.clone();

    metadata.add_annotation(x, &MemberMap::default(), true);
    metadata.add_stereotype(&[x], s, &MemberMap::default(), true);
    metadata.add_stereotype(&[x, s], t, &MemberMap::default(), true);
    metadata.add_stereotype(&[x], shared, &MemberMap::default(), true);

    assert!(metadata.remove_annotation("X"));
    assert!(!metadata.has_stereotype("S"));
    assert!(!metadata.has_stereotype("T"));
    assert!(metadata.has_stereotype("Shared"));
    assert_eq!(metadata, before);
}

#[test]
fn remove_stereotype_removes_index_entry() {
    let names = Names::new();
    let mut metadata = names.metadata();
    let get = names.get("Get");
    let action = names.get("Action");
    let mapping = names.get("Mapping");

    metadata.add_annotation(get, &MemberMap::default(), true);
    metadata.add_stereotype(&[get], action, &MemberMap::default(), true);
    metadata.add_stereotype(&[get, action], mapping, &MemberMap::default(), true);

    assert!(metadata.remove_stereotype("Action"));
    assert!(!metadata.has_stereotype("Action"));
    assert!(metadata.annotation_names_by_stereotype("Action").is_empty());
    // Mapping is still owned by Get.
    assert!(metadata.has_stereotype("Mapping"));
    assert_eq!(
        metadata.annotation_names_by_stereotype("Mapping"),
        vec!["Get"]
    );
    assert!(!metadata.remove_stereotype("Action"));
}

#[test]
fn remove_annotation_if_matches_members() {
    let names = Names::new();
    let mut metadata = names.metadata();
    let tag = names.get("Tag");
    let tags = names.get("Tags");
    let other = names.get("Other");

    metadata.add_annotation(other, &names.members(&[("drop", Value::Bool(true))]), true);
    metadata.add_repeatable(tags, NestedAnnotation::new(tag).with_member(Name::VALUE, "a"), true);

    let removed = metadata.remove_annotation_if(|view| {
        view.member(names.get("drop")).is_some() || view.member(Name::VALUE) == Some(&Value::from("a"))
    });

    assert!(removed);
    assert!(!metadata.has_annotation("Other"));
    assert!(!metadata.has_annotation("Tag"));
    assert!(!metadata.has_annotation("Tags"));
    assert!(metadata.is_empty());
}

#[test]
fn repeatable_stereotype_reached_twice_is_placed_once() {
    let names = Names::new();
    let mut metadata = names.metadata();
    let (get, post) = (names.get("Get"), names.get("Post"));
    let (tag, tags) = (names.get("Tag"), names.get("Tags"));
    let instance = NestedAnnotation::new(tag).with_member(Name::VALUE, "web");

    metadata.add_annotation(get, &MemberMap::default(), true);
    metadata.add_annotation(post, &MemberMap::default(), true);
    metadata.add_repeatable_stereotype(&[get], tags, instance.clone(), true);
    metadata.add_repeatable_stereotype(&[post], tags, instance, true);

    assert_eq!(metadata.annotation_values("Tag").len(), 1);
    assert_eq!(metadata.annotation_names_by_stereotype("Tag"), vec!["Get", "Post"]);
}

#[test]
fn surviving_stereotype_is_rebuilt_from_remaining_owners() {
    let names = Names::new();
    let mut metadata = names.metadata();
    let (y, x, s) = (names.get("Y"), names.get("X"), names.get("S"));

    metadata.add_annotation(y, &MemberMap::default(), true);
    metadata.add_stereotype(&[y], s, &names.members(&[("v", Value::from("y"))]), false);
    let before = metadata.clone();

    metadata.add_annotation(x, &MemberMap::default(), true);
    metadata.add_stereotype(
        &[x],
        s,
        &names.members(&[("v", Value::from("x")), ("w", Value::Int(1))]),
        true,
    );
    assert_eq!(metadata.string_value("S", "v"), Some("x"));
    assert!(metadata.has_declared_stereotype("S"));

    assert!(metadata.remove_annotation("X"));
    assert_eq!(metadata.string_value("S", "v"), Some("y"));
    assert_eq!(metadata.int_value("S", "w"), None);
    assert!(!metadata.has_declared_stereotype("S"));
    assert_eq!(metadata, before);
}

#[test]
fn surviving_repeatable_stereotype_loses_removed_instances() {
    let names = Names::new();
    let mut metadata = names.metadata();
    let (y, x) = (names.get("Y"), names.get("X"));
    let (tag, tags) = (names.get("Tag"), names.get("Tags"));

    metadata.add_annotation(y, &MemberMap::default(), true);
    metadata.add_repeatable_stereotype(
        &[y],
        tags,
        NestedAnnotation::new(tag).with_member(Name::VALUE, "y"),
        true,
    );
    let before = metadata.clone();

    metadata.add_annotation(x, &MemberMap::default(), true);
    metadata.add_repeatable_stereotype(
        &[x],
        tags,
        NestedAnnotation::new(tag).with_member(Name::VALUE, "x"),
        true,
    );
    assert_eq!(metadata.annotation_values("Tag").len(), 2);

    metadata.remove_annotation("X");
    assert_eq!(metadata, before);
}

#[test]
fn flags_follow_placed_values() {
    let names = Names::new();
    let mut metadata = names.metadata();
    assert!(!metadata.has_property_expressions());

    metadata.add_annotation(
        names.get("Value"),
        &names.members(&[("value", Value::from("${server.port}"))]),
        true,
    );
    metadata.add_stereotype(
        &[names.get("Value")],
        names.get("Computed"),
        &names.members(&[("value", Value::from("#{ 1 + 1 }"))]),
        true,
    );
    assert!(metadata.has_property_expressions());
    assert!(metadata.has_evaluated_expressions());

    metadata.remove_annotation("Value");
    assert_eq!(metadata.flags(), MetadataFlags::empty());
}

#[test]
fn flags_of_nested_values() {
    assert_eq!(
        MetadataFlags::of_value(&Value::from("${server.port}")),
        MetadataFlags::HAS_PROPERTY_EXPRESSIONS
    );
    assert_eq!(MetadataFlags::of_value(&Value::from("plain")), MetadataFlags::empty());

    let expression = Value::Expression(ExpressionRef {
        annotation: Name::from_raw(3),
        member: Name::VALUE,
        expression: "#{ 1 + 1 }".to_owned(),
    });
    let mixed = Value::Array(vec![Value::from("${a}"), expression]);
    assert_eq!(
        MetadataFlags::of_value(&mixed),
        MetadataFlags::HAS_PROPERTY_EXPRESSIONS | MetadataFlags::HAS_EVALUATED_EXPRESSIONS
    );

    let nested = Value::Annotation(Box::new(
        NestedAnnotation::new(Name::from_raw(4)).with_member(Name::VALUE, "${b}"),
    ));
    assert_eq!(
        MetadataFlags::of_value(&nested),
        MetadataFlags::HAS_PROPERTY_EXPRESSIONS
    );
}
