//! Resolver configuration.
//!
//! The defaults encode the Java conventions: `java.lang.annotation` markers,
//! the JSR-305 nullability annotations and javac's completion failure.

use anno_diagnostic::DiagnosticConfig;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::SourceError;

/// A nullability stereotype dropped when one of its members holds a
/// suppressing constant, e.g. `@Nonnull(when = MAYBE)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConditionalStereotype {
    pub annotation: String,
    pub member: String,
    pub suppressing: Vec<String>,
}

impl ConditionalStereotype {
    pub fn is_suppressed_by(&self, constant: &str) -> bool {
        self.suppressing.iter().any(|s| s == constant)
    }
}

/// Configuration for an [`AnnotationResolver`](crate::AnnotationResolver).
#[derive(Clone, Debug)]
pub struct ResolverConfig {
    /// Marks a member as an alias of another member.
    pub alias_for: String,
    /// Plural wrapper of `alias_for`.
    pub aliases: String,
    /// `annotation` member value meaning "the same annotation".
    pub alias_annotation_sentinel: String,
    /// Meta-annotation making an annotation visible on subtypes.
    pub inherited: String,
    /// Meta-annotations never recorded as stereotypes.
    pub internal_annotations: FxHashSet<String>,
    /// Packages whose annotations do not pass stereotypes from excluded
    /// packages on.
    pub excluded_stereotype_packages: FxHashSet<String>,
    /// Nullability annotations, dropped together with excluded packages.
    pub nullable_suffix: String,
    pub conditional_stereotypes: Vec<ConditionalStereotype>,
    /// Deprecated annotation name → message.
    pub deprecated_annotations: FxHashMap<String, String>,
    /// Host failure kinds that make an element resolve as unannotated.
    pub swallowed_failures: Vec<String>,
    /// Passed to [`AnnotationSource::hierarchy`](crate::AnnotationSource::hierarchy).
    pub inherit_type_annotations: bool,
    /// Passed to [`AnnotationSource::hierarchy`](crate::AnnotationSource::hierarchy).
    pub declared_only: bool,
    pub diagnostics: DiagnosticConfig,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        let internal_annotations = [
            "java.lang.annotation.Retention",
            "java.lang.annotation.Target",
            "java.lang.annotation.Documented",
            "java.lang.annotation.Repeatable",
            "kotlin.annotation.Retention",
            "kotlin.annotation.Target",
            "kotlin.annotation.MustBeDocumented",
            "kotlin.annotation.Repeatable",
            "kotlin.Metadata",
        ];
        let excluded_stereotype_packages = [
            "javax.annotation",
            "java.lang.annotation",
            "io.micronaut.core.annotation",
            "edu.umd.cs.findbugs.annotations",
        ];

        ResolverConfig {
            alias_for: "io.micronaut.context.annotation.AliasFor".to_owned(),
            aliases: "io.micronaut.context.annotation.Aliases".to_owned(),
            alias_annotation_sentinel: "java.lang.annotation.Annotation".to_owned(),
            inherited: "java.lang.annotation.Inherited".to_owned(),
            internal_annotations: internal_annotations.into_iter().map(str::to_owned).collect(),
            excluded_stereotype_packages: excluded_stereotype_packages
                .into_iter()
                .map(str::to_owned)
                .collect(),
            nullable_suffix: ".Nullable".to_owned(),
            conditional_stereotypes: vec![ConditionalStereotype {
                annotation: "javax.annotation.Nonnull".to_owned(),
                member: "when".to_owned(),
                suppressing: vec!["UNKNOWN".to_owned(), "MAYBE".to_owned(), "NEVER".to_owned()],
            }],
            deprecated_annotations: FxHashMap::default(),
            swallowed_failures: vec!["com.sun.tools.javac.code.Symbol$CompletionFailure".to_owned()],
            inherit_type_annotations: true,
            declared_only: false,
            diagnostics: DiagnosticConfig::default(),
        }
    }
}

impl ResolverConfig {
    #[must_use]
    pub fn with_internal_annotation(mut self, name: impl Into<String>) -> Self {
        self.internal_annotations.insert(name.into());
        self
    }

    #[must_use]
    pub fn with_excluded_package(mut self, package: impl Into<String>) -> Self {
        self.excluded_stereotype_packages.insert(package.into());
        self
    }

    #[must_use]
    pub fn with_conditional_stereotype(mut self, rule: ConditionalStereotype) -> Self {
        self.conditional_stereotypes.push(rule);
        self
    }

    /// Warn whenever `annotation` is used.
    #[must_use]
    pub fn with_deprecation(
        mut self,
        annotation: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        self.deprecated_annotations
            .insert(annotation.into(), message.into());
        self
    }

    #[must_use]
    pub fn with_swallowed_failure(mut self, kind: impl Into<String>) -> Self {
        self.swallowed_failures.push(kind.into());
        self
    }

    #[must_use]
    pub fn with_inherit_type_annotations(mut self, inherit: bool) -> Self {
        self.inherit_type_annotations = inherit;
        self
    }

    #[must_use]
    pub fn with_declared_only(mut self, declared_only: bool) -> Self {
        self.declared_only = declared_only;
        self
    }

    #[must_use]
    pub fn with_diagnostics(mut self, diagnostics: DiagnosticConfig) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn is_internal(&self, annotation: &str) -> bool {
        self.internal_annotations.contains(annotation)
    }

    /// Whether `annotation` lives in an excluded package, so excluded
    /// stereotypes are not passed on through it.
    pub fn excludes_stereotypes_of(&self, annotation: &str) -> bool {
        self.excluded_stereotype_packages
            .contains(package_of(annotation))
    }

    pub fn is_excluded_stereotype(&self, stereotype: &str) -> bool {
        self.excluded_stereotype_packages
            .contains(package_of(stereotype))
            || stereotype.ends_with(&self.nullable_suffix)
    }

    pub fn conditional(&self, stereotype: &str) -> Option<&ConditionalStereotype> {
        self.conditional_stereotypes
            .iter()
            .find(|rule| rule.annotation == stereotype)
    }

    pub fn deprecation(&self, annotation: &str) -> Option<&str> {
        self.deprecated_annotations
            .get(annotation)
            .map(String::as_str)
    }

    pub fn swallows(&self, error: &SourceError) -> bool {
        self.swallowed_failures.iter().any(|kind| *kind == error.kind)
    }
}

/// Package part of a fully qualified name, empty for the default package.
pub(crate) fn package_of(name: &str) -> &str {
    name.rsplit_once('.').map_or("", |(package, _)| package)
}

/// Simple name part of a fully qualified name.
pub(crate) fn simple_name(name: &str) -> &str {
    name.rsplit_once('.').map_or(name, |(_, simple)| simple)
}
