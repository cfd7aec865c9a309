//! Annotation metadata resolution.
//!
//! Given a program element exposed by a host compiler through
//! [`AnnotationSource`], [`AnnotationResolver`] computes the fully resolved
//! annotation metadata of that element and caches it:
//!
//! ```text
//! lookup_or_build(key, element)
//!   └─ cache miss ─> walk hierarchy (most general first)
//!                     └─ per mirror: read ─> pipeline ─> place
//! ```
//!
//! The pipeline runs, per annotation occurrence:
//!
//! 1. stereotype attachment (annotations on the annotation type)
//! 2. mappers (additive)
//! 3. remappers (substitutive, first change wins)
//! 4. transformers (substitutive, first change wins)
//! 5. repeatable container flattening
//! 6. alias propagation
//!
//! Output is an [`AnnotationMetadata`](anno_ir::AnnotationMetadata) queried by
//! annotation name.

mod alias;
mod assemble;
mod cache;
mod config;
mod context;
mod error;
mod mutate;
mod pipeline;
mod plugin;
mod reader;
mod repeatable;
mod resolver;
mod source;
mod stack;
mod stereotype;
pub mod testing;

use std::sync::Once;

pub use cache::{CacheKey, CachedAnnotationMetadata, DefaultValueCache, MetadataCache};
pub use config::{ConditionalStereotype, ResolverConfig};
pub use context::ProcessingContext;
pub use error::{ResolveError, SourceError};
pub use pipeline::ProcessedAnnotation;
pub use plugin::{
    AnnotationMapper, AnnotationRemapper, AnnotationTransformer, PluginContext, PluginId,
    PluginRegistry, RegistryFull, ALL_PACKAGES,
};
pub use reader::{AnnotatedElementValidator, ValidatedElement};
pub use resolver::AnnotationResolver;
pub use source::{AnnotationSource, RawValue};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for the resolver.
///
/// Installs a subscriber only when `RUST_LOG` is set; safe to call more than
/// once. Use `RUST_LOG=anno_resolve=debug` for pipeline decisions and
/// `RUST_LOG=anno_resolve=trace` for cache hits and filtered stereotypes.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
