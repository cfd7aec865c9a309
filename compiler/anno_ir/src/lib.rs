//! Anno IR - resolved annotation data structures
//!
//! This crate contains the data the annotation resolver produces and the
//! handles it exchanges with a host compiler:
//! - Names for interned annotation and member identifiers
//! - Element and mirror handles handed out by the host
//! - `Value`, the tagged union of annotation member values
//! - `AnnotationValue` nodes and the arena holding stereotype trees
//! - `AnnotationMetadata`, the four-layer per-element result
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: annotation and member names are `Name(u32)`
//! - **Flatten Trees**: stereotype trees reference arena nodes by `AnnoId`
//! - **Insertion Order**: member and annotation maps keep declaration order

/// Compile-time assertion that a type has a specific size.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod annotation;
mod ids;
mod interner;
mod metadata;
mod name;
mod retention;
mod value;

pub use annotation::{AnnotationArena, AnnotationValue};
pub use ids::{AnnoId, ElementId, MirrorId};
pub use interner::{InternError, SharedInterner, StringInterner};
pub use metadata::{AnnotationMap, AnnotationMetadata, AnnotationView, MetadataFlags};
pub use name::Name;
pub use retention::RetentionPolicy;
pub use value::{
    ExpressionRef, MemberMap, NestedAnnotation, Value, EVALUATED_EXPRESSION_PREFIX,
    PROPERTY_PLACEHOLDER_PREFIX,
};

#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::{AnnoId, ElementId, MirrorId, Name};
    crate::static_assert_size!(Name, 4);
    crate::static_assert_size!(ElementId, 4);
    crate::static_assert_size!(MirrorId, 4);
    crate::static_assert_size!(AnnoId, 4);
}
