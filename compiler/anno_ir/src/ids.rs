//! Handle newtypes.
//!
//! `ElementId` and `MirrorId` are minted by the host's annotation source and
//! are opaque to the resolver. `AnnoId` indexes the resolver's own
//! [`AnnotationArena`](crate::AnnotationArena).

use std::fmt;

macro_rules! handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Create a handle from a raw index.
            #[inline]
            pub const fn new(raw: u32) -> Self {
                Self(raw)
            }

            /// Get the raw `u32` value.
            #[inline]
            pub const fn raw(self) -> u32 {
                self.0
            }

            /// Get the raw value as a `usize` index.
            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }
    };
}

handle!(
    /// A native program element: a class, method, field, parameter, package,
    /// annotation type, or annotation member.
    ElementId
);

handle!(
    /// One applied annotation instance in the host's element model.
    MirrorId
);

handle!(
    /// Index of a resolved stereotype node in an `AnnotationArena`.
    AnnoId
);
