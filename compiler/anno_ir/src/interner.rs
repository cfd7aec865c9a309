//! Name table shared by the resolver and the metadata it produces.
//!
//! Annotation names are fully qualified and repeat constantly across a
//! compilation, so each distinct string is stored once and handed out as a
//! [`Name`]. Strings are leaked and live for the rest of the process.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use super::Name;

/// Strings every table starts with, in `Name` constant order.
const WELL_KNOWN: [&str; 2] = ["", "value"];

/// The table grew past what a `u32` index can address.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InternError {
    #[error("name table is full: {count} names already interned")]
    Overflow { count: usize },
}

#[derive(Default)]
struct NameTable {
    ids: FxHashMap<&'static str, Name>,
    text: Vec<&'static str>,
}

impl NameTable {
    fn seeded() -> Self {
        let mut table = NameTable::default();
        for s in WELL_KNOWN {
            // Cannot overflow: the table is empty.
            let _ = table.insert(s);
        }
        table
    }

    fn insert(&mut self, s: &'static str) -> Result<Name, InternError> {
        let count = self.text.len();
        let raw = u32::try_from(count).map_err(|_| InternError::Overflow { count })?;
        let name = Name::from_raw(raw);
        self.text.push(s);
        self.ids.insert(s, name);
        Ok(name)
    }
}

/// Thread-safe name table.
///
/// Reads take a shared lock; only the first sighting of a string takes the
/// exclusive one. Share it through [`SharedInterner`].
pub struct StringInterner {
    table: RwLock<NameTable>,
}

impl StringInterner {
    /// A table holding only `""` and `"value"`.
    pub fn new() -> Self {
        StringInterner {
            table: RwLock::new(NameTable::seeded()),
        }
    }

    /// The `Name` for `s`, adding it if unseen.
    pub fn try_intern(&self, s: &str) -> Result<Name, InternError> {
        if let Some(name) = self.get(s) {
            return Ok(name);
        }
        let mut table = self.table.write();
        // Another writer may have won the race for the lock.
        match table.ids.get(s) {
            Some(&name) => Ok(name),
            None => {
                let leaked: &'static str = Box::leak(Box::<str>::from(s));
                table.insert(leaked)
            }
        }
    }

    /// Like [`try_intern`](Self::try_intern), panicking once four billion
    /// distinct names exist.
    #[inline]
    pub fn intern(&self, s: &str) -> Name {
        self.try_intern(s).unwrap_or_else(|e| panic!("{e}"))
    }

    /// The `Name` for `s` if it was ever interned. Never grows the table, so
    /// queries about unknown annotations stay read-only.
    pub fn get(&self, s: &str) -> Option<Name> {
        self.table.read().ids.get(s).copied()
    }

    /// Text of `name`; `""` for a name this table never issued.
    pub fn lookup(&self, name: Name) -> &'static str {
        let table = self.table.read();
        table.text.get(name.index()).copied().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.table.read().text.len()
    }

    /// Never true; the well-known names are always present.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StringInterner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StringInterner({} names)", self.len())
    }
}

/// Reference-counted [`StringInterner`].
///
/// Every `AnnotationMetadata` keeps one so string queries keep working after
/// the resolver is gone.
#[derive(Clone, Debug, Default)]
pub struct SharedInterner(Arc<StringInterner>);

impl SharedInterner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether both handles issue names from one table.
    pub fn same_table(&self, other: &SharedInterner) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for SharedInterner {
    type Target = StringInterner;

    fn deref(&self) -> &StringInterner {
        &self.0
    }
}
