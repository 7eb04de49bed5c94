//! Symbol table - interned identifier and literal strings.
//!
//! [`VarList`] stores each distinct string once, in insertion order, and
//! hands out stable [`SymId`] indices. Identifier and literal AST nodes store
//! only the index; every lookup by name goes through a secondary index that
//! is kept sorted by string hash, so `add`/`find_index` cost one binary
//! search plus a scan of the (almost always empty) run of equal hashes.
//!
//! The hash value zero is reserved as poison and remapped, so a stored hash
//! is always non-zero.

use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;

/// A compact handle to an interned string.
///
/// Indices are stable for the lifetime of the owning [`VarList`] and are
/// what `Identifier`/`Literal` nodes carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymId(pub u32);

impl SymId {
    /// The raw index into the table.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Insertion-ordered set of interned strings with hash-indexed lookup.
///
/// # Example
///
/// ```
/// use plabc_util::VarList;
///
/// let mut vars = VarList::new();
/// let a = vars.add("width");
/// let b = vars.add("width");
/// assert_eq!(a, b);
/// assert_eq!(vars.get(a), Some("width"));
/// assert_eq!(vars.len(), 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct VarList {
    /// Interned strings, in first-seen order.
    names: Vec<String>,
    /// Hash of each entry in `names`, parallel to it. Never zero.
    hashes: Vec<u64>,
    /// Indices into `names`, sorted by hash.
    order: Vec<u32>,
}

/// Hashes a name, mapping the reserved zero value away.
fn name_hash(name: &str) -> u64 {
    let mut hasher = FxHasher::default();
    name.hash(&mut hasher);
    match hasher.finish() {
        0 => 1,
        h => h,
    }
}

impl VarList {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of interned strings.
    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True when nothing has been interned yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// First position in `order` whose hash is not less than `hash`.
    fn lower_bound(&self, hash: u64) -> usize {
        self.order
            .partition_point(|&idx| self.hashes[idx as usize] < hash)
    }

    /// Finds an existing entry, disambiguating equal hashes by string
    /// comparison over the run.
    fn find_internal(&self, name: &str, hash: u64) -> Option<u32> {
        let mut pos = self.lower_bound(hash);
        while pos < self.order.len() {
            let idx = self.order[pos];
            if self.hashes[idx as usize] != hash {
                break;
            }
            if self.names[idx as usize] == name {
                return Some(idx);
            }
            pos += 1;
        }
        None
    }

    /// Interns `name`, returning the existing index if it is already present.
    ///
    /// Adding the same string twice returns the same [`SymId`] and leaves
    /// the table unchanged.
    pub fn add(&mut self, name: &str) -> SymId {
        let hash = name_hash(name);
        if let Some(idx) = self.find_internal(name, hash) {
            return SymId(idx);
        }
        let new_idx = self.names.len() as u32;
        let insert_pos = self.lower_bound(hash);
        self.names.push(name.to_owned());
        self.hashes.push(hash);
        self.order.insert(insert_pos, new_idx);
        SymId(new_idx)
    }

    /// True if `name` has been interned.
    pub fn contains(&self, name: &str) -> bool {
        self.find_internal(name, name_hash(name)).is_some()
    }

    /// Looks up the string for an index.
    pub fn get(&self, id: SymId) -> Option<&str> {
        self.names.get(id.index()).map(String::as_str)
    }

    /// Looks up the index for a string.
    pub fn find_index(&self, name: &str) -> Option<SymId> {
        self.find_internal(name, name_hash(name)).map(SymId)
    }

    /// Iterates the interned strings in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}
