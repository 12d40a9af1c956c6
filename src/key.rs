//! Type identifiers for registry storage and lookup.

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Key identifying a registered contract.
///
/// A key is built from the `TypeId` of the contract, which may be a concrete
/// type or an unsized trait object such as `dyn Logger`. The type name is kept
/// for error messages only: equality, ordering and hashing use the `TypeId`.
///
/// # Examples
///
/// ```rust
/// use ferrous_inject::Key;
///
/// trait Logger: Send + Sync {}
///
/// let a = Key::of::<String>();
/// let b = Key::of::<String>();
/// let c = Key::of::<dyn Logger>();
///
/// assert_eq!(a, b);
/// assert_ne!(a, c);
/// assert_eq!(a.display_name(), "alloc::string::String");
/// assert!(c.display_name().contains("Logger"));
/// ```
#[derive(Clone, Copy)]
pub struct Key {
    id: TypeId,
    name: &'static str,
}

impl Key {
    /// Key for the contract `T`.
    #[inline(always)]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// The underlying `TypeId`.
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.id
    }

    /// Human-readable type name, as produced by `std::any::type_name`.
    pub fn display_name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Key").field(&self.name).finish()
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

// TypeId-only comparison; the name is diagnostic
impl PartialEq for Key {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Key {}

impl PartialOrd for Key {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Key {
    #[inline(always)]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.id.cmp(&other.id)
    }
}

impl Hash for Key {
    #[inline(always)]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Shorthand for [`Key::of`].
#[inline(always)]
pub fn key_of<T: ?Sized + 'static>() -> Key {
    Key::of::<T>()
}
