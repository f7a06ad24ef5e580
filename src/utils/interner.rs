//! Global string interner.
//!
//! Turns stage names and other script identifiers into compact integer
//! [`Symbol`]s so that transition-table lookups compare and hash integers
//! instead of strings.

use std::sync::LazyLock;

use lasso::{Spur, ThreadedRodeo};

/// Global interner instance.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::new);

/// Symbol type alias.
///
/// A Symbol is a compact integer identifier that can be compared and hashed
/// in O(1).
pub type Symbol = Spur;

/// Interns a string and returns its Symbol.
///
/// Returns the existing Symbol if the string has been interned before.
#[inline]
pub fn intern(s: &str) -> Symbol {
    INTERNER.get_or_intern(s)
}

/// Returns the Symbol of an already interned string without allocating.
#[inline]
pub fn get(s: &str) -> Option<Symbol> {
    INTERNER.get(s)
}

/// Resolves a Symbol back into its string.
///
/// # Panics
/// Panics if the Symbol did not come from this interner.
#[inline]
pub fn resolve(sym: Symbol) -> &'static str {
    INTERNER.resolve(&sym)
}
