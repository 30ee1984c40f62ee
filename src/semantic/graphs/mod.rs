//! Derived views over the frozen [`ResolvedDocument`]: the one-hop usage
//! index and memoized inheritance chains.
//!
//! [`ResolvedDocument`]: super::document::ResolvedDocument

mod inheritance;
mod usage;

pub use inheritance::{DerivationKind, InheritanceChain, InheritanceResolver, InheritanceStep};
pub use usage::{ReferenceKind, UsageIndex, UsageInfo};
