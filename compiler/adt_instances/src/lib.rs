//! Type-class instance resolution.
//!
//! Given a type class, a field type and an explicit, ordered list of
//! provider sources, find where an instance lives:
//!
//! 1. direct: a static field or zero-argument static method of the right type
//! 2. structural: a static method combining instances for the type's parts
//! 3. fallback: the same two steps over the low-priority providers
//!
//! Candidates are ranked by specificity, then provider priority, then
//! declaration order. There is no global registry: every search runs over
//! the [`ProviderOrder`] it is handed.

mod location;
mod providers;
mod resolver;

pub use location::InstanceLocation;
pub use providers::{ProviderOrder, ProviderRef};
pub use resolver::{FoundInstance, InstanceResolver, MAX_RESOLUTION_DEPTH};
