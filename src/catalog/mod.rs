/// Story catalog module
///
/// This module owns the read-only content the viewer renders:
/// - Story and block data structures (story.rs)
/// - The embedded catalog and slug resolution (store.rs)
///
/// The catalog is loaded once at startup and never mutated. Everything the
/// rest of the application knows about a story flows through these types.

pub mod store;
pub mod story;
