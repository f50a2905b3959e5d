/// State management module
///
/// This module handles the stateful subsystems of the viewer:
/// - The global lightbox controller, shared by every screen (lightbox.rs)
/// - Per-gallery scroll-coupled engines (gallery.rs)
///
/// Everything else the application shows is derived directly from the
/// read-only catalog and the current scroll position.

pub mod gallery;
pub mod lightbox;
