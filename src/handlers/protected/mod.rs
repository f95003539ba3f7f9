// handlers/protected/mod.rs - Protected handlers
//
// Every route here sits behind `require_session`, so handlers receive an
// `AuthUser` extension. Owner ids always come from that extension, never from
// request bodies.
pub mod bookmarks;
pub mod collection_bookmarks;
pub mod collections;
pub mod session;
