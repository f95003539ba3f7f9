// handlers/mod.rs - two security tiers
//
// Public (no session) → Protected (session resolved by `require_session`)
pub mod protected; // /api/bookmarks, /api/collections, /api/auth/user
pub mod public; // /, /health, /api/auth/{signup,login,logout}
