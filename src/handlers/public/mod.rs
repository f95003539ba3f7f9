// handlers/public/mod.rs - Public handlers (no session required)
//
// Token acquisition and liveness. Inputs are untrusted; the identity provider
// decides whether credentials are acceptable.
pub mod auth;
pub mod system;
