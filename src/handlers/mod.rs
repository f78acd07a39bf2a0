// handlers/mod.rs - two handler tiers
//
// Public (no token) → Protected (token resolved by `token_auth_middleware`)
pub mod protected;
pub mod public;

/// Parses a numeric path segment. Ids start at 1, so a segment that is not a
/// number resolves to nothing and takes the regular not-found path.
pub(crate) fn route_id(raw: &str) -> i64 {
    raw.trim().parse().unwrap_or(0)
}
