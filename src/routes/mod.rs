/// Router Module Index
///
/// Organizes the routing logic into access-segregated modules. Access
/// control is applied explicitly at the module level (via Axum layers),
/// so a protected endpoint cannot be exposed by accident.

/// Routes accessible to all clients (anonymous, read-only), plus login.
pub mod public;

/// Routes protected by the `AuthUser` extractor middleware. Any active
/// admin account passes.
pub mod authenticated;

/// Routes for content and account mutation. Authenticated by the same
/// middleware; role checks (`admin` vs `super_admin`) happen inside the
/// handlers.
pub mod admin;
