//! Admin surface and lifecycle-hook endpoints for the update-maintenance
//! component.

pub mod admin;
pub mod api;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
