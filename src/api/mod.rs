//! API module for the weather gateway HTTP server

pub mod middleware;
pub mod routes;
pub mod server;

pub use middleware::CorsPolicy;
pub use routes::AppState;
pub use server::{build_state, create_router, ApiServer, ApiServerConfig};
