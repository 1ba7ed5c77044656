// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Security Level: None
// Middleware: body limit, CORS, request tracing

pub mod auth;
pub mod communities;
pub mod posts;
pub mod system;
