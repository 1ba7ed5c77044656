// handlers/mod.rs - Two-tier handler architecture
//
// Public (no credential) → Protected (bearer token verified by middleware)
//
// Routing lives in server.rs; this module only groups the handler functions.
pub mod public;    // Tier 1: anonymous access (/, /health, /api/auth/login, reads)
pub mod protected; // Tier 2: bearer token required (writes, /api/auth/me)

/*
HANDLER LAYOUT:

src/handlers/
├── mod.rs                 ← This file
├── public/
│   ├── auth/              ← POST /api/auth/signup, POST /api/auth/login
│   ├── posts.rs           ← GET /api/posts, GET /api/posts/:id
│   ├── communities.rs     ← GET /api/communities
│   └── system.rs          ← GET /, GET /health
└── protected/
    ├── auth/              ← GET /api/auth/me
    ├── posts.rs           ← POST /api/posts, DELETE /api/posts/:id
    ├── comments.rs        ← POST /api/posts/:id/comments
    └── communities.rs     ← POST /api/communities, membership endpoints

Protected handlers receive `Extension<AuthUser>`; the middleware has already
rejected the request with 401/403 if no valid token was presented. Ownership
checks happen in services/, not here.
*/
