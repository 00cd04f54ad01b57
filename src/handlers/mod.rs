// handlers/mod.rs - three security tiers
//
// public    no authentication          (/, /health, /auth/*)
// protected any valid JWT               (/api/auth/whoami, /api/kpis, /api/channels)
// elevated  JWT for an admin account    (/api/config, /api/upload, /api/dataset, /api/users/*)
pub mod elevated;
pub mod protected;
pub mod public;
