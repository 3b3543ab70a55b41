//! Museum collection management API: tenant-scoped collection records and
//! account management over axum and sea-orm.

pub mod app_factory;
pub mod auth;
pub mod config;
pub mod error;
pub mod factories;
pub mod identity;
pub mod models;
pub mod repos;
pub mod routes;
pub mod services;

#[cfg(test)]
pub mod test_tools;
