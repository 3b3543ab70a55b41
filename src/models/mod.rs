pub mod auth;
pub mod manage;
pub mod request;
pub mod resources;
pub mod response;
