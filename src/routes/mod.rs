pub mod account;
pub mod collections;
pub mod manage;
pub mod museum_entities;
