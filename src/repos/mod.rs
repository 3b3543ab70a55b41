pub mod capabilities;
pub mod museum_repo;
