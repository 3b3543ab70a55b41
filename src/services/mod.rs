pub mod account_service;
pub mod callback_urls;
pub mod collection_service;
pub mod manage_service;
pub mod museum_service;
pub mod view_model_factories;
