//! `SeaORM` Entity, generated for the museum collections schema

pub mod prelude;

pub mod acquisition;
pub mod app_user;
pub mod artist;
pub mod artist_subject_matter;
pub mod country;
pub mod exhibition;
pub mod exhibition_piece;
pub mod genre;
pub mod inspector;
pub mod insurance_policy;
pub mod loan;
pub mod loan_piece;
pub mod location;
pub mod medium;
pub mod museum;
pub mod piece;
pub mod subgenre;
pub mod subject_matter;
pub mod unit_of_measure;
pub mod user_login;
pub mod user_recovery_code;
