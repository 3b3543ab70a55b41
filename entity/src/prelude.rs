//! `SeaORM` Entity, generated prelude

pub use super::acquisition::Entity as Acquisition;
pub use super::app_user::Entity as AppUser;
pub use super::artist::Entity as Artist;
pub use super::artist_subject_matter::Entity as ArtistSubjectMatter;
pub use super::country::Entity as Country;
pub use super::exhibition::Entity as Exhibition;
pub use super::exhibition_piece::Entity as ExhibitionPiece;
pub use super::genre::Entity as Genre;
pub use super::inspector::Entity as Inspector;
pub use super::insurance_policy::Entity as InsurancePolicy;
pub use super::loan::Entity as Loan;
pub use super::loan_piece::Entity as LoanPiece;
pub use super::location::Entity as Location;
pub use super::medium::Entity as Medium;
pub use super::museum::Entity as Museum;
pub use super::piece::Entity as Piece;
pub use super::subgenre::Entity as Subgenre;
pub use super::subject_matter::Entity as SubjectMatter;
pub use super::unit_of_measure::Entity as UnitOfMeasure;
pub use super::user_login::Entity as UserLogin;
pub use super::user_recovery_code::Entity as UserRecoveryCode;
