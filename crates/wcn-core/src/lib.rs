pub mod config;
pub mod error;
pub mod types;

pub use error::{NotaryError, NotaryResult};
pub use types::{Inscription, InscriptionMode, LoadedFile, PrivacyMode, BRAND_NOTES};
