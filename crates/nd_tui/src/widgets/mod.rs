pub mod card;
pub mod preferences;
