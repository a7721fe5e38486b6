//! Birth-data intake for a horoscope application.
//!
//! Collects name, date, time and place of birth. Place text is autocompleted
//! through a debounced geocoding search, and the picked place is resolved to
//! coordinates and a timezone before it is merged into the form.

pub mod command;
pub mod config;
pub mod error;
pub mod form;
pub mod geocoding;
pub mod place;
pub mod session;
pub mod suggest;
pub mod terminal;
pub mod timezone;

pub use error::AppError;
pub use form::{FieldEdit, FormData, Meridiem, PlaceData, PlaceState};
pub use geocoding::PlaceSuggestion;
pub use session::IntakeSession;
pub use suggest::SuggestionState;
