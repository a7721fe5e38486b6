//! Birth-data form state.
//!
//! Every transition builds a new [`FormData`] from the previous one; nothing is
//! edited in place. Validation only runs on submission.

use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::AppError;

/// Half of the day for the 12-hour birth time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Meridiem {
    #[default]
    AM,
    PM,
}

impl FromStr for Meridiem {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AM" => Ok(Meridiem::AM),
            "PM" => Ok(Meridiem::PM),
            other => Err(AppError::Validation(format!(
                "ampm must be AM or PM, got {:?}",
                other
            ))),
        }
    }
}

/// A place confirmed by the user and enriched with its timezone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceData {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    /// IANA identifier, or `"Unknown"` when the lookup did not supply one
    pub timezone: String,
}

/// Whether the place text has been confirmed through a suggestion pick.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "lowercase")]
pub enum PlaceState {
    #[default]
    Unresolved,
    Resolved(PlaceData),
}

impl PlaceState {
    pub fn resolved(&self) -> Option<&PlaceData> {
        match self {
            PlaceState::Resolved(place) => Some(place),
            PlaceState::Unresolved => None,
        }
    }
}

/// A single field edit, carrying the new value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldEdit {
    Name(String),
    Dob(String),
    BirthHour(String),
    BirthMinute(String),
    AmPm(Meridiem),
    PlaceText(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormData {
    pub name: String,
    /// Date of birth as typed, expected `YYYY-MM-DD`
    pub dob: String,
    pub birth_hour: String,
    pub birth_minute: String,
    pub ampm: Meridiem,
    pub place_text: String,
    pub place: PlaceState,
}

impl FormData {
    /// Returns a copy with exactly the edited field replaced.
    pub fn update_field(&self, edit: FieldEdit) -> FormData {
        let mut next = self.clone();
        match edit {
            FieldEdit::Name(value) => next.name = value,
            FieldEdit::Dob(value) => next.dob = value,
            FieldEdit::BirthHour(value) => next.birth_hour = value,
            FieldEdit::BirthMinute(value) => next.birth_minute = value,
            FieldEdit::AmPm(value) => next.ampm = value,
            FieldEdit::PlaceText(value) => next.place_text = value,
        }
        next
    }

    /// Returns a copy whose place text and place come from `place`.
    pub fn merge_place(&self, place: PlaceData) -> FormData {
        FormData {
            place_text: place.name.clone(),
            place: PlaceState::Resolved(place),
            ..self.clone()
        }
    }

    pub fn invalidate_place(&self) -> FormData {
        FormData {
            place: PlaceState::Unresolved,
            ..self.clone()
        }
    }

    /// Checks the input constraints of every field, reporting the first one broken.
    pub fn validate(&self) -> Result<(), AppError> {
        require("name", &self.name)?;
        require("dob", &self.dob)?;
        require("birthHour", &self.birth_hour)?;
        require("birthMinute", &self.birth_minute)?;
        require("placeText", &self.place_text)?;

        NaiveDate::parse_from_str(self.dob.trim(), "%Y-%m-%d").map_err(|_| {
            AppError::Validation(format!("dob must be a YYYY-MM-DD date, got {:?}", self.dob))
        })?;
        in_range("birthHour", &self.birth_hour, 1, 12)?;
        in_range("birthMinute", &self.birth_minute, 0, 59)?;

        Ok(())
    }
}

fn require(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

fn in_range(field: &str, value: &str, min: u32, max: u32) -> Result<(), AppError> {
    match value.trim().parse::<u32>() {
        Ok(n) if (min..=max).contains(&n) => Ok(()),
        _ => Err(AppError::Validation(format!(
            "{} must be a number from {} to {}, got {:?}",
            field, min, max, value
        ))),
    }
}
