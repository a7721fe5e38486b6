use std::sync::Arc;

use tokio::sync::watch;
use tracing::{Instrument, error, info, info_span};

use crate::{
    config::SearchSettings,
    error::AppError,
    form::{FieldEdit, FormData, PlaceData, PlaceState},
    geocoding::{PlaceSearch, PlaceSuggestion},
    place::PlaceResolver,
    suggest::{SuggestionResolver, SuggestionState},
    timezone::TimezoneLookup,
};

/// One user's pass through the birth-data form.
///
/// Owns the form value and both place resolvers. All transitions go through
/// `&mut self`, so edits apply in the order they are made.
pub struct IntakeSession {
    form: FormData,
    suggestions: SuggestionResolver,
    places: PlaceResolver,
}

impl IntakeSession {
    pub fn new(
        search: Arc<dyn PlaceSearch>,
        timezone: Arc<dyn TimezoneLookup>,
        settings: SearchSettings,
    ) -> Self {
        Self {
            form: FormData::default(),
            suggestions: SuggestionResolver::new(search, settings),
            places: PlaceResolver::new(timezone),
        }
    }

    pub fn form(&self) -> &FormData {
        &self.form
    }

    pub fn suggestions(&self) -> SuggestionState {
        self.suggestions.current()
    }

    pub fn subscribe(&self) -> watch::Receiver<SuggestionState> {
        self.suggestions.subscribe()
    }

    /// Applies a field edit. Editing the place text restarts the autocomplete
    /// and drops a resolved place whose name no longer matches the text.
    pub fn edit(&mut self, edit: FieldEdit) {
        let place_text = match &edit {
            FieldEdit::PlaceText(text) => Some(text.clone()),
            _ => None,
        };

        self.form = self.form.update_field(edit);

        if let Some(text) = place_text {
            if let PlaceState::Resolved(place) = &self.form.place {
                if place.name != text {
                    info!("Place text edited after selection; place is unresolved again");
                    self.form = self.form.invalidate_place();
                }
            }
            self.suggestions.on_place_text_changed(&text);
        }
    }

    /// Confirms a suggestion: clears the list, resolves the timezone and merges
    /// the place into the form. On failure the form is left as it was.
    pub async fn select_place(
        &mut self,
        suggestion: &PlaceSuggestion,
    ) -> Result<PlaceData, AppError> {
        self.suggestions.clear();

        let span = info_span!("select_place", place = %suggestion.display_name);
        let place = match self.places.resolve(suggestion).instrument(span).await {
            Ok(place) => place,
            Err(e) => {
                error!("Failed to resolve {}: {}", suggestion.display_name, e);
                return Err(e);
            }
        };

        self.form = self.form.merge_place(place.clone());
        Ok(place)
    }

    /// Picks the `index`-th (0-based) entry of the current suggestion list.
    pub async fn select_suggestion(&mut self, index: usize) -> Result<PlaceData, AppError> {
        let suggestion = self
            .suggestions
            .current()
            .suggestions
            .get(index)
            .cloned()
            .ok_or_else(|| {
                AppError::Validation(format!("no suggestion number {}", index + 1))
            })?;
        self.select_place(&suggestion).await
    }

    /// Re-sends the last failed place search.
    pub fn retry_search(&mut self) -> bool {
        self.suggestions.retry()
    }

    /// Validates the form and hands back the snapshot to record.
    pub fn submit(&self) -> Result<FormData, AppError> {
        self.form.validate()?;
        info!("Birth data submitted for {}", self.form.name);
        Ok(self.form.clone())
    }
}
