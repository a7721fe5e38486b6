//! Line-oriented front end: turns typed lines into session calls and writes
//! every outcome back to the user.

use std::io::Write;

use tracing::{error, info, warn};

use crate::{
    command::{Command, HELP},
    error::AppError,
    session::IntakeSession,
    suggest::SuggestionState,
};

pub const ACKNOWLEDGEMENT: &str = "Birth data saved. Ready for horoscope calculation!";

/// Whether the input loop should keep reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Parses and runs one input line. Bad input is reported on `out` and the loop
/// goes on; only a failure to write the report is returned as an error.
pub async fn run_line(
    session: &mut IntakeSession,
    line: &str,
    out: &mut (impl Write + Send),
) -> Result<Flow, AppError> {
    if line.trim().is_empty() {
        return Ok(Flow::Continue);
    }

    let command = match line.parse::<Command>() {
        Ok(command) => command,
        Err(e) => {
            warn!("{}", e);
            writeln!(out, "{}. Type `help` for commands", e)?;
            return Ok(Flow::Continue);
        }
    };

    if command == Command::Exit {
        info!("User wants to exit");
        return Ok(Flow::Exit);
    }

    handle(session, command, out).await?;
    Ok(Flow::Continue)
}

pub async fn handle(
    session: &mut IntakeSession,
    command: Command,
    out: &mut (impl Write + Send),
) -> Result<(), AppError> {
    match command {
        Command::Edit(edit) => session.edit(edit),
        Command::Pick(n) => match session.select_suggestion(n - 1).await {
            Ok(place) => writeln!(
                out,
                "Selected {} ({}, {}), timezone {}",
                place.name, place.lat, place.lon, place.timezone
            )?,
            Err(e) => {
                error!("Could not use that place: {}", e);
                writeln!(out, "Could not use that place: {}", e)?;
            }
        },
        Command::Retry => {
            if !session.retry_search() {
                writeln!(out, "Nothing to retry. Type `help` for commands")?;
            }
        }
        Command::Show => writeln!(out, "{}", serde_json::to_string_pretty(session.form())?)?,
        Command::Submit => match session.submit() {
            Ok(record) => {
                writeln!(
                    out,
                    "Horoscope input object: {}",
                    serde_json::to_string_pretty(&record)?
                )?;
                writeln!(out, "{}", ACKNOWLEDGEMENT)?;
            }
            Err(e) => {
                warn!("{}", e);
                writeln!(out, "Cannot submit yet: {}", e)?;
            }
        },
        Command::Help => writeln!(out, "{}", HELP)?,
        Command::Exit => {}
    }
    out.flush()?;
    Ok(())
}

/// Draws the area under the place input, the way the page redraws it.
pub fn render_suggestions(state: &SuggestionState, out: &mut impl Write) -> Result<(), AppError> {
    if state.loading {
        writeln!(out, "Searching...")?;
    } else if let Some(message) = &state.error {
        writeln!(out, "Place search failed: {}. Type `retry` to try again", message)?;
    } else {
        for (i, suggestion) in state.suggestions.iter().enumerate() {
            writeln!(out, "  {}. {}", i + 1, suggestion.display_name)?;
        }
    }
    out.flush()?;
    Ok(())
}

pub fn prompt(out: &mut impl Write) -> Result<(), AppError> {
    write!(out, "> ")?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::SearchSettings,
        geocoding::{PlaceSearch, PlaceSuggestion},
        timezone::{TimezoneLookup, TimezoneResponse},
    };
    use futures::future::BoxFuture;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    struct NoPlaces;

    impl PlaceSearch for NoPlaces {
        fn search<'a>(
            &'a self,
            _query: &'a str,
            _limit: usize,
        ) -> BoxFuture<'a, Result<Vec<PlaceSuggestion>, AppError>> {
            Box::pin(async { Ok(Vec::new()) })
        }
    }

    struct Utc;

    impl TimezoneLookup for Utc {
        fn lookup(&self, _lat: f64, _lon: f64) -> BoxFuture<'_, Result<TimezoneResponse, AppError>> {
            Box::pin(async {
                Ok(TimezoneResponse {
                    timezone_id: Some("Etc/UTC".to_string()),
                    status: None,
                })
            })
        }
    }

    fn session() -> IntakeSession {
        IntakeSession::new(Arc::new(NoPlaces), Arc::new(Utc), SearchSettings::default())
    }

    async fn run(session: &mut IntakeSession, lines: &[&str]) -> String {
        let mut out = Vec::new();
        for line in lines {
            run_line(session, line, &mut out).await.unwrap();
        }
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn incomplete_submit_explains_what_is_missing() {
        let mut session = session();

        let printed = run(&mut session, &["name Ada", "submit"]).await;

        assert_eq!(printed, "Cannot submit yet: Invalid form: dob is required\n");
    }

    #[tokio::test]
    async fn out_of_range_hour_is_reported() {
        let mut session = session();

        let printed = run(
            &mut session,
            &["name Ada", "dob 1990-04-12", "hour 99", "minute 5", "place Rome", "submit"],
        )
        .await;

        assert!(printed.starts_with("Cannot submit yet: Invalid form: birthHour must be a number from 1 to 12"));
        assert!(!printed.contains(ACKNOWLEDGEMENT));
    }

    #[tokio::test]
    async fn unknown_command_points_to_help() {
        let mut session = session();

        let printed = run(&mut session, &["horoscope please"]).await;

        assert_eq!(
            printed,
            "Unknown command: horoscope please. Type `help` for commands\n"
        );
    }

    #[tokio::test]
    async fn retry_without_failure_says_so() {
        let mut session = session();
        let printed = run(&mut session, &["retry"]).await;
        assert_eq!(printed, "Nothing to retry. Type `help` for commands\n");
    }

    #[tokio::test]
    async fn picking_without_suggestions_is_reported() {
        let mut session = session();
        let printed = run(&mut session, &["pick 1"]).await;
        assert_eq!(printed, "Could not use that place: Invalid form: no suggestion number 1\n");
    }

    #[tokio::test]
    async fn complete_submit_prints_record_and_acknowledgement() {
        let mut session = session();

        let printed = run(
            &mut session,
            &["name Ada", "dob 1990-04-12", "hour 7", "minute 45", "ampm PM", "place Rome", "submit"],
        )
        .await;

        assert!(printed.starts_with("Horoscope input object: {"));
        assert!(printed.contains("\"birthMinute\": \"45\""));
        assert!(printed.ends_with(&format!("{}\n", ACKNOWLEDGEMENT)));
    }

    #[tokio::test]
    async fn exit_stops_the_loop() {
        let mut session = session();
        let mut out = Vec::new();
        assert_eq!(run_line(&mut session, "exit", &mut out).await.unwrap(), Flow::Exit);
        assert_eq!(run_line(&mut session, "   ", &mut out).await.unwrap(), Flow::Continue);
        assert!(out.is_empty());
    }

    #[test]
    fn renders_each_suggestion_state() {
        let mut out = Vec::new();
        render_suggestions(
            &SuggestionState {
                loading: true,
                ..SuggestionState::default()
            },
            &mut out,
        )
        .unwrap();
        render_suggestions(
            &SuggestionState {
                error: Some("HTTP request error: timed out".to_string()),
                ..SuggestionState::default()
            },
            &mut out,
        )
        .unwrap();
        render_suggestions(
            &SuggestionState {
                suggestions: vec![PlaceSuggestion {
                    display_name: "Rome, Lazio, Italy".to_string(),
                    lat: "41.8933".to_string(),
                    lon: "12.4829".to_string(),
                }],
                ..SuggestionState::default()
            },
            &mut out,
        )
        .unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Searching...\n\
             Place search failed: HTTP request error: timed out. Type `retry` to try again\n  \
             1. Rome, Lazio, Italy\n"
        );
    }

    #[test]
    fn write_failures_surface_as_io_errors() {
        struct Closed;

        impl Write for Closed {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let err = prompt(&mut Closed).unwrap_err();
        assert!(matches!(err, AppError::IoError(_)));
    }
}
