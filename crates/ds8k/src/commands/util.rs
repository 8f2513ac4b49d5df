//! Shared helpers for command handlers.

use std::str::FromStr;

use serde::Serialize;
use tabled::Tabled;

use ds8k_core::{CoreError, DesiredState, Outcome, Report};

use crate::cli::{GlobalOpts, StateArg};
use crate::error::CliError;
use crate::output;

impl From<StateArg> for DesiredState {
    fn from(state: StateArg) -> Self {
        match state {
            StateArg::Present => DesiredState::Present,
            StateArg::Absent => DesiredState::Absent,
        }
    }
}

/// Parse one user-supplied value, naming the flag on failure.
pub fn parse<T>(field: &str, raw: &str) -> Result<T, CliError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse().map_err(|e: T::Err| CliError::Validation {
        field: field.into(),
        reason: e.to_string(),
    })
}

pub fn parse_all<T>(field: &str, raw: &[String]) -> Result<Vec<T>, CliError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.iter().map(|r| parse(field, r)).collect()
}

/// Print the result of a manager call.
///
/// A failure still prints its `failed: true` report to stdout in the
/// structured formats; the diagnostic goes to stderr either way.
pub fn finish<T, R>(
    global: &GlobalOpts,
    result: Result<Outcome<T>, CoreError>,
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> Result<(), CliError>
where
    T: Serialize,
    R: Tabled,
{
    match result {
        Ok(outcome) => {
            let out = output::render_outcome(global, &outcome, true, to_row, id_fn)?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
        Err(err) => {
            if let Some(out) = output::render_failure(global, &Report::from_error(&err)) {
                output::print_output(&out, global.quiet);
            }
            Err(err.into())
        }
    }
}

/// Print the result of a read-only query.
pub fn show<T, R>(
    global: &GlobalOpts,
    result: Result<Outcome<T>, CoreError>,
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> Result<(), CliError>
where
    T: Serialize,
    R: Tabled,
{
    let outcome = result?;
    let out = output::render_outcome(global, &outcome, false, to_row, id_fn)?;
    output::print_output(&out, global.quiet);
    Ok(())
}
