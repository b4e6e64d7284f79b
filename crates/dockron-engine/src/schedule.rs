//! Cron expression parsing.
//!
//! The engine does not implement cron grammar itself — it delegates to the
//! `cron` crate and only needs a pass/fail oracle plus an upcoming-fire
//! iterator. The same parser validates expressions during job validation and
//! drives trigger tasks later, so "validated" and "schedulable" can never
//! disagree.

use std::str::FromStr;

use cron::Schedule;

use crate::error::EngineError;

/// Parse a crontab expression into a [`Schedule`].
///
/// Operators write standard five-field crontab strings; `cron::Schedule`
/// expects a leading seconds field, so five-field expressions get `0`
/// prepended. Six- and seven-field expressions pass through unchanged.
pub fn parse_schedule(expr: &str) -> Result<Schedule, EngineError> {
    Schedule::from_str(&normalize(expr)).map_err(|e| EngineError::InvalidSchedule {
        expr: expr.to_string(),
        reason: e.to_string(),
    })
}

/// Pass/fail oracle used by the validator.
pub fn is_valid(expr: &str) -> bool {
    parse_schedule(expr).is_ok()
}

fn normalize(expr: &str) -> String {
    let trimmed = expr.trim();
    if trimmed.split_whitespace().count() == 5 {
        format!("0 {trimmed}")
    } else {
        trimmed.to_string()
    }
}
