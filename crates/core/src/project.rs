//! Project field rules: derived contract duration, schedule defaults and
//! progress-measurement rules.

use chrono::NaiveDate;

use crate::error::CoreError;

pub const DEFAULT_HOURS_PER_DAY: i32 = 8;
pub const DEFAULT_DAYS_PER_WEEK: i32 = 5;

/// Whole days between contract start and PEM, regardless of order.
///
/// `None` when either date is missing.
pub fn contract_duration_days(start: Option<NaiveDate>, pem: Option<NaiveDate>) -> Option<i32> {
    let (start, pem) = (start?, pem?);
    i32::try_from((pem - start).num_days().abs()).ok()
}

/// Validate the writable project fields shared by create and update.
///
/// `None` means the field is not being set.
pub fn validate_project_fields(
    name: Option<&str>,
    hours_per_day: Option<i32>,
    days_per_week: Option<i32>,
) -> Result<(), CoreError> {
    if name.is_some_and(|n| n.trim().is_empty()) {
        return Err(CoreError::Validation("Project name is required".into()));
    }
    if let Some(h) = hours_per_day {
        if !(1..=24).contains(&h) {
            return Err(CoreError::Validation(format!(
                "Working hours per day must be between 1 and 24, got {h}"
            )));
        }
    }
    if let Some(d) = days_per_week {
        if !(1..=7).contains(&d) {
            return Err(CoreError::Validation(format!(
                "Working days per week must be between 1 and 7, got {d}"
            )));
        }
    }
    Ok(())
}

/// Validate a progress-measurement rule: a named revision type and the
/// share of physical and certification progress it accounts for.
pub fn validate_progress_rule(
    revision_type: &str,
    physical_percent: i32,
    certification_percent: i32,
) -> Result<(), CoreError> {
    if revision_type.trim().is_empty() {
        return Err(CoreError::Validation("Revision type is required".into()));
    }
    for (label, value) in [
        ("Physical", physical_percent),
        ("Certification", certification_percent),
    ] {
        if !(0..=100).contains(&value) {
            return Err(CoreError::Validation(format!(
                "{label} percentage must be between 0 and 100, got {value}"
            )));
        }
    }
    Ok(())
}
