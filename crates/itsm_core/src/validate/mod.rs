use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{Incident, ValidationWarning};

pub const NUMBER_PREFIX: &str = "INC";
pub const NUMBER_DIGITS: usize = 7;

/// True when `number` is `INC` followed by exactly seven ASCII digits.
pub fn is_well_formed_number(number: &str) -> bool {
    match number.strip_prefix(NUMBER_PREFIX) {
        Some(digits) => digits.len() == NUMBER_DIGITS && digits.bytes().all(|b| b.is_ascii_digit()),
        None => false,
    }
}

/// Validate a single incident:
/// number format, and opened_at <= last_updated_at.
pub fn validate_incident(incident: &Incident) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if !is_well_formed_number(&incident.number) {
        warnings.push(
            ValidationWarning::new(
                "VALIDATION_NUMBER_MALFORMED",
                "Incident number must be INC followed by 7 digits",
            )
            .with_details(format!("number={}", incident.number)),
        );
    }

    if incident.last_updated_at < incident.opened_at {
        warnings.push(
            ValidationWarning::new(
                "VALIDATION_TS_ORDER_VIOLATION",
                "Timestamp order violation: opened_at must be <= last_updated_at",
            )
            .with_details(format!(
                "opened_at={}; last_updated_at={}",
                incident.opened_at, incident.last_updated_at
            )),
        );
    }

    warnings
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IncidentValidationReportItem {
    pub number: String,
    pub warnings: Vec<ValidationWarning>,
}

/// Validate a whole snapshot. Only incidents with at least one warning are reported,
/// ordered by number. Duplicate numbers are flagged on every occurrence.
pub fn validate_batch(incidents: &[Incident]) -> Vec<IncidentValidationReportItem> {
    let mut occurrences: BTreeMap<&str, usize> = BTreeMap::new();
    for inc in incidents {
        *occurrences.entry(inc.number.as_str()).or_default() += 1;
    }

    let mut out = Vec::new();
    for inc in incidents {
        let mut warnings = validate_incident(inc);
        let seen = occurrences.get(inc.number.as_str()).copied().unwrap_or(0);
        if seen > 1 {
            warnings.push(
                ValidationWarning::new(
                    "VALIDATION_NUMBER_DUPLICATE",
                    "Incident number is not unique within the batch",
                )
                .with_details(format!("number={}; occurrences={seen}", inc.number)),
            );
        }
        if !warnings.is_empty() {
            out.push(IncidentValidationReportItem {
                number: inc.number.clone(),
                warnings,
            });
        }
    }

    out.sort_by(|a, b| a.number.cmp(&b.number));
    out
}
