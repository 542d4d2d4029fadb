//! Pipeline records: one deal's elapsed time and whether it resolved.

use serde::{Deserialize, Serialize};

use crate::error::{InvalidReason, SurvivalError};

/// A single deal observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PipelineRecord {
    /// Elapsed time in the pipeline (days, weeks, ...)
    pub duration: f64,
    /// `true` if the deal reached a terminal outcome, `false` if still open
    pub event_observed: bool,
}

impl PipelineRecord {
    pub fn new(duration: f64, event_observed: bool) -> Self {
        Self {
            duration,
            event_observed,
        }
    }

    /// A deal that resolved after `duration`.
    pub fn event(duration: f64) -> Self {
        Self::new(duration, true)
    }

    /// A deal still open after `duration` (right-censored).
    pub fn censored(duration: f64) -> Self {
        Self::new(duration, false)
    }

    /// Build a record from a textual event flag, as found in uploaded tables.
    ///
    /// `index` is only used to label the error.
    pub fn from_flag(index: usize, duration: f64, flag: &str) -> Result<Self, SurvivalError> {
        let event_observed = parse_event_flag(flag).ok_or_else(|| {
            SurvivalError::invalid(index, InvalidReason::UnrecognizedEventFlag(flag.to_string()))
        })?;
        Ok(Self::new(duration, event_observed))
    }

    /// Check the record on its own.
    pub fn check(&self) -> Result<(), InvalidReason> {
        if !self.duration.is_finite() {
            return Err(InvalidReason::NonFiniteDuration);
        }
        if self.duration < 0.0 {
            return Err(InvalidReason::NegativeDuration(self.duration));
        }
        Ok(())
    }
}

/// Validate a whole dataset, reporting the first offending index.
pub fn validate(records: &[PipelineRecord]) -> Result<(), SurvivalError> {
    if records.is_empty() {
        return Err(SurvivalError::EmptyInput);
    }
    for (index, record) in records.iter().enumerate() {
        record
            .check()
            .map_err(|reason| SurvivalError::invalid(index, reason))?;
    }
    Ok(())
}

/// Won and lost are both terminal outcomes; only open deals are censored.
fn parse_event_flag(flag: &str) -> Option<bool> {
    match flag.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "t" | "yes" | "y" | "won" | "lost" | "closed" => Some(true),
        "0" | "false" | "f" | "no" | "n" | "open" | "censored" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_parsing() {
        assert!(PipelineRecord::from_flag(0, 3.0, "won").unwrap().event_observed);
        assert!(PipelineRecord::from_flag(0, 3.0, " Lost ").unwrap().event_observed);
        assert!(!PipelineRecord::from_flag(0, 3.0, "open").unwrap().event_observed);
        assert!(!PipelineRecord::from_flag(0, 3.0, "0").unwrap().event_observed);
    }

    #[test]
    fn test_unrecognized_flag_names_index() {
        let err = PipelineRecord::from_flag(4, 3.0, "maybe").unwrap_err();
        assert_eq!(
            err,
            SurvivalError::InvalidRecord {
                index: 4,
                reason: InvalidReason::UnrecognizedEventFlag("maybe".to_string()),
            }
        );
    }

    #[test]
    fn test_validate_rejects_first_bad_record() {
        let records = vec![
            PipelineRecord::event(1.0),
            PipelineRecord::censored(-2.0),
            PipelineRecord::event(-3.0),
        ];
        match validate(&records) {
            Err(SurvivalError::InvalidRecord { index, reason }) => {
                assert_eq!(index, 1);
                assert_eq!(reason, InvalidReason::NegativeDuration(-2.0));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_nan() {
        let records = vec![PipelineRecord::event(f64::NAN)];
        assert!(matches!(
            validate(&records),
            Err(SurvivalError::InvalidRecord {
                index: 0,
                reason: InvalidReason::NonFiniteDuration
            })
        ));
    }

    #[test]
    fn test_validate_empty() {
        assert_eq!(validate(&[]), Err(SurvivalError::EmptyInput));
    }
}
