use crate::error::RecordError;
use crate::record::Record;
use serde::{Deserialize, Serialize};

/// Outcome of the external schema validation step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationVerdict {
    pub valid: bool,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl ValidationVerdict {
    pub fn valid() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
        }
    }

    pub fn invalid(errors: Vec<String>) -> Self {
        Self {
            valid: false,
            errors,
        }
    }
}

/// Where a record came from before it reached the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "source")]
pub enum Provenance {
    Direct,
    FixedWidth,
    LegacyPdf { confidence: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acceptance {
    Automatic,
    ManualReview,
}

/// Decides whether a record may be rendered without a human looking at it first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcceptancePolicy {
    pub min_auto_confidence: f32,
}

impl Default for AcceptancePolicy {
    fn default() -> Self {
        Self {
            min_auto_confidence: 0.85,
        }
    }
}

impl AcceptancePolicy {
    pub fn decide(&self, provenance: Provenance) -> Acceptance {
        match provenance {
            Provenance::Direct | Provenance::FixedWidth => Acceptance::Automatic,
            Provenance::LegacyPdf { confidence } if confidence >= self.min_auto_confidence => {
                Acceptance::Automatic
            }
            Provenance::LegacyPdf { .. } => Acceptance::ManualReview,
        }
    }
}

/// A record that passed schema validation. Only these reach the renderer.
#[derive(Debug, Clone)]
pub struct ValidatedRecord {
    record: Record,
    provenance: Provenance,
}

impl ValidatedRecord {
    pub fn accept(record: Record, verdict: &ValidationVerdict) -> Result<Self, RecordError> {
        Self::accept_with_provenance(record, verdict, Provenance::Direct)
    }

    pub fn accept_with_provenance(
        record: Record,
        verdict: &ValidationVerdict,
        provenance: Provenance,
    ) -> Result<Self, RecordError> {
        if !verdict.valid {
            return Err(RecordError::Rejected {
                errors: verdict.errors.clone(),
            });
        }
        Ok(Self { record, provenance })
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    pub fn provenance(&self) -> Provenance {
        self.provenance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> Record {
        Record::from_json_str(r#"{"title":{"number":"T-1"}}"#).unwrap()
    }

    #[test]
    fn test_invalid_verdict_rejects() {
        let verdict = ValidationVerdict::invalid(vec!["missing title".into()]);
        let err = ValidatedRecord::accept(record(), &verdict).unwrap_err();
        match err {
            RecordError::Rejected { errors } => assert_eq!(errors, vec!["missing title"]),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_valid_verdict_accepts() {
        let validated = ValidatedRecord::accept(record(), &ValidationVerdict::valid()).unwrap();
        assert_eq!(validated.provenance(), Provenance::Direct);
    }

    #[test]
    fn test_policy_threshold() {
        let policy = AcceptancePolicy::default();
        assert_eq!(policy.decide(Provenance::FixedWidth), Acceptance::Automatic);
        assert_eq!(
            policy.decide(Provenance::LegacyPdf { confidence: 0.9 }),
            Acceptance::Automatic
        );
        assert_eq!(
            policy.decide(Provenance::LegacyPdf { confidence: 0.5 }),
            Acceptance::ManualReview
        );
    }

    #[test]
    fn test_provenance_from_json() {
        let p: Provenance = serde_json::from_str(r#"{"source":"legacy_pdf","confidence":0.7}"#).unwrap();
        assert_eq!(p, Provenance::LegacyPdf { confidence: 0.7 });
    }
}
