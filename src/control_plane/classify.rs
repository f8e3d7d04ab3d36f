use regex::Regex;

use crate::errors::AppResult;

pub const DEFAULT_CONFLICT_STATUSES: &[u16] = &[409];
pub const DEFAULT_CONFLICT_BODY_PATTERN: &str = r"(?i)already\s+exists";

/// Outcome of a create-index response, decided by status code and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Created,
    AlreadyExists,
    Failed { status: u16, body: String },
}

/// How a duplicate-name rejection is recognised. Control planes disagree on
/// the code, so a status set and a body pattern are both consulted.
#[derive(Debug, Clone)]
pub struct ConflictPolicy {
    statuses: Vec<u16>,
    body_pattern: Option<Regex>,
}

impl ConflictPolicy {
    pub fn new(statuses: Vec<u16>, body_pattern: Option<&str>) -> AppResult<Self> {
        let body_pattern = body_pattern
            .filter(|p| !p.is_empty())
            .map(Regex::new)
            .transpose()?;
        Ok(Self { statuses, body_pattern })
    }

    /// A status listed as a conflict, or any 4xx whose body matches the pattern.
    pub fn is_conflict(&self, status: u16, body: &str) -> bool {
        if self.statuses.contains(&status) {
            return true;
        }
        (400..500).contains(&status)
            && self
                .body_pattern
                .as_ref()
                .is_some_and(|re| re.is_match(body))
    }
}

impl Default for ConflictPolicy {
    fn default() -> Self {
        Self {
            statuses: DEFAULT_CONFLICT_STATUSES.to_vec(),
            body_pattern: Regex::new(DEFAULT_CONFLICT_BODY_PATTERN).ok(),
        }
    }
}

pub fn classify(status: u16, body: &str, conflicts: &ConflictPolicy) -> Classification {
    match status {
        201 => Classification::Created,
        s if conflicts.is_conflict(s, body) => Classification::AlreadyExists,
        s => Classification::Failed {
            status: s,
            body: body.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_status_maps_to_one_outcome() {
        let policy = ConflictPolicy::default();
        for status in [200, 201, 400, 401, 403, 409, 429, 500, 503] {
            let c = classify(status, "", &policy);
            let expected = match status {
                201 => Classification::Created,
                409 => Classification::AlreadyExists,
                s => Classification::Failed { status: s, body: String::new() },
            };
            assert_eq!(c, expected, "status {status}");
        }
    }

    #[test]
    fn body_pattern_detects_conflict_on_other_4xx() {
        let policy = ConflictPolicy::default();
        assert_eq!(
            classify(400, r#"{"message":"index Already Exists"}"#, &policy),
            Classification::AlreadyExists
        );
        // a 5xx mentioning the phrase is still a failure
        assert!(matches!(
            classify(500, "already exists", &policy),
            Classification::Failed { status: 500, .. }
        ));
    }

    #[test]
    fn custom_policy() {
        let policy = ConflictPolicy::new(vec![400], None).unwrap();
        assert_eq!(classify(400, "", &policy), Classification::AlreadyExists);
        assert!(matches!(classify(409, "already exists", &policy), Classification::Failed { .. }));
        assert!(ConflictPolicy::new(vec![], Some("(")).is_err());
    }
}
