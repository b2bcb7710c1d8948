//! Answers for the questions a teams run may need to ask.

use photojobs_core::BatchId;

use crate::error::OpsError;

/// Supplies the answers to the two suspend points of a teams run.
///
/// Each method is called at most once per run and its answer applies to the
/// whole run.
pub trait AmbiguityResolver {
    /// Pick which batches to keep. `available` lists each batch with its
    /// record count, in batch order.
    fn select_batches(&mut self, available: &[(BatchId, usize)]) -> Result<Vec<BatchId>, OpsError>;

    /// One team name for everyone in `people` (display names).
    fn default_team(&mut self, people: &[String]) -> Result<String, OpsError>;
}

/// Answers fixed ahead of time from flags or the config file.
///
/// A batch list containing `all` (any case) keeps every batch. A missing
/// answer is [`OpsError::Unanswered`].
#[derive(Debug, Clone, Default)]
pub struct Preconfigured {
    pub batches: Option<Vec<BatchId>>,
    pub default_team: Option<String>,
}

impl AmbiguityResolver for Preconfigured {
    fn select_batches(&mut self, available: &[(BatchId, usize)]) -> Result<Vec<BatchId>, OpsError> {
        let Some(batches) = &self.batches else {
            return Err(OpsError::Unanswered {
                question: format!(
                    "which batches to keep ({} found); pass --batches or set `batches`",
                    available.len()
                ),
            });
        };
        if batches.iter().any(|b| b.as_str().eq_ignore_ascii_case("all")) {
            return Ok(available.iter().map(|(b, _)| b.clone()).collect());
        }
        Ok(batches.clone())
    }

    fn default_team(&mut self, people: &[String]) -> Result<String, OpsError> {
        match self.default_team.as_deref().map(str::trim) {
            Some(team) if !team.is_empty() => Ok(team.to_string()),
            _ => Err(OpsError::Unanswered {
                question: format!(
                    "default team for {} people without one; pass --default-team or set `default_team`",
                    people.len()
                ),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unanswered_questions_are_errors() {
        let mut resolver = Preconfigured::default();
        assert!(matches!(
            resolver.default_team(&["Brielle Allen".into()]),
            Err(OpsError::Unanswered { .. })
        ));
        assert!(matches!(
            resolver.select_batches(&[(BatchId::from("JS10"), 2)]),
            Err(OpsError::Unanswered { .. })
        ));
    }

    #[test]
    fn all_keeps_every_batch() {
        let mut resolver = Preconfigured {
            batches: Some(vec![BatchId::from("ALL")]),
            default_team: Some(" Falcons ".into()),
        };
        let available = [(BatchId::from("JS10"), 2), (BatchId::from("JS20"), 4)];
        assert_eq!(
            resolver.select_batches(&available).unwrap(),
            vec![BatchId::from("JS10"), BatchId::from("JS20")]
        );
        assert_eq!(resolver.default_team(&[]).unwrap(), "Falcons");
    }
}
