//! Interactive answers for the teams run, falling back to stdin when nothing
//! is configured.

use std::io::{self, BufRead, Write};

use photojobs_core::BatchId;
use photojobs_ops::{AmbiguityResolver, OpsError, Preconfigured};

/// Uses configured answers first and asks on stderr/stdin otherwise.
pub struct StdinPrompt {
    pub configured: Preconfigured,
}

impl StdinPrompt {
    fn ask(&self, question: &str) -> Result<Option<String>, OpsError> {
        eprint!("{question}");
        let _ = io::stderr().flush();
        let mut line = String::new();
        let read = io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(|e| OpsError::Io {
                path: "<stdin>".into(),
                source: e,
            })?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

impl AmbiguityResolver for StdinPrompt {
    fn select_batches(&mut self, available: &[(BatchId, usize)]) -> Result<Vec<BatchId>, OpsError> {
        if self.configured.batches.is_some() {
            return self.configured.select_batches(available);
        }
        eprintln!("This table contains several batches:");
        for (i, (batch, count)) in available.iter().enumerate() {
            eprintln!("  {}) {batch} ({count} records)", i + 1);
        }
        let Some(answer) = self.ask("Batches to keep (numbers or names, comma-separated; blank = all): ")? else {
            return Err(OpsError::Unanswered {
                question: "which batches to keep".to_string(),
            });
        };
        Ok(parse_batch_answer(&answer, available))
    }

    fn default_team(&mut self, people: &[String]) -> Result<String, OpsError> {
        if self.configured.default_team.is_some() {
            return self.configured.default_team(people);
        }
        eprintln!("{} people have no team:", people.len());
        for person in people {
            eprintln!("  - {person}");
        }
        loop {
            match self.ask("Team name to use for all of them: ")? {
                Some(team) if !team.is_empty() => return Ok(team),
                Some(_) => continue,
                None => {
                    return Err(OpsError::Unanswered {
                        question: "default team".to_string(),
                    })
                }
            }
        }
    }
}

/// Blank or `all` keeps everything; otherwise each entry is a 1-based index
/// or a batch name.
fn parse_batch_answer(answer: &str, available: &[(BatchId, usize)]) -> Vec<BatchId> {
    let answer = answer.trim();
    if answer.is_empty() || answer.eq_ignore_ascii_case("all") {
        return available.iter().map(|(b, _)| b.clone()).collect();
    }
    answer
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|entry| match entry.parse::<usize>() {
            Ok(n) if (1..=available.len()).contains(&n) => Some(available[n - 1].0.clone()),
            Ok(_) => None,
            Err(_) => Some(BatchId::from(entry)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn available() -> Vec<(BatchId, usize)> {
        vec![(BatchId::from("JS10"), 3), (BatchId::from("JS20"), 5)]
    }

    #[test]
    fn blank_answer_keeps_everything() {
        assert_eq!(parse_batch_answer("", &available()).len(), 2);
        assert_eq!(parse_batch_answer("ALL", &available()).len(), 2);
    }

    #[test]
    fn indexes_and_names_mix() {
        assert_eq!(
            parse_batch_answer("2, JS10, 9", &available()),
            vec![BatchId::from("JS20"), BatchId::from("JS10")]
        );
    }

    #[test]
    fn configured_answers_skip_the_prompt() {
        let mut prompt = StdinPrompt {
            configured: Preconfigured {
                batches: Some(vec![BatchId::from("JS10")]),
                default_team: Some("Falcons".into()),
            },
        };
        assert_eq!(
            prompt.select_batches(&available()).unwrap(),
            vec![BatchId::from("JS10")]
        );
        assert_eq!(prompt.default_team(&[]).unwrap(), "Falcons");
    }
}
