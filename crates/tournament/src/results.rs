//! Tournament results storage and reporting.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{GenerationOutcome, GenerationRecord, TournamentError, TournamentOutcome};

/// Complete tournament results, ready for export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentReport {
    /// Name/description of the tournament.
    pub name: String,
    /// Participating agents, in roster order.
    pub participants: Vec<String>,
    /// One record per generation, including re-run tied generations.
    pub generations: Vec<GenerationRecord>,
    /// Final ranked table, best first.
    pub rankings: Vec<RankEntry>,
}

/// One row of the final ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankEntry {
    pub rank: u32,
    pub identity: String,
    /// Mean score in the last generation this agent participated in.
    pub mean_score: f64,
}

impl TournamentReport {
    pub fn from_outcome(
        name: &str,
        participants: Vec<String>,
        outcome: &TournamentOutcome,
    ) -> Self {
        let rankings = outcome
            .ranking()
            .into_iter()
            .enumerate()
            .map(|(i, identity)| {
                let mean_score = last_mean_of(&outcome.generations, &identity);
                RankEntry {
                    rank: i as u32 + 1,
                    identity,
                    mean_score,
                }
            })
            .collect();
        Self {
            name: name.to_string(),
            participants,
            generations: outcome.generations.clone(),
            rankings,
        }
    }

    /// Save results to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), TournamentError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load results from a JSON file.
    pub fn load(path: &Path) -> Result<Self, TournamentError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Export the per-generation mean-score table as CSV: one row per
    /// generation, one column per participant, `-` where an agent had
    /// already been evicted.
    pub fn export_csv(&self, path: &Path) -> Result<(), TournamentError> {
        let mut csv = String::from("Generation");
        for participant in &self.participants {
            csv.push(',');
            csv.push_str(participant);
        }
        csv.push('\n');

        for record in &self.generations {
            csv.push_str(&record.generation.to_string());
            for participant in &self.participants {
                let cell = record
                    .mean_scores
                    .iter()
                    .find(|(identity, _)| identity == participant)
                    .map(|(_, score)| format!("{score:.2}"))
                    .unwrap_or_else(|| "-".to_string());
                csv.push(',');
                csv.push_str(&cell);
            }
            csv.push('\n');
        }

        std::fs::write(path, csv)?;
        Ok(())
    }

    /// Generate a text report.
    pub fn generate_report(&self) -> String {
        let mut report = String::new();
        report.push_str(&format!("=== Tournament: {} ===\n\n", self.name));
        report.push_str(&format!(
            "Participants: {}\n\n",
            self.participants.join(", ")
        ));

        report.push_str("Generations:\n");
        for record in &self.generations {
            let decision = match &record.outcome {
                GenerationOutcome::Eliminated { identity } => format!("evicted {identity}"),
                GenerationOutcome::Tied { identities } => {
                    format!("tie ({}), re-run", identities.join(", "))
                }
                GenerationOutcome::TieBroken { identity, .. } => {
                    format!("tie broken, evicted {identity}")
                }
            };
            report.push_str(&format!(
                "  gen {:>3} ({} runs): {}\n",
                record.generation, record.runs_completed, decision
            ));
        }

        report.push_str("\nFinal ranking:\n");
        report.push_str(&format!(
            "{:<5} {:<30} {:>10}\n",
            "Rank", "Agent", "Mean"
        ));
        report.push_str(&"-".repeat(47));
        report.push('\n');
        for entry in &self.rankings {
            report.push_str(&format!(
                "{:<5} {:<30} {:>10.2}\n",
                entry.rank, entry.identity, entry.mean_score
            ));
        }

        report
    }

    /// Print report to stdout.
    pub fn print_report(&self) {
        println!("{}", self.generate_report());
    }
}

/// Mean score of `identity` in the last generation that scored it.
fn last_mean_of(generations: &[GenerationRecord], identity: &str) -> f64 {
    generations
        .iter()
        .rev()
        .find_map(|record| {
            record
                .mean_scores
                .iter()
                .find(|(id, _)| id == identity)
                .map(|(_, score)| *score)
        })
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> TournamentReport {
        let generations = vec![
            GenerationRecord {
                generation: 1,
                mean_scores: vec![
                    ("b".to_string(), 3.0),
                    ("c".to_string(), 2.0),
                    ("a".to_string(), 1.0),
                ],
                runs_completed: 4,
                outcome: GenerationOutcome::Eliminated {
                    identity: "a".to_string(),
                },
            },
            GenerationRecord {
                generation: 2,
                mean_scores: vec![("b".to_string(), 3.5), ("c".to_string(), 1.5)],
                runs_completed: 4,
                outcome: GenerationOutcome::Eliminated {
                    identity: "c".to_string(),
                },
            },
        ];
        let outcome = TournamentOutcome {
            eliminated: vec![("a".to_string(), 1), ("c".to_string(), 2)],
            survivors: vec!["b".to_string()],
            champion: Some("b".to_string()),
            generations,
            final_snapshots: Vec::new(),
        };
        TournamentReport::from_outcome(
            "sample",
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
            &outcome,
        )
    }

    #[test]
    fn ranking_reverses_the_elimination_order() {
        let report = sample_report();
        let ranked: Vec<&str> = report
            .rankings
            .iter()
            .map(|entry| entry.identity.as_str())
            .collect();
        assert_eq!(ranked, vec!["b", "c", "a"]);
        assert_eq!(report.rankings[0].rank, 1);
        assert_eq!(report.rankings[0].mean_score, 3.5);
        // `a` keeps the mean from the generation it fell in.
        assert_eq!(report.rankings[2].mean_score, 1.0);
    }

    #[test]
    fn report_text_names_every_decision() {
        let text = sample_report().generate_report();
        assert!(text.contains("evicted a"));
        assert!(text.contains("evicted c"));
        assert!(text.contains("Final ranking"));
    }

    #[test]
    fn csv_marks_absent_agents() {
        let dir = std::env::temp_dir().join("dilemma-report-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("scores.csv");

        sample_report().export_csv(&path).unwrap();
        let csv = std::fs::read_to_string(&path).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("Generation,a,b,c"));
        assert_eq!(lines.next(), Some("1,1.00,3.00,2.00"));
        assert_eq!(lines.next(), Some("2,-,3.50,1.50"));
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = std::env::temp_dir().join("dilemma-report-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("report.json");

        let report = sample_report();
        report.save(&path).unwrap();
        let loaded = TournamentReport::load(&path).unwrap();
        assert_eq!(loaded.name, report.name);
        assert_eq!(loaded.rankings.len(), report.rankings.len());
    }
}
