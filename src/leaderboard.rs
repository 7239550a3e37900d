//! Ranking of several candidates scored against the same reference.
//!
//! Entries are ordered by composite score, highest first; exact ties keep
//! their input order. Per-metric maxima drive best-in-class highlighting.

use serde::{Deserialize, Serialize};

use crate::api::MetricResult;

/// One of the four quality metrics that take part in ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    Rouge1,
    RougeL,
    Bleu,
    Semantic,
}

impl Metric {
    /// All quality metrics in display order.
    pub const ALL: [Self; 4] = [Self::Rouge1, Self::RougeL, Self::Bleu, Self::Semantic];

    /// Read this metric from a result.
    #[must_use]
    pub const fn value(self, result: &MetricResult) -> f64 {
        match self {
            Self::Rouge1 => result.rouge1,
            Self::RougeL => result.rouge_l,
            Self::Bleu => result.bleu,
            Self::Semantic => result.semantic,
        }
    }

    /// Column label used in reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Rouge1 => "ROUGE-1",
            Self::RougeL => "ROUGE-L",
            Self::Bleu => "BLEU",
            Self::Semantic => "Semantic",
        }
    }
}

/// A scored candidate with its composite score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub id: String,
    pub result: MetricResult,
    pub composite_score: f64,
}

/// Highest value of each quality metric across a set of entries.
///
/// Every field is `0.0` for an empty set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricBests {
    pub rouge1: f64,
    pub rouge_l: f64,
    pub bleu: f64,
    pub semantic: f64,
}

impl MetricBests {
    fn over<'a>(results: impl IntoIterator<Item = &'a MetricResult>) -> Self {
        results.into_iter().fold(Self::default(), |best, r| Self {
            rouge1: best.rouge1.max(r.rouge1),
            rouge_l: best.rouge_l.max(r.rouge_l),
            bleu: best.bleu.max(r.bleu),
            semantic: best.semantic.max(r.semantic),
        })
    }

    /// The best value recorded for `metric`.
    #[must_use]
    pub const fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Rouge1 => self.rouge1,
            Metric::RougeL => self.rouge_l,
            Metric::Bleu => self.bleu,
            Metric::Semantic => self.semantic,
        }
    }

    /// Whether `result` holds the best value for `metric`. A best of zero
    /// never counts.
    #[must_use]
    #[expect(clippy::float_cmp, reason = "bests are copies of entry values")]
    pub fn is_best(&self, result: &MetricResult, metric: Metric) -> bool {
        let best = self.get(metric);
        best > 0.0 && metric.value(result) == best
    }
}

/// Ranked candidates and their per-metric bests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
    pub bests: MetricBests,
}

/// Flat export record for one ranked entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardRow {
    /// Position starting at 1.
    pub rank: usize,
    pub id: String,
    #[serde(flatten)]
    pub metrics: MetricResult,
    pub composite_score: f64,
    pub best_in: Vec<Metric>,
    pub winner: bool,
    pub length_calibrated: bool,
}

/// Rank scored candidates by composite score.
///
/// # Examples
///
/// ```
/// use note_eval::MetricResult;
/// use note_eval::leaderboard::rank;
///
/// let uniform = |v| MetricResult { rouge1: v, rouge_l: v, bleu: v, semantic: v, length_ratio: 1.0 };
/// let board = rank([("a", uniform(0.9)), ("b", uniform(0.7)), ("c", uniform(0.9))]);
/// let order: Vec<_> = board.entries.iter().map(|e| e.id.as_str()).collect();
/// assert_eq!(order, ["a", "c", "b"]);
/// ```
pub fn rank<I, S>(entries: I) -> Leaderboard
where
    I: IntoIterator<Item = (S, MetricResult)>,
    S: Into<String>,
{
    let mut entries: Vec<LeaderboardEntry> = entries
        .into_iter()
        .map(|(id, result)| LeaderboardEntry {
            id: id.into(),
            composite_score: result.composite(),
            result,
        })
        .collect();
    let bests = MetricBests::over(entries.iter().map(|e| &e.result));
    entries.sort_by(|a, b| b.composite_score.total_cmp(&a.composite_score));
    Leaderboard { entries, bests }
}

impl Leaderboard {
    /// The top-ranked entry, if any.
    #[must_use]
    pub fn winner(&self) -> Option<&LeaderboardEntry> {
        self.entries.first()
    }

    /// Whether `entry` is best in class for `metric`.
    #[must_use]
    pub fn is_best(&self, entry: &LeaderboardEntry, metric: Metric) -> bool {
        self.bests.is_best(&entry.result, metric)
    }

    /// Flatten the board into export rows in ranked order.
    #[must_use]
    pub fn rows(&self) -> Vec<LeaderboardRow> {
        self.entries
            .iter()
            .enumerate()
            .map(|(index, entry)| LeaderboardRow {
                rank: index + 1,
                id: entry.id.clone(),
                metrics: entry.result,
                composite_score: entry.composite_score,
                best_in: Metric::ALL
                    .into_iter()
                    .filter(|&metric| self.is_best(entry, metric))
                    .collect(),
                winner: index == 0,
                length_calibrated: entry.result.is_length_calibrated(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::support::approx_eq;
    use rstest::rstest;

    fn result(rouge1: f64, rouge_l: f64, bleu: f64, semantic: f64) -> MetricResult {
        MetricResult {
            rouge1,
            rouge_l,
            bleu,
            semantic,
            length_ratio: 1.0,
        }
    }

    #[rstest]
    fn empty_board_has_zero_bests_and_no_winner() {
        let board = rank(Vec::<(String, MetricResult)>::new());
        assert!(board.entries.is_empty());
        assert_eq!(board.bests, MetricBests::default());
        assert!(board.winner().is_none());
        assert!(board.rows().is_empty());
    }

    #[rstest]
    fn computes_per_metric_bests() {
        let board = rank([
            ("a", result(0.9, 0.1, 0.2, 0.3)),
            ("b", result(0.1, 0.8, 0.2, 0.7)),
        ]);
        assert_eq!(
            board.bests,
            MetricBests {
                rouge1: 0.9,
                rouge_l: 0.8,
                bleu: 0.2,
                semantic: 0.7,
            }
        );
    }

    #[rstest]
    fn ties_on_a_metric_mark_every_holder() {
        let board = rank([
            ("a", result(0.5, 0.1, 0.2, 0.3)),
            ("b", result(0.5, 0.2, 0.1, 0.3)),
        ]);
        let rows = board.rows();
        assert!(rows.iter().all(|row| row.best_in.contains(&Metric::Rouge1)));
        assert!(rows.iter().all(|row| row.best_in.contains(&Metric::Semantic)));
    }

    #[rstest]
    fn zero_maximum_marks_nobody() {
        let board = rank([("a", result(0.5, 0.5, 0.0, 0.5)), ("b", result(0.4, 0.4, 0.0, 0.4))]);
        assert!(board
            .entries
            .iter()
            .all(|entry| !board.is_best(entry, Metric::Bleu)));
    }

    #[rstest]
    fn rows_are_ranked_from_one() {
        let board = rank([
            ("low", result(0.1, 0.1, 0.1, 0.1)),
            ("high", result(0.9, 0.9, 0.9, 0.9)),
        ]);
        let rows = board.rows();
        let [first, second] = rows.as_slice() else {
            panic!("expected two rows, got {}", rows.len());
        };
        assert_eq!((first.rank, first.id.as_str(), first.winner), (1, "high", true));
        assert_eq!((second.rank, second.id.as_str(), second.winner), (2, "low", false));
        assert_eq!(first.best_in, Metric::ALL);
        assert!(second.best_in.is_empty());
        assert!(approx_eq(first.composite_score, 0.9, 1e-12));
    }

    #[rstest]
    #[expect(clippy::expect_used, reason = "test should fail loudly")]
    fn board_serialises_with_camel_case_keys() {
        let board = rank([("gpt-4o", result(1.0, 0.5, 0.25, 0.25))]);
        let json = serde_json::to_value(&board).expect("serialise board");
        assert_eq!(
            json,
            serde_json::json!({
                "entries": [{
                    "id": "gpt-4o",
                    "result": {
                        "rouge1": 1.0,
                        "rougeL": 0.5,
                        "bleu": 0.25,
                        "semantic": 0.25,
                        "lengthRatio": 1.0
                    },
                    "compositeScore": 0.5
                }],
                "bests": {
                    "rouge1": 1.0,
                    "rougeL": 0.5,
                    "bleu": 0.25,
                    "semantic": 0.25
                }
            })
        );
    }

    #[rstest]
    #[expect(clippy::expect_used, reason = "test should fail loudly")]
    fn rows_export_flat_json() {
        let board = rank([("gpt-4o", result(1.0, 0.5, 0.25, 0.25))]);
        let json = serde_json::to_value(board.rows()).expect("serialise rows");
        assert_eq!(
            json,
            serde_json::json!([{
                "rank": 1,
                "id": "gpt-4o",
                "rouge1": 1.0,
                "rougeL": 0.5,
                "bleu": 0.25,
                "semantic": 0.25,
                "lengthRatio": 1.0,
                "compositeScore": 0.5,
                "bestIn": ["rouge1", "rougeL", "bleu", "semantic"],
                "winner": true,
                "lengthCalibrated": true
            }])
        );
    }
}
