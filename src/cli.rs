//! CLI argument types, layered configuration and the run loop for the
//! `noteval` binary. Loads from CLI args, environment (prefix `NOTEVAL_`), and
//! optional config files.

use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use ortho_config::OrthoError;
use serde::Deserialize;
use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    sync::Arc,
};
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    ConfigError, ConfiguredEmbedding, EmbeddingConfig, EvaluationError, Evaluator, Leaderboard,
    Metric, NoteEvaluator, providers::GenerationBackend, rank,
};

/// Command-line arguments for the `noteval` binary.
///
/// Values are loaded from command line arguments, environment variables
/// (prefixed with `NOTEVAL_`), and an optional configuration file.
///
/// # Examples
///
/// Parse flags directly:
/// ```
/// use note_eval::cli::NotevalArgs;
/// use ortho_config::OrthoConfig;
///
/// let args = NotevalArgs::load_from_iter(["noteval", "--json=true", "--reference", "ref.txt"])
///     .expect("load args from CLI iterator");
/// assert!(args.json);
/// assert_eq!(args.reference.as_deref(), Some(std::path::Path::new("ref.txt")));
/// ```
///
/// Load from a configuration file:
/// ```
/// use note_eval::cli::NotevalArgs;
/// use ortho_config::OrthoConfig;
/// use std::io::Write;
/// use tempfile::NamedTempFile;
///
/// let mut file = NamedTempFile::new().expect("create temp file");
/// writeln!(file, "json = true").expect("write config");
/// let path = file.path().to_str().expect("path str");
/// let args = NotevalArgs::load_from_iter(["noteval", "--config-path", path])
///     .expect("load args from config path");
/// assert!(args.json);
/// ```
#[derive(Debug, Deserialize, ortho_config::OrthoConfig)]
#[ortho_config(prefix = "NOTEVAL")]
pub struct NotevalArgs {
    /// Reference note the candidates are scored against.
    pub reference: Option<PathBuf>,

    /// JSON Lines file with one `{"id": ..., "generated": ...}` record per
    /// candidate.
    pub candidates: Option<PathBuf>,

    /// JSON file holding an embedding provider configuration. Semantic
    /// similarity is disabled when absent.
    pub embedding_config: Option<PathBuf>,

    /// Print the leaderboard as JSON rows instead of a text table.
    #[ortho_config(default = false)]
    #[serde(default)]
    pub json: bool,

    /// Optional path to a configuration file.
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl NotevalArgs {
    /// Load configuration solely from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an [`OrthoError`] if any variable cannot be parsed.
    pub fn load_from_env() -> Result<Self, OrthoError> {
        Figment::new()
            .merge(Env::prefixed("NOTEVAL_"))
            .extract()
            .map_err(Into::into)
    }

    /// Load configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an [`OrthoError`] if the file cannot be read or parsed.
    pub fn load_from_config(path: &str) -> Result<Self, OrthoError> {
        Figment::new()
            .merge(Toml::file(path))
            .extract()
            .map_err(Into::into)
    }

    /// Load configuration from environment variables and a file path.
    ///
    /// # Errors
    ///
    /// Returns an [`OrthoError`] if either source contains invalid values.
    pub fn load_from_env_and_config(path: &str) -> Result<Self, OrthoError> {
        Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed("NOTEVAL_"))
            .extract()
            .map_err(Into::into)
    }
}

/// Errors returned by [`run`].
#[derive(Debug, Error)]
pub enum CliError {
    #[error("--{0} is required")]
    MissingArgument(&'static str),
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{path}:{line}: invalid candidate record: {source}")]
    Candidate {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid embedding configuration in {path}: {source}")]
    EmbeddingConfig {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
    #[error("failed to write report: {0}")]
    Write(#[from] io::Error),
    #[error("failed to encode report: {0}")]
    Encode(#[source] serde_json::Error),
}

impl CliError {
    /// Whether the failure comes from invalid configuration rather than from
    /// the inputs or the output stream.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::EmbeddingConfig { .. } | Self::Config(_))
    }
}

/// One generated note awaiting evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CandidateNote {
    /// Model id or any other label for the candidate.
    pub id: String,
    pub generated: String,
}

/// Score every candidate against the reference and write the leaderboard.
///
/// One trailing line terminator is dropped from the reference file, so a
/// file saved with a final newline scores like the same text without it.
/// Candidates with an empty note are skipped with a warning; an empty
/// reference fails the whole run.
///
/// # Errors
///
/// Returns [`CliError`] when a required argument is missing, an input cannot
/// be read or parsed, the embedding provider cannot be built, or the report
/// cannot be written.
pub fn run(args: &NotevalArgs, out: &mut impl Write) -> Result<(), CliError> {
    let reference_path = args
        .reference
        .as_deref()
        .ok_or(CliError::MissingArgument("reference"))?;
    let candidates_path = args
        .candidates
        .as_deref()
        .ok_or(CliError::MissingArgument("candidates"))?;

    let reference = read(reference_path)?;
    let reference = strip_line_ending(&reference);
    if reference.trim().is_empty() {
        return Err(EvaluationError::EmptyReference.into());
    }
    let candidates = load_candidates(candidates_path)?;
    info!(count = candidates.len(), reference = %reference_path.display(), "loaded candidates");

    let config = match args.embedding_config.as_deref() {
        Some(path) => serde_json::from_str(&read(path)?).map_err(|source| {
            CliError::EmbeddingConfig {
                path: path.to_path_buf(),
                source,
            }
        })?,
        None => EmbeddingConfig::Disabled,
    };
    let evaluator = Evaluator::new(Arc::new(ConfiguredEmbedding::from_config(config)?));

    let mut scored = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        match evaluator.evaluate(&candidate.generated, reference) {
            Ok(metrics) => scored.push((candidate.id, metrics)),
            Err(err) => warn!(id = %candidate.id, error = %err, "skipping candidate"),
        }
    }
    let board = rank(scored);

    if args.json {
        serde_json::to_writer_pretty(&mut *out, &board.rows()).map_err(CliError::Encode)?;
        writeln!(out)?;
    } else {
        write_table(&board, out)?;
    }
    Ok(())
}

/// Remove a single trailing `\n` or `\r\n`.
fn strip_line_ending(text: &str) -> &str {
    text.strip_suffix('\n')
        .map_or(text, |line| line.strip_suffix('\r').unwrap_or(line))
}

fn read(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse a JSON Lines file of candidates, ignoring blank lines.
///
/// # Errors
///
/// Returns [`CliError`] if the file cannot be read or a line is not a valid
/// candidate record.
pub fn load_candidates(path: &Path) -> Result<Vec<CandidateNote>, CliError> {
    read(path)?
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str(line).map_err(|source| CliError::Candidate {
                path: path.to_path_buf(),
                line: index + 1,
                source,
            })
        })
        .collect()
}

/// Render the leaderboard as an aligned text table. Best-in-class values are
/// marked with `*`.
///
/// # Errors
///
/// Returns any error raised by `out`.
pub fn write_table(board: &Leaderboard, out: &mut impl Write) -> io::Result<()> {
    write!(out, "{:<5} {:<40} {:<13}", "rank", "model", "backend")?;
    for metric in Metric::ALL {
        write!(out, " {:>9}", metric.label())?;
    }
    writeln!(out, " {:>7} {:>9}", "length", "composite")?;

    for row in board.rows() {
        let backend = GenerationBackend::lookup(&row.id).map_or("-", GenerationBackend::name);
        write!(out, "{:<5} {:<40} {:<13}", row.rank, row.id, backend)?;
        for metric in Metric::ALL {
            let mark = if row.best_in.contains(&metric) { "*" } else { " " };
            write!(out, " {:>8.3}{mark}", metric.value(&row.metrics))?;
        }
        writeln!(
            out,
            " {:>6.2}x {:>9.3}",
            row.metrics.length_ratio, row.composite_score
        )?;
    }

    if let Some(winner) = board.winner() {
        writeln!(out, "best response: {}", winner.id)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MetricResult;
    use rstest::rstest;
    use tempfile::NamedTempFile;

    fn temp_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap_or_else(|e| panic!("create temp file: {e}"));
        file.write_all(contents.as_bytes())
            .unwrap_or_else(|e| panic!("write temp file: {e}"));
        file
    }

    fn args(reference: Option<&Path>, candidates: Option<&Path>, json: bool) -> NotevalArgs {
        NotevalArgs {
            reference: reference.map(Path::to_path_buf),
            candidates: candidates.map(Path::to_path_buf),
            embedding_config: None,
            json,
            config_path: None,
        }
    }

    #[rstest]
    fn loads_candidates_skipping_blank_lines() {
        let file = temp_file("{\"id\":\"a\",\"generated\":\"one\"}\n\n{\"id\":\"b\",\"generated\":\"two\"}\n");
        let candidates =
            load_candidates(file.path()).unwrap_or_else(|e| panic!("load candidates: {e}"));
        let ids: Vec<_> = candidates.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
    }

    #[rstest]
    fn reports_line_of_bad_candidate() {
        let file = temp_file("{\"id\":\"a\",\"generated\":\"one\"}\nnot json\n");
        let Err(err) = load_candidates(file.path()) else {
            panic!("expected parse error");
        };
        assert!(matches!(err, CliError::Candidate { line: 2, .. }));
    }

    #[rstest]
    #[case("note", "note")]
    #[case("note\n", "note")]
    #[case("note\r\n", "note")]
    #[case("note\n\n", "note\n")]
    #[case("", "")]
    fn strips_one_line_ending(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(strip_line_ending(input), expected);
    }

    #[rstest]
    #[expect(clippy::expect_used, reason = "test should fail loudly")]
    fn trailing_newline_in_reference_file_is_ignored() {
        let reference = temp_file("patient reports headache\n");
        let candidates =
            temp_file("{\"id\":\"gpt-4o\",\"generated\":\"patient reports headache\"}\n");
        let mut out = Vec::new();
        run(
            &args(Some(reference.path()), Some(candidates.path()), true),
            &mut out,
        )
        .expect("run succeeds");
        let rows: serde_json::Value = serde_json::from_slice(&out).expect("valid json");
        let row = rows.get(0).expect("one row");
        assert_eq!(row["rouge1"], 1.0);
        assert_eq!(row["rougeL"], 1.0);
        assert_eq!(row["lengthRatio"], 1.0);
    }

    #[rstest]
    fn invalid_embedding_config_is_a_configuration_error() {
        let reference = temp_file("patient reports headache");
        let candidates = temp_file("{\"id\":\"a\",\"generated\":\"one\"}\n");
        let config = temp_file("{\"provider\":\"nonsense\"}");
        let mut cli_args = args(Some(reference.path()), Some(candidates.path()), false);
        cli_args.embedding_config = Some(config.path().to_path_buf());
        let Err(err) = run(&cli_args, &mut Vec::new()) else {
            panic!("expected configuration error");
        };
        assert!(matches!(err, CliError::EmbeddingConfig { .. }));
        assert!(err.is_configuration());
    }

    #[rstest]
    fn input_failures_are_not_configuration_errors() {
        assert!(!CliError::MissingArgument("reference").is_configuration());
        assert!(!CliError::Evaluation(EvaluationError::EmptyReference).is_configuration());
        assert!(CliError::Config(ConfigError::ZeroTimeout).is_configuration());
    }

    #[rstest]
    fn requires_reference_argument() {
        let err = run(&args(None, None, false), &mut Vec::new());
        assert!(matches!(err, Err(CliError::MissingArgument("reference"))));
    }

    #[rstest]
    fn rejects_empty_reference() {
        let reference = temp_file("  \n");
        let candidates = temp_file("{\"id\":\"a\",\"generated\":\"one\"}\n");
        let err = run(
            &args(Some(reference.path()), Some(candidates.path()), false),
            &mut Vec::new(),
        );
        assert!(matches!(
            err,
            Err(CliError::Evaluation(EvaluationError::EmptyReference))
        ));
    }

    #[rstest]
    #[expect(clippy::expect_used, reason = "test should fail loudly")]
    fn writes_ranked_json_rows_and_skips_empty_candidates() {
        let reference = temp_file("patient reports headache");
        let candidates = temp_file(concat!(
            "{\"id\":\"gpt-4o\",\"generated\":\"patient reports mild headache\"}\n",
            "{\"id\":\"gemini-pro\",\"generated\":\"patient reports headache\"}\n",
            "{\"id\":\"local-t5\",\"generated\":\"   \"}\n",
        ));
        let mut out = Vec::new();
        run(
            &args(Some(reference.path()), Some(candidates.path()), true),
            &mut out,
        )
        .expect("run succeeds");
        let rows: serde_json::Value = serde_json::from_slice(&out).expect("valid json");
        let ids: Vec<_> = rows
            .as_array()
            .expect("array of rows")
            .iter()
            .map(|row| row["id"].as_str().expect("id string").to_owned())
            .collect();
        assert_eq!(ids, ["gemini-pro", "gpt-4o"]);
    }

    #[rstest]
    fn table_marks_best_values_and_winner() {
        let metrics = MetricResult {
            rouge1: 0.5,
            rouge_l: 0.5,
            bleu: 0.0,
            semantic: 0.0,
            length_ratio: 1.0,
        };
        let board = rank([("gpt-4o", metrics)]);
        let mut out = Vec::new();
        write_table(&board, &mut out).unwrap_or_else(|e| panic!("write table: {e}"));
        let text = String::from_utf8(out).unwrap_or_else(|e| panic!("utf8: {e}"));
        assert!(text.contains("open_ai"));
        assert!(text.contains("0.500*"));
        assert!(text.contains("0.000 "));
        assert!(text.ends_with("best response: gpt-4o\n"));
    }
}
