//! Behaviour tests for single-pair note evaluation.

use note_eval::{EvaluationError, Evaluator, MetricResult, NoteEvaluator, TextProcessor};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;
use thiserror::Error;

mod support;
use support::approx_eq;

#[derive(Debug, Error)]
#[error("no encoder configured")]
struct NoEncoder;

/// Returns the same vector for every input, or fails when unset.
struct ConstantEmbedding(Option<Vec<f32>>);

impl TextProcessor for ConstantEmbedding {
    type Output = Box<[f32]>;
    type Error = NoEncoder;

    fn process(&self, _input: &str) -> Result<Self::Output, Self::Error> {
        self.0.clone().map(Vec::into_boxed_slice).ok_or(NoEncoder)
    }
}

#[derive(Default)]
struct EvaluationContext {
    evaluator: RefCell<Option<Evaluator<ConstantEmbedding>>>,
    result: RefCell<Option<Result<MetricResult, EvaluationError>>>,
}

#[fixture]
fn evaluation_context() -> EvaluationContext {
    EvaluationContext::default()
}

impl EvaluationContext {
    fn evaluate(&self, generated: &str, reference: &str) {
        let binding = self.evaluator.borrow();
        let evaluator = binding
            .as_ref()
            .unwrap_or_else(|| panic!("evaluator to be set"));
        self.result
            .replace(Some(evaluator.evaluate(generated, reference)));
    }
}

#[given("an evaluator without an embedding provider")]
fn given_no_provider(#[from(evaluation_context)] ctx: &EvaluationContext) {
    ctx.evaluator
        .replace(Some(Evaluator::new(ConstantEmbedding(None))));
}

#[given("an evaluator with a constant embedding")]
fn given_constant_provider(#[from(evaluation_context)] ctx: &EvaluationContext) {
    ctx.evaluator
        .replace(Some(Evaluator::new(ConstantEmbedding(Some(vec![0.6, 0.8])))));
}

#[when("evaluating \"{generated}\" against \"{reference}\"")]
#[expect(
    clippy::needless_pass_by_value,
    reason = "BDD macro injects owned value"
)]
fn when_evaluating(
    generated: String,
    reference: String,
    #[from(evaluation_context)] ctx: &EvaluationContext,
) {
    ctx.evaluate(&generated, &reference);
}

#[when("evaluating an empty note against \"{reference}\"")]
#[expect(
    clippy::needless_pass_by_value,
    reason = "BDD macro injects owned value"
)]
fn when_evaluating_empty(reference: String, #[from(evaluation_context)] ctx: &EvaluationContext) {
    ctx.evaluate("", &reference);
}

#[then("the {metric} score is {expected:f64}")]
#[expect(
    clippy::needless_pass_by_value,
    reason = "BDD macro injects owned value"
)]
fn then_score(metric: String, expected: f64, #[from(evaluation_context)] ctx: &EvaluationContext) {
    let Some(Ok(metrics)) = *ctx.result.borrow() else {
        panic!("missing result");
    };
    let actual = match metric.as_str() {
        "rouge1" => metrics.rouge1,
        "rougeL" => metrics.rouge_l,
        "bleu" => metrics.bleu,
        "semantic" => metrics.semantic,
        "lengthRatio" => metrics.length_ratio,
        other => panic!("unknown metric {other}"),
    };
    assert!(
        approx_eq(actual, expected, 1e-9),
        "{metric}: expected {expected}, got {actual}"
    );
}

#[then("the input is rejected")]
fn then_rejected(#[from(evaluation_context)] ctx: &EvaluationContext) {
    assert!(matches!(
        ctx.result.borrow().as_ref(),
        Some(Err(EvaluationError::EmptyGenerated))
    ));
}

#[scenario(path = "tests/features/evaluation.feature", index = 0)]
fn partial_overlap(evaluation_context: EvaluationContext) {
    let _ = evaluation_context;
}

#[scenario(path = "tests/features/evaluation.feature", index = 1)]
fn identical_note(evaluation_context: EvaluationContext) {
    let _ = evaluation_context;
}

#[scenario(path = "tests/features/evaluation.feature", index = 2)]
fn empty_note(evaluation_context: EvaluationContext) {
    let _ = evaluation_context;
}
