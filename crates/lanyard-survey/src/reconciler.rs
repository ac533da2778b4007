use crate::plan::DesiredQuestion;
use lanyard_api::{BackendClient, RetryPolicy, SessionContext};
use serde::{Deserialize, Serialize};

/// A question that was created, with the ids of the options that made it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreatedQuestion {
    pub question_id: u64,
    pub option_ids: Vec<u64>,
}

/// Outcome of one reconciliation run. Partial success is normal: `created`
/// lists what made it, `errors` lists one message per question that failed
/// at any step.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReconcileSummary {
    pub created: Vec<CreatedQuestion>,
    pub errors: Vec<String>,
}

impl ReconcileSummary {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Replaces a survey's question tree with a desired list, delete-then-create.
#[derive(Clone)]
pub struct SurveyReconciler {
    client: BackendClient,
    policy: RetryPolicy,
}

impl SurveyReconciler {
    pub fn new(client: BackendClient) -> Self {
        Self::with_policy(client, RetryPolicy::default())
    }

    pub fn with_policy(client: BackendClient, policy: RetryPolicy) -> Self {
        Self { client, policy }
    }

    /// Run one reconciliation. Never aborts early: fetch and delete failures
    /// are logged and tolerated, creation failures are collected per
    /// question, and the summary reports both sides.
    pub async fn reconcile(
        &self,
        ctx: &SessionContext,
        survey_id: u64,
        desired: &[DesiredQuestion],
    ) -> ReconcileSummary {
        let existing = match self.client.survey_tree(ctx, survey_id).await {
            Ok(tree) => tree.questions,
            Err(err) => {
                tracing::warn!(survey_id, error = %err, "survey tree fetch failed, assuming empty");
                Vec::new()
            }
        };

        // Order floor comes from the PRE-delete snapshot: deletes may be soft
        // and the backend keeps (survey, order) unique against retired rows.
        let mut next_order = existing
            .iter()
            .map(|question| question.order)
            .max()
            .map_or(1, |max| max + 1);

        for question in &existing {
            if let Err(err) = self.client.delete_question(ctx, question.id).await {
                tracing::warn!(
                    survey_id,
                    question_id = question.id,
                    error = %err,
                    "question delete failed, continuing"
                );
            }
        }

        let mut summary = ReconcileSummary::default();
        for question in desired {
            if question.is_blank() {
                continue;
            }
            match self
                .create_question(ctx, survey_id, question, &mut next_order)
                .await
            {
                Ok(question_id) => {
                    let entry = self
                        .create_options(ctx, question_id, question, &mut summary.errors)
                        .await;
                    summary.created.push(entry);
                }
                Err(message) => summary.errors.push(message),
            }
        }
        tracing::info!(
            survey_id,
            created = summary.created.len(),
            errors = summary.errors.len(),
            "survey reconciliation finished"
        );
        summary
    }

    /// Create one question, walking the order number past collisions.
    ///
    /// Every attempted order is treated as burned whether or not the attempt
    /// succeeded as a collision; the counter never steps back, so later
    /// questions skip the contested range instead of re-fighting it.
    async fn create_question(
        &self,
        ctx: &SessionContext,
        survey_id: u64,
        question: &DesiredQuestion,
        next_order: &mut u32,
    ) -> Result<u64, String> {
        let mut order = *next_order;
        let mut attempt = 1u32;
        loop {
            match self
                .client
                .create_question(
                    ctx,
                    survey_id,
                    order,
                    &question.text,
                    question.kind,
                    question.required,
                )
                .await
            {
                Ok(created) => {
                    *next_order = order + 1;
                    return Ok(created.id);
                }
                Err(err) if self.policy.is_retryable(&err) => {
                    if attempt >= self.policy.max_attempts {
                        *next_order = order + 1;
                        return Err(format!(
                            "question {:?}: gave up after {attempt} colliding orders: {err}",
                            question.text
                        ));
                    }
                    tracing::debug!(order, error = %err, "question order collided, retrying");
                    attempt += 1;
                    order += 1;
                }
                Err(err) => {
                    return Err(format!("question {:?}: {err}", question.text));
                }
            }
        }
    }

    /// Create the question's options in display order, sequence starting
    /// at 1. One failure records one error and abandons the remaining
    /// options; ids created so far stay in the entry.
    async fn create_options(
        &self,
        ctx: &SessionContext,
        question_id: u64,
        question: &DesiredQuestion,
        errors: &mut Vec<String>,
    ) -> CreatedQuestion {
        let mut option_ids = Vec::new();
        for (index, value) in question.option_values().into_iter().enumerate() {
            let seq = index as u32 + 1;
            match self.client.create_option(ctx, question_id, seq, value).await {
                Ok(option) => option_ids.push(option.id),
                Err(err) => {
                    errors.push(format!(
                        "question {:?}: option {value:?}: {err}",
                        question.text
                    ));
                    break;
                }
            }
        }
        CreatedQuestion {
            question_id,
            option_ids,
        }
    }
}
