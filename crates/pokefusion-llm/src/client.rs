//! Typed generation and judgment clients
//!
//! [`GenerativeClient`] owns the backend plus the two model identifiers
//! and hides the call-parse-validate-retry cycle. A retry re-runs the
//! whole cycle: an invalid reply is as retryable as a dropped connection.

use crate::json::extract_json_block;
use crate::prompts::{build_generator_prompt, build_judge_prompt};
use crate::types::{LlmBackend, LlmInvocation, Message};
use pokefusion_schema::{validate_as, Schema};
use pokefusion_schema::schemas::{battle_judgment_schema, fusion_child_schema};
use pokefusion_utils::error::LlmError;
use pokefusion_utils::retry::{with_retry, AttemptError, RetryOptions};
use pokefusion_utils::types::{BattleJudgment, FusionChild, ParentRecord};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Default deadline for one generative call.
pub const LLM_TIMEOUT: Duration = Duration::from_secs(60);

/// High-level client for the two generative operations.
#[derive(Clone)]
pub struct GenerativeClient {
    backend: Arc<dyn LlmBackend>,
    generator_model: String,
    judge_model: String,
    retry: RetryOptions,
    timeout: Duration,
}

impl GenerativeClient {
    #[must_use]
    pub fn new(
        backend: Arc<dyn LlmBackend>,
        generator_model: impl Into<String>,
        judge_model: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            generator_model: generator_model.into(),
            judge_model: judge_model.into(),
            retry: RetryOptions::default(),
            timeout: LLM_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_retry_options(mut self, retry: RetryOptions) -> Self {
        self.retry = retry;
        self
    }

    /// Override the per-call deadline ([`LLM_TIMEOUT`] by default).
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Synthesize a fusion child from two parents using the generator
    /// model.
    ///
    /// # Errors
    ///
    /// Returns the last per-attempt [`LlmError`] once the retry budget is
    /// exhausted, or immediately for misconfiguration.
    pub async fn generate_child(
        &self,
        parent1: &ParentRecord,
        parent2: &ParentRecord,
    ) -> Result<FusionChild, LlmError> {
        let prompt = build_generator_prompt(parent1, parent2);
        debug!(
            parent1 = %parent1.name,
            parent2 = %parent2.name,
            model = %self.generator_model,
            "generating fusion child"
        );
        self.call_validated(&prompt, &self.generator_model, &fusion_child_schema())
            .await
    }

    /// Judge a battle between two fusion children using the judge model.
    ///
    /// # Errors
    ///
    /// Returns the last per-attempt [`LlmError`] once the retry budget is
    /// exhausted, or immediately for misconfiguration.
    pub async fn judge_battle(
        &self,
        child1: &FusionChild,
        child2: &FusionChild,
    ) -> Result<BattleJudgment, LlmError> {
        let prompt = build_judge_prompt(child1, child2);
        debug!(
            child1 = %child1.name,
            child2 = %child2.name,
            model = %self.judge_model,
            "judging battle"
        );
        self.call_validated(&prompt, &self.judge_model, &battle_judgment_schema())
            .await
    }

    /// One full call-parse-validate cycle per attempt, under the retry
    /// budget. Only misconfiguration aborts early.
    async fn call_validated<T: DeserializeOwned>(
        &self,
        prompt: &str,
        model: &str,
        schema: &Schema,
    ) -> Result<T, LlmError> {
        let backend: &dyn LlmBackend = &*self.backend;
        let timeout = self.timeout;
        with_retry(
            move || async move {
                let inv = LlmInvocation::new(model, vec![Message::user(prompt)], timeout);
                let result = backend.invoke(inv).await.map_err(classify)?;

                let block = extract_json_block(&result.content).ok_or_else(|| {
                    AttemptError::Retryable(LlmError::MalformedJson(
                        "no JSON object in reply".to_string(),
                    ))
                })?;

                let value: serde_json::Value = serde_json::from_str(block).map_err(|e| {
                    AttemptError::Retryable(LlmError::MalformedJson(e.to_string()))
                })?;

                validate_as::<T>(&value, schema)
                    .map_err(|e| AttemptError::Retryable(LlmError::InvalidResponse(e)))
            },
            self.retry,
        )
        .await
    }
}

/// Misconfiguration cannot improve on retry; everything else can.
fn classify(err: LlmError) -> AttemptError<LlmError> {
    match err {
        LlmError::Misconfiguration(_) => AttemptError::Fatal(err),
        _ => AttemptError::Retryable(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{LlmResult, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};
    use async_trait::async_trait;
    use pokefusion_utils::types::{SignatureMove, Stats, TypeTag};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Scripted backend: pops one reply per invocation and records every
    /// invocation it receives.
    struct StubBackend {
        replies: Mutex<VecDeque<Result<String, LlmError>>>,
        invocations: Mutex<Vec<LlmInvocation>>,
    }

    impl StubBackend {
        fn new(replies: Vec<Result<String, LlmError>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                invocations: Mutex::new(Vec::new()),
            })
        }

        fn invocation_count(&self) -> usize {
            self.invocations.lock().unwrap().len()
        }

        fn models_invoked(&self) -> Vec<String> {
            self.invocations
                .lock()
                .unwrap()
                .iter()
                .map(|inv| inv.model.clone())
                .collect()
        }
    }

    #[async_trait]
    impl LlmBackend for StubBackend {
        async fn invoke(&self, inv: LlmInvocation) -> Result<LlmResult, LlmError> {
            self.invocations.lock().unwrap().push(inv.clone());
            let reply = self
                .replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(LlmError::NoContent));
            reply.map(|content| LlmResult::new(content, inv.model))
        }
    }

    fn parent(id: u32, name: &str) -> ParentRecord {
        ParentRecord {
            id,
            name: name.to_string(),
            height: 7,
            weight: 69,
            types: vec![TypeTag::Grass, TypeTag::Poison],
            stats: Stats {
                hp: 45,
                attack: 49,
                defense: 49,
                special_attack: 65,
                special_defense: 65,
                speed: 45,
            },
            abilities: vec!["overgrow".to_string()],
            sprite: String::new(),
            is_legendary: None,
            is_mythical: None,
            flavor_text: None,
            egg_groups: None,
            genus: None,
        }
    }

    fn child(name: &str) -> FusionChild {
        FusionChild {
            name: name.to_string(),
            types: vec![TypeTag::Grass],
            stats: Stats {
                hp: 60,
                attack: 62,
                defense: 63,
                special_attack: 80,
                special_defense: 80,
                speed: 60,
            },
            abilities: vec!["Verdant Guard".to_string()],
            signature_move: SignatureMove {
                name: "Bloom Burst".to_string(),
                move_type: TypeTag::Grass,
                power: 95,
                description: "A burst of razor petals.".to_string(),
            },
            description: "A sturdy seedling fusion.".to_string(),
        }
    }

    fn valid_child_json() -> String {
        serde_json::to_string(&child("Ivymander")).unwrap()
    }

    fn valid_judgment_json() -> String {
        serde_json::json!({
            "winner": "child2",
            "confidence": 73,
            "reasoning": "Child 2 outspeeds and carries a super-effective signature move, which decides most exchanges.",
            "keyFactors": ["speed advantage", "type coverage"],
            "ruleViolations": []
        })
        .to_string()
    }

    #[tokio::test]
    async fn generation_uses_the_generator_model() {
        let backend = StubBackend::new(vec![Ok(valid_child_json())]);
        let client = GenerativeClient::new(backend.clone(), "gen-model", "judge-model");

        let result = client
            .generate_child(&parent(1, "bulbasaur"), &parent(4, "charmander"))
            .await
            .unwrap();

        assert_eq!(result.name, "Ivymander");
        assert_eq!(backend.models_invoked(), vec!["gen-model".to_string()]);
    }

    #[tokio::test]
    async fn judgment_uses_the_judge_model() {
        let backend = StubBackend::new(vec![Ok(valid_judgment_json())]);
        let client = GenerativeClient::new(backend.clone(), "gen-model", "judge-model");

        let judgment = client
            .judge_battle(&child("A"), &child("B"))
            .await
            .unwrap();

        assert_eq!(judgment.confidence, 73);
        assert_eq!(backend.models_invoked(), vec!["judge-model".to_string()]);
    }

    #[tokio::test]
    async fn invocation_carries_default_sampling_parameters() {
        let backend = StubBackend::new(vec![Ok(valid_child_json())]);
        let client = GenerativeClient::new(backend.clone(), "gen-model", "judge-model");

        client
            .generate_child(&parent(1, "bulbasaur"), &parent(4, "charmander"))
            .await
            .unwrap();

        let invocations = backend.invocations.lock().unwrap();
        assert_eq!(invocations[0].temperature, DEFAULT_TEMPERATURE);
        assert_eq!(invocations[0].max_tokens, DEFAULT_MAX_TOKENS);
        assert_eq!(invocations[0].timeout, LLM_TIMEOUT);
        assert_eq!(invocations[0].messages.len(), 1);
    }

    #[tokio::test]
    async fn configured_timeout_is_carried_to_the_backend() {
        let backend = StubBackend::new(vec![Ok(valid_child_json())]);
        let client = GenerativeClient::new(backend.clone(), "gen-model", "judge-model")
            .with_timeout(Duration::from_secs(5));

        client
            .generate_child(&parent(1, "bulbasaur"), &parent(4, "charmander"))
            .await
            .unwrap();

        let invocations = backend.invocations.lock().unwrap();
        assert_eq!(invocations[0].timeout, Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn malformed_replies_are_retried_until_a_valid_one() {
        let backend = StubBackend::new(vec![
            Ok("not json at all".to_string()),
            Ok(r#"{"name": "Halfling""#.to_string()),
            Ok(valid_child_json()),
        ]);
        let client = GenerativeClient::new(backend.clone(), "gen-model", "judge-model");

        let result = client
            .generate_child(&parent(1, "bulbasaur"), &parent(4, "charmander"))
            .await
            .unwrap();

        assert_eq!(result.name, "Ivymander");
        assert_eq!(backend.invocation_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn schema_violations_are_retried() {
        let invalid = serde_json::json!({
            "name": "Overstat",
            "types": ["grass"],
            "stats": {"hp": 999, "attack": 1, "defense": 1, "specialAttack": 1, "specialDefense": 1, "speed": 1},
            "abilities": ["x"],
            "signatureMove": {"name": "m", "type": "grass", "power": 10, "description": "d"},
            "description": "d"
        })
        .to_string();
        let backend = StubBackend::new(vec![Ok(invalid), Ok(valid_child_json())]);
        let client = GenerativeClient::new(backend.clone(), "gen-model", "judge-model");

        let result = client
            .generate_child(&parent(1, "bulbasaur"), &parent(4, "charmander"))
            .await
            .unwrap();

        assert_eq!(result.name, "Ivymander");
        assert_eq!(backend.invocation_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_budget_surfaces_the_last_error() {
        let backend = StubBackend::new(vec![
            Ok("nope".to_string()),
            Err(LlmError::NoContent),
            Ok("still nope".to_string()),
        ]);
        let client = GenerativeClient::new(backend.clone(), "gen-model", "judge-model");

        let err = client
            .generate_child(&parent(1, "bulbasaur"), &parent(4, "charmander"))
            .await
            .unwrap_err();

        assert!(matches!(err, LlmError::MalformedJson(_)), "got {err:?}");
        assert_eq!(backend.invocation_count(), 3);
    }

    #[tokio::test]
    async fn misconfiguration_is_not_retried() {
        let backend = StubBackend::new(vec![
            Err(LlmError::Misconfiguration("no api key".to_string())),
            Ok(valid_child_json()),
        ]);
        let client = GenerativeClient::new(backend.clone(), "gen-model", "judge-model");

        let err = client
            .generate_child(&parent(1, "bulbasaur"), &parent(4, "charmander"))
            .await
            .unwrap_err();

        assert!(matches!(err, LlmError::Misconfiguration(_)));
        assert_eq!(backend.invocation_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn prose_wrapped_json_still_parses() {
        let wrapped = format!("Here is your fusion!\n```json\n{}\n```", valid_child_json());
        let backend = StubBackend::new(vec![Ok(wrapped)]);
        let client = GenerativeClient::new(backend.clone(), "gen-model", "judge-model");

        let result = client
            .generate_child(&parent(1, "bulbasaur"), &parent(4, "charmander"))
            .await
            .unwrap();

        assert_eq!(result.name, "Ivymander");
        assert_eq!(backend.invocation_count(), 1);
    }
}
