//! The workflow engine driving the three AI flows

use crate::config::FlowConfig;
use crate::error::FlowError;
use prodiff_domain::traits::{LlmProvider, RecordStore};
use prodiff_domain::{
    Category, Collection, CompetitorProfile, EffectKind, Idea, Keyword, Project, Record, RecordId,
    ReviewAnalysis,
};
use prodiff_prompt::{Task, TemplateStore};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Runs the competitor, review, and idea flows against a provider and store
pub struct Workflow<L, S>
where
    L: LlmProvider,
    S: RecordStore,
{
    llm: Arc<L>,
    store: Arc<Mutex<S>>,
    templates: TemplateStore,
    config: FlowConfig,
}

#[derive(Deserialize)]
struct EstimateEntry {
    title: String,
    #[serde(default)]
    effectiveness: u32,
    #[serde(default)]
    eff_reasons: String,
}

impl<L, S> Workflow<L, S>
where
    L: LlmProvider + Send + Sync + 'static,
    S: RecordStore,
    L::Error: std::fmt::Display,
    S::Error: std::fmt::Display,
{
    /// Create a new workflow engine
    pub fn new(llm: L, store: S, templates: TemplateStore, config: FlowConfig) -> Self {
        Self {
            llm: Arc::new(llm),
            store: Arc::new(Mutex::new(store)),
            templates,
            config,
        }
    }

    /// Create a project record
    pub fn create_project(&self, project: &Project) -> Result<Record, FlowError> {
        project.validate().map_err(FlowError::InvalidShape)?;
        let body = serde_json::to_value(project)
            .map_err(|e| FlowError::InvalidShape(e.to_string()))?;
        self.store_lock()?
            .create(Collection::Projects, None, body)
            .map_err(|e| FlowError::Store(e.to_string()))
    }

    /// Extract a competitor profile from source material and store it
    pub async fn extract_competitor(
        &self,
        project_id: RecordId,
        material: &str,
    ) -> Result<Record, FlowError> {
        self.ensure_project(project_id)?;

        let prompt = self.templates.render(Task::Extract, &[("text", material)])?;
        info!(%project_id, material_len = material.len(), "extracting competitor profile");

        let raw = timeout(self.config.llm_timeout(), self.call_llm(&prompt))
            .await
            .map_err(|_| FlowError::Timeout)??;

        let value = interpret(&raw, &[])?;
        let profile: CompetitorProfile = serde_json::from_value(value)
            .map_err(|e| FlowError::InvalidShape(e.to_string()))?;

        let body = serde_json::to_value(&profile)
            .map_err(|e| FlowError::InvalidShape(e.to_string()))?;
        self.store_lock()?
            .create(Collection::Competitors, Some(project_id), body)
            .map_err(|e| FlowError::Store(e.to_string()))
    }

    /// Atomize and categorize a project's review text, replacing any
    /// previous analysis for the project
    pub async fn analyze_reviews(
        &self,
        project_id: RecordId,
        reviews: &str,
    ) -> Result<Record, FlowError> {
        self.ensure_project(project_id)?;

        // Pass 1: atomize the review text into keywords
        let prompt = self.templates.render(Task::Atomize, &[("reviews", reviews)])?;
        let raw = timeout(self.config.llm_timeout(), self.call_llm(&prompt))
            .await
            .map_err(|_| FlowError::Timeout)??;
        let value = interpret(&raw, &["keywords"])?;
        let keywords: Vec<Keyword> = decode_items(array_field(&value, "keywords"), "keyword");
        info!(%project_id, count = keywords.len(), "atomized review keywords");

        // Pass 2: group the keywords into categories
        let keywords_text = serde_json::to_string(&keywords)
            .map_err(|e| FlowError::InvalidShape(e.to_string()))?;
        let prompt = self
            .templates
            .render(Task::Categorize, &[("keywords", &keywords_text)])?;
        let raw = timeout(self.config.llm_timeout(), self.call_llm(&prompt))
            .await
            .map_err(|_| FlowError::Timeout)??;
        let value = interpret(&raw, &["categories"])?;
        let categories: Vec<Category> = decode_items(array_field(&value, "categories"), "category");

        let analysis = ReviewAnalysis { keywords, categories };
        let body = serde_json::to_value(&analysis)
            .map_err(|e| FlowError::InvalidShape(e.to_string()))?;

        let mut store = self.store_lock()?;
        let previous: Vec<RecordId> = store
            .list_by_parent(Collection::Reviews, project_id)
            .map_err(|e| FlowError::Store(e.to_string()))?
            .into_iter()
            .map(|r| r.id)
            .collect();
        store
            .bulk_delete(Collection::Reviews, &previous)
            .map_err(|e| FlowError::Store(e.to_string()))?;
        store
            .create(Collection::Reviews, Some(project_id), body)
            .map_err(|e| FlowError::Store(e.to_string()))
    }

    /// Generate differentiation ideas from the stored analyses, replacing
    /// the project's previous idea set
    pub async fn generate_ideas(&self, project_id: RecordId) -> Result<Vec<Record>, FlowError> {
        self.ensure_project(project_id)?;

        let (competitors_text, reviews_text) = {
            let store = self.store_lock()?;
            let competitors: Vec<Value> = store
                .list_by_parent(Collection::Competitors, project_id)
                .map_err(|e| FlowError::Store(e.to_string()))?
                .into_iter()
                .take(self.config.max_context_competitors)
                .map(|r| r.body)
                .collect();
            let reviews = store
                .list_by_parent(Collection::Reviews, project_id)
                .map_err(|e| FlowError::Store(e.to_string()))?
                .into_iter()
                .next()
                .map(|r| r.body)
                .unwrap_or_else(|| json!({}));
            (
                serde_json::to_string(&competitors)
                    .map_err(|e| FlowError::InvalidShape(e.to_string()))?,
                serde_json::to_string(&reviews)
                    .map_err(|e| FlowError::InvalidShape(e.to_string()))?,
            )
        };

        let prompt = self.templates.render(
            Task::Differentiate,
            &[
                ("competitors", competitors_text.as_str()),
                ("reviews", reviews_text.as_str()),
            ],
        )?;

        let raw = timeout(self.config.llm_timeout(), self.call_llm(&prompt))
            .await
            .map_err(|_| FlowError::Timeout)??;
        debug!(raw_len = raw.len(), "differentiation response received");

        // Long idea lists are where token-limit truncation bites; the
        // extractor's "ideas" repair covers it
        let value = interpret(&raw, &["ideas"])?;
        let ideas: Vec<Idea> = decode_items(array_field(&value, "ideas"), "idea")
            .into_iter()
            .filter(|idea: &Idea| match idea.validate() {
                Ok(()) => true,
                Err(e) => {
                    warn!("dropping invalid idea: {}", e);
                    false
                }
            })
            .collect();
        info!(%project_id, count = ideas.len(), "generated differentiation ideas");

        let bodies = ideas
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| FlowError::InvalidShape(e.to_string()))?;

        let mut store = self.store_lock()?;
        let previous: Vec<RecordId> = store
            .list_by_parent(Collection::Ideas, project_id)
            .map_err(|e| FlowError::Store(e.to_string()))?
            .into_iter()
            .map(|r| r.id)
            .collect();
        store
            .bulk_delete(Collection::Ideas, &previous)
            .map_err(|e| FlowError::Store(e.to_string()))?;
        store
            .bulk_create(Collection::Ideas, Some(project_id), bodies)
            .map_err(|e| FlowError::Store(e.to_string()))
    }

    /// Re-estimate effectiveness for the project's latent-need ideas
    ///
    /// Returns how many idea records were updated.
    pub async fn estimate_latent_ideas(&self, project_id: RecordId) -> Result<usize, FlowError> {
        self.ensure_project(project_id)?;

        let latent: Vec<Record> = {
            let store = self.store_lock()?;
            store
                .list_by_parent(Collection::Ideas, project_id)
                .map_err(|e| FlowError::Store(e.to_string()))?
                .into_iter()
                .filter(|r| {
                    serde_json::from_value::<Idea>(r.body.clone())
                        .map(|idea| idea.eff_type == EffectKind::Latent)
                        .unwrap_or(false)
                })
                .collect()
        };
        if latent.is_empty() {
            return Ok(0);
        }

        let ideas_text = serde_json::to_string(&latent.iter().map(|r| &r.body).collect::<Vec<_>>())
            .map_err(|e| FlowError::InvalidShape(e.to_string()))?;
        let prompt = self
            .templates
            .render(Task::Estimate, &[("ideas", &ideas_text)])?;

        let raw = timeout(self.config.llm_timeout(), self.call_llm(&prompt))
            .await
            .map_err(|_| FlowError::Timeout)??;
        let value = interpret(&raw, &["estimates"])?;
        let estimates: Vec<EstimateEntry> = decode_items(array_field(&value, "estimates"), "estimate");

        let mut store = self.store_lock()?;
        let mut updated = 0;
        for estimate in estimates {
            let Some(record) = latent
                .iter()
                .find(|r| r.body.get("title").and_then(Value::as_str) == Some(estimate.title.as_str()))
            else {
                warn!(title = %estimate.title, "estimate does not match a stored idea");
                continue;
            };
            let patch = json!({
                "effectiveness": estimate.effectiveness.min(100),
                "eff_reasons": estimate.eff_reasons,
            });
            if store
                .update(Collection::Ideas, record.id, patch)
                .map_err(|e| FlowError::Store(e.to_string()))?
                .is_some()
            {
                updated += 1;
            }
        }
        info!(%project_id, updated, "re-estimated latent ideas");
        Ok(updated)
    }

    fn ensure_project(&self, project_id: RecordId) -> Result<(), FlowError> {
        let exists = self
            .store_lock()?
            .exists(Collection::Projects, project_id)
            .map_err(|e| FlowError::Store(e.to_string()))?;
        if !exists {
            return Err(FlowError::ProjectNotFound(project_id));
        }
        Ok(())
    }

    fn store_lock(&self) -> Result<MutexGuard<'_, S>, FlowError> {
        self.store
            .lock()
            .map_err(|e| FlowError::Store(format!("store lock error: {}", e)))
    }

    /// Call the provider on a blocking thread
    async fn call_llm(&self, prompt: &str) -> Result<String, FlowError> {
        let llm = Arc::clone(&self.llm);
        let prompt = prompt.to_string();
        let options = self.config.generate_options();

        tokio::task::spawn_blocking(move || {
            llm.generate(&prompt, &options)
                .map_err(|e| FlowError::Llm(e.to_string()))
        })
        .await
        .map_err(|e| FlowError::Llm(format!("task join error: {}", e)))?
    }
}

/// Run the extractor, wrapping failure with the raw-response length
fn interpret(raw: &str, array_keys: &[&str]) -> Result<Value, FlowError> {
    let mut keys: Vec<&str> = prodiff_extract::DEFAULT_ARRAY_KEYS.to_vec();
    keys.extend_from_slice(array_keys);
    prodiff_extract::extract_with_array_keys(raw, &keys).map_err(|source| {
        warn!(raw_len = raw.chars().count(), "could not interpret model response");
        FlowError::Extraction {
            raw_len: raw.chars().count(),
            source,
        }
    })
}

/// The named top-level array of an extracted value, empty when absent
fn array_field(value: &Value, key: &str) -> Vec<Value> {
    value
        .get(key)
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

/// Decode array items individually, dropping the ones that do not fit
fn decode_items<T: DeserializeOwned>(items: Vec<Value>, what: &str) -> Vec<T> {
    items
        .into_iter()
        .enumerate()
        .filter_map(|(idx, item)| match serde_json::from_value::<T>(item) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                warn!("failed to decode {} {}: {}", what, idx, e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use prodiff_llm::MockProvider;
    use prodiff_store::SqliteStore;
    use std::collections::VecDeque;

    /// Returns queued responses in order, then empty strings
    struct ScriptedProvider {
        responses: Mutex<VecDeque<String>>,
    }

    impl ScriptedProvider {
        fn new(responses: &[&str]) -> Self {
            Self {
                responses: Mutex::new(responses.iter().map(|s| s.to_string()).collect()),
            }
        }
    }

    impl LlmProvider for ScriptedProvider {
        type Error = String;

        fn generate(
            &self,
            _prompt: &str,
            _options: &prodiff_domain::traits::GenerateOptions,
        ) -> Result<String, Self::Error> {
            Ok(self
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_default())
        }
    }

    fn workflow_with<LP>(llm: LP) -> (tempfile::TempDir, Workflow<LP, SqliteStore>)
    where
        LP: LlmProvider + Send + Sync + 'static,
        LP::Error: std::fmt::Display,
    {
        let dir = tempfile::tempdir().unwrap();
        let templates = TemplateStore::new(dir.path().join("prompts")).unwrap();
        let store = SqliteStore::new(":memory:").unwrap();
        let workflow = Workflow::new(llm, store, templates, FlowConfig::default());
        (dir, workflow)
    }

    fn seed_project<LP>(workflow: &Workflow<LP, SqliteStore>) -> RecordId
    where
        LP: LlmProvider + Send + Sync + 'static,
        LP::Error: std::fmt::Display,
    {
        workflow
            .create_project(&Project::new("Foot warmer 2026"))
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_extract_competitor_flow() {
        let llm = MockProvider::new(
            "Here is the analysis:\n```json\n{\"name\": \"WarmStep\", \"price\": \"¥12,800\", \
             \"features\": [\"timer\"], \"positives\": [\"heats fast\"], \"negatives\": []}\n```",
        );
        let (_dir, workflow) = workflow_with(llm);
        let project_id = seed_project(&workflow);

        let record = workflow
            .extract_competitor(project_id, "competitor page text")
            .await
            .unwrap();

        assert_eq!(record.collection, Collection::Competitors);
        assert_eq!(record.parent_id, Some(project_id));
        assert_eq!(record.body["price"], "¥12,800");
        assert_eq!(record.body["features"][0], "timer");
    }

    #[tokio::test]
    async fn test_extract_competitor_unknown_project() {
        let (_dir, workflow) = workflow_with(MockProvider::new("{}"));
        let result = workflow
            .extract_competitor(RecordId::new(), "text")
            .await;
        assert!(matches!(result, Err(FlowError::ProjectNotFound(_))));
    }

    #[tokio::test]
    async fn test_extract_competitor_unparsable_response() {
        let (_dir, workflow) = workflow_with(MockProvider::new("I cannot help with that."));
        let project_id = seed_project(&workflow);

        let result = workflow.extract_competitor(project_id, "text").await;
        match result {
            Err(FlowError::Extraction { raw_len, .. }) => assert!(raw_len > 0),
            other => panic!("unexpected result: {:?}", other.map(|r| r.id)),
        }
    }

    #[tokio::test]
    async fn test_analyze_reviews_two_pass() {
        let llm = ScriptedProvider::new(&[
            r#"{"keywords": [
                {"word": "heavy", "sentiment": "negative", "count": 45},
                {"word": "warm", "sentiment": "positive", "count": 62}
            ]}"#,
            r#"{"categories": [{"name": "weight", "keywords": ["heavy"]}]}"#,
        ]);
        let (_dir, workflow) = workflow_with(llm);
        let project_id = seed_project(&workflow);

        let record = workflow
            .analyze_reviews(project_id, "Too heavy but very warm.")
            .await
            .unwrap();

        let analysis: ReviewAnalysis = serde_json::from_value(record.body).unwrap();
        assert_eq!(analysis.keywords.len(), 2);
        assert_eq!(analysis.categories.len(), 1);
        assert_eq!(analysis.total_mentions(), 107);
    }

    #[tokio::test]
    async fn test_analyze_reviews_replaces_previous() {
        let llm = ScriptedProvider::new(&[
            r#"{"keywords": [{"word": "a", "sentiment": "positive", "count": 1}]}"#,
            r#"{"categories": []}"#,
            r#"{"keywords": [{"word": "b", "sentiment": "negative", "count": 2}]}"#,
            r#"{"categories": []}"#,
        ]);
        let (_dir, workflow) = workflow_with(llm);
        let project_id = seed_project(&workflow);

        workflow.analyze_reviews(project_id, "first").await.unwrap();
        let second = workflow.analyze_reviews(project_id, "second").await.unwrap();

        let store = workflow.store_lock().unwrap();
        let stored = store
            .list_by_parent(Collection::Reviews, project_id)
            .unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, second.id);
        assert_eq!(stored[0].body["keywords"][0]["word"], "b");
    }

    #[tokio::test]
    async fn test_generate_ideas_replaces_and_skips_invalid() {
        let llm = MockProvider::new(
            r#"{"ideas": [
                {"title": "Cordless unit", "pattern": "feature_add", "difficulty": "medium",
                 "effectiveness": 78, "eff_type": "manifest"},
                {"title": "", "pattern": "cost_down", "difficulty": "low"},
                {"title": "Slim shell", "pattern": "cost_down", "difficulty": "low",
                 "effectiveness": 40, "eff_type": "latent"}
            ]}"#,
        );
        let (_dir, workflow) = workflow_with(llm);
        let project_id = seed_project(&workflow);

        let first = workflow.generate_ideas(project_id).await.unwrap();
        // The blank-titled idea is dropped
        assert_eq!(first.len(), 2);

        let second = workflow.generate_ideas(project_id).await.unwrap();
        assert_eq!(second.len(), 2);

        let store = workflow.store_lock().unwrap();
        assert_eq!(store.count(Collection::Ideas).unwrap(), 2);
    }

    #[tokio::test]
    async fn test_generate_ideas_repairs_truncated_response() {
        // The classic token-limit cutoff: the array never closes
        let llm = MockProvider::new(
            r#"{"ideas": [
                {"title": "A", "pattern": "performance_up", "difficulty": "low"},
                {"title": "B", "pattern": "combine", "difficulty": "high"},
                {"title": "C", "pattern": "feature_a"#,
        );
        let (_dir, workflow) = workflow_with(llm);
        let project_id = seed_project(&workflow);

        let records = workflow.generate_ideas(project_id).await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].body["title"], "A");
        assert_eq!(records[1].body["title"], "B");
    }

    #[tokio::test]
    async fn test_estimate_updates_latent_ideas() {
        let llm = ScriptedProvider::new(&[
            r#"{"ideas": [
                {"title": "Manifest one", "pattern": "feature_add", "difficulty": "low",
                 "effectiveness": 70, "eff_type": "manifest"},
                {"title": "Latent one", "pattern": "combine", "difficulty": "high",
                 "effectiveness": 10, "eff_type": "latent", "eff_reasons": "guess"}
            ]}"#,
            r#"{"estimates": [
                {"title": "Latent one", "effectiveness": 65, "eff_reasons": "adjacent-market data"}
            ]}"#,
        ]);
        let (_dir, workflow) = workflow_with(llm);
        let project_id = seed_project(&workflow);

        workflow.generate_ideas(project_id).await.unwrap();
        let updated = workflow.estimate_latent_ideas(project_id).await.unwrap();
        assert_eq!(updated, 1);

        let store = workflow.store_lock().unwrap();
        let ideas = store.list_by_parent(Collection::Ideas, project_id).unwrap();
        let latent = ideas
            .iter()
            .find(|r| r.body["title"] == "Latent one")
            .unwrap();
        assert_eq!(latent.body["effectiveness"], 65);
        assert_eq!(latent.body["eff_reasons"], "adjacent-market data");

        let manifest = ideas
            .iter()
            .find(|r| r.body["title"] == "Manifest one")
            .unwrap();
        assert_eq!(manifest.body["effectiveness"], 70);
    }

    #[tokio::test]
    async fn test_estimate_without_latent_ideas_is_noop() {
        let (_dir, workflow) = workflow_with(MockProvider::new("{}"));
        let project_id = seed_project(&workflow);

        let updated = workflow.estimate_latent_ideas(project_id).await.unwrap();
        assert_eq!(updated, 0);
    }

    #[tokio::test]
    async fn test_llm_error_is_surfaced() {
        struct FailingProvider;
        impl LlmProvider for FailingProvider {
            type Error = String;
            fn generate(
                &self,
                _prompt: &str,
                _options: &prodiff_domain::traits::GenerateOptions,
            ) -> Result<String, Self::Error> {
                Err("boom".to_string())
            }
        }

        let (_dir, workflow) = workflow_with(FailingProvider);
        let project_id = seed_project(&workflow);
        let result = workflow.extract_competitor(project_id, "text").await;
        assert!(matches!(result, Err(FlowError::Llm(msg)) if msg.contains("boom")));
    }
}
