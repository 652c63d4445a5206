//! Process Document use case
//!
//! Single-pass or map-reduce processing of a document. One full consensus
//! run is the unit of work for direct processing, for every chunk of the
//! map phase, and for the final reduce.

use crate::config::ChunkingParams;
use crate::ports::audit_store::AuditStore;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::use_cases::run_consensus::{RunConsensusError, RunConsensusInput, RunConsensusUseCase};
use consensus_domain::{
    CHUNK_FAILURE_PLACEHOLDER, Chunk, ChunkId, Chunker, ChunkingError, PromptTemplate, SessionId,
    validate_window,
};
use futures::future::join_all;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

/// Returned when a direct run produces no winner
pub const NO_RESULT_MESSAGE: &str = "No result generated.";

/// Returned when the reduce run produces no winner
pub const REDUCE_FAILED_MESSAGE: &str = "Failed to generate final result.";

/// Errors that abort document processing
#[derive(Error, Debug)]
pub enum ProcessDocumentError {
    #[error("Invalid chunking parameters: {0}")]
    Chunking(#[from] ChunkingError),

    #[error(transparent)]
    Consensus(#[from] RunConsensusError),
}

/// Outcome of processing one document
#[derive(Debug, Clone)]
pub struct ProcessDocumentOutput {
    /// Audit session grouping the direct or reduce run and all chunks
    pub session_id: Option<SessionId>,
    /// Final text
    pub content: String,
    /// Number of map-phase chunks; zero when processed directly
    pub chunk_count: usize,
}

/// Use case for processing a document against a task
pub struct ProcessDocumentUseCase {
    consensus: Arc<RunConsensusUseCase>,
    chunker: Chunker,
    store: Arc<dyn AuditStore>,
    params: ChunkingParams,
}

impl ProcessDocumentUseCase {
    pub fn new(
        consensus: Arc<RunConsensusUseCase>,
        chunker: Chunker,
        store: Arc<dyn AuditStore>,
        params: ChunkingParams,
    ) -> Self {
        Self {
            consensus,
            chunker,
            store,
            params,
        }
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(
        &self,
        document: &str,
        task: &str,
    ) -> Result<ProcessDocumentOutput, ProcessDocumentError> {
        self.execute_with_progress(document, task, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    ///
    /// Progress is reported for the direct run or for the reduce run; map
    /// runs only report chunk completion.
    pub async fn execute_with_progress(
        &self,
        document: &str,
        task: &str,
        progress: &dyn ProgressNotifier,
    ) -> Result<ProcessDocumentOutput, ProcessDocumentError> {
        validate_window(self.params.chunk_size, self.params.overlap)?;

        let token_count = self.chunker.count_tokens(document);
        info!("Processing document with {} tokens", token_count);

        let session_id = match self
            .store
            .create_session(&format!("[Document Processing] {}", task))
        {
            Ok(id) => Some(id),
            Err(e) => {
                warn!("Failed to open audit session: {}", e);
                None
            }
        };

        if token_count <= self.params.direct_threshold {
            info!("Document fits in context, running direct consensus");
            let prompt = PromptTemplate::direct_document_prompt(task, document);
            let output = self
                .consensus
                .execute_with_progress(with_session(prompt, &session_id), progress)
                .await?;

            return Ok(ProcessDocumentOutput {
                content: output
                    .result
                    .winner_content()
                    .unwrap_or(NO_RESULT_MESSAGE)
                    .to_string(),
                session_id,
                chunk_count: 0,
            });
        }

        info!("Document too large, starting map-reduce");
        let chunks = self
            .chunker
            .split(document, self.params.chunk_size, self.params.overlap)?;
        let chunk_count = chunks.len();
        info!("Split into {} chunks", chunk_count);

        // Map
        progress.on_map_start(chunk_count);
        let partial_results = join_all(chunks.iter().map(|chunk| {
            let chunk_id = self.record_chunk(session_id.as_ref(), chunk);
            self.map_chunk(task, chunk, chunk_count, chunk_id, progress)
        }))
        .await;

        // Reduce
        info!("Map phase completed, starting reduce phase");
        progress.on_reduce_start();
        let prompt = PromptTemplate::reduce_prompt(task, &partial_results);
        let output = self
            .consensus
            .execute_with_progress(with_session(prompt, &session_id), progress)
            .await?;

        Ok(ProcessDocumentOutput {
            content: output
                .result
                .winner_content()
                .unwrap_or(REDUCE_FAILED_MESSAGE)
                .to_string(),
            session_id,
            chunk_count,
        })
    }

    /// Run consensus over one chunk; failures become the placeholder.
    async fn map_chunk(
        &self,
        task: &str,
        chunk: &Chunk,
        total: usize,
        chunk_id: Option<ChunkId>,
        progress: &dyn ProgressNotifier,
    ) -> String {
        let prompt = PromptTemplate::chunk_prompt(task, chunk.index, total, &chunk.content);

        match self.consensus.execute(RunConsensusInput::new(prompt)).await {
            Ok(output) => {
                let content = output.result.winner_content().unwrap_or_default().to_string();
                if let Some(id) = &chunk_id
                    && let Err(e) = self.store.update_chunk_result(id, &content)
                {
                    warn!(chunk = chunk.index, "Failed to record chunk result: {}", e);
                }
                progress.on_chunk_complete(chunk.index, true);
                content
            }
            Err(e) => {
                error!(chunk = chunk.index, "Failed to process chunk: {}", e);
                progress.on_chunk_complete(chunk.index, false);
                CHUNK_FAILURE_PLACEHOLDER.to_string()
            }
        }
    }

    fn record_chunk(&self, session_id: Option<&SessionId>, chunk: &Chunk) -> Option<ChunkId> {
        let session_id = session_id?;
        match self.store.add_chunk(session_id, chunk) {
            Ok(id) => Some(id),
            Err(e) => {
                warn!(chunk = chunk.index, "Failed to record chunk: {}", e);
                None
            }
        }
    }
}

fn with_session(prompt: String, session_id: &Option<SessionId>) -> RunConsensusInput {
    let input = RunConsensusInput::new(prompt);
    match session_id {
        Some(id) => input.with_session(id.clone()),
        None => input,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OrchestrationParams;
    use crate::ports::audit_store::StoreError;
    use crate::ports::llm_provider::{ActiveAgent, Generation, LlmProvider, ProviderError};
    use async_trait::async_trait;
    use consensus_domain::{
        AgentId, SessionRecord, SessionStatus, StoredChunk, StoredEvaluation, StoredResponse,
        TokenId, Tokenizer,
    };
    use std::sync::Mutex;

    // ==================== Test Mocks ====================

    /// One token per whitespace-separated word
    #[derive(Default)]
    struct WordTokenizer {
        vocab: Mutex<Vec<String>>,
    }

    impl Tokenizer for WordTokenizer {
        fn encode(&self, text: &str) -> Vec<TokenId> {
            let mut vocab = self.vocab.lock().unwrap();
            text.split_whitespace()
                .map(|word| match vocab.iter().position(|w| w == word) {
                    Some(i) => i as TokenId,
                    None => {
                        vocab.push(word.to_string());
                        (vocab.len() - 1) as TokenId
                    }
                })
                .collect()
        }

        fn decode(&self, tokens: &[TokenId]) -> String {
            let vocab = self.vocab.lock().unwrap();
            tokens
                .iter()
                .map(|&t| vocab[t as usize].as_str())
                .collect::<Vec<_>>()
                .join(" ")
        }
    }

    /// Answers generation prompts through `answer` (None = failure) and
    /// scores every critique 9/10.
    struct MockProvider {
        answer: fn(&str) -> Option<String>,
        prompts: Mutex<Vec<String>>,
    }

    impl MockProvider {
        fn new(answer: fn(&str) -> Option<String>) -> Self {
            Self {
                answer,
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn prompts_starting_with(&self, prefix: &str) -> Vec<String> {
            self.prompts
                .lock()
                .unwrap()
                .iter()
                .filter(|p| p.starts_with(prefix))
                .cloned()
                .collect()
        }
    }

    #[async_trait]
    impl LlmProvider for MockProvider {
        fn name(&self) -> &str {
            "mock"
        }

        async fn generate(&self, _model: &str, prompt: &str) -> Result<Generation, ProviderError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            if prompt.starts_with("You are an expert evaluator") {
                return Ok(Generation::new(
                    r#"{"scores": {"accuracy": 9, "relevance": 9, "completeness": 9, "clarity": 9}, "feedback": "Good"}"#,
                ));
            }
            (self.answer)(prompt)
                .map(Generation::new)
                .ok_or_else(|| ProviderError::Other("scripted failure".to_string()))
        }

        fn is_configured(&self) -> bool {
            true
        }
    }

    #[derive(Default)]
    struct ChunkStore {
        sessions: Mutex<Vec<SessionRecord>>,
        chunks: Mutex<Vec<StoredChunk>>,
    }

    impl AuditStore for ChunkStore {
        fn create_session(&self, prompt: &str) -> Result<SessionId, StoreError> {
            let mut sessions = self.sessions.lock().unwrap();
            let id = SessionId::new(format!("s{}", sessions.len()));
            sessions.push(SessionRecord {
                id: id.clone(),
                prompt: prompt.to_string(),
                status: SessionStatus::Running,
                result: None,
                created_at: "now".to_string(),
                completed_at: None,
            });
            Ok(id)
        }

        fn update_session_status(
            &self,
            id: &SessionId,
            status: SessionStatus,
            result: Option<&str>,
        ) -> Result<(), StoreError> {
            let mut sessions = self.sessions.lock().unwrap();
            if let Some(session) = sessions.iter_mut().find(|s| &s.id == id) {
                session.status = status;
                session.result = result.map(str::to_string);
            }
            Ok(())
        }

        fn get_session(&self, id: &SessionId) -> Result<Option<SessionRecord>, StoreError> {
            Ok(self
                .sessions
                .lock()
                .unwrap()
                .iter()
                .find(|s| &s.id == id)
                .cloned())
        }

        fn add_response(&self, _response: StoredResponse) -> Result<(), StoreError> {
            Ok(())
        }

        fn get_responses(
            &self,
            _session_id: &SessionId,
            _iteration: Option<usize>,
        ) -> Result<Vec<StoredResponse>, StoreError> {
            Ok(Vec::new())
        }

        fn add_evaluation(&self, _evaluation: StoredEvaluation) -> Result<(), StoreError> {
            Ok(())
        }

        fn get_evaluations(
            &self,
            _session_id: &SessionId,
            _iteration: Option<usize>,
        ) -> Result<Vec<StoredEvaluation>, StoreError> {
            Ok(Vec::new())
        }

        fn add_chunk(&self, session_id: &SessionId, chunk: &Chunk) -> Result<ChunkId, StoreError> {
            let mut chunks = self.chunks.lock().unwrap();
            let id = ChunkId::new(format!("c{}", chunk.index));
            chunks.push(StoredChunk {
                id: id.clone(),
                session_id: session_id.clone(),
                chunk: chunk.clone(),
            });
            Ok(id)
        }

        fn update_chunk_result(&self, id: &ChunkId, result: &str) -> Result<(), StoreError> {
            let mut chunks = self.chunks.lock().unwrap();
            let stored = chunks
                .iter_mut()
                .find(|c| &c.id == id)
                .ok_or_else(|| StoreError::ChunkNotFound(id.clone()))?;
            stored.chunk.result = Some(result.to_string());
            Ok(())
        }

        fn get_chunks(&self, session_id: &SessionId) -> Result<Vec<StoredChunk>, StoreError> {
            Ok(self
                .chunks
                .lock()
                .unwrap()
                .iter()
                .filter(|c| &c.session_id == session_id)
                .cloned()
                .collect())
        }
    }

    // ==================== Answer Scripts ====================

    fn echo_parts(prompt: &str) -> Option<String> {
        if prompt.starts_with("Here are the results") {
            Some("final answer".to_string())
        } else if prompt.contains("Content Part 1/3") {
            Some("summary one".to_string())
        } else if prompt.contains("Content Part 2/3") {
            None
        } else if prompt.contains("Content Part 3/3") {
            Some("summary three".to_string())
        } else {
            Some("direct answer".to_string())
        }
    }

    fn always(_prompt: &str) -> Option<String> {
        Some("lonely answer".to_string())
    }

    fn setup(
        providers: &[&Arc<MockProvider>],
        params: ChunkingParams,
    ) -> (ProcessDocumentUseCase, Arc<ChunkStore>) {
        let store = Arc::new(ChunkStore::default());
        let agents = providers
            .iter()
            .enumerate()
            .map(|(i, provider)| {
                ActiveAgent::new(
                    AgentId::for_model("mock", &format!("m{}", i)),
                    format!("m{}", i),
                    Arc::clone(provider) as Arc<dyn LlmProvider>,
                )
            })
            .collect();
        let consensus = Arc::new(RunConsensusUseCase::new(
            agents,
            store.clone(),
            OrchestrationParams::default().with_max_iterations(1),
        ));
        let chunker = Chunker::new(Arc::new(WordTokenizer::default()));
        (
            ProcessDocumentUseCase::new(consensus, chunker, store.clone(), params),
            store,
        )
    }

    fn small_windows() -> ChunkingParams {
        ChunkingParams::default()
            .with_chunk_size(4)
            .with_overlap(0)
            .with_direct_threshold(4)
    }

    // ==================== Tests ====================

    #[tokio::test]
    async fn test_document_at_threshold_is_processed_directly() {
        let a = Arc::new(MockProvider::new(echo_parts));
        let b = Arc::new(MockProvider::new(echo_parts));
        let (use_case, store) = setup(&[&a, &b], small_windows());

        let output = use_case.execute("one two three four", "Summarize").await.unwrap();

        assert_eq!(output.content, "direct answer");
        assert_eq!(output.chunk_count, 0);
        assert_eq!(
            a.prompts_starting_with("Summarize"),
            vec!["Summarize\n\nDocument:\none two three four".to_string()]
        );
        assert!(store.chunks.lock().unwrap().is_empty());

        let session = store
            .get_session(output.session_id.as_ref().unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(session.prompt, "[Document Processing] Summarize");
        assert_eq!(session.status, SessionStatus::Completed);
        assert_eq!(session.result.as_deref(), Some("direct answer"));
    }

    #[tokio::test]
    async fn test_failed_chunk_becomes_placeholder_in_reduce() {
        let a = Arc::new(MockProvider::new(echo_parts));
        let b = Arc::new(MockProvider::new(echo_parts));
        let (use_case, store) = setup(&[&a, &b], small_windows());

        let document = "w1 w2 w3 w4 w5 w6 w7 w8 w9 w10 w11 w12";
        let output = use_case.execute(document, "Summarize").await.unwrap();

        assert_eq!(output.content, "final answer");
        assert_eq!(output.chunk_count, 3);

        let reduce_prompts = a.prompts_starting_with("Here are the results");
        assert_eq!(reduce_prompts.len(), 1);
        let reduce = &reduce_prompts[0];
        let part1 = reduce.find("--- Part 1 ---\nsummary one").unwrap();
        let part2 = reduce.find("--- Part 2 ---\n[Processing Error]").unwrap();
        let part3 = reduce.find("--- Part 3 ---\nsummary three").unwrap();
        assert!(part1 < part2 && part2 < part3);
        assert!(reduce.contains("Task: Summarize"));

        let session_id = output.session_id.unwrap();
        let chunks = store.get_chunks(&session_id).unwrap();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].chunk.content, "w1 w2 w3 w4");
        assert_eq!(chunks[0].chunk.result.as_deref(), Some("summary one"));
        assert_eq!(chunks[1].chunk.result, None);
        assert_eq!(chunks[2].chunk.result.as_deref(), Some("summary three"));
    }

    #[tokio::test]
    async fn test_no_winner_paths_use_markers() {
        // A lone agent never receives critiques, so no run has a winner
        let a = Arc::new(MockProvider::new(always));
        let (use_case, _store) = setup(&[&a], small_windows());

        let direct = use_case.execute("short doc", "Summarize").await.unwrap();
        assert_eq!(direct.content, NO_RESULT_MESSAGE);

        let chunked = use_case
            .execute("w1 w2 w3 w4 w5 w6", "Summarize")
            .await
            .unwrap();
        assert_eq!(chunked.content, REDUCE_FAILED_MESSAGE);

        let reduce_prompts = a.prompts_starting_with("Here are the results");
        assert!(reduce_prompts[0].contains("--- Part 1 ---\n\n\n--- Part 2 ---\n\n"));
    }

    #[tokio::test]
    async fn test_invalid_window_is_rejected() {
        let a = Arc::new(MockProvider::new(always));
        let params = ChunkingParams::default().with_chunk_size(100).with_overlap(100);
        let (use_case, _store) = setup(&[&a], params);

        let result = use_case.execute("text", "Summarize").await;
        assert!(matches!(
            result,
            Err(ProcessDocumentError::Chunking(ChunkingError::OverlapTooLarge { .. }))
        ));
        assert!(a.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fatal_reduce_error_propagates() {
        let (use_case, _store) = setup(&[], small_windows());
        let result = use_case.execute("w1 w2 w3 w4 w5", "Summarize").await;
        assert!(matches!(
            result,
            Err(ProcessDocumentError::Consensus(RunConsensusError::NoAgents))
        ));
    }
}
