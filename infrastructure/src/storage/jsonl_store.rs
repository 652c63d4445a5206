//! Append-only JSONL audit store
//!
//! Every state change is one JSON line with a `type` and a `timestamp`.
//! Opening an existing file replays it, so sessions from earlier runs can be
//! inspected.

use super::state::{AuditRecord, AuditState, now_rfc3339};
use consensus_application::{AuditStore, StoreError};
use consensus_domain::{
    Chunk, ChunkId, SessionId, SessionRecord, SessionStatus, StoredChunk, StoredEvaluation,
    StoredResponse,
};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
struct Line {
    timestamp: String,
    #[serde(flatten)]
    record: AuditRecord,
}

struct Inner {
    state: AuditState,
    writer: BufWriter<File>,
    /// A failed write may have left a partial line on disk
    torn: bool,
}

impl Inner {
    fn append(&mut self, line: &str) -> std::io::Result<()> {
        if self.torn {
            self.writer.write_all(b"\n")?;
        }
        self.writer.write_all(line.as_bytes())?;
        self.writer.flush()?;
        self.torn = false;
        Ok(())
    }

    /// Swap in a fresh writer, throwing away whatever is still buffered.
    fn discard_buffer(&mut self, path: &Path) -> std::io::Result<()> {
        let file = OpenOptions::new().append(true).open(path)?;
        let stale = std::mem::replace(&mut self.writer, BufWriter::new(file));
        let (_, unwritten) = stale.into_parts();
        if let Ok(bytes) = unwritten {
            debug!(bytes = bytes.len(), "Discarded unwritten audit bytes");
        }
        Ok(())
    }
}

/// JSONL audit store.
///
/// Thread-safe via a single `Mutex`, so file order matches state order.
/// Flushes after every line and on `Drop`.
pub struct JsonlAuditStore {
    inner: Mutex<Inner>,
    path: PathBuf,
}

impl JsonlAuditStore {
    /// Open (or create) the store at `path`, replaying existing records.
    ///
    /// Creates parent directories if they don't exist. Unreadable lines are
    /// skipped with a warning.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let state = if path.exists() {
            Self::replay(path)?
        } else {
            AuditState::default()
        };

        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            inner: Mutex::new(Inner {
                state,
                writer: BufWriter::new(file),
                torn: false,
            }),
            path: path.to_path_buf(),
        })
    }

    fn replay(path: &Path) -> Result<AuditState, StoreError> {
        let reader = BufReader::new(File::open(path)?);
        let mut state = AuditState::default();
        let mut replayed = 0usize;

        for (number, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record = match serde_json::from_str::<Line>(&line) {
                Ok(parsed) => parsed.record,
                Err(e) => {
                    warn!(
                        "Skipping unreadable audit record at {}:{}: {}",
                        path.display(),
                        number + 1,
                        e
                    );
                    continue;
                }
            };
            if let Err(e) = state.apply(record) {
                warn!(
                    "Skipping inconsistent audit record at {}:{}: {}",
                    path.display(),
                    number + 1,
                    e
                );
                continue;
            }
            replayed += 1;
        }

        debug!(path = %path.display(), records = replayed, "Replayed audit log");
        Ok(state)
    }

    /// Get the path to the audit file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn inner(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Unavailable("audit log lock poisoned".to_string()))
    }

    fn read<T>(&self, f: impl FnOnce(&AuditState) -> T) -> Result<T, StoreError> {
        Ok(f(&self.inner()?.state))
    }

    /// Validate, append, then apply. A rejected record never reaches the file.
    ///
    /// After a failed write the buffer is dropped and the next line starts
    /// on a fresh line, so a torn record cannot swallow the one after it.
    fn commit(&self, record: AuditRecord) -> Result<(), StoreError> {
        let mut inner = self.inner()?;
        inner.state.validate(&record)?;

        let line = Line {
            timestamp: now_rfc3339(),
            record,
        };
        let text = format!("{}\n", serde_json::to_string(&line)?);

        if let Err(e) = inner.append(&text) {
            inner.torn = true;
            if let Err(reopen) = inner.discard_buffer(&self.path) {
                warn!("Could not reopen audit log {}: {}", self.path.display(), reopen);
            }
            return Err(e.into());
        }

        inner.state.apply(line.record)
    }
}

impl AuditStore for JsonlAuditStore {
    fn create_session(&self, prompt: &str) -> Result<SessionId, StoreError> {
        let id = SessionId::new(Uuid::new_v4().to_string());
        self.commit(AuditRecord::SessionCreated {
            session: SessionRecord {
                id: id.clone(),
                prompt: prompt.to_string(),
                status: SessionStatus::Running,
                result: None,
                created_at: now_rfc3339(),
                completed_at: None,
            },
        })?;
        Ok(id)
    }

    fn update_session_status(
        &self,
        id: &SessionId,
        status: SessionStatus,
        result: Option<&str>,
    ) -> Result<(), StoreError> {
        self.commit(AuditRecord::session_updated(id, status, result))
    }

    fn get_session(&self, id: &SessionId) -> Result<Option<SessionRecord>, StoreError> {
        self.read(|state| state.session(id))
    }

    fn add_response(&self, response: StoredResponse) -> Result<(), StoreError> {
        self.commit(AuditRecord::Response { response })
    }

    fn get_responses(
        &self,
        session_id: &SessionId,
        iteration: Option<usize>,
    ) -> Result<Vec<StoredResponse>, StoreError> {
        self.read(|state| state.responses(session_id, iteration))
    }

    fn add_evaluation(&self, evaluation: StoredEvaluation) -> Result<(), StoreError> {
        self.commit(AuditRecord::Evaluation { evaluation })
    }

    fn get_evaluations(
        &self,
        session_id: &SessionId,
        iteration: Option<usize>,
    ) -> Result<Vec<StoredEvaluation>, StoreError> {
        self.read(|state| state.evaluations(session_id, iteration))
    }

    fn add_chunk(&self, session_id: &SessionId, chunk: &Chunk) -> Result<ChunkId, StoreError> {
        let id = ChunkId::new(Uuid::new_v4().to_string());
        self.commit(AuditRecord::ChunkCreated {
            chunk: StoredChunk {
                id: id.clone(),
                session_id: session_id.clone(),
                chunk: chunk.clone(),
            },
        })?;
        Ok(id)
    }

    fn update_chunk_result(&self, id: &ChunkId, result: &str) -> Result<(), StoreError> {
        self.commit(AuditRecord::ChunkResult {
            id: id.clone(),
            result: result.to_string(),
        })
    }

    fn get_chunks(&self, session_id: &SessionId) -> Result<Vec<StoredChunk>, StoreError> {
        self.read(|state| state.chunks(session_id))
    }
}

impl Drop for JsonlAuditStore {
    fn drop(&mut self) {
        if let Ok(mut inner) = self.inner.lock() {
            let _ = inner.writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consensus_domain::{AgentId, Evaluation};

    #[test]
    fn test_writes_one_typed_line_per_change() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        let store = JsonlAuditStore::open(&path).unwrap();

        let id = store.create_session("Q").unwrap();
        store
            .add_response(StoredResponse {
                session_id: id.clone(),
                iteration: 1,
                agent_id: AgentId::new("ollama:llama3"),
                content: "Answer".to_string(),
            })
            .unwrap();
        store
            .update_session_status(&id, SessionStatus::Completed, Some("Answer"))
            .unwrap();
        drop(store);

        let content = std::fs::read_to_string(&path).unwrap();
        let types: Vec<String> = content
            .lines()
            .map(|line| {
                let value: serde_json::Value = serde_json::from_str(line).unwrap();
                assert!(value["timestamp"].is_string());
                value["type"].as_str().unwrap().to_string()
            })
            .collect();
        assert_eq!(
            types,
            vec!["session_created", "response", "session_updated"]
        );
    }

    #[test]
    fn test_reopen_replays_history() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("audit.jsonl");

        let (session, chunk) = {
            let store = JsonlAuditStore::open(&path).unwrap();
            let session = store.create_session("[Document Processing] Summarize").unwrap();
            let chunk = store.add_chunk(&session, &Chunk::new(0, "part", 1)).unwrap();
            store.update_chunk_result(&chunk, "done").unwrap();
            store
                .add_evaluation(StoredEvaluation {
                    session_id: session.clone(),
                    iteration: 1,
                    evaluation: Evaluation::fallback("a".into(), "b".into()),
                })
                .unwrap();
            (session, chunk)
        };

        let store = JsonlAuditStore::open(&path).unwrap();
        let record = store.get_session(&session).unwrap().unwrap();
        assert_eq!(record.prompt, "[Document Processing] Summarize");
        assert_eq!(record.status, SessionStatus::Running);

        let chunks = store.get_chunks(&session).unwrap();
        assert_eq!(chunks[0].id, chunk);
        assert_eq!(chunks[0].chunk.result.as_deref(), Some("done"));

        let evaluations = store.get_evaluations(&session, Some(1)).unwrap();
        assert!(evaluations[0].evaluation.fallback);

        // New records append after the replayed ones
        store
            .update_session_status(&session, SessionStatus::Failed, None)
            .unwrap();
        drop(store);
        let store = JsonlAuditStore::open(&path).unwrap();
        assert_eq!(
            store.get_session(&session).unwrap().unwrap().status,
            SessionStatus::Failed
        );
    }

    #[test]
    fn test_corrupt_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");

        let session = {
            let store = JsonlAuditStore::open(&path).unwrap();
            store.create_session("Q").unwrap()
        };
        {
            let mut file = OpenOptions::new().append(true).open(&path).unwrap();
            writeln!(file, "{{not json").unwrap();
            writeln!(
                file,
                r#"{{"timestamp":"t","type":"chunk_result","id":"ghost","result":"x"}}"#
            )
            .unwrap();
        }

        let store = JsonlAuditStore::open(&path).unwrap();
        assert!(store.get_session(&session).unwrap().is_some());
        assert_eq!(store.path(), path.as_path());
    }

    #[test]
    fn test_rejected_record_is_not_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        let store = JsonlAuditStore::open(&path).unwrap();

        let result = store.update_session_status(
            &SessionId::new("missing"),
            SessionStatus::Completed,
            None,
        );
        assert!(matches!(result, Err(StoreError::SessionNotFound(_))));
        drop(store);

        assert!(std::fs::read_to_string(&path).unwrap().is_empty());
    }

    #[test]
    fn test_failed_write_does_not_leak_into_next_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        let store = JsonlAuditStore::open(&path).unwrap();

        // A read-only handle makes the flush fail with the line still buffered
        {
            let mut inner = store.inner.lock().unwrap();
            inner.writer = BufWriter::new(File::open(&path).unwrap());
        }
        assert!(store.create_session("lost").is_err());

        let kept = store.create_session("kept").unwrap();
        drop(store);

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(!content.contains("lost"));
        assert_eq!(content.lines().filter(|l| !l.trim().is_empty()).count(), 1);

        let store = JsonlAuditStore::open(&path).unwrap();
        assert_eq!(store.get_session(&kept).unwrap().unwrap().prompt, "kept");
    }
}
