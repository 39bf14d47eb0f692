//! Sync engine: batch submission fetching with partial-commit semantics
//!
//! One `sync` call is one batch. The engine works on local copies of the
//! cache and registry order, fetches strictly sequentially (request N+1 never
//! starts before request N resolves), and commits the working copies at the
//! end of the batch. A fetch failure aborts the remaining usernames but the
//! entries merged before the failure are still committed; the outcome is a
//! tagged result, not an unwound error.
//!
//! Usernames already present in the cache are skipped without a network
//! call, so repeated syncs over the same set are free. A username whose
//! fetch succeeds with zero submissions is pruned from the registry only
//! when the batch requested exactly that one username; inside a larger
//! batch an empty result proves nothing (it may be transient), so the name
//! stays registered and uncached and will be fetched again by a later batch.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::api::{Submission, SubmissionSource};
use crate::registry::AccountRegistry;

/// Session-scoped tracker state
///
/// Created by the composing caller at session start and discarded at session
/// end; nothing here is persisted. All mutation goes through `&mut` access,
/// so two batches can never run against the same session concurrently.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    /// Fetched submission lists, keyed by username.
    /// An entry is written wholesale on first successful non-empty fetch and
    /// never merged incrementally afterwards.
    pub cache: HashMap<String, Vec<Submission>>,

    /// Tracked usernames in display order
    pub registry: AccountRegistry,

    /// Whether a batch is currently in flight
    pub loading: bool,

    /// Message from the last aborted batch; cleared when the next batch starts
    pub error: Option<String>,
}

impl SessionState {
    /// Create a session over a seeded registry
    pub fn new(registry: AccountRegistry) -> Self {
        Self {
            registry,
            ..Self::default()
        }
    }

    /// Cached submissions for a username (empty when never fetched)
    pub fn submissions(&self, username: &str) -> &[Submission] {
        self.cache.get(username).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Result of one batch sync
///
/// In both variants the partial commit has already been applied to the
/// session state; the caller only decides presentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    /// Every requested username was fetched or skipped
    Completed {
        /// Usernames newly added to the cache, in fetch order
        fetched: Vec<String>,
        /// Usernames removed under the singleton zero-submission rule.
        /// This is a user-visible notice, not an error.
        pruned: Vec<String>,
    },
    /// A fetch failed; the remaining usernames were not attempted
    Aborted {
        /// Username whose fetch failed
        username: String,
        /// Human-readable message, also stored in `SessionState::error`
        message: String,
        /// Usernames merged before the failure (kept, not rolled back)
        fetched: Vec<String>,
    },
}

/// The engine that runs batch syncs against a submission source
#[derive(Clone)]
pub struct SyncEngine {
    source: Arc<dyn SubmissionSource>,
}

impl SyncEngine {
    /// Create an engine over any submission source
    pub fn new(source: Arc<dyn SubmissionSource>) -> Self {
        Self { source }
    }

    /// Sync every username currently in the registry
    ///
    /// Used for the one-time startup seed sync and for manual refreshes;
    /// already-cached usernames cost nothing.
    pub async fn sync_all(&self, state: &mut SessionState) -> BatchOutcome {
        let batch = state.registry.usernames().to_vec();
        self.sync(state, &batch).await
    }

    /// Run one batch over the given usernames
    pub async fn sync(&self, state: &mut SessionState, batch: &[String]) -> BatchOutcome {
        state.loading = true;
        state.error = None;

        info!("Starting submission sync for {} username(s)", batch.len());

        // Working copies; committed below whether or not the loop aborts
        let mut cache = state.cache.clone();
        let mut registry = state.registry.clone();

        let mut fetched = Vec::new();
        let mut pruned = Vec::new();
        let mut failure: Option<(String, String)> = None;

        for username in batch {
            if cache.contains_key(username) {
                debug!("Already cached, skipping: {}", username);
                continue;
            }

            match self.source.fetch_submissions(username).await {
                Ok(submissions) if !submissions.is_empty() => {
                    debug!(
                        "Merged {} submissions for: {}",
                        submissions.len(),
                        username
                    );
                    cache.insert(username.clone(), submissions);
                    fetched.push(username.clone());
                }
                Ok(_) => {
                    // Zero submissions. Only a deliberate single-name batch
                    // can judge the account; inside a larger batch the empty
                    // result may be transient, so leave the name registered
                    // and uncached for a later retry.
                    if batch.len() == 1 && registry.prune(username) {
                        info!("Pruning {}: zero submissions", username);
                        pruned.push(username.clone());
                    } else {
                        debug!("Zero submissions for {} in multi-user batch", username);
                    }
                }
                Err(e) => {
                    let message = format!("Error for {}: {}", username, e);
                    warn!("{}", message);
                    failure = Some((username.clone(), message));
                    break;
                }
            }
        }

        // Commit: merged successes survive an abort
        state.cache = cache;
        state.registry = registry;

        let outcome = match failure {
            Some((username, message)) => {
                state.error = Some(message.clone());
                BatchOutcome::Aborted {
                    username,
                    message,
                    fetched,
                }
            }
            None => {
                info!(
                    "Sync completed: {} fetched, {} pruned",
                    fetched.len(),
                    pruned.len()
                );
                BatchOutcome::Completed { fetched, pruned }
            }
        };

        state.loading = false;
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Result};
    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Scripted source: a fixed response per username plus a call log
    #[derive(Default)]
    struct ScriptedSource {
        responses: HashMap<String, Result<Vec<Submission>, String>>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedSource {
        fn respond(mut self, username: &str, response: Result<Vec<Submission>, String>) -> Self {
            self.responses.insert(username.to_string(), response);
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().expect("call log poisoned").clone()
        }
    }

    #[async_trait]
    impl SubmissionSource for ScriptedSource {
        async fn fetch_submissions(&self, username: &str) -> Result<Vec<Submission>> {
            self.calls
                .lock()
                .expect("call log poisoned")
                .push(username.to_string());

            match self.responses.get(username) {
                Some(Ok(submissions)) => Ok(submissions.clone()),
                Some(Err(message)) => Err(anyhow!(message.clone())),
                None => Err(anyhow!("unscripted username: {}", username)),
            }
        }
    }

    fn submissions(n: usize) -> Vec<Submission> {
        (0..n)
            .map(|i| Submission {
                id: i.to_string(),
                title: format!("Problem {}", i),
                title_slug: format!("problem-{}", i),
                language: "rust".to_string(),
                time: "2024-01-01T00:00:00.000Z".to_string(),
            })
            .collect()
    }

    fn names(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn engine_and_state(
        source: ScriptedSource,
        seeds: &[&str],
    ) -> (SyncEngine, Arc<ScriptedSource>, SessionState) {
        let source = Arc::new(source);
        let engine = SyncEngine::new(source.clone() as Arc<dyn SubmissionSource>);
        let state = SessionState::new(AccountRegistry::new(&names(seeds)));
        (engine, source, state)
    }

    #[tokio::test]
    async fn test_sync_merges_and_completes() {
        let source = ScriptedSource::default()
            .respond("alice", Ok(submissions(2)))
            .respond("bob", Ok(submissions(1)));
        let (engine, _, mut state) = engine_and_state(source, &["alice", "bob"]);

        let outcome = engine.sync_all(&mut state).await;

        assert_eq!(
            outcome,
            BatchOutcome::Completed {
                fetched: names(&["alice", "bob"]),
                pruned: vec![],
            }
        );
        assert_eq!(state.submissions("alice").len(), 2);
        assert_eq!(state.submissions("bob").len(), 1);
        assert!(!state.loading);
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn test_cached_usernames_are_not_refetched() {
        let source = ScriptedSource::default()
            .respond("alice", Ok(submissions(2)))
            .respond("bob", Ok(submissions(1)));
        let (engine, source, mut state) = engine_and_state(source, &["alice", "bob"]);

        engine.sync_all(&mut state).await;
        let outcome = engine.sync_all(&mut state).await;

        // Second pass over a fully-cached set issues zero network calls
        assert_eq!(source.calls(), names(&["alice", "bob"]));
        assert_matches!(outcome, BatchOutcome::Completed { fetched, .. } if fetched.is_empty());
    }

    #[tokio::test]
    async fn test_failure_aborts_rest_of_batch_but_keeps_earlier_merges() {
        let source = ScriptedSource::default()
            .respond("a", Ok(submissions(1)))
            .respond("b", Err("user not found".to_string()))
            .respond("c", Ok(submissions(1)));
        let (engine, source, mut state) = engine_and_state(source, &["a", "b", "c"]);

        let outcome = engine.sync_all(&mut state).await;

        assert_matches!(
            outcome,
            BatchOutcome::Aborted { ref username, ref message, ref fetched }
                if username == "b"
                    && message == "Error for b: user not found"
                    && fetched == &names(&["a"])
        );
        // a committed, c never attempted
        assert_eq!(state.submissions("a").len(), 1);
        assert!(state.submissions("c").is_empty());
        assert_eq!(source.calls(), names(&["a", "b"]));
        assert_eq!(state.error.as_deref(), Some("Error for b: user not found"));
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_error_cleared_when_next_batch_starts() {
        let source = ScriptedSource::default()
            .respond("a", Err("boom".to_string()))
            .respond("b", Ok(submissions(1)));
        let (engine, _, mut state) = engine_and_state(source, &["a", "b"]);

        engine.sync(&mut state, &names(&["a"])).await;
        assert!(state.error.is_some());

        engine.sync(&mut state, &names(&["b"])).await;
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn test_singleton_empty_result_prunes() {
        let source = ScriptedSource::default().respond("ghost", Ok(vec![]));
        let (engine, _, mut state) = engine_and_state(source, &["alice", "ghost"]);
        state.cache.insert("alice".to_string(), submissions(1));

        let outcome = engine.sync(&mut state, &names(&["ghost"])).await;

        assert_eq!(
            outcome,
            BatchOutcome::Completed {
                fetched: vec![],
                pruned: names(&["ghost"]),
            }
        );
        assert!(!state.registry.contains("ghost"));
        assert!(state.registry.contains("alice"));
        assert!(!state.cache.contains_key("ghost"));
    }

    #[tokio::test]
    async fn test_multi_user_empty_result_is_kept_for_retry() {
        let source = ScriptedSource::default()
            .respond("x", Ok(vec![]))
            .respond("y", Ok(submissions(1)));
        let (engine, source, mut state) = engine_and_state(source, &["x", "y"]);

        let outcome = engine.sync_all(&mut state).await;

        assert_eq!(
            outcome,
            BatchOutcome::Completed {
                fetched: names(&["y"]),
                pruned: vec![],
            }
        );
        assert!(state.registry.contains("x"));
        assert!(!state.cache.contains_key("x"));

        // Never cached, so a later batch fetches x again
        engine.sync_all(&mut state).await;
        assert_eq!(source.calls(), names(&["x", "y", "x"]));
    }

    #[tokio::test]
    async fn test_failed_username_is_retried_next_batch() {
        let source = ScriptedSource::default().respond("a", Err("down".to_string()));
        let (engine, source, mut state) = engine_and_state(source, &["a"]);

        engine.sync_all(&mut state).await;
        engine.sync_all(&mut state).await;

        // A failed fetch leaves no cache entry, so it is not skipped
        assert_eq!(source.calls(), names(&["a", "a"]));
    }
}
