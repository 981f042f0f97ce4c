//! Process-wide lifecycle gating.
//!
//! One `ReadinessController` owns the ingestion pipeline, the provider pair
//! and (once built) the answerer. Initialization runs at most once per
//! process: a tokio mutex serializes it, so concurrent first requests under
//! the lazy policy block until the single run resolves instead of racing
//! into duplicate embedding work. A failed initialization is terminal until
//! restart.

use crate::answer::RetrievalAnswerer;
use crate::embed::EmbeddingProvider;
use crate::generate::GenerationProvider;
use crate::ingest::IngestionPipeline;
use crate::models::AnswerResult;
use crate::{RagError, Result};
use std::sync::{Arc, RwLock};
use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitPolicy {
    /// Initialize once at startup, before serving; requests arriving
    /// earlier are rejected with `NotReady`.
    Eager,
    /// Initialize on the first request; concurrent first requests block
    /// until the single run resolves.
    Lazy,
}

/// Externally observable lifecycle state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadinessState {
    Uninitialized,
    Initializing,
    Ready,
    Degraded(String),
}

impl ReadinessState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadinessState::Uninitialized => "uninitialized",
            ReadinessState::Initializing => "initializing",
            ReadinessState::Ready => "ready",
            ReadinessState::Degraded(_) => "degraded",
        }
    }
}

enum Slot {
    Uninitialized,
    Initializing,
    Ready(Arc<RetrievalAnswerer>),
    Degraded(String),
}

pub struct ReadinessController {
    pipeline: IngestionPipeline,
    embedder: Arc<dyn EmbeddingProvider>,
    generator: Arc<dyn GenerationProvider>,
    top_k: usize,
    policy: InitPolicy,
    /// Serializes the at-most-once initialization run.
    init_lock: Mutex<()>,
    /// Never held across an await.
    slot: RwLock<Slot>,
}

impl ReadinessController {
    pub fn new(
        pipeline: IngestionPipeline,
        embedder: Arc<dyn EmbeddingProvider>,
        generator: Arc<dyn GenerationProvider>,
        top_k: usize,
        policy: InitPolicy,
    ) -> Self {
        Self {
            pipeline,
            embedder,
            generator,
            top_k,
            policy,
            init_lock: Mutex::new(()),
            slot: RwLock::new(Slot::Uninitialized),
        }
    }

    pub fn policy(&self) -> InitPolicy {
        self.policy
    }

    pub fn state(&self) -> ReadinessState {
        match &*self.slot.read().expect("readiness slot poisoned") {
            Slot::Uninitialized => ReadinessState::Uninitialized,
            Slot::Initializing => ReadinessState::Initializing,
            Slot::Ready(_) => ReadinessState::Ready,
            Slot::Degraded(reason) => ReadinessState::Degraded(reason.clone()),
        }
    }

    /// Run initialization now (the eager path). Idempotent: a second call
    /// returns without re-ingesting.
    pub async fn initialize(&self) -> Result<()> {
        self.ensure_ready().await.map(|_| ())
    }

    /// Answer a question, initializing first if the policy is lazy.
    pub async fn answer(&self, question: &str) -> Result<AnswerResult> {
        let answerer = {
            match &*self.slot.read().expect("readiness slot poisoned") {
                Slot::Ready(answerer) => Some(answerer.clone()),
                Slot::Degraded(reason) => {
                    return Err(RagError::ServiceUnavailable(reason.clone()));
                }
                Slot::Uninitialized | Slot::Initializing => None,
            }
        };

        let answerer = match answerer {
            Some(a) => a,
            None => match self.policy {
                InitPolicy::Lazy => self.ensure_ready().await?,
                InitPolicy::Eager => {
                    return Err(RagError::NotReady(
                        "initialization has not completed".into(),
                    ));
                }
            },
        };

        answerer.answer(question).await
    }

    async fn ensure_ready(&self) -> Result<Arc<RetrievalAnswerer>> {
        let _guard = self.init_lock.lock().await;

        // Re-check under the lock: another caller may have finished (or
        // failed) initialization while we waited.
        match &*self.slot.read().expect("readiness slot poisoned") {
            Slot::Ready(answerer) => return Ok(answerer.clone()),
            Slot::Degraded(reason) => {
                return Err(RagError::ServiceUnavailable(reason.clone()));
            }
            Slot::Uninitialized | Slot::Initializing => {}
        }

        self.set_slot(Slot::Initializing);
        tracing::info!("initializing answering pipeline");

        match self.pipeline.ingest(self.embedder.as_ref()).await {
            Ok(index) => {
                let answerer = Arc::new(RetrievalAnswerer::new(
                    Arc::new(index),
                    self.embedder.clone(),
                    self.generator.clone(),
                    self.top_k,
                ));
                self.set_slot(Slot::Ready(answerer.clone()));
                tracing::info!("pipeline ready");
                Ok(answerer)
            }
            Err(e) => {
                let reason = e.to_string();
                tracing::error!(%reason, "initialization failed, service degraded");
                self.set_slot(Slot::Degraded(reason.clone()));
                Err(RagError::ServiceUnavailable(reason))
            }
        }
    }

    fn set_slot(&self, slot: Slot) {
        *self.slot.write().expect("readiness slot poisoned") = slot;
    }
}
