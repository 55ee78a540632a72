//! Style-aware rewrite over interchangeable backends.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use softline_protocols::{
    PipelineError, ProviderError, ServiceKind, Settings, TransformBackend, TransformRequest,
    TransformResult,
};
use tracing::{debug, warn};

use crate::prompts::system_prompt;

pub const REMOTE_DISABLED: &str = "remote transform disabled";

/// Routes rewrite calls to the backend registered for a [`ServiceKind`].
#[derive(Default)]
pub struct TransformService {
    backends: HashMap<ServiceKind, Arc<dyn TransformBackend>>,
}

impl TransformService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `backend` under its own kind, replacing any previous one.
    pub fn register(&mut self, backend: Arc<dyn TransformBackend>) {
        debug!(provider = backend.id(), kind = %backend.kind(), "Registered transform backend");
        self.backends.insert(backend.kind(), backend);
    }

    pub fn with_backend(mut self, backend: Arc<dyn TransformBackend>) -> Self {
        self.register(backend);
        self
    }

    pub fn has_backend(&self, kind: ServiceKind) -> bool {
        self.backends.contains_key(&kind)
    }

    pub fn kinds(&self) -> Vec<ServiceKind> {
        let mut kinds: Vec<_> = self.backends.keys().copied().collect();
        kinds.sort_by_key(|k| k.as_str());
        kinds
    }

    /// Rewrite `text`. Failures come back as `success: false`, never as an error.
    pub async fn transform(&self, text: &str, backend: ServiceKind, style_key: &str) -> TransformResult {
        match self.execute(text, backend, style_key).await {
            Ok(result) => result,
            Err(e) => TransformResult::failed(backend, e.to_string(), 0),
        }
    }

    /// Like [`transform`](Self::transform) but honours the remote switch in
    /// `settings` and uses its backend and style.
    pub async fn transform_with(&self, settings: &Settings, text: &str) -> TransformResult {
        if !settings.use_remote_transform {
            return TransformResult::failed(settings.backend, REMOTE_DISABLED, 0);
        }
        self.transform(text, settings.backend, &settings.style_key).await
    }

    /// Rewrite, distinguishing a lost execution context from an ordinary
    /// failure so the caller can tear down.
    pub(crate) async fn execute(
        &self,
        text: &str,
        backend: ServiceKind,
        style_key: &str,
    ) -> Result<TransformResult, PipelineError> {
        let start = Instant::now();
        let Some(provider) = self.backends.get(&backend) else {
            return Ok(TransformResult::failed(
                backend,
                format!("no backend configured for {backend}"),
                0,
            ));
        };

        let request = TransformRequest::new(text, system_prompt(style_key));
        let outcome = provider.rewrite(request).await;
        let elapsed = start.elapsed().as_millis() as u64;

        match outcome {
            Ok(output) => {
                debug!(provider = provider.id(), elapsed_ms = elapsed, "Rewrite succeeded");
                Ok(TransformResult::succeeded(backend, output.text.trim(), elapsed))
            }
            Err(ProviderError::ContextInvalidated) => Err(PipelineError::ContextInvalidated),
            Err(e) => {
                warn!(provider = provider.id(), error = %e, elapsed_ms = elapsed, "Rewrite failed");
                Ok(TransformResult::failed(backend, e.to_string(), elapsed))
            }
        }
    }
}
