use crate::connectors::ConnectorRegistry;
use crate::dispatcher::{DispatchPolicy, Dispatcher};
use crate::error::ResolutionResult;
use crate::evaluator::{IntegrityEvaluator, IntegrityReport};
use crate::merger::{DataMerger, SmartBreakdown};
use crate::models::ResolutionRequest;
use crate::registry::FieldRegistry;
use config_engine::EngineConfig;
use std::sync::Arc;
use tracing::{info, instrument};

/// Benefit resolution pipeline: evaluate, build jobs, dispatch, merge.
///
/// Built once at startup and shared; every call is independent of the last.
pub struct BenefitResolutionService {
    registry: Arc<FieldRegistry>,
    evaluator: IntegrityEvaluator,
    dispatcher: Dispatcher,
    merger: DataMerger,
}

impl BenefitResolutionService {
    pub fn new(
        registry: Arc<FieldRegistry>,
        connectors: ConnectorRegistry,
        policy: DispatchPolicy,
    ) -> Self {
        Self {
            evaluator: IntegrityEvaluator::new(Arc::clone(&registry)),
            dispatcher: Dispatcher::new(connectors, policy),
            merger: DataMerger::new(Arc::clone(&registry)),
            registry,
        }
    }

    /// Load the registry and build every configured connector.
    ///
    /// Fails on any registry or connector configuration problem, before a
    /// single request is served.
    pub fn from_config(config: &EngineConfig) -> ResolutionResult<Self> {
        let registry = Arc::new(FieldRegistry::load(config.registry.path.as_deref())?);
        let connectors = ConnectorRegistry::from_settings(&config.connectors, &registry)?;
        let policy = DispatchPolicy::from(&config.dispatch);

        info!(
            registry = registry.name(),
            fields = registry.len(),
            connectors = connectors.len(),
            max_concurrent_jobs = policy.max_concurrent_jobs,
            "Benefit resolution service ready"
        );

        Ok(Self::new(registry, connectors, policy))
    }

    pub fn registry(&self) -> &Arc<FieldRegistry> {
        &self.registry
    }

    /// Integrity report only; no secondary retrieval
    #[instrument(skip_all, fields(patient_id = %request.identity.patient_id))]
    pub fn evaluate(&self, request: &ResolutionRequest) -> ResolutionResult<IntegrityReport> {
        self.evaluator.evaluate(
            &request.document,
            &request.scheduled_procedures,
            &request.identity,
        )
    }

    /// Full pipeline
    #[instrument(skip_all, fields(patient_id = %request.identity.patient_id))]
    pub async fn resolve(&self, request: &ResolutionRequest) -> ResolutionResult<SmartBreakdown> {
        let report = self.evaluate(request)?;
        let recovered = self.dispatcher.dispatch(report.retrieval_jobs.clone()).await;
        Ok(self.merger.merge(
            &request.document,
            &recovered,
            &report,
            &request.scheduled_procedures,
        ))
    }
}
