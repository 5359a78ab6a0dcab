use std::sync::Arc;

use agent_core::{AgentConnector, HttpAgentConnector};
use stateful_evaluator::{EvaluatorFactory, PageEvaluatorFactory};
use task_catalog::TaskCatalog;
use tokio::sync::Semaphore;

use crate::config::EnvConfig;

/// Shared, read-only service state. Cloned per request.
#[derive(Clone)]
pub struct EnvState {
    pub(crate) config: Arc<EnvConfig>,
    pub(crate) catalog: Arc<TaskCatalog>,
    pub(crate) connector: Arc<dyn AgentConnector>,
    pub(crate) evaluator: Arc<dyn EvaluatorFactory>,
    pub(crate) workers: Arc<Semaphore>,
}

impl EnvState {
    /// State wired with the HTTP agent connector and the page evaluator.
    pub fn new(config: EnvConfig) -> Self {
        let catalog = config.task_catalog();
        let connector = HttpAgentConnector::new(config.agent_timeout());
        let evaluator = PageEvaluatorFactory::new(config.evaluator.page_config());
        let workers = Semaphore::new(config.worker_limit.max(1));

        Self {
            config: Arc::new(config),
            catalog: Arc::new(catalog),
            connector: Arc::new(connector),
            evaluator: Arc::new(evaluator),
            workers: Arc::new(workers),
        }
    }

    pub fn with_catalog(mut self, catalog: TaskCatalog) -> Self {
        self.catalog = Arc::new(catalog);
        self
    }

    pub fn with_connector(mut self, connector: Arc<dyn AgentConnector>) -> Self {
        self.connector = connector;
        self
    }

    pub fn with_evaluator(mut self, evaluator: Arc<dyn EvaluatorFactory>) -> Self {
        self.evaluator = evaluator;
        self
    }

    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    pub fn catalog(&self) -> &TaskCatalog {
        &self.catalog
    }
}
