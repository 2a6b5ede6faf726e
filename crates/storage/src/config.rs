use std::time::Duration;

use squalldb_common::{DEFAULT_QUEUE_CAPACITY, DEFAULT_SWEEP_INTERVAL};

/// O que o produtor faz quando a fila de comandos está cheia.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum QueueFullPolicy {
    /// Aguarda indefinidamente por uma vaga.
    #[default]
    Block,
    /// Aguarda no máximo a duração dada, depois falha com `EnqueueTimeout`.
    Timeout(Duration),
    /// Falha imediatamente com `QueueFull`.
    Reject,
}

/// Configuração do store.
///
/// ```rust
/// use squalldb_storage::{QueueFullPolicy, StoreConfig};
/// use std::time::Duration;
///
/// let config = StoreConfig::default()
///     .with_sweep_interval(Duration::from_millis(500))
///     .with_full_policy(QueueFullPolicy::Reject);
/// assert_eq!(config.queue_capacity, 1000);
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Capacidade da fila de comandos (mínimo 1).
    pub queue_capacity: usize,
    /// Intervalo entre varreduras de expiração (mínimo 1ms).
    pub sweep_interval: Duration,
    pub full_policy: QueueFullPolicy,
    /// Limite de espera pela resposta; `None` espera para sempre.
    pub reply_timeout: Option<Duration>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            full_policy: QueueFullPolicy::Block,
            reply_timeout: None,
        }
    }
}

impl StoreConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    pub fn with_full_policy(mut self, policy: QueueFullPolicy) -> Self {
        self.full_policy = policy;
        self
    }

    pub fn with_reply_timeout(mut self, timeout: Duration) -> Self {
        self.reply_timeout = Some(timeout);
        self
    }

    pub(crate) fn effective_capacity(&self) -> usize {
        self.queue_capacity.max(1)
    }

    pub(crate) fn effective_sweep_interval(&self) -> Duration {
        self.sweep_interval.max(Duration::from_millis(1))
    }
}
