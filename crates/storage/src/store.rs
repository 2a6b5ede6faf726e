use tokio::sync::mpsc::error::{SendTimeoutError, TrySendError};
use tokio::sync::{mpsc, oneshot};
use tokio::time::{Duration, timeout};
use tracing::warn;

use squalldb_common::StoreError;

use crate::command::Command;
use crate::config::{QueueFullPolicy, StoreConfig};
use crate::entry::Value;
use crate::owner::Owner;

/// Handle para o store in-memory.
///
/// Cada operação vira um `Command` na fila e suspende a task chamadora até o
/// dono do store responder. Clonar é barato; o dono encerra quando o último
/// handle é descartado.
///
/// Os resultados do store (chave ausente, lista vazia, update sem alvo) vêm
/// como `None`/`false`. `StoreError` só aparece quando o comando não pôde ser
/// entregue ou respondido.
#[derive(Clone)]
pub struct Store {
    tx: mpsc::Sender<Command>,
    full_policy: QueueFullPolicy,
    reply_timeout: Option<Duration>,
}

impl Store {
    /// Cria um store com a configuração padrão.
    ///
    /// # Panics
    ///
    /// Entra em pânico fora de um runtime Tokio, pois precisa criar a task dona.
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Cria um store e spawna sua task dona.
    ///
    /// # Panics
    ///
    /// Entra em pânico fora de um runtime Tokio.
    pub fn with_config(config: StoreConfig) -> Self {
        let (store, owner) = Self::detached(&config);
        tokio::spawn(owner.run());
        store
    }

    /// Handle e dono ainda não iniciado.
    pub(crate) fn detached(config: &StoreConfig) -> (Self, Owner) {
        let (tx, rx) = mpsc::channel(config.effective_capacity());
        let owner = Owner::new(rx, config.effective_sweep_interval());
        let store = Store {
            tx,
            full_policy: config.full_policy,
            reply_timeout: config.reply_timeout,
        };
        (store, owner)
    }

    /// Substitui incondicionalmente o valor. `ttl` zero significa sem expiração.
    pub async fn set(
        &self,
        key: impl Into<String>,
        value: impl Into<Value>,
        ttl: Duration,
    ) -> Result<(), StoreError> {
        let (key, value) = (key.into(), value.into());
        self.request(|reply| Command::Set {
            key,
            value,
            ttl,
            reply,
        })
        .await
    }

    pub async fn get(&self, key: impl Into<String>) -> Result<Option<Value>, StoreError> {
        let key = key.into();
        self.request(|reply| Command::Get { key, reply }).await
    }

    /// Troca o payload de uma chave viva, mantendo tipo e expiração.
    /// Retorna `false` se a chave não existe, expirou ou guarda outro tipo.
    pub async fn update(
        &self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<bool, StoreError> {
        let (key, value) = (key.into(), value.into());
        self.request(|reply| Command::Update { key, value, reply })
            .await
    }

    pub async fn remove(&self, key: impl Into<String>) -> Result<(), StoreError> {
        let key = key.into();
        self.request(|reply| Command::Remove { key, reply }).await
    }

    /// Adiciona `item` ao fim da lista. Uma chave ausente, expirada ou escalar
    /// é substituída por uma lista nova, sem expiração.
    pub async fn push(
        &self,
        key: impl Into<String>,
        item: impl Into<String>,
    ) -> Result<(), StoreError> {
        let (key, item) = (key.into(), item.into());
        self.request(|reply| Command::Push { key, item, reply })
            .await
    }

    /// Remove e retorna o item do início da lista (ordem FIFO).
    pub async fn pop(&self, key: impl Into<String>) -> Result<Option<String>, StoreError> {
        let key = key.into();
        self.request(|reply| Command::Pop { key, reply }).await
    }

    /// Número de entradas armazenadas, incluindo expiradas ainda não varridas.
    pub async fn len(&self) -> Result<usize, StoreError> {
        self.request(|reply| Command::Len { reply }).await
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, StoreError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.enqueue(build(reply_tx)).await?;
        self.await_reply(reply_rx).await
    }

    async fn enqueue(&self, cmd: Command) -> Result<(), StoreError> {
        match self.full_policy {
            QueueFullPolicy::Block => self.tx.send(cmd).await.map_err(|_| StoreError::Closed),
            QueueFullPolicy::Timeout(limit) => {
                self.tx.send_timeout(cmd, limit).await.map_err(|e| match e {
                    SendTimeoutError::Timeout(cmd) => {
                        warn!("fila cheia: {} descartado após {limit:?}", cmd.name());
                        StoreError::EnqueueTimeout(limit)
                    }
                    SendTimeoutError::Closed(_) => StoreError::Closed,
                })
            }
            QueueFullPolicy::Reject => self.tx.try_send(cmd).map_err(|e| match e {
                TrySendError::Full(cmd) => {
                    warn!("fila cheia: {} rejeitado", cmd.name());
                    StoreError::QueueFull
                }
                TrySendError::Closed(_) => StoreError::Closed,
            }),
        }
    }

    async fn await_reply<T>(&self, reply: oneshot::Receiver<T>) -> Result<T, StoreError> {
        match self.reply_timeout {
            Some(limit) => match timeout(limit, reply).await {
                Ok(result) => result.map_err(|_| StoreError::Closed),
                Err(_) => {
                    warn!("sem resposta do store após {limit:?}");
                    Err(StoreError::ReplyTimeout(limit))
                }
            },
            None => reply.await.map_err(|_| StoreError::Closed),
        }
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}
