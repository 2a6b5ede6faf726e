use std::time::Duration;

/// Erros de transporte de comandos entre o facade e o dono do store.
///
/// Não representam resultados do store: chave ausente, lista vazia e update
/// sem alvo continuam sendo `None`/`false`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("fila de comandos cheia")]
    QueueFull,
    #[error("tempo esgotado aguardando vaga na fila ({0:?})")]
    EnqueueTimeout(Duration),
    #[error("tempo esgotado aguardando resposta ({0:?})")]
    ReplyTimeout(Duration),
    #[error("store encerrado")]
    Closed,
}

/// Erros de tradução de requisições.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    #[error("rota não encontrada")]
    UnknownRoute,
    #[error("corpo da requisição inválido: {0}")]
    InvalidBody(String),
}

/// Erro top-level do SquallDB.
#[derive(Debug, thiserror::Error)]
pub enum SquallError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Request(#[from] RequestError),
}

/// Result type alias.
pub type SquallResult<T> = Result<T, SquallError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_display() {
        let err = StoreError::QueueFull;
        assert_eq!(err.to_string(), "fila de comandos cheia");
    }

    #[test]
    fn timeout_display_includes_duration() {
        let err = StoreError::ReplyTimeout(Duration::from_millis(250));
        assert_eq!(err.to_string(), "tempo esgotado aguardando resposta (250ms)");
    }

    #[test]
    fn squall_error_from_store() {
        let err: SquallError = StoreError::Closed.into();
        assert!(matches!(err, SquallError::Store(StoreError::Closed)));
    }

    #[test]
    fn squall_error_from_request() {
        let err: SquallError = RequestError::UnknownRoute.into();
        assert!(matches!(
            err,
            SquallError::Request(RequestError::UnknownRoute)
        ));
    }

    #[test]
    fn request_error_display() {
        let err = RequestError::InvalidBody("ttl negativo".into());
        assert_eq!(err.to_string(), "corpo da requisição inválido: ttl negativo");
    }
}
