use std::fmt;

use serde_json::json;
use tracing::{debug, warn};

use squalldb_common::{RequestError, SquallError, SquallResult, StoreError};
use squalldb_storage::{Store, Value};

use crate::request::{Method, Request};

/// Status visível ao chamador.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    BadRequest,
    NotFound,
    ServiceUnavailable,
}

impl Status {
    pub fn code(self) -> u16 {
        match self {
            Status::Ok => 200,
            Status::BadRequest => 400,
            Status::NotFound => 404,
            Status::ServiceUnavailable => 503,
        }
    }
}

/// Resposta: status + corpo JSON opcional.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: Status,
    pub body: Option<serde_json::Value>,
}

impl Response {
    pub fn ok() -> Self {
        Self {
            status: Status::Ok,
            body: None,
        }
    }

    pub fn value(value: serde_json::Value) -> Self {
        Self {
            status: Status::Ok,
            body: Some(json!({ "value": value })),
        }
    }

    pub fn error(status: Status, message: impl Into<String>) -> Self {
        Self {
            status,
            body: Some(json!({ "error": message.into() })),
        }
    }

    /// Traduz falhas em respostas de erro: requisição inválida vira erro do
    /// cliente, falha de entrega no store vira indisponibilidade.
    pub fn from_error(err: &SquallError) -> Self {
        match err {
            SquallError::Request(RequestError::UnknownRoute) => {
                Response::error(Status::NotFound, "route not found")
            }
            SquallError::Request(RequestError::InvalidBody(_)) => {
                Response::error(Status::BadRequest, "invalid request body")
            }
            SquallError::Store(e) => Response::error(Status::ServiceUnavailable, e.to_string()),
        }
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.body {
            Some(body) => write!(f, "{} {body}", self.status.code()),
            None => write!(f, "{}", self.status.code()),
        }
    }
}

/// Faz o parse e executa a requisição, sempre produzindo uma resposta.
pub async fn dispatch(store: &Store, method: Method, path: &str, body: Option<&str>) -> Response {
    match try_dispatch(store, method, path, body).await {
        Ok(response) => response,
        Err(e) => {
            log_failure(&e, method, path);
            Response::from_error(&e)
        }
    }
}

pub async fn try_dispatch(
    store: &Store,
    method: Method,
    path: &str,
    body: Option<&str>,
) -> SquallResult<Response> {
    let request = Request::parse(method, path, body)?;
    debug!("requisição recebida: {request:?}");
    Ok(execute(store, request).await?)
}

/// Executa uma requisição já validada.
pub async fn handle(store: &Store, request: Request) -> Response {
    debug!("requisição recebida: {request:?}");

    match execute(store, request).await {
        Ok(response) => response,
        Err(e) => {
            warn!("store indisponível: {e}");
            Response::from_error(&e.into())
        }
    }
}

fn log_failure(err: &SquallError, method: Method, path: &str) {
    match err {
        SquallError::Request(e) => debug!("requisição inválida {method:?} {path}: {e}"),
        SquallError::Store(e) => warn!("store indisponível em {method:?} {path}: {e}"),
    }
}

async fn execute(store: &Store, request: Request) -> Result<Response, StoreError> {
    let response = match request {
        Request::Get(key) => match store.get(key).await? {
            Some(value) => Response::value(value_to_json(value)),
            None => Response::error(Status::NotFound, "key not found"),
        },
        Request::Set { key, value, ttl } => {
            store.set(key, value, ttl).await?;
            Response::ok()
        }
        Request::Update { key, value } => {
            if store.update(key, value).await? {
                Response::ok()
            } else {
                Response::error(Status::NotFound, "key not found")
            }
        }
        Request::Remove(key) => {
            store.remove(key).await?;
            Response::ok()
        }
        Request::Push { key, item } => {
            store.push(key, item).await?;
            Response::ok()
        }
        Request::Pop(key) => match store.pop(key).await? {
            Some(item) => Response::value(json!(item)),
            None => Response::error(Status::NotFound, "list empty or not found"),
        },
    };

    Ok(response)
}

fn value_to_json(value: Value) -> serde_json::Value {
    match value {
        Value::Scalar(s) => json!(s),
        Value::List(items) => json!(items),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(Status::Ok.code(), 200);
        assert_eq!(Status::BadRequest.code(), 400);
        assert_eq!(Status::NotFound.code(), 404);
        assert_eq!(Status::ServiceUnavailable.code(), 503);
    }

    #[test]
    fn response_display() {
        assert_eq!(Response::ok().to_string(), "200");
        assert_eq!(
            Response::error(Status::NotFound, "key not found").to_string(),
            r#"404 {"error":"key not found"}"#
        );
    }

    #[test]
    fn list_value_renders_as_array() {
        let value = Value::from(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(value_to_json(value), json!(["a", "b"]));
    }

    #[test]
    fn errors_map_to_statuses() {
        let cases = [
            (SquallError::from(RequestError::UnknownRoute), Status::NotFound),
            (
                SquallError::from(RequestError::InvalidBody("x".into())),
                Status::BadRequest,
            ),
            (SquallError::from(StoreError::QueueFull), Status::ServiceUnavailable),
            (SquallError::from(StoreError::Closed), Status::ServiceUnavailable),
        ];
        for (err, status) in cases {
            assert_eq!(Response::from_error(&err).status, status, "{err}");
        }
    }

    #[test]
    fn store_error_message_is_forwarded() {
        let response = Response::from_error(&StoreError::QueueFull.into());
        assert_eq!(
            response.body,
            Some(json!({ "error": "fila de comandos cheia" }))
        );
    }
}
