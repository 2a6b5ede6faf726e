use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use squalldb_common::RequestError;
use squalldb_storage::Value;

/// Método da requisição.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl FromStr for Method {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "DELETE" => Ok(Method::Delete),
            _ => Err(RequestError::UnknownRoute),
        }
    }
}

/// Requisição já validada; cada variante vira exatamente uma chamada no store.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Get(String),
    Set {
        key: String,
        value: Value,
        ttl: Duration,
    },
    Update {
        key: String,
        value: Value,
    },
    Remove(String),
    Push {
        key: String,
        item: String,
    },
    Pop(String),
}

/// Valor no corpo JSON: string vira escalar, array de strings vira lista.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Payload {
    Scalar(String),
    List(Vec<String>),
}

impl From<Payload> for Value {
    fn from(payload: Payload) -> Self {
        match payload {
            Payload::Scalar(s) => Value::from(s),
            Payload::List(items) => Value::from(items),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SetBody {
    value: Payload,
    /// Segundos; 0 significa sem expiração.
    #[serde(default)]
    ttl: u64,
}

#[derive(Debug, Deserialize)]
struct UpdateBody {
    value: Payload,
}

#[derive(Debug, Deserialize)]
struct PushBody {
    value: String,
}

impl Request {
    /// Faz o parse de método + caminho (`/<rota>/<chave>`) + corpo JSON.
    pub fn parse(method: Method, path: &str, body: Option<&str>) -> Result<Request, RequestError> {
        let (route, key) = split_path(path)?;

        let request = match (method, route) {
            (Method::Get, "get") => Request::Get(key),
            (Method::Post, "set") => {
                let body: SetBody = parse_body(body)?;
                Request::Set {
                    key,
                    value: body.value.into(),
                    ttl: Duration::from_secs(body.ttl),
                }
            }
            (Method::Post, "update") => {
                let body: UpdateBody = parse_body(body)?;
                Request::Update {
                    key,
                    value: body.value.into(),
                }
            }
            (Method::Delete, "remove") => Request::Remove(key),
            (Method::Post, "push") => {
                let body: PushBody = parse_body(body)?;
                Request::Push {
                    key,
                    item: body.value,
                }
            }
            (Method::Post, "pop") => Request::Pop(key),
            _ => return Err(RequestError::UnknownRoute),
        };

        Ok(request)
    }
}

fn split_path(path: &str) -> Result<(&str, String), RequestError> {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    let (route, key) = trimmed
        .split_once('/')
        .ok_or(RequestError::UnknownRoute)?;

    if key.is_empty() || key.contains('/') {
        return Err(RequestError::UnknownRoute);
    }
    Ok((route, key.to_string()))
}

fn parse_body<T: DeserializeOwned>(body: Option<&str>) -> Result<T, RequestError> {
    let raw = body.ok_or_else(|| RequestError::InvalidBody("corpo ausente".into()))?;
    serde_json::from_str(raw).map_err(|e| RequestError::InvalidBody(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_method_case_insensitive() {
        assert_eq!("get".parse::<Method>().unwrap(), Method::Get);
        assert_eq!("Delete".parse::<Method>().unwrap(), Method::Delete);
        assert!("PATCH".parse::<Method>().is_err());
    }

    #[test]
    fn parse_get() {
        let req = Request::parse(Method::Get, "/get/foo", None).unwrap();
        assert_eq!(req, Request::Get("foo".into()));
    }

    #[test]
    fn parse_set_scalar_with_ttl() {
        let req = Request::parse(
            Method::Post,
            "/set/foo",
            Some(r#"{"value": "bar", "ttl": 60}"#),
        )
        .unwrap();
        assert_eq!(
            req,
            Request::Set {
                key: "foo".into(),
                value: Value::from("bar"),
                ttl: Duration::from_secs(60),
            }
        );
    }

    #[test]
    fn parse_set_list_defaults_ttl_to_zero() {
        let req = Request::parse(Method::Post, "/set/L", Some(r#"{"value": ["a", "b"]}"#)).unwrap();
        assert_eq!(
            req,
            Request::Set {
                key: "L".into(),
                value: Value::from(vec!["a".to_string(), "b".to_string()]),
                ttl: Duration::ZERO,
            }
        );
    }

    #[test]
    fn parse_set_rejects_negative_ttl() {
        let err = Request::parse(
            Method::Post,
            "/set/foo",
            Some(r#"{"value": "bar", "ttl": -1}"#),
        )
        .unwrap_err();
        assert!(matches!(err, RequestError::InvalidBody(_)));
    }

    #[test]
    fn parse_push_requires_string_item() {
        let err =
            Request::parse(Method::Post, "/push/L", Some(r#"{"value": ["a"]}"#)).unwrap_err();
        assert!(matches!(err, RequestError::InvalidBody(_)));

        let req = Request::parse(Method::Post, "/push/L", Some(r#"{"value": "a"}"#)).unwrap();
        assert_eq!(
            req,
            Request::Push {
                key: "L".into(),
                item: "a".into(),
            }
        );
    }

    #[test]
    fn parse_missing_body() {
        let err = Request::parse(Method::Post, "/update/foo", None).unwrap_err();
        assert!(matches!(err, RequestError::InvalidBody(_)));
    }

    #[test]
    fn parse_pop_and_remove_ignore_body() {
        assert_eq!(
            Request::parse(Method::Post, "/pop/L", None).unwrap(),
            Request::Pop("L".into())
        );
        assert_eq!(
            Request::parse(Method::Delete, "/remove/k", None).unwrap(),
            Request::Remove("k".into())
        );
    }

    #[test]
    fn parse_unknown_routes() {
        for (method, path) in [
            (Method::Post, "/get/foo"),
            (Method::Get, "/set/foo"),
            (Method::Get, "/get/"),
            (Method::Get, "/get"),
            (Method::Get, "/get/a/b"),
            (Method::Get, "/other/foo"),
        ] {
            assert_eq!(
                Request::parse(method, path, None),
                Err(RequestError::UnknownRoute),
                "{method:?} {path}"
            );
        }
    }
}
