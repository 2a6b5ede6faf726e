use std::collections::VecDeque;
use tokio::time::Instant;

/// Tipo do valor armazenado.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Scalar(String),
    List(VecDeque<String>),
}

impl Value {
    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Scalar(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Scalar(s)
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Value::List(items.into())
    }
}

impl From<VecDeque<String>> for Value {
    fn from(items: VecDeque<String>) -> Self {
        Value::List(items)
    }
}

/// Entrada no store: valor + expiração opcional.
#[derive(Debug, Clone)]
pub(crate) struct Entry {
    pub value: Value,
    pub expires_at: Option<Instant>,
}

impl Entry {
    pub fn new(value: Value, expires_at: Option<Instant>) -> Self {
        Self { value, expires_at }
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    pub fn is_expired_at(&self, now: Instant) -> bool {
        self.expires_at.map(|t| now >= t).unwrap_or(false)
    }
}
