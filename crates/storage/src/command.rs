use tokio::sync::oneshot;
use tokio::time::Duration;

use crate::entry::Value;

/// Conduto de resposta de uso único.
pub(crate) type Reply<T> = oneshot::Sender<T>;

/// Operação pendente na fila, junto com o conduto onde o chamador aguarda.
#[derive(Debug)]
pub(crate) enum Command {
    Get {
        key: String,
        reply: Reply<Option<Value>>,
    },
    Set {
        key: String,
        value: Value,
        ttl: Duration,
        reply: Reply<()>,
    },
    Update {
        key: String,
        value: Value,
        reply: Reply<bool>,
    },
    Remove {
        key: String,
        reply: Reply<()>,
    },
    Push {
        key: String,
        item: String,
        reply: Reply<()>,
    },
    Pop {
        key: String,
        reply: Reply<Option<String>>,
    },
    Len {
        reply: Reply<usize>,
    },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Get { .. } => "GET",
            Command::Set { .. } => "SET",
            Command::Update { .. } => "UPDATE",
            Command::Remove { .. } => "REMOVE",
            Command::Push { .. } => "PUSH",
            Command::Pop { .. } => "POP",
            Command::Len { .. } => "LEN",
        }
    }
}
