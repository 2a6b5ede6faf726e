use std::collections::{HashMap, VecDeque};

use tokio::sync::mpsc;
use tokio::time::{Duration, Instant, MissedTickBehavior, interval};
use tracing::{debug, info};

use crate::command::Command;
use crate::entry::{Entry, Value};

/// Dono único do mapa chave → entrada.
///
/// Nenhum outro código lê ou escreve `data`; tudo chega pela fila de comandos.
/// Cada comando e cada varredura executam até o fim antes do próximo evento.
pub(crate) struct Owner {
    data: HashMap<String, Entry>,
    rx: mpsc::Receiver<Command>,
    sweep_interval: Duration,
}

impl Owner {
    pub fn new(rx: mpsc::Receiver<Command>, sweep_interval: Duration) -> Self {
        Self {
            data: HashMap::new(),
            rx,
            sweep_interval,
        }
    }

    /// Loop principal: alterna entre comandos da fila e ticks de varredura.
    /// Encerra quando todos os handles do `Store` forem descartados.
    pub async fn run(mut self) {
        let mut ticker = interval(self.sweep_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            "dono do store iniciado (varredura a cada {:?})",
            self.sweep_interval
        );

        loop {
            tokio::select! {
                cmd = self.rx.recv() => {
                    match cmd {
                        Some(cmd) => self.apply(cmd),
                        None => break,
                    }
                }
                _ = ticker.tick() => {
                    self.sweep(Instant::now());
                }
            }
        }

        info!(
            "dono do store encerrado ({} chaves descartadas)",
            self.data.len()
        );
    }

    fn apply(&mut self, cmd: Command) {
        let name = cmd.name();
        debug!("comando recebido: {name}");

        let delivered = match cmd {
            Command::Get { key, reply } => reply.send(self.get(&key)).is_ok(),
            Command::Set {
                key,
                value,
                ttl,
                reply,
            } => {
                self.set(key, value, ttl);
                reply.send(()).is_ok()
            }
            Command::Update { key, value, reply } => reply.send(self.update(&key, value)).is_ok(),
            Command::Remove { key, reply } => {
                self.remove(&key);
                reply.send(()).is_ok()
            }
            Command::Push { key, item, reply } => {
                self.push(key, item);
                reply.send(()).is_ok()
            }
            Command::Pop { key, reply } => reply.send(self.pop(&key)).is_ok(),
            Command::Len { reply } => reply.send(self.data.len()).is_ok(),
        };

        // Chamador desistiu (timeout ou drop); o efeito já foi aplicado.
        if !delivered {
            debug!("resposta de {name} descartada: chamador não aguarda mais");
        }
    }

    fn get(&self, key: &str) -> Option<Value> {
        self.data
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(|entry| entry.value.clone())
    }

    fn set(&mut self, key: String, value: Value, ttl: Duration) {
        let expires_at = (!ttl.is_zero()).then(|| Instant::now() + ttl);
        self.data.insert(key, Entry::new(value, expires_at));
    }

    fn update(&mut self, key: &str, value: Value) -> bool {
        match self.data.get_mut(key) {
            Some(entry) if !entry.is_expired() => {
                // Só o payload muda; tipo e expiração são preservados.
                if entry.value.is_list() != value.is_list() {
                    debug!("UPDATE recusado: tipo diferente do armazenado em {key}");
                    return false;
                }
                entry.value = value;
                true
            }
            _ => false,
        }
    }

    fn remove(&mut self, key: &str) {
        self.data.remove(key);
    }

    fn push(&mut self, key: String, item: String) {
        if let Some(entry) = self.data.get_mut(&key)
            && !entry.is_expired()
            && let Value::List(list) = &mut entry.value
        {
            list.push_back(item);
            return;
        }

        // Chave ausente, expirada ou escalar: substitui por lista nova sem expiração.
        let fresh = Entry::new(Value::List(VecDeque::from([item])), None);
        if let Some(previous) = self.data.insert(key.clone(), fresh)
            && !previous.is_expired()
        {
            debug!("PUSH converteu valor escalar em lista: {key}");
        }
    }

    fn pop(&mut self, key: &str) -> Option<String> {
        let entry = self.data.get_mut(key)?;
        if entry.is_expired() {
            return None;
        }
        match &mut entry.value {
            Value::List(list) => list.pop_front(),
            Value::Scalar(_) => None,
        }
    }

    /// Remove fisicamente todas as entradas expiradas em `now`.
    fn sweep(&mut self, now: Instant) -> usize {
        let before = self.data.len();
        self.data.retain(|_, entry| !entry.is_expired_at(now));

        let removed = before - self.data.len();
        if removed > 0 {
            debug!("{removed} chaves expiradas removidas");
        }
        removed
    }
}
