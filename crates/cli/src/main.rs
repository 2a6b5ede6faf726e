use std::io::{self, Write};
use std::time::Duration;

use clap::Parser;
use serde_json::json;
use tracing::info;

use squalldb_api::{Method, Response, dispatch};
use squalldb_common::DEFAULT_QUEUE_CAPACITY;
use squalldb_storage::{QueueFullPolicy, Store, StoreConfig};

#[derive(Parser, Debug)]
#[command(name = "squalldb", about = "SquallDB in-process key-value store")]
struct Args {
    #[arg(long, default_value_t = DEFAULT_QUEUE_CAPACITY)]
    queue_capacity: usize,
    #[arg(long, default_value_t = 1000)]
    sweep_interval_ms: u64,
    /// Desiste de enfileirar após N ms com a fila cheia
    #[arg(long, value_name = "MS", conflicts_with = "reject_when_full")]
    enqueue_timeout_ms: Option<u64>,
    /// Falha imediatamente com a fila cheia
    #[arg(long)]
    reject_when_full: bool,
    #[arg(long, value_name = "MS")]
    reply_timeout_ms: Option<u64>,
    /// Executa o roteiro de demonstração e sai
    #[arg(long)]
    demo: bool,

    /// Requisição para executar diretamente: <METHOD> <PATH> [JSON]
    #[arg(trailing_var_arg = true)]
    command: Vec<String>,
}

impl Args {
    fn store_config(&self) -> StoreConfig {
        let policy = match (self.enqueue_timeout_ms, self.reject_when_full) {
            (_, true) => QueueFullPolicy::Reject,
            (Some(ms), false) => QueueFullPolicy::Timeout(Duration::from_millis(ms)),
            (None, false) => QueueFullPolicy::Block,
        };

        let config = StoreConfig::new()
            .with_queue_capacity(self.queue_capacity)
            .with_sweep_interval(Duration::from_millis(self.sweep_interval_ms))
            .with_full_policy(policy);

        match self.reply_timeout_ms {
            Some(ms) => config.with_reply_timeout(Duration::from_millis(ms)),
            None => config,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "squalldb_storage=info,squalldb_api=info,squalldb=info".into()),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = args.store_config();
    info!("configuração: {config:?}");
    let store = Store::with_config(config);

    if args.demo {
        return run_demo(&store).await;
    }

    // Modo comando único (via argumentos)
    if !args.command.is_empty() {
        let line = args.command.join(" ");
        execute_line(&store, &line).await;
        return Ok(());
    }

    println!("SquallDB pronto. Formato: <METHOD> <PATH> [JSON]");

    let stdin = io::stdin();
    let mut input = String::new();

    loop {
        print!("squalldb> ");
        io::stdout().flush()?;

        input.clear();
        if stdin.read_line(&mut input)? == 0 {
            break; // EOF
        }

        let line = input.trim();
        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
            break;
        }

        execute_line(&store, line).await;
    }

    Ok(())
}

async fn execute_line(store: &Store, line: &str) {
    match parse_line(line) {
        Some((method, path, body)) => {
            let response = dispatch(store, method, path, body).await;
            println!("{}", format_response(&response));
        }
        None => println!("(error) uso: <GET|POST|DELETE> /<rota>/<chave> [JSON]"),
    }
}

/// Separa método, caminho e corpo; o corpo é o resto da linha (pode ter espaços).
fn parse_line(line: &str) -> Option<(Method, &str, Option<&str>)> {
    let line = line.trim();
    let (method, rest) = line.split_once(char::is_whitespace)?;
    let method = method.parse().ok()?;

    let rest = rest.trim_start();
    let (path, body) = match rest.split_once(char::is_whitespace) {
        Some((path, body)) => (path, Some(body.trim()).filter(|b| !b.is_empty())),
        None => (rest, None),
    };

    if path.is_empty() {
        return None;
    }
    Some((method, path, body))
}

/// Formata uma resposta para exibição humana.
fn format_response(response: &Response) -> String {
    let code = response.status.code();
    let Some(body) = &response.body else {
        return "OK".to_string();
    };

    if let Some(message) = body.get("error").and_then(|e| e.as_str()) {
        return format!("(error {code}) {message}");
    }

    match body.get("value") {
        Some(serde_json::Value::String(s)) => format!("\"{s}\""),
        Some(serde_json::Value::Array(items)) if items.is_empty() => "(empty list)".to_string(),
        Some(serde_json::Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(i, item)| format!("{}) {item}", i + 1))
            .collect::<Vec<_>>()
            .join("\n"),
        _ => body.to_string(),
    }
}

/// Roteiro de demonstração: string, lista, pushes, leitura, pops e remoção.
async fn run_demo(store: &Store) -> anyhow::Result<()> {
    demo_step(
        store,
        Method::Post,
        "/set/stringKey",
        Some(json!({ "value": "Hello, World!", "ttl": 0 })),
    )
    .await;
    demo_step(
        store,
        Method::Post,
        "/set/myList",
        Some(json!({ "value": [], "ttl": 0 })),
    )
    .await;

    let values = ["value1", "value2", "value3", "value4", "value5"];
    for value in values {
        demo_step(
            store,
            Method::Post,
            "/push/myList",
            Some(json!({ "value": value })),
        )
        .await;
    }

    demo_step(store, Method::Get, "/get/myList", None).await;

    for _ in 0..values.len() {
        let response = demo_step(store, Method::Post, "/pop/myList", None).await;
        if response.status.code() != 200 {
            anyhow::bail!("pop falhou: {response}");
        }
    }

    demo_step(store, Method::Delete, "/remove/stringKey", None).await;

    Ok(())
}

async fn demo_step(
    store: &Store,
    method: Method,
    path: &str,
    body: Option<serde_json::Value>,
) -> Response {
    let body = body.map(|b| b.to_string());
    let response = dispatch(store, method, path, body.as_deref()).await;
    println!("{method:?} {path} -> {}", format_response(&response));
    response
}
