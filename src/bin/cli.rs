//! sqclient CLI
//!
//! Runs one ServerQuery command and prints the response.
//!
//! ```text
//! sqclient-cli --login serveradmin --password secret --server-id 1 \
//!     clientlist -o uid -o away
//! sqclient-cli --json channelinfo cid=5
//! ```

use std::process::ExitCode;

use clap::Parser;
use crossbeam::channel::Receiver;
use sqclient::{Completion, Config, Connection, QueryError, Response, SendOptions};
use tracing_subscriber::{fmt, EnvFilter};

/// sqclient CLI
#[derive(Parser, Debug)]
#[command(name = "sqclient-cli")]
#[command(about = "Run a ServerQuery command against a server")]
#[command(version)]
struct Args {
    /// Server host
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Query port
    #[arg(short, long, default_value_t = sqclient::config::DEFAULT_PORT)]
    port: u16,

    /// Query login name
    #[arg(short, long, requires = "password")]
    login: Option<String>,

    /// Query login password
    #[arg(long)]
    password: Option<String>,

    /// Select a virtual server before running the command
    #[arg(short, long)]
    server_id: Option<u32>,

    /// Print the response as JSON
    #[arg(long)]
    json: bool,

    /// Flag option, without the leading '-' (repeatable)
    #[arg(short = 'o', long = "option")]
    options: Vec<String>,

    /// Command name
    command: String,

    /// Parameters as key=value; repeating a key sends a list
    params: Vec<String>,
}

fn main() -> ExitCode {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqclient=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(QueryError::Server(e)) => {
            tracing::error!("{}", e);
            ExitCode::from(2)
        }
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Server-side failures come back as [`QueryError::Server`]
fn run(args: &Args) -> sqclient::Result<()> {
    let config = Config::builder().host(&args.host).port(args.port).build();
    let connection = Connection::open(&config)?;
    let client = connection.client();

    client.on_error(|e| tracing::error!("Transport error: {}", e));
    client.on_close(|pending| {
        if !pending.is_empty() {
            tracing::warn!("{} command(s) were never sent", pending.len());
        }
    });

    let pump = connection.spawn();

    let mut preamble = Vec::new();
    if let (Some(login), Some(password)) = (&args.login, &args.password) {
        let options = SendOptions::new()
            .param("client_login_name", login.as_str())
            .param("client_login_password", password.as_str());
        preamble.push(client.request("login", options)?);
    }
    if let Some(sid) = args.server_id {
        preamble.push(client.request("use", SendOptions::new().param("sid", i64::from(sid)))?);
    }

    let mut options = SendOptions::new();
    for option in &args.options {
        options = options.option(option.as_str());
    }
    for (key, values) in group_params(&args.params)? {
        options = match values.len() {
            1 => options.param(key, values.into_iter().next().unwrap_or_default()),
            _ => options.param_list(key, values),
        };
    }
    let reply = client.request(&args.command, options)?;
    client.send("quit", SendOptions::new())?;

    for step in preamble {
        wait(&step)?.into_result()?;
    }

    let response = wait(&reply)?.into_result()?;
    print_response(&response, args.json)?;

    match pump.join() {
        Ok(result) => result,
        Err(_) => Err(QueryError::Protocol("reader thread panicked".to_string())),
    }
}

fn wait(reply: &Receiver<Completion>) -> sqclient::Result<Completion> {
    reply.recv().map_err(|_| QueryError::Closed)
}

/// `key=value` arguments, grouped by key in first-seen order
fn group_params(params: &[String]) -> sqclient::Result<Vec<(String, Vec<String>)>> {
    let mut grouped: Vec<(String, Vec<String>)> = Vec::new();
    for param in params {
        let (key, value) = param
            .split_once('=')
            .ok_or_else(|| QueryError::Config(format!("parameter '{}' is not key=value", param)))?;
        match grouped.iter_mut().find(|(k, _)| k == key) {
            Some((_, values)) => values.push(value.to_string()),
            None => grouped.push((key.to_string(), vec![value.to_string()])),
        }
    }
    Ok(grouped)
}

fn print_response(response: &Response, json: bool) -> sqclient::Result<()> {
    if json {
        let text = serde_json::to_string_pretty(response)
            .map_err(|e| QueryError::Protocol(format!("JSON encoding failed: {}", e)))?;
        println!("{}", text);
        return Ok(());
    }

    for (i, record) in response.records().iter().enumerate() {
        if i > 0 {
            println!();
        }
        for (key, value) in record.iter() {
            println!("{}: {}", key, value);
        }
    }
    Ok(())
}
