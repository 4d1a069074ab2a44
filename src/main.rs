use clap::Parser;
use ghostdb::query::{Lexer, parse};
use ghostdb::repl::Meta;
use ghostdb::storage::{Document, Storage};
use ghostdb::{Engine, Error, Outcome, Result};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::fs;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Command shell for a ghostdb document
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(value_name = "DATABASE")]
    database: PathBuf,

    /// Run the given commands in order and exit instead of starting the REPL
    #[arg(short, long, value_name = "COMMAND")]
    execute: Vec<String>,

    /// Log filter, e.g. `info` or `ghostdb=debug`
    #[arg(long, env = "GHOSTDB_LOG", default_value = "warn")]
    log_level: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let filter = EnvFilter::try_new(&args.log_level).map_err(|e| Error::Config(e.to_string()))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    if !fs::try_exists(&args.database).await? {
        info!(path = %args.database.display(), "database does not exist, creating it");
    }
    let mut engine = Engine::new(Document::open(&args.database)?);

    if !args.execute.is_empty() {
        for command in &args.execute {
            let outcome = engine.execute(command)?;
            println!("{}", describe(&outcome));
        }
        return Ok(());
    }
    repl(&mut engine).await
}

async fn repl(engine: &mut Engine<Document>) -> Result<()> {
    println!("ghostdb REPL (type '.exit' to stop)");
    println!("DATABASE: {}", engine.storage().path().display());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("ghostdb> ");
        io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match Meta::parse(line) {
            Some(Meta::Exit) => break,
            Some(Meta::Tables) => {
                for name in engine.storage().table_names() {
                    println!("{name}");
                }
                continue;
            }
            Some(Meta::Tokens(text)) => {
                let tokens = Lexer::new(text).tokenize();
                println!("{}", serde_json::to_string_pretty(&tokens)?);
                continue;
            }
            Some(Meta::Ast(text)) => {
                match parse(text) {
                    Ok(tree) => print!("{tree}"),
                    Err(err) => println!("error: {err}"),
                }
                continue;
            }
            None => {}
        }

        match engine.execute(line) {
            Ok(outcome) => println!("{}", describe(&outcome)),
            Err(err) => {
                warn!(command = line, error = %err, "command rejected");
                println!("error: {err}");
            }
        }
    }
    Ok(())
}

fn describe(outcome: &Outcome) -> String {
    match outcome {
        Outcome::TableCreated { name, columns } => {
            format!("created table '{name}' with {columns} columns")
        }
    }
}
