//! graphwire CLI: run Cypher queries against a graph database over RESP

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use graphwire::{ClientConfig, GraphClient, QueryOptions, QueryResult, Value};
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser)]
#[command(name = "graphwire", version, about = "Graph database command-line client")]
struct Cli {
    /// Server host (overrides the config file)
    #[arg(long, global = true, env = "GRAPHWIRE_HOST")]
    host: Option<String>,

    /// Server port (overrides the config file)
    #[arg(long, global = true, env = "GRAPHWIRE_PORT")]
    port: Option<u16>,

    /// YAML connection config
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a Cypher query
    Query {
        /// The Cypher query string
        cypher: String,

        /// Graph name
        #[arg(long, default_value = "default")]
        graph: String,

        /// Use read-only mode
        #[arg(long)]
        readonly: bool,

        /// Server-side timeout in milliseconds
        #[arg(long, default_value_t = 0)]
        timeout: u64,
    },
    /// Show the execution plan of a query
    Explain {
        cypher: String,

        #[arg(long, default_value = "default")]
        graph: String,
    },
    /// List graphs
    List,
    /// Ping the server
    Ping,
    /// Start an interactive REPL
    Shell {
        #[arg(long, default_value = "default")]
        graph: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    debug!("Connecting to {}", config.endpoint());
    let client = GraphClient::connect(&config)
        .await
        .with_context(|| format!("connecting to {}", config.endpoint()))?;

    match cli.command {
        Commands::Query { cypher, graph, readonly, timeout } => {
            let opts = QueryOptions::new().timeout(timeout);
            run_query(&client, &graph, &cypher, readonly, &opts, &cli.format).await
        }
        Commands::Explain { cypher, graph } => run_explain(&client, &graph, &cypher).await,
        Commands::List => run_list(&client, &cli.format).await,
        Commands::Ping => run_ping(&client).await,
        Commands::Shell { graph } => run_shell(&client, &graph, &cli.format).await,
    }
}

fn load_config(cli: &Cli) -> Result<ClientConfig> {
    let mut config = match &cli.config {
        Some(path) => ClientConfig::from_yaml_file(path)?,
        None => ClientConfig::default(),
    };
    if let Some(host) = &cli.host {
        config.address = host.clone();
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    Ok(config)
}

async fn run_query(
    client: &GraphClient,
    graph: &str,
    cypher: &str,
    readonly: bool,
    opts: &QueryOptions,
    format: &OutputFormat,
) -> Result<()> {
    let graph = client.select_graph(graph);
    let result = if readonly {
        graph.ro_query_with(cypher, opts).await?
    } else {
        graph.query_with(cypher, opts).await?
    };

    print_result(&result, format)
}

fn print_result(result: &QueryResult, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(result)?);
        }
        OutputFormat::Csv => {
            let columns = result.columns();
            if !columns.is_empty() {
                println!("{}", columns.join(","));
                for row in result {
                    let cells: Vec<String> = row.values().map(format_csv_value).collect();
                    println!("{}", cells.join(","));
                }
            }
        }
        OutputFormat::Table => {
            let columns = result.columns();
            if columns.is_empty() {
                println!("(no results)");
            } else {
                let mut table = Table::new();
                table.set_content_arrangement(ContentArrangement::Dynamic);
                table.set_header(&columns);

                for row in result {
                    let cells: Vec<String> = row.values().map(format_table_value).collect();
                    table.add_row(cells);
                }

                println!("{}", table);
                println!("{} row(s)", result.len());
            }
            for line in &result.metadata {
                println!("{}", line);
            }
        }
    }

    Ok(())
}

async fn run_explain(client: &GraphClient, graph: &str, cypher: &str) -> Result<()> {
    let plan = client.select_graph(graph).explain(cypher).await?;
    for step in plan {
        println!("{}", step);
    }
    Ok(())
}

async fn run_list(client: &GraphClient, format: &OutputFormat) -> Result<()> {
    let graphs = client.list().await?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&graphs)?),
        _ => {
            for name in graphs {
                println!("{}", name);
            }
        }
    }
    Ok(())
}

async fn run_ping(client: &GraphClient) -> Result<()> {
    println!("{}", client.ping().await?);
    Ok(())
}

async fn run_shell(client: &GraphClient, graph: &str, format: &OutputFormat) -> Result<()> {
    println!("graphwire interactive shell (graph '{}')", graph);
    println!("Type Cypher queries, or :help for commands. :quit to exit.\n");

    let stdin = std::io::stdin();
    let mut line = String::new();
    let opts = QueryOptions::new();

    loop {
        eprint!("{}> ", graph);

        line.clear();
        if stdin.read_line(&mut line)? == 0 {
            break; // EOF
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let outcome = match trimmed {
            ":quit" | ":exit" | ":q" => break,
            ":help" | ":h" => {
                println!("Commands:");
                println!("  :list            List graphs");
                println!("  :ping            Ping server");
                println!("  :explain <q>     Show the plan of a query");
                println!("  :quit            Exit shell");
                println!("  <cypher>         Execute a Cypher query");
                Ok(())
            }
            ":list" => run_list(client, format).await,
            ":ping" => run_ping(client).await,
            cmd if cmd.starts_with(":explain ") => {
                run_explain(client, graph, cmd.trim_start_matches(":explain ")).await
            }
            cypher => run_query(client, graph, cypher, false, &opts, format).await,
        };

        if let Err(e) = outcome {
            eprintln!("Error: {:#}", e);
        }
    }

    println!("Bye!");
    Ok(())
}

fn format_table_value(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn format_csv_value(v: &Value) -> String {
    let text = match v {
        Value::Null => return String::new(),
        Value::String(s) => s.clone(),
        Value::Integer(_) | Value::Double(_) | Value::Boolean(_) => return v.to_string(),
        other => other.to_string(),
    };
    if text.contains(',') || text.contains('"') || text.contains('\n') {
        format!("\"{}\"", text.replace('"', "\"\""))
    } else {
        text
    }
}
