use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use satgraph::ingestion::{load_documents, ExtractionPipeline, GazetteerRecognizer};
use satgraph::memory::{GraphStore, MemoryStore, Neo4jConfig, Neo4jStore, SnapshotStore};
use satgraph::{ExtractionBatch, KnowledgeBase, KnowledgeGraph};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "satgraph", version, about = "Satellite portal knowledge graph CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Args)]
struct Neo4jArgs {
    #[arg(long, env = "SATGRAPH_NEO4J_URI", default_value = "http://localhost:7474")]
    neo4j_uri: String,
    #[arg(long, env = "SATGRAPH_NEO4J_USER", default_value = "neo4j")]
    neo4j_user: String,
    #[arg(long, env = "SATGRAPH_NEO4J_PASSWORD", default_value = "password", hide_env_values = true)]
    neo4j_password: String,
    #[arg(long, env = "SATGRAPH_NEO4J_DATABASE", default_value = "neo4j")]
    neo4j_database: String,
    #[arg(long, default_value_t = 60)]
    neo4j_timeout_secs: u64,
}

impl Neo4jArgs {
    fn connect(&self) -> anyhow::Result<Neo4jStore> {
        let config = Neo4jConfig::new(&self.neo4j_uri)
            .with_credentials(&self.neo4j_user, &self.neo4j_password)
            .with_database(&self.neo4j_database)
            .with_timeout(Duration::from_secs(self.neo4j_timeout_secs));
        Ok(Neo4jStore::new(config)?)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Recognize entities and relationships in crawled pages.
    Extract {
        #[arg(long)]
        docs: PathBuf,
        #[arg(long)]
        gazetteer: Option<PathBuf>,
        #[arg(long)]
        output: PathBuf,
    },
    /// Assemble an extraction batch into the graph snapshot.
    Ingest {
        #[arg(long)]
        batch: PathBuf,
        #[arg(long)]
        graph: PathBuf,
        /// Keep what the snapshot already holds instead of starting empty.
        #[arg(long)]
        append: bool,
    },
    /// Mirror the graph snapshot into Neo4j.
    Save {
        #[arg(long)]
        graph: PathBuf,
        #[arg(long)]
        dry_run: bool,
        #[command(flatten)]
        neo4j: Neo4jArgs,
    },
    Related {
        #[arg(long)]
        graph: PathBuf,
        #[arg(long)]
        name: String,
        #[arg(long, default_value_t = 2)]
        max_depth: usize,
    },
    Details {
        #[arg(long)]
        graph: PathBuf,
        #[arg(long)]
        name: String,
    },
    Search {
        #[arg(long)]
        graph: PathBuf,
        #[arg(long)]
        query: String,
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    Export {
        #[arg(long)]
        graph: PathBuf,
        #[arg(long)]
        output: PathBuf,
    },
    /// Run a raw Cypher statement against Neo4j.
    Cypher {
        statement: String,
        /// JSON object of statement parameters.
        #[arg(long)]
        params: Option<String>,
        #[command(flatten)]
        neo4j: Neo4jArgs,
    },
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn load_graph(path: &Path) -> anyhow::Result<KnowledgeGraph> {
    SnapshotStore::new(path)
        .load()
        .with_context(|| format!("cannot load graph snapshot {:?}", path))
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn mirror<S: GraphStore>(graph: KnowledgeGraph, store: S) -> anyhow::Result<()> {
    let kb = KnowledgeBase::with_graph(graph, store);
    kb.save()?;
    kb.close()?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match cli.command {
        Commands::Extract {
            docs,
            gazetteer,
            output,
        } => {
            let recognizer = match gazetteer {
                Some(path) => GazetteerRecognizer::from_json_file(path)?,
                None => GazetteerRecognizer::default(),
            };
            let documents = load_documents(&docs)?;
            if documents.is_empty() {
                warn!(dir = %docs.display(), "no crawled documents found");
            }
            let batch = ExtractionPipeline::new(Arc::new(recognizer)).extract(&documents);
            fs::write(&output, serde_json::to_string_pretty(&batch)?)
                .with_context(|| format!("cannot write batch {:?}", output))?;
            info!(output = %output.display(), "extraction batch written");
        }
        Commands::Ingest {
            batch,
            graph,
            append,
        } => {
            let raw = fs::read_to_string(&batch)
                .with_context(|| format!("cannot read batch {:?}", batch))?;
            let records: ExtractionBatch = serde_json::from_str(&raw)
                .with_context(|| format!("invalid extraction batch in {:?}", batch))?;
            let snapshots = SnapshotStore::new(&graph);
            let knowledge = if append {
                load_graph(&graph)?
            } else {
                KnowledgeGraph::new()
            };
            let mut kb = KnowledgeBase::with_graph(knowledge, snapshots);
            let report = kb.ingest(&records)?;
            kb.save()?;
            kb.close()?;
            info!(
                entities = report.entities_added,
                relationships = report.relationships_added,
                graph = %graph.display(),
                "batch ingested"
            );
        }
        Commands::Save {
            graph,
            dry_run,
            neo4j,
        } => {
            let knowledge = load_graph(&graph)?;
            if dry_run {
                let store = MemoryStore::new();
                mirror(knowledge, store.clone())?;
                info!(saves = store.save_count(), "dry run, neo4j left untouched");
            } else {
                mirror(knowledge, neo4j.connect()?)?;
            }
        }
        Commands::Related {
            graph,
            name,
            max_depth,
        } => {
            let kb = KnowledgeBase::with_graph(load_graph(&graph)?, MemoryStore::new());
            print_json(&kb.find_related(&name, max_depth))?;
        }
        Commands::Details { graph, name } => {
            let kb = KnowledgeBase::with_graph(load_graph(&graph)?, MemoryStore::new());
            match kb.get_entity_details(&name) {
                Some(details) => print_json(&details)?,
                None => println!("No entity matches {:?}", name),
            }
        }
        Commands::Search {
            graph,
            query,
            limit,
        } => {
            let kb = KnowledgeBase::with_graph(load_graph(&graph)?, MemoryStore::new());
            print_json(&kb.search(&query, limit))?;
        }
        Commands::Export { graph, output } => {
            let export = load_graph(&graph)?.export();
            fs::write(&output, serde_json::to_string_pretty(&export)?)
                .with_context(|| format!("cannot write export {:?}", output))?;
            info!(
                export = %output.display(),
                nodes = export.stats.node_count,
                edges = export.stats.edge_count
            );
        }
        Commands::Cypher {
            statement,
            params,
            neo4j,
        } => {
            let parameters = match params {
                Some(raw) => match serde_json::from_str::<Value>(&raw)? {
                    Value::Object(map) => map,
                    _ => bail!("--params must be a JSON object"),
                },
                None => Map::new(),
            };
            let store = neo4j.connect()?;
            let records = store.query(&statement, parameters)?;
            print_json(&records)?;
            store.close()?;
        }
    }

    Ok(())
}
