use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpStream;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use infragraph::{DataSource, FileSource, MemoryGraph, Pipeline, Settings, StreamSource};

#[derive(Parser, Debug)]
#[command(name = "infragraph", version)]
#[command(about = "Normalize monitoring and inventory snapshots into one infrastructure graph")]
struct Args {
    /// Path to a TOML config file (sources, transformers, intervals)
    #[arg(long, env = "INFRAGRAPH_CONFIG")]
    config: Option<PathBuf>,

    /// Path to a JSON file of sync batches
    #[arg(short, long, default_value = "batches.json", conflicts_with = "connect")]
    file: PathBuf,

    /// Connect to a TCP endpoint streaming newline-delimited batches (host:port)
    #[arg(short, long, conflicts_with_all = ["file", "once"])]
    connect: Option<String>,

    /// Poll interval in seconds, overriding the shortest configured interval
    #[arg(short, long)]
    refresh: Option<u64>,

    /// Run a single cycle and exit
    #[arg(long)]
    once: bool,

    /// Write the resulting graph to this JSON file on exit
    #[arg(short, long)]
    export: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();

    let settings = Settings::load(args.config.as_deref()).context("loading configuration")?;
    let registry = settings.registry();
    info!(transformers = ?registry.types(), "registry ready");
    let pipeline = Pipeline::new(Arc::new(registry));
    let mut graph = MemoryGraph::new();

    if args.once {
        let mut source = FileSource::new(&args.file);
        run_once(&mut source, &pipeline, &mut graph)?;
    } else {
        let (mut source, default_tick): (Box<dyn DataSource>, Duration) = match &args.connect {
            Some(addr) => (connect(addr).await?, Duration::from_millis(100)),
            None => (Box::new(FileSource::new(&args.file)), settings.tick()),
        };
        let tick = args.refresh.map(Duration::from_secs).unwrap_or(default_tick);
        run_loop(source.as_mut(), &pipeline, &mut graph, tick).await;
    }

    if let Some(path) = &args.export {
        export_graph(&graph, path)?;
    }
    Ok(())
}

/// Connect to a TCP producer
async fn connect(addr: &str) -> Result<Box<dyn DataSource>> {
    info!(%addr, "connecting");
    let stream = TcpStream::connect(addr)
        .await
        .with_context(|| format!("failed to connect to {}", addr))?;
    info!(%addr, "connected");
    Ok(Box::new(StreamSource::spawn(stream, addr)))
}

fn run_once(source: &mut FileSource, pipeline: &Pipeline, graph: &mut MemoryGraph) -> Result<()> {
    let batches = source.poll().ok_or_else(|| {
        anyhow::anyhow!(
            "{}: {}",
            source.description(),
            source.error().unwrap_or_else(|| "no data".to_string())
        )
    })?;
    pipeline.run_cycle(batches, graph);
    Ok(())
}

/// Poll and transform until Ctrl-C
async fn run_loop(
    source: &mut dyn DataSource,
    pipeline: &Pipeline,
    graph: &mut MemoryGraph,
    tick: Duration,
) {
    info!(source = %source.description(), interval = ?tick, "polling");
    let mut interval = tokio::time::interval(tick);
    let mut last_error: Option<String> = None;
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                if let Some(batches) = source.poll() {
                    pipeline.run_cycle(batches, graph);
                }

                let error = source.error();
                if error != last_error {
                    if let Some(e) = &error {
                        warn!(source = %source.description(), error = %e, "source error");
                    }
                    last_error = error;
                }
            }
            _ = &mut shutdown => {
                info!("shutting down");
                break;
            }
        }
    }
}

/// Export the graph to a JSON file
fn export_graph(graph: &MemoryGraph, path: &Path) -> Result<()> {
    let export = graph.export();
    let json = serde_json::to_string_pretty(&export)?;
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;

    info!(
        path = %path.display(),
        vertices = export.stats.vertex_count,
        edges = export.stats.edge_count,
        "exported graph"
    );
    Ok(())
}
