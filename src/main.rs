use cluster_client::api::types::Dataset;
use cluster_client::api::validation::parse_input_vector;
use cluster_client::bench::runner::BenchmarkHarness;
use cluster_client::bench::types::{ConcurrentRun, SequentialRun};
use cluster_client::client::client::ClusterClient;
use cluster_client::client::config::ClientConfig;
use cluster_client::client::protocol::ResponseEnvelope;
use cluster_client::cluster::registry::NodeRegistry;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

const USAGE: &str = "\
Usage: cluster-client [--nodes <name@host:port,...>] <command> [args]

Commands:
  train <model_name> <file>
  train-dataset <model_name> <mnist|fashionmnist>
  predict <model_id> <v1,v2,...>
  models
  status
  leader
  bench [--model <id>] [--sequential <n>] [--concurrent <n>] [--workers <n>]
        [--input-size <n>] [--out <dir>]";

struct BenchArgs {
    model_id: String,
    sequential: usize,
    concurrent: usize,
    workers: usize,
    input_size: usize,
    out_dir: PathBuf,
}

impl Default for BenchArgs {
    fn default() -> Self {
        Self {
            model_id: "test_model".to_string(),
            sequential: 100,
            concurrent: 500,
            workers: 50,
            input_size: 4,
            out_dir: PathBuf::from("."),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    let mut registry: Option<NodeRegistry> = None;
    let mut rest: Vec<String> = Vec::new();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--nodes" => {
                let value = args
                    .get(i + 1)
                    .ok_or_else(|| anyhow::anyhow!("--nodes requires a value"))?;
                registry = Some(value.parse()?);
                i += 2;
            }
            "-h" | "--help" => {
                println!("{}", USAGE);
                return Ok(());
            }
            _ => {
                rest.push(args[i].clone());
                i += 1;
            }
        }
    }

    let Some((command, params)) = rest.split_first() else {
        eprintln!("{}", USAGE);
        std::process::exit(1);
    };

    let registry = Arc::new(match registry {
        Some(registry) => registry,
        None => NodeRegistry::from_env()?,
    });
    let config = ClientConfig::from_env();

    tracing::info!(
        "Cluster: {}",
        registry
            .nodes()
            .iter()
            .map(|node| node.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );

    if command == "bench" {
        let bench = parse_bench_args(params)?;
        return run_bench(registry, config, bench).await;
    }

    let mut client = ClusterClient::new(registry, config);

    let response = match (command.as_str(), params) {
        ("train", [model_name, file]) => client.train_from_file(model_name, file).await?,
        ("train-dataset", [model_name, dataset]) => {
            let dataset: Dataset = dataset.parse()?;
            client.train_with_dataset(model_name, dataset).await?
        }
        ("predict", [model_id, vector]) => {
            let input = parse_input_vector(vector)?;
            client.predict(model_id, &input).await?
        }
        ("models", []) => client.list_models().await?,
        ("status", []) => client.status().await?,
        ("leader", []) => client.leader().await?,
        _ => {
            eprintln!("{}", USAGE);
            std::process::exit(1);
        }
    };

    client.close();
    print_response(&response)?;

    if !response.success {
        std::process::exit(2);
    }

    Ok(())
}

fn parse_bench_args(params: &[String]) -> anyhow::Result<BenchArgs> {
    let mut bench = BenchArgs::default();

    let mut i = 0;
    while i < params.len() {
        let value = params
            .get(i + 1)
            .ok_or_else(|| anyhow::anyhow!("{} requires a value", params[i]))?;

        match params[i].as_str() {
            "--model" => bench.model_id = value.clone(),
            "--sequential" => bench.sequential = value.parse()?,
            "--concurrent" => bench.concurrent = value.parse()?,
            "--workers" => bench.workers = value.parse()?,
            "--input-size" => bench.input_size = value.parse()?,
            "--out" => bench.out_dir = PathBuf::from(value),
            other => anyhow::bail!("Unknown bench option '{}'", other),
        }
        i += 2;
    }

    Ok(bench)
}

async fn run_bench(
    registry: Arc<NodeRegistry>,
    config: ClientConfig,
    bench: BenchArgs,
) -> anyhow::Result<()> {
    let mut harness = BenchmarkHarness::new(registry, config);

    // Progress reporter:
    let progress = harness.progress();
    let reporter = tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(2));

        loop {
            interval.tick().await;
            let snapshot = progress.snapshot();
            if snapshot.target > 0 {
                tracing::info!(
                    "Progress: {}/{} ({} errors)",
                    snapshot.completed,
                    snapshot.target,
                    snapshot.errors
                );
            }
        }
    });

    let sequential = harness
        .run_sequential(&SequentialRun {
            requests: bench.sequential,
            model_id: bench.model_id.clone(),
            input_size: bench.input_size,
        })
        .await?;

    let concurrent = harness
        .run_concurrent(&ConcurrentRun {
            requests: bench.concurrent,
            workers: bench.workers,
            model_id: bench.model_id.clone(),
            input_size: bench.input_size,
        })
        .await?;

    reporter.abort();

    println!("{}", serde_json::to_string_pretty(&serde_json::json!({
        "sequential": sequential,
        "concurrent": concurrent,
    }))?);

    let path = harness.write_report(&bench.out_dir).await?;
    println!("Report saved to {}", path.display());

    Ok(())
}

fn print_response(response: &ResponseEnvelope) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(response)?);
    Ok(())
}
