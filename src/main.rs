use clap::Parser;
use serde::Deserialize;
use slog::{info, o, Drain, Logger};
use std::path::PathBuf;
use updraft::{
    clusterconfig, ClusterOperation, DnsConfig, Locator, MemBackend, OperationPlan, OperationType,
    Phase, Server,
};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "updraft")]
#[command(about = "Build rolling cluster-configuration update plans", long_about = None)]
struct Args {
    /// Path to the cluster manifest (YAML)
    #[arg(short, long)]
    manifest: PathBuf,

    /// Print the plan as JSON instead of a phase tree
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Operation ID (generated when omitted)
    #[arg(long)]
    operation_id: Option<String>,
}

/// Cluster manifest the plan is built from
#[derive(Debug, Deserialize)]
struct Manifest {
    cluster_name: String,

    #[serde(default = "default_account")]
    account_id: String,

    /// Configuration package to roll out, as "name:version"
    app: Locator,

    #[serde(default)]
    dns: DnsConfig,

    servers: Vec<Server>,
}

fn default_account() -> String {
    "local".to_string()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let logger = create_logger();

    let text = std::fs::read_to_string(&args.manifest)?;
    let manifest: Manifest = serde_yaml::from_str(&text)?;

    let operation = ClusterOperation {
        id: args
            .operation_id
            .unwrap_or_else(|| Uuid::new_v4().to_string()),
        operation_type: OperationType::ConfigUpdate,
        account_id: manifest.account_id,
        site_domain: manifest.cluster_name,
    };
    info!(logger, "Building operation plan";
        "operation" => &operation.id,
        "cluster" => &operation.site_domain,
        "servers" => manifest.servers.len());

    let backend = MemBackend::new();
    let plan = clusterconfig::create_operation_plan(
        &backend,
        &logger,
        &operation,
        manifest.dns,
        manifest.app,
        manifest.servers,
    )?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        print_plan(&plan);
    }
    Ok(())
}

fn create_logger() -> Logger {
    let decorator = slog_term::PlainDecorator::new(std::io::stderr());
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();
    Logger::root(drain, o!())
}

fn print_plan(plan: &OperationPlan) {
    println!(
        "Operation {} ({}) on cluster {}",
        plan.operation_id, plan.operation_type, plan.cluster_name
    );
    for phase in &plan.phases {
        print_phase(phase, 0);
    }
}

fn print_phase(phase: &Phase, depth: usize) {
    let indent = "  ".repeat(depth);
    let executor = phase
        .executor
        .map(|e| format!(" [{}]", e))
        .unwrap_or_default();
    let requires = if phase.requires.is_empty() {
        String::new()
    } else {
        format!("  requires: {}", phase.requires.join(", "))
    };
    println!("{}* {}{}  {}{}", indent, phase.id, executor, phase.description, requires);
    for child in &phase.phases {
        print_phase(child, depth + 1);
    }
}
