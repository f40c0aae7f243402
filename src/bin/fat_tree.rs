use clap::Parser;
use fattree_rs::addr::{Ipv4, Ipv6, assign_addresses};
use fattree_rs::config::FatTreeConfig;
use fattree_rs::layout::plan_layout;
use fattree_rs::partition::{PartitionPlan, RankContext};
use fattree_rs::sim::{SyncMode, WorkloadOpts, plan_echo_workload};
use fattree_rs::topo::build_network;
use fattree_rs::viz::VizSnapshot;
use std::fs;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, error};

#[derive(Debug, Parser)]
#[command(
    name = "fat-tree",
    about = "Build a k-ary fat-tree, assign addresses and plan the per-rank echo workload"
)]
struct Args {
    /// Number of pods (fat-tree arity k)
    #[arg(long)]
    pods: Option<usize>,

    /// Optional JSON config file; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// IPv4 base network
    #[arg(long)]
    ipv4_base: Option<Ipv4Addr>,

    /// IPv4 prefix length of every link block
    #[arg(long)]
    ipv4_prefix: Option<u32>,

    /// IPv6 base network
    #[arg(long)]
    ipv6_base: Option<Ipv6Addr>,

    /// IPv6 prefix length of every link block
    #[arg(long)]
    ipv6_prefix: Option<u32>,

    /// Skip IPv6 assignment
    #[arg(long)]
    no_ipv6: bool,

    /// Layout bounding box: ulx,uly,lrx,lry
    #[arg(long, value_parser = parse_bbox, allow_hyphen_values = true)]
    bbox: Option<[f64; 4]>,

    /// This process's rank (defaults to the MPI environment, else 0)
    #[arg(long)]
    rank: Option<usize>,

    /// Total rank count (defaults to the MPI environment, else 1)
    #[arg(long)]
    ranks: Option<usize>,

    /// Use null-message synchronization instead of the distributed window
    #[arg(long)]
    nullmsg: bool,

    /// Output layout snapshot JSON (for the animation front-end)
    #[arg(long)]
    viz_json: Option<PathBuf>,

    /// Output per-rank workload plan JSON
    #[arg(long)]
    plan_json: Option<PathBuf>,
}

fn parse_bbox(raw: &str) -> Result<[f64; 4], String> {
    let parts = raw
        .split(',')
        .map(|p| p.trim().parse::<f64>().map_err(|e| format!("{p:?}: {e}")))
        .collect::<Result<Vec<_>, _>>()?;
    <[f64; 4]>::try_from(parts).map_err(|v| format!("expected 4 values, got {}", v.len()))
}

fn resolve_config(args: &Args) -> fattree_rs::Result<FatTreeConfig> {
    let mut cfg = match &args.config {
        Some(path) => FatTreeConfig::load(path)?,
        None => FatTreeConfig::default(),
    };
    if let Some(pods) = args.pods {
        cfg.pods = pods;
    }
    if let Some(base) = args.ipv4_base {
        cfg.ipv4_base = base;
    }
    if let Some(prefix) = args.ipv4_prefix {
        cfg.ipv4_prefix = prefix;
    }
    if let Some(base) = args.ipv6_base {
        cfg.ipv6_base = Some(base);
    }
    if let Some(prefix) = args.ipv6_prefix {
        cfg.ipv6_prefix = prefix;
    }
    if args.no_ipv6 {
        cfg.ipv6_base = None;
    }
    if let Some(bbox) = args.bbox {
        cfg.bbox = bbox;
    }
    if args.nullmsg {
        cfg.sync = SyncMode::NullMessage;
    }
    Ok(cfg)
}

fn resolve_rank(args: &Args) -> fattree_rs::Result<RankContext> {
    // 两个参数都给出时不读环境变量
    if let (Some(rank), Some(ranks)) = (args.rank, args.ranks) {
        return RankContext::new(rank, ranks);
    }
    let env = RankContext::from_env()?;
    RankContext::new(
        args.rank.unwrap_or(env.rank),
        args.ranks.unwrap_or(env.size),
    )
}

fn run(args: Args) -> fattree_rs::Result<()> {
    let cfg = resolve_config(&args)?;
    let ctx = resolve_rank(&args)?;
    debug!(?cfg, ?ctx, "配置解析完成");

    let (mut net, topo) = build_network(&cfg.topo_opts())?;
    let v4 = assign_addresses::<Ipv4>(&net, &topo, cfg.ipv4_base, cfg.ipv4_prefix)?;
    let v6 = match cfg.ipv6_base {
        Some(base) => Some(assign_addresses::<Ipv6>(&net, &topo, base, cfg.ipv6_prefix)?),
        None => None,
    };

    let total = topo.server_count();
    println!("numServers: {total}");

    let plan = PartitionPlan::new(total, ctx.size)?;
    let owned = plan.range(ctx.rank)?;
    println!(
        "rank {}/{} owns servers [{}, {})",
        ctx.rank, ctx.size, owned.start, owned.end
    );
    if plan.remainder() > 0 {
        let unowned = plan.unowned();
        println!("unowned servers: [{}, {})", unowned.start, unowned.end);
    }

    let workload = plan_echo_workload(&topo, &v4, ctx, cfg.sync, &WorkloadOpts::default())?;
    println!(
        "echo servers: {}, echo clients: {}",
        workload.servers.len(),
        workload.clients.len()
    );
    if let Some(path) = &args.plan_json {
        let raw = serde_json::to_string_pretty(&workload)?;
        fs::write(path, raw)?;
        eprintln!("wrote workload plan to {}", path.display());
    }

    plan_layout(&mut net, &topo, cfg.bounding_box())?;
    if let Some(path) = &args.viz_json {
        let mut snapshot = VizSnapshot::capture(&net);
        snapshot.attach_addresses(&net, &v4);
        if let Some(v6) = &v6 {
            snapshot.attach_addresses(&net, v6);
        }
        snapshot.write_json(path)?;
        eprintln!("Animation trace file created: {}", path.display());
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "运行失败");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
