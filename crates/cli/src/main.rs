mod geojson;
mod provenance;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use overlay::prelude::*;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;

use crate::geojson::{GeometryJson, TurnGraphDump};

#[derive(Parser)]
#[command(name = "overlay-cli")]
#[command(about = "Boolean operations on polygons and lines from coordinate-array JSON")]
struct Cmd {
    /// Skip the self-intersection check on inputs
    #[arg(long, global = true)]
    no_validity_check: bool,

    #[command(subcommand)]
    action: Action,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Op {
    Union,
    Intersection,
    Difference,
    SymDifference,
}

impl From<Op> for OverlayKind {
    fn from(op: Op) -> Self {
        match op {
            Op::Union => OverlayKind::Union,
            Op::Intersection => OverlayKind::Intersection,
            Op::Difference => OverlayKind::Difference,
            Op::SymDifference => OverlayKind::SymDifference,
        }
    }
}

#[derive(Subcommand)]
enum Action {
    /// Overlay two geometries and write the result (multi-polygon or multi-linestring)
    Run {
        #[arg(long, value_enum)]
        op: Op,
        #[arg(long)]
        a: PathBuf,
        #[arg(long)]
        b: PathBuf,
        #[arg(long)]
        out: PathBuf,
    },
    /// Dump the enriched turn graph of one traversal pass
    Turns {
        #[arg(long, value_enum, default_value = "union")]
        op: Op,
        #[arg(long)]
        a: PathBuf,
        #[arg(long)]
        b: PathBuf,
        #[arg(long)]
        out: PathBuf,
    },
    /// Check one geometry for self-intersections
    Check {
        #[arg(long)]
        input: PathBuf,
    },
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    let cfg = OverlayCfg {
        check_validity: !cmd.no_validity_check,
        ..OverlayCfg::default()
    };
    match cmd.action {
        Action::Run { op, a, b, out } => run(op, &a, &b, &out, &cfg),
        Action::Turns { op, a, b, out } => turns(op, &a, &b, &out, &cfg),
        Action::Check { input } => check(&input, &cfg),
        Action::Report => report(),
    }
}

fn read_geometry(path: &Path) -> Result<Geometry> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let parsed: GeometryJson = serde_json::from_slice(&bytes)
        .with_context(|| format!("parsing geometry JSON in {}", path.display()))?;
    Ok(parsed.to_geometry())
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    provenance::ensure_parent(path)?;
    std::fs::write(path, serde_json::to_vec_pretty(value)?)
        .with_context(|| format!("writing {}", path.display()))
}

fn run(op: Op, a: &Path, b: &Path, out: &Path, cfg: &OverlayCfg) -> Result<()> {
    tracing::info!(op = ?op, a = %a.display(), b = %b.display(), out = %out.display(), "run");
    let ga = read_geometry(a)?;
    let gb = read_geometry(b)?;
    let result = overlay(&ga, &gb, op.into(), cfg).context("overlay failed")?;
    tracing::info!(
        empty = result.is_empty(),
        area = result.area(),
        length = result.length(),
        "overlay result"
    );
    write_json(out, &GeometryJson::from_output(&result))?;
    provenance::write_sidecar(
        out,
        serde_json::json!({
            "op": format!("{op:?}"),
            "a": a.to_string_lossy(),
            "b": b.to_string_lossy(),
            "check_validity": cfg.check_validity,
            "area": result.area(),
            "length": result.length(),
        }),
    )?;
    Ok(())
}

fn turns(op: Op, a: &Path, b: &Path, out: &Path, cfg: &OverlayCfg) -> Result<()> {
    tracing::info!(op = ?op, a = %a.display(), b = %b.display(), out = %out.display(), "turns");
    let strategy = Cartesian::new(*cfg);
    let (ga, gb) = (read_geometry(a)?, read_geometry(b)?);
    if ga.is_linear() || gb.is_linear() {
        bail!("the turn graph is built for two areal inputs; lines have no traversal");
    }
    let first = normalize(&ga, 0, cfg)?;
    let mut second = normalize(&gb, 1, cfg)?;
    if cfg.check_validity {
        check_validity(&first, 0, &strategy)?;
        check_validity(&second, 1, &strategy)?;
    }
    let (target, reversed) = match op {
        Op::Union => (Operation::Union, false),
        Op::Intersection => (Operation::Intersection, false),
        Op::Difference => (Operation::Intersection, true),
        Op::SymDifference => bail!("sym-difference runs two passes; dump each difference instead"),
    };
    if reversed {
        second = second.reversed();
    }
    let inputs = Inputs::new(&first, &second).with_reversed([false, reversed]);
    let mut turns = compute_turns(&inputs, &strategy);
    let clusters = enrich_and_cluster(&mut turns, &inputs, &strategy);
    let regions = detect_regions(&mut turns, &clusters, target);
    let rings = traverse(&inputs, &mut turns, &clusters, target, &strategy);
    tracing::info!(
        turns = turns.len(),
        clusters = clusters.len(),
        rings = rings.len(),
        "turn graph"
    );
    write_json(out, &TurnGraphDump::new(target, &turns, &clusters, regions))?;
    provenance::write_sidecar(
        out,
        serde_json::json!({
            "op": format!("{op:?}"),
            "a": a.to_string_lossy(),
            "b": b.to_string_lossy(),
            "turns": turns.len(),
            "clusters": clusters.len(),
        }),
    )?;
    Ok(())
}

fn check(input: &Path, cfg: &OverlayCfg) -> Result<()> {
    let geometry = normalize(&read_geometry(input)?, 0, cfg)?;
    match check_validity(&geometry, 0, &Cartesian::new(*cfg)) {
        Ok(()) => {
            tracing::info!(input = %input.display(), "valid");
            Ok(())
        }
        Err(e) => {
            tracing::warn!(input = %input.display(), error = %e, "invalid");
            Err(e).with_context(|| format!("checking {}", input.display()))
        }
    }
}

fn report() -> Result<()> {
    let doc = provenance::Provenance::here(serde_json::json!({}), Vec::new());
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}
