use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use fogline::api::{
    bisector_overlay, constraints, constraints_collection, fog_mask_geojson, fold_with,
    play_area_geojson, Clue, FeasibleRegion, GeomCfg, LonLat,
};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;

#[derive(Parser)]
#[command(name = "fogline-cli")]
#[command(about = "Fold a clue history into a feasible region and fog mask (GeoJSON)")]
struct Cmd {
    #[command(flatten)]
    geom: GeomArgs,

    #[command(subcommand)]
    action: Action,
}

/// Geometry settings; defaults match `GeomCfg::default()`.
#[derive(Args)]
struct GeomArgs {
    /// Vertex count of disk approximations
    #[arg(long, global = true, default_value_t = 64)]
    disk_vertices: usize,
    /// Half-width of the bisector half-plane quadrilateral, meters
    #[arg(long, global = true, default_value_t = 100_000.0)]
    half_plane_width_m: f64,
}

impl GeomArgs {
    fn cfg(&self) -> GeomCfg {
        GeomCfg {
            disk_vertices: self.disk_vertices,
            half_plane_width_m: self.half_plane_width_m,
            ..GeomCfg::default()
        }
    }
}

#[derive(Subcommand)]
enum Action {
    /// Write the fog mask as a GeoJSON Feature (`null` when nothing is hidden)
    Mask {
        #[arg(long)]
        history: PathBuf,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print the feasible region state and area
    Region {
        #[arg(long)]
        history: PathBuf,
    },
    /// Print per-clue constraint shapes (and optional bisector lines)
    Constraints {
        #[arg(long)]
        history: PathBuf,
        #[arg(long)]
        bisectors: bool,
    },
    /// Print the play-area mask for a game zone
    PlayArea {
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long)]
        radius_m: f64,
    },
}

fn main() -> Result<()> {
    SubscriberBuilder::default()
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
    let cmd = Cmd::parse();
    let cfg = cmd.geom.cfg();
    match cmd.action {
        Action::Mask { history, out } => {
            let clues = load_history(&history)?;
            tracing::info!(history = %history.display(), clues = clues.len(), "mask");
            emit(&fog_mask_geojson(&clues, cfg), out.as_deref())
        }
        Action::Region { history } => {
            let clues = load_history(&history)?;
            let region = fold_with(&clues, cfg);
            tracing::info!(clues = clues.len(), state = region.label(), "region");
            emit(&region_summary(&region), None)
        }
        Action::Constraints { history, bisectors } => {
            let clues = load_history(&history)?;
            let mut doc = constraints_collection(&constraints(&clues, cfg));
            if bisectors {
                doc = json!({ "constraints": doc, "bisectors": bisector_overlay(&clues) });
            }
            emit(&doc, None)
        }
        Action::PlayArea { lon, lat, radius_m } => {
            emit(&play_area_geojson(LonLat::new(lon, lat), radius_m), None)
        }
    }
}

/// Read a JSON array of resolved clues.
fn load_history(path: &Path) -> Result<Vec<Clue>> {
    let bytes =
        std::fs::read(path).with_context(|| format!("reading history {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("parsing history {}", path.display()))
}

fn region_summary(region: &FeasibleRegion) -> Value {
    json!({
        "state": region.label(),
        "polygons": region.polygons().map(|mp| mp.0.len()).unwrap_or(0),
        "area_deg2": region.area_deg2(),
        "area_m2": region.area_m2(),
    })
}

fn emit(doc: &Value, out: Option<&Path>) -> Result<()> {
    let text = serde_json::to_string_pretty(doc)?;
    match out {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)
                        .with_context(|| format!("creating {}", parent.display()))?;
                }
            }
            std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))
        }
        None => {
            println!("{text}");
            Ok(())
        }
    }
}
