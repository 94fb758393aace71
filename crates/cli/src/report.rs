use anyhow::{Context, Result};
use portalview::geom2::{Point, Polygon};
use portalview::player::PlayerState;
use portalview::render::{DisplayOp, Rgba};
use portalview::trace::RayTrace;
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::process::Command;

/// Common header of every report.
#[derive(Debug, Serialize)]
pub struct Header {
    pub code_rev: String,
    pub version: &'static str,
}

impl Header {
    pub fn current() -> Self {
        Self {
            code_rev: current_git_rev(),
            version: portalview::VERSION,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StateReport {
    pub space: usize,
    pub position: [f64; 2],
    pub camera: f64,
}

impl From<&PlayerState> for StateReport {
    fn from(s: &PlayerState) -> Self {
        Self {
            space: s.space.0,
            position: xy(&s.position),
            camera: s.camera.radians(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NodeReport {
    pub depth: usize,
    pub space: usize,
    /// Link the node was entered through; `None` for the root.
    pub link: Option<usize>,
    pub origin: [f64; 2],
    /// Scope outline mapped into the viewpoint frame.
    pub scope: Vec<[f64; 2]>,
}

#[derive(Debug, Serialize)]
pub struct TraceReport {
    #[serde(flatten)]
    pub header: Header,
    pub viewpoint: StateReport,
    pub max_distance: f64,
    pub node_count: usize,
    pub max_depth: usize,
    pub nodes: Vec<NodeReport>,
}

impl TraceReport {
    pub fn new(state: &PlayerState, max_distance: f64, trace: &RayTrace) -> Self {
        let mut nodes = vec![node_report(trace, None)];
        collect_children(trace, &mut nodes);
        Self {
            header: Header::current(),
            viewpoint: state.into(),
            max_distance,
            node_count: nodes.len(),
            max_depth: trace.max_depth(),
            nodes,
        }
    }
}

// Pre-order, matching `RayTrace::iter`.
fn collect_children(node: &RayTrace, out: &mut Vec<NodeReport>) {
    for child in node.children() {
        out.push(node_report(child.trace(), Some(child.link().0)));
        collect_children(child.trace(), out);
    }
}

fn node_report(node: &RayTrace, link: Option<usize>) -> NodeReport {
    NodeReport {
        depth: node.depth(),
        space: node.space().0,
        link,
        origin: xy(&node.origin()),
        scope: node
            .scope()
            .points()
            .iter()
            .map(|p| xy(&node.to_view().apply(p)))
            .collect(),
    }
}

#[derive(Debug, Serialize)]
pub struct CrossingReport {
    pub tick: usize,
    pub link: usize,
    pub from_space: usize,
    pub to_space: usize,
}

#[derive(Debug, Serialize)]
pub struct WalkReport {
    #[serde(flatten)]
    pub header: Header,
    pub script: String,
    pub ticks: usize,
    pub start: StateReport,
    pub end: StateReport,
    pub crossings: Vec<CrossingReport>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OpReport {
    Rect {
        corners: Vec<[f64; 2]>,
        color: [u8; 4],
        clips: Vec<Vec<[f64; 2]>>,
    },
    Circle {
        center: [f64; 2],
        radius: f64,
        color: [u8; 4],
        clips: Vec<Vec<[f64; 2]>>,
    },
}

impl From<&DisplayOp> for OpReport {
    fn from(op: &DisplayOp) -> Self {
        match op {
            DisplayOp::Rect {
                corners,
                color,
                clips,
            } => Self::Rect {
                corners: corners.iter().map(xy).collect(),
                color: rgba(color),
                clips: clips.iter().map(outline).collect(),
            },
            DisplayOp::Circle {
                center,
                radius,
                color,
                clips,
            } => Self::Circle {
                center: xy(center),
                radius: *radius,
                color: rgba(color),
                clips: clips.iter().map(outline).collect(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RenderReport {
    #[serde(flatten)]
    pub header: Header,
    pub width: f64,
    pub height: f64,
    pub viewpoint: StateReport,
    /// False when the trace failed and the flat fallback was drawn.
    pub traced: bool,
    pub ops: Vec<OpReport>,
}

fn xy(p: &Point) -> [f64; 2] {
    [p.x, p.y]
}

fn rgba(c: &Rgba) -> [u8; 4] {
    [c.r, c.g, c.b, c.a]
}

fn outline(poly: &Polygon) -> Vec<[f64; 2]> {
    poly.points().iter().map(xy).collect()
}

/// Pretty-prints `value` to `path`, creating parent directories.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating report dir {}", parent.display()))?;
        }
    }
    fs::write(path, serde_json::to_vec_pretty(value)?)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// `GIT_COMMIT` at build or run time, else `git rev-parse HEAD`, else "unknown".
pub fn current_git_rev() -> String {
    let from_env = option_env!("GIT_COMMIT")
        .map(str::to_string)
        .or_else(|| std::env::var("GIT_COMMIT").ok())
        .filter(|s| !s.is_empty());
    if let Some(rev) = from_env {
        return rev;
    }
    Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|out| out.status.success())
        .and_then(|out| String::from_utf8(out.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
