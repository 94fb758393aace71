use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use portalview::demo::{portal_level, Level};
use portalview::geom2::{Angle, Point};
use portalview::player::{Intent, MotionCfg, Player, PlayerState};
use portalview::render::{render_view, DisplayList, ViewCfg};
use portalview::trace::{build_radial_trace, TraceCfg};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::fmt::SubscriberBuilder;

mod report;

use report::{
    write_json, CrossingReport, Header, OpReport, RenderReport, TraceReport, WalkReport,
};

#[derive(Parser)]
#[command(name = "cli")]
#[command(about = "Portal visibility runner over the demo level")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

/// Viewpoint in the demo level; defaults to the start position.
#[derive(Args, Clone, Debug)]
struct ViewpointArgs {
    #[arg(long, allow_hyphen_values = true)]
    x: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    y: Option<f64>,
    /// Space index (0 = outside, 1 = inside the magic pillar, 2 = infinite room)
    #[arg(long)]
    space: Option<usize>,
    /// Camera angle in radians
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    camera: f64,
}

#[derive(Args, Clone, Debug)]
struct TraceArgs {
    #[arg(long, default_value_t = TraceCfg::default().max_distance)]
    max_distance: f64,
    #[arg(long, default_value_t = TraceCfg::default().max_depth)]
    max_depth: usize,
}

impl TraceArgs {
    fn cfg(&self) -> TraceCfg {
        TraceCfg {
            max_distance: self.max_distance,
            max_depth: self.max_depth,
        }
    }
}

#[derive(Subcommand)]
enum Action {
    /// Compute the visibility tree from a viewpoint and summarize it
    Trace {
        #[command(flatten)]
        at: ViewpointArgs,
        #[command(flatten)]
        trace: TraceArgs,
        /// Write the full tree as JSON
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Replay a scripted intent sequence, e.g. "up:40,up+right:10,camera-left:30"
    Walk {
        #[command(flatten)]
        at: ViewpointArgs,
        #[arg(long)]
        script: String,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Render the view into a display list and write it as JSON
    Render {
        #[command(flatten)]
        at: ViewpointArgs,
        #[command(flatten)]
        trace: TraceArgs,
        #[arg(long, default_value_t = 1024.0)]
        width: f64,
        #[arg(long, default_value_t = 768.0)]
        height: f64,
        #[arg(long)]
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    let level = portal_level().context("building demo level")?;
    match cmd.action {
        Action::Trace { at, trace, out } => run_trace(&level, &at, &trace, out),
        Action::Walk { at, script, out } => walk(&level, &at, &script, out),
        Action::Render {
            at,
            trace,
            width,
            height,
            out,
        } => render(&level, &at, &trace, width, height, out),
    }
}

fn viewpoint(level: &Level, at: &ViewpointArgs) -> Result<PlayerState> {
    let space = match at.space {
        Some(i) if i < level.world.num_spaces() => portalview::portal::SpaceId(i),
        Some(i) => bail!("unknown space {i}; the demo level has {}", level.world.num_spaces()),
        None => level.start.space,
    };
    let position = Point::new(
        at.x.unwrap_or(level.start.position.x),
        at.y.unwrap_or(level.start.position.y),
    );
    if !level.world.space(space).contains(&position) {
        bail!("({}, {}) is not inside space {}", position.x, position.y, space.0);
    }
    Ok(PlayerState {
        space,
        position,
        camera: Angle::from_radians(at.camera),
    })
}

fn run_trace(
    level: &Level,
    at: &ViewpointArgs,
    args: &TraceArgs,
    out: Option<PathBuf>,
) -> Result<()> {
    let state = viewpoint(level, at)?;
    let cfg = args.cfg();
    let trace = build_radial_trace(&level.world, state.space, state.position, &cfg)
        .with_context(|| format!("tracing from {:?}", state.position))?;
    info!(
        nodes = trace.node_count(),
        max_depth = trace.max_depth(),
        root_points = trace.scope().num_points(),
        "trace"
    );
    let report = TraceReport::new(&state, cfg.max_distance, &trace);
    match out {
        Some(path) => {
            write_json(&path, &report)?;
            info!(path = %path.display(), "wrote trace report");
        }
        None => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}

/// Parses `keys:count` steps separated by commas; keys are joined with `+`.
fn parse_script(script: &str) -> Result<Vec<(Intent, usize)>> {
    script
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|step| {
            let (keys, count) = step
                .split_once(':')
                .ok_or_else(|| anyhow!("step {step:?} is missing ':<ticks>'"))?;
            let count: usize = count
                .trim()
                .parse()
                .with_context(|| format!("tick count in step {step:?}"))?;
            let mut intent = Intent::default();
            for key in keys.split('+').map(str::trim) {
                match key {
                    "up" => intent.up = true,
                    "down" => intent.down = true,
                    "left" => intent.left = true,
                    "right" => intent.right = true,
                    "camera-left" => intent.camera_left = true,
                    "camera-right" => intent.camera_right = true,
                    "idle" => {}
                    other => bail!("unknown key {other:?} in step {step:?}"),
                }
            }
            Ok((intent, count))
        })
        .collect()
}

fn walk(level: &Level, at: &ViewpointArgs, script: &str, out: Option<PathBuf>) -> Result<()> {
    let steps = parse_script(script)?;
    let start = viewpoint(level, at)?;
    let mut player = Player::new(start, MotionCfg::default());
    let mut crossings = Vec::new();
    let mut tick = 0;
    for (intent, count) in steps {
        for _ in 0..count {
            let from = player.state().space;
            if let Some(link) = player.apply_intent(&level.world, &intent) {
                let to = player.state().space;
                info!(tick, link = link.0, from = from.0, to = to.0, "crossed");
                crossings.push(CrossingReport {
                    tick,
                    link: link.0,
                    from_space: from.0,
                    to_space: to.0,
                });
            }
            tick += 1;
        }
    }
    let end = player.state();
    info!(
        ticks = tick,
        crossings = crossings.len(),
        space = end.space.0,
        x = end.position.x,
        y = end.position.y,
        "walk finished"
    );
    let report = WalkReport {
        header: Header::current(),
        script: script.to_string(),
        ticks: tick,
        start: (&start).into(),
        end: (&end).into(),
        crossings,
    };
    match out {
        Some(path) => write_json(&path, &report)?,
        None => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}

fn render(
    level: &Level,
    at: &ViewpointArgs,
    args: &TraceArgs,
    width: f64,
    height: f64,
    out: PathBuf,
) -> Result<()> {
    let state = viewpoint(level, at)?;
    let cfg = ViewCfg {
        width,
        height,
        trace: args.cfg(),
        ..ViewCfg::default()
    };
    let mut list = DisplayList::new();
    let traced = render_view(&mut list, &level.world, &state, &cfg).context("rendering view")?;
    info!(ops = list.ops().len(), traced = traced.is_some(), "rendered");
    let report = RenderReport {
        header: Header::current(),
        width,
        height,
        viewpoint: (&state).into(),
        traced: traced.is_some(),
        ops: list.ops().iter().map(OpReport::from).collect(),
    };
    write_json(&out, &report)?;
    info!(path = %out.display(), "wrote display list");
    Ok(())
}
