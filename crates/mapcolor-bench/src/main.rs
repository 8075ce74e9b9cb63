//! mapcolor-bench: CLI tool for map coloring runs and diagnostics.
//!
//! Two modes:
//!
//! - `map` runs the full pipeline on an image file, printing per-stage
//!   diagnostics and optionally writing the recolored image.
//! - `graph` colors one of the built-in sample graphs and reports the
//!   number of colors and the time taken.
//!
//! Both accept `--compare` to cross-check against the petgraph and
//! imageproc reference implementations.
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin mapcolor-bench -- map [OPTIONS] <IMAGE_PATH>
//! cargo run --release --bin mapcolor-bench -- graph [OPTIONS] <SAMPLE>
//! ```
//!
//! Set `MAPCOLOR_LOG` (e.g. `MAPCOLOR_LOG=trace`) or pass `--verbose` to
//! see pipeline events.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::fmt::Debug;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use mapcolor_pipeline::diagnostics::{Clock, PipelineDiagnostics, SystemClock};
use mapcolor_pipeline::{
    ConnectivityInspector, DSaturColoring, Graph, PipelineConfig, PipelineEvent, VertexOrdering,
    reference, samples,
};
use tracing_subscriber::EnvFilter;

/// Map coloring runs and diagnostics for mapcolor.
#[derive(Parser)]
#[command(name = "mapcolor-bench", version)]
struct Cli {
    /// Log pipeline events at debug level (trace with `-vv`).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Color the regions of a map image.
    Map(MapArgs),
    /// Color a built-in sample graph.
    Graph(GraphArgs),
}

/// Options shared by both modes.
#[derive(Args)]
struct RunArgs {
    /// Number of runs for averaging.
    #[arg(long, default_value_t = 1, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    runs: usize,

    /// Output diagnostics as JSON instead of a human-readable report.
    #[arg(long)]
    json: bool,

    /// Compare against the petgraph / imageproc reference implementations.
    #[arg(long)]
    compare: bool,

    /// DSatur vertex ordering.
    #[arg(long, value_enum, default_value_t = Ordering::StaticDegree)]
    ordering: Ordering,
}

#[derive(Args)]
struct MapArgs {
    /// Path to the input image (PNG, JPEG, BMP, WebP).
    image_path: PathBuf,

    /// Border color as hex `RRGGBB` (leading `#` optional).
    #[arg(long, default_value = "000000", value_parser = parse_hex_color)]
    border_color: [u8; 3],

    /// Per-channel tolerance when matching the border color.
    #[arg(long, default_value_t = PipelineConfig::DEFAULT_COLOR_TOLERANCE)]
    color_tolerance: u8,

    /// Widest border band (pixels) that still makes two zones adjacent.
    #[arg(long, default_value_t = PipelineConfig::DEFAULT_BORDER_THICKNESS, value_parser = clap::builder::RangedU64ValueParser::<u32>::new().range(1..))]
    border_thickness: u32,

    /// Write the recolored image as PNG.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Full pipeline config as a JSON string.
    ///
    /// When provided, all other pipeline parameter flags are ignored.
    /// The JSON must be a valid `PipelineConfig` serialization.
    #[arg(long)]
    config_json: Option<String>,

    #[command(flatten)]
    run: RunArgs,
}

#[derive(Args)]
struct GraphArgs {
    /// Which sample graph to color.
    #[arg(value_enum)]
    sample: Sample,

    /// Size parameter: vertex count, rim size, or block count.
    #[arg(long, default_value_t = 1000)]
    size: u32,

    #[command(flatten)]
    run: RunArgs,
}

/// DSatur vertex ordering selection.
#[derive(Clone, Copy, ValueEnum)]
enum Ordering {
    /// Fixed descending-degree order.
    StaticDegree,
    /// Classic saturation-first order.
    DynamicSaturation,
}

impl From<Ordering> for VertexOrdering {
    fn from(o: Ordering) -> Self {
        match o {
            Ordering::StaticDegree => Self::StaticDegree,
            Ordering::DynamicSaturation => Self::DynamicSaturation,
        }
    }
}

/// Sample graph selection.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum Sample {
    /// Path on `size` vertices.
    Path,
    /// Cycle on `size` vertices.
    Cycle,
    /// Complete graph on `size` vertices.
    Complete,
    /// Complete bipartite graph with `size` vertices per side.
    Bipartite,
    /// Wheel with `size` rim vertices.
    Wheel,
    /// The Petersen graph (`--size` ignored).
    Petersen,
    /// `size` 4-cycles chained together.
    ConnectedSquares,
    /// `size` disjoint 4-cycles.
    DisconnectedSquares,
}

fn build_sample(sample: Sample, size: u32) -> Result<Graph<u32>, mapcolor_pipeline::GraphError> {
    match sample {
        Sample::Path => samples::path(size),
        Sample::Cycle => samples::cycle(size),
        Sample::Complete => samples::complete(size),
        Sample::Bipartite => samples::complete_bipartite(size, size),
        Sample::Wheel => samples::wheel(size),
        Sample::Petersen => samples::petersen(),
        Sample::ConnectedSquares => samples::connected_squares(size),
        Sample::DisconnectedSquares => samples::disconnected_squares(size),
    }
}

/// Parse `RRGGBB` or `#RRGGBB`.
fn parse_hex_color(s: &str) -> Result<[u8; 3], String> {
    let hex = s.strip_prefix('#').unwrap_or(s);
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(format!("expected 6 hex digits, got {s:?}"));
    }
    let channel = |i: usize| {
        u8::from_str_radix(&hex[i..i + 2], 16).map_err(|e| format!("bad hex color {s:?}: {e}"))
    };
    Ok([channel(0)?, channel(2)?, channel(4)?])
}

/// Build a [`PipelineConfig`] from CLI arguments.
///
/// If `--config-json` is provided, the JSON is parsed directly and all
/// individual parameter flags are ignored.
fn config_from_cli(args: &MapArgs) -> Result<PipelineConfig, String> {
    if let Some(ref json) = args.config_json {
        return serde_json::from_str(json).map_err(|e| format!("Error parsing --config-json: {e}"));
    }

    Ok(PipelineConfig {
        border_color: args.border_color,
        color_tolerance: args.color_tolerance,
        border_thickness: args.border_thickness,
        ordering: args.run.ordering.into(),
        ..PipelineConfig::default()
    })
}

fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_env("MAPCOLOR_LOG").unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        })
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Forward pipeline events to `tracing`.
fn trace_event<V: Debug>(event: &PipelineEvent<'_, V>) {
    match event {
        PipelineEvent::VertexColored {
            vertex,
            color,
            adjacent_colors,
        } => tracing::trace!(?vertex, color, adjacent_colors, "vertex colored"),
        PipelineEvent::ZonesIdentified { count } => tracing::debug!(count, "zones identified"),
        PipelineEvent::ZonesAdjacent { a, b } => tracing::trace!(a, b, "zones adjacent"),
        PipelineEvent::ImproperEdge { a, b, color } => {
            tracing::warn!(?a, ?b, color, "adjacent vertices share a color");
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Map(ref args) => run_map(args),
        Command::Graph(ref args) => run_graph(args),
    }
}

fn run_map(args: &MapArgs) -> ExitCode {
    let config = match config_from_cli(args) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    let image_bytes = match std::fs::read(&args.image_path) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("Error reading {}: {e}", args.image_path.display());
            return ExitCode::FAILURE;
        }
    };

    eprintln!(
        "Image: {} ({} bytes)",
        args.image_path.display(),
        image_bytes.len(),
    );
    eprintln!("Config: {config:#?}");
    eprintln!("Runs: {}", args.run.runs);
    eprintln!();

    let mut all_diagnostics = Vec::with_capacity(args.run.runs);

    for run in 0..args.run.runs {
        if args.run.runs > 1 {
            eprintln!("--- Run {}/{} ---", run + 1, args.run.runs);
        }

        let span = tracing::info_span!("run", index = run);
        let _guard = span.enter();

        let (result, diagnostics) = match mapcolor_pipeline::diagnostics::process_with_diagnostics(
            &image_bytes,
            &config,
            &SystemClock,
            &mut trace_event::<usize>,
        ) {
            Ok(pair) => pair,
            Err(e) => {
                eprintln!("Pipeline error: {e}");
                return ExitCode::FAILURE;
            }
        };

        if args.run.json {
            match serde_json::to_string_pretty(&diagnostics) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    eprintln!("Error serializing diagnostics: {e}");
                    return ExitCode::FAILURE;
                }
            }
        } else {
            println!("{}", diagnostics.report());
        }

        // Side outputs on the first run only.
        if run == 0 {
            if args.run.compare {
                compare_map(&image_bytes, &config, &result);
            }
            if let Some(ref output) = args.output {
                match result
                    .rendered
                    .save_with_format(output, image::ImageFormat::Png)
                {
                    Ok(()) => eprintln!("Recolored image written to {}", output.display()),
                    Err(e) => eprintln!("Error writing {}: {e}", output.display()),
                }
            }
        }

        all_diagnostics.push(diagnostics);

        if args.run.runs > 1 {
            eprintln!();
        }
    }

    if args.run.runs > 1 {
        print_multi_run_summary(&all_diagnostics);
    }

    ExitCode::SUCCESS
}

/// Print zone and color counts side by side with the reference crates.
fn compare_map(
    image_bytes: &[u8],
    config: &PipelineConfig,
    result: &mapcolor_pipeline::ProcessResult,
) {
    let Ok(image) = mapcolor_pipeline::decode::decode_rgb(image_bytes) else {
        return;
    };
    let matcher = mapcolor_pipeline::ZoneGraphBuilder::from_config(config).matcher();
    let zone_map = &result.map.zone_map;

    let clock = SystemClock;
    let start = clock.now();
    let ref_zones = reference::zone_count(&image, &matcher);
    let zones_time = clock.elapsed(&start);

    let start = clock.now();
    let ref_coloring = reference::dsatur_coloring(zone_map.graph());
    let coloring_time = clock.elapsed(&start);

    println!();
    println!("Reference comparison\n{}", "=".repeat(60));
    println!(
        "{:<24} {:>10} {:>12}  {}",
        "Check", "Ours", "Reference", "Reference time"
    );
    println!("{}", "-".repeat(80));
    println!(
        "{:<24} {:>10} {:>12}  {:.3}ms (imageproc)",
        "Zones",
        zone_map.zone_count(),
        ref_zones,
        ms(zones_time),
    );
    println!(
        "{:<24} {:>10} {:>12}  {:.3}ms (petgraph)",
        "Colors",
        result.map.coloring.number_of_colors(),
        ref_coloring.number_of_colors(),
        ms(coloring_time),
    );
    if ref_zones != zone_map.zone_count() {
        tracing::warn!(
            ours = zone_map.zone_count(),
            reference = ref_zones,
            "zone counts differ"
        );
    }
}

fn run_graph(args: &GraphArgs) -> ExitCode {
    let graph = match build_sample(args.sample, args.size) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("Error building sample graph: {e}");
            return ExitCode::FAILURE;
        }
    };
    let ordering: VertexOrdering = args.run.ordering.into();

    eprintln!(
        "Sample: {:?} ({} vertices, {} edges, max degree {})",
        args.sample,
        graph.vertex_count(),
        graph.edge_count(),
        graph.max_degree(),
    );
    eprintln!("Ordering: {}", ordering.name());
    eprintln!("Runs: {}", args.run.runs);
    eprintln!();

    let clock = SystemClock;
    let mut durations = Vec::with_capacity(args.run.runs);
    let mut colors = 0;
    let mut proper = true;

    for run in 0..args.run.runs {
        let span = tracing::info_span!("run", index = run);
        let _guard = span.enter();

        let start = clock.now();
        let coloring = DSaturColoring::new(&graph)
            .with_ordering(ordering)
            .get_coloring_observed(&mut trace_event::<u32>);
        durations.push(clock.elapsed(&start));
        colors = coloring.number_of_colors();
        proper = coloring.is_proper(&graph);
    }

    let components = ConnectivityInspector::new(&graph).component_count();
    let mean = durations.iter().map(|d| ms(*d)).sum::<f64>() / len_f64(&durations);

    let mut report = serde_json::json!({
        "sample": format!("{:?}", args.sample),
        "vertices": graph.vertex_count(),
        "edges": graph.edge_count(),
        "components": components,
        "ordering": ordering.name(),
        "colors": colors,
        "proper": proper,
        "mean_ms": mean,
    });

    if args.run.compare {
        let start = clock.now();
        let ref_coloring = reference::dsatur_coloring(&graph);
        let ref_time = clock.elapsed(&start);
        report["reference"] = serde_json::json!({
            "colors": ref_coloring.number_of_colors(),
            "components": reference::component_count(&graph),
            "ms": ms(ref_time),
        });
    }

    if args.run.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error serializing report: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        println!("Graph Coloring Report\n{}", "=".repeat(60));
        println!(
            "Vertices: {}  |  Edges: {}  |  Components: {components}",
            graph.vertex_count(),
            graph.edge_count(),
        );
        println!("Colors: {colors} ({})", if proper { "proper" } else { "IMPROPER" });
        println!("Mean duration: {mean:.3}ms over {} runs", durations.len());
        if let Some(reference) = report.get("reference") {
            println!("Reference (petgraph): {reference}");
        }
    }

    if proper {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Convert a `Duration` to milliseconds as `f64`.
fn ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

#[allow(clippy::cast_precision_loss)]
fn len_f64<T>(items: &[T]) -> f64 {
    items.len().max(1) as f64
}

/// Print aggregated statistics across multiple runs.
fn print_multi_run_summary(all_diagnostics: &[PipelineDiagnostics]) {
    println!();
    println!(
        "Summary ({} runs)\n{}",
        all_diagnostics.len(),
        "=".repeat(60),
    );

    let Some(first) = all_diagnostics.first() else {
        println!("Warning: no diagnostics to summarize");
        return;
    };

    let durations: Vec<f64> = all_diagnostics
        .iter()
        .map(|d| ms(d.total_duration))
        .collect();

    let min = durations.iter().copied().reduce(f64::min).unwrap_or(0.0);
    let max = durations.iter().copied().reduce(f64::max).unwrap_or(0.0);
    let mean = durations.iter().sum::<f64>() / len_f64(&durations);

    println!("Total duration: min={min:.3}ms  mean={mean:.3}ms  max={max:.3}ms");

    println!();
    println!("{:<24} {:>12}", "Stage", "Mean (ms)");
    println!("{}", "-".repeat(40));

    for (i, (name, _)) in first.stages().iter().enumerate() {
        let stage_durations: Vec<f64> = all_diagnostics
            .iter()
            .map(|d| ms(d.stages()[i].1.duration))
            .collect();
        let stage_mean = stage_durations.iter().sum::<f64>() / len_f64(&stage_durations);
        println!("{name:<24} {stage_mean:>10.3}ms");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors_parse() {
        assert_eq!(parse_hex_color("000000").unwrap(), [0, 0, 0]);
        assert_eq!(parse_hex_color("#ff8000").unwrap(), [255, 128, 0]);
        assert!(parse_hex_color("fff").is_err());
        assert!(parse_hex_color("gg0000").is_err());
    }

    #[test]
    fn cli_parses_map_mode() {
        let cli = Cli::try_parse_from([
            "mapcolor-bench",
            "map",
            "in.png",
            "--border-color",
            "#ffffff",
            "--border-thickness",
            "3",
            "--ordering",
            "dynamic-saturation",
            "--runs",
            "2",
        ])
        .unwrap();
        let Command::Map(args) = cli.command else {
            unreachable!("expected map mode");
        };
        let config = config_from_cli(&args).unwrap();
        assert_eq!(config.border_color, [255, 255, 255]);
        assert_eq!(config.border_thickness, 3);
        assert_eq!(config.ordering, VertexOrdering::DynamicSaturation);
        assert_eq!(args.run.runs, 2);
    }

    #[test]
    fn config_json_overrides_flags() {
        let cli = Cli::try_parse_from([
            "mapcolor-bench",
            "map",
            "in.png",
            "--border-thickness",
            "3",
            "--config-json",
            r#"{"border_thickness": 5}"#,
        ])
        .unwrap();
        let Command::Map(args) = cli.command else {
            unreachable!("expected map mode");
        };
        assert_eq!(config_from_cli(&args).unwrap().border_thickness, 5);
    }

    #[test]
    fn zero_thickness_is_rejected() {
        assert!(
            Cli::try_parse_from(["mapcolor-bench", "map", "in.png", "--border-thickness", "0"])
                .is_err()
        );
    }

    #[test]
    fn every_sample_builds() {
        for sample in Sample::value_variants() {
            let g = build_sample(*sample, 6).unwrap();
            assert!(g.vertex_count() > 0);
        }
    }
}
