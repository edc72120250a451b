use anyhow::{Context, Result, bail};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use choromap::config::FileConfig;
use choromap::data::{MetricProvider, MetricTable, load_dataset};
use choromap::domain::{Color, Metric, short_name};
use choromap::geojson::{GeoFeatureIndex, load_features};
use choromap::geometry::{BoundsAccumulator, Projector};
use choromap::host::{EventKind, HostEvent, HostSurface, MemorySurface, write_svg};
use choromap::layers::{LayerSlot, LayerSpec, RenderMode, render_choropleth};

/// Render administrative regions as an interactive choropleth snapshot
///
/// Examples:
///   # Population heat map of every region
///   choromap --geojson seoul.geojson --dataset population.json
///
///   # Graded recommendation map, fitted to matched regions
///   choromap --geojson seoul.geojson --dataset recommend.json --mode recommendation
///
///   # Color by resident population and show the tooltip of one region
///   choromap --geojson seoul.geojson --dataset population.json --metric residentPopulation --hover 삼성1동
///
///   # Use a config file
///   choromap --config my-map.toml
#[derive(Parser, Debug)]
#[command(name = "choromap")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to config file (optional, auto-searches choromap.toml if not provided)
    #[arg(long)]
    config: Option<PathBuf>,

    /// GeoJSON FeatureCollection file or http(s) URL
    #[arg(short = 'g', long)]
    geojson: Option<String>,

    /// Dataset file or URL (repeatable; earlier datasets win)
    #[arg(short = 'd', long = "dataset")]
    datasets: Vec<String>,

    /// Map screen to render: population or recommendation
    #[arg(short = 'm', long)]
    mode: Option<RenderMode>,

    /// Metric that drives the population colors (e.g. residentPopulation)
    #[arg(long)]
    metric: Option<Metric>,

    /// Output SVG file path (defaults to choromap.svg)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Region short name to hover in the snapshot
    #[arg(long)]
    hover: Option<String>,

    /// Fit the viewport to the rendered regions
    #[arg(long)]
    fit_bounds: bool,

    /// Output width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Output height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let total_start = Instant::now();

    let file_config = match args.config {
        Some(ref config_path) => Some(FileConfig::from_path(config_path)?),
        None => FileConfig::load(),
    };

    let geojson = args
        .geojson
        .clone()
        .or_else(|| file_config.as_ref().and_then(|c| c.geojson.clone()));
    let datasets = if !args.datasets.is_empty() {
        args.datasets.clone()
    } else {
        file_config
            .as_ref()
            .map(|c| c.datasets.clone())
            .unwrap_or_default()
    };
    let mode = args
        .mode
        .or_else(|| file_config.as_ref().and_then(|c| c.mode))
        .unwrap_or_default();
    let metric = args
        .metric
        .or_else(|| file_config.as_ref().and_then(|c| c.metric));
    let hover = args
        .hover
        .clone()
        .or_else(|| file_config.as_ref().and_then(|c| c.hover.clone()));
    let output = args
        .output
        .clone()
        .or_else(|| file_config.as_ref().and_then(|c| c.output.clone()))
        .unwrap_or_else(|| PathBuf::from("choromap.svg"));
    let width = args
        .width
        .or_else(|| file_config.as_ref().map(|c| c.width))
        .unwrap_or(1024);
    let height = args
        .height
        .or_else(|| file_config.as_ref().map(|c| c.height))
        .unwrap_or(768);
    let verbose = args.verbose || file_config.as_ref().map(|c| c.verbose).unwrap_or(false);
    let fetch_config = file_config
        .as_ref()
        .and_then(|c| c.fetch.clone())
        .unwrap_or_default();

    let mut layer_spec = LayerSpec::for_mode(mode);
    if let Some(overrides) = file_config.as_ref().and_then(|c| c.style.as_ref()) {
        layer_spec.style = overrides.apply(layer_spec.style);
    }
    if let Some(fit) = file_config.as_ref().and_then(|c| c.fit_bounds) {
        layer_spec.style.fit_bounds = fit;
    }
    if args.fit_bounds {
        layer_spec.style.fit_bounds = true;
    }
    if let Some(metric) = metric {
        layer_spec = layer_spec.with_threshold_metric(metric);
    }

    let Some(geojson) = geojson else {
        bail!("Must provide --geojson/-g or set geojson in the config file");
    };
    if width == 0 || height == 0 {
        bail!("--width and --height must be positive");
    }

    println!("choromap - Choropleth Map Renderer");
    println!("==================================");
    println!();

    if verbose {
        println!("Configuration:");
        println!("  GeoJSON: {}", geojson);
        for dataset in &datasets {
            println!("  Dataset: {}", dataset);
        }
        println!("  Mode: {:?}", mode);
        println!("  Color policy: {:?}", layer_spec.color_policy);
        println!("  Fit bounds: {}", layer_spec.style.fit_bounds);
        if let Some(ref region) = hover {
            println!("  Hover: {}", region);
        }
        println!("  Size: {}x{}px", width, height);
        println!("  Output: {}", output.display());
        println!(
            "  Fetch: timeout {}s, {} retries",
            fetch_config.timeout_secs, fetch_config.max_retries
        );
        println!();
    }

    let spinner = create_spinner("Loading region geometry...");
    let start = Instant::now();
    let features = load_features(&geojson, &fetch_config).context("Failed to load GeoJSON")?;
    spinner.finish_with_message(format!(
        "Loaded {} features [{:.1}s]",
        features.len(),
        start.elapsed().as_secs_f32()
    ));

    let mut tables: Vec<MetricTable> = Vec::with_capacity(datasets.len());
    for source in &datasets {
        let spinner = create_spinner(&format!("Loading dataset {}...", source));
        let start = Instant::now();
        let table = load_dataset(source, mode.layout(), &fetch_config)
            .with_context(|| format!("Failed to load dataset {}", source))?;
        spinner.finish_with_message(format!(
            "Loaded {} rows from {} [{:.1}s]",
            table.len(),
            source,
            start.elapsed().as_secs_f32()
        ));
        tables.push(table);
    }
    let providers: Vec<&dyn MetricProvider> =
        tables.iter().map(|t| t as &dyn MetricProvider).collect();

    let spinner = create_spinner("Rendering layer...");
    let start = Instant::now();
    let mut host = MemorySurface::new(projector_for(&features));
    let mut clock = Duration::ZERO;
    let mut slot = LayerSlot::new();
    let mut index = GeoFeatureIndex::new();
    let layer = render_choropleth(
        &mut index,
        &features,
        &providers,
        &layer_spec,
        &mut host,
        clock,
    );
    let layer = slot.install(&mut host, layer);

    // Let the layer settle the way a live map would after its first load
    layer.handle_event(&mut host, &HostEvent::view_settled(), clock);
    clock += layer_spec.style.settle_delay;
    layer.advance(&mut host, clock);

    let rendered = layer.len();
    let skipped = features.len().saturating_sub(rendered);
    let mut distribution: BTreeMap<String, usize> = BTreeMap::new();
    for record in layer.records() {
        *distribution.entry(color_name(record.fill_color())).or_default() += 1;
    }
    spinner.finish_with_message(format!(
        "Rendered {} regions, skipped {} [{:.1}s]",
        rendered,
        skipped,
        start.elapsed().as_secs_f32()
    ));

    if let Some(ref region) = hover {
        let target = layer
            .records()
            .find(|r| r.region_short_name() == short_name(region))
            .and_then(|r| r.draw_handle().map(|h| (h, r.centroid())));
        match target {
            Some((handle, centroid)) => {
                let position = host.project(centroid.x, centroid.y);
                clock += Duration::from_millis(1);
                layer.handle_event(
                    &mut host,
                    &HostEvent::shape(handle, EventKind::PointerEnter, position),
                    clock,
                );
                let shown_at = host
                    .overlay(layer.overlay())
                    .and_then(|overlay| overlay.position);
                match shown_at {
                    Some(point) if verbose => {
                        let (lon, lat) = host.projector().unproject(point);
                        println!("  Tooltip for {} shown at ({:.5}, {:.5})", region, lon, lat);
                    }
                    Some(_) => {}
                    None => eprintln!("Warning: Tooltip for {} was not shown", region),
                }
            }
            None => eprintln!("Warning: Region {} was not rendered, skipping hover", region),
        }
    }

    let spinner = create_spinner("Writing SVG file...");
    let start = Instant::now();
    write_svg(&output, &host, &layer_spec.legend(), (width, height))
        .context("Failed to write SVG file")?;
    spinner.finish_with_message(format!(
        "Wrote {} shapes [{:.1}s]",
        host.shape_count(),
        start.elapsed().as_secs_f32()
    ));

    println!();
    println!(
        "Done! Total time: {:.1}s",
        total_start.elapsed().as_secs_f32()
    );
    println!();
    println!("Output: {}", output.display());
    println!();
    println!("Color distribution:");
    for (name, count) in &distribution {
        println!("  {:<8} {}", name, count);
    }

    slot.clear(&mut host);
    Ok(())
}

/// Projector centered on the extent of every feature vertex
fn projector_for(features: &[choromap::domain::Feature]) -> Projector {
    let mut extent = BoundsAccumulator::new();
    for feature in features {
        if let Some(rings) = feature.geometry.rings() {
            for ring in rings {
                extent.extend_all(ring.iter().map(|&(lon, lat)| geo::coord! { x: lon, y: lat }));
            }
        }
    }
    match extent.current() {
        Some(bounds) => {
            let center = bounds.center();
            Projector::new(center.x, center.y)
        }
        None => Projector::new(0.0, 0.0),
    }
}

fn color_name(color: Color) -> String {
    match color {
        Color::RED => "red".to_string(),
        Color::ORANGE => "orange".to_string(),
        Color::YELLOW => "yellow".to_string(),
        Color::GREEN => "green".to_string(),
        Color::BLUE => "blue".to_string(),
        Color::GRAY => "gray".to_string(),
        other => other.to_hex(),
    }
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.green} {msg}") {
        pb.set_style(style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]));
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}
