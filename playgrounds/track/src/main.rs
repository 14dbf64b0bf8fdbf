use anyhow::{Context, Result};
use clap::Parser;
use ply::PlyWriter;
use std::path::PathBuf;
use track::{CurveFamily, SeedPolicy, Track, TrackConfig};

/// Generates a closed-loop track and writes it as an ascii PLY mesh.
#[derive(Debug, Parser)]
#[command(name = "track-playground")]
#[command(version)]
struct Cli {
	/// JSON file with a full track configuration, flags below override it
	#[arg(short, long)]
	config: Option<PathBuf>,

	/// Number of random points (track length)
	#[arg(short, long)]
	points: Option<usize>,

	/// Curve family: quadratic, cubic or catmull-rom
	#[arg(short, long)]
	family: Option<CurveFamily>,

	/// Distance between the two rails
	#[arg(short, long)]
	width: Option<f32>,

	/// Step in curve parameter between samples
	#[arg(short, long)]
	detail: Option<f32>,

	/// Multiplier applied to the noise height
	#[arg(long)]
	height_scale: Option<f32>,

	/// Point cloud seed; without one the config's policy applies
	#[arg(short, long)]
	seed: Option<u64>,

	/// Perlin seed for the height field
	#[arg(long)]
	noise_seed: Option<u32>,

	/// Uniform scale applied to exported coordinates
	#[arg(long, default_value_t = 1.0)]
	scale: f32,

	/// Output PLY file
	#[arg(short, long, default_value = "track.ply")]
	output: PathBuf,
}

impl Cli {
	fn track_config(&self) -> Result<TrackConfig> {
		let config = match &self.config {
			Some(path) => {
				let text = std::fs::read_to_string(path)
					.with_context(|| format!("Failed to read config {}", path.display()))?;
				serde_json::from_str(&text)
					.with_context(|| format!("Failed to parse config {}", path.display()))?
			}
			None => TrackConfig::default(),
		};
		Ok(self.apply(config))
	}

	fn apply(&self, mut config: TrackConfig) -> TrackConfig {
		if let Some(points) = self.points {
			config.point_count = points;
		}
		if let Some(family) = self.family {
			config.family = family;
		}
		if let Some(width) = self.width {
			config.ribbon.track_width = width;
		}
		if let Some(detail) = self.detail {
			config.ribbon.detail_step = detail;
		}
		if let Some(height_scale) = self.height_scale {
			config.ribbon.height_scale = height_scale;
		}
		if let Some(seed) = self.seed {
			config.seed = SeedPolicy::Fixed(seed);
		}
		if let Some(noise_seed) = self.noise_seed {
			config.noise.seed = noise_seed;
		}
		config
	}
}

fn main() -> Result<()> {
	tracing_subscriber::fmt()
		.with_env_filter(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
		)
		.init();

	let cli = Cli::parse();
	let config = cli.track_config()?;
	tracing::info!(
		"Generating {} points joined by {} curves (seed {:?})",
		config.point_count,
		config.family,
		config.seed
	);

	let track = Track::new(config).context("Failed to build track")?;
	let snapshot = track.snapshot();

	PlyWriter::new()
		.with_scale(cli.scale)
		.write_file(&snapshot.mesh, &cli.output)
		.with_context(|| format!("Failed to write {}", cli.output.display()))?;

	println!(
		"{} segments, {} vertices, {} triangles -> {}",
		snapshot.closed.segment_count(),
		snapshot.mesh.vertex_count(),
		snapshot.mesh.triangle_count(),
		cli.output.display()
	);
	Ok(())
}
