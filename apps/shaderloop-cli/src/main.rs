mod script;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use shaderloop_input::{HostEvent, InputMapper};
use shaderloop_kernel::{Clock, DemoConfig, ManualClock, SceneContext, UniformName, Variant};
use shaderloop_render::{DebugTextRenderer, ShapeScene};
use shaderloop_tools::{ControlPanel, SceneInspector};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "shaderloop-cli", about = "Headless runner for the shader demos")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct Source {
    /// Demo variant: orbit, scroll, hover or plane
    #[arg(long, default_value = "orbit")]
    variant: Variant,

    /// YAML config overriding the variant defaults
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Source {
    fn load(&self) -> anyhow::Result<DemoConfig> {
        match &self.config {
            Some(path) => DemoConfig::load(path)
                .with_context(|| format!("loading {}", path.display())),
            None => Ok(DemoConfig::for_variant(self.variant)),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print version, variants and the uniform table
    Info,
    /// Run a variant headless with scripted input
    Simulate {
        #[command(flatten)]
        source: Source,
        /// Number of ticks to run
        #[arg(short, long, default_value = "120")]
        ticks: u32,
        /// Seconds between ticks
        #[arg(long, default_value = "0.016666668")]
        dt: f32,
        #[arg(long, default_value = "800")]
        width: u32,
        #[arg(long, default_value = "600")]
        height: u32,
        /// Print a summary every N ticks
        #[arg(long, default_value = "30")]
        every: u32,
        /// Emit summaries as JSON lines
        #[arg(long)]
        json: bool,
        /// Print the last rendered frame
        #[arg(long)]
        frame: bool,
    },
    /// Dump a variant's config as YAML, or validate a YAML file
    Config {
        #[command(flatten)]
        source: Source,
    },
    /// List the debug panel controls for a variant
    Controls {
        #[command(flatten)]
        source: Source,
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Info => {
            println!("shaderloop-cli v{}", env!("CARGO_PKG_VERSION"));
            let variants: Vec<&str> = Variant::ALL.iter().map(|v| v.as_str()).collect();
            println!("variants: {}", variants.join(", "));
            println!("uniforms:");
            for name in UniformName::ALL {
                println!("  {:<20} {:?}", name.shader_name(), name.kind());
            }
        }
        Commands::Simulate {
            source,
            ticks,
            dt,
            width,
            height,
            every,
            json,
            frame,
        } => {
            let config = source.load()?;
            simulate(config, ticks, dt, (width, height), every.max(1), json, frame)?;
        }
        Commands::Config { source } => {
            let config = source.load()?;
            if source.config.is_some() {
                tracing::info!(variant = %config.variant, "config is valid");
            }
            print!("{}", config.to_yaml()?);
        }
        Commands::Controls { source, json } => {
            let config = source.load()?;
            let uniforms = config.build_uniforms()?;
            let panel = ControlPanel::from_uniforms(&uniforms);
            if json {
                println!("{}", serde_json::to_string_pretty(&panel)?);
            } else {
                for c in panel.controls() {
                    let value = uniforms
                        .get(c.name)
                        .map(|v| v.to_string())
                        .unwrap_or_default();
                    println!("{:<20} {:<10} {:?}", c.label, value, c.kind);
                }
            }
        }
    }

    Ok(())
}

fn simulate(
    config: DemoConfig,
    ticks: u32,
    dt: f32,
    (width, height): (u32, u32),
    every: u32,
    json: bool,
    print_frame: bool,
) -> anyhow::Result<()> {
    anyhow::ensure!(dt.is_finite() && dt > 0.0, "dt must be positive, got {dt}");
    let variant = config.variant;
    let mut mapper = InputMapper::new(config.pointer)
        .with_page_height_factor(config.page_height_factor)
        .with_wheel_zoom(config.orbit.is_some());
    let scene = ShapeScene::from_geometry(config.mesh_id, &config.geometry);
    let mut ctx = SceneContext::new(config)?;
    let mut renderer = DebugTextRenderer::with_scene(scene);
    let mut clock = ManualClock::new();

    let resize = HostEvent::Resized {
        width,
        height,
        scale: 1.0,
    };
    if let Some(msg) = mapper.map(resize) {
        ctx.post(msg);
    }

    tracing::info!(%variant, ticks, dt, "simulation starting");
    for i in 0..ticks {
        let progress = i as f32 / ticks as f32;
        for event in script::events_at(variant, progress, width as f32, height as f32) {
            if let Some(msg) = mapper.map(event) {
                ctx.post(msg);
            }
        }
        ctx.tick_with(&clock, &mut renderer);

        let last = i + 1 == ticks;
        if (i % every == 0) || last {
            let summary = SceneInspector::summary(&ctx);
            if json {
                println!("{}", serde_json::to_string(&summary)?);
            } else {
                println!("{summary}");
            }
        }
        clock.advance(dt);
    }

    if print_frame {
        print!("{}", renderer.last_output());
    }
    tracing::info!(
        frames = renderer.frames(),
        elapsed = clock.elapsed(),
        coalesced = ctx.coalesced_inputs(),
        "simulation finished"
    );
    Ok(())
}
