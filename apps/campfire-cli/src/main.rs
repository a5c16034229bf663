use campfire_common::{AIR_IOR, GLASS_IOR, refraction_angle};
use campfire_fire::FireMaterial;
use campfire_input::{Pointer, Viewport};
use campfire_render::{AsciiFireRenderer, DebugTextRenderer, RenderView, Renderer};
use campfire_scene::{Animator, Scene, SceneConfig};
use clap::{Parser, Subcommand};
use glam::Vec2;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "campfire-cli", about = "CLI tool for the campfire scene")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML scene configuration
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Compute a refraction angle
    Refract {
        /// Incident angle in radians
        #[arg(allow_negative_numbers = true)]
        angle: f32,
        #[arg(long, default_value_t = GLASS_IOR)]
        glass_ior: f32,
        #[arg(long, default_value_t = AIR_IOR)]
        air_ior: f32,
    },
    /// Run the animator headless and dump the resulting scene state
    Simulate {
        /// Number of frames to animate
        #[arg(short, long, default_value = "60")]
        frames: u64,
        /// Frames per simulated second
        #[arg(long, default_value = "60")]
        fps: f32,
        /// Pointer x in NDC ([-1, 1])
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        x: f32,
        /// Pointer y in NDC ([-1, 1])
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        y: f32,
        /// RNG seed for the fire
        #[arg(short, long, default_value = "42")]
        seed: u64,
    },
    /// Print an ASCII preview of the fire at a given time
    Preview {
        #[arg(long, default_value = "32")]
        columns: usize,
        #[arg(long, default_value = "48")]
        rows: usize,
        /// Scene time in seconds
        #[arg(short, long, default_value = "0")]
        time: f32,
        /// Fire seed (drawn from the RNG seed when omitted)
        #[arg(long)]
        fire_seed: Option<f32>,
        /// RNG seed for the fire
        #[arg(short, long, default_value = "42")]
        seed: u64,
    },
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<SceneConfig> {
    Ok(match path {
        Some(path) => SceneConfig::load(path)?,
        None => SceneConfig::default(),
    })
}

/// One-line report of a refraction through glass into air.
fn refract_report(angle: f32, glass_ior: f32, air_ior: f32) -> String {
    let r = refraction_angle(angle, glass_ior, air_ior);
    format!(
        "incident={angle:.4} rad glass={glass_ior} air={air_ior} -> refraction={r:.4} rad ({:.2} deg)",
        r.to_degrees()
    )
}

/// Animate `frames` frames headless with the pointer parked at `ndc`.
fn simulate(config: &SceneConfig, frames: u64, fps: f32, ndc: Vec2, seed: u64) -> Scene {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut scene = Scene::campground(config.fire, &mut rng);
    let animator = Animator::new(config.animation);

    let view = RenderView::default();
    let viewport = Viewport::new(view.viewport.x, view.viewport.y);
    let pointer = Pointer::from_ndc(ndc).in_viewport(&viewport);
    let fps = fps.max(1.0);

    tracing::info!(frames, fps, ?pointer, "simulating");
    for frame in 0..frames {
        let input = animator.frame_input(pointer, frame as f32 / fps);
        animator.update(&mut scene, &input);
    }
    scene
}

/// ASCII rendering of the fire at scene time `time`, headed by its seed.
fn preview(
    config: &SceneConfig,
    columns: usize,
    rows: usize,
    time: f32,
    fire_seed: Option<f32>,
    seed: u64,
) -> String {
    let material = match fire_seed {
        Some(s) => FireMaterial::with_seed(config.fire, s),
        None => FireMaterial::new(config.fire, &mut StdRng::seed_from_u64(seed)),
    };
    let mut scene = Scene::with_fire(material);
    scene.campfire.sync(time);
    format!(
        "seed={:.3} t={time:.2}\n{}",
        scene.campfire.material.seed(),
        AsciiFireRenderer::new(columns, rows).render(&scene, &RenderView::default())
    )
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("campfire-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("render: {}", campfire_render::crate_info());
            let config = load_config(cli.config.as_ref())?;
            print!("{}", config.to_yaml_string()?);
        }
        Commands::Refract {
            angle,
            glass_ior,
            air_ior,
        } => println!("{}", refract_report(angle, glass_ior, air_ior)),
        Commands::Simulate {
            frames,
            fps,
            x,
            y,
            seed,
        } => {
            let config = load_config(cli.config.as_ref())?;
            let scene = simulate(&config, frames, fps, Vec2::new(x, y), seed);
            print!("{}", DebugTextRenderer::new().render(&scene, &RenderView::default()));
        }
        Commands::Preview {
            columns,
            rows,
            time,
            fire_seed,
            seed,
        } => {
            let config = load_config(cli.config.as_ref())?;
            print!("{}", preview(&config, columns, rows, time, fire_seed, seed));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["campfire-cli", "refract", "-0.5"]).unwrap();
        assert!(matches!(cli.command, Commands::Refract { angle, .. } if angle == -0.5));

        let cli =
            Cli::try_parse_from(["campfire-cli", "simulate", "--frames", "3", "--x", "-1"]).unwrap();
        assert!(matches!(cli.command, Commands::Simulate { frames: 3, x, .. } if x == -1.0));

        assert!(Cli::try_parse_from(["campfire-cli", "bogus"]).is_err());
    }

    #[test]
    fn refract_report_at_normal_incidence() {
        let report = refract_report(0.0, GLASS_IOR, AIR_IOR);
        assert!(report.contains("refraction=0.0000 rad"), "{report}");
    }

    #[test]
    fn refract_report_bends_away_from_normal() {
        let report = refract_report(0.3, GLASS_IOR, AIR_IOR);
        let expected = refraction_angle(0.3, GLASS_IOR, AIR_IOR);
        assert!(expected > 0.3);
        assert!(report.contains(&format!("refraction={expected:.4}")), "{report}");
    }

    #[test]
    fn simulate_advances_the_clock() {
        let config = SceneConfig::default();
        let scene = simulate(&config, 30, 60.0, Vec2::ZERO, 7);
        assert_eq!(scene.frame(), 30);
        assert!((scene.elapsed() - 29.0 / 60.0).abs() < 1e-5);
    }

    #[test]
    fn simulate_is_deterministic_per_seed() {
        let config = SceneConfig::default();
        let a = simulate(&config, 10, 60.0, Vec2::new(0.5, -0.5), 3);
        let b = simulate(&config, 10, 60.0, Vec2::new(0.5, -0.5), 3);
        assert_eq!(a.campfire.material.seed(), b.campfire.material.seed());
        assert_eq!(a.ambient.intensity, b.ambient.intensity);

        let view = RenderView::default();
        assert_eq!(
            DebugTextRenderer::new().render(&a, &view),
            DebugTextRenderer::new().render(&b, &view)
        );
    }

    #[test]
    fn zero_frames_leaves_scene_untouched() {
        let config = SceneConfig::default();
        let scene = simulate(&config, 0, 0.0, Vec2::ZERO, 1);
        assert_eq!(scene.frame(), 0);
        assert_eq!(scene.elapsed(), 0.0);
    }

    #[test]
    fn preview_uses_explicit_seed() {
        let config = SceneConfig::default();
        let out = preview(&config, 8, 12, 1.5, Some(4.25), 0);
        let mut lines = out.lines();
        assert_eq!(lines.next(), Some("seed=4.250 t=1.50"));
        let body: Vec<&str> = lines.collect();
        assert_eq!(body.len(), 12);
        assert!(body.iter().all(|row| row.chars().count() == 8));
    }

    #[test]
    fn preview_draws_seed_from_rng() {
        let config = SceneConfig::default();
        assert_eq!(
            preview(&config, 6, 6, 0.0, None, 9),
            preview(&config, 6, 6, 0.0, None, 9)
        );
    }
}
