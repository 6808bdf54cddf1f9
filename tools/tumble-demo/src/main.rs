use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tumble_bridge::{FrameDriver, SceneDescriptor};
use tumble_core::{Isometry, WorldConfig};
use tumble_materials::MaterialId;
use tumble_world::Spawned;

#[derive(Parser, Debug)]
#[command(name = "tumble-demo", version, about = "Headless run of the falling-spheres scene: floor, ball, simulated clicks")]
struct Opts {
    /// Render frames to simulate
    #[arg(long, default_value_t = 600)]
    frames: u64,

    /// Seed for the scene's initial push, click spawns and frame jitter
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Simulate a click every N frames (0 = never)
    #[arg(long, default_value_t = 60)]
    click_every: u64,

    /// World config TOML (overrides the scene's own config)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Scene JSON (default: built-in demo scene)
    #[arg(long)]
    scene: Option<PathBuf>,

    /// Write the scene in use as JSON and continue
    #[arg(long)]
    write_scene: Option<PathBuf>,

    /// Irregular frame times between 0.5x and 2.5x fixed_dt
    #[arg(long, action = ArgAction::SetTrue)]
    jitter: bool,

    /// Print a status line every N frames (0 = only the final poses)
    #[arg(long, default_value_t = 60)]
    print_every: u64,
}

fn hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(s, "{:02x}", b);
    }
    s
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();
    let opts = Opts::parse();

    let desc = match &opts.scene {
        Some(path) => SceneDescriptor::from_file(path).with_context(|| format!("load scene {}", path.display()))?,
        None => SceneDescriptor::demo(opts.seed),
    };
    if let Some(out) = &opts.write_scene {
        std::fs::write(out, desc.to_json_pretty()?).with_context(|| format!("write {}", out.display()))?;
    }
    let config = opts
        .config
        .as_ref()
        .map(|p| WorldConfig::from_file(p).with_context(|| format!("load config {}", p.display())))
        .transpose()?;
    let scene = desc.build(config).context("build scene")?;
    let fixed_dt = scene.world.config().fixed_dt;

    let click_material = desc.material_id("sphere").unwrap_or_else(|_| MaterialId::from_name("sphere"));
    let mut spawner = scene.world.spawner(click_material, opts.seed.wrapping_add(1));
    let mut driver = FrameDriver::new(scene.world, |_: &Spawned| Isometry::default());
    for b in &scene.bodies {
        driver.bind(b.id, Isometry::default(), b.constant_force);
    }
    info!(bodies = scene.bodies.len(), frames = opts.frames, "starting");

    let mut jitter = ChaCha8Rng::seed_from_u64(opts.seed);
    let mut warnings = 0usize;
    for frame in 0..opts.frames {
        if opts.click_every > 0 && frame > 0 && frame % opts.click_every == 0 {
            spawner.request_spawn(&scene.spawn)?;
        }
        let dt = if opts.jitter { fixed_dt * jitter.gen_range(0.5..2.5) } else { fixed_dt };
        let report = driver.frame(dt)?;
        warnings += report.warnings.len();

        if opts.print_every > 0 && (frame + 1) % opts.print_every == 0 {
            let w = driver.world();
            println!(
                "frame {:>6}  t={:>8.3}s  bodies={:>4}  substeps={}  contacts={:>3}  hash={}",
                frame + 1,
                w.time(),
                w.len(),
                report.stats.substeps,
                report.stats.contacts,
                &hex(&w.step_hash())[..16],
            );
        }
    }

    println!("final poses:");
    for b in driver.synchronizer().bindings() {
        let p = b.proxy;
        println!(
            "  {}  pos=({:>8.3}, {:>8.3}, {:>8.3})  rot=({:.4}, {:.4}, {:.4}, {:.4})",
            b.body, p.pos.x, p.pos.y, p.pos.z, p.rot.x, p.rot.y, p.rot.z, p.rot.w
        );
    }
    println!("Hash:     {}", hex(&driver.world().step_hash()));
    println!("Warnings: {}", warnings);
    Ok(())
}
