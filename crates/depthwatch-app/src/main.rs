//! Headless demo runner: sets up the convoy action, advances the world in
//! frame-sized steps, and narrates events and sensor contacts to stdout.
//!
//! Usage: `depthwatch [minutes] [--save FILE]`

use anyhow::{Context, Result};

use depthwatch_core::events::SimEvent;
use depthwatch_sim::scenario;
use depthwatch_sim::{persistence, SimConfig, WorldEngine};

/// Wall-frame the demo advances per iteration (seconds). Larger than the
/// integration ceiling, so every frame exercises sub-stepping.
const FRAME_SECS: f64 = 0.1;

fn main() -> Result<()> {
    env_logger::init();

    let mut minutes = 5.0_f64;
    let mut save_path: Option<String> = None;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--save" => {
                save_path = Some(args.next().context("--save requires a file path")?);
            }
            other => {
                minutes = other
                    .parse()
                    .with_context(|| format!("not a minute count: {other}"))?;
            }
        }
    }

    let mut engine = WorldEngine::new(SimConfig::default());
    let convoy = scenario::convoy_action(&mut engine).context("building scenario")?;
    let player = engine.player().context("scenario must set a player")?;

    log::info!(
        "convoy action begins: {} member(s), running {minutes} simulated minute(s)",
        engine
            .get_convoy(WorldEngine::id_of(convoy))
            .map(|c| c.members.len())
            .unwrap_or(0)
    );

    let frames = (minutes * 60.0 / FRAME_SECS) as u64;
    for frame in 0..frames {
        engine
            .advance(FRAME_SECS)
            .context("advancing simulation")?;

        // Drain this frame's events, as a presentation layer would.
        for event in engine.events() {
            narrate(event);
        }

        // A sonar picture every ten simulated seconds.
        if frame % 100 == 0 {
            let contacts = engine.sonar_contacts_of(player);
            let time = engine.time();
            println!(
                "t={:7.1}s  hydrophone contacts: {}",
                time.elapsed_secs,
                contacts.len()
            );
            for c in &contacts {
                println!(
                    "    {:?} bearing {:5.1} deg, {:4.1} dB over background",
                    c.class,
                    c.bearing.to_degrees(),
                    c.strength_db
                );
            }
        }

        if engine.run_state() != depthwatch_core::enums::RunState::Running {
            println!("run over: {:?}", engine.run_state());
            break;
        }
    }

    let snapshot = engine.snapshot();
    println!(
        "finished at t={:.1}s with {} object(s), state {:?}",
        snapshot.time.elapsed_secs,
        snapshot.objects.len(),
        snapshot.run_state
    );

    if let Some(path) = save_path {
        let save = persistence::save_game(&engine).context("capturing save")?;
        let json = persistence::to_json(&save).context("encoding save")?;
        std::fs::write(&path, json).with_context(|| format!("writing {path}"))?;
        log::info!("world saved to {path}");
    }

    Ok(())
}

fn narrate(event: &SimEvent) {
    match event {
        SimEvent::Explosion { position } => {
            println!("  ** explosion at ({:.0}, {:.0})", position.x, position.y)
        }
        SimEvent::GunFire { caliber, .. } => println!("  ** gunfire ({caliber:?})"),
        SimEvent::Ping { bearing, .. } => {
            println!("  ** ping, bearing {:.0} deg", bearing.to_degrees())
        }
        SimEvent::Splash { position } => {
            println!("  ** splash at ({:.0}, {:.0})", position.x, position.y)
        }
        SimEvent::TorpedoLaunch { .. } => println!("  ** torpedo away"),
        SimEvent::ShipSunk { position } => {
            println!("  ** ship sunk at ({:.0}, {:.0})", position.x, position.y)
        }
    }
}
