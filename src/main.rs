//! Skyfall headless runner
//!
//! Runs a session on the rapier world with the autopilot at the controls and
//! prints a JSON summary when the run ends.
//!
//! Usage: `skyfall [seed] [seconds]`

use serde::Serialize;

use skyfall::consts::*;
use skyfall::physics::RapierWorld;
use skyfall::sim::{GameEvent, Hud, Session, autopilot, tick};

/// Simulated display frame time (fixed timestep decoupled from frame rate)
const FRAME_DT: f32 = 1.0 / 50.0;
/// Default run length in seconds
const DEFAULT_SECONDS: f32 = 120.0;

#[derive(Debug, Serialize)]
struct RunSummary {
    seed: u64,
    ticks: u64,
    seconds: f32,
    hud: Hud,
    pickups_collected: u32,
    hits_taken: u32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = match args.next() {
        Some(arg) => arg.parse::<u64>()?,
        None => std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)?
            .as_secs(),
    };
    let seconds = match args.next() {
        Some(arg) => arg.parse::<f32>()?,
        None => DEFAULT_SECONDS,
    };

    log::info!("Skyfall (headless) starting: seed {}, {} s", seed, seconds);

    let mut session = Session::new(RapierWorld::default(), seed);
    let mut accumulator = 0.0f32;
    let mut frames_left = (seconds / FRAME_DT).ceil() as u64;
    let mut ticks = 0u64;
    let mut pickups_collected = 0u32;
    let mut hits_taken = 0u32;

    while frames_left > 0 {
        frames_left -= 1;
        accumulator += FRAME_DT;

        let mut substeps = 0;
        while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            session.input = autopilot::steer(&session);
            tick(&mut session, SIM_DT);
            accumulator -= SIM_DT;
            substeps += 1;
            ticks += 1;

            for event in session.events() {
                match event {
                    GameEvent::LifeRestored { .. } => pickups_collected += 1,
                    GameEvent::PlayerHit { .. } => hits_taken += 1,
                    GameEvent::PlayerLost { score, wave } => {
                        log::info!("Game over at wave {} (score {})", wave, score);
                    }
                    _ => {}
                }
            }
        }

        if session.state.lost {
            break;
        }
    }

    let hud = session.hud();
    let summary = RunSummary {
        seed,
        ticks,
        seconds: ticks as f32 * SIM_DT,
        hud,
        pickups_collected,
        hits_taken,
    };
    session.end();

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
