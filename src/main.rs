//! Gold Sweeper entry point
//!
//! The browser build is driven through the library's wasm bindings. Natively
//! this runs a headless gold digger session that launches the hook whenever
//! it is idle, handy for watching the simulation through the logs.

#[cfg(not(target_arch = "wasm32"))]
#[derive(clap::Parser, Debug)]
#[clap(about = "Headless gold digger session")]
struct Opt {
    /// Map seed
    #[clap(default_value_t = 42)]
    seed: u64,
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;

    env_logger::init();
    let opt = Opt::parse();
    log::info!("Gold Sweeper (native) starting with seed {}", opt.seed);

    autoplay::run(opt.seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is the library's `start`, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod autoplay {
    use gold_sweeper::sim::{GameEvent, GameMap, HookStatus, Hud, Player};

    /// Simulated frame length (60 fps)
    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Stop after ten simulated minutes even if the game is still going
    const MAX_FRAMES: u32 = 60 * 60 * 10;

    pub fn run(seed: u64) {
        let mut now = 0.0;
        let mut map = GameMap::new(seed, now);
        let mut player = Player::new();
        let mut hud = Hud::default();
        map.drain_events();

        let mut frames = 0;
        while !map.is_game_over && frames < MAX_FRAMES {
            if map.hook().is_some_and(|hook| hook.status == HookStatus::Idle) {
                map.launch_hook();
            }

            now += FRAME_MS;
            map.frame(&mut player, &mut hud, now);
            frames += 1;

            for event in map.drain_events() {
                match event {
                    GameEvent::ItemDelivered { kind, score } => {
                        log::info!("Delivered {:?} for {} (score {})", kind, score, player.score)
                    }
                    GameEvent::LevelCompleted { level } => {
                        log::info!("Level {} done at {:.1}s", level, now / 1000.0)
                    }
                    GameEvent::GameOver { level, score } => {
                        log::info!("Game over on level {} with {} points", level, score)
                    }
                    other => log::debug!("{:?}", other),
                }
            }
        }

        println!(
            "Seed {}: reached level {} with {} points after {} frames",
            seed, hud.level, player.score, frames
        );
    }
}
