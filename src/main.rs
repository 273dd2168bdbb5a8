//! Chrono Misfire entry point
//!
//! Natively this is a headless runner: it plays one session with the
//! autopilot and prints a summary, which is how balance changes get
//! soak-tested without a renderer.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use anyhow::{Context, Result, anyhow};
    use clap::Parser;
    use serde::Serialize;

    use chrono_misfire::autopilot::Autopilot;
    use chrono_misfire::consts::DEFAULT_TICK_MS;
    use chrono_misfire::sim::{GameEvent, GamePhase, LossCause, SessionStats, TickInput};
    use chrono_misfire::{Director, Tuning};

    #[derive(Parser, Debug)]
    #[command(name = "chrono-misfire")]
    #[command(about = "Headless Chrono Misfire session driven by an autopilot")]
    struct Args {
        /// Preset: arena, runner or runner-gates
        #[arg(long, default_value = "arena")]
        mode: String,
        /// RNG seed (defaults to the clock)
        #[arg(long)]
        seed: Option<u64>,
        /// JSON tuning file; overrides --mode
        #[arg(long)]
        config: Option<PathBuf>,
        /// Chance each autopilot shot is aimed true
        #[arg(long, default_value_t = 0.8)]
        accuracy: f64,
        /// Give up after this many real seconds
        #[arg(long, default_value_t = 300.0)]
        max_seconds: f32,
        /// Frame delta fed to every tick
        #[arg(long, default_value_t = DEFAULT_TICK_MS)]
        tick_ms: f32,
        /// Print the summary as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    }

    #[derive(Debug, Serialize)]
    struct RunSummary {
        mode: String,
        seed: u64,
        outcome: GamePhase,
        loss_cause: Option<LossCause>,
        survived_secs: f32,
        real_secs: f32,
        ticks: u64,
        final_scale: f32,
        wave: u8,
        best_combo: u32,
        accuracy: f32,
        stats: SessionStats,
    }

    fn load_tuning(args: &Args) -> Result<(String, Tuning)> {
        match &args.config {
            Some(path) => {
                let json = fs::read_to_string(path)
                    .with_context(|| format!("reading tuning file {}", path.display()))?;
                let tuning = Tuning::from_json(&json)
                    .with_context(|| format!("loading tuning file {}", path.display()))?;
                Ok((path.display().to_string(), tuning))
            }
            None => {
                let tuning = Tuning::preset(&args.mode)
                    .with_context(|| format!("selecting mode '{}'", args.mode))?;
                Ok((args.mode.clone(), tuning))
            }
        }
    }

    fn clock_seed() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    }

    fn log_event(event: &GameEvent) {
        match event {
            GameEvent::ShotFired { .. } => log::trace!("{event:?}"),
            GameEvent::Won | GameEvent::Lost { .. } | GameEvent::WaveChanged { .. } => {
                log::info!("{event:?}")
            }
            _ => log::debug!("{event:?}"),
        }
    }

    pub fn run() -> Result<()> {
        let args = Args::parse();
        if args.tick_ms.is_nan() || args.tick_ms <= 0.0 {
            return Err(anyhow!("--tick-ms must be > 0"));
        }
        if !(0.0..=1.0).contains(&args.accuracy) {
            return Err(anyhow!("--accuracy must be within [0, 1]"));
        }

        let (mode, tuning) = load_tuning(&args)?;
        let seed = args.seed.unwrap_or_else(clock_seed);
        log::info!("Chrono Misfire (native) starting: mode {mode}, seed {seed}");

        let mut director = Director::new(tuning, seed).context("validating tuning")?;
        let mut pilot = Autopilot::new(seed, args.accuracy);

        // Menu click
        director.update(
            &TickInput {
                fire: true,
                ..Default::default()
            },
            args.tick_ms,
        );

        let max_ticks = (args.max_seconds * 1000.0 / args.tick_ms).ceil() as u64;
        let mut real_ms = 0.0f32;
        for _ in 0..max_ticks {
            let Some(state) = director.game() else {
                break;
            };
            if !state.is_playing() {
                break;
            }
            let input = pilot.next_input(state, args.tick_ms);
            director.update(&input, args.tick_ms);
            real_ms += args.tick_ms;

            if let Some(state) = director.game_mut() {
                for event in state.drain_events() {
                    log_event(&event);
                }
            }
        }

        let state = director
            .game()
            .ok_or_else(|| anyhow!("session ended without a game scene"))?;
        if state.is_playing() {
            log::warn!("Stopped after {:.0}s of real time", args.max_seconds);
        }

        let summary = RunSummary {
            mode,
            seed: state.seed,
            outcome: state.phase,
            loss_cause: state.loss_cause,
            survived_secs: state.elapsed_secs,
            real_secs: real_ms / 1000.0,
            ticks: state.time_ticks,
            final_scale: state.scale().value(),
            wave: state.wave.number(),
            best_combo: state.combo.best(),
            accuracy: state.stats.accuracy(),
            stats: state.stats,
        };

        if args.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            println!("{} ({})", summary.outcome_label(), summary.mode);
            println!(
                "  survived  {:.1}s scaled / {:.1}s real",
                summary.survived_secs, summary.real_secs
            );
            println!("  scale     {:.2}x", summary.final_scale);
            println!("  wave      {}", summary.wave);
            println!("  combo     best {}", summary.best_combo);
            println!(
                "  shots     {} fired, {} correct, {} wrong, {} missed ({:.0}% accurate)",
                summary.stats.shots_fired,
                summary.stats.correct_hits,
                summary.stats.wrong_hits,
                summary.stats.misses,
                summary.accuracy * 100.0
            );
            if summary.stats.gates_opened > 0 {
                println!("  gates     {} opened", summary.stats.gates_opened);
            }
        }
        Ok(())
    }

    impl RunSummary {
        fn outcome_label(&self) -> String {
            match (self.outcome, self.loss_cause) {
                (GamePhase::Won, _) => "WON".to_string(),
                (GamePhase::Lost, Some(LossCause::GateCrash)) => {
                    "LOST: crashed into a gate".to_string()
                }
                (GamePhase::Lost, _) => "LOST: time overload".to_string(),
                (GamePhase::Playing, _) => "UNFINISHED".to_string(),
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    env_logger::init();
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is the web surface; nothing to run here
}
