use std::time::Duration;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use aerosight_app::FleetController;
use aerosight_core::enums::StrategyKind;
use aerosight_sim::fleet_setup::{generate_fleet, DEFAULT_AREA_CENTER};
use aerosight_sim::SimConfig;

const FLEET_SIZE: usize = 12;
const DEMO_TICK_PERIOD: Duration = Duration::from_millis(200);
const TICKS_PER_STRATEGY: u32 = 10;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = SimConfig {
        tick_period: DEMO_TICK_PERIOD,
        ..Default::default()
    };
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let units = generate_fleet(&mut rng, FLEET_SIZE, DEFAULT_AREA_CENTER);

    let controller = FleetController::new(config, units)?;
    if let Some(first) = controller.snapshot()?.units.first() {
        controller.select(&first.id)?;
    }
    controller.start()?;

    for strategy in StrategyKind::ALL {
        controller.set_strategy(strategy)?;
        info!(%strategy, "running {}", strategy.name());
        std::thread::sleep(DEMO_TICK_PERIOD * TICKS_PER_STRATEGY);

        let snapshot = controller.snapshot()?;
        info!(
            tick = snapshot.time.tick,
            summary = %serde_json::to_string(&snapshot.summary)?,
            "fleet status"
        );
    }

    controller.stop()?;
    let snapshot = controller.snapshot()?;
    println!("{}", serde_json::to_string_pretty(&*snapshot)?);
    controller.dispose();
    Ok(())
}
