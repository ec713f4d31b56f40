use sonarview::{run_sonarview, SonarConfig};

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match SonarConfig::discover() {
        Ok(cfg) => cfg,
        Err(e) => {
            log::error!("{e}; falling back to defaults");
            SonarConfig::default()
        }
    };
    log::info!(
        "sensor mode {:?}, data dir {}",
        config.sensor.mode,
        config.trials.data_dir.display()
    );

    run_sonarview(config)
}
