use eframe::NativeOptions;

use wunderwheel::{
    app::PersistState,
    config::{EnvConfig, WheelConfig},
    logger::init_logger,
    widgets::WheelState,
    App,
};

fn main() -> anyhow::Result<()> {
    simple_env_load::load_env_from([".dev.env"]);

    let log_records = init_logger(log::LevelFilter::Debug)?;

    let env = EnvConfig::load_from_env()?;
    let mut config = match &env.wheel_config {
        Some(path) => WheelConfig::load(path)?,
        None => WheelConfig::demo(),
    };
    if env.seed.is_some() {
        config.seed = env.seed;
    }

    // the painter scales the wheel to fit, so a unit radius is enough
    let options = config.into_options(1.0)?;
    let wheel = WheelState::new(options)?;
    log::info!("loaded a wheel with {} items", wheel.items().len());

    eframe::run_native(
        "WunderWheel",
        NativeOptions::default(),
        Box::new(move |cc| {
            let persist = cc
                .storage
                .and_then(PersistState::load)
                .unwrap_or_default();

            cc.egui_ctx.set_pixels_per_point(persist.pixels_per_point);

            Box::new(App::new(wheel, Some(log_records), persist))
        }),
    );

    Ok(())
}
