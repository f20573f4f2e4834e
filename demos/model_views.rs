//! An STL model in four orthographic views. Pass a path to use your own model.

use quadview::{AppConfig, Lab, LoggingConfig};

fn main() -> anyhow::Result<()> {
    quadview::init_logging(LoggingConfig::default());

    let mut config = AppConfig::new().title("Model views").lab(Lab::ModelViews);
    if let Some(path) = std::env::args().nth(1) {
        config = config.model_path(path);
    }

    quadview::run(config)?;
    Ok(())
}
