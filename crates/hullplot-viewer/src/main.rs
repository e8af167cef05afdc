mod app;
mod cli;

use anyhow::Context;
use winit::dpi::LogicalSize;

use hullplot_engine::Dataset;
use hullplot_engine::logging::{LoggingConfig, init_logging};
use hullplot_engine::window::{Runtime, RuntimeConfig};

use crate::app::{ViewerApp, ViewerConfig};

fn main() -> anyhow::Result<()> {
    let args = cli::parse();

    init_logging(match &args.log_filter {
        Some(filter) => LoggingConfig::with_filter(filter.clone()),
        None => LoggingConfig::default(),
    });

    let dataset = Dataset::load(&args.file)
        .with_context(|| format!("failed to load dataset {}", args.file.display()))?;

    let title = match args.file.file_name() {
        Some(name) => format!("hullplot - {}", name.to_string_lossy()),
        None => "hullplot".to_string(),
    };

    let runtime = RuntimeConfig {
        title,
        initial_size: LogicalSize::new(args.width, args.height),
    };

    let gpu_init = args.gpu_init();
    let app = ViewerApp::new(dataset, ViewerConfig::from(&args));
    Runtime::run(runtime, gpu_init, app)
}
