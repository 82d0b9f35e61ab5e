use clap::Parser;
use quill::{Config, cli::Cli, init_tracing, run};
use tracing::info;

fn main() -> anyhow::Result<()> {
    // A missing .env is fine
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::load_with_path(cli.config.as_deref())?;
    config.validate()?;
    init_tracing(&config);

    match Config::source_path(cli.config.as_deref()) {
        Some(path) => info!("Loaded config from: {}", path.display()),
        None => info!("No config file found, using defaults"),
    }

    let worker_threads = config.general.worker_threads;

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();

    if worker_threads > 0 {
        builder.worker_threads(worker_threads);
    }

    let runtime = builder.build()?;
    runtime.block_on(run(cli, config))
}
