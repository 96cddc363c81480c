use choropleth::cli::Cli;
use choropleth::config::RenderConfig;
use choropleth::render;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse_or_exit();

    let config = match &cli.config {
        Some(path) => RenderConfig::load_from_file(path)?,
        None => RenderConfig::default(),
    };

    render::render_map(&cli, &config)?;

    Ok(())
}
