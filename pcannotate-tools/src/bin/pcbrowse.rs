use anyhow::{Context, Result};
use clap::Parser;
use pcannotate_session::BrowsingSession;
use pcannotate_tools::{init_logging, BrowseArgs};
use pcannotate_visualization::{ViewerConfig, WindowDisplay};

fn main() -> Result<()> {
    init_logging();
    let args = BrowseArgs::parse();

    let key_map = args.key_map().context("invalid --key binding")?;
    let instances = args
        .registry()
        .decode(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;

    if instances.is_empty() {
        log::warn!("{} holds no samples", args.file.display());
        return Ok(());
    }

    let mut display =
        WindowDisplay::new(ViewerConfig::browser()).context("failed to open the viewer")?;
    BrowsingSession::new(instances)
        .with_style(args.style())
        .run(&mut display, &key_map)?;
    Ok(())
}
