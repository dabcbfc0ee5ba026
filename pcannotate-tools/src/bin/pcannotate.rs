use anyhow::{Context, Result};
use clap::Parser;
use pcannotate_session::AnnotationSession;
use pcannotate_tools::{init_logging, AnnotateArgs};
use pcannotate_visualization::{ViewerConfig, WindowDisplay};

fn main() -> Result<()> {
    init_logging();
    let args = AnnotateArgs::parse();

    let key_map = args.key_map().context("invalid --key binding")?;
    log::info!("Keys: {}", key_map);

    let source = args.source();
    source.check_readable()?;

    let mut session = AnnotationSession::start(&args.annotation_log, key_map)
        .with_context(|| format!("failed to open {}", args.annotation_log.display()))?
        .with_style(args.style());

    let mut display =
        WindowDisplay::new(ViewerConfig::annotator()).context("failed to open the viewer")?;

    let summary = session
        .run(&source, &mut display)
        .with_context(|| format!("annotation of {} failed", args.data_dir.display()))?;

    if summary.stopped {
        log::info!("Stopped early, {} instances labeled this run", summary.labeled);
    }
    Ok(())
}
