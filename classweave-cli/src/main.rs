use std::{path::PathBuf, sync::Arc, time::Duration};

use classweave_cli::{compose, errors::Result, is_view_file, load_config, parse_flag, run, Config};
use clap::{Args, Parser, Subcommand};
use notify::{Event, RecursiveMode, Watcher};
use tokio::{
    sync::{mpsc, watch},
    task::spawn_blocking,
};
use tokio_stream::{
    wrappers::{ReceiverStream, UnboundedReceiverStream},
    Stream, StreamExt,
};
use tracing::{debug, error, info};

const SETTLE_TIME: Duration = Duration::from_millis(50);

#[derive(Parser)]
#[command(author, version, about, long_about = None, arg_required_else_help = true)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the class attribute composed from a base class, a location and extra classes
    Compose(ComposeArgs),
    /// Render the view files of a crate to html
    Render(RenderArgs),
}

#[derive(Args)]
struct ComposeArgs {
    /// The base class, always emitted first
    base_class: String,

    /// Adds the location-suffixed class, e.g. `toolbar--top`
    #[arg(short, long)]
    location: Option<String>,

    /// Extra classes appended verbatim
    #[arg(short, long, conflicts_with = "flag")]
    extra: Option<String>,

    /// An extra class toggled on or off: `NAME`, `NAME=true` or `NAME=false`
    #[arg(long, value_parser = parse_flag)]
    flag: Vec<(String, bool)>,

    /// Read the modifier pattern from this crate's Cargo.toml
    #[arg(long)]
    manifest_dir: Option<PathBuf>,
}

#[derive(Args)]
struct RenderArgs {
    /// The path where your crate's Cargo toml is located
    manifest_dir: PathBuf,

    /// Generate a file with all rendered views concatenated
    #[arg(long)]
    output_file: Option<PathBuf>,

    /// Generate a "classweave" directory in this path with one html file per view
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// The folders in your crate where classweave will look for view files
    ///
    /// The paths are relative to the manifest_dir and must not land outside of manifest_dir.
    #[arg(short, long, num_args(1))]
    folder: Vec<PathBuf>,

    /// Watch the filesystem for changes to the view files
    #[arg(short, long)]
    watch: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    classweave_cli::tracing::install_tracing()?;

    let cli = Cli::parse();

    match cli.command {
        Command::Compose(args) => {
            let config = match &args.manifest_dir {
                Some(manifest_dir) => load_config(manifest_dir)?,
                None => Config::default(),
            };
            let class_name = compose(
                &config,
                &args.base_class,
                args.location.as_deref(),
                args.extra.as_deref(),
                &args.flag,
            )?;
            println!("{class_name}");
        }
        Command::Render(args) => {
            let run_config = make_run_config(&args).await?;

            run_once(&run_config)?;

            if args.watch {
                watch_and_render(args, run_config).await?;
            }
        }
    }

    Ok(())
}

struct RunConfig {
    manifest_dir: PathBuf,
    config: Config,
}

async fn make_run_config(args: &RenderArgs) -> Result<RunConfig> {
    let manifest_dir = args.manifest_dir.clone();
    let mut config = spawn_blocking(move || load_config(&manifest_dir)).await??;

    config.output_file = args.output_file.clone().or_else(|| {
        config
            .output_file
            .as_ref()
            .map(|p| args.manifest_dir.join(p))
    });

    config.output_dir = args.output_dir.clone().or_else(|| {
        config
            .output_dir
            .as_ref()
            .map(|p| args.manifest_dir.join(p))
    });

    if !args.folder.is_empty() {
        config.folders.clone_from(&args.folder);
    }

    Ok(RunConfig {
        manifest_dir: args.manifest_dir.clone(),
        config,
    })
}

fn run_once(run_config: &RunConfig) -> Result<()> {
    run(&run_config.manifest_dir, &run_config.config)
}

/// Forwards every path notify reports under `paths` until the receiver is
/// dropped.
fn watch_paths(paths: &[PathBuf], mode: RecursiveMode) -> Result<mpsc::UnboundedReceiver<PathBuf>> {
    let (paths_tx, paths_rx) = mpsc::unbounded_channel();
    let mut watcher = notify::recommended_watcher({
        let paths_tx = paths_tx.clone();
        move |event: notify::Result<Event>| {
            let Ok(event) = event else { return };
            for path in event.paths {
                if paths_tx.send(path).is_err() {
                    break;
                }
            }
        }
    })?;

    for path in paths {
        watcher.watch(path, mode)?;
    }

    tokio::spawn(async move {
        paths_tx.closed().await;
        drop(watcher);
    });

    Ok(paths_rx)
}

/// Waits for an item, then until the stream has been quiet for
/// [`SETTLE_TIME`]. `None` once the stream ends.
async fn settle<S: Stream + Unpin>(stream: &mut S) -> Option<()> {
    stream.next().await?;
    while let Ok(item) = tokio::time::timeout(SETTLE_TIME, stream.next()).await {
        item?;
    }
    Some(())
}

/// Reloads the configuration whenever the crate's Cargo.toml changes.
fn spawn_config_reloader(
    args: RenderArgs,
    config_tx: watch::Sender<Arc<RunConfig>>,
) -> Result<()> {
    let manifest_file = args.manifest_dir.join("Cargo.toml").canonicalize()?;
    let mut changes = UnboundedReceiverStream::new(watch_paths(
        &[manifest_file],
        RecursiveMode::NonRecursive,
    )?);

    tokio::spawn(async move {
        while settle(&mut changes).await.is_some() {
            match make_run_config(&args).await {
                Ok(run_config) => {
                    info!("Reloaded configuration");
                    if config_tx.send(Arc::new(run_config)).is_err() {
                        break;
                    }
                }
                Err(err) => error!("{err}"),
            }
        }
    });

    Ok(())
}

/// Renders with the latest configuration each time a request settles.
fn spawn_renderer(config_rx: watch::Receiver<Arc<RunConfig>>) -> mpsc::Sender<()> {
    let (render_tx, render_rx) = mpsc::channel(1);

    tokio::spawn(async move {
        let mut requests = ReceiverStream::new(render_rx);
        while settle(&mut requests).await.is_some() {
            let run_config = config_rx.borrow().clone();
            match spawn_blocking(move || run_once(&run_config)).await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => error!("{err}"),
                Err(err) => error!("Render task failed: {err}"),
            }
        }
    });

    render_tx
}

async fn next_view_change(paths: &mut mpsc::UnboundedReceiver<PathBuf>, extensions: &[String]) {
    while let Some(path) = paths.recv().await {
        if is_view_file(&path, extensions) {
            debug!("Changed: {}", path.display());
            return;
        }
    }
}

async fn watch_and_render(args: RenderArgs, run_config: RunConfig) -> Result<()> {
    let (config_tx, mut config_rx) = watch::channel(Arc::new(run_config));
    spawn_config_reloader(args, config_tx)?;
    let render_tx = spawn_renderer(config_rx.clone());

    loop {
        let run_config = config_rx.borrow_and_update().clone();
        let folders = run_config
            .config
            .folders
            .iter()
            .map(|folder| run_config.manifest_dir.join(folder))
            .collect::<Vec<_>>();
        // Recreated on every pass so that edited `folders` take effect.
        let mut changed_paths = watch_paths(&folders, RecursiveMode::Recursive)?;

        tokio::select! {
            _ = next_view_change(&mut changed_paths, &run_config.config.extensions) => {}
            changed = config_rx.changed() => changed?,
        }

        // A full request queue already covers this change.
        let _ = render_tx.try_send(());
    }
}
