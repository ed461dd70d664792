use std::{
    collections::HashMap,
    fs::{self, File},
    io::{BufWriter, Write},
    path::Path,
};

pub use classweave_core::Config;
use classweave_core::{ComposedClassNameRequest, Composer, RenderedView};
use walkdir::WalkDir;

mod internal_prelude {
    pub use crate::errors::*;
    pub use color_eyre::eyre::{bail, eyre};
    pub use tracing::*;
}
use internal_prelude::*;

pub mod errors {
    pub use color_eyre::eyre::Report as Error;
    pub use color_eyre::eyre::Result;
}

pub mod tracing {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    use crate::internal_prelude::*;

    pub fn install_tracing() -> Result<()> {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_level(false)
            .without_time();
        let filter_layer = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new("info,classweave_cli=debug,classweave_core=debug"))?;

        tracing_subscriber::registry()
            .with(filter_layer)
            .with(fmt_layer)
            .init();

        color_eyre::install()?;
        Ok(())
    }
}

/// Keeps the whole context chain of a core error.
pub fn from_anyhow(err: anyhow::Error) -> Error {
    eyre!("{err:#}")
}

pub fn load_config(manifest_dir: &Path) -> Result<Config> {
    classweave_core::load_config(manifest_dir).map_err(from_anyhow)
}

/// Parses `NAME`, `NAME=true` or `NAME=false`.
pub fn parse_flag(input: &str) -> std::result::Result<(String, bool), String> {
    let (name, enabled) = match input.split_once('=') {
        Some((name, value)) => {
            let enabled = value
                .parse::<bool>()
                .map_err(|_| format!("`{value}` is not true or false"))?;
            (name, enabled)
        }
        None => (input, true),
    };
    if name.is_empty() {
        return Err("flag name can't be empty".to_owned());
    }
    Ok((name.to_owned(), enabled))
}

pub fn compose(
    config: &Config,
    base_class: &str,
    location: Option<&str>,
    extra: Option<&str>,
    flags: &[(String, bool)],
) -> Result<String> {
    let mut request = ComposedClassNameRequest::new(base_class).maybe_location(location);
    if let Some(extra) = extra {
        request = request.extra(extra);
    }
    for (name, enabled) in flags {
        request = request.flag(name.as_str(), *enabled);
    }
    debug!(?request, "Composing");

    Ok(Composer::from_config(config).compose(&request)?)
}

/// Whether `path` ends with one of the configured view extensions.
pub fn is_view_file(path: &Path, extensions: &[String]) -> bool {
    let path = path.to_string_lossy();
    extensions.iter().any(|ext| path.ends_with(ext.as_str()))
}

pub fn run(manifest_dir: &Path, config: &Config) -> Result<()> {
    info!("Running classweave");

    let mut rendered_views = Vec::new();

    for folder in &config.folders {
        for (entry, meta) in WalkDir::new(manifest_dir.join(folder))
            .into_iter()
            .filter_map(|e| e.ok())
            .filter_map(|entry| entry.metadata().ok().map(|meta| (entry, meta)))
        {
            if meta.is_file() && is_view_file(entry.path(), &config.extensions) {
                info!("Processing: {}", entry.path().display());
                rendered_views.push(
                    classweave_core::load_and_render_view(entry.path(), config)
                        .map_err(from_anyhow)?,
                );
            }
        }
    }

    // sort by (filename, path)
    rendered_views.sort_unstable_by(|a, b| {
        (a.path.file_name(), &a.path).cmp(&(b.path.file_name(), &b.path))
    });

    // Nothing is written when two views would share an output file.
    let html_files = match &config.output_dir {
        Some(_) => html_file_names(&rendered_views, &config.extensions)?,
        None => Vec::new(),
    };

    if let Some(output_file) = &config.output_file {
        if let Some(parent) = output_file.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = BufWriter::new(File::create(output_file)?);

        file.write_all(
            rendered_views
                .iter()
                .map(|r| r.contents.as_ref())
                .collect::<Vec<_>>()
                .join("\n")
                .as_bytes(),
        )?;
        file.flush()?;
    }

    if let Some(output_dir) = &config.output_dir {
        let output_dir = output_dir.join("classweave");
        fs::create_dir_all(&output_dir)?;

        let entries = fs::read_dir(&output_dir)?;

        for entry in entries {
            let entry = entry?;
            let file_type = entry.file_type()?;

            if file_type.is_file() {
                fs::remove_file(entry.path())?;
            }
        }

        for (file_name, view) in html_files.iter().zip(&rendered_views) {
            let mut file = BufWriter::new(File::create(output_dir.join(file_name))?);
            file.write_all(view.contents.as_bytes())?;
            file.flush()?;
        }
    }

    Ok(())
}

/// The output file name of every view, in order, failing when two views
/// map to the same name.
fn html_file_names(views: &[RenderedView], extensions: &[String]) -> Result<Vec<String>> {
    let mut seen = HashMap::new();
    let mut file_names = Vec::with_capacity(views.len());
    for view in views {
        let file_name = html_file_name(view, extensions)?;
        if let Some(previous) = seen.insert(file_name.clone(), &view.path) {
            bail!(
                "The following views would both be written to {file_name}:\n{}\n{}",
                previous.display(),
                view.path.display()
            );
        }
        file_names.push(file_name);
    }
    Ok(file_names)
}

/// `views/main.view.json` becomes `main.html`.
fn html_file_name(view: &RenderedView, extensions: &[String]) -> Result<String> {
    let file_name = view
        .path
        .file_name()
        .ok_or_else(|| eyre!("{} should be a file", view.path.display()))?
        .to_string_lossy();

    let stem = extensions
        .iter()
        .find_map(|ext| file_name.strip_suffix(ext.as_str()))
        .unwrap_or(file_name.as_ref());

    Ok(format!("{stem}.html"))
}
