mod compose;
mod join;
mod modifier_pattern;
mod render;
mod request;

use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::{bail, Context};
use serde::Deserialize;

pub use compose::{compose, ComposeError, Composer};
pub use join::{JoinClasses, NormalizedClass};
pub use modifier_pattern::{ModifierPattern, PatternError};
pub use render::{Container, HtmlSink, Node, RenderError, RenderSink, TreeSink, TOOLBAR_CLASS};
pub use request::{ComposedClassNameRequest, ExtraClassSpec};

fn default_extensions() -> Vec<String> {
    vec![".view.json".to_owned()]
}

fn default_folders() -> Vec<PathBuf> {
    vec![PathBuf::from_str("./views/").expect("path is valid")]
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub output_file: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    #[serde(default = "default_folders")]
    pub folders: Vec<PathBuf>,
    #[serde(default)]
    pub modifier_pattern: ModifierPattern,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_file: None,
            output_dir: None,
            extensions: default_extensions(),
            folders: default_folders(),
            modifier_pattern: Default::default(),
        }
    }
}

#[derive(Deserialize)]
pub struct CargoToml {
    package: Option<CargoTomlPackage>,
}

#[derive(Deserialize)]
pub struct CargoTomlPackage {
    metadata: Option<CargoTomlPackageMetadata>,
}

#[derive(Deserialize)]
pub struct CargoTomlPackageMetadata {
    classweave: Option<Config>,
}

/// Reads `[package.metadata.classweave]` from the crate's Cargo.toml,
/// falling back to defaults when the section is missing.
pub fn load_config(manifest_dir: &Path) -> anyhow::Result<Config> {
    let cargo_toml_contents =
        fs::read_to_string(manifest_dir.join("Cargo.toml")).context("Failed to read Cargo.toml")?;
    parse_config(&cargo_toml_contents)
}

pub fn parse_config(cargo_toml_contents: &str) -> anyhow::Result<Config> {
    let cargo_toml: CargoToml = toml::from_str(cargo_toml_contents)?;

    let config = match cargo_toml.package {
        Some(CargoTomlPackage {
            metadata:
                Some(CargoTomlPackageMetadata {
                    classweave: Some(config),
                }),
        }) => config,
        _ => Config::default(),
    };

    if config.extensions.iter().any(|e| e.is_empty()) {
        bail!("Classweave config extensions can't be empty strings");
    }

    Ok(config)
}

/// Parses a view file: one container object or an array of them.
pub fn parse_view(contents: &str) -> anyhow::Result<Vec<Container>> {
    let value: serde_json::Value = serde_json::from_str(contents).context("Invalid JSON")?;
    let containers = if value.is_array() {
        serde_json::from_value(value)?
    } else {
        vec![serde_json::from_value(value)?]
    };
    Ok(containers)
}

pub struct RenderedView {
    pub path: PathBuf,
    pub contents: String,
}

pub fn load_and_render_view(view_file: &Path, config: &Config) -> anyhow::Result<RenderedView> {
    let view_contents = fs::read_to_string(view_file)
        .with_context(|| format!("Failed to read {}", view_file.display()))?;

    let containers = parse_view(&view_contents)
        .with_context(|| format!("Failed to parse {}", view_file.display()))?;

    let composer = Composer::from_config(config);
    let mut sink = HtmlSink::new();
    for container in &containers {
        container
            .render_with(&composer, &mut sink)
            .with_context(|| format!("Failed to render {}", view_file.display()))?;
        sink.text("\n")?;
    }

    Ok(RenderedView {
        path: view_file.to_owned(),
        contents: sink.finish()?,
    })
}

pub struct BlockClass {
    pub location: String,
    pub class_name: String,
}

/// The modifier class of `base_class` for every location, in order.
pub fn get_block_classes(
    base_class: &str,
    locations: &[String],
    config: &Config,
) -> anyhow::Result<Vec<BlockClass>> {
    let base_class = compose::check_base_class(base_class)?;
    let composer = Composer::from_config(config);

    let mut seen = HashSet::new();
    locations
        .iter()
        .map(|location| -> anyhow::Result<BlockClass> {
            if !seen.insert(location.as_str()) {
                bail!("Location `{location}` is listed more than once");
            }
            Ok(BlockClass {
                location: location.clone(),
                class_name: composer.modifier_class(base_class, location)?,
            })
        })
        .collect()
}
