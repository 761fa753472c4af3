//! Command dispatch

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::generate;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_dir, global_config_path, local_config_path, OutputFormat, Settings};
use crate::domain::{LocationRecord, LocationTree};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        Some(Commands::Config { command }) => config_command(command),
        Some(command) => {
            let container = ServiceContainer::new(load_settings(cli)?)?;
            let format = container.settings.format;
            let source = resolve_source(cli, &container.settings)?;
            let service = &container.location_service;

            match command {
                Commands::Children { root } => {
                    print_records(&service.children(&source, root)?, format)
                }
                Commands::Tree { root } => print_trees(&service.tree(&source, root.as_deref())?, format),
                Commands::Leaves { root } => print_records(&service.leaves(&source, root)?, format),
                Commands::Ancestors { id } => {
                    print_records(&service.ancestors(&source, id)?, format)
                }
                Commands::Roots => print_records(&service.roots(&source)?, format),
                Commands::Config { .. } | Commands::Completion { .. } => Ok(()),
            }
        }
        None => Ok(()),
    }
}

fn current_dir() -> CliResult<PathBuf> {
    std::env::current_dir().map_err(|e| InfraError::io("determine working directory", e).into())
}

fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let cwd = current_dir()?;
    let mut settings = Settings::load(Some(cwd.as_path()))?;
    if let Some(format) = cli.format {
        settings.format = format;
    }
    debug!("settings: {:?}", settings);
    Ok(settings)
}

/// `--file` wins over the configured source.
fn resolve_source(cli: &Cli, settings: &Settings) -> CliResult<PathBuf> {
    cli.file
        .clone()
        .or_else(|| settings.locations.clone())
        .ok_or_else(|| {
            CliError::Usage(
                "no location source: pass --file or set `locations` in .loctree.toml".to_string(),
            )
        })
}

fn print_records(records: &[LocationRecord], format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Text => {
            for record in records {
                output::info(&format!(
                    "{}\t{}",
                    record.id,
                    record.name.as_deref().unwrap_or_default()
                ));
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(records).map_err(InfraError::from)?;
            output::info(&json);
        }
    }
    Ok(())
}

/// Nested JSON view of a tree node.
///
/// The record stays under its own key, so record fields such as a `children`
/// extension never clash with the nesting.
#[derive(Serialize)]
struct TreeView<'a> {
    location: &'a LocationRecord,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<TreeView<'a>>,
}

fn tree_view(tree: &LocationTree) -> Option<TreeView<'_>> {
    fn view(tree: &LocationTree, idx: generational_arena::Index) -> Option<TreeView<'_>> {
        let node = tree.get_node(idx)?;
        Some(TreeView {
            location: &node.data,
            children: node
                .children
                .iter()
                .filter_map(|&child| view(tree, child))
                .collect(),
        })
    }
    view(tree, tree.root()?)
}

fn print_trees(trees: &[LocationTree], format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Text => {
            for tree in trees {
                output::info(&tree.to_tree_string());
            }
        }
        OutputFormat::Json => {
            let views: Vec<_> = trees.iter().filter_map(tree_view).collect();
            let json = serde_json::to_string_pretty(&views).map_err(InfraError::from)?;
            output::info(&json);
        }
    }
    Ok(())
}

#[instrument]
fn config_command(command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let cwd = current_dir()?;
            let settings = Settings::load(Some(cwd.as_path()))?;
            output::info(&settings.to_toml()?);
            Ok(())
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::action("global", &path.display()),
                None => output::warning("no global config directory on this platform"),
            }
            output::action("local", &local_config_path(&current_dir()?).display());
            Ok(())
        }
        ConfigCommands::Init { global } => {
            let path = if *global {
                global_config_path().ok_or_else(|| {
                    CliError::Usage("no global config directory on this platform".to_string())
                })?
            } else {
                local_config_path(&current_dir()?)
            };
            init_config(&RealFileSystem, &path, *global)
        }
    }
}

fn init_config(fs: &dyn FileSystem, path: &Path, global: bool) -> CliResult<()> {
    if fs.exists(path) {
        return Err(CliError::Usage(format!(
            "config already exists: {}",
            path.display()
        )));
    }
    if global {
        if let Some(dir) = global_config_dir() {
            fs.create_dir_all(&dir)
                .map_err(|e| InfraError::io(format!("create {}", dir.display()), e))?;
        }
    }
    fs.write(path, &Settings::template())
        .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
    output::action("Created", &path.display());
    Ok(())
}
