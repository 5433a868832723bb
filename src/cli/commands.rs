//! Command implementations

use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::application::{GridRow, TreeGrid};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{validate, GridColumn, Row, RowIndex};
use crate::infrastructure::load_rows;
use crate::tree_traits::TermTreeConvert;

/// Execute the parsed CLI command.
pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Show {
            file,
            expand,
            expand_all,
            depth,
            reveal,
        }) => cmd_show(file, expand, *expand_all, *depth, reveal, cli.verbose),
        Some(Commands::Tree { file }) => cmd_tree(file),
        Some(Commands::Check { file }) => cmd_check(file),
        Some(Commands::Config { command }) => cmd_config(command),
        Some(Commands::Completion { shell }) => cmd_completion(*shell),
        None => Err(CliError::InvalidArgs(
            "no command given, see --help".to_string(),
        )),
    }
}

/// Settings with the row file's directory as local config location, plus the rows.
fn load(file: &Path) -> CliResult<(Settings, Vec<Row>)> {
    let settings = Settings::load(file.parent())?;
    let rows = load_rows(file)?;
    debug!(rows = rows.len(), ?settings, "loaded");
    Ok((settings, rows))
}

#[instrument(skip(expand, reveal))]
fn cmd_show(
    file: &Path,
    expand: &[String],
    expand_all: bool,
    depth: Option<usize>,
    reveal: &[String],
    verbose: bool,
) -> CliResult<()> {
    let (settings, rows) = load(file)?;
    let mut grid = TreeGrid::from_settings(&settings);

    if expand_all {
        grid.expand_all(&rows);
    } else {
        grid.expand_to_level(&rows, depth.unwrap_or(settings.default_depth));
    }
    for id in reveal {
        grid.reveal(&rows, id)?;
    }
    for id in expand {
        if !grid.on_toggle_click(&rows, id).is_handled() {
            output::warning(&format!("{id}: nothing to expand, toggle ignored"));
        }
    }

    let fields: Vec<String> = if settings.columns.is_empty() {
        rows.first()
            .map(|row| row.fields.keys().cloned().collect())
            .unwrap_or_default()
    } else {
        settings.columns.clone()
    };
    let view = grid.view(&rows, fields);

    print_table(&view.columns, &view.rows);

    if verbose {
        output::detail(&format!(
            "{} of {} rows visible, expanded: {}",
            view.len(),
            rows.len(),
            grid.expansion()
        ));
        for issue in &view.issues {
            output::warning(issue);
        }
    }
    Ok(())
}

/// Tree column (toggle + id) followed by the domain fields, padded to width.
fn print_table(columns: &[GridColumn<String>], rows: &[GridRow<'_, Row>]) {
    let headers: Vec<&str> = columns
        .iter()
        .map(|c| match c {
            GridColumn::Toggle(_) => "id",
            GridColumn::Domain(name) => name.as_str(),
        })
        .collect();

    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|r| {
            columns
                .iter()
                .map(|c| match c {
                    GridColumn::Toggle(_) => format!("{}{}", r.toggle.render(), r.flat.row.id),
                    GridColumn::Domain(name) => r.flat.row.field_display(name).unwrap_or_default(),
                })
                .collect()
        })
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            cells
                .iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(h.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    output::header(
        &headers
            .iter()
            .zip(&widths)
            .map(|(h, w)| format!("{h:<w$}"))
            .join("  "),
    );
    for (row, line) in rows.iter().zip(&cells) {
        let padded = line
            .iter()
            .zip(&widths)
            .map(|(cell, w)| pad(cell, *w))
            .join("  ");
        output::info(&output::styled_cell(padded.trim_end(), row.category));
    }
}

/// Left-align by character count (glyphs are multi-byte).
fn pad(cell: &str, width: usize) -> String {
    let len = cell.chars().count();
    format!("{}{}", cell, " ".repeat(width.saturating_sub(len)))
}

#[instrument]
fn cmd_tree(file: &Path) -> CliResult<()> {
    let (settings, rows) = load(file)?;
    let index = RowIndex::with_policy(&rows, settings.orphan_policy);
    for tree in index.to_term_trees() {
        output::info(&tree);
    }
    output::detail(&format!(
        "{} rows, depth {}, {} leaves",
        index.len(),
        index.depth(),
        index.leaf_ids().len()
    ));
    Ok(())
}

#[instrument]
fn cmd_check(file: &Path) -> CliResult<()> {
    let (settings, rows) = load(file)?;
    let issues = validate(&rows, settings.orphan_policy);
    if issues.is_empty() {
        output::success(&format!("{}: {} rows, no issues", file.display(), rows.len()));
        return Ok(());
    }
    output::header(&format!("{}: {} issue(s)", file.display(), issues.len()));
    for issue in &issues {
        output::failure(issue);
    }
    Err(CliError::Issues(issues.len()))
}

fn cmd_config(command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show { dir } => {
            let settings = Settings::load(dir.as_deref())?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Template => output::info(&Settings::template()),
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::info(&format!("global: {}", path.display())),
                None => output::warning("no global config directory on this platform"),
            }
            output::info(&format!(
                "local:  {}",
                local_config_path(Path::new("<data_dir>")).display()
            ));
        }
    }
    Ok(())
}

fn cmd_completion(shell: Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
