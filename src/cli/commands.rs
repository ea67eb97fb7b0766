//! Command implementations

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use regex::RegexBuilder;
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::application::services::SelectionSession;
use crate::cli::args::{Cli, Commands, ConfigCommands, EventSpec};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::cli::render::render_forest;
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{
    breadcrumb, breadcrumb_branch, find_duplicate_ids, find_orphans, validate_records, DomainError,
    HierarchyIndex, Record, SelectionEvent, SelectionState,
};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;
use crate::util::path::{expand_path, records_dir};

/// Writes command output to stdout; a closed pipe surfaces as an I/O error.
fn emit(text: &str) -> CliResult<()> {
    write_output(&mut io::stdout().lock(), text)
}

fn write_output(out: &mut impl Write, text: &str) -> CliResult<()> {
    out.write_all(text.as_bytes())
        .and_then(|()| out.flush())
        .map_err(|e| InfraError::io("write output", e).into())
}

/// Execute the CLI command.
pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Tree { records }) => cmd_tree(records),
        Some(Commands::Path {
            records,
            id,
            branch,
        }) => cmd_path(records, id, *branch),
        Some(Commands::Filter {
            records,
            pattern,
            regex,
            lineage,
            case_sensitive,
        }) => cmd_filter(records, pattern, *regex, *lineage, *case_sensitive),
        Some(Commands::Select {
            records,
            events,
            json,
        }) => cmd_select(records, events, *json),
        Some(Commands::Check { records }) => cmd_check(records),
        Some(Commands::Config { command }) => cmd_config(command),
        None => Ok(()),
    }
}

/// Resolve the records path and build the container with settings local to it.
fn container_for(records: &str) -> CliResult<(ServiceContainer, PathBuf)> {
    let path = expand_path(records);
    let settings = Settings::load(Some(records_dir(&path)))?;
    debug!(?settings, "settings loaded");
    Ok((ServiceContainer::new(settings), path))
}

fn node_line(record: &Record, settings: &Settings) -> String {
    match (&record.icon, settings.show_icons) {
        (Some(icon), true) => format!("{} {}", icon, record.display_label()),
        _ => record.display_label(),
    }
}

fn marker_text(state: SelectionState, settings: &Settings) -> &str {
    match state {
        SelectionState::Selected => &settings.markers.selected,
        SelectionState::Indeterminate => &settings.markers.indeterminate,
        SelectionState::Unselected => &settings.markers.unselected,
    }
}

// ============================================================
// Tree commands
// ============================================================

#[instrument]
fn cmd_tree(records: &str) -> CliResult<()> {
    let (container, path) = container_for(records)?;
    let settings = &container.settings;
    let forest = container.records.load_forest(&path, settings.strict)?;

    if forest.is_empty() {
        output::warning(&format!("no trees in {}", path.display()));
        return Ok(());
    }
    debug!(
        nodes = forest.len(),
        depth = forest.depth(),
        leaves = forest.leaf_nodes().len(),
        "forest loaded"
    );
    emit(&render_forest(&forest, |r| node_line(r, settings)))?;
    Ok(())
}

#[instrument]
fn cmd_path(records: &str, id: &str, branch: bool) -> CliResult<()> {
    let (container, path) = container_for(records)?;
    let settings = &container.settings;
    let rows = container.records.load(&path)?;
    let target = id.to_string();

    if branch {
        let forest = breadcrumb_branch(&rows, &target, Record::key, Record::parent_key);
        if forest.is_empty() {
            return Err(DomainError::UnknownId(target).into());
        }
        emit(&render_forest(&forest, |r| node_line(r, settings)))?;
        return Ok(());
    }

    let crumbs = breadcrumb(&rows, &target, Record::key, Record::parent_key);
    if crumbs.is_empty() {
        return Err(DomainError::UnknownId(target).into());
    }
    let line = crumbs
        .iter()
        .map(|r| node_line(r, settings))
        .collect::<Vec<_>>()
        .join(" > ");
    emit(&format!("{line}\n"))
}

#[instrument]
fn cmd_filter(
    records: &str,
    pattern: &str,
    regex: bool,
    lineage: bool,
    case_sensitive: bool,
) -> CliResult<()> {
    let (container, path) = container_for(records)?;
    let settings = &container.settings;
    let mut forest = container.records.load_forest(&path, settings.strict)?;

    let case_sensitive = case_sensitive || settings.filter.case_sensitive;
    let lineage = lineage || settings.filter.lineage;

    let matcher: Box<dyn Fn(&Record) -> bool> = if regex {
        let re = RegexBuilder::new(pattern)
            .case_insensitive(!case_sensitive)
            .build()
            .map_err(|e| CliError::InvalidArgs(format!("invalid pattern: {e}")))?;
        Box::new(move |r: &Record| re.is_match(&r.display_label()))
    } else if case_sensitive {
        let needle = pattern.to_string();
        Box::new(move |r: &Record| r.display_label().contains(&needle))
    } else {
        let needle = pattern.to_lowercase();
        Box::new(move |r: &Record| r.display_label().to_lowercase().contains(&needle))
    };

    let removed = if lineage {
        forest.retain_with_lineage(|r| matcher(r))
    } else {
        forest.retain_with_ancestors(|r| matcher(r))
    };
    debug!(removed, lineage, "filter applied");

    if forest.is_empty() {
        output::warning(&format!("nothing matches '{pattern}'"));
        return Ok(());
    }
    emit(&render_forest(&forest, |r| node_line(r, settings)))?;
    Ok(())
}

// ============================================================
// Selection
// ============================================================

fn to_event(spec: &EventSpec, all_ids: &[String]) -> SelectionEvent<String> {
    match spec {
        EventSpec::Click(id) => SelectionEvent::NodeClicked(id.clone()),
        EventSpec::Toggle(id, state) => SelectionEvent::NodeToggled(id.clone(), *state),
        EventSpec::All => SelectionEvent::SelectAll(all_ids.to_vec()),
        EventSpec::Clear => SelectionEvent::ClearAll,
    }
}

/// JSON shape of `select --json`.
#[derive(Debug, Serialize)]
struct SelectionReport {
    states: BTreeMap<String, SelectionState>,
    direct: Vec<String>,
    indirect: Vec<String>,
    complete: Vec<String>,
    labels: Vec<String>,
}

fn sorted(ids: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut ids: Vec<String> = ids.into_iter().collect();
    ids.sort();
    ids
}

#[instrument]
fn cmd_select(records: &str, events: &[EventSpec], json: bool) -> CliResult<()> {
    let (container, path) = container_for(records)?;
    let settings = &container.settings;
    let forest = container.records.load_forest(&path, settings.strict)?;
    let index = HierarchyIndex::from_forest(&forest, Record::key);

    let mut session = SelectionSession::<Record, String>::new()
        .on_selection_change(|leaves: &[&Record]| {
            info!(leaves = leaves.len(), "selected leaves changed");
        })
        .on_complete_selection_change(|complete| {
            info!(
                direct = complete.direct_selected_nodes.len(),
                indirect = complete.indirect_selected_nodes.len(),
                "complete selection changed"
            );
        });

    for spec in events {
        if let EventSpec::Click(id) | EventSpec::Toggle(id, _) = spec {
            if !index.contains(id) {
                output::warning(&format!("unknown id '{id}' ignored"));
            }
        }
        session.dispatch(to_event(spec, index.ids()), &index);
    }

    let complete = session.complete_selection(&index);
    if json {
        let report = SelectionReport {
            states: session
                .states()
                .iter()
                .map(|(id, state)| (id.clone(), *state))
                .collect(),
            direct: sorted(complete.direct_selected_nodes.iter().cloned()),
            indirect: sorted(complete.indirect_selected_nodes.iter().cloned()),
            complete: sorted(complete.complete_selected_nodes.iter().cloned()),
            labels: complete
                .selected_node_data
                .iter()
                .map(|r| r.display_label())
                .collect(),
        };
        let text = serde_json::to_string_pretty(&report)
            .map_err(|e| CliError::Usage(format!("serialize selection: {e}")))?;
        return emit(&format!("{text}\n"));
    }

    emit(&render_forest(&forest, |r| {
        let label = index
            .cached_label(&r.id, |r| node_line(r, settings))
            .unwrap_or_else(|| r.display_label());
        let state = session.state_of(&r.id);
        format!("{} {}", output::marker(state, marker_text(state, settings)), label)
    }))
}

// ============================================================
// Validation
// ============================================================

#[instrument]
fn cmd_check(records: &str) -> CliResult<()> {
    let (container, path) = container_for(records)?;
    let rows = container.records.load(&path)?;

    let duplicates = find_duplicate_ids(&rows, Record::key);
    let orphans = find_orphans(&rows, Record::key, Record::parent_key);

    if duplicates.is_empty() && orphans.is_empty() {
        output::success(&format!("{}: {} records ok", path.display(), rows.len()));
        return Ok(());
    }

    output::header(&path.display());
    for id in &duplicates {
        output::problem("duplicate id", id);
    }
    for id in &orphans {
        output::problem("orphan", id);
    }
    validate_records(&rows, Record::key, Record::parent_key)?;
    Ok(())
}

// ============================================================
// Config commands
// ============================================================

fn cmd_config(command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show { records } => {
            let dir = records.as_deref().map(expand_path);
            let settings = Settings::load(dir.as_deref().map(records_dir))?;
            emit(&settings.to_toml()?)?;
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::info(&format!("global: {}", path.display())),
                None => output::info(&"global: (no config directory)"),
            }
            output::info(&format!(
                "local:  {}",
                local_config_path(Path::new(".")).display()
            ));
        }
        ConfigCommands::Template => emit(&Settings::template())?,
    }
    Ok(())
}
