mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use colored::{ColoredString, Colorize};
use std::process::ExitCode;

use work_tracker_core::{
    determine_work_items_path, ItemFilter, NewFeature, NewStory, Storage, WorkItem,
    WorkItemStatus, WorkItemUpdate,
};

use crate::cli::{Cli, Command};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red(), e);
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr; RUST_LOG overrides the level picked by -v
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn run(cli: &Cli) -> Result<ExitCode> {
    // Determine which work items file to use
    let path = determine_work_items_path(cli.file.as_deref())?;
    log::info!("Using work items file {:?}", path);
    let storage = Storage::new(path);

    match &cli.command {
        Command::NextId => {
            storage.ensure_exists()?;
            let store = storage.load()?;
            println!("{}", store.next_id());
        }
        Command::Init => {
            storage.init()?;
            println!(
                "{} {}",
                "Initialized work items file:".green(),
                storage.path().display()
            );
        }
        Command::AddFeature {
            title,
            created_by,
            priority,
            tags,
            description_file,
        } => {
            let input = NewFeature {
                title: title.clone(),
                created_by: created_by.clone(),
                priority: priority.as_deref().map(str::parse).transpose()?,
                tags: tags.as_deref().map(parse_tags),
                description_file: description_file.clone(),
            };
            add_feature(&storage, input)?;
        }
        Command::AddStory {
            title,
            parent_feature,
            created_by,
            estimate,
            priority,
            tags,
            description_file,
            acceptance_criteria,
        } => {
            let input = NewStory {
                title: title.clone(),
                parent_feature: parent_feature.clone(),
                created_by: created_by.clone(),
                estimate: estimate.as_deref().map(str::parse).transpose()?,
                acceptance_criteria: (!acceptance_criteria.is_empty())
                    .then(|| acceptance_criteria.clone()),
                description_file: description_file.clone(),
                priority: priority.as_deref().map(str::parse).transpose()?,
                tags: tags.as_deref().map(parse_tags),
            };
            add_story(&storage, input)?;
        }
        Command::List {
            r#type,
            status,
            assigned_to,
            json,
        } => {
            let filter = ItemFilter {
                item_type: r#type.as_deref().map(str::parse).transpose()?,
                status: status.as_deref().map(str::parse).transpose()?,
                assigned_to: assigned_to.clone(),
            };
            list_items(&storage, &filter, *json)?;
        }
        Command::Get { id, json } => {
            show_item(&storage, id, *json)?;
        }
        Command::Assign { id, role } => {
            let item = update_item(&storage, id, WorkItemUpdate::assign(role.as_str()))?;
            println!("{} {} to {}", "Assigned".green(), item.id, role.cyan());
        }
        Command::UpdateStatus { id, status } => {
            // Reject bad input before the file is touched
            let status: WorkItemStatus = status.parse()?;
            let item = update_item(&storage, id, WorkItemUpdate::status(status.clone()))?;
            println!(
                "{} {} status to {}",
                "Updated".green(),
                item.id,
                colorize_status(&status)
            );
        }
        Command::Validate { json } => {
            return validate(&storage, *json);
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn parse_tags(tags: &str) -> Vec<String> {
    tags.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn add_feature(storage: &Storage, input: NewFeature) -> Result<()> {
    storage.ensure_exists()?;
    let mut store = storage.load()?;

    let feature = store.add_feature(input).clone();
    storage.save(&store)?;

    println!(
        "{} {}: {}",
        "Created feature".green(),
        feature.id.green(),
        feature.title
    );
    Ok(())
}

fn add_story(storage: &Storage, input: NewStory) -> Result<()> {
    storage.ensure_exists()?;
    let mut store = storage.load()?;

    let story = store.add_story(input)?.clone();
    storage.save(&store)?;

    println!(
        "{} {}: {}",
        "Created story".green(),
        story.id.green(),
        story.title
    );
    Ok(())
}

/// Loads, applies the update and saves. Returns the updated item.
fn update_item(storage: &Storage, id: &str, update: WorkItemUpdate) -> Result<WorkItem> {
    storage.ensure_exists()?;
    let mut store = storage.load()?;

    let item = store.update_item(id, update)?.clone();
    storage
        .save(&store)
        .with_context(|| format!("Work item {} was updated but could not be saved", id))?;

    Ok(item)
}

fn list_items(storage: &Storage, filter: &ItemFilter, json: bool) -> Result<()> {
    let store = storage.load()?;
    let items = store.items_matching(filter);

    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    if items.is_empty() {
        println!("{}", "No work items found.".yellow());
        return Ok(());
    }

    println!("Found {} work item(s):\n", items.len());
    for item in items {
        println!(
            "[{}] {}: {}",
            item.id.yellow(),
            type_label(item).bold(),
            item.title
        );
        println!("  Status: {}", status_label(item));
        if let Some(priority) = &item.priority {
            println!("  Priority: {}", priority);
        }
        if let Some(assigned_to) = &item.assigned_to {
            println!("  Assigned to: {}", assigned_to.cyan());
        }
        if let Some(parent) = &item.parent_feature {
            println!("  Parent feature: {}", parent);
        }
        println!();
    }

    Ok(())
}

fn show_item(storage: &Storage, id: &str, json: bool) -> Result<()> {
    let store = storage.load()?;
    let item = store
        .find_item(id)
        .with_context(|| format!("Work item {} not found", id))?;

    if json {
        println!("{}", serde_json::to_string_pretty(item)?);
        return Ok(());
    }

    println!("{}: {}", "Work Item".blue(), item.id);
    println!(
        "{}: {}",
        "Type".blue(),
        item.item_type.as_ref().map(|t| t.as_str()).unwrap_or("-")
    );
    println!("{}: {}", "Title".blue(), item.title);
    println!("{}: {}", "Status".blue(), status_label(item));
    println!("{}: {}", "Created by".blue(), item.created_by);
    println!("{}: {}", "Created date".blue(), item.created_date);

    if let Some(updated) = &item.updated_date {
        println!("{}: {}", "Updated date".blue(), updated);
    }
    if let Some(priority) = &item.priority {
        println!("{}: {}", "Priority".blue(), priority);
    }
    if let Some(tags) = item.tags.as_ref().filter(|t| !t.is_empty()) {
        println!("{}: {}", "Tags".blue(), tags.join(", "));
    }
    if let Some(parent) = &item.parent_feature {
        println!("{}: {}", "Parent feature".blue(), parent);
    }
    if let Some(assigned_to) = &item.assigned_to {
        println!("{}: {}", "Assigned to".blue(), assigned_to.cyan());
    }
    if let Some(estimate) = &item.estimate {
        println!("{}: {}", "Estimate".blue(), estimate);
    }
    if let Some(criteria) = item.acceptance_criteria.as_ref().filter(|c| !c.is_empty()) {
        println!("{}:", "Acceptance criteria".blue());
        for (idx, criterion) in criteria.iter().enumerate() {
            println!("  {}. {}", idx + 1, criterion);
        }
    }
    if let Some(description_file) = &item.description_file {
        println!("{}: {}", "Description file".blue(), description_file);
    }

    Ok(())
}

fn validate(storage: &Storage, json: bool) -> Result<ExitCode> {
    let store = storage.load()?;
    let report = store.validate();

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if report.valid {
        println!("{}", "✓ Work items file is valid".green());
        println!("  {} work item(s) found", store.len());
    } else {
        eprintln!("{}\n", "✗ Work items file has validation errors:".red());
        for violation in &report.violations {
            match &violation.work_item_id {
                Some(id) => eprintln!("  [{}] {}", id.yellow(), violation.message),
                None => eprintln!("  {}", violation.message),
            }
        }
    }

    log::info!("{} violation(s) found", report.violations.len());
    Ok(if report.valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn type_label(item: &WorkItem) -> String {
    item.item_type
        .as_ref()
        .map(|t| t.as_str().to_uppercase())
        .unwrap_or_else(|| "UNKNOWN".to_string())
}

fn status_label(item: &WorkItem) -> ColoredString {
    match &item.status {
        Some(status) => colorize_status(status),
        None => "-".dimmed(),
    }
}

fn colorize_status(status: &WorkItemStatus) -> ColoredString {
    match status {
        WorkItemStatus::Todo => "todo".yellow(),
        WorkItemStatus::InProgress => "in-progress".blue(),
        WorkItemStatus::Done => "done".green(),
        WorkItemStatus::Blocked => "blocked".red(),
        WorkItemStatus::Unknown(s) => s.as_str().magenta(),
    }
}
