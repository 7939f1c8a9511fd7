use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(
    name = "work-tracker",
    author,
    version,
    about = "CLI tool for managing work items (features and stories)"
)]
pub struct Cli {
    /// Path to the work items YAML file
    /// [default: $WORK_TRACKER_FILE, config default_file, or docs/work/work-items.yaml]
    #[clap(long, short = 'f', global = true)]
    pub file: Option<PathBuf>,

    /// Increase log output (-v info, -vv debug); RUST_LOG takes precedence
    #[clap(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Get the next available work item ID
    NextId,

    /// Initialize a new work items file
    Init,

    /// Add a new feature
    AddFeature {
        /// Feature title
        #[clap(long, short = 't')]
        title: String,

        /// Role creating the feature
        #[clap(long, short = 'c')]
        created_by: String,

        /// Priority: low, medium, high
        #[clap(long, short = 'p')]
        priority: Option<String>,

        /// Comma-separated tags
        #[clap(long)]
        tags: Option<String>,

        /// Path to description markdown file
        #[clap(long, short = 'd')]
        description_file: Option<String>,
    },

    /// Add a new story
    AddStory {
        /// Story title
        #[clap(long, short = 't')]
        title: String,

        /// Parent feature ID
        #[clap(long)]
        parent_feature: String,

        /// Role creating the story
        #[clap(long, short = 'c')]
        created_by: String,

        /// Estimate: S, M, L, XL
        #[clap(long, short = 'e')]
        estimate: Option<String>,

        /// Priority: low, medium, high
        #[clap(long, short = 'p')]
        priority: Option<String>,

        /// Comma-separated tags
        #[clap(long)]
        tags: Option<String>,

        /// Path to description markdown file
        #[clap(long, short = 'd')]
        description_file: Option<String>,

        /// Acceptance criterion (repeat for several)
        #[clap(long = "acceptance-criteria", short = 'a')]
        acceptance_criteria: Vec<String>,
    },

    /// List all work items
    List {
        /// Filter by type: feature or story
        #[clap(long)]
        r#type: Option<String>,

        /// Filter by status: todo, in-progress, done, blocked
        #[clap(long)]
        status: Option<String>,

        /// Filter by assigned role
        #[clap(long)]
        assigned_to: Option<String>,

        /// Print the matching items as JSON
        #[clap(long)]
        json: bool,
    },

    /// Get details of a specific work item
    Get {
        /// Work item ID (e.g. 00001)
        id: String,

        /// Print the item as JSON
        #[clap(long)]
        json: bool,
    },

    /// Assign a work item to a role
    Assign {
        /// Work item ID
        id: String,

        /// Role to assign
        role: String,
    },

    /// Update the status of a work item
    UpdateStatus {
        /// Work item ID
        id: String,

        /// New status: todo, in-progress, done, blocked
        status: String,
    },

    /// Validate the work items file for errors
    Validate {
        /// Print the validation report as JSON
        #[clap(long)]
        json: bool,
    },
}
