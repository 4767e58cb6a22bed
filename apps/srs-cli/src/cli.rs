//! Command-line argument definitions.

use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};
use srs_engine::{Difficulty, GroupBy, SelectionFilter, SelectionMode};
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "srs", about = "Spaced-repetition flashcard scheduler", version)]
pub struct Cli {
    /// Path to the card database.
    #[arg(long, global = true, value_name = "FILE", env = "SRS_DATABASE_PATH")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a single card.
    Add(AddArgs),
    /// Import cards from a JSON array.
    Import {
        /// JSON file with `{front, back, subject?, module?, difficulty?, tags?}` entries.
        file: PathBuf,
    },
    /// Show the cards a study session would use.
    Queue {
        #[command(flatten)]
        filter: FilterArgs,
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Grade one card outside a session.
    Review(ReviewArgs),
    /// Run an interactive study session.
    Study {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Per-group progress.
    Mastery {
        #[arg(long, value_enum, default_value_t = GroupByArg::Subject)]
        by: GroupByArg,
        #[arg(long)]
        json: bool,
    },
    /// Show or change scheduling settings.
    #[command(subcommand)]
    Settings(SettingsCommand),
}

#[derive(Args, Debug)]
pub struct AddArgs {
    #[arg(long)]
    pub front: String,
    #[arg(long)]
    pub back: String,
    #[arg(long)]
    pub subject: Option<String>,
    #[arg(long)]
    pub module: Option<String>,
    #[arg(long, value_enum, default_value_t = DifficultyArg::Medium)]
    pub difficulty: DifficultyArg,
    /// May be repeated.
    #[arg(long = "tag")]
    pub tags: Vec<String>,
}

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("grade").required(true).args(["correct", "incorrect"])))]
pub struct ReviewArgs {
    pub id: Uuid,
    #[arg(long)]
    pub correct: bool,
    #[arg(long)]
    pub incorrect: bool,
}

#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    #[arg(long)]
    pub subject: Option<String>,
    #[arg(long)]
    pub module: Option<String>,
    /// `review` and `new-only` queues are trimmed to the per-session limits.
    #[arg(long, value_enum, default_value_t = ModeArg::Review)]
    pub mode: ModeArg,
    /// Case-insensitive text matched against front, back and tags.
    #[arg(long)]
    pub search: Option<String>,
}

impl FilterArgs {
    pub fn to_filter(&self) -> SelectionFilter {
        SelectionFilter {
            subject: self.subject.clone(),
            module: self.module.clone(),
            mode: self.mode.into(),
            search_term: self.search.clone(),
            ..SelectionFilter::default()
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum SettingsCommand {
    /// Print global and per-subject settings.
    Show,
    /// Update global settings.
    SetGlobal(SettingsArgs),
    /// Set overrides for one subject.
    SetSubject {
        subject: String,
        #[command(flatten)]
        values: SettingsArgs,
    },
    /// Remove a subject's overrides.
    ClearSubject { subject: String },
}

#[derive(Args, Debug, Default)]
pub struct SettingsArgs {
    /// Cap on a card's interval in days.
    #[arg(long, conflicts_with = "no_max_interval")]
    pub max_interval: Option<u32>,
    /// Remove the interval cap. On a subject this overrides any global cap;
    /// `clear-subject` restores inheritance.
    #[arg(long)]
    pub no_max_interval: bool,
    #[arg(long)]
    pub new_per_session: Option<u32>,
    #[arg(long)]
    pub reviews_per_session: Option<u32>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModeArg {
    #[default]
    Review,
    NewOnly,
    DifficultOnly,
    All,
}

impl From<ModeArg> for SelectionMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Review => Self::Review,
            ModeArg::NewOnly => Self::NewOnly,
            ModeArg::DifficultOnly => Self::DifficultOnly,
            ModeArg::All => Self::All,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DifficultyArg {
    Easy,
    Medium,
    Hard,
}

impl From<DifficultyArg> for Difficulty {
    fn from(d: DifficultyArg) -> Self {
        match d {
            DifficultyArg::Easy => Self::Easy,
            DifficultyArg::Medium => Self::Medium,
            DifficultyArg::Hard => Self::Hard,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupByArg {
    Subject,
    Module,
}

impl From<GroupByArg> for GroupBy {
    fn from(g: GroupByArg) -> Self {
        match g {
            GroupByArg::Subject => Self::Subject,
            GroupByArg::Module => Self::Module,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn study_filter_parses_mode_and_search() {
        let cli = Cli::parse_from([
            "srs", "study", "--subject", "bio", "--mode", "difficult-only", "--search", "cell",
        ]);
        let Command::Study { filter } = cli.command else {
            panic!("expected study command");
        };
        let filter = filter.to_filter();
        assert_eq!(filter.subject.as_deref(), Some("bio"));
        assert_eq!(filter.mode, SelectionMode::DifficultOnly);
        assert_eq!(filter.search_term.as_deref(), Some("cell"));
    }

    #[test]
    fn review_requires_a_grade() {
        let id = Uuid::new_v4().to_string();
        assert!(Cli::try_parse_from(["srs", "review", id.as_str()]).is_err());
        assert!(Cli::try_parse_from(["srs", "review", id.as_str(), "--correct", "--incorrect"]).is_err());
        assert!(Cli::try_parse_from(["srs", "review", id.as_str(), "--incorrect"]).is_ok());
    }
}
