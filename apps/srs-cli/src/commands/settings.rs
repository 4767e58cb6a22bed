//! Settings commands.

use crate::cli::{SettingsArgs, SettingsCommand};
use anyhow::{ensure, Result};
use card_store_sqlite::{SettingsRepository, SqliteCardStore};
use srs_engine::{CapOverride, GlobalSettings, SubjectSettings};
use std::io::Write;

pub fn run(store: &SqliteCardStore, command: SettingsCommand, out: &mut impl Write) -> Result<()> {
    match command {
        SettingsCommand::Show => show(store, out),
        SettingsCommand::SetGlobal(args) => {
            validate(&args)?;
            let mut global = store.get_global_settings()?;
            apply_global(&mut global, &args);
            store.save_global_settings(&global)?;
            tracing::info!(?global, "updated global settings");
            show(store, out)
        }
        SettingsCommand::SetSubject { subject, values } => {
            validate(&values)?;
            let mut settings = store
                .get_subject_settings(&subject)?
                .unwrap_or_else(|| SubjectSettings::new(subject.clone()));
            apply_subject(&mut settings, &values);
            store.save_subject_settings(&settings)?;
            show(store, out)
        }
        SettingsCommand::ClearSubject { subject } => {
            store.delete_subject_settings(&subject)?;
            writeln!(out, "Cleared settings for {subject}")?;
            Ok(())
        }
    }
}

fn validate(args: &SettingsArgs) -> Result<()> {
    ensure!(
        args.max_interval != Some(0),
        "maximum interval must be at least one day"
    );
    Ok(())
}

fn apply_global(global: &mut GlobalSettings, args: &SettingsArgs) {
    if args.no_max_interval {
        global.maximum_interval_days = None;
    } else if let Some(days) = args.max_interval {
        global.maximum_interval_days = Some(days);
    }
    if let Some(n) = args.new_per_session {
        global.new_cards_per_session = n;
    }
    if let Some(n) = args.reviews_per_session {
        global.reviews_per_session = n;
    }
}

fn apply_subject(settings: &mut SubjectSettings, args: &SettingsArgs) {
    if args.no_max_interval {
        settings.maximum_interval = CapOverride::Uncapped;
    } else if let Some(days) = args.max_interval {
        settings.maximum_interval = CapOverride::Days(days);
    }
    if args.new_per_session.is_some() {
        settings.new_cards_per_session = args.new_per_session;
    }
    if args.reviews_per_session.is_some() {
        settings.reviews_per_session = args.reviews_per_session;
    }
}

fn show(store: &SqliteCardStore, out: &mut impl Write) -> Result<()> {
    let global = store.get_global_settings()?;
    let cap = |days: Option<u32>| days.map_or_else(|| "none".to_string(), |d| format!("{d} days"));

    writeln!(out, "global")?;
    writeln!(out, "  maximum interval:    {}", cap(global.maximum_interval_days))?;
    writeln!(out, "  new per session:     {}", global.new_cards_per_session)?;
    writeln!(out, "  reviews per session: {}", global.reviews_per_session)?;

    for subject in store.list_subject_settings()? {
        writeln!(out, "{}", subject.subject)?;
        match subject.maximum_interval {
            CapOverride::Inherit => {}
            CapOverride::Uncapped => writeln!(out, "  maximum interval:    {}", cap(None))?,
            CapOverride::Days(days) => writeln!(out, "  maximum interval:    {}", cap(Some(days)))?,
        }
        if let Some(n) = subject.new_cards_per_session {
            writeln!(out, "  new per session:     {n}")?;
        }
        if let Some(n) = subject.reviews_per_session {
            writeln!(out, "  reviews per session: {n}")?;
        }
    }
    Ok(())
}
