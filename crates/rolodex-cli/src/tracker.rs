use crate::config::Settings;
use anyhow::{bail, Result};
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use rolodex_core::{
    format_date_compact, format_date_verbose, parse_iso_date, OpportunityPatch, TrackedOpportunity,
    TrackingStatus,
};
use rolodex_storage::{FileStore, KeyValueStore, MemoryStore, Tracker, TrackerStore};

#[derive(Subcommand, Debug)]
#[command(rename_all = "kebab-case")]
pub enum TrackerCommand {
    #[command(alias = "ls")]
    List(TrackerListArgs),
    #[command(alias = "set-status")]
    Status(TrackerStatusArgs),
    Flag(TrackerFlagArgs),
    NextStep(TrackerNextStepArgs),
    /// Forget saved rows and start again from the demo rows
    Reset,
}

#[derive(Args, Debug)]
pub struct TrackerListArgs {
    #[arg(long)]
    pub status: Option<TrackingStatus>,
    #[arg(long)]
    pub flagged: bool,
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct TrackerStatusArgs {
    pub id: String,
    pub status: TrackingStatus,
}

#[derive(Args, Debug)]
pub struct TrackerFlagArgs {
    pub id: String,
    #[arg(long)]
    pub off: bool,
}

#[derive(Args, Debug)]
pub struct TrackerNextStepArgs {
    pub id: String,
    #[arg(required_unless_present = "clear", conflicts_with = "clear")]
    pub date: Option<String>,
    #[arg(long)]
    pub clear: bool,
}

pub fn handle_tracker_command(
    command: TrackerCommand,
    settings: &Settings,
    today: NaiveDate,
) -> Result<()> {
    if settings.ephemeral {
        let store = configure(TrackerStore::new(MemoryStore::new(), today), settings);
        run(command, Tracker::start(store))
    } else {
        let store = configure(
            TrackerStore::new(FileStore::new(&settings.data_dir), today),
            settings,
        );
        run(command, Tracker::start(store))
    }
}

fn configure<S: KeyValueStore>(store: TrackerStore<S>, settings: &Settings) -> TrackerStore<S> {
    store
        .with_key(settings.storage_key.clone())
        .with_default_deadlines(settings.default_deadlines.clone())
}

fn run<S: KeyValueStore>(command: TrackerCommand, mut tracker: Tracker<S>) -> Result<()> {
    match command {
        TrackerCommand::List(args) => list_rows(&tracker, &args),
        TrackerCommand::Status(args) => {
            apply(&mut tracker, &args.id, OpportunityPatch::status(args.status))?;
            println!("[{}] is now {}.", args.id, args.status);
            Ok(())
        }
        TrackerCommand::Flag(args) => {
            apply(&mut tracker, &args.id, OpportunityPatch::flagged(!args.off))?;
            let state = if args.off { "unflagged" } else { "flagged" };
            println!("[{}] {state}.", args.id);
            Ok(())
        }
        TrackerCommand::NextStep(args) => set_next_step(&mut tracker, &args),
        TrackerCommand::Reset => {
            tracker.reset();
            println!("Tracker reset to {} demo rows.", tracker.rows().len());
            Ok(())
        }
    }
}

fn apply<S: KeyValueStore>(
    tracker: &mut Tracker<S>,
    id: &str,
    patch: OpportunityPatch,
) -> Result<()> {
    if !tracker.apply(id, &patch) {
        bail!("No tracked opportunity with id '{id}'");
    }
    Ok(())
}

fn set_next_step<S: KeyValueStore>(
    tracker: &mut Tracker<S>,
    args: &TrackerNextStepArgs,
) -> Result<()> {
    let date = if args.clear {
        None
    } else {
        let raw = args.date.as_deref().unwrap_or_default();
        match parse_iso_date(raw) {
            Some(date) => Some(date.format("%Y-%m-%d").to_string()),
            None => bail!("Invalid date '{raw}', expected YYYY-MM-DD"),
        }
    };
    apply(tracker, &args.id, OpportunityPatch::next_step_on(date.clone()))?;
    match date {
        Some(date) => println!("[{}] next step on {}.", args.id, format_date_verbose(&date)),
        None => println!("[{}] next step cleared.", args.id),
    }
    Ok(())
}

fn list_rows<S: KeyValueStore>(tracker: &Tracker<S>, args: &TrackerListArgs) -> Result<()> {
    let rows: Vec<&TrackedOpportunity> = tracker
        .rows()
        .iter()
        .filter(|row| args.status.map_or(true, |status| row.status == status))
        .filter(|row| !args.flagged || row.flagged)
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("No tracked opportunities.");
        return Ok(());
    }
    for row in rows {
        println!("{}", render_row(row));
    }
    Ok(())
}

fn render_row(row: &TrackedOpportunity) -> String {
    let mut line = format!("- [{}] {}", row.id, row.name);
    if row.flagged {
        line.push_str(" *");
    }
    line.push_str(&format!(" | {}", row.label));
    if let Some(location) = &row.location {
        line.push_str(&format!(" ({location})"));
    }
    line.push_str(&format!(
        " | {} | added {} | due {}",
        row.status,
        format_date_compact(&row.created_on),
        format_date_verbose(&row.deadline)
    ));
    if let Some(next) = &row.next_step_on {
        line.push_str(&format!(" | next {}", format_date_compact(next)));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> TrackedOpportunity {
        TrackedOpportunity {
            id: "gs-ib-sa".to_string(),
            name: "Goldman Sachs".to_string(),
            label: "IB Summer Analyst".to_string(),
            location: Some("New York, NY".to_string()),
            created_on: "2025-08-01".to_string(),
            status: TrackingStatus::Phone,
            flagged: true,
            deadline: "2025-09-01".to_string(),
            next_step_on: Some("2025-08-15".to_string()),
        }
    }

    #[test]
    fn renders_row_with_formatted_dates() {
        assert_eq!(
            render_row(&row()),
            "- [gs-ib-sa] Goldman Sachs * | IB Summer Analyst (New York, NY) | Phone | added 8/1/25 | due Sep 01, 2025 | next 8/15/25"
        );
    }

    #[test]
    fn unknown_id_is_reported() {
        let today = NaiveDate::from_ymd_opt(2026, 2, 2).expect("valid date");
        let mut tracker = Tracker::start(TrackerStore::new(MemoryStore::new(), today));
        let err = apply(
            &mut tracker,
            "missing",
            OpportunityPatch::status(TrackingStatus::Offer),
        )
        .expect_err("unknown id");
        assert!(err.to_string().contains("missing"));
        assert!(apply(
            &mut tracker,
            "ms-ib-sa",
            OpportunityPatch::flagged(true)
        )
        .is_ok());
        assert!(tracker.get("ms-ib-sa").expect("row").flagged);
    }

    #[test]
    fn next_step_rejects_bad_dates() {
        let today = NaiveDate::from_ymd_opt(2026, 2, 2).expect("valid date");
        let mut tracker = Tracker::start(TrackerStore::new(MemoryStore::new(), today));
        let args = TrackerNextStepArgs {
            id: "gs-ib-sa".to_string(),
            date: Some("soon".to_string()),
            clear: false,
        };
        assert!(set_next_step(&mut tracker, &args).is_err());

        let args = TrackerNextStepArgs {
            date: Some("2026-02-10".to_string()),
            ..args
        };
        set_next_step(&mut tracker, &args).expect("set next step");
        assert_eq!(
            tracker.get("gs-ib-sa").and_then(|row| row.next_step_on.as_deref()),
            Some("2026-02-10")
        );
    }
}
