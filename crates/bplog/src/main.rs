//! `bplog` - CLI for the blood-pressure log
//!
//! This binary records readings and prints the history, chart and status of
//! the local store.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::fmt::Write as _;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::Parser;
use tracing::info;

use bplog::chart::{self, ChartOutcome, SvgSurface};
use bplog::cli::{
    AddCommand, ChartCommand, Cli, Command, ConfigCommand, DeleteCommand, HistoryCommand,
    OutputFormat,
};
use bplog::history::{self, HistoryRow, HistoryView};
use bplog::period;
use bplog::{init_logging, Config, FileCamera, ReadingStore, SqliteBackend, Tracker};

type Session = Tracker<SqliteBackend, FileCamera>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let load = || Config::load_from(cli.config.clone()).context("failed to load configuration");

    match cli.command {
        Command::Add(cmd) => handle_add(&load()?, cmd).await,
        Command::History(cmd) => handle_history(&load()?, &cmd),
        Command::Chart(cmd) => handle_chart(load()?, &cmd),
        Command::Delete(cmd) => handle_delete(&load()?, &cmd),
        Command::Status(cmd) => handle_status(&load()?, cmd.json),
        // Reports on the file itself, so a bad file must not stop it early.
        Command::Config(cmd) => handle_config(cli.config.as_deref(), cmd),
    }
}

fn open_store(config: &Config) -> anyhow::Result<ReadingStore<SqliteBackend>> {
    let path = config.database_path();
    let backend = SqliteBackend::open(&path)
        .with_context(|| format!("failed to open database {}", path.display()))?;
    Ok(ReadingStore::load(backend, config.storage.key.clone())?)
}

fn open_session(config: &Config, photo: Option<PathBuf>) -> anyhow::Result<Session> {
    let store = open_store(config)?;
    // Only `add --photo` ever starts the camera.
    let device = FileCamera::new(photo.unwrap_or_default());
    Ok(Tracker::new(store, device, config.display.locale))
}

async fn handle_add(config: &Config, cmd: AddCommand) -> anyhow::Result<()> {
    let has_photo = cmd.photo.is_some();
    let mut session = open_session(config, cmd.photo)?;

    let form = session.form_mut();
    form.systolic = cmd.systolic;
    form.diastolic = cmd.diastolic;
    form.pulse = cmd.pulse.unwrap_or_default();
    form.notes = cmd.note.unwrap_or_default();
    if let Some(at) = cmd.at {
        form.datetime = at;
    }

    if has_photo {
        session
            .start_camera()
            .await
            .context("failed to read photo")?;
        session.capture_photo().context("failed to capture photo")?;
    }

    let locale = session.locale();
    let reading = session.submit()?;
    println!(
        "Recorded {} {}/{} ({}) id {}",
        reading.datetime.format(history::DISPLAY_FORMAT),
        reading.systolic,
        reading.diastolic,
        reading.category.label(locale),
        reading.id,
    );
    Ok(())
}

fn handle_history(config: &Config, cmd: &HistoryCommand) -> anyhow::Result<()> {
    let session = open_session(config, None)?;
    let period = cmd.period.unwrap_or_else(|| config.default_period());
    let view = session.history(period);
    let locale = session.locale();

    if cmd.format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(view.rows())?);
        return Ok(());
    }

    let rows = match &view {
        HistoryView::Empty => {
            println!("{}", locale.no_records());
            return Ok(());
        }
        HistoryView::Rows(rows) => rows,
    };

    match cmd.format {
        OutputFormat::Table => print_table(rows, locale),
        OutputFormat::Plain | OutputFormat::Json => {
            for row in rows {
                print_plain(row, locale);
            }
        }
    }
    Ok(())
}

fn print_plain(row: &HistoryRow<'_>, locale: bplog::Locale) {
    let mut line = format!(
        "{}  {}  {} {} / {} {}",
        row.date,
        row.category_label,
        locale.systolic(),
        row.systolic,
        locale.diastolic(),
        row.diastolic,
    );
    if let Some(pulse) = row.pulse {
        let _ = write!(line, "  {} {pulse}", locale.pulse());
    }
    if row.photo.is_some() {
        line.push_str("  [photo]");
    }
    println!("{line}  #{}", row.id);
    if let Some(note) = row.note {
        println!("    {}: {note}", locale.notes());
    }
}

fn print_table(rows: &[HistoryRow<'_>], locale: bplog::Locale) {
    println!(
        "{:<16}  {:<16}  {:<10}  {:>5}  {:>5}  {:>5}  {:<5}  {}",
        "ID",
        "Date",
        "Category",
        "Sys",
        "Dia",
        locale.pulse(),
        "Photo",
        locale.notes(),
    );
    for row in rows {
        println!(
            "{:<16}  {:<16}  {:<10}  {:>5}  {:>5}  {:>5}  {:<5}  {}",
            row.id,
            row.date,
            row.category_label,
            row.systolic,
            row.diastolic,
            row.pulse.map(|p| p.to_string()).unwrap_or_default(),
            if row.photo.is_some() { "yes" } else { "" },
            row.note.unwrap_or_default(),
        );
    }
}

fn handle_chart(mut config: Config, cmd: &ChartCommand) -> anyhow::Result<()> {
    if let Some(width) = cmd.width {
        config.chart.width = width;
    }
    if let Some(height) = cmd.height {
        config.chart.height = height;
    }
    if let Some(pixel_ratio) = cmd.pixel_ratio {
        config.chart.pixel_ratio = pixel_ratio;
    }
    config.validate().context("invalid chart dimensions")?;

    let store = open_store(&config)?;
    let period = cmd.period.unwrap_or_else(|| config.default_period());
    let options = config.chart_options();
    let readings = period::filter(store.readings(), period);

    let mut surface = SvgSurface::new();
    match chart::render(&readings, &mut surface, &options) {
        ChartOutcome::NoData => {
            eprintln!("{}", options.locale.no_chart_data());
            return Ok(());
        }
        ChartOutcome::Drawn { scale, points } => {
            info!(
                "Charted {} readings, scale {}..{}",
                points, scale.min, scale.max
            );
        }
    }

    let svg = surface.to_svg();
    match &cmd.output {
        Some(path) => {
            std::fs::write(path, svg)
                .with_context(|| format!("failed to write chart to {}", path.display()))?;
            println!("Chart written to {}", path.display());
        }
        None => io::stdout().write_all(svg.as_bytes())?,
    }
    Ok(())
}

fn handle_delete(config: &Config, cmd: &DeleteCommand) -> anyhow::Result<()> {
    let mut session = open_session(config, None)?;
    let locale = session.locale();

    let Some(reading) = session.store().get(cmd.id) else {
        bail!("no reading with id {}", cmd.id);
    };
    let summary = format!(
        "{} {}/{} ({})",
        reading.datetime.format(history::DISPLAY_FORMAT),
        reading.systolic,
        reading.diastolic,
        reading.category.label(locale),
    );

    session.request_delete(cmd.id);
    if !cmd.yes && !confirm(&format!("Delete reading {summary}?"))? {
        session.cancel_delete();
        println!("Cancelled.");
        return Ok(());
    }

    if session.confirm_delete()? {
        println!("Deleted {summary}");
    }
    Ok(())
}

fn confirm(prompt: &str) -> anyhow::Result<bool> {
    eprint!("{prompt} [y/N] ");
    io::stderr().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

fn handle_status(config: &Config, json: bool) -> anyhow::Result<()> {
    let store = open_store(config)?;
    let stats = store.stats();
    let size = store.backend().size_bytes();
    let fmt = |dt: Option<chrono::NaiveDateTime>| {
        dt.map(|dt| dt.format(history::DISPLAY_FORMAT).to_string())
    };

    if json {
        let status = serde_json::json!({
            "database_path": config.database_path(),
            "database_bytes": size,
            "key": store.key(),
            "total": stats.total,
            "oldest": fmt(stats.oldest),
            "newest": fmt(stats.newest),
            "normal": stats.normal,
            "elevated": stats.elevated,
            "high": stats.high,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        let locale = config.display.locale;
        println!("bplog status");
        println!("------------");
        println!("Database:      {}", config.database_path().display());
        println!("Size:          {size} bytes");
        println!("Readings:      {}", stats.total);
        if let (Some(oldest), Some(newest)) = (fmt(stats.oldest), fmt(stats.newest)) {
            println!("Span:          {oldest} - {newest}");
        }
        println!(
            "  {:<12} {}",
            locale.category(bplog::Category::Normal),
            stats.normal
        );
        println!(
            "  {:<12} {}",
            locale.category(bplog::Category::Elevated),
            stats.elevated
        );
        println!(
            "  {:<12} {}",
            locale.category(bplog::Category::High),
            stats.high
        );
    }
    Ok(())
}

fn handle_config(config_path: Option<&Path>, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            let config = Config::load_from(config_path.map(Path::to_path_buf))
                .context("failed to load configuration")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:  {}", config.database_path().display());
                println!("  Key:            {}", config.storage.key);
                println!();
                println!("[Chart]");
                println!(
                    "  Size:           {}x{}",
                    config.chart.width, config.chart.height
                );
                println!("  Padding:        {}", config.chart.padding);
                println!("  Pixel ratio:    {}", config.chart.pixel_ratio);
                println!();
                println!("[Display]");
                println!("  Default period: {}", config.default_period());
                println!("  Locale:         {}", config.display.locale);
            }
        }
        ConfigCommand::Path => {
            let path = config_path.map_or_else(Config::default_config_path, Path::to_path_buf);
            println!("{}", path.display());
        }
        ConfigCommand::Validate { file } => {
            let path = file
                .or_else(|| config_path.map(Path::to_path_buf))
                .unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
