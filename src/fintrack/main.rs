use chrono::Local;
use clap::Parser;
use colored::*;
use directories::ProjectDirs;
use fintrack::api::{CmdMessage, FintrackApi, MessageLevel};
use fintrack::config::FintrackConfig;
use fintrack::error::{FintrackError, Result};
use fintrack::model::{RecordDraft, RecordPatch, Settings, SettingsPatch};
use fintrack::query::{CategoryFilter, MatchSegment, Query, QueryHit, SearchField, SortKey};
use fintrack::seed::{BundledSeed, FileSeed};
use fintrack::store::fs_backend::FsBackend;
use fintrack::store::ImportCheck;
use fintrack::summary::CapStatus;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod args;
use args::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn setup_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

struct AppContext {
    api: FintrackApi<FsBackend>,
    config: FintrackConfig,
}

fn run(cli: Cli) -> Result<()> {
    let mut ctx = init_context()?;

    match cli.command {
        Some(Commands::Add {
            description,
            amount,
            category,
            date,
        }) => handle_add(&mut ctx, description, amount, category, date)?,
        Some(Commands::Edit {
            id,
            description,
            amount,
            category,
            date,
        }) => {
            let patch = RecordPatch {
                description,
                amount,
                category,
                date,
            };
            handle_edit(&mut ctx, &id, patch)?
        }
        Some(Commands::Delete { id }) => handle_delete(&mut ctx, &id)?,
        Some(Commands::List {
            search,
            sort,
            category,
        }) => handle_list(&ctx, search, sort, category),
        Some(Commands::Categories) => handle_categories(&ctx),
        Some(Commands::Settings {
            currency,
            rate1,
            rate2,
            cap,
        }) => {
            let patch = SettingsPatch {
                base_currency: currency,
                currency_rate1: rate1,
                currency_rate2: rate2,
                spending_cap: cap,
            };
            handle_settings(&mut ctx, patch)?
        }
        Some(Commands::Stats) => handle_stats(&ctx),
        Some(Commands::Import { path, strict }) => handle_import(&mut ctx, path, strict)?,
        Some(Commands::Export { output }) => handle_export(&ctx, output)?,
        None => handle_list(&ctx, None, None, None),
    }

    ctx.api.close();
    Ok(())
}

fn data_dir() -> Result<PathBuf> {
    if let Some(home) = std::env::var_os("FINTRACK_HOME") {
        return Ok(PathBuf::from(home));
    }
    ProjectDirs::from("com", "fintrack", "fintrack")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| FintrackError::Store("Could not determine data directory".to_string()))
}

fn init_context() -> Result<AppContext> {
    let dir = data_dir()?;
    let config = FintrackConfig::load(&dir).unwrap_or_else(|err| {
        tracing::warn!(error = %err, "ignoring unreadable config");
        FintrackConfig::default()
    });

    let mut api = FintrackApi::open(FsBackend::new(dir));
    let init = match &config.seed_path {
        Some(path) => api.initialize(&FileSeed::new(path)),
        None => api.initialize(&BundledSeed),
    };
    // Startup notices go to stderr so `export` output stays clean JSON.
    for message in &init.messages {
        eprintln!("{}", message.content.dimmed());
    }

    Ok(AppContext { api, config })
}

fn handle_add(
    ctx: &mut AppContext,
    description: String,
    amount: f64,
    category: String,
    date: Option<String>,
) -> Result<()> {
    let date = date.unwrap_or_else(|| Local::now().date_naive().format("%Y-%m-%d").to_string());
    let result = ctx
        .api
        .create_record(RecordDraft::new(description, amount, category, date))?;
    print_messages(&result.messages);
    for record in &result.affected_records {
        println!("  {} {}", "id:".dimmed(), record.id);
    }
    Ok(())
}

fn handle_edit(ctx: &mut AppContext, id: &str, patch: RecordPatch) -> Result<()> {
    let result = ctx.api.edit_record(id, patch)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_delete(ctx: &mut AppContext, id: &str) -> Result<()> {
    let result = ctx.api.delete_record(id)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_list(
    ctx: &AppContext,
    search: Option<String>,
    sort: Option<String>,
    category: Option<String>,
) {
    let sort_by = sort
        .as_deref()
        .map(SortKey::parse)
        .unwrap_or_else(|| ctx.config.sort_key());
    let filter = category
        .as_deref()
        .map(CategoryFilter::parse)
        .unwrap_or_default();
    let query = Query::default()
        .with_search(search.unwrap_or_default())
        .with_sort(sort_by)
        .with_category(filter)
        .with_fields(ctx.config.search_fields.clone());

    let hits = ctx.api.list(&query);
    if hits.is_empty() {
        let message = if ctx.api.store().records().is_empty() {
            "No records found. Add your first transaction!"
        } else {
            "No records match your filters. Try adjusting your search or filters."
        };
        println!("{}", message.dimmed());
        return;
    }

    let currency = &ctx.api.settings().base_currency;
    for hit in &hits {
        println!(
            "{}  {}  {} {:>10.2}  {}  {}",
            hit.record.date,
            render_field(hit, SearchField::Description),
            currency,
            hit.record.amount,
            render_field(hit, SearchField::Category),
            hit.record.id.dimmed()
        );
    }
}

fn render_field(hit: &QueryHit<'_>, field: SearchField) -> String {
    match hit.highlighted.get(&field) {
        Some(highlight) => highlight
            .segments
            .iter()
            .map(|segment| match segment {
                MatchSegment::Plain(text) => text.normal().to_string(),
                MatchSegment::Match(text) => text.yellow().bold().to_string(),
            })
            .collect(),
        None => field.value(hit.record).to_string(),
    }
}

fn handle_categories(ctx: &AppContext) {
    for category in ctx.api.categories() {
        println!("{}", category);
    }
}

fn handle_settings(ctx: &mut AppContext, patch: SettingsPatch) -> Result<()> {
    if !patch.is_empty() {
        let result = ctx.api.update_settings(patch)?;
        print_messages(&result.messages);
    }
    print_settings(ctx.api.settings());
    Ok(())
}

fn print_settings(settings: &Settings) {
    println!("{:<16}{}", "Base currency:", settings.base_currency);
    println!("{:<16}{}", "Rate 1:", settings.currency_rate1);
    println!("{:<16}{}", "Rate 2:", settings.currency_rate2);
    match settings.cap() {
        Some(cap) => println!("{:<16}{:.2}", "Spending cap:", cap),
        None => println!("{:<16}{}", "Spending cap:", "none"),
    }
}

fn handle_stats(ctx: &AppContext) {
    let summary = ctx.api.summary(Local::now().date_naive());
    let currency = &ctx.api.settings().base_currency;

    println!("{:<16}{}", "Records:", summary.total_records);
    println!("{:<16}{:.2}", "Total:", summary.total_amount);
    println!(
        "{:<16}{}",
        "Top category:",
        summary.top_category.as_deref().unwrap_or("N/A")
    );
    println!("{:<16}{:.2}", "Last 7 days:", summary.last_seven_days);

    let cap_line = match summary.cap {
        CapStatus::NoCap => "No cap set".dimmed(),
        CapStatus::Remaining(left) => format!("Remaining: {} {:.2}", currency, left).green(),
        CapStatus::Over(over) => format!("Over cap by {} {:.2}!", currency, over)
            .red()
            .bold(),
    };
    println!("{}", cap_line);
}

fn handle_import(ctx: &mut AppContext, path: PathBuf, strict: bool) -> Result<()> {
    let document = fs::read_to_string(&path).map_err(FintrackError::Io)?;
    let check = if strict {
        ImportCheck::Strict
    } else {
        ImportCheck::Structural
    };
    let result = ctx.api.import_json(&document, check)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_export(ctx: &AppContext, output: Option<PathBuf>) -> Result<()> {
    let json = ctx.api.export_json()?;
    match output {
        Some(path) => {
            fs::write(&path, json).map_err(FintrackError::Io)?;
            print_messages(&[CmdMessage::success(format!(
                "Exported to {}",
                path.display()
            ))]);
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn print_messages(messages: &[CmdMessage]) {
    for msg in messages {
        match msg.level {
            MessageLevel::Info => println!("{}", msg.content.dimmed()),
            MessageLevel::Success => println!("{}", msg.content.green()),
            MessageLevel::Warning => println!("{}", msg.content.yellow()),
        }
    }
}
