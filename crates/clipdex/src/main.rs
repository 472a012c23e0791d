//! `clipdex` - CLI for the article-corpus catalog
//!
//! This binary ingests, queries, validates, and re-exports a scraped
//! article corpus through its local catalog.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::collections::HashSet;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use serde_json::json;
use tracing::warn;

use clipdex::catalog::{Catalog, DocumentRecord, SearchFilter, UpsertOutcome};
use clipdex::cli::{
    parse_time_bound, Cli, Command, ConfigCommand, ExportCommand, OutputFormat, ScanCommand,
    SearchCommand, ShowCommand, ValidateCommand, WatchCommand,
};
use clipdex::corpus::{rel_key, Corpus};
use clipdex::validate::Validator;
use clipdex::watch::{CorpusMonitor, PollingMonitor};
use clipdex::{frontmatter, init_logging, Config, DifficultyLevel, Error};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone()).context("loading configuration")?;

    // Execute the command
    match cli.command {
        Command::Scan(cmd) => handle_scan(&config, &cmd),
        Command::Watch(cmd) => handle_watch(&config, &cmd),
        Command::Status(cmd) => handle_status(&config, cmd.json),
        Command::Search(cmd) => handle_search(&config, &cmd),
        Command::Show(cmd) => handle_show(&config, &cmd),
        Command::Export(cmd) => handle_export(&config, &cmd),
        Command::Validate(cmd) => handle_validate(&config, &cmd),
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

fn handle_scan(config: &Config, cmd: &ScanCommand) -> anyhow::Result<()> {
    let corpus = Corpus::new(config.collection_root());
    let catalog = Catalog::open(config.database_path())?;

    let paths = corpus.scan()?;
    let mut live = HashSet::new();
    let (mut inserted, mut updated, mut unchanged, mut failed) = (0usize, 0usize, 0usize, 0usize);

    for rel in &paths {
        live.insert(rel_key(rel));
        match corpus.load(rel) {
            Ok(document) => match catalog.upsert(&document)? {
                UpsertOutcome::Inserted(_) => inserted += 1,
                UpsertOutcome::Updated(_) => updated += 1,
                UpsertOutcome::Unchanged(_) => unchanged += 1,
            },
            Err(e) => {
                warn!("Skipping {}: {e}", rel.display());
                failed += 1;
            }
        }
    }

    let pruned = if cmd.prune {
        catalog.remove_missing(&live)?
    } else {
        0
    };

    if cmd.json {
        let summary = json!({
            "scanned": paths.len(),
            "inserted": inserted,
            "updated": updated,
            "unchanged": unchanged,
            "failed": failed,
            "pruned": pruned,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "Scanned {} document(s) under {}",
            paths.len(),
            corpus.root().display()
        );
        println!("  Inserted:  {inserted}");
        println!("  Updated:   {updated}");
        println!("  Unchanged: {unchanged}");
        if failed > 0 {
            println!("  Failed:    {failed}");
        }
        if cmd.prune {
            println!("  Pruned:    {pruned}");
        }
    }
    Ok(())
}

fn handle_watch(config: &Config, cmd: &WatchCommand) -> anyhow::Result<()> {
    let interval = cmd
        .interval
        .map_or_else(|| config.poll_interval(), Duration::from_secs);
    let corpus = Corpus::new(config.collection_root());
    let catalog = Catalog::open(config.database_path())?;
    let known = catalog.known_hashes()?;

    println!(
        "Watching {} every {}s (Ctrl-C to stop)",
        corpus.root().display(),
        interval.as_secs()
    );

    let runtime = tokio::runtime::Runtime::new().context("starting async runtime")?;
    runtime.block_on(async {
        let mut monitor = PollingMonitor::new(corpus, interval, known);
        let (tx, mut rx) = tokio::sync::mpsc::channel(64);
        let task = tokio::spawn(async move { monitor.run(tx).await });

        loop {
            tokio::select! {
                event = rx.recv() => match event {
                    Some(event) => {
                        let rel_path = event.document.rel_path_str();
                        match catalog.upsert(&event.document) {
                            Ok(outcome) => {
                                println!("{} {} ({})", event.kind, rel_path, outcome_label(outcome));
                            }
                            Err(e) => warn!("Failed to catalog {rel_path}: {e}"),
                        }
                    }
                    None => break,
                },
                _ = tokio::signal::ctrl_c() => {
                    println!("Stopping...");
                    break;
                }
            }
        }

        task.abort();
        anyhow::Ok(())
    })?;
    Ok(())
}

fn outcome_label(outcome: UpsertOutcome) -> &'static str {
    match outcome {
        UpsertOutcome::Inserted(_) => "cataloged",
        UpsertOutcome::Updated(_) => "recataloged",
        UpsertOutcome::Unchanged(_) => "unchanged",
    }
}

fn handle_status(config: &Config, json: bool) -> anyhow::Result<()> {
    let catalog = Catalog::open(config.database_path())?;
    let stats = catalog.stats()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("clipdex status");
        println!("--------------");
        println!("Catalog:        {}", catalog.path().display());
        println!("Documents:      {}", stats.total_documents);
        println!("Categories:     {}", stats.category_count);
        println!("Years:          {}", stats.year_count);
        println!("Duplicates:     {} group(s)", stats.duplicate_groups);
        println!("Oldest capture: {}", format_capture(stats.oldest_capture));
        println!("Newest capture: {}", format_capture(stats.newest_capture));
        println!("Size:           {} bytes", stats.db_size_bytes);
    }
    Ok(())
}

fn format_capture(capture: Option<chrono::DateTime<chrono::Utc>>) -> String {
    capture.map_or_else(
        || "n/a".to_string(),
        |dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    )
}

fn handle_search(config: &Config, cmd: &SearchCommand) -> anyhow::Result<()> {
    let catalog = Catalog::open(config.database_path())?;

    let filter = SearchFilter {
        text: Some(cmd.query.clone()),
        category: cmd.category.clone(),
        year: cmd.year,
        technology: cmd.tech.clone(),
        tag: cmd.tag.clone(),
        difficulty: cmd
            .difficulty
            .map(|d| DifficultyLevel::from(d).to_string()),
        since: cmd
            .since
            .as_deref()
            .map(|s| parse_time_bound(s, false))
            .transpose()?,
        until: cmd
            .until
            .as_deref()
            .map(|s| parse_time_bound(s, true))
            .transpose()?,
        limit: cmd.limit,
    };

    let records = catalog.query(&filter)?;
    render_records(&records, cmd.format)
}

fn render_records(records: &[DocumentRecord], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(records)?),
        OutputFormat::Table => {
            if records.is_empty() {
                println!("No matching documents.");
                return Ok(());
            }
            println!("{:<11} {:<12} {:<48} TITLE", "CAPTURED", "CATEGORY", "PATH");
            for record in records {
                let captured = record.frontmatter.date_captured.map_or_else(
                    || "-".to_string(),
                    |dt| dt.format("%Y-%m-%d").to_string(),
                );
                println!(
                    "{captured:<11} {:<12} {:<48} {}",
                    record.category().unwrap_or("-"),
                    record.rel_path,
                    record.frontmatter.title
                );
            }
            println!();
            println!("{} result(s)", records.len());
        }
        OutputFormat::Plain => {
            for record in records {
                println!("{}\t{}", record.rel_path, record.frontmatter.title);
            }
        }
    }
    Ok(())
}

fn handle_show(config: &Config, cmd: &ShowCommand) -> anyhow::Result<()> {
    let catalog = Catalog::open(config.database_path())?;
    let record = catalog
        .get_by_path(&cmd.path)?
        .ok_or_else(|| Error::NotCataloged {
            path: cmd.path.clone().into(),
        })?;

    match cmd.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&record)?),
        OutputFormat::Plain => {
            // The document as it would be exported.
            print!("{}", frontmatter::serialize(&record.frontmatter, &record.body)?);
        }
        OutputFormat::Table => {
            let fm = &record.frontmatter;
            println!("Path:        {}", record.rel_path);
            println!("Title:       {}", fm.title);
            println!("Source:      {}", fm.source);
            println!("Captured:    {}", format_capture(fm.date_captured));
            println!("Category:    {}", record.category().unwrap_or("-"));
            println!("Author:      {}", fm.author.as_deref().unwrap_or("-"));
            println!("Difficulty:  {}", fm.difficulty_level.as_deref().unwrap_or("-"));
            if !fm.technologies.is_empty() {
                println!("Tech:        {}", fm.technologies.join(", "));
            }
            if !fm.tags.is_empty() {
                println!("Tags:        {}", fm.tags.join(", "));
            }
            if let Some(summary) = &fm.summary {
                println!();
                println!("{summary}");
            }
        }
    }
    Ok(())
}

fn handle_export(config: &Config, cmd: &ExportCommand) -> anyhow::Result<()> {
    let catalog = Catalog::open(config.database_path())?;
    let records = catalog.list_recent(cmd.limit.unwrap_or(0))?;

    match &cmd.output {
        Some(dir) => {
            for record in &records {
                let path = dir.join(&record.rel_path);
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)
                        .with_context(|| format!("creating {}", parent.display()))?;
                }
                let text = frontmatter::serialize(&record.frontmatter, &record.body)?;
                std::fs::write(&path, text)
                    .with_context(|| format!("writing {}", path.display()))?;
            }
            println!("Exported {} document(s) to {}", records.len(), dir.display());
        }
        None => {
            for record in &records {
                print!("{}", frontmatter::serialize(&record.frontmatter, &record.body)?);
            }
        }
    }
    Ok(())
}

fn handle_validate(config: &Config, cmd: &ValidateCommand) -> anyhow::Result<()> {
    let corpus = Corpus::new(config.collection_root());
    let paths = corpus.scan()?;

    let mut documents = Vec::new();
    let mut failures = Vec::new();
    for rel in &paths {
        match corpus.load(rel) {
            Ok(document) => documents.push(document),
            Err(e) if e.is_envelope_error() => failures.push((rel_key(rel), e.to_string())),
            Err(e) => {
                warn!("Skipping unreadable document {}: {e}", rel.display());
            }
        }
    }

    let validator = Validator::new(&config.validate);
    let report = validator.check_corpus(&documents, &failures);

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for finding in &report.findings {
            println!(
                "{:<8} {:<22} {}: {}",
                finding.severity, finding.rule, finding.rel_path, finding.message
            );
        }
        if !report.findings.is_empty() {
            println!();
        }
        println!(
            "{} file(s) checked: {} error(s), {} warning(s)",
            report.files_checked,
            report.error_count(),
            report.warning_count()
        );
    }

    if !report.passes(cmd.strict) {
        anyhow::bail!("validation failed");
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Corpus]");
                println!("  Root:            {}", config.corpus_root().display());
                println!("  Collection:      {}", config.corpus.collection);
                println!("  Collection root: {}", config.collection_root().display());
                println!();
                println!("[Catalog]");
                println!("  Database path:   {}", config.database_path().display());
                println!();
                println!("[Watch]");
                println!("  Poll interval:   {}s", config.watch.poll_interval_secs);
                println!();
                println!("[Validate]");
                println!(
                    "  Ignored rules:   {}",
                    if config.validate.ignore_rules.is_empty() {
                        "none".to_string()
                    } else {
                        config.validate.ignore_rules.join(", ")
                    }
                );
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
