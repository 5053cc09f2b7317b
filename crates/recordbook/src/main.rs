//! `recbook` - CLI for recordbook
//!
//! Each invocation is one user action against the record book: it opens the
//! store, runs the command to completion, and prints the result.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::fs;

use anyhow::{Context, Result};
use clap::Parser;

use recordbook::cli::{
    Cli, Command, ConfigCommand, DeleteCommand, ExportCommand, OutputFormat, SearchCommand,
    TerminalConfirm,
};
use recordbook::{
    export, init_logging, ClearOutcome, Config, DeleteOutcome, Notice, Record, RecordBook,
    RecordStore, Renderer, SqliteStore,
};

type Book = RecordBook<SqliteStore>;

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone())?;

    match cli.command {
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
        Command::Add(add_cmd) => with_book(&config, |book, _| {
            book.add(add_cmd.into())?;
            Ok(())
        }),
        Command::List(list_cmd) => with_book(&config, |book, renderer| {
            let records = book.records();
            print_records(
                records,
                list_cmd.format,
                || export::format_list(records, renderer, config.export.rule_width),
                || renderer.render_list(records),
            )
        }),
        Command::Search(search_cmd) => with_book(&config, |book, renderer| {
            handle_search(book, &search_cmd, renderer, &config)
        }),
        Command::Delete(delete_cmd) => {
            with_book(&config, |book, _| handle_delete(book, &delete_cmd))
        }
        Command::Clear(clear_cmd) => with_book(&config, |book, _| {
            let outcome = if clear_cmd.yes {
                book.clear(&mut |_: &str| true)?
            } else {
                book.clear(&mut TerminalConfirm::stdio())?
            };
            if outcome == ClearOutcome::Declined {
                println!("Cancelled.");
            }
            Ok(())
        }),
        Command::Export(export_cmd) => with_book(&config, |book, renderer| {
            handle_export(book, &export_cmd, renderer, &config)
        }),
        Command::Stats(stats_cmd) => {
            with_book(&config, |book, renderer| handle_stats(book, stats_cmd.json, renderer))
        }
        Command::Render(render_cmd) => with_book(&config, |book, renderer| {
            let page = book.render_page(renderer);
            match render_cmd.output {
                Some(path) => {
                    fs::write(&path, page)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("Wrote {}", path.display());
                }
                None => print!("{page}"),
            }
            Ok(())
        }),
    }
}

/// Open the record book, run `action` against it, and print queued notices.
fn with_book(
    config: &Config,
    action: impl FnOnce(&mut Book, &Renderer) -> Result<()>,
) -> Result<()> {
    let renderer = config.renderer()?;
    let mut book = open_book(config)?;
    print_notices(&mut book);

    action(&mut book, &renderer)?;

    print_notices(&mut book);
    Ok(())
}

fn open_book(config: &Config) -> Result<Book> {
    let path = config.database_path();
    let store = SqliteStore::open(&path)
        .with_context(|| format!("opening record store at {}", path.display()))?;
    let book = RecordBook::open(
        RecordStore::new(store, config.storage.key.clone()),
        config.storage.seed_samples,
    )?;
    Ok(book)
}

fn print_notices(book: &mut Book) {
    for notice in book.take_notices() {
        match notice {
            Notice::EmptyQuery | Notice::StorageReset { .. } => eprintln!("{notice}"),
            _ => println!("{notice}"),
        }
    }
}

fn print_records(
    records: &[Record],
    format: OutputFormat,
    plain: impl FnOnce() -> String,
    html: impl FnOnce() -> String,
) -> Result<()> {
    match format {
        OutputFormat::Plain => print!("{}", plain()),
        OutputFormat::Html => println!("{}", html()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(records)?),
    }
    Ok(())
}

fn handle_search(
    book: &mut Book,
    cmd: &SearchCommand,
    renderer: &Renderer,
    config: &Config,
) -> Result<()> {
    let results: Vec<Record> = match book.search(&cmd.query) {
        Ok(found) => found.into_iter().cloned().collect(),
        // The empty-query notice is printed by `with_book`.
        Err(err) if err.is_empty_query() => return Ok(()),
        Err(err) => return Err(err.into()),
    };
    let Some(query) = book.last_search() else {
        return Ok(());
    };

    print_records(
        &results,
        cmd.format,
        || export::format_search_results(&results, query, renderer, config.export.rule_width),
        || book.render_active(renderer),
    )
}

fn handle_stats(book: &Book, json: bool, renderer: &Renderer) -> Result<()> {
    let stats = book.stats();
    let sqlite = book.store().store();
    let stored_at = sqlite.updated_at(book.store().key())?;

    if json {
        let status = serde_json::json!({
            "total_count": stats.total_count,
            "last_update": stats.last_update,
            "stored_at": stored_at,
            "database_path": sqlite.path(),
            "database_size_bytes": sqlite.db_size_bytes(),
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("Total records: {}", stats.total_count);
        println!(
            "Last update:   {}",
            renderer.format_timestamp(&stats.last_update)
        );
        match stored_at {
            Some(at) => println!("Last saved:    {}", renderer.format_timestamp(&at)),
            None => println!("Last saved:    never"),
        }
    }
    Ok(())
}

fn handle_delete(book: &mut Book, cmd: &DeleteCommand) -> Result<()> {
    let outcome = if cmd.yes {
        book.delete(cmd.id, &mut |_: &str| true)?
    } else {
        book.delete(cmd.id, &mut TerminalConfirm::stdio())?
    };
    match outcome {
        DeleteOutcome::Removed(record) => println!("Deleted record {}.", record.id),
        DeleteOutcome::NotFound => println!("No record with id {}.", cmd.id),
        DeleteOutcome::Declined => println!("Cancelled."),
    }
    Ok(())
}

fn handle_export(
    book: &Book,
    cmd: &ExportCommand,
    renderer: &Renderer,
    config: &Config,
) -> Result<()> {
    let document = book.export_text(renderer, config.export.rule_width);
    if cmd.stdout {
        print!("{}", document.contents);
        return Ok(());
    }

    let dir = cmd.output_dir.clone().unwrap_or_else(|| config.export_dir());
    let path = document.write_to(&dir)?;
    println!("Exported {} records to {}", book.len(), path.display());
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!("  Key:                {}", config.storage.key);
                println!("  Seed samples:       {}", config.storage.seed_samples);
                println!();
                println!("[Display]");
                println!("  Date format:        {}", config.display.date_format);
                println!("  UTC offset:         {}", config.display_offset());
                println!();
                println!("[Export]");
                println!("  Directory:          {}", config.export_dir().display());
                println!("  Rule width:         {}", config.export.rule_width);
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
