use anyhow::{anyhow, Context, Result};
use clap::Parser;
use serde::Serialize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod amount;
mod app;
mod cli;
mod config;
mod events;
mod identifiers;
mod payload;
mod qr;
mod render;
mod session;
mod storage;
mod util;

use app::App;
use cli::{Command, IdCommand, RootArgs, SessionArgs, SplitArgs};
use config::Config;
use identifiers::PaymentIdentifierRecord;
use qr::QrOptions;
use render::{QrView, RenderState};
use storage::{JsonFileStore, KeyValueStore, MemoryStore};

fn main() -> Result<()> {
    let args = RootArgs::parse();
    let config = config::load_config(args.global.config.as_deref())?;
    init_tracing(&config, args.global.verbose);

    let store = StoreTarget {
        path: args
            .global
            .store
            .clone()
            .unwrap_or_else(|| config.store_path()),
        dry_run: args.global.dry_run,
    };

    match args.command {
        Command::Split(split) => cmd_split(&config, &store, split),
        Command::Id(id) => cmd_id(&config, &store, id),
        Command::Session(session) => cmd_session(&config, &store, session),
    }
}

struct StoreTarget {
    path: PathBuf,
    dry_run: bool,
}

impl StoreTarget {
    fn open(&self, options: QrOptions) -> Result<App> {
        open_app(&self.path, self.dry_run, options)
    }
}

fn init_tracing(config: &Config, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn open_app(store_path: &Path, dry_run: bool, options: QrOptions) -> Result<App> {
    let file = JsonFileStore::open(store_path)?;
    tracing::debug!(store = %file.path().display(), dry_run, "using identifier store");
    let store: Box<dyn KeyValueStore> = if dry_run {
        let memory = file
            .entries()
            .fold(MemoryStore::new(), |memory, (key, value)| {
                memory.with_entry(key, value)
            });
        Box::new(memory)
    } else {
        Box::new(file)
    };
    App::new(store, options).context("load saved PromptPay IDs")
}

#[derive(Serialize)]
struct SplitReport<'a> {
    total_amount: f64,
    no_of_people: u32,
    per_person_amount: f64,
    per_person_display: String,
    promptpay_id: Option<&'a str>,
    payload: Option<&'a str>,
    bitmap_path: Option<String>,
}

fn cmd_split(config: &Config, store: &StoreTarget, args: SplitArgs) -> Result<()> {
    let mut options = config.qr;
    if let Some(format) = args.format {
        options.format = format.into();
    }
    let mut app = store.open(options)?;
    app.input_amount(&args.amount);
    app.input_people(&args.people);

    let state = app.amount_state();
    let (total_amount, per_person_amount) = match (state.total_amount, state.per_person_amount()) {
        (Some(total), Some(share)) if total >= 0.0 => (total, share),
        _ => return Err(anyhow!("invalid amount {:?}", args.amount)),
    };
    if app.render_state() == RenderState::NoIdentifier {
        tracing::warn!("no PromptPay ID selected; add one with `splitpay id add`");
    }

    let view = app.view();
    if let Some(alert) = app.alert() {
        eprintln!("alert: {alert}");
    }
    let ready = match &view {
        QrView::Ready(ready) => Some(ready),
        QrView::Prompt => None,
    };

    if let (Some(out), Some(ready)) = (&args.out, ready) {
        std::fs::write(out, &ready.bitmap).with_context(|| format!("write {}", out.display()))?;
        tracing::info!(path = %out.display(), "wrote QR bitmap");
    }

    if args.json {
        let report = SplitReport {
            total_amount,
            no_of_people: state.party_count,
            per_person_amount,
            per_person_display: util::format_currency(per_person_amount),
            promptpay_id: ready.map(|r| r.id.as_str()),
            payload: ready.and_then(|r| r.payload.as_deref()),
            bitmap_path: args.out.as_ref().map(|p| p.display().to_string()),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    match (&view, &args.out) {
        (QrView::Ready(ready), Some(out)) => {
            for line in &ready.summary {
                println!("{line}");
            }
            println!("QR code written to {}", out.display());
        }
        _ => print!("{view}"),
    }
    Ok(())
}

fn cmd_id(config: &Config, store: &StoreTarget, command: IdCommand) -> Result<()> {
    let mut app = store.open(config.qr)?;
    match command {
        IdCommand::Add { id, label } => {
            app.add_identifier(&id, &label)
                .context("save PromptPay ID")?;
            let saved = app.identifiers().last().map(|r| r.id.as_str()).unwrap_or("");
            println!("Saved PromptPay ID {saved}");
        }
        IdCommand::List { json } => {
            if json {
                let records: &[PaymentIdentifierRecord] = app.identifiers();
                println!("{}", serde_json::to_string_pretty(records)?);
            } else {
                session::write_identifier_list(&app, &mut io::stdout().lock())?;
            }
        }
        IdCommand::Select { id } => {
            if !app.select_identifier(&id)? {
                return Err(anyhow!("no saved PromptPay ID matches {id:?}"));
            }
            println!("Selected PromptPay ID {}", util::sanitize_id(&id));
        }
        IdCommand::Delete { index } => {
            let removed = app.delete_identifier(index)?;
            println!("Deleted PromptPay ID {}", removed.id);
            match app.selected_identifier() {
                Some(selected) => println!("Selected PromptPay ID {}", selected.id),
                None => println!("No PromptPay IDs left"),
            }
        }
    }
    Ok(())
}

fn cmd_session(config: &Config, store: &StoreTarget, args: SessionArgs) -> Result<()> {
    let mut app = store.open(config.qr)?;
    if args.trace_events {
        app.context_mut().bus.subscribe(|event| match serde_json::to_string(event) {
            Ok(json) => eprintln!("{json}"),
            Err(err) => tracing::warn!(error = %err, "serialize event"),
        });
    }
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    session::run_session(&mut app, stdin.lock(), &mut stdout)?;
    stdout.flush()?;
    Ok(())
}
