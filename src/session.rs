//! Line-oriented interactive session.
//!
//! Each input line is one user action (a keystroke batch or a form submit);
//! the QR view is printed after every action that can change it.
use crate::app::App;
use anyhow::{Context, Result};
use std::io::{BufRead, Write};

const HELP: &str = "commands:
  amount <A>            set the total amount
  people <N>            set the number of people
  add <ID> [LABEL...]   save a PromptPay ID
  select <ID>           select a saved PromptPay ID
  delete <INDEX>        delete a saved PromptPay ID
  list                  list saved PromptPay IDs
  edit                  show or hide the setup form
  show                  print the current QR view
  quit                  leave the session";

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Redraw,
    Quiet,
    Quit,
}

pub fn run_session<R: BufRead, W: Write>(app: &mut App, input: R, out: &mut W) -> Result<()> {
    for line in input.lines() {
        let line = line.context("read session input")?;
        let words = match shell_words::split(&line) {
            Ok(words) => words,
            Err(err) => {
                writeln!(out, "warning: {err}")?;
                continue;
            }
        };
        let Some((command, args)) = words.split_first() else {
            continue;
        };
        match dispatch(app, command, args, out)? {
            Flow::Quit => break,
            Flow::Quiet => {}
            Flow::Redraw => {
                write!(out, "{}", app.view())?;
                if let Some(alert) = app.alert() {
                    writeln!(out, "alert: {alert}")?;
                }
            }
        }
    }
    out.flush()?;
    Ok(())
}

fn dispatch<W: Write>(app: &mut App, command: &str, args: &[String], out: &mut W) -> Result<Flow> {
    let first = args.first().map(String::as_str).unwrap_or("");
    let flow = match command {
        "amount" => {
            app.input_amount(first);
            Flow::Redraw
        }
        "people" => {
            app.input_people(first);
            Flow::Redraw
        }
        "add" => match app.add_identifier(first, &args.get(1..).unwrap_or(&[]).join(" ")) {
            Ok(()) => Flow::Redraw,
            Err(err) => {
                writeln!(out, "warning: {err}")?;
                Flow::Quiet
            }
        },
        "select" => match app.select_identifier(first) {
            Ok(true) => Flow::Redraw,
            Ok(false) => Flow::Quiet,
            Err(err) => {
                writeln!(out, "warning: {err}")?;
                Flow::Quiet
            }
        },
        "delete" => {
            let Ok(index) = first.parse::<usize>() else {
                writeln!(out, "warning: delete needs a numeric index")?;
                return Ok(Flow::Quiet);
            };
            match app.delete_identifier(index) {
                Ok(_) => Flow::Redraw,
                Err(err) => {
                    writeln!(out, "warning: {err}")?;
                    Flow::Quiet
                }
            }
        }
        "list" => {
            write_identifier_list(app, out)?;
            Flow::Quiet
        }
        "edit" => {
            let collapsed = app.toggle_setup();
            writeln!(
                out,
                "setup form {}",
                if collapsed { "hidden" } else { "shown" }
            )?;
            Flow::Quiet
        }
        "show" => Flow::Redraw,
        "help" => {
            writeln!(out, "{HELP}")?;
            Flow::Quiet
        }
        "quit" | "exit" => Flow::Quit,
        other => {
            writeln!(out, "warning: unknown command {other:?} (try `help`)")?;
            Flow::Quiet
        }
    };
    Ok(flow)
}

/// One line per saved identifier, `*` marking the selection.
pub fn write_identifier_list<W: Write>(app: &App, out: &mut W) -> std::io::Result<()> {
    if app.identifiers().is_empty() {
        return writeln!(out, "no saved PromptPay IDs");
    }
    for (index, record) in app.identifiers().iter().enumerate() {
        let marker = if record.selected { '*' } else { ' ' };
        if record.label.is_empty() {
            writeln!(out, "{marker} {index}: {}", record.id)?;
        } else {
            writeln!(out, "{marker} {index}: {} ({})", record.id, record.label)?;
        }
    }
    Ok(())
}
