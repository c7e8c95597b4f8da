use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::thread;
use std::time::Instant;

use colored::Colorize;
use tracing::debug;
use wf_core::{EngineError, Line, LineId, ScriptedEngine};
use wf_session::session::is_hint_command;
use wf_session::{EngineAdapter, FileStore, HintPhase, HintView, Session};

type PlaySession = Session<ScriptedEngine, FileStore>;

enum Flow {
    Continue,
    Submitted,
    Quit,
}

pub fn run(
    script: &Path,
    store: &Path,
    namespace: &str,
    history_capacity: usize,
    drain_ceiling: usize,
) -> Result<(), String> {
    let config = super::config_for(namespace)
        .with_history_capacity(history_capacity)
        .with_drain_ceiling(drain_ceiling);

    let (adapter, connected) = EngineAdapter::connect(|| {
        let json = fs::read_to_string(script)
            .map_err(|e| EngineError::Create(format!("{}: {e}", script.display())))?;
        ScriptedEngine::from_json(&json)
    });
    connected.map_err(|e| format!("failed to start engine: {e}"))?;

    let (slots, set_aside) = FileStore::open_or_reset(store)
        .map_err(|e| format!("cannot open {}: {e}", store.display()))?;
    let mut session =
        Session::new(config, adapter, slots).map_err(|e| format!("failed to start session: {e}"))?;
    debug!(script = %script.display(), store = %store.display(), "play session created");

    println!("  {} {}", "Playing".bold(), script.display());
    if let Some(aside) = set_aside {
        let marker = format!("[Save file unreadable, moved to {}]", aside.display());
        println!("  {}", marker.yellow());
    }
    println!("  Type ':help' for session commands, ':quit' to exit.\n");

    session.start();
    let mut printed = print_new_lines(&session, None);

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut line = String::new();
    let mut last_input = Instant::now();

    loop {
        print!("> ");
        io::stdout().flush().map_err(|e| e.to_string())?;

        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => break, // EOF
            Err(e) => return Err(e.to_string()),
            _ => {}
        }

        // The countdown keeps running while the player types.
        session.advance(last_input.elapsed());
        last_input = Instant::now();

        let input = line.trim_end_matches(['\r', '\n']);
        let flow = match input.trim().strip_prefix(':') {
            Some(meta) => meta_command(&mut session, meta),
            None => {
                session.submit(input);
                Flow::Submitted
            }
        };

        printed = print_new_lines(&session, printed);
        match flow {
            Flow::Quit => break,
            Flow::Submitted if is_hint_command(input) => render_hints(&session.hint_view()),
            _ => {}
        }
    }

    session.shutdown();
    Ok(())
}

fn meta_command(session: &mut PlaySession, meta: &str) -> Flow {
    let (cmd, rest) = meta
        .split_once(' ')
        .map_or((meta, ""), |(c, r)| (c, r.trim()));

    match cmd.to_lowercase().as_str() {
        "quit" | "q" => return Flow::Quit,
        "help" => print_help(),
        "undo" => {
            session.undo();
        }
        "redo" => {
            session.redo();
        }
        "save" => {
            session.save(rest);
        }
        "load" if !rest.is_empty() => {
            session.load(rest);
        }
        "delete" if !rest.is_empty() => {
            session.delete(rest);
        }
        "load" | "delete" => println!("  {}", format!("usage: :{cmd} <slot>").yellow()),
        "slots" => {
            let names = session.slots();
            if names.is_empty() {
                println!("  No save slots.");
            }
            for name in names {
                println!("  {name}");
            }
        }
        "clear" => session.clear(),
        "history" => {
            for (i, command) in session.history().entries().enumerate() {
                println!("  {:>3}  {command}", i + 1);
            }
        }
        "hints" => {
            session.open_hints();
            render_hints(&session.hint_view());
        }
        "hint" => match session.hint_phase() {
            HintPhase::Closed => {
                println!("  {}", "Open the hint list with :hints first.".yellow());
            }
            HintPhase::Revealing | HintPhase::Ready | HintPhase::Exhausted => {
                println!("  {}", "Go back to the list with :back first.".yellow());
            }
            HintPhase::Listing => {
                let selected = match rest.parse::<usize>() {
                    Ok(n) if n >= 1 => session.select_hint(n - 1),
                    _ => false,
                };
                if !selected {
                    println!("  {}", format!("no hint numbered '{rest}'").yellow());
                }
                render_hints(&session.hint_view());
            }
        },
        "next" => {
            session.reveal_next_hint();
            render_hints(&session.hint_view());
        }
        "wait" => {
            wait_for_countdown(session);
            render_hints(&session.hint_view());
        }
        "back" => {
            session.hint_back();
            render_hints(&session.hint_view());
        }
        "close" => session.close_hints(),
        _ => println!("  {}", format!("unknown command ':{cmd}' (try :help)").yellow()),
    }
    Flow::Continue
}

/// Tick the countdown in real time until the next hint is available.
fn wait_for_countdown(session: &mut PlaySession) {
    let tick = session.config().hint_tick;
    while session.hint_phase() == HintPhase::Revealing {
        thread::sleep(tick);
        session.tick();
    }
}

fn print_new_lines(session: &PlaySession, since: Option<LineId>) -> Option<LineId> {
    for line in session.transcript().since(since) {
        print_line(line);
    }
    session.transcript().last_id().or(since)
}

fn print_line(line: &Line) {
    let content = line.content.as_str();
    if line.is_input {
        println!("{}", content.dimmed());
    } else if content.starts_with('[') && content.ends_with(']') {
        println!("{}", content.yellow());
    } else {
        println!("{content}");
    }
}

fn render_hints(view: &HintView) {
    match view.phase {
        HintPhase::Closed => {}
        HintPhase::Listing => {
            if view.questions.is_empty() {
                println!("  No hints for {}.", display_location(view));
                return;
            }
            println!("  {} for {}:", "Hints".bold(), display_location(view));
            for (i, question) in view.questions.iter().enumerate() {
                println!("  {:>2}. {question}", i + 1);
            }
            println!("  Pick one with :hint <n>, or :close.");
        }
        HintPhase::Revealing | HintPhase::Ready | HintPhase::Exhausted => {
            if let Some(question) = &view.question {
                println!("  {}", question.bold());
            }
            println!("  {}/{}: {}", view.level + 1, view.levels, view.answer);
            match (view.phase, view.remaining_secs) {
                (HintPhase::Revealing, Some(secs)) if view.has_next_level => {
                    println!("  Next hint in {secs}s (:wait to wait for it).");
                }
                (HintPhase::Ready, _) if view.has_next_level => {
                    println!("  Type :next for a stronger hint.");
                }
                _ if !view.has_next_level => {
                    println!("  No more hints for this question. :back for the list.");
                }
                _ => {}
            }
        }
    }
}

fn display_location(view: &HintView) -> &str {
    if view.location.is_empty() {
        "this place"
    } else {
        &view.location
    }
}

fn print_help() {
    println!("  Session commands:");
    println!("    :undo, :redo          step back or forward one turn");
    println!("    :save [slot]          save (a name is generated if blank)");
    println!("    :load <slot>          restore a save and replay the last command");
    println!("    :delete <slot>        delete a save");
    println!("    :slots                list saves");
    println!("    :history              list remembered commands");
    println!("    :clear                clear the screen buffer");
    println!("    :hints                list hints for the current location");
    println!("    :hint <n>             show hint n");
    println!("    :next, :wait, :back   reveal more, wait for the timer, back to the list");
    println!("    :close                close the hint list");
    println!("    :quit                 leave");
    println!("  Anything else is sent to the story, including 'hint' and 'help'.");
}
