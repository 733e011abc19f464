// wisp - A small Lisp with an incremental reader
// Copyright (c) 2025 Tom Waddington. MIT licensed.

use std::cell::RefCell;
use std::collections::HashMap;
use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::process;
use std::rc::Rc;

use log::{debug, info};
use wisp_core::{
    Error, LineResult, Outcome, Session, SessionConfig, Symbol, Value, native_binding,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Line shortcuts, honoured only when no form is in progress.
const ALIASES: &[(&str, &str)] = &[("!x", "(exit)"), ("!!", "(exit)"), ("!q", "(rep-end)")];

/// Requests made by host bindings, applied once the current line is done.
#[derive(Debug, Clone, PartialEq)]
enum HostCommand {
    Exit(i32),
    Select(String),
    End(String),
}

/// State shared between the host bindings and the REPL loop.
#[derive(Debug, Default)]
struct HostState {
    active: String,
    ids: Vec<String>,
    commands: Vec<HostCommand>,
}

type SharedState = Rc<RefCell<HostState>>;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = env::args().collect();

    if args.len() == 2 && (args[1] == "--version" || args[1] == "-v") {
        println!("Wisp v{}", VERSION);
        return;
    }

    if args.len() > 1 {
        run_files(&args[1..]);
    } else {
        run_repl();
    }
}

// =============================================================================
// Files
// =============================================================================

/// Evaluate a sequence of source files in one session
fn run_files(files: &[String]) {
    let state = Rc::new(RefCell::new(HostState::default()));
    let mut session = Session::new("1", host_bindings(&state), SessionConfig::default());

    for file_path in files {
        if let Err(e) = eval_file(file_path, &mut session) {
            eprintln!("{}", e);
            process::exit(1);
        }
        let commands = std::mem::take(&mut state.borrow_mut().commands);
        for command in commands {
            if let HostCommand::Exit(code) = command {
                process::exit(code);
            }
        }
    }
}

/// Evaluate a single source file
fn eval_file(file_path: &str, session: &mut Session) -> Result<(), String> {
    let path = Path::new(file_path);

    match path.extension().and_then(|e| e.to_str()) {
        Some("wisp") => {}
        Some(ext) => {
            return Err(format!(
                "Error: unsupported file extension '.{}' for '{}'",
                ext, file_path
            ));
        }
        None => {
            return Err(format!(
                "Error: file '{}' has no extension (expected .wisp)",
                file_path
            ));
        }
    }

    let source =
        fs::read_to_string(path).map_err(|e| format!("Error reading '{}': {}", file_path, e))?;

    info!("evaluating {}", file_path);
    session
        .eval_source(&source)
        .map(|_| ())
        .map_err(|e| format!("Error in '{}': {}", file_path, e))
}

// =============================================================================
// REPL
// =============================================================================

/// The sessions of one REPL process, one of which is active.
struct Repl {
    state: SharedState,
    sessions: HashMap<String, Session>,
}

impl Repl {
    fn new() -> Self {
        let mut repl = Repl {
            state: Rc::new(RefCell::new(HostState::default())),
            sessions: HashMap::new(),
        };
        repl.select("1");
        repl
    }

    fn active_id(&self) -> String {
        self.state.borrow().active.clone()
    }

    fn active(&mut self) -> Option<&mut Session> {
        let id = self.active_id();
        self.sessions.get_mut(&id)
    }

    fn prompt(&self) -> String {
        format!("[{}]:> ", self.active_id())
    }

    /// Prompt for the next line, indented by the reader's nesting depth.
    fn continuation_prompt(&self, depth: usize) -> String {
        if depth == 0 {
            return self.prompt();
        }
        format!(
            "{}{}",
            " .".repeat(depth),
            " ".repeat(self.prompt().len() + depth * 2)
        )
    }

    /// Make `id` active, creating its session on first use.
    fn select(&mut self, id: &str) {
        if !self.sessions.contains_key(id) {
            debug!("creating session {}", id);
            let session = Session::new(id, host_bindings(&self.state), SessionConfig::default());
            self.sessions.insert(id.to_string(), session);
            self.state.borrow_mut().ids.push(id.to_string());
        }
        self.state.borrow_mut().active = id.to_string();
    }

    /// Drop session `id`. Returns false once no session is left.
    fn end(&mut self, id: &str) -> bool {
        self.sessions.remove(id);
        let mut state = self.state.borrow_mut();
        state.ids.retain(|known| known != id);
        if state.active == id {
            match state.ids.first() {
                Some(next) => state.active = next.clone(),
                None => return false,
            }
        }
        true
    }

    /// Feed one raw input line to the active session and report what it did.
    fn handle_line(&mut self, line: &str) -> String {
        let ready = self.active().is_some_and(|s| s.status().is_ready());
        let line = match ALIASES.iter().find(|(alias, _)| *alias == line.trim()) {
            Some((_, expansion)) if ready => *expansion,
            _ => line,
        };

        let Some(session) = self.active() else {
            return self.prompt();
        };
        let result = session.read_line(line);
        print_outcomes(&result);

        self.apply_commands();
        self.continuation_prompt(result.status.depth)
    }

    fn apply_commands(&mut self) {
        let commands = std::mem::take(&mut self.state.borrow_mut().commands);
        for command in commands {
            match command {
                HostCommand::Exit(code) => process::exit(code),
                HostCommand::Select(id) => self.select(&id),
                HostCommand::End(id) => {
                    if !self.end(&id) {
                        process::exit(0);
                    }
                }
            }
        }
    }

    /// End of input: abandon a partial form, or leave when there is none.
    fn interrupt(&mut self) -> bool {
        match self.active() {
            Some(session) if !session.status().is_ready() => {
                println!("*Break*");
                session.reset();
                true
            }
            _ => false,
        }
    }
}

fn print_outcomes(result: &LineResult) {
    for outcome in &result.outcomes {
        match outcome {
            Outcome::Value(value) => println!("=> {}\n", value),
            Outcome::EvalError(err) => println!("** Error: {} [eval] **\n", err),
            Outcome::ParseError(err) => println!("** Error: {} **\n", err),
        }
    }
}

/// Run the interactive REPL
fn run_repl() {
    println!("Wisp v{}", VERSION);

    let mut repl = Repl::new();
    let mut prompt = repl.prompt();

    loop {
        print!("{}", prompt);
        if let Err(e) = io::stdout().flush() {
            eprintln!("Write error: {}", e);
            break;
        }

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(0) => {
                if repl.interrupt() {
                    prompt = repl.prompt();
                    continue;
                }
                println!();
                break;
            }
            Ok(_) => {
                let line = input.trim_end_matches(['\n', '\r']);
                prompt = repl.handle_line(line);
            }
            Err(e) => {
                eprintln!("Read error: {}", e);
                break;
            }
        }
    }
}

// =============================================================================
// Host bindings
// =============================================================================

/// Session id named by a binding argument: strings raw, anything else printed.
fn session_id(value: &Value) -> String {
    match value {
        Value::String(s) => s.to_string(),
        other => other.to_string(),
    }
}

fn host_bindings(state: &SharedState) -> Vec<(Symbol, Value)> {
    let mut bindings = vec![
        (
            Symbol::new("lst"),
            Value::list([Value::number(1.0), Value::number(2.0), Value::number(3.0)]),
        ),
        native_binding("double", |args| match args.first() {
            Some(Value::Number(n)) => Ok(Value::number(2.0 * n)),
            Some(other) => Err(Error::type_error_in("double", "number", other)),
            None => Err(Error::arity(1, 0)),
        }),
        native_binding("print", |args| {
            let text: Vec<String> = args.iter().map(session_id).collect();
            println!("{}", text.join(" "));
            Ok(Value::Void)
        }),
    ];

    let exit_state = state.clone();
    bindings.push(native_binding("exit", move |args| {
        let code = match args.first() {
            Some(Value::Number(n)) => *n as i32,
            _ => 0,
        };
        exit_state.borrow_mut().commands.push(HostCommand::Exit(code));
        Ok(Value::Void)
    }));

    let select_state = state.clone();
    bindings.push(native_binding("rep-select", move |args| {
        let Some(id) = args.first() else {
            return Err(Error::arity(1, 0));
        };
        let id = session_id(id);
        select_state
            .borrow_mut()
            .commands
            .push(HostCommand::Select(id.clone()));
        Ok(Value::string(id))
    }));

    let list_state = state.clone();
    bindings.push(native_binding("rep-list", move |_| {
        let ids = list_state.borrow().ids.clone();
        Ok(Value::list(ids.into_iter().map(Value::string)))
    }));

    let end_state = state.clone();
    bindings.push(native_binding("rep-end", move |args| {
        let mut state = end_state.borrow_mut();
        let id = match args.first() {
            Some(id) => session_id(id),
            None => state.active.clone(),
        };
        if !state.ids.contains(&id) {
            let message = format!("{} is not here", id);
            return Err(Error::thrown("rep.missing", Value::string(message)));
        }
        state.commands.push(HostCommand::End(id.clone()));
        Ok(Value::string(id))
    }));

    bindings
}
