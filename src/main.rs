// steptrace: step through a short program line by line

use std::collections::VecDeque;
use std::error::Error;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::EnvFilter;

use steptrace::interpreter::constants::{CLI_STEP_LIMIT, DEFAULT_TAB_WIDTH};
use steptrace::interpreter::engine::{Simulator, SimulatorConfig};
use steptrace::interpreter::errors::SimError;
use steptrace::program::payload::PAYLOAD_SLOT;
use steptrace::program::{load_record, DirStore, LoadOutcome, MemoryStore, ProgramRecord};
use steptrace::ui::App;

/// Step-through tracer for short C, Java, Python and JavaScript snippets
#[derive(Debug, Parser)]
#[command(name = "steptrace", version, about)]
struct Args {
    /// Source file to trace (a JSON program record with --record)
    #[arg(required_unless_present = "store")]
    path: Option<PathBuf>,

    /// Treat PATH as a JSON program record instead of source text
    #[arg(long)]
    record: bool,

    /// Read the program record from the `visualizer_payload` slot in this directory
    #[arg(long, value_name = "DIR", conflicts_with = "path")]
    store: Option<PathBuf>,

    /// Language label shown in the header for a plain source file
    #[arg(long, value_name = "LABEL", default_value = "unknown")]
    language: String,

    /// Columns a tab expands to
    #[arg(long, default_value_t = DEFAULT_TAB_WIDTH)]
    tab_width: usize,

    /// Maximum number of forward steps; 0 removes the cap
    #[arg(long, default_value_t = CLI_STEP_LIMIT)]
    step_limit: usize,

    /// Write diagnostics to this file (filter with RUST_LOG)
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Print the trace instead of starting the terminal UI
    #[arg(long)]
    headless: bool,

    /// Answer for the next input request in headless mode (repeatable)
    #[arg(long = "input", value_name = "TEXT")]
    inputs: Vec<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        init_logging(path)?;
    }

    let outcome = load(&args)?;
    let notice = outcome.status_message();
    let record = match outcome {
        LoadOutcome::Ready(record) | LoadOutcome::Empty(record) => record,
        LoadOutcome::NothingLoaded | LoadOutcome::Unreadable(_) => ProgramRecord::default(),
    };

    let config = SimulatorConfig {
        tab_width: args.tab_width,
        step_limit: (args.step_limit > 0).then_some(args.step_limit),
    };
    let sim = Simulator::new(record, config);

    if args.headless {
        if let Some(notice) = &notice {
            eprintln!("{}", notice);
        }
        run_headless(sim, args.inputs);
        return Ok(());
    }

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create and run app
    let mut app = App::new(sim, notice);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

/// Install a file-backed subscriber; the terminal belongs to the UI
fn init_logging(path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("steptrace=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Resolve the command line into a load outcome
fn load(args: &Args) -> Result<LoadOutcome, Box<dyn Error>> {
    if let Some(dir) = &args.store {
        return Ok(load_record(&DirStore::new(dir)));
    }

    let path = args.path.as_deref().ok_or("no input file provided")?;
    if !path.exists() {
        return Err(format!("file '{}' not found", path.display()).into());
    }
    let text = fs::read_to_string(path)?;

    if args.record {
        let mut store = MemoryStore::new();
        store.write_slot(PAYLOAD_SLOT, text);
        return Ok(load_record(&store));
    }

    let title = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Code Visualizer".to_string());
    let record = ProgramRecord::from_code(text, title, args.language.clone());
    Ok(if record.code.trim().is_empty() {
        LoadOutcome::Empty(record)
    } else {
        LoadOutcome::Ready(record)
    })
}

/// Step to the end, answering input requests from `inputs`, then print the trace
fn run_headless(mut sim: Simulator, inputs: Vec<String>) {
    let mut inputs: VecDeque<String> = inputs.into();

    loop {
        if let Some(request) = sim.pending_input() {
            let Some(answer) = inputs.pop_front() else {
                eprintln!("Stopped: {} (no --input left)", request.description);
                break;
            };
            if let Err(e) = sim.submit_input(&answer) {
                eprintln!("Input refused: {}", e);
                break;
            }
            continue;
        }

        match sim.step_forward() {
            Ok(()) => {}
            Err(SimError::Finished) | Err(SimError::EmptyProgram) => break,
            Err(e) => {
                eprintln!("Stopped: {}", e);
                break;
            }
        }
    }

    for entry in sim.log() {
        println!("L{}: {}", entry.line, entry.message);
    }

    let output = sim.output().text();
    if !output.is_empty() {
        println!();
        print!("{}", output);
        if !output.ends_with('\n') {
            println!();
        }
    }
}
