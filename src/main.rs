// CodeMaster: terminal code-learning dashboard with a sandboxed script runner

use std::fs::{self, File};
use std::io;
use std::process::ExitCode;

use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use env_logger::{Env, Target};
use log::{error, info};
use ratatui::{backend::CrosstermBackend, Terminal};

use codemaster::cli::Args;
use codemaster::config::{get_config_path, AppConfig};
use codemaster::dashboard::Dashboard;
use codemaster::error::{Error, Result};
use codemaster::runner::{CodeRunner, ExecutionResult};
use codemaster::ui::App;

fn main() -> ExitCode {
    let args = Args::parse();

    match run(&args) {
        Ok(code) => code,
        Err(err) => {
            error!("{}", err);
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<ExitCode> {
    init_logging(args)?;

    let config_path = get_config_path(&args.config);
    let config = AppConfig::load(&config_path)?.with_overrides(args.timeout_ms, args.max_steps);
    let runner = CodeRunner::new(config.limits()?);

    let source = match &args.script {
        Some(path) => Some(fs::read_to_string(path).map_err(|e| Error::io_error("script", path, e))?),
        None => None,
    };

    match (args.run, source) {
        (true, Some(source)) => Ok(run_headless(&runner, &source)),
        (_, source) => {
            let mut dashboard = Dashboard::new(runner, config.analysis_delay(), config.start_tab()?);
            if let Some(source) = source {
                dashboard.editor.load(&source);
            }
            run_dashboard(dashboard)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Headless mode logs to stderr; the dashboard logs only when given a file
fn init_logging(args: &Args) -> Result<()> {
    if args.run {
        env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
    } else if let Some(path) = &args.log_file {
        let file = File::create(path).map_err(|e| Error::io_error("log", path, e))?;
        env_logger::Builder::from_env(Env::default().default_filter_or("info"))
            .target(Target::Pipe(Box::new(file)))
            .init();
    }
    Ok(())
}

fn run_headless(runner: &CodeRunner, source: &str) -> ExitCode {
    let report = runner.run_report(source);
    info!(
        "headless run finished in {:?} after {} steps",
        report.elapsed, report.steps
    );

    match report.result {
        ExecutionResult::Output(lines) => {
            for line in lines {
                println!("{}", line);
            }
            ExitCode::SUCCESS
        }
        ExecutionResult::Failure(message) => {
            eprintln!("{}", message);
            ExitCode::FAILURE
        }
    }
}

fn run_dashboard(dashboard: Dashboard) -> Result<()> {
    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(dashboard);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res.map_err(Error::from)
}
