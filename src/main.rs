use std::fs::File;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};

use calyx::ast::Program;
use calyx::error::CalyxError;
use calyx::interpreter::Interpreter;
use calyx::lexer::Lexer;
use calyx::parser::Parser;
use calyx::token::Token;

#[derive(ClapParser, Debug)]
#[command(version, about = "Calyx language interpreter", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    commands: Commands,

    /// Enable logging to app.log
    #[arg(long, global = true)]
    log: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes a file, printing each token
    Tokenize {
        filename: PathBuf,

        /// Dump the token vector as pretty JSON
        #[arg(long)]
        json: bool,
    },

    /// Parses a file and prints its AST as pretty JSON
    Parse { filename: PathBuf },

    /// Evaluates a file and prints the resulting value
    Eval { filename: PathBuf },

    /// Runs a file as a Calyx program
    Run { filename: PathBuf },

    /// Starts an interactive session against one persistent environment
    Repl,
}

/// Reads a source file into a String.
fn read_file(filename: &Path) -> Result<String> {
    info!("Reading file: {:?}", filename);

    let source: String = std::fs::read_to_string(filename)
        .context(format!("Failed to read file {:?}", filename))?;

    info!("Read {} bytes from {:?}", source.len(), filename);

    Ok(source)
}

fn init_logger() -> Result<()> {
    // Create or open the log file
    let log_file = File::create("app.log").context("Failed to create app.log")?;

    // Configure env_logger to write to file with module path and source line
    Builder::new()
        .format(|buf, record| {
            // Strip 'calyx::' from module path
            let module = record
                .module_path()
                .unwrap_or("<unnamed>")
                .strip_prefix("calyx::")
                .unwrap_or(record.module_path().unwrap_or("<unnamed>"));
            writeln!(
                buf,
                "[{}:{}] - {}",
                module,
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter(None, log::LevelFilter::Debug) // Default to Debug, override with RUST_LOG
        .init();

    info!("Logger initialized, writing to app.log");
    Ok(())
}

/// sysexits-style classification: 65 for source errors, 70 for runtime ones.
fn exit_code(err: &CalyxError) -> u8 {
    match err {
        CalyxError::UnrecognizedToken { .. }
        | CalyxError::UnexpectedToken { .. }
        | CalyxError::Parse { .. } => 65,
        _ => 70,
    }
}

fn lex_and_parse(source: &str, filename: &Path) -> std::result::Result<Program, CalyxError> {
    let name: Option<&str> = filename.to_str();
    let tokens: Vec<Token> = Lexer::new(source, name).tokenize()?;

    Parser::new(&tokens).parse()
}

fn repl() -> Result<()> {
    let interpreter = Interpreter::new();
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    println!("calyx repl — Ctrl-D exits");

    loop {
        print!(">> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            println!();
            return Ok(());
        }

        if line.trim().is_empty() {
            continue;
        }

        let result = Lexer::new(&line, Some("repl"))
            .tokenize()
            .and_then(|tokens| Parser::new(&tokens).parse())
            .and_then(|program| interpreter.run(&program));

        match result {
            Ok(value) => println!("{}", value),
            Err(e) => eprintln!("{}", e),
        }
    }
}

fn main() -> Result<ExitCode> {
    let args: Cli = Cli::parse();

    // Initialize logger only if --log flag is provided
    if args.log {
        init_logger()?;
    } else {
        // Initialize a minimal logger to avoid "no logger" errors
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Off)
            .init();
    }

    info!("CLI arguments: {:?}", args);

    match args.commands {
        Commands::Tokenize { filename, json } => {
            info!("Running Tokenize subcommand");

            let source: String = read_file(&filename)?;

            match Lexer::new(&source, filename.to_str()).tokenize() {
                Ok(tokens) => {
                    if json {
                        println!("{}", serde_json::to_string_pretty(&tokens)?);
                    } else {
                        for token in &tokens {
                            debug!("Scanned token: {}", token);
                            println!("{}", token);
                        }
                    }

                    info!("Tokenization completed successfully");
                }

                Err(e) => {
                    debug!("Tokenization failed: {}", e);
                    eprintln!("{}", e);
                    return Ok(ExitCode::from(exit_code(&e)));
                }
            }
        }

        Commands::Parse { filename } => {
            info!("Running Parse subcommand");

            let source: String = read_file(&filename)?;

            match lex_and_parse(&source, &filename) {
                Ok(program) => {
                    info!("Parsed {} statements", program.statements.len());
                    println!("{}", serde_json::to_string_pretty(&program)?);
                }

                Err(e) => {
                    debug!("Parse failed: {}", e);
                    eprintln!("{}", e);
                    return Ok(ExitCode::from(exit_code(&e)));
                }
            }
        }

        Commands::Eval { filename } => {
            info!("Running Eval subcommand");

            let source: String = read_file(&filename)?;
            let interpreter = Interpreter::new();

            match lex_and_parse(&source, &filename)
                .and_then(|program| interpreter.run(&program))
            {
                Ok(value) => {
                    debug!("Evaluated to: {}", value);
                    println!("{}", value);
                }

                Err(e) => {
                    debug!("Evaluation failed: {}", e);
                    eprintln!("{}", e);
                    return Ok(ExitCode::from(exit_code(&e)));
                }
            }
        }

        Commands::Run { filename } => {
            info!("Running Run subcommand");

            let source: String = read_file(&filename)?;
            let interpreter = Interpreter::new();

            match lex_and_parse(&source, &filename)
                .and_then(|program| interpreter.run(&program))
            {
                Ok(_) => {
                    info!("Program executed successfully");
                }

                Err(e) => {
                    debug!("Run failed: {}", e);
                    eprintln!("{}", e);
                    return Ok(ExitCode::from(exit_code(&e)));
                }
            }
        }

        Commands::Repl => {
            info!("Running Repl subcommand");
            repl()?;
        }
    }

    Ok(ExitCode::SUCCESS)
}
