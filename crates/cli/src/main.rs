use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use parley_core::{ChoiceSet, Intent, SuggestionList};
use parley_engine::{speak_selection, EngineConfig, SpeechSink, SuggestionEngine};
use parley_observability::{init_tracing, EngineMetrics};
use serde::Serialize;

#[derive(Debug, Parser)]
#[command(name = "parley")]
#[command(about = "Tap-to-speak reply suggestions")]
struct Cli {
    /// Directory of JSON symbol packs layered over the built-in table.
    #[arg(long, env = "PARLEY_LEXICON_DIR")]
    lexicon_dir: Option<PathBuf>,

    /// JSON file replacing the built-in reply templates.
    #[arg(long, env = "PARLEY_TEMPLATES_PATH")]
    templates: Option<PathBuf>,

    #[arg(long, env = "PARLEY_MAX_INPUT_CHARS")]
    max_input_chars: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    Suggest {
        text: String,
        #[arg(long)]
        json: bool,
    },
    Classify {
        text: String,
    },
    Symbol {
        token: String,
    },
    Chat,
}

#[derive(Debug, Serialize)]
struct Classification<'a> {
    intent: Intent,
    choices: &'a ChoiceSet,
}

/// Prints the phrase where a speech synthesizer would say it.
struct TerminalSpeech<W: Write> {
    out: W,
}

impl<W: Write> SpeechSink for TerminalSpeech<W> {
    fn speak(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "🔊 {text}")?;
        Ok(())
    }
}

fn main() -> Result<()> {
    init_tracing("parley_cli");
    let cli = Cli::parse();

    let engine = build_engine(&cli)?;

    match cli.command {
        Command::Suggest { text, json } => {
            let suggestions = engine.generate(&text);
            if json {
                println!("{}", serde_json::to_string_pretty(&suggestions)?);
            } else {
                print_suggestions(&mut io::stdout(), &suggestions)?;
            }
        }
        Command::Classify { text } => {
            let intent = engine.classify(&text);
            let choices = match intent {
                Intent::Choice => engine.extract_choices(&text),
                _ => ChoiceSet::new(),
            };
            let classification = Classification {
                intent,
                choices: &choices,
            };
            println!("{}", serde_json::to_string_pretty(&classification)?);
        }
        Command::Symbol { token } => {
            println!("{}", engine.resolve_symbol(&token));
        }
        Command::Chat => run_chat(&engine)?,
    }

    Ok(())
}

fn run_chat(engine: &SuggestionEngine) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut speech = TerminalSpeech { out: io::stdout() };

    println!("Parley chat mode. Type what the partner says; 'exit' to quit.");

    loop {
        print!("partner> ");
        io::stdout().flush()?;

        let Some(line) = lines.next().transpose()? else {
            break;
        };
        let message = line.trim();
        if message.eq_ignore_ascii_case("exit") || message.eq_ignore_ascii_case("quit") {
            break;
        }
        if message.is_empty() {
            continue;
        }

        let suggestions = engine.generate(message);
        print_suggestions(&mut io::stdout(), &suggestions)?;

        print!("pick [1-{}, enter to skip]> ", suggestions.len());
        io::stdout().flush()?;
        let Some(pick) = lines.next().transpose()? else {
            break;
        };

        match pick.trim().parse::<usize>() {
            Ok(number) if number >= 1 => {
                if speak_selection(&mut speech, &suggestions, number - 1)?.is_none() {
                    println!("no suggestion #{number}");
                }
            }
            _ => {}
        }
        println!();
    }

    Ok(())
}

fn print_suggestions(out: &mut impl Write, suggestions: &SuggestionList) -> Result<()> {
    for (position, suggestion) in suggestions.iter().enumerate() {
        writeln!(out, "{}. {} {}", position + 1, suggestion.symbol, suggestion.text)?;
    }
    Ok(())
}

fn build_engine(cli: &Cli) -> Result<SuggestionEngine> {
    let mut config = EngineConfig::from_env();
    if let Some(dir) = &cli.lexicon_dir {
        config = config.with_lexicon_dir(dir);
    }
    if let Some(path) = &cli.templates {
        config = config.with_templates_path(path);
    }
    if let Some(max) = cli.max_input_chars {
        config = config.with_max_input_chars(max);
    }

    SuggestionEngine::from_config(&config, EngineMetrics::shared())
}
