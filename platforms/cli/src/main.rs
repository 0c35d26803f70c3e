use clap::Parser;
use pda::{
    Automaton, Definition, Halt, ProgramLoader, ProgramManager, SearchBudget, Step, Symbol,
};
use std::error::Error;
use std::io::{self, Read};
use std::path::Path;
use tracing::{info, warn, Level};

/// Runs a pushdown automaton over one or more input words.
#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(after_help = "EXAMPLES:
  pda-cli --builtin 'a^n b^n' -i aabb -i aab
  pda-cli --program programs/wcwr.json -i abcba --trace
  cat programs/even-palindromes.json | pda-cli -i abba")]
struct Cli {
    /// The automaton definition file (JSON) to execute
    #[clap(short, long, conflicts_with = "builtin")]
    program: Option<String>,

    /// The name of a built-in automaton
    #[clap(short, long)]
    builtin: Option<String>,

    /// An input word; each character is one symbol
    #[clap(short, long)]
    input: Vec<String>,

    /// Also run the interactive stepper and print its trace
    #[clap(short, long)]
    trace: bool,

    /// Maximum number of configurations the recognizer expands
    #[clap(long)]
    max_steps: Option<usize>,

    /// Maximum number of configurations the recognizer keeps in its frontier
    #[clap(long)]
    max_frontier: Option<usize>,

    /// List the built-in automata and exit
    #[clap(short, long)]
    list: bool,

    /// Log search and step details to stderr
    #[clap(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            Level::DEBUG
        } else {
            Level::WARN
        })
        .with_writer(io::stderr)
        .init();

    if cli.list {
        list_programs()?;
        return Ok(());
    }

    let definition = load_definition(&cli)?;
    info!(name = %definition.name, "loaded automaton");

    let automaton = Automaton::from_definition(&definition)?;
    let ambiguous = automaton.table().nondeterministic_keys();
    if cli.trace && !ambiguous.is_empty() {
        warn!(
            keys = ambiguous.len(),
            "stepper trace fires only the first registered effect of each key"
        );
    }
    let defaults = SearchBudget::default();
    let recognizer = automaton.recognizer().with_budget(SearchBudget {
        max_steps: cli.max_steps.unwrap_or(defaults.max_steps),
        max_frontier: cli.max_frontier.unwrap_or(defaults.max_frontier),
    });

    println!("{}", definition.name);
    for word in &cli.input {
        let input = Symbol::word(word);
        let search = recognizer.search(&input);
        println!(
            "'{}': {} (explored {}, peak frontier {})",
            word, search.outcome, search.explored, search.peak_frontier
        );

        if cli.trace {
            print_trace(&automaton, input)?;
        }
    }

    Ok(())
}

/// Loads the definition from a file, a built-in name, or piped stdin, in that order.
fn load_definition(cli: &Cli) -> Result<Definition, Box<dyn Error>> {
    let definition = if let Some(path) = &cli.program {
        ProgramLoader::load_program(Path::new(path))?
    } else if let Some(name) = &cli.builtin {
        ProgramManager::get_program_by_name(name)?
    } else if atty::isnt(atty::Stream::Stdin) {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        ProgramLoader::load_program_from_string(&buffer)?
    } else {
        return Err("No automaton given; use --program, --builtin or pipe a definition".into());
    };

    Ok(definition)
}

fn list_programs() -> Result<(), Box<dyn Error>> {
    for index in 0..ProgramManager::get_program_count() {
        let info = ProgramManager::get_program_info(index)?;
        println!(
            "{:<24} states: {:<3} transitions: {:<3} {}{}",
            info.name,
            info.state_count,
            info.transition_count,
            if info.deterministic {
                "deterministic"
            } else {
                "nondeterministic"
            },
            if info.epsilon_moves { ", epsilon moves" } else { "" }
        );
    }

    Ok(())
}

fn print_trace(automaton: &Automaton, input: Vec<Symbol>) -> Result<(), Box<dyn Error>> {
    let mut stepper = automaton.stepper();
    stepper.load(input);
    let run = stepper.run()?;

    for entry in &run.trace {
        println!("    {}", entry);
    }

    match run.halt {
        Halt::EndOfInput => println!("    end of input in {}", stepper.configuration()),
        Halt::Stuck(Step::UndefinedTransition {
            state,
            symbol,
            stack_top,
        }) => println!(
            "    undefined transition ({}, {}, {})",
            state, symbol, stack_top
        ),
        Halt::Stuck(step) => println!("    stopped: {:?}", step),
    }
    println!(
        "    stepper: {}",
        if run.accepted { "accepted" } else { "rejected" }
    );

    Ok(())
}
