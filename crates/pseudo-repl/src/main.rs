use std::{
    io::{self, IsTerminal, Read},
    path::PathBuf,
};

use anyhow::Result;
use clap::{value_parser, Arg, ArgAction, Command};
use pseudo_core::{
    init_tracing, ConversionMethod, ConversionResult, PseudoConfig, RuleCatalog, RuleSummary,
    MAX_INDENT_SIZE,
};
use pseudo_repl::{
    convert_file, resolve_options, BlockCollector, CliOverrides, LineProcessResult, Repl,
};
use tracing::debug;

fn main() -> Result<()> {
    let matches = Command::new("pseudo-repl")
        .version(pseudo_core::VERSION)
        .about("Convert exam pseudo-code to Python, interactively or from a file")
        .arg(
            Arg::new("file")
                .value_name("FILE")
                .help("Pseudo-code file to convert")
                .value_parser(value_parser!(PathBuf))
                .index(1),
        )
        .arg(
            Arg::new("options")
                .long("options")
                .value_name("FILE")
                .help("JSON file with conversion options")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("method")
                .long("method")
                .short('m')
                .value_name("METHOD")
                .help("Conversion method")
                .value_parser(["pattern", "rules", "tree", "ast", "hybrid"]),
        )
        .arg(
            Arg::new("indent")
                .long("indent")
                .value_name("N")
                .help("Spaces per indentation level")
                .value_parser(value_parser!(u8).range(0..=MAX_INDENT_SIZE as i64)),
        )
        .arg(
            Arg::new("comments")
                .long("comments")
                .help("Include comments in generated code")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("steps")
                .long("steps")
                .help("Print the step trace")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-validate")
                .long("no-validate")
                .help("Skip the post-conversion consistency check")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print the full conversion result as JSON")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("rules")
                .long("rules")
                .help("Print the rule catalog as JSON and exit")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .short('q')
                .help("Hide the summary line")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log conversion internals to stderr")
                .action(ArgAction::Count),
        )
        .get_matches();

    init_logging(matches.get_count("verbose"));

    if matches.get_flag("rules") {
        let rules: Vec<RuleSummary> = RuleCatalog::global()
            .all()
            .iter()
            .map(RuleSummary::from)
            .collect();
        println!("{}", serde_json::to_string_pretty(&rules)?);
        return Ok(());
    }

    let method = matches
        .get_one::<String>("method")
        .map(|name| name.parse::<ConversionMethod>())
        .transpose()?;
    let overrides = CliOverrides {
        method,
        indent_size: matches.get_one::<u8>("indent").map(|&n| usize::from(n)),
        include_comments: matches.get_flag("comments"),
        include_debug_info: matches.get_flag("steps"),
        no_validate: matches.get_flag("no-validate"),
    };
    let options = resolve_options(
        matches.get_one::<PathBuf>("options").map(PathBuf::as_path),
        &PseudoConfig::default(),
        &overrides,
    )?;
    debug!(?options, "resolved conversion options");

    let mut repl = Repl::new(options);
    repl.set_quiet(matches.get_flag("quiet"));
    let json = matches.get_flag("json");

    if let Some(path) = matches.get_one::<PathBuf>("file") {
        let result = convert_file(path, repl.options())?;
        return finish_batch(&mut repl, result, json);
    }

    if !io::stdin().is_terminal() {
        let mut source = String::new();
        io::stdin().read_to_string(&mut source)?;
        let result = pseudo_core::convert(&source, repl.options());
        return finish_batch(&mut repl, result, json);
    }

    println!("Pseudo REPL v{}", pseudo_core::VERSION);
    println!("Method: {}", repl.options().method);
    println!("Type .help for help, .quit to exit");
    println!();

    run_repl(&mut repl)
}

fn init_logging(verbosity: u8) {
    if verbosity == 0 {
        init_tracing();
        return;
    }

    let level = if verbosity == 1 { "debug" } else { "trace" };
    let filter = tracing_subscriber::EnvFilter::new(format!(
        "pseudo_core={level},pseudo_repl={level}"
    ));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Print a one-shot result and exit non-zero when it failed
fn finish_batch(repl: &mut Repl, result: ConversionResult, json: bool) -> Result<()> {
    let success = result.success;
    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        repl.report(result)?;
    }

    if !success {
        std::process::exit(1);
    }
    Ok(())
}

fn run_repl(repl: &mut Repl) -> Result<()> {
    use rustyline::{error::ReadlineError, DefaultEditor};

    let mut rl = DefaultEditor::new()?;
    let mut collector = BlockCollector::new();

    while repl.is_running() {
        match rl.readline(collector.get_prompt()) {
            Ok(line) => {
                let trimmed = line.trim();

                // Commands are only recognized between blocks
                if !collector.is_collecting() && trimmed.starts_with('.') && trimmed != "." {
                    rl.add_history_entry(&line)?;
                    match repl.parse_input(trimmed) {
                        Ok(command) => match repl.handle_command(command) {
                            Ok(output) => repl.notifier().on_output(&output),
                            Err(e) => repl.notifier().on_error(&format!("Error: {e}")),
                        },
                        Err(e) => repl.notifier().on_error(&format!("Error: {e}")),
                    }
                    continue;
                }

                if let LineProcessResult::Complete(block) = collector.process_line(&line) {
                    rl.add_history_entry(&block)?;
                    if let Err(e) = repl.convert(&block) {
                        repl.notifier().on_error(&format!("Error: {e}"));
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                if collector.is_collecting() {
                    println!("^C");
                    collector.reset();
                } else {
                    println!("Use .quit to exit");
                }
            }
            Err(ReadlineError::Eof) => {
                // Convert whatever is pending before leaving
                if let LineProcessResult::Complete(block) = collector.process_line("") {
                    if let Err(e) = repl.convert(&block) {
                        repl.notifier().on_error(&format!("Error: {e}"));
                    }
                }
                println!("Goodbye!");
                break;
            }
            Err(err) => {
                eprintln!("Error: {err}");
                break;
            }
        }
    }

    repl.show_exit_stats();

    Ok(())
}
