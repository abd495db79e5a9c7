// Command-line interface for BabyScript
//
// This binary compiles BabyScript files to XML and decompiles XML back to BabyScript.
// The conversions themselves live in baby-babel; this crate only deals with arguments,
// configuration, files and exit codes.
//
// Usage:
//  babyscript <input>... [-o <path>]             - Convert, direction picked from the first input's extension
//  babyscript compile <input>... [-o <path>]     - BabyScript → XML
//  babyscript decompile <input>... [-o <path>]   - XML → BabyScript
//  babyscript inspect <path> [<transform>]       - Show tokens or the parse tree (defaults to "ast-json")
//  babyscript --list-transforms                  - List available transforms
//
// Output naming:
//
// With a single input the output defaults to out.xml (compile) or out.txt (decompile). An existing
// directory passed as --output receives that default name. With several inputs --output must be an
// existing directory (default "."), and each output is named after its input's stem.
//
// Exit codes: 0 success, 1 bad arguments, 2 configuration or table error, 3 invalid output
// directory, 4 at least one conversion failed.

mod transforms;

use baby_babel::{
    Compile, Conversion, ConversionRegistry, Decompile, Diagnostic, DiagnosticSink, Tables,
};
use baby_config::{load_tables, BabyConfig, Loader};
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use tracing::info;
use tracing_subscriber::EnvFilter;

const EXIT_USAGE: i32 = 1;
const EXIT_CONFIG: i32 = 2;
const EXIT_OUTPUT_DIR: i32 = 3;
const EXIT_CONVERSION: i32 = 4;

const PROJECT_CONFIG: &str = "babyscript.toml";

const SUBCOMMANDS: &[&str] = &["compile", "decompile", "inspect", "help"];

/// Options that consume the following argument as their value.
const VALUE_OPTIONS: &[&str] = &[
    "--config",
    "--nameconfig",
    "--anonattrconfig",
    "--output",
    "-o",
];

fn io_command(name: &'static str, about: &'static str, long_about: &'static str) -> Command {
    Command::new(name)
        .about(about)
        .long_about(long_about)
        .arg(
            Arg::new("input")
                .help("Input file paths")
                .required(true)
                .num_args(1..)
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .help("Output file, or directory for the generated files")
                .value_hint(ValueHint::AnyPath),
        )
}

fn build_cli() -> Command {
    Command::new("babyscript")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert between BabyScript and XML")
        .long_about(
            "Convert between BabyScript and XML.\n\n\
            When no subcommand is given, the direction is picked from the first input's\n\
            extension: .xml files are decompiled, everything else is compiled.\n\n\
            Examples:\n  \
            babyscript level.baby                   # Writes out.xml\n  \
            babyscript level.xml -o level.txt       # Decompile to level.txt\n  \
            babyscript compile a.baby b.baby -o out # Writes out/a.xml and out/b.xml",
        )
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .help("Path to a babyscript.toml configuration file")
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("nameconfig")
                .long("nameconfig")
                .global(true)
                .help("Name shortcut table (overrides tables.name_shortcuts)")
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("anonattrconfig")
                .long("anonattrconfig")
                .global(true)
                .help("Anonymous attribute table (overrides tables.anon_attributes)")
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .help("Log progress to stderr")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("list-transforms")
                .long("list-transforms")
                .help("List available inspect transforms")
                .action(ArgAction::SetTrue),
        )
        .subcommand(io_command(
            "compile",
            "Compile BabyScript to XML",
            "Compile BabyScript files to XML.\n\n\
            A file with syntax errors, or with anonymous attributes the configuration\n\
            has no names for, is reported and its output is not written.",
        ))
        .subcommand(io_command(
            "decompile",
            "Decompile XML to BabyScript",
            "Decompile XML files to BabyScript.\n\n\
            Attribute values that are not valid expressions are quoted, with a warning.",
        ))
        .subcommand(
            Command::new("inspect")
                .about("Show the tokens or parse tree of a BabyScript file")
                .arg(
                    Arg::new("path")
                        .help("Path to the BabyScript file")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("transform")
                        .help("Transform to apply (defaults to 'ast-json')")
                        .index(2)
                        .value_parser(clap::builder::PossibleValuesParser::new(
                            transforms::AVAILABLE_TRANSFORMS,
                        )),
                ),
        )
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    // First, try normal parsing. If no subcommand was given, inject one picked from the input.
    let cli = build_cli();
    let matches = match cli.clone().try_get_matches_from(&args) {
        Ok(m) => m,
        Err(e) => match inject_subcommand(&args) {
            Some(new_args) => match cli.try_get_matches_from(&new_args) {
                Ok(m) => m,
                Err(e2) => exit_with(e2),
            },
            None => exit_with(e),
        },
    };

    init_tracing(matches.get_flag("verbose"));

    if matches.get_flag("list-transforms") {
        handle_list_transforms_command();
        return;
    }

    match matches.subcommand() {
        Some(("inspect", sub_matches)) => {
            let path = sub_matches
                .get_one::<String>("path")
                .expect("path is required");
            let transform = sub_matches
                .get_one::<String>("transform")
                .map(String::as_str)
                .unwrap_or(transforms::DEFAULT_TRANSFORM);
            handle_inspect_command(path, transform);
        }
        Some((mode @ ("compile" | "decompile"), sub_matches)) => {
            let config = load_cli_config(&matches);
            let tables = match load_tables(&config.tables) {
                Ok(tables) => tables,
                Err(e) => {
                    eprintln!("{e}");
                    process::exit(EXIT_CONFIG);
                }
            };
            let inputs: Vec<String> = sub_matches
                .get_many::<String>("input")
                .expect("input is required")
                .cloned()
                .collect();
            let output = sub_matches.get_one::<String>("output").map(String::as_str);

            let registry = registry_from_config(&config);
            let conversion = match registry.get(mode) {
                Ok(conversion) => conversion,
                Err(e) => {
                    eprintln!("{e}");
                    process::exit(EXIT_USAGE);
                }
            };
            let code = handle_convert_command(conversion, &tables, &inputs, output);
            process::exit(code);
        }
        _ => {
            eprintln!("Unknown command");
            process::exit(EXIT_USAGE);
        }
    }
}

/// Rebuild `args` with a conversion subcommand in front when the first positional
/// argument is an input file rather than a subcommand.
fn inject_subcommand(args: &[String]) -> Option<Vec<String>> {
    let first_input = first_positional(args)?;
    if SUBCOMMANDS.contains(&first_input) {
        return None;
    }

    let mode = ConversionRegistry::with_defaults()
        .detect_from_filename(first_input)
        .unwrap_or_else(|| "compile".to_string());
    let mut new_args = vec![args[0].clone(), mode];
    new_args.extend_from_slice(&args[1..]);
    Some(new_args)
}

fn first_positional(args: &[String]) -> Option<&str> {
    let mut rest = args.iter().skip(1);
    while let Some(arg) = rest.next() {
        if VALUE_OPTIONS.contains(&arg.as_str()) {
            rest.next();
        } else if !arg.starts_with('-') {
            return Some(arg);
        }
    }
    None
}

/// Usage errors exit with 1; help and version output keep clap's own handling.
fn exit_with(error: clap::Error) -> ! {
    if error.use_stderr() {
        let _ = error.print();
        process::exit(EXIT_USAGE);
    }
    error.exit()
}

/// Directives for the binary and the conversion library when `RUST_LOG` is unset.
fn default_filter(verbose: bool) -> String {
    let level = if verbose { "info" } else { "warn" };
    format!("babyscript={level},baby_babel={level}")
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Prints every diagnostic to stderr as it arrives.
struct StderrSink;

impl DiagnosticSink for StderrSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        eprintln!("{diagnostic}");
    }
}

fn handle_inspect_command(path: &str, transform: &str) {
    let source = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file: {e}");
        process::exit(EXIT_USAGE);
    });

    match transforms::execute_transform(&source, transform) {
        Ok(output) => println!("{output}"),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(EXIT_USAGE);
        }
    }
}

fn handle_list_transforms_command() {
    println!("Available transforms:\n");
    for transform in transforms::AVAILABLE_TRANSFORMS {
        println!("  {transform}");
    }
}

/// Convert every input and return the process exit code.
fn handle_convert_command(
    conversion: &dyn Conversion,
    tables: &Tables,
    inputs: &[String],
    output: Option<&str>,
) -> i32 {
    let targets = match output_paths(inputs, output, conversion.target_extension()) {
        Ok(targets) => targets,
        Err(message) => {
            eprintln!("{message}");
            return EXIT_OUTPUT_DIR;
        }
    };

    let mut all_succeeded = true;
    let mut diagnostics = StderrSink;
    for (input, target) in inputs.iter().zip(&targets) {
        let source = match fs::read_to_string(input) {
            Ok(source) => source,
            Err(e) => {
                eprintln!("Failed to open {input} for reading: {e}");
                continue;
            }
        };

        info!("Converting {} to make {}", input, target.display());
        let converted = match conversion.convert(input, &source, tables, &mut diagnostics) {
            Ok(converted) => converted,
            Err(e) => {
                eprintln!("{e}");
                all_succeeded = false;
                continue;
            }
        };

        if let Err(e) = fs::write(target, converted) {
            eprintln!("Failed to open {} for writing: {e}", target.display());
            all_succeeded = false;
        }
    }

    if all_succeeded {
        0
    } else {
        EXIT_CONVERSION
    }
}

/// Work out where each input's output goes.
fn output_paths(
    inputs: &[String],
    output: Option<&str>,
    extension: &str,
) -> Result<Vec<PathBuf>, String> {
    if let [_single] = inputs {
        let default_name = format!("out.{extension}");
        let target = match output {
            None => PathBuf::from(default_name),
            Some(path) if Path::new(path).is_dir() => Path::new(path).join(default_name),
            Some(path) => PathBuf::from(path),
        };
        return Ok(vec![target]);
    }

    let directory = Path::new(output.unwrap_or("."));
    if !directory.is_dir() {
        return Err(format!(
            "{} does not refer to a valid output directory",
            directory.display()
        ));
    }

    Ok(inputs
        .iter()
        .map(|input| {
            let stem = Path::new(input)
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
            directory.join(format!("{stem}.{extension}"))
        })
        .collect())
}

fn load_cli_config(matches: &ArgMatches) -> BabyConfig {
    let mut loader = Loader::new().with_optional_file(PROJECT_CONFIG);
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }

    let overrides = [
        ("tables.name_shortcuts", "nameconfig"),
        ("tables.anon_attributes", "anonattrconfig"),
    ];
    for (key, flag) in overrides {
        if let Some(path) = matches.get_one::<String>(flag) {
            loader = loader.set_override(key, path.as_str()).unwrap_or_else(|e| {
                eprintln!("Invalid --{flag} value: {e}");
                process::exit(EXIT_CONFIG);
            });
        }
    }

    loader.build().unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {err}");
        process::exit(EXIT_CONFIG);
    })
}

/// Conversions carrying the formatting rules from `config`.
fn registry_from_config(config: &BabyConfig) -> ConversionRegistry {
    let mut registry = ConversionRegistry::new();
    registry.register(Compile::new((&config.compile).into()));
    registry.register(Decompile::new((&config.decompile).into()));
    registry
}
