use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of the transforms from src/transforms.rs
// We need to duplicate this here since build scripts can't access src/ modules
const AVAILABLE_TRANSFORMS: &[&str] = &["token-json", "token-simple", "ast-json"];

fn io_command(name: &'static str, about: &'static str) -> Command {
    Command::new(name)
        .about(about)
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
                .help("Output file or directory")
                .value_hint(ValueHint::AnyPath),
        )
}

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = Command::new("babyscript")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert between BabyScript and XML")
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("nameconfig")
                .long("nameconfig")
                .global(true)
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("anonattrconfig")
                .long("anonattrconfig")
                .global(true)
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("list-transforms")
                .long("list-transforms")
                .action(ArgAction::SetTrue),
        )
        .subcommand(io_command("compile", "Compile BabyScript to XML"))
        .subcommand(io_command("decompile", "Decompile XML to BabyScript"))
        .subcommand(
            Command::new("inspect")
                .about("Show the tokens or parse tree of a BabyScript file")
                .arg(
                    Arg::new("path")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("transform")
                        .index(2)
                        .value_parser(clap::builder::PossibleValuesParser::new(
                            AVAILABLE_TRANSFORMS,
                        )),
                ),
        );

    // Generate completions for bash
    generate_to(Bash, &mut cmd, "babyscript", &outdir)?;

    // Generate completions for zsh
    generate_to(Zsh, &mut cmd, "babyscript", &outdir)?;

    // Generate completions for fish
    generate_to(Fish, &mut cmd, "babyscript", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
