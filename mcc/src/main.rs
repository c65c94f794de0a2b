mod msg;

use clap::Parser;
use mcc::error::SemanticError;
use mcc::{Error, Options};
use msg::Msg;
use std::path::Path;
use std::process::ExitCode;

const HELP_TEMPLATE: &str = "\
{before-help}{bin} {version}
  {author}
  {about}

{usage-heading}
{tab}{usage}

{all-args}{after-help}";

#[derive(Debug, clap::Parser)]
#[clap(author, version, about, help_template = HELP_TEMPLATE)]
struct Args {
    /// Input file
    #[clap(default_value = "main.mc")]
    input: String,

    /// Output file [default: input with `.s` extension]
    #[clap(short, long)]
    output: Option<String>,

    /// Dump generated assembly and symbol table
    #[clap(short, long)]
    verbose: bool,

    /// Compiler options (YAML)
    #[clap(short, long)]
    config: Option<String>,

    /// Write the symbol table as JSON
    #[clap(short, long)]
    symbols: Option<String>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    println!("Mini-C Compiler");

    println!("1. Read Source");
    println!("  < {}", args.input);
    let source = match std::fs::read_to_string(&args.input) {
        Ok(source) => source,
        Err(e) => {
            Msg::Error(format!("cannot read `{}`: {}", args.input, e)).print();
            return ExitCode::FAILURE;
        }
    };
    let options = match &args.config {
        Some(path) => match Options::load(path) {
            Ok(options) => options,
            Err(e) => {
                Msg::Error(e.to_string()).print();
                return ExitCode::FAILURE;
            }
        },
        None => Options::default(),
    };

    println!("2. Compile");
    let unit = match mcc::compile_unit(&source, &options) {
        Ok(unit) => unit,
        Err(e) => {
            let raw = source.lines().nth(e.line().saturating_sub(1)).unwrap_or("");
            Msg::Error(e.to_string()).diag(&args.input, e.line(), raw);
            if let Error::Semantic {
                source: SemanticError::RegistersExhausted(class),
                ..
            } = &e
            {
                Msg::Note(format!(
                    "{class} registers are never reused; split the program or use fewer temporaries"
                ))
                .print();
            }
            return ExitCode::FAILURE;
        }
    };
    println!(
        "  - {} symbols, {} instructions, {} data entries",
        unit.symbols.len(),
        unit.program.insts().count(),
        unit.program.data.len()
    );
    if args.verbose {
        unit.program.dump();
        unit.symbols.print();
    }

    println!("3. Write Output");
    let output = args.output.clone().unwrap_or_else(|| {
        Path::new(&args.input)
            .with_extension("s")
            .to_string_lossy()
            .into_owned()
    });
    println!("  > {}", output);
    if output == args.input {
        Msg::Error(format!("output `{}` would overwrite the input", output)).print();
        return ExitCode::FAILURE;
    }
    if let Err(e) = std::fs::write(&output, unit.assembly()) {
        Msg::Error(format!("cannot write `{}`: {}", output, e)).print();
        return ExitCode::FAILURE;
    }

    if let Some(path) = &args.symbols {
        println!("  > {}", path);
        let written = unit
            .symbols
            .to_json()
            .map_err(|e| e.to_string())
            .and_then(|json| std::fs::write(path, json).map_err(|e| e.to_string()));
        if let Err(e) = written {
            Msg::Error(format!("cannot write `{}`: {}", path, e)).print();
            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}
