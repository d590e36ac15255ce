use std::path::PathBuf;
use std::process::ExitCode;

use color_print::cprintln;

use vasm::{Encoder, Error, Lexer};

const HELP_TEMPLATE: &str = "\
{before-help}{bin} {version}
  {about}

{usage-heading}
{tab}{usage}

{all-args}{after-help}";

#[derive(Debug, clap::Parser)]
#[clap(version, about, help_template = HELP_TEMPLATE)]
struct Args {
    /// Input file
    input: PathBuf,

    /// Output file (defaults to the input with a `.bin` extension)
    #[clap(short, long)]
    output: Option<PathBuf>,

    /// Dump the token stream and the resolved symbol table
    #[clap(short, long)]
    dump: bool,
}

fn main() -> ExitCode {
    use clap::Parser;

    let args = Args::parse();
    let path = args.input.display().to_string();

    let raw = match std::fs::read_to_string(&args.input) {
        Ok(text) => text,
        Err(source) => {
            let err = Error::FileRead { path, source };
            err.print_diag("");
            return ExitCode::FAILURE;
        }
    };

    let lexer = Lexer::new(&path, &raw);
    let source = lexer.source();
    match assemble(&args, lexer) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            err.print_diag(&source);
            ExitCode::FAILURE
        }
    }
}

fn assemble(args: &Args, lexer: Lexer) -> Result<(), Error> {
    let path = args.input.display().to_string();

    println!("1. Tokenize");
    let tokens = lexer.lex()?;
    if args.dump {
        for token in &tokens {
            println!("  {token}");
        }
    }

    println!("2. Encode");
    let mut encoder = Encoder::new(&path, tokens);
    encoder.generate()?;

    println!("3. Backpatch");
    let (image, symbols) = encoder.finish()?;
    if args.dump && !symbols.is_empty() {
        for (name, at) in symbols.iter() {
            cprintln!("  <green>{}</> = 0x{:04X}", name, at);
        }
    }

    let out_path = args
        .output
        .clone()
        .unwrap_or_else(|| args.input.with_extension("bin"));
    println!("  > {}", out_path.display());
    std::fs::write(&out_path, &image).map_err(|source| Error::FileWrite {
        path: out_path.display().to_string(),
        source,
    })?;
    Ok(())
}
