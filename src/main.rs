use clap::Parser;
use codegen::report_codegen_error;
use decexpr::{compile, compile_decimal, parse_decimal, run, Env, Error, Value};
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "decexpr")]
#[command(about = "Evaluate an expression, optionally with exact decimal arithmetic", long_about = None)]
struct Cli {
    /// Expression to evaluate
    expr: String,

    /// Bind a variable as `name=value`; prefix the value with `d:` for a decimal
    #[arg(long = "var", value_parser = parse_binding)]
    vars: Vec<(String, Value)>,

    /// Route numeric operators through exact decimal functions
    #[arg(long)]
    decimal: bool,

    /// Print the compiled bytecode before running it
    #[arg(long)]
    dump_bytecode: bool,

    /// Log compilation details to stderr
    #[arg(short, long)]
    verbose: bool,
}

/// Parse `name=value`. Values are read as literals: integers, floats,
/// `true`/`false`, `nil`, quoted strings, `d:<numeral>` decimals. Anything
/// else is taken as a bare string.
fn parse_binding(s: &str) -> Result<(String, Value), String> {
    let (name, raw) = s
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got {:?}", s))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing variable name in {:?}", s));
    }

    let value = if let Some(numeral) = raw.strip_prefix("d:") {
        Value::Decimal(parse_decimal(numeral.trim()).map_err(|e| e.to_string())?)
    } else if let Ok(i) = raw.parse::<i64>() {
        Value::Int(i)
    } else if let Ok(x) = raw.parse::<f64>() {
        Value::Float(x)
    } else {
        match raw {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            "nil" => Value::Nil,
            quoted if quoted.len() >= 2 && quoted.starts_with('"') && quoted.ends_with('"') => {
                Value::from(&quoted[1..quoted.len() - 1])
            }
            bare => Value::from(bare),
        }
    };

    Ok((name.to_string(), value))
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let env: Env = cli.vars.into_iter().collect();
    let source = cli.expr;

    let compiled = if cli.decimal {
        compile_decimal(&source, &env, Vec::new())
    } else {
        compile(&source, &env)
    };

    let program = match compiled {
        Ok(program) => program,
        Err(Error::Compile(e)) => {
            report_codegen_error("<expr>", &source, &e);
            process::exit(e.exit_code());
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(e.exit_code());
        }
    };

    if cli.dump_bytecode {
        println!("--- bytecode ({}) ---", program.output);
        print!("{}", program);
        println!("--------------------");
    }

    match run(&program, &env) {
        Ok(value) => println!("{}", value),
        Err(e) => {
            eprintln!("Runtime error: {}", e);
            process::exit(e.exit_code());
        }
    }
}
