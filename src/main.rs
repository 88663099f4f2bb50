use std::env;

use tracing_subscriber::EnvFilter;
use vena::error::ShellError;
use vena::flags::Flags;
use vena::shell::Shell;

fn main() {
    let status = match run() {
        Ok(status) => status,
        Err(e) => {
            eprintln!("vena: {}", e);
            1
        }
    };
    std::process::exit(status);
}

fn run() -> Result<i32, ShellError> {
    let mut flags = Flags::new();
    let args: Vec<String> = env::args().skip(1).collect();
    flags.parse(&args)?;

    if flags.is_set("help") {
        flags.print_help();
        return Ok(0);
    }

    if flags.is_set("version") {
        println!("vena {}", env!("CARGO_PKG_VERSION"));
        return Ok(0);
    }

    init_tracing(flags.is_set("debug"));

    let mut shell = Shell::new(flags)?;
    shell.run()
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
