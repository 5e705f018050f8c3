//! Console entry point

use std::env;
use std::fs;
use std::io;
use std::process;

use cli_console::{bootstrap, interactive, ConsoleConfig};

fn main() {
    let args: Vec<String> = env::args().collect();

    let config = parse_args(&args).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        print_usage(&args[0]);
        process::exit(1);
    });

    let mut handler = bootstrap(&config).unwrap_or_else(|e| {
        eprintln!("Failed to start console: {}", e);
        process::exit(1);
    });

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    if let Err(e) = interactive::run(&mut handler, stdin.lock(), &mut stdout) {
        eprintln!("Console error: {}", e);
        process::exit(1);
    }
}

fn parse_args(args: &[String]) -> Result<ConsoleConfig, String> {
    let mut config = ConsoleConfig::default();
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --config".to_string());
                }
                let bytes = fs::read(&args[i])
                    .map_err(|e| format!("Cannot read config file '{}': {}", args[i], e))?;
                config = ConsoleConfig::from_json_bytes(&bytes).map_err(|e| e.to_string())?;
            }
            "--user" | "-u" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --user".to_string());
                }
                config.user = Some(args[i].clone());
            }
            "--endpoint" | "-e" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --endpoint".to_string());
                }
                config.remote_endpoint = Some(args[i].clone());
            }
            "--help" | "-h" => {
                print_usage(&args[0]);
                process::exit(0);
            }
            other => {
                return Err(format!("Unknown argument: {}", other));
            }
        }
        i += 1;
    }

    Ok(config)
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} [options]", program);
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config, -c <file>      Load configuration from a JSON file");
    eprintln!("  --user, -u <name>        Run the session as this user");
    eprintln!("  --endpoint, -e <addr>    Attach the secondary store at this endpoint");
    eprintln!("  --help, -h               Show this help");
}
