use std::env;
use std::fs;
use std::io::{self, Read};
use std::process;

use folkabc::{validate_with_registry, ValidationReport, VocabularyRegistry};
use serde::Serialize;
use tracing_subscriber::filter::LevelFilter;

const USAGE: &str = "Usage: folkabc [--json] [--verbose] [--model NAME] [--registry FILE] <input.abc | ->
       folkabc --list-models [--registry FILE]";

#[derive(Serialize)]
struct JsonOutput<'a> {
    model: &'a str,
    valid: bool,
    start_abc: String,
    message: Option<String>,
    report: &'a ValidationReport,
}

struct Options {
    json: bool,
    verbose: bool,
    list_models: bool,
    model: Option<String>,
    registry: Option<String>,
    input: Option<String>,
}

fn usage_error(message: &str) -> ! {
    eprintln!("{}", message);
    eprintln!("{}", USAGE);
    process::exit(2);
}

fn parse_args(args: &[String]) -> Options {
    let mut options = Options {
        json: false,
        verbose: false,
        list_models: false,
        model: None,
        registry: None,
        input: None,
    };

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--json" => options.json = true,
            "-v" | "--verbose" => options.verbose = true,
            "--list-models" => options.list_models = true,
            "--model" => match iter.next() {
                Some(model) => options.model = Some(model.clone()),
                None => usage_error("--model needs a model file name"),
            },
            "--registry" => match iter.next() {
                Some(path) => options.registry = Some(path.clone()),
                None => usage_error("--registry needs a file"),
            },
            "-h" | "--help" => {
                println!("{}", USAGE);
                process::exit(0);
            }
            _ if options.input.is_none() => options.input = Some(arg.clone()),
            _ => usage_error(&format!("Unexpected argument '{}'", arg)),
        }
    }
    options
}

/// Send library log records to stderr: warnings, or debug output with `--verbose`.
fn init_logging(verbose: bool) {
    let level = if verbose { LevelFilter::DEBUG } else { LevelFilter::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn load_registry(extra: Option<&str>) -> VocabularyRegistry {
    let mut registry = match folkabc_models::builtin_registry() {
        Ok(registry) => registry,
        Err(e) => {
            eprintln!("Error loading built-in models: {}", e);
            process::exit(1);
        }
    };

    if let Some(path) = extra {
        let source = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error reading registry '{}': {}", path, e);
                process::exit(1);
            }
        };
        match VocabularyRegistry::from_yaml(&source) {
            Ok(document) => registry.extend(document),
            Err(e) => {
                eprintln!("Error in registry '{}': {}", path, e);
                process::exit(1);
            }
        }
    }
    registry
}

fn read_input(path: &str) -> String {
    let result = if path == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer).map(|_| buffer)
    } else {
        fs::read_to_string(path)
    };
    match result {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading input '{}': {}", path, e);
            process::exit(1);
        }
    }
}

fn print_report(source: &str, report: &ValidationReport) {
    let header = &report.parsed.header;
    for value in [&header.l, &header.m, &header.k].into_iter().flatten() {
        println!("{}", value);
    }
    println!("{}", report.parsed.start_abc());
    if let Some(message) = report.message(source) {
        eprintln!("{}", message);
    }
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let options = parse_args(&args);
    init_logging(options.verbose);
    let registry = load_registry(options.registry.as_deref());

    if options.list_models {
        for (file_name, display_name) in registry.choices() {
            println!("{}\t{}", file_name, display_name);
        }
        return;
    }

    let input_path = match &options.input {
        Some(path) => path.as_str(),
        None => usage_error("No input given"),
    };
    let source = read_input(input_path);

    let model = match options.model.as_deref() {
        Some(model) => model.to_string(),
        None => match registry.default_model() {
            Some(entry) => entry.file_name.clone(),
            None => {
                eprintln!("Error: no models available");
                process::exit(1);
            }
        },
    };

    let report = match validate_with_registry(&source, &registry, &model) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    if options.json {
        let output = JsonOutput {
            model: &model,
            valid: report.is_valid(),
            start_abc: report.parsed.start_abc(),
            message: report.message(&source),
            report: &report,
        };
        match serde_json::to_string_pretty(&output) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error writing JSON: {}", e);
                process::exit(1);
            }
        }
    } else {
        print_report(&source, &report);
    }

    if !report.is_valid() {
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("folkabc").chain(list.iter().copied()).map(str::to_string).collect()
    }

    #[test]
    fn test_verbose_flag() {
        assert!(!parse_args(&args(&["tune.abc"])).verbose);
        let options = parse_args(&args(&["--verbose", "--json", "tune.abc"]));
        assert!(options.verbose);
        assert!(options.json);
        assert_eq!(options.input.as_deref(), Some("tune.abc"));
        assert!(parse_args(&args(&["-v", "-"])).verbose);
    }
}
