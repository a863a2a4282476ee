use nih_compiler::config::RuntimeConfig;
use nih_compiler::{logging, pipeline};
use std::env;
use std::fs;
use std::path::PathBuf;

/// Parsed command line
#[derive(Debug, Default, PartialEq)]
struct CliOptions {
    input: Option<PathBuf>,
    out: Option<PathBuf>,
    config: Option<PathBuf>,
    dump_tokens: bool,
    dump_ast: bool,
    json: bool,
    verbose: bool,
    help: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    let program_name = args.first().map(String::as_str).unwrap_or("nihc");

    let options = match parse_options(&args[1..]) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("Error: {}", message);
            eprintln!("Usage: {} <input.nih> [options]", program_name);
            std::process::exit(2);
        }
    };

    if options.help {
        print_help(program_name);
        return Ok(());
    }

    let Some(input) = options.input.clone() else {
        eprintln!("Usage: {} <input.nih> [options]", program_name);
        eprintln!("       {} --help", program_name);
        std::process::exit(1);
    };

    let config = match &options.config {
        Some(path) => RuntimeConfig::from_toml_file(path)?,
        None => RuntimeConfig::default(),
    };

    let logging_preferences = if options.verbose {
        logging::config::verbose_preferences()
    } else {
        config.logging.clone()
    };
    logging::init_global_logging_with_preferences(logging_preferences)?;
    pipeline::validate_pipeline()?;

    let result = match pipeline::compile_file_with_config(&input, &config) {
        Ok(result) => result,
        Err(error) => {
            if options.json {
                let output =
                    pipeline::PipelineOutput::from_error(&input.display().to_string(), &error);
                println!("{}", output.to_json()?);
            } else {
                eprintln!("{}", error);
            }
            logging::print_cargo_style_summary();
            std::process::exit(1);
        }
    };

    if options.dump_tokens {
        for token in &result.tokens {
            println!("{}", serde_json::to_string(token)?);
        }
    }

    if options.dump_ast && !options.json {
        println!("{}", serde_json::to_string_pretty(&result.ast)?);
    }

    if options.json {
        let output = pipeline::PipelineOutput::from_result(&result, options.dump_ast);
        println!("{}", output.to_json()?);
    } else if let Some(out_path) = &options.out {
        fs::write(out_path, &result.code)?;
    } else if !options.dump_tokens && !options.dump_ast {
        print!("{}", result.code);
    }

    if options.verbose {
        eprintln!(
            "Compiled {} ({} tokens, {} forms, {:.2}ms)",
            input.display(),
            result.token_count(),
            result.form_count(),
            result.processing_duration.as_secs_f64() * 1000.0
        );
    }

    logging::print_cargo_style_summary();
    Ok(())
}

fn parse_options(args: &[String]) -> Result<CliOptions, String> {
    let mut options = CliOptions::default();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => options.help = true,
            "--tokens" => options.dump_tokens = true,
            "--ast" => options.dump_ast = true,
            "--json" => options.json = true,
            "--verbose" | "-v" => options.verbose = true,
            "--out" | "-o" => {
                i += 1;
                let path = args.get(i).ok_or("--out requires a path")?;
                options.out = Some(PathBuf::from(path));
            }
            "--config" => {
                i += 1;
                let path = args.get(i).ok_or("--config requires a path")?;
                options.config = Some(PathBuf::from(path));
            }
            flag if flag.starts_with('-') => {
                return Err(format!("Unknown option '{}'", flag));
            }
            input => {
                if options.input.is_some() {
                    return Err(format!("Unexpected extra input '{}'", input));
                }
                options.input = Some(PathBuf::from(input));
            }
        }
        i += 1;
    }

    Ok(options)
}

fn print_help(program_name: &str) {
    println!("NIH Compiler v{}", env!("CARGO_PKG_VERSION"));
    println!("Compiles NIH S-expression sources to JavaScript");
    println!();
    println!("USAGE:");
    println!("    {} <input.nih> [options]", program_name);
    println!();
    println!("OPTIONS:");
    println!("    -o, --out <file>    Write JavaScript to a file instead of stdout");
    println!("    --config <file>     Load runtime preferences from a TOML file");
    println!("    --tokens            Print the token stream, one JSON object per line");
    println!("    --ast               Print the syntax tree as JSON");
    println!("    --json              Print a JSON summary instead of writing a file");
    println!("    -v, --verbose       Report timing and the collected log summary");
    println!("    -h, --help          Show this help message");
    println!();
    println!("EXAMPLES:");
    println!("    {} demos/mandelbrot.nih", program_name);
    println!("    {} hello.nih | node", program_name);
    println!("    {} hello.nih --out hello.js --verbose", program_name);
    println!();

    let pipeline_info = pipeline::get_pipeline_info();
    println!("PIPELINE CAPABILITIES:");
    for line in pipeline_info.report().lines() {
        println!("    {}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_options() {
        let options = parse_options(&args(&["demo.nih", "--out", "demo.js", "--ast", "-v"]))
            .unwrap();
        assert_eq!(options.input, Some(PathBuf::from("demo.nih")));
        assert_eq!(options.out, Some(PathBuf::from("demo.js")));
        assert!(options.dump_ast);
        assert!(options.verbose);
        assert!(!options.json);
    }

    #[test]
    fn test_parse_options_errors() {
        assert!(parse_options(&args(&["--out"])).is_err());
        assert!(parse_options(&args(&["--bogus"])).is_err());
        assert!(parse_options(&args(&["a.nih", "b.nih"])).is_err());
    }

    #[test]
    fn test_help_without_input() {
        let options = parse_options(&args(&["--help"])).unwrap();
        assert!(options.help);
        assert!(options.input.is_none());
    }
}
