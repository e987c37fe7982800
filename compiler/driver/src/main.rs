//! The command-line driver: wires source files into a compiler run and
//! prints the collected messages.

use colored::Colorize;
use diagnostics::Severity;
use session::{Compiler, CompilerOptions};
use span::{FileSystemLoader, SourceMap};
use std::process::ExitCode;
use utility::pluralize;

const USAGE: &str = "\
usage: cesium [options] <file>…

options:
    --define <symbol>    predefine a preprocessor symbol
    --warn <level>       set the warning level (0-4, default 4)
    --warn-as-error      treat warnings as errors
";

fn main() -> ExitCode {
    match run(std::env::args().skip(1).collect()) {
        Ok(successful) => {
            if successful {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(message) => {
            eprintln!("{}: {message}", "error".red().bold());
            eprint!("{USAGE}");
            ExitCode::FAILURE
        }
    }
}

fn run(arguments: Vec<String>) -> Result<bool, String> {
    let mut options = CompilerOptions::default();
    let mut paths = Vec::new();

    let mut arguments = arguments.into_iter();
    while let Some(argument) = arguments.next() {
        match argument.as_str() {
            "--define" => {
                let symbol = arguments.next().ok_or("'--define' expects a symbol")?;
                options.defines.push(symbol);
            }
            "--warn" => {
                let level = arguments.next().ok_or("'--warn' expects a level")?;
                options.warning_level =
                    level.parse().map_err(|_| format!("invalid warning level '{level}'"))?;
            }
            "--warn-as-error" => options.treat_warnings_as_errors = true,
            _ if argument.starts_with('-') => {
                return Err(format!("unknown option '{argument}'"));
            }
            _ => paths.push(argument),
        }
    }

    if paths.is_empty() {
        return Err("no source files given".into());
    }

    let mut map = SourceMap::default();
    for path in &paths {
        map.load(path.as_str(), &FileSystemLoader)
            .map_err(|error| format!("{path}: {error}"))?;
    }

    let compiler = Compiler::new(options);
    let _files = parser::parse_program(&map, &compiler);

    let messages = compiler.messages();
    let mut errors = 0usize;
    let mut warnings = 0usize;

    for message in messages.messages() {
        let severity = match message.severity {
            Severity::Error => {
                errors += 1;
                "error".red().bold()
            }
            Severity::Warning => {
                warnings += 1;
                "warning".yellow().bold()
            }
            Severity::Info => "info".cyan(),
        };

        let location = match &message.location {
            Some(location) => format!(
                "{}({},{}): ",
                location.file, location.span.start.line, location.span.start.column
            ),
            None => String::new(),
        };

        eprintln!("{location}{severity} {}: {}", message.code, message.text);
    }

    if errors > 0 || warnings > 0 {
        eprintln!(
            "compilation {} with {errors} {} and {warnings} {}",
            if errors > 0 { "failed" } else { "succeeded" },
            pluralize!(errors, "error"),
            pluralize!(warnings, "warning"),
        );
    }

    Ok(!compiler.has_errors())
}
