use std::error::Error;
use std::fs;
use std::io::{self, Read, Write};

use clap::Parser;
use nested_query::{ParseOptions, ValuelessBrackets, DEFAULT_MAX_DEPTH};
use serde::Serialize;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "nqs", version, about = "Decode nested query strings to JSON")]
struct Args {
    /// Input file path. Omit or use '-' to read from stdin.
    input: Option<String>,

    /// Decode this query string instead of reading a file.
    #[arg(short, long, value_name = "query", conflicts_with = "input")]
    query: Option<String>,

    /// Output file path (prints to stdout if omitted).
    #[arg(short, long, value_name = "file")]
    output: Option<String>,

    /// Percent-decode the whole body before splitting pairs.
    #[arg(short, long)]
    urlencoded: bool,

    /// Maximum bracket segments per key.
    #[arg(long, value_name = "number", default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Store an empty string for bracketed keys without '='.
    #[arg(long)]
    allow_valueless: bool,

    /// JSON indentation size; 0 prints compact output.
    #[arg(long, value_name = "number", default_value_t = 2)]
    indent: usize,
}

#[derive(Debug)]
enum InputSource {
    Argument,
    Stdin,
    File(String),
}

fn main() {
    init_logging();
    if let Err(err) = run() {
        eprintln!("ERROR  {err}");
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let (input, input_source) = read_input(&args)?;
    let options = parse_options(&args);
    tracing::debug!(source = ?input_source, len = input.len(), "decoding query");

    let query = trim_line_end(&input);
    let map = if args.urlencoded {
        nested_query::parse_urlencoded_with_options(query, &options)?
    } else {
        nested_query::parse_with_options(query, &options)?
    };
    let value = nested_query::to_json(&map);

    let output_target = OutputTarget::from_arg(args.output.as_deref());
    with_output_writer(output_target.path(), |writer| {
        write_json(writer, &value, args.indent)?;
        writer.write_all(b"\n")?;
        Ok(())
    })?;
    if let OutputTarget::File(path) = &output_target {
        report_status(&input_source, path);
    }
    Ok(())
}

fn parse_options(args: &Args) -> ParseOptions {
    let valueless = if args.allow_valueless {
        ValuelessBrackets::Empty
    } else {
        ValuelessBrackets::Reject
    };
    ParseOptions::new()
        .with_max_depth(args.max_depth)
        .with_valueless_brackets(valueless)
}

fn read_input(args: &Args) -> Result<(Vec<u8>, InputSource), Box<dyn Error>> {
    if let Some(query) = &args.query {
        return Ok((query.as_bytes().to_vec(), InputSource::Argument));
    }
    match args.input.as_deref() {
        None | Some("-") => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf)?;
            Ok((buf, InputSource::Stdin))
        }
        Some(path) => {
            let buf = fs::read(path)?;
            Ok((buf, InputSource::File(path.to_string())))
        }
    }
}

// Files and piped input usually end with a newline that is not part of the query.
fn trim_line_end(input: &[u8]) -> &[u8] {
    let mut end = input.len();
    while end > 0 && matches!(input[end - 1], b'\n' | b'\r') {
        end -= 1;
    }
    &input[..end]
}

#[derive(Clone, Debug)]
enum OutputTarget {
    Stdout,
    File(String),
}

impl OutputTarget {
    fn from_arg(output: Option<&str>) -> Self {
        match output {
            Some(path) if path != "-" => OutputTarget::File(path.to_string()),
            _ => OutputTarget::Stdout,
        }
    }

    fn path(&self) -> Option<&str> {
        match self {
            OutputTarget::Stdout => None,
            OutputTarget::File(path) => Some(path.as_str()),
        }
    }
}

fn with_output_writer<F>(path: Option<&str>, f: F) -> Result<(), Box<dyn Error>>
where
    F: FnOnce(&mut dyn Write) -> Result<(), Box<dyn Error>>,
{
    match path {
        Some(path) => {
            let mut file = fs::File::create(path)?;
            f(&mut file)
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            f(&mut handle)
        }
    }
}

fn write_json(writer: &mut dyn Write, value: &Value, indent: usize) -> Result<(), Box<dyn Error>> {
    if indent == 0 {
        serde_json::to_writer(writer, value)?;
        return Ok(());
    }

    let indent_bytes = vec![b' '; indent];
    let formatter = serde_json::ser::PrettyFormatter::with_indent(&indent_bytes);
    let mut serializer = serde_json::Serializer::with_formatter(writer, formatter);
    value.serialize(&mut serializer)?;
    Ok(())
}

fn report_status(input_source: &InputSource, output_path: &str) {
    let input_label = match input_source {
        InputSource::Argument => "--query",
        InputSource::Stdin => "stdin",
        InputSource::File(path) => path.as_str(),
    };
    eprintln!("✔ Decoded {input_label} → {output_path}");
}
