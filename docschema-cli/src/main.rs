use clap::{Parser, Subcommand, ValueEnum};
use docschema::schema::{builtin, parse_schema};
use docschema::SchemaRegistry;
use std::path::{Path, PathBuf};
use std::process;

/// Environment variable consulted when `--schema-file` is not given
const SCHEMA_FILE_ENV: &str = "DOCSCHEMA_SCHEMA_FILE";

/// docschema CLI: inspect collection schemas and validate documents against them
#[derive(Parser)]
#[command(name = "docschema", version, about)]
struct Cli {
    /// YAML file with additional schema declarations (registered after the built-ins)
    #[arg(long)]
    schema_file: Option<PathBuf>,

    /// Reject undeclared fields in every collection
    #[arg(long)]
    strict: bool,

    /// Output format
    #[arg(long, default_value = "yaml")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Yaml,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Print every collection with its ordered field definitions
    Schemas,

    /// Print the JSON Schema of one collection
    JsonSchema {
        /// Collection name
        collection: String,
    },

    /// Validate a document and print it with defaults filled in
    Validate {
        /// Collection name
        collection: String,
        /// Field values (e.g. --field name=Mango --field sweetness=7)
        #[arg(long = "field", value_parser = parse_key_value)]
        fields: Vec<(String, String)>,
        /// Read the document from a JSON or YAML file
        #[arg(long, conflicts_with = "stdin")]
        file: Option<PathBuf>,
        /// Read the document from stdin (JSON or YAML)
        #[arg(long)]
        stdin: bool,
        /// Report every failure instead of stopping at the first
        #[arg(long)]
        all_errors: bool,
    },
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let pos = s.find('=').ok_or_else(|| {
        format!("Invalid key=value pair: no '=' found in '{s}'")
    })?;
    Ok((s[..pos].to_string(), s[pos + 1..].to_string()))
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("ERROR:{e}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let registry = open_registry(&cli)?;

    match cli.command {
        Command::Schemas => {
            print_output(&registry.describe(), &cli.format)?;
        }

        Command::JsonSchema { collection } => {
            let schema = registry
                .get(&collection)
                .ok_or_else(|| format!("Unknown collection: {collection}"))?;
            print_output(&schema.json_schema(), &cli.format)?;
        }

        Command::Validate {
            collection,
            fields,
            file,
            stdin,
            all_errors,
        } => {
            let candidate = read_candidate(file.as_deref(), stdin, &fields)?;

            if all_errors {
                let report = registry.check(&collection, &candidate);
                if !report.is_ok() {
                    for error in &report.errors {
                        eprintln!("ERROR:{error}");
                    }
                    process::exit(1);
                }
            }

            let doc = registry.validate_value(&collection, &candidate)?;
            print_output(&serde_json::to_value(&doc)?, &cli.format)?;
        }
    }

    Ok(())
}

fn open_registry(cli: &Cli) -> Result<SchemaRegistry, Box<dyn std::error::Error>> {
    let schema_file = cli
        .schema_file
        .clone()
        .or_else(|| std::env::var_os(SCHEMA_FILE_ENV).map(PathBuf::from));

    let mut builder = SchemaRegistry::builder()
        .schemas(builtin::schemas())
        .strict(cli.strict);

    if let Some(path) = schema_file {
        log::info!("Loading schema declarations from {}", path.display());
        builder = builder.schemas(parse_schema(&path)?);
    }

    Ok(builder.build()?)
}

fn print_output(
    value: &serde_json::Value,
    format: &OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(value)?),
    }
    Ok(())
}

/// Build the candidate document from an optional file or stdin, with
/// `--field` values layered on top.
fn read_candidate(
    file: Option<&Path>,
    stdin: bool,
    fields: &[(String, String)],
) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
    let mut candidate = if let Some(path) = file {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read document file '{}': {e}", path.display()))?;
        parse_document(&content)?
    } else if stdin {
        use std::io::Read;
        let mut content = String::new();
        std::io::stdin().read_to_string(&mut content)?;
        parse_document(&content)?
    } else {
        serde_json::Value::Object(serde_json::Map::new())
    };

    if !fields.is_empty() {
        let obj = candidate
            .as_object_mut()
            .ok_or("--field can only be combined with an object document")?;
        for (key, val) in fields {
            // Try to parse as JSON value (for numbers, booleans, null)
            let json_val =
                serde_json::from_str(val).unwrap_or(serde_json::Value::String(val.clone()));
            obj.insert(key.clone(), json_val);
        }
    }

    Ok(candidate)
}

/// JSON is valid YAML, so one parser covers both.
fn parse_document(content: &str) -> Result<serde_json::Value, serde_yaml::Error> {
    serde_yaml::from_str(content)
}
