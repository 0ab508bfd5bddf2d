// SkuGrid CLI - SKU catalog operations from the shell

mod exit_codes;
mod logging;

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use skugrid_config::{ConfigError, Settings};
use skugrid_engine::grid::to_display;
use skugrid_engine::header::canonical_header;
use skugrid_engine::model::text_row;
use skugrid_engine::validation::validate;
use skugrid_engine::{Sheet, ValidationError};
use skugrid_io::import::derive_columns;
use skugrid_io::{ImportOptions, IoError};

use exit_codes::{EXIT_FINDINGS, EXIT_IO, EXIT_PARSE, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "skugrid")]
#[command(about = "Compose and validate SKUs for product catalogs")]
#[command(version)]
struct Cli {
    /// Settings file (default: <config dir>/skugrid/settings.json)
    #[arg(long, global = true, value_name = "PATH", env = "SKUGRID_CONFIG")]
    config: Option<PathBuf>,

    /// Log debug detail to stderr
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fill in every SKU and write the catalog as CSV
    #[command(after_help = "\
Examples:
  skugrid generate products.csv -s specs.toml
  skugrid generate products.csv -s specs.json -o out.csv --prefix ACME")]
    Generate {
        #[command(flatten)]
        catalog: CatalogArgs,

        /// Output file (omit for stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Output field delimiter
        #[arg(long, default_value = ",")]
        out_delimiter: char,
    },

    /// Report stale specification values and duplicate SKUs (exit 1 if any)
    #[command(after_help = "\
Examples:
  skugrid validate products.csv -s specs.toml
  skugrid validate products.csv -s specs.toml --json | jq '.[].row'")]
    Validate {
        #[command(flatten)]
        catalog: CatalogArgs,

        /// Print findings as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// Print the display grid (dropdowns, read-only flags, styles) as JSON
    Grid {
        #[command(flatten)]
        catalog: CatalogArgs,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Print the canonical header row for a registry
    Header {
        /// Specification registry (.json or .toml)
        #[arg(long, short = 's')]
        specs: PathBuf,

        /// Header of the identifier column
        #[arg(long)]
        sku_header: Option<String>,

        /// Print as a JSON array instead of a CSV line
        #[arg(long)]
        json: bool,
    },
}

/// Input shared by the commands that load a catalog.
#[derive(Args, Debug, Clone)]
struct CatalogArgs {
    /// Catalog file (CSV/TSV)
    input: PathBuf,

    /// Specification registry (.json or .toml)
    #[arg(long, short = 's')]
    specs: PathBuf,

    /// Field delimiter of the catalog file (default: detect)
    #[arg(long)]
    delimiter: Option<char>,

    /// Put the canonical header in front whenever row 0 differs from it
    #[arg(long)]
    repair_header: bool,

    #[command(flatten)]
    sku: SkuArgs,
}

/// Overrides for the `sku.*` settings.
#[derive(Args, Debug, Clone, Default)]
struct SkuArgs {
    /// Separator between SKU fragments
    #[arg(long)]
    sku_delimiter: Option<String>,

    /// Text placed before every non-empty SKU
    #[arg(long)]
    prefix: Option<String>,

    /// Text placed after every non-empty SKU
    #[arg(long)]
    suffix: Option<String>,

    /// Header of the identifier column
    #[arg(long)]
    sku_header: Option<String>,
}

impl SkuArgs {
    fn apply(&self, settings: &mut Settings) {
        if let Some(d) = &self.sku_delimiter {
            settings.delimiter = d.clone();
        }
        if let Some(p) = &self.prefix {
            settings.prefix = p.clone();
        }
        if let Some(s) = &self.suffix {
            settings.suffix = s.clone();
        }
        if let Some(h) = &self.sku_header {
            settings.identifier_header = h.clone();
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = load_settings(cli.config.as_deref()).and_then(|settings| match cli.command {
        Commands::Generate {
            catalog,
            output,
            out_delimiter,
        } => cmd_generate(settings, catalog, output, out_delimiter),
        Commands::Validate { catalog, json } => cmd_validate(settings, catalog, json),
        Commands::Grid { catalog, pretty } => cmd_grid(settings, catalog, pretty),
        Commands::Header {
            specs,
            sku_header,
            json,
        } => cmd_header(settings, specs, sku_header, json),
    });

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_IO, message: msg.into(), hint: None }
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self { code: EXIT_PARSE, message: msg.into(), hint: None }
    }

    pub fn findings(count: usize) -> Self {
        Self {
            code: EXIT_FINDINGS,
            message: format!("{} validation finding(s)", count),
            hint: None,
        }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<IoError> for CliError {
    fn from(err: IoError) -> Self {
        match err {
            IoError::Read { .. } | IoError::Write { .. } => CliError::io(err.to_string()),
            IoError::UnsupportedFormat(_) => CliError::args(err.to_string())
                .with_hint("registries are read from .json or .toml files"),
            IoError::Registry(_) => CliError::parse(err.to_string())
                .with_hint("specification ids, names and value labels must be unique"),
            IoError::Csv(_) | IoError::Json(_) | IoError::Toml(_) => CliError::parse(err.to_string()),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Parse(_) => CliError::parse(err.to_string())
                .with_hint("settings are JSON; lines starting with // are comments"),
            ConfigError::Read { .. } | ConfigError::Write { .. } => CliError::io(err.to_string()),
        }
    }
}

// ============================================================================
// Shared loading
// ============================================================================

fn load_settings(path: Option<&Path>) -> Result<Settings, CliError> {
    match path {
        Some(path) => Ok(Settings::load_from(path)?),
        None => Ok(Settings::load()),
    }
}

fn delimiter_byte(c: char) -> Result<u8, CliError> {
    if c.is_ascii() {
        Ok(c as u8)
    } else {
        Err(CliError::args(format!("delimiter must be a single ASCII character, got '{}'", c)))
    }
}

/// Registry + catalog file through the import pipeline. CLI flags win over
/// settings.
fn load_catalog(mut settings: Settings, args: &CatalogArgs) -> Result<Sheet, CliError> {
    args.sku.apply(&mut settings);

    let specs = skugrid_io::load_specs(&args.specs)?;
    let delimiter = args
        .delimiter
        .or(settings.import_delimiter)
        .map(delimiter_byte)
        .transpose()?;
    let options = ImportOptions {
        sku_header: settings.identifier_header.clone(),
        repair_header: settings.repair_header || args.repair_header,
        delimiter,
    };

    let sheet = skugrid_io::import_sheet(&args.input, specs, &options, &settings.sku_settings())?;
    log::info!(
        "loaded {} row(s) from {}",
        sheet.rows.len(),
        args.input.display()
    );
    Ok(sheet)
}

fn write_stdout(text: &str) -> Result<(), CliError> {
    let mut out = io::stdout().lock();
    writeln!(out, "{}", text).map_err(|e| CliError::io(format!("stdout: {}", e)))
}

// ============================================================================
// generate
// ============================================================================

fn cmd_generate(
    settings: Settings,
    catalog: CatalogArgs,
    output: Option<PathBuf>,
    out_delimiter: char,
) -> Result<(), CliError> {
    let sheet = load_catalog(settings, &catalog)?;
    let delimiter = delimiter_byte(out_delimiter)?;

    match output {
        Some(path) => {
            skugrid_io::csv::export(&sheet, &path, delimiter)?;
            log::info!("wrote {}", path.display());
        }
        None => skugrid_io::csv::write_sheet(&sheet, io::stdout().lock(), delimiter)?,
    }
    Ok(())
}

// ============================================================================
// validate
// ============================================================================

fn format_finding(err: &ValidationError) -> String {
    format!("row {}, col {}: [{}] {}", err.row, err.column, err.kind, err.message)
}

fn cmd_validate(settings: Settings, catalog: CatalogArgs, json: bool) -> Result<(), CliError> {
    let sheet = load_catalog(settings, &catalog)?;
    let errors = validate(&sheet.rows, &sheet.columns, &sheet.specifications);

    if json {
        let text = serde_json::to_string_pretty(&errors)
            .map_err(|e| CliError::parse(format!("JSON error: {}", e)))?;
        write_stdout(&text)?;
    } else {
        for err in &errors {
            write_stdout(&format_finding(err))?;
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(CliError::findings(errors.len()))
    }
}

// ============================================================================
// grid
// ============================================================================

fn cmd_grid(settings: Settings, catalog: CatalogArgs, pretty: bool) -> Result<(), CliError> {
    let sheet = load_catalog(settings, &catalog)?;
    let matrix = to_display(&sheet.rows, &sheet.columns, &sheet.specifications);

    let text = if pretty {
        serde_json::to_string_pretty(&matrix)
    } else {
        serde_json::to_string(&matrix)
    }
    .map_err(|e| CliError::parse(format!("JSON error: {}", e)))?;
    write_stdout(&text)
}

// ============================================================================
// header
// ============================================================================

fn cmd_header(
    settings: Settings,
    specs: PathBuf,
    sku_header: Option<String>,
    json: bool,
) -> Result<(), CliError> {
    let specs = skugrid_io::load_specs(&specs)?;
    let sku_header = sku_header.unwrap_or(settings.identifier_header);
    let header = canonical_header(&specs, &sku_header);

    if json {
        let text = serde_json::to_string(&header)
            .map_err(|e| CliError::parse(format!("JSON error: {}", e)))?;
        return write_stdout(&text);
    }

    let mut sheet = Sheet::new("header", "Header");
    sheet.columns = derive_columns(&text_row(&header), &specs, &sku_header);
    skugrid_io::csv::write_sheet(&sheet, io::stdout().lock(), b',')?;
    Ok(())
}
