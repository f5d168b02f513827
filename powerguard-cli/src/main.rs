//! PowerGuard CLI - low-voltage power system validation and wire sizing from the command line.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use powerguard::compliance::InsulationRating;
use powerguard::registry::DeviceRegistry;
use powerguard::{
    ConductorMaterial, DesignSnapshot, Gauge, Issue, PowerGuardCore, Severity, SizingRequest,
    SizingStatus, ValidationOptions, ValidationReport,
};
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "powerguard")]
#[command(about = "RV, marine and off-grid power system validation tool", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a design snapshot
    Check {
        /// Path to a design snapshot (.json)
        #[arg(value_name = "SNAPSHOT")]
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,

        /// Exit with error code if issues found at this severity or higher
        #[arg(long, value_enum)]
        fail_on: Option<FailOnSeverity>,

        /// Exit with error code if the score is below this value
        #[arg(long, value_name = "SCORE")]
        min_score: Option<f64>,

        /// Override the snapshot's DC system voltage
        #[arg(long, value_name = "VOLTS")]
        system_voltage: Option<f64>,

        /// Validation options file (.json)
        #[arg(short, long, value_name = "OPTIONS")]
        config: Option<PathBuf>,

        /// Extra device catalog (.json), layered over the built-in one
        #[arg(long, value_name = "CATALOG")]
        catalog: Option<PathBuf>,
    },

    /// Recommend a wire gauge for one run
    Size {
        /// Current in this wire (A)
        #[arg(long)]
        current: f64,

        /// One-way run length (ft)
        #[arg(long)]
        length: f64,

        /// Operating voltage (V)
        #[arg(long, default_value_t = 12.0)]
        voltage: f64,

        /// Ambient temperature (°C)
        #[arg(long, default_value_t = 30.0)]
        temperature: f64,

        #[arg(long, value_enum, default_value = "copper")]
        material: Material,

        /// Insulation temperature rating (°C)
        #[arg(long, default_value_t = 75)]
        insulation: u32,

        /// Bundling derating factor, 0 to 1
        #[arg(long, default_value_t = 1.0)]
        bundling: f64,

        /// Maximum voltage drop (%)
        #[arg(long, default_value_t = 3.0)]
        max_drop: f64,

        /// Smallest acceptable gauge, e.g. 10 or 1/0
        #[arg(long, value_name = "GAUGE")]
        floor: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,
    },

    /// Check whether two terminals of a snapshot may be wired together
    Connect {
        /// Path to a design snapshot (.json)
        #[arg(value_name = "SNAPSHOT")]
        file: PathBuf,

        from_id: String,
        from_terminal: String,
        to_id: String,
        to_terminal: String,
    },

    /// List the device catalog
    Devices {
        /// Show terminals and wiring guidance
        #[arg(short, long)]
        terminals: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output for CI/CD
    Json,
    /// GitHub Actions format
    Github,
}

#[derive(Clone, Copy, ValueEnum)]
enum FailOnSeverity {
    Error,
    Warning,
    Info,
}

impl FailOnSeverity {
    fn threshold(self) -> Severity {
        match self {
            FailOnSeverity::Error => Severity::Error,
            FailOnSeverity::Warning => Severity::Warning,
            FailOnSeverity::Info => Severity::Info,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Material {
    Copper,
    Aluminum,
}

impl From<Material> for ConductorMaterial {
    fn from(material: Material) -> Self {
        match material {
            Material::Copper => ConductorMaterial::Copper,
            Material::Aluminum => ConductorMaterial::Aluminum,
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let outcome = match cli.command {
        Commands::Check {
            file,
            format,
            fail_on,
            min_score,
            system_voltage,
            config,
            catalog,
        } => handle_check(
            &file,
            format,
            fail_on,
            min_score,
            system_voltage,
            config.as_deref(),
            catalog.as_deref(),
        ),
        Commands::Size {
            current,
            length,
            voltage,
            temperature,
            material,
            insulation,
            bundling,
            max_drop,
            floor,
            format,
        } => SizeArgs {
            current,
            length,
            voltage,
            temperature,
            material,
            insulation,
            bundling,
            max_drop,
            floor,
        }
        .run(format),
        Commands::Connect {
            file,
            from_id,
            from_terminal,
            to_id,
            to_terminal,
        } => handle_connect(&file, &from_id, &from_terminal, &to_id, &to_terminal),
        Commands::Devices { terminals } => {
            handle_devices(terminals);
            Ok(0)
        }
    };

    let exit_code = match outcome {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            1
        }
    };
    process::exit(exit_code);
}

fn load_snapshot(file: &Path) -> Result<DesignSnapshot> {
    PowerGuardCore::load_snapshot(file)
        .with_context(|| format!("failed to load design snapshot {}", file.display()))
}

fn handle_check(
    file: &Path,
    format: OutputFormat,
    fail_on: Option<FailOnSeverity>,
    min_score: Option<f64>,
    system_voltage: Option<f64>,
    config: Option<&Path>,
    catalog: Option<&Path>,
) -> Result<i32> {
    let options = match config {
        Some(path) => ValidationOptions::from_json_file(path)
            .with_context(|| format!("failed to load options {}", path.display()))?,
        None => ValidationOptions::default(),
    };

    let mut snapshot = load_snapshot(file)?;
    if let Some(volts) = system_voltage {
        if !(volts.is_finite() && volts > 0.0) {
            bail!("--system-voltage must be positive, got {}", volts);
        }
        snapshot.system_voltage = Some(volts);
    }

    let report = match catalog {
        Some(path) => {
            let registry = DeviceRegistry::with_catalog_file(path)
                .with_context(|| format!("failed to load device catalog {}", path.display()))?;
            PowerGuardCore::validate_with_registry(&snapshot, options, &registry)
        }
        None => PowerGuardCore::validate(&snapshot, options),
    };

    match format {
        OutputFormat::Human => output_human(file, &report),
        OutputFormat::Json => output_json(file, &report)?,
        OutputFormat::Github => output_github(file, &report),
    }

    if let Some(severity) = fail_on {
        if report.has_at_least(severity.threshold()) {
            return Ok(1);
        }
    }
    if let Some(min) = min_score {
        if report.score < min {
            return Ok(1);
        }
    }
    Ok(0)
}

fn severity_label(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "ERRORS",
        Severity::Warning => "WARNINGS",
        Severity::Info => "INFO",
    }
}

fn output_human(file: &Path, report: &ValidationReport) {
    println!("\nFile: {}", file.display());
    println!("{}", "─".repeat(60));
    println!(
        "  Score: {:.1}/100  ({})",
        report.score,
        if report.valid { "valid" } else { "invalid" }
    );

    if report.total_issues() == 0 {
        println!("  No issues found");
    }

    for severity in [Severity::Error, Severity::Warning, Severity::Info] {
        let issues: Vec<&Issue> = report.issues.iter().filter(|i| i.severity == severity).collect();
        if issues.is_empty() {
            continue;
        }
        println!("\n  {}:", severity_label(severity));
        for issue in issues {
            println!("    - [{}] {}", issue.rule_id, issue.message);
            if let Some(ref suggestion) = issue.suggestion {
                if !suggestion.is_empty() {
                    println!("      Suggestion: {}", suggestion);
                }
            }
        }
    }

    let sized: Vec<_> = report
        .wire_reports
        .iter()
        .filter_map(|w| w.calculation.as_ref().map(|c| (w, c)))
        .collect();
    if !sized.is_empty() {
        println!("\n  Wires:");
        for (wire, calc) in sized {
            let installed = wire
                .installed_gauge
                .map(|g| g.to_string())
                .unwrap_or_else(|| "-".to_string());
            println!(
                "    {:<18} {:>8.1}A x{}  {:>6.1}V  installed {:<8} recommended {:<8} {:.2}% drop",
                wire.wire_id,
                wire.current.per_wire,
                wire.current.parallel_count,
                wire.voltage,
                installed,
                calc.recommended_gauge.to_string(),
                calc.voltage_drop_percent
            );
        }
    }

    println!("\n  Summary:");
    println!("    Errors:   {}", report.metrics.error_count);
    println!("    Warnings: {}", report.metrics.warning_count);
    println!("    Info:     {}", report.metrics.info_count);
    println!("    System:   {} V", report.metrics.system_voltage);
}

fn output_json(file: &Path, report: &ValidationReport) -> Result<()> {
    let output = serde_json::json!({
        "file": file.display().to_string(),
        "report": report,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn severity_to_github(issue: &Issue) -> &'static str {
    match issue.severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
        Severity::Info => "notice",
    }
}

fn output_github(file: &Path, report: &ValidationReport) {
    for issue in &report.issues {
        println!(
            "::{} file={},title={}::{}",
            severity_to_github(issue),
            file.display(),
            issue.rule_id,
            issue.message.replace('\n', " ")
        );
    }
}

struct SizeArgs {
    current: f64,
    length: f64,
    voltage: f64,
    temperature: f64,
    material: Material,
    insulation: u32,
    bundling: f64,
    max_drop: f64,
    floor: Option<String>,
}

impl SizeArgs {
    fn request(&self) -> Result<SizingRequest> {
        let insulation = InsulationRating::from_celsius(self.insulation).with_context(|| {
            format!("insulation rating must be 60, 75 or 90, got {}", self.insulation)
        })?;
        let floor = match self.floor.as_deref() {
            Some(raw) => Some(raw.parse::<Gauge>()?),
            None => None,
        };
        Ok(SizingRequest::new(self.current, self.length, self.voltage)
            .with_temperature(self.temperature)
            .with_material(self.material.into())
            .with_insulation(insulation)
            .with_bundling_factor(self.bundling)
            .with_max_drop_percent(self.max_drop)
            .with_floor(floor))
    }

    fn run(self, format: OutputFormat) -> Result<i32> {
        let request = self.request()?;
        let result = powerguard::size(&request);

        match format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
            OutputFormat::Human | OutputFormat::Github => {
                println!("Recommended: {}", result.recommended_gauge);
                println!("Status:      {:?}", result.status);
                println!(
                    "Drop:        {:.3} V ({:.2}%)",
                    result.actual_voltage_drop, result.voltage_drop_percent
                );
                println!("Ampacity:    {:.1} A derated", result.derated_ampacity);
                println!("{}", result.message);
            }
        }

        Ok(if result.status == SizingStatus::Error { 1 } else { 0 })
    }
}

fn handle_connect(
    file: &Path,
    from_id: &str,
    from_terminal: &str,
    to_id: &str,
    to_terminal: &str,
) -> Result<i32> {
    let snapshot = load_snapshot(file)?;
    let from = snapshot
        .component(from_id)
        .with_context(|| format!("no component '{}' in {}", from_id, file.display()))?;
    let to = snapshot
        .component(to_id)
        .with_context(|| format!("no component '{}' in {}", to_id, file.display()))?;

    let verdict = powerguard::validate_connection(from, from_terminal, to, to_terminal);
    match (&verdict.severity, &verdict.message) {
        (Some(severity), Some(message)) => println!(
            "{}.{} -> {}.{}: {} ({}): {}",
            from_id,
            from_terminal,
            to_id,
            to_terminal,
            severity,
            verdict.rule_id.as_deref().unwrap_or("rule"),
            message
        ),
        _ => println!("{}.{} -> {}.{}: ok", from_id, from_terminal, to_id, to_terminal),
    }

    Ok(if verdict.valid { 0 } else { 1 })
}

fn handle_devices(terminals: bool) {
    let registry = DeviceRegistry::builtin();
    println!("Device catalog ({} types):\n", registry.len());

    for def in registry.definitions() {
        println!("  {:<20} {} ({:?})", def.device_type, def.name, def.category);
        if terminals {
            for terminal in &def.terminals {
                println!(
                    "    {:<16} {:<12}{}",
                    terminal.id,
                    terminal.polarity.as_str(),
                    if terminal.mandatory { " required" } else { "" }
                );
            }
            if !def.wiring_guidance.is_empty() {
                println!("    {}", def.wiring_guidance);
            }
            println!();
        }
    }
}
