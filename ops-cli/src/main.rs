use benefit_resolution::{
    BenefitResolutionService, Criticality, FieldRegistry, IntegrityReport, PatientIdentity,
    Provenance, ResolutionRequest, SmartBreakdown,
};
use clap::{Args as ClapArgs, Parser, Subcommand};
use colored::*;
use config_engine::{ConfigEngine, EngineConfig};
use error_common::{codes, log_error, EngineError, Result};
use logger_redacted::init_tracing;
use serde_json::Value;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;

/// Dental benefit resolution operations tool
#[derive(Parser, Debug)]
#[command(name = "benefitctl")]
#[command(about = "Resolve incomplete dental eligibility responses into a complete benefit record")]
struct Args {
    /// Configuration file path (YAML or TOML)
    #[arg(short, long, global = true, env = "BENEFIT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the full pipeline and print the smart breakdown
    Resolve(RequestArgs),
    /// Print the integrity report without contacting any secondary source
    Evaluate(RequestArgs),
    /// Print the tracked field registry
    Registry,
}

#[derive(ClapArgs, Debug)]
struct RequestArgs {
    /// Eligibility document (JSON); `-` reads stdin
    #[arg(short, long)]
    document: PathBuf,

    /// Scheduled procedure, repeatable
    #[arg(short = 'p', long = "procedure")]
    procedures: Vec<String>,

    #[arg(long)]
    patient: String,

    #[arg(long)]
    carrier: String,

    #[arg(long)]
    member: String,
}

impl RequestArgs {
    fn into_request(self) -> Result<ResolutionRequest> {
        let document = read_document(&self.document)?;
        Ok(ResolutionRequest {
            identity: PatientIdentity::new(self.patient, self.carrier, self.member),
            document,
            scheduled_procedures: self.procedures,
        })
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log_error("benefitctl", &e);
            eprintln!("❌ {} [{}]: {}", "benefitctl failed".bright_red(), e.code(), e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let config = ConfigEngine::load(args.config.as_deref())?;
    init_tracing(&config.logging)?;

    match args.command {
        Command::Resolve(request) => resolve(&config, request.into_request()?).await,
        Command::Evaluate(request) => evaluate(&config, &request.into_request()?),
        Command::Registry => show_registry(&config),
    }
}

async fn resolve(config: &EngineConfig, request: ResolutionRequest) -> Result<()> {
    let service = BenefitResolutionService::from_config(config)?;
    info!("🦷 {}", "Resolving benefit breakdown".bright_cyan());

    let breakdown = service.resolve(&request).await?;
    print_json(&breakdown)?;
    print_breakdown_summary(&breakdown);
    Ok(())
}

fn evaluate(config: &EngineConfig, request: &ResolutionRequest) -> Result<()> {
    let service = BenefitResolutionService::from_config(config)?;
    let report = service.evaluate(request)?;
    print_json(&report)?;
    print_report_summary(&report);
    Ok(())
}

fn show_registry(config: &EngineConfig) -> Result<()> {
    let registry = FieldRegistry::load(config.registry.path.as_deref())?;
    print_json(&registry.lookup())?;

    eprintln!(
        "📋 {} v{}: {} fields ({} critical, {} important, {} nice-to-have)",
        registry.name().bright_white(),
        registry.version(),
        registry.len(),
        registry.count(Criticality::Critical).to_string().bright_red(),
        registry.count(Criticality::Important).to_string().bright_yellow(),
        registry.count(Criticality::NiceToHave).to_string().bright_blue(),
    );
    Ok(())
}

fn read_document(path: &Path) -> Result<Value> {
    let raw = if path == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        std::fs::read_to_string(path).map_err(|e| {
            EngineError::input(
                codes::input::INVALID_REQUEST,
                format!("cannot read eligibility document {}: {e}", path.display()),
            )
        })?
    };
    Ok(serde_json::from_str(&raw)?)
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn grade_label(grade: impl std::fmt::Display, score: f64) -> ColoredString {
    let label = format!("{:.0}% ({grade})", score * 100.0);
    if score >= 0.85 {
        label.bright_green()
    } else if score >= 0.50 {
        label.bright_yellow()
    } else {
        label.bright_red()
    }
}

fn print_report_summary(report: &IntegrityReport) {
    eprintln!(
        "📊 Completeness: {}",
        grade_label(report.grade, report.completeness_score)
    );
    eprintln!(
        "   Missing: {} critical, {} important, {} nice-to-have",
        report.critical_missing.len(),
        report.important_missing.len(),
        report.nice_to_have_missing.len()
    );
    for record in report.missing_fields().filter(|record| record.relevant) {
        eprintln!(
            "   ❌ {} ({})",
            record.descriptor.path().bright_red(),
            record.descriptor.criticality
        );
    }
    for job in &report.retrieval_jobs {
        eprintln!(
            "   📤 {} job {}: {} field(s), {}",
            job.method,
            job.short_id(),
            job.fields_requested.len(),
            job.criticality
        );
    }
    if report.block_appointment {
        eprintln!("🚫 {}", "Block appointment: critical benefits unknown".bright_red());
    } else {
        eprintln!("✅ {}", "Appointment can proceed".bright_green());
    }
}

fn print_breakdown_summary(breakdown: &SmartBreakdown) {
    eprintln!(
        "📊 Completeness: {} -> {}",
        grade_label("primary", breakdown.primary_completeness_score),
        grade_label(breakdown.grade, breakdown.completeness_score)
    );
    eprintln!(
        "   Sources: {} primary, {} secondary, {} inferred, {} missing",
        breakdown.summary.primary,
        breakdown.summary.secondary,
        breakdown.summary.inferred,
        breakdown.summary.missing
    );
    for (field, source) in &breakdown.provenance {
        if *source == Provenance::Missing {
            eprintln!("   ❌ {}", field.path().bright_red());
        }
    }
    for warning in &breakdown.warnings {
        eprintln!("⚠️  {}", warning.bright_yellow());
    }
}
