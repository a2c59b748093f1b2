//! CLI command implementations

use anyhow::{Context, Result};
use chrono::Local;
use serde::Serialize;
use std::io::{self, BufRead, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};

use crate::cli::args::{ConfigCommand, ExportFormat, ExportTable, PaymentsCommand};
use crate::config::Settings;
use crate::dashboard::{CashSummary, PipelineSummary};
use crate::leads::{format_timestamp, LeadAnalysis, LeadAnalyzer, ReviewSession, Temperature};
use crate::storage::{Database, LeadRecord, PaymentRecord, LEAD_COLUMNS, PAYMENT_COLUMNS};
use crate::BlueSdrError;

/// Analyze a conversation, show the result, and save it on confirmation.
pub async fn analyze_conversation(
    settings: &Settings,
    file: Option<PathBuf>,
    yes: bool,
    no_save: bool,
) -> Result<()> {
    let transcript = read_transcript(file.as_deref())?;
    if transcript.trim().is_empty() {
        anyhow::bail!("Transcript is empty. Paste a conversation on stdin or pass --file.");
    }

    let analyzer = LeadAnalyzer::from_settings(settings)?;
    let mut session = ReviewSession::new();

    eprintln!("Analyzing conversation...");
    let analysis = match session.submit(&analyzer, &transcript).await {
        Ok(analysis) => analysis.clone(),
        Err(e @ BlueSdrError::InsufficientContext { .. }) => {
            return Err(anyhow::Error::new(e)
                .context("Could not read the analysis. The conversation may lack context; try again"));
        }
        Err(e) => return Err(e.into()),
    };

    print_analysis(&analysis);

    if no_save {
        session.discard();
        println!("Not saved (--no-save).");
        return Ok(());
    }

    let mut question = "Save this lead? [y/N] ";
    loop {
        if !yes && !ask(question)? {
            session.discard();
            println!("Lead discarded.");
            return Ok(());
        }

        let timestamp = format_timestamp(&Local::now(), &settings.general.timestamp_format);
        let saved = Database::open(settings)
            .map_err(|e| BlueSdrError::Append(format!("{e:#}")))
            .and_then(|db| session.confirm(&db, timestamp));

        match saved {
            Ok(record) => {
                println!("Lead {} saved (#{}).", record.name, record.id);
                return Ok(());
            }
            Err(e) if yes => return Err(e.into()),
            Err(e) => {
                eprintln!("Error: {}", e);
                question = "Retry saving? [y/N] ";
            }
        }
    }
}

/// List saved leads
pub async fn list_leads(settings: &Settings, limit: usize) -> Result<()> {
    let db = Database::open(settings)?;
    let leads = db.list_leads(limit)?;

    if leads.is_empty() {
        println!("No leads found");
        return Ok(());
    }

    println!(
        "{:<6} {:<17} {:<20} {:<15} {:<8} {:<12}",
        "ID", LEAD_COLUMNS[0], LEAD_COLUMNS[1], LEAD_COLUMNS[2], LEAD_COLUMNS[3], "Value"
    );
    println!("{}", "-".repeat(83));

    for lead in leads {
        println!(
            "{:<6} {:<17} {:<20} {:<15} {:<8} {:<12}",
            lead.id,
            truncate(&lead.timestamp, 17),
            truncate(&lead.name, 20),
            truncate(&lead.origin, 15),
            truncate(&lead.status, 8),
            truncate(&lead.estimated_value, 12),
        );
    }

    Ok(())
}

/// Handle payments subcommands
pub async fn payments_command(settings: &Settings, cmd: PaymentsCommand) -> Result<()> {
    let db = Database::open(settings)?;

    match cmd {
        PaymentsCommand::Add {
            client,
            value,
            service,
            method,
            status,
            document,
        } => {
            if client.trim().is_empty() {
                anyhow::bail!("Client name cannot be empty");
            }
            if !value.is_finite() || value < 0.0 {
                anyhow::bail!("Payment value must be a non-negative number");
            }

            let mut payment = PaymentRecord::new(
                format_timestamp(&Local::now(), &settings.general.timestamp_format),
                client,
                service,
                value,
                status,
                method,
            );
            payment.document_ref = document.filter(|d| !d.trim().is_empty());

            let id = db.insert_payment(&payment)?;
            tracing::info!(id, "Payment recorded");
            println!(
                "Payment recorded: {} {} ({}, {})",
                payment.client,
                format_money(payment.value),
                payment.method,
                payment.status
            );
        }
        PaymentsCommand::List { limit } => {
            let payments = db.list_payments(limit)?;
            if payments.is_empty() {
                println!("No payments found");
                return Ok(());
            }

            println!(
                "{:<6} {:<17} {:<20} {:<20} {:>12} {:<10} {:<12}",
                "ID",
                PAYMENT_COLUMNS[0],
                PAYMENT_COLUMNS[1],
                PAYMENT_COLUMNS[2],
                PAYMENT_COLUMNS[3],
                PAYMENT_COLUMNS[4],
                PAYMENT_COLUMNS[5]
            );
            println!("{}", "-".repeat(103));

            for payment in payments {
                println!(
                    "{:<6} {:<17} {:<20} {:<20} {:>12} {:<10} {:<12}",
                    payment.id,
                    truncate(&payment.timestamp, 17),
                    truncate(&payment.client, 20),
                    truncate(&payment.service, 20),
                    format_money(payment.value),
                    payment.status.as_str(),
                    payment.method.as_str(),
                );
            }
        }
    }

    Ok(())
}

#[derive(Serialize)]
struct DashboardReport {
    pipeline: PipelineSummary,
    cash: CashSummary,
}

/// Show pipeline and cash KPIs
pub async fn show_dashboard(settings: &Settings, json: bool) -> Result<()> {
    let db = Database::open(settings)?;
    let report = DashboardReport {
        pipeline: PipelineSummary::from_leads(&db.all_leads()?),
        cash: CashSummary::from_payments(&db.all_payments()?),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let pipeline = &report.pipeline;
    if pipeline.total_leads == 0 {
        println!("No leads yet. Analyze a conversation to start the pipeline.");
    } else {
        println!("Pipeline");
        println!("  {:<20} {}", "Total leads:", pipeline.total_leads);
        println!(
            "  {:<20} {} ({:.1}%)",
            "Hot opportunities:", pipeline.hot_leads, pipeline.hot_rate
        );
        println!(
            "  {:<20} {}",
            "Estimated pipeline:",
            format_money(pipeline.pipeline_value)
        );
        println!(
            "  {:<20} {} ({:.1}%)",
            "Closed deals:", pipeline.closed_deals, pipeline.conversion_rate
        );

        println!();
        println!("Funnel");
        for bucket in &pipeline.by_status {
            println!("  {:<20} {}", truncate(&bucket.label, 20), bucket.count);
        }

        println!();
        println!("Origins");
        for bucket in &pipeline.by_origin {
            println!("  {:<20} {}", truncate(&bucket.label, 20), bucket.count);
        }
    }

    let cash = &report.cash;
    println!();
    println!("Cash");
    if cash.transactions == 0 {
        println!("  No payments recorded.");
    } else {
        println!("  {:<20} {}", "Confirmed:", format_money(cash.confirmed_total));
        println!(
            "  {:<20} {}",
            "Outstanding:",
            format_money(cash.outstanding_total)
        );
        println!("  {:<20} {}", "Transactions:", cash.transactions);
    }

    Ok(())
}

/// Export a ledger to a file or stdout
pub async fn export_ledger(
    settings: &Settings,
    table: ExportTable,
    format: ExportFormat,
    output: Option<PathBuf>,
) -> Result<()> {
    let db = Database::open(settings)?;

    let content = match (table, format) {
        (ExportTable::Leads, ExportFormat::Csv) => export_leads_csv(&db.all_leads()?),
        (ExportTable::Leads, ExportFormat::Json) => {
            serde_json::to_string_pretty(&db.all_leads()?)? + "\n"
        }
        (ExportTable::Payments, ExportFormat::Csv) => export_payments_csv(&db.all_payments()?),
        (ExportTable::Payments, ExportFormat::Json) => {
            serde_json::to_string_pretty(&db.all_payments()?)? + "\n"
        }
    };

    if let Some(path) = output {
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write export: {}", path.display()))?;
        println!("Exported to: {}", path.display());
    } else {
        print!("{}", content);
    }

    Ok(())
}

/// Handle config subcommands
pub fn config_command(settings: &Settings, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show => {
            let mut shown = settings.clone();
            if shown.has_api_key() {
                shown.llm.api_key = "********".to_string();
            }
            let toml = toml::to_string_pretty(&shown)?;
            println!("{}", toml);
        }
        ConfigCommand::Path => {
            let path = Settings::config_path()?;
            println!("{}", path.display());
        }
        ConfigCommand::Init { force } => {
            let path = Settings::config_path()?;
            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at {}. Use --force to overwrite.",
                    path.display()
                );
            }
            Settings::write_default(&path)?;
            println!("Configuration initialized at: {}", path.display());
        }
    }

    Ok(())
}

#[derive(Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: &'static str,
    detail: String,
}

#[derive(Serialize)]
struct DoctorReport {
    provider: String,
    model: String,
    response_format: String,
    checks: Vec<DoctorCheck>,
}

/// Run diagnostic checks to help troubleshoot local setup issues.
pub async fn run_doctor(settings: &Settings, json: bool) -> Result<()> {
    let report = collect_doctor_report(settings);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("bluesdr doctor");
    println!("provider: {} ({})", report.provider, report.model);
    println!("response format: {}", report.response_format);
    println!();

    for check in &report.checks {
        println!("{:<10} {:<8} {}", check.name, check.status, check.detail);
    }

    Ok(())
}

fn collect_doctor_report(settings: &Settings) -> DoctorReport {
    let config = match Settings::config_path() {
        Ok(path) if path.exists() => DoctorCheck {
            name: "config",
            status: "ok",
            detail: path.display().to_string(),
        },
        Ok(path) => DoctorCheck {
            name: "config",
            status: "default",
            detail: format!("no file at {}, using defaults", path.display()),
        },
        Err(e) => DoctorCheck {
            name: "config",
            status: "error",
            detail: e.to_string(),
        },
    };

    let api_key = DoctorCheck {
        name: "api-key",
        status: if settings.has_api_key() { "ok" } else { "missing" },
        detail: "set llm.api_key or BLUESDR_GEMINI_API_KEY".to_string(),
    };

    let provider = match crate::llm::build_provider(settings) {
        Ok(_) => DoctorCheck {
            name: "provider",
            status: "ok",
            detail: settings.llm.provider.clone(),
        },
        Err(e) => DoctorCheck {
            name: "provider",
            status: "error",
            detail: e.to_string(),
        },
    };

    let database = match Database::open(settings).and_then(|db| db.get_stats()) {
        Ok(stats) => DoctorCheck {
            name: "database",
            status: "ok",
            detail: format!(
                "{} leads, {} payments in {}",
                stats.total_leads,
                stats.total_payments,
                settings.database_path().display()
            ),
        },
        Err(e) => DoctorCheck {
            name: "database",
            status: "error",
            detail: format!("{e:#}"),
        },
    };

    DoctorReport {
        provider: settings.llm.provider.clone(),
        model: settings.llm.model.clone(),
        response_format: format!("{:?}", settings.llm.response_format).to_lowercase(),
        checks: vec![config, api_key, provider, database],
    }
}

// Helper functions

fn read_transcript(file: Option<&Path>) -> Result<String> {
    if let Some(path) = file {
        return std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read transcript: {}", path.display()));
    }

    let mut stdin = io::stdin();
    if stdin.is_terminal() {
        eprintln!("Paste the conversation, then press Ctrl-D:");
    }

    let mut transcript = String::new();
    stdin
        .read_to_string(&mut transcript)
        .context("Failed to read transcript from stdin")?;
    Ok(transcript)
}

/// Ask a yes/no question on stdin. End of input counts as no.
fn ask(question: &str) -> Result<bool> {
    print!("{}", question);
    io::stdout().flush()?;

    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer)? == 0 {
        println!();
        return Ok(false);
    }

    Ok(matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes" | "s" | "sim"
    ))
}

fn print_analysis(analysis: &LeadAnalysis) {
    println!();
    if analysis.is_sentinel() {
        println!("warning: the generation service failed; every field is a placeholder.");
        println!();
    }

    println!("Lead: {}", analysis.name);
    println!("  {:<12} {}", "Origin:", analysis.origin);
    println!("  {:<12} {}", "Potential:", analysis.estimated_value);
    println!("  {:<12} {}", "Diagnosis:", analysis.pain_point);
    match analysis.temperature() {
        Some(temperature) => println!("  {:<12} {}", "Status:", temperature),
        None => println!(
            "  {:<12} {} (expected one of {})",
            "Status:",
            analysis.temperature,
            Temperature::vocabulary()
        ),
    }

    println!();
    println!("Suggested reply:");
    println!("{}", analysis.suggested_reply.trim());
    println!();
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Two decimals with `,` thousands grouping.
fn format_money(value: f64) -> String {
    let formatted = format!("{:.2}", value.abs());
    let (whole, decimals) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::new();
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, decimals)
}

fn csv_field(value: &str) -> String {
    if value.contains(&[',', '"', '\n', '\r'][..]) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn csv_row<'a>(values: impl IntoIterator<Item = &'a str>) -> String {
    let mut row = values.into_iter().map(csv_field).collect::<Vec<_>>().join(",");
    row.push('\n');
    row
}

fn export_leads_csv(leads: &[LeadRecord]) -> String {
    let mut output = csv_row(LEAD_COLUMNS);
    for lead in leads {
        output.push_str(&csv_row(lead.columns()));
    }
    output
}

fn export_payments_csv(payments: &[PaymentRecord]) -> String {
    let mut output = csv_row(PAYMENT_COLUMNS);
    for payment in payments {
        let value = format!("{:.2}", payment.value);
        output.push_str(&csv_row([
            payment.timestamp.as_str(),
            payment.client.as_str(),
            payment.service.as_str(),
            value.as_str(),
            payment.status.as_str(),
            payment.method.as_str(),
            payment.document_ref.as_deref().unwrap_or(""),
        ]));
    }
    output
}
