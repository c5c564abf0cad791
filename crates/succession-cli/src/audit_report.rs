use anyhow::{anyhow, Result};
use colored::Colorize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use succession_lineage::{
    audit, AuditFinding, AuditReport, EngineConfig, FindingLevel, LineageIndex,
};

pub fn cmd_audit(
    config: &EngineConfig,
    snapshot_path: &Path,
    format: &str,
    out: Option<&PathBuf>,
    no_fail: bool,
) -> Result<()> {
    let format = crate::normalized_format(format, &["json", "text"])?;
    let snapshot = crate::load_snapshot(snapshot_path)?;
    let index = LineageIndex::with_config(&snapshot, config);
    let report = audit(&index, &config.audit);

    let rendered = match format {
        "text" => render_audit_report_text(&report, snapshot_path, out.is_none()),
        _ => serde_json::to_string_pretty(&report)?,
    };
    crate::emit(out, &rendered)?;

    if report.summary.error_count > 0 && !no_fail {
        return Err(anyhow!(
            "audit found {} error(s)",
            report.summary.error_count
        ));
    }
    Ok(())
}

fn level_label(level: FindingLevel, color: bool) -> String {
    let label = match level {
        FindingLevel::Error => "error",
        FindingLevel::Warning => "warning",
        FindingLevel::Info => "info",
    };
    if !color {
        return label.to_string();
    }
    match level {
        FindingLevel::Error => label.red().bold().to_string(),
        FindingLevel::Warning => label.yellow().bold().to_string(),
        FindingLevel::Info => label.cyan().to_string(),
    }
}

pub fn render_audit_report_text(report: &AuditReport, input: &Path, color: bool) -> String {
    let mut out = String::new();
    out.push_str("audit\n");
    out.push_str(&format!("  input: {}\n", input.display()));
    out.push_str(&format!(
        "  summary: errors={} warnings={} infos={}\n",
        report.summary.error_count, report.summary.warning_count, report.summary.info_count
    ));

    if report.findings.is_empty() {
        out.push_str("  (no findings)\n");
        return out;
    }

    let mut by_level: BTreeMap<FindingLevel, Vec<&AuditFinding>> = BTreeMap::new();
    for f in &report.findings {
        by_level.entry(f.level).or_default().push(f);
    }

    for (level, items) in by_level {
        out.push_str(&format!("\n{}\n", level_label(level, color)));
        for f in items {
            let mut ctx = String::new();
            if let Some(id) = f.clergy_id {
                ctx.push_str(&format!(" clergy={id}"));
            }
            if let Some(event) = f.event {
                ctx.push_str(&format!(" {}={}", event.kind, event.id));
            }
            out.push_str(&format!("  - {}: {}{}\n", f.code, f.message, ctx));
        }
    }

    out
}
