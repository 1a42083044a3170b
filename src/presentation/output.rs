//! Output Rendering
//!
//! Plain-text views of plans, resolved configurations and the binder matrix.
//! Renderers return strings; commands decide where they go.

use std::fmt::Write;

use crate::application::{ConnectionOutcome, SynthesisPlan, Verdict};
use crate::domain::entities::{CompatibilityEntry, ResolvedConfig, TriggerEntry};
use crate::domain::services::MatrixValidation;

/// Icons for output rendering
struct Icons {
    check: &'static str,
    cross: &'static str,
    skip: &'static str,
}

impl Icons {
    fn new(unicode: bool) -> Self {
        if unicode {
            Self {
                check: "✓",
                cross: "✗",
                skip: "○",
            }
        } else {
            Self {
                check: "[OK]",
                cross: "[FAIL]",
                skip: "[SKIP]",
            }
        }
    }
}

pub fn render_plan(plan: &SynthesisPlan, unicode: bool) -> String {
    let icons = Icons::new(unicode);
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Plan {} ({}, {})",
        plan.service, plan.framework, plan.environment
    );

    if !plan.manifest_errors.is_empty() {
        out.push_str("\nManifest\n");
        for error in &plan.manifest_errors {
            let _ = writeln!(out, "  {} {}", icons.cross, error);
        }
    }

    out.push_str("\nComponents\n");
    for component in &plan.components {
        let icon = if component.is_resolved() {
            icons.check
        } else {
            icons.cross
        };
        let _ = writeln!(
            out,
            "  {} {} ({})",
            icon, component.name, component.component_type
        );
        for error in &component.errors {
            let _ = writeln!(out, "      {}", error);
        }
    }

    render_connections(&mut out, "Bindings", &plan.bindings, &icons);
    render_connections(&mut out, "Triggers", &plan.triggers, &icons);

    let actions = plan.provisioning_actions();
    if !actions.is_empty() {
        out.push_str("\nActions\n");
        for action in actions {
            let _ = write!(out, "  - {}: {}", action.kind, action.description);
            if !action.details.is_empty() {
                let details: Vec<String> = action
                    .details
                    .iter()
                    .map(|(k, v)| format!("{}={}", k, v))
                    .collect();
                let _ = write!(out, " ({})", details.join(", "));
            }
            out.push('\n');
        }
    }

    out.push('\n');
    out.push_str(&render_plan_status(plan, unicode));
    out
}

/// Final verdict line; the whole output in quiet mode.
pub fn render_plan_status(plan: &SynthesisPlan, unicode: bool) -> String {
    let icons = Icons::new(unicode);
    if plan.is_provisionable() {
        format!("{} provisionable\n", icons.check)
    } else {
        format!(
            "{} blocked: {} problem(s)\n",
            icons.cross,
            plan.blocking_reasons().len()
        )
    }
}

fn render_connections(out: &mut String, title: &str, connections: &[ConnectionOutcome], icons: &Icons) {
    if connections.is_empty() {
        return;
    }
    let _ = writeln!(out, "\n{}", title);
    for connection in connections {
        match &connection.verdict {
            Verdict::Approved => {
                let _ = writeln!(
                    out,
                    "  {} {} via {}",
                    icons.check,
                    connection.label,
                    connection.strategy.as_deref().unwrap_or("-")
                );
            }
            Verdict::Blocked => {
                let _ = writeln!(out, "  {} {} blocked", icons.cross, connection.label);
            }
            Verdict::Unsupported { alternatives } => {
                let _ = writeln!(out, "  {} {} unsupported", icons.cross, connection.label);
                for alternative in alternatives {
                    let _ = writeln!(out, "      try: {}", alternative);
                }
            }
            Verdict::Skipped { reason } => {
                let _ = writeln!(out, "  {} {} skipped: {}", icons.skip, connection.label, reason);
            }
        }
        for violation in connection.enforcement.iter().flat_map(|e| e.violations.iter()) {
            let _ = writeln!(out, "      {}", violation);
        }
    }
}

/// One line per distinct rule that reported, with its remediation.
pub fn render_remediations(plan: &SynthesisPlan) -> String {
    let mut out = String::new();
    let mut seen: Vec<&str> = Vec::new();
    let violations = plan
        .bindings
        .iter()
        .chain(&plan.triggers)
        .filter_map(|c| c.enforcement.as_ref())
        .flat_map(|e| e.violations.iter());
    for violation in violations {
        if seen.contains(&violation.rule_id.as_str()) {
            continue;
        }
        seen.push(&violation.rule_id);
        let _ = writeln!(out, "  {}: {}", violation.rule_id, violation.remediation);
    }
    if out.is_empty() {
        return out;
    }
    format!("\nRemediation\n{}", out)
}

/// Every leaf with the layer that supplied it, then the override trail.
pub fn render_resolved(resolved: &ResolvedConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} ({}) {}",
        resolved.component, resolved.component_type, resolved.fingerprint
    );
    let _ = writeln!(
        out,
        "framework: {}, environment: {}",
        resolved.framework, resolved.environment
    );
    out.push('\n');

    let rows: Vec<(String, &str)> = resolved
        .values
        .leaf_paths()
        .into_iter()
        .map(|path| {
            let value = resolved
                .values
                .get_path(&path)
                .map(ToString::to_string)
                .unwrap_or_default();
            let source = resolved
                .provenance
                .get(&path)
                .map(String::as_str)
                .unwrap_or("?");
            (format!("{} = {}", path, value), source)
        })
        .collect();
    let width = rows.iter().map(|(entry, _)| entry.len()).max().unwrap_or(0);
    for (entry, source) in &rows {
        let _ = writeln!(out, "  {:<width$}  [{}]", entry, source, width = width);
    }

    if !resolved.overrides.is_empty() {
        out.push_str("\nOverrides\n");
        for o in &resolved.overrides {
            let _ = writeln!(out, "  {}: {} -> {}", o.path, o.from_layer, o.by_layer);
        }
    }
    out
}

pub fn render_matrix(bindings: &[CompatibilityEntry], triggers: &[TriggerEntry]) -> String {
    let mut out = String::new();

    out.push_str("Bindings\n");
    let labels: Vec<String> = bindings.iter().map(ToString::to_string).collect();
    let width = labels.iter().map(String::len).max().unwrap_or(0);
    for (label, entry) in labels.iter().zip(bindings) {
        let _ = writeln!(out, "  {:<width$}  {}", label, entry.description, width = width);
    }
    if bindings.is_empty() {
        out.push_str("  (none)\n");
    }

    out.push_str("\nTriggers\n");
    let labels: Vec<String> = triggers.iter().map(ToString::to_string).collect();
    let width = labels.iter().map(String::len).max().unwrap_or(0);
    for (label, entry) in labels.iter().zip(triggers) {
        let _ = writeln!(out, "  {:<width$}  {}", label, entry.description, width = width);
    }
    if triggers.is_empty() {
        out.push_str("  (none)\n");
    }
    out
}

pub fn render_validation(report: &MatrixValidation, unicode: bool) -> String {
    let icons = Icons::new(unicode);
    let mut out = String::new();
    for error in &report.errors {
        let _ = writeln!(out, "  {} {}", icons.cross, error);
    }
    for warning in &report.warnings {
        let _ = writeln!(out, "  ! {}", warning);
    }
    if report.valid {
        let _ = writeln!(
            out,
            "{} matrix valid ({} warning(s))",
            icons.check,
            report.warnings.len()
        );
    } else {
        let _ = writeln!(
            out,
            "{} matrix invalid ({} error(s))",
            icons.cross,
            report.errors.len()
        );
    }
    out
}
