//! Built-in compliance rules
//!
//! Rules are grouped by the tier that introduces them. A framework runs every
//! tier at or below its own, followed by the cross-posture rules.

use crate::domain::entities::{
    AccessLevel, ActionKind, ComplianceViolation, EnhancedBindingContext, Severity,
};
use crate::domain::ports::{ComplianceRule, EnforcementSink, RuleError};

pub type CheckFn = fn(&EnhancedBindingContext, &mut dyn EnforcementSink) -> Result<(), RuleError>;

/// A rule backed by a plain function.
#[derive(Clone, Copy)]
pub struct FnRule {
    id: &'static str,
    check: CheckFn,
}

impl FnRule {
    pub const fn new(id: &'static str, check: CheckFn) -> Self {
        Self { id, check }
    }
}

impl ComplianceRule for FnRule {
    fn id(&self) -> &str {
        self.id
    }

    fn evaluate(
        &self,
        context: &EnhancedBindingContext,
        sink: &mut dyn EnforcementSink,
    ) -> Result<(), RuleError> {
        (self.check)(context, sink)
    }
}

pub fn baseline_rules() -> Vec<FnRule> {
    vec![
        FnRule::new("base.transit-encryption", transit_encryption),
        FnRule::new("base.least-privilege", least_privilege),
    ]
}

pub fn enhanced_rules() -> Vec<FnRule> {
    vec![
        FnRule::new("moderate.encryption-at-rest", encryption_at_rest),
        FnRule::new("moderate.network-exposure", network_exposure),
        FnRule::new("moderate.access-logging", access_logging),
        FnRule::new("moderate.iam-auth", iam_auth),
    ]
}

pub fn maximum_rules() -> Vec<FnRule> {
    vec![
        FnRule::new("high.customer-managed-keys", customer_managed_keys),
        FnRule::new("high.cross-account", cross_account),
        FnRule::new("high.write-access-review", write_access_review),
        FnRule::new("high.flow-logs", flow_logs),
    ]
}

fn transit_encryption(
    ctx: &EnhancedBindingContext,
    sink: &mut dyn EnforcementSink,
) -> Result<(), RuleError> {
    if !ctx.target_capability_data.encryption.in_transit {
        sink.report(
            "base.transit-encryption",
            "encryption",
            Severity::Error,
            &format!("'{}' accepts unencrypted connections", ctx.target.name),
            "Require TLS on the target endpoint",
        );
    }
    Ok(())
}

fn least_privilege(
    ctx: &EnhancedBindingContext,
    sink: &mut dyn EnforcementSink,
) -> Result<(), RuleError> {
    if ctx.options.access == AccessLevel::Admin {
        sink.report(
            "base.least-privilege",
            "access",
            Severity::Warning,
            &format!(
                "'{}' requests admin access to '{}'",
                ctx.source.name, ctx.target.name
            ),
            "Request read, write or read-write access instead",
        );
    }
    Ok(())
}

fn encryption_at_rest(
    ctx: &EnhancedBindingContext,
    sink: &mut dyn EnforcementSink,
) -> Result<(), RuleError> {
    if !ctx.target_capability_data.encryption.at_rest {
        sink.report(
            "moderate.encryption-at-rest",
            "encryption",
            Severity::Error,
            &format!("'{}' stores data unencrypted", ctx.target.name),
            "Enable encryption at rest on the target",
        );
    }
    Ok(())
}

fn network_exposure(
    ctx: &EnhancedBindingContext,
    sink: &mut dyn EnforcementSink,
) -> Result<(), RuleError> {
    let network = &ctx.target_capability_data.network;
    if network.is_open_to_internet() {
        sink.report(
            "moderate.network-exposure",
            "network-exposure",
            Severity::Error,
            &format!("'{}' is reachable from the internet", ctx.target.name),
            "Disable public access and restrict allowed CIDRs to private ranges",
        );
        let port = network.port.map(|p| p.to_string()).unwrap_or_default();
        sink.require(
            ActionKind::Restriction,
            "Restrict ingress to the binding source",
            &[
                ("source", ctx.source.name.as_str()),
                ("target", ctx.target.name.as_str()),
                ("port", port.as_str()),
            ],
        );
    }
    Ok(())
}

fn access_logging(
    ctx: &EnhancedBindingContext,
    sink: &mut dyn EnforcementSink,
) -> Result<(), RuleError> {
    sink.require(
        ActionKind::Monitoring,
        "Enable access logging on the target",
        &[("target", ctx.target.name.as_str())],
    );
    Ok(())
}

fn iam_auth(ctx: &EnhancedBindingContext, sink: &mut dyn EnforcementSink) -> Result<(), RuleError> {
    if ctx.target_capability_data.capability.starts_with("db:") && !ctx.options.iam_auth {
        sink.report(
            "moderate.iam-auth",
            "authentication",
            Severity::Warning,
            &format!(
                "'{}' connects to '{}' with static credentials",
                ctx.source.name, ctx.target.name
            ),
            "Enable IAM database authentication for the binding",
        );
    }
    Ok(())
}

fn customer_managed_keys(
    ctx: &EnhancedBindingContext,
    sink: &mut dyn EnforcementSink,
) -> Result<(), RuleError> {
    if !ctx.target_capability_data.encryption.customer_managed_key {
        sink.report(
            "high.customer-managed-keys",
            "encryption",
            Severity::Error,
            &format!("'{}' is not encrypted with a customer-managed key", ctx.target.name),
            "Configure a customer-managed encryption key on the target",
        );
    }
    Ok(())
}

fn cross_account(
    ctx: &EnhancedBindingContext,
    sink: &mut dyn EnforcementSink,
) -> Result<(), RuleError> {
    if ctx.options.cross_account {
        sink.report(
            "high.cross-account",
            "boundary",
            Severity::Error,
            &format!("binding {} crosses an account boundary", ctx.label()),
            "Keep source and target in the same account",
        );
    }
    Ok(())
}

fn write_access_review(
    ctx: &EnhancedBindingContext,
    sink: &mut dyn EnforcementSink,
) -> Result<(), RuleError> {
    if ctx.options.access.can_write() {
        sink.report(
            "high.write-access-review",
            "access",
            Severity::Info,
            &format!(
                "'{}' is granted {} access to '{}'",
                ctx.source.name, ctx.options.access, ctx.target.name
            ),
            "Record an access review for write-capable grants",
        );
        sink.require(
            ActionKind::Policy,
            "Attach a periodic access review to the grant",
            &[("access", ctx.options.access.as_str())],
        );
    }
    Ok(())
}

fn flow_logs(ctx: &EnhancedBindingContext, sink: &mut dyn EnforcementSink) -> Result<(), RuleError> {
    sink.require(
        ActionKind::Monitoring,
        "Capture network flow logs between source and target",
        &[
            ("source", ctx.source.name.as_str()),
            ("target", ctx.target.name.as_str()),
        ],
    );
    Ok(())
}

/// Cross-posture rules run for every framework, after the posture rules.
pub fn cross_posture_rules(required_tags: &[String]) -> Vec<Box<dyn ComplianceRule>> {
    vec![
        Box::new(FnRule::new("xp.no-wildcard-scope", no_wildcard_scope)),
        Box::new(TraceabilityTags::new(required_tags.to_vec())),
        Box::new(FnRule::new("xp.audit-trail", audit_trail)),
    ]
}

fn no_wildcard_scope(
    ctx: &EnhancedBindingContext,
    sink: &mut dyn EnforcementSink,
) -> Result<(), RuleError> {
    let framework = sink.framework();
    for resource in &ctx.target_capability_data.resources {
        if resource.contains('*') {
            sink.add_violation(ComplianceViolation {
                kind: "scope".to_string(),
                severity: Severity::Error,
                description: format!("binding {} grants a wildcard resource scope", ctx.label()),
                rule_id: "xp.no-wildcard-scope".to_string(),
                framework,
                remediation: "Scope the grant to the target's concrete resource identifiers"
                    .to_string(),
                context: Some(resource.clone()),
            });
        }
    }
    Ok(())
}

fn audit_trail(ctx: &EnhancedBindingContext, sink: &mut dyn EnforcementSink) -> Result<(), RuleError> {
    if !ctx.options.audit_logging {
        sink.report(
            "xp.audit-trail",
            "audit",
            Severity::Error,
            &format!("audit logging is disabled for binding {}", ctx.label()),
            "Remove `audit_logging: false` from the binding options",
        );
    }
    let label = ctx.label();
    sink.require(
        ActionKind::Monitoring,
        "Record binding activity in the audit trail",
        &[("binding", label.as_str())],
    );
    Ok(())
}

/// Every binding must carry the configured traceability tags.
pub struct TraceabilityTags {
    required: Vec<String>,
}

impl TraceabilityTags {
    pub const ID: &'static str = "xp.traceability-tags";

    pub fn new(required: Vec<String>) -> Self {
        Self { required }
    }
}

impl ComplianceRule for TraceabilityTags {
    fn id(&self) -> &str {
        Self::ID
    }

    fn evaluate(
        &self,
        ctx: &EnhancedBindingContext,
        sink: &mut dyn EnforcementSink,
    ) -> Result<(), RuleError> {
        let missing: Vec<&str> = self
            .required
            .iter()
            .filter(|tag| {
                ctx.options
                    .tags
                    .get(tag.as_str())
                    .map_or(true, |v| v.trim().is_empty())
            })
            .map(String::as_str)
            .collect();

        if missing.is_empty() {
            return Ok(());
        }

        let missing = missing.join(", ");
        sink.report(
            Self::ID,
            "traceability",
            Severity::Warning,
            &format!("binding {} is missing tags: {}", ctx.label(), missing),
            "Add the missing tags to the manifest or the binding options",
        );
        sink.require(
            ActionKind::Policy,
            "Apply traceability tags to provisioned resources",
            &[("missing", missing.as_str())],
        );
        Ok(())
    }
}
