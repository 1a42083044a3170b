//! Reusable test content.

use stratus::domain::entities::{
    AccessLevel, BindingEndpoint, BindingOptions, CapabilityData, EncryptionState,
    EnhancedBindingContext, NetworkExposure,
};
use stratus::{ComplianceFramework, ConfigValue};

/// Worker publishing to a queue and reading a database, with a queue trigger.
pub const ORDERS_MANIFEST: &str = r#"
service: orders
owner: payments
components:
  - name: api
    type: worker
  - name: events
    type: queue
  - name: ledger
    type: database
bindings:
  - from: api
    to: events
    capability: queue:publish
    access: write
  - from: api
    to: ledger
    capability: db:read-write
    access: read-write
triggers:
  - from: events
    to: api
    event: message
    batch_size: 25
"#;

/// Supported binding that the audit-trail rule blocks.
pub const AUDIT_DISABLED_MANIFEST: &str = r#"
service: orders
owner: payments
components:
  - name: api
    type: worker
  - name: events
    type: queue
bindings:
  - from: api
    to: events
    capability: queue:publish
    audit_logging: false
"#;

/// Pairing no registered strategy handles.
pub const UNSUPPORTED_MANIFEST: &str = r#"
service: orders
owner: payments
components:
  - name: api
    type: worker
  - name: events
    type: queue
bindings:
  - from: api
    to: events
    capability: db:read
"#;

pub fn required_tags() -> Vec<String> {
    vec!["service".to_string(), "owner".to_string()]
}

/// A binding every built-in rule accepts at every framework.
pub fn hardened_context(framework: ComplianceFramework) -> EnhancedBindingContext {
    let mut options = BindingOptions {
        access: AccessLevel::Read,
        iam_auth: true,
        ..BindingOptions::default()
    };
    options.tags.insert("service".into(), "orders".into());
    options.tags.insert("owner".into(), "payments".into());

    EnhancedBindingContext {
        source: BindingEndpoint::new("api", "worker", ConfigValue::object()),
        target: BindingEndpoint::new("ledger", "database", ConfigValue::object()),
        target_capability_data: CapabilityData {
            capability: "db:read".into(),
            resources: vec!["arn:aws:rds:${region}:${account}:db:ledger".into()],
            network: NetworkExposure {
                publicly_accessible: false,
                allowed_cidrs: vec!["10.0.0.0/16".into()],
                port: Some(5432),
            },
            encryption: EncryptionState {
                at_rest: true,
                in_transit: true,
                customer_managed_key: true,
            },
        },
        compliance_framework: framework,
        options,
    }
}

/// A binding that trips every built-in rule that can fire.
pub fn risky_context(framework: ComplianceFramework) -> EnhancedBindingContext {
    let mut ctx = hardened_context(framework);
    ctx.target_capability_data.encryption = EncryptionState::default();
    ctx.target_capability_data.network.publicly_accessible = true;
    ctx.target_capability_data.resources = vec!["arn:aws:rds:*".into()];
    ctx.options.access = AccessLevel::Admin;
    ctx.options.iam_auth = false;
    ctx.options.cross_account = true;
    ctx.options.audit_logging = false;
    ctx.options.tags.clear();
    ctx
}
