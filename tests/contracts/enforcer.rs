//! Enforcement contracts (ENFORCE-001 through ENFORCE-003)

use stratus::domain::entities::{
    ActionKind, EnforcementResult, EnhancedBindingContext, Severity, INTERNAL_ERROR_KIND,
};
use stratus::domain::policies::FnRule;
use stratus::domain::ports::{EnforcementSink, RuleError};
use stratus::{ComplianceEnforcer, ComplianceFramework};

use crate::common::*;

fn rule_ids(result: &EnforcementResult) -> Vec<&str> {
    result.violations.iter().map(|v| v.rule_id.as_str()).collect()
}

/// CONTRACT ENFORCE-001: Stricter Postures Are Supersets
///
/// Everything a framework evaluates, every stricter framework evaluates too,
/// in the same relative order, and cross-posture rules always run last.
mod posture_superset {
    use super::*;

    #[test]
    fn contract_rule_sets_nest_by_strictness() {
        let enforcer = ComplianceEnforcer::standard(&required_tags());
        let commercial = enforcer.rule_ids_for(ComplianceFramework::Commercial);
        let moderate = enforcer.rule_ids_for(ComplianceFramework::FedrampModerate);
        let high = enforcer.rule_ids_for(ComplianceFramework::FedrampHigh);

        for (looser, stricter) in [(&commercial, &moderate), (&moderate, &high)] {
            let filtered: Vec<&String> =
                stricter.iter().filter(|id| looser.contains(id)).collect();
            assert_eq!(filtered, looser.iter().collect::<Vec<_>>());
            assert!(stricter.len() > looser.len());
        }
        for ids in [&commercial, &moderate, &high] {
            assert!(ids.ends_with(&[
                "xp.no-wildcard-scope".to_string(),
                "xp.traceability-tags".to_string(),
                "xp.audit-trail".to_string(),
            ]));
        }
    }

    #[test]
    fn contract_violations_only_grow_with_strictness() {
        let enforcer = ComplianceEnforcer::standard(&required_tags());
        let mut previous: Vec<String> = Vec::new();
        for framework in ComplianceFramework::ALL {
            let result = enforcer.enforce(&risky_context(framework));
            let ids: Vec<String> = rule_ids(&result).into_iter().map(String::from).collect();
            for id in &previous {
                assert!(ids.contains(id), "{framework} lost {id}");
            }
            assert!(!result.compliant);
            previous = ids;
        }
    }

    #[test]
    fn contract_hardened_binding_is_compliant_everywhere() {
        let enforcer = ComplianceEnforcer::standard(&required_tags());
        for framework in ComplianceFramework::ALL {
            let result = enforcer.enforce(&hardened_context(framework));
            assert!(result.compliant, "{framework}: {:?}", result.violations);
            assert_eq!(result.metadata.framework, framework);
            assert!(result
                .actions
                .iter()
                .any(|a| a.kind == ActionKind::Monitoring));
        }
    }
}

/// CONTRACT ENFORCE-002: Compliant Means No Errors
mod compliance_verdict {
    use super::*;

    #[test]
    fn contract_warnings_and_infos_do_not_block() {
        let mut ctx = hardened_context(ComplianceFramework::FedrampHigh);
        ctx.options.access = stratus::domain::entities::AccessLevel::Admin;

        let result = ComplianceEnforcer::standard(&required_tags()).enforce(&ctx);
        assert!(result.count(Severity::Warning) >= 1);
        assert!(result.count(Severity::Info) >= 1);
        assert_eq!(result.count(Severity::Error), 0);
        assert!(result.compliant);
    }

    #[test]
    fn contract_missing_tags_are_named() {
        let mut ctx = hardened_context(ComplianceFramework::Commercial);
        ctx.options.tags.remove("owner");

        let result = ComplianceEnforcer::standard(&required_tags()).enforce(&ctx);
        let tags = result.violations_for("xp.traceability-tags");
        assert_eq!(tags.len(), 1);
        assert!(tags[0].description.contains("owner"));
        assert!(!tags[0].description.contains("service"));
    }
}

fn failing(_: &EnhancedBindingContext, sink: &mut dyn EnforcementSink) -> Result<(), RuleError> {
    sink.report("test.failing", "test", Severity::Warning, "partial", "none");
    Err(RuleError::MissingField {
        field: "target.config.port".to_string(),
    })
}

fn panicking(_: &EnhancedBindingContext, _: &mut dyn EnforcementSink) -> Result<(), RuleError> {
    panic!("index out of bounds")
}

fn noisy(_: &EnhancedBindingContext, sink: &mut dyn EnforcementSink) -> Result<(), RuleError> {
    sink.report("test.noisy", "test", Severity::Info, "still runs", "none");
    Ok(())
}

/// CONTRACT ENFORCE-003: Rule Failures Are Contained
///
/// A rule that errors or panics yields exactly one internal-error violation,
/// its partial output is dropped, and later rules still run.
mod failure_containment {
    use super::*;

    #[test]
    fn contract_failing_rules_become_internal_errors() {
        let enforcer = ComplianceEnforcer::empty()
            .with_posture_rule(
                ComplianceFramework::Commercial,
                FnRule::new("test.failing", failing),
            )
            .with_posture_rule(
                ComplianceFramework::Commercial,
                FnRule::new("test.panicking", panicking),
            )
            .with_cross_posture_rule(FnRule::new("test.noisy", noisy));

        let result = enforcer.enforce(&hardened_context(ComplianceFramework::FedrampModerate));

        assert_eq!(
            rule_ids(&result),
            vec!["test.failing", "test.panicking", "test.noisy"]
        );
        let internal: Vec<_> = result
            .violations
            .iter()
            .filter(|v| v.kind == INTERNAL_ERROR_KIND)
            .collect();
        assert_eq!(internal.len(), 2);
        assert!(internal.iter().all(|v| v.severity == Severity::Error));
        assert!(internal[0].description.contains("target.config.port"));
        assert!(internal[1].description.contains("index out of bounds"));
        assert!(!result.violations.iter().any(|v| v.description == "partial"));
        assert_eq!(result.metadata.failed_rules, 2);
        assert!(!result.compliant);
    }
}
