//! Property tests for posture-tiered enforcement.

use std::collections::BTreeSet;

use proptest::prelude::*;

use stratus::domain::entities::{AccessLevel, EnhancedBindingContext};
use stratus::{ComplianceEnforcer, ComplianceFramework};

use crate::common::*;

#[derive(Debug, Clone)]
struct Knobs {
    at_rest: bool,
    in_transit: bool,
    customer_managed_key: bool,
    public: bool,
    wildcard: bool,
    access: AccessLevel,
    iam_auth: bool,
    cross_account: bool,
    audit_logging: bool,
    tagged: bool,
}

fn access() -> impl Strategy<Value = AccessLevel> {
    prop_oneof![
        Just(AccessLevel::Read),
        Just(AccessLevel::Write),
        Just(AccessLevel::ReadWrite),
        Just(AccessLevel::Admin),
    ]
}

fn knobs() -> impl Strategy<Value = Knobs> {
    (
        (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()),
        (access(), any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()),
    )
        .prop_map(
            |(
                (at_rest, in_transit, customer_managed_key, public, wildcard),
                (access, iam_auth, cross_account, audit_logging, tagged),
            )| Knobs {
                at_rest,
                in_transit,
                customer_managed_key,
                public,
                wildcard,
                access,
                iam_auth,
                cross_account,
                audit_logging,
                tagged,
            },
        )
}

fn context(knobs: &Knobs, framework: ComplianceFramework) -> EnhancedBindingContext {
    let mut ctx = hardened_context(framework);
    let data = &mut ctx.target_capability_data;
    data.encryption.at_rest = knobs.at_rest;
    data.encryption.in_transit = knobs.in_transit;
    data.encryption.customer_managed_key = knobs.customer_managed_key;
    data.network.publicly_accessible = knobs.public;
    if knobs.wildcard {
        data.resources.push("arn:aws:rds:*".into());
    }
    ctx.options.access = knobs.access;
    ctx.options.iam_auth = knobs.iam_auth;
    ctx.options.cross_account = knobs.cross_account;
    ctx.options.audit_logging = knobs.audit_logging;
    if !knobs.tagged {
        ctx.options.tags.clear();
    }
    ctx
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: A stricter framework reports every violation a looser one
    /// does, and is never compliant where the looser one is not.
    #[test]
    fn property_stricter_posture_is_superset(knobs in knobs()) {
        let enforcer = ComplianceEnforcer::standard(&required_tags());
        let results: Vec<_> = ComplianceFramework::ALL
            .iter()
            .map(|fw| enforcer.enforce(&context(&knobs, *fw)))
            .collect();

        for pair in results.windows(2) {
            let looser: BTreeSet<(&str, &str)> = pair[0]
                .violations
                .iter()
                .map(|v| (v.rule_id.as_str(), v.description.as_str()))
                .collect();
            let stricter: BTreeSet<(&str, &str)> = pair[1]
                .violations
                .iter()
                .map(|v| (v.rule_id.as_str(), v.description.as_str()))
                .collect();
            prop_assert!(looser.is_subset(&stricter), "{:?} not within {:?}", looser, stricter);
            prop_assert!(pair[0].actions.len() <= pair[1].actions.len());
            if pair[1].compliant {
                prop_assert!(pair[0].compliant);
            }
        }
    }

    /// PROPERTY: Enforcement is a pure function of its input.
    #[test]
    fn property_enforcement_is_deterministic(knobs in knobs()) {
        let enforcer = ComplianceEnforcer::standard(&required_tags());
        for framework in ComplianceFramework::ALL {
            let ctx = context(&knobs, framework);
            prop_assert_eq!(enforcer.enforce(&ctx), enforcer.enforce(&ctx));
        }
    }
}
