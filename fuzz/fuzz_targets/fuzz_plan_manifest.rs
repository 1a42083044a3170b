#![no_main]

use std::sync::Arc;

use libfuzzer_sys::fuzz_target;
use stratus::{BinderRegistry, EngineConfig, Manifest, SynthesisPipeline};

fuzz_target!(|data: &[u8]| {
    let Ok(content) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(manifest) = Manifest::from_yaml_str(content) else {
        return;
    };

    // Arbitrary user layers flow through merge, normalise and validate
    let registry = Arc::new(BinderRegistry::with_builtin_strategies().sealed());
    if let Ok(pipeline) = SynthesisPipeline::new(registry, EngineConfig::default()) {
        let plan = pipeline.plan(&manifest);
        let _ = plan.blocking_reasons();
    }
});
