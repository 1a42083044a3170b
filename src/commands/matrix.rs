//! Matrix command handler

use std::io::IsTerminal;

use anyhow::Result;

use stratus::presentation::json::{emit_event, CompleteEvent, ItemEvent, StartEvent};
use stratus::presentation::output::{render_matrix, render_validation};
use stratus::BinderRegistry;

const COMMAND: &str = "matrix";

pub fn cmd_matrix(source: Option<&str>, validate: bool, json: bool) -> Result<bool> {
    let registry = BinderRegistry::with_builtin_strategies().sealed();

    let (bindings, triggers) = match source {
        Some(source) => (
            registry.supported_bindings(source),
            registry.supported_triggers(source),
        ),
        None => (registry.all_bindings(), registry.all_triggers()),
    };
    let report = validate.then(|| registry.validate_matrix());
    let success = report.as_ref().map_or(true, |r| r.valid);

    if json {
        emit_event(&StartEvent::new(COMMAND))?;
        for entry in &bindings {
            emit_event(&ItemEvent::new("binding-entry", COMMAND, entry))?;
        }
        for entry in &triggers {
            emit_event(&ItemEvent::new("trigger-entry", COMMAND, entry))?;
        }
        if let Some(report) = &report {
            emit_event(&ItemEvent::new("validation", COMMAND, report))?;
        }
        emit_event(&CompleteEvent::new(COMMAND, success))?;
    } else {
        print!("{}", render_matrix(&bindings, &triggers));
        if let Some(report) = &report {
            println!();
            print!("{}", render_validation(report, std::io::stdout().is_terminal()));
        }
    }
    Ok(success)
}
