//! Synthesis use case
//!
//! manifest → resolved configs → binding lookups → compliance verdicts →
//! provisioning instructions.

mod result;
mod use_case;


pub use result::{ComponentOutcome, ConnectionOutcome, SynthesisPlan, Verdict};
pub use use_case::SynthesisPipeline;
