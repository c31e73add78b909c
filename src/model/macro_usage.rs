use crate::model::{Result, SchemaError};
use serde_json::{Map, Value};

const MACRO_INVOCATION_COUNT: &str = "macro_invocation_count";
const ATTRIBUTE_MACRO_INVOCATION_COUNT: &str = "attribute_macro_invocation_count";
const DERIVE_MACRO_USAGE: &str = "derive_macro_usage";
const DERIVE_MACRO_COUNT: &str = "count";

/// The three invocation counts of one repository's `macro_usage` object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MacroUsage {
    pub macro_invocations: u64,
    pub attribute_macro_invocations: u64,
    pub derive_macros: u64,
}

// New
impl MacroUsage {
    pub fn new(macro_invocations: u64, attribute_macro_invocations: u64, derive_macros: u64) -> Self {
        Self {
            macro_invocations,
            attribute_macro_invocations,
            derive_macros,
        }
    }

    pub fn total(&self) -> u64 {
        self.macro_invocations
            .saturating_add(self.attribute_macro_invocations)
            .saturating_add(self.derive_macros)
    }
}

// Parser
impl MacroUsage {
    /// Reads the counts out of `macro_usage`. Missing leaf counts are zero,
    /// a missing `derive_macro_usage` object is not.
    pub fn parse(repo: &str, macro_usage: &Value) -> Result<Self> {
        let Some(macro_usage) = macro_usage.as_object() else {
            return Err(SchemaError::MacroUsageNotAnObject { repo: repo.to_string() }.into());
        };
        let macro_invocations = count(repo, macro_usage, MACRO_INVOCATION_COUNT)?;
        let attribute_macro_invocations =
            count(repo, macro_usage, ATTRIBUTE_MACRO_INVOCATION_COUNT)?;

        let Some(derive_macro_usage) = macro_usage.get(DERIVE_MACRO_USAGE) else {
            return Err(SchemaError::MissingDeriveMacroUsage { repo: repo.to_string() }.into());
        };
        let Some(derive_macro_usage) = derive_macro_usage.as_object() else {
            return Err(SchemaError::DeriveMacroUsageNotAnObject { repo: repo.to_string() }.into());
        };
        let derive_macros = count(repo, derive_macro_usage, DERIVE_MACRO_COUNT)?;

        Ok(Self::new(
            macro_invocations,
            attribute_macro_invocations,
            derive_macros,
        ))
    }
}

fn count(repo: &str, object: &Map<String, Value>, field: &'static str) -> Result<u64> {
    match object.get(field) {
        None => Ok(0),
        Some(value) => value.as_u64().ok_or_else(|| {
            SchemaError::InvalidCount {
                repo: repo.to_string(),
                field,
            }
            .into()
        }),
    }
}
