use crate::analyze::RepoTotals;
use crate::model::{AnalysisDocument, MacroUsage, Result, SchemaError};
use serde_json::Value;

const MACRO_USAGE: &str = "macro_usage";

pub trait Aggregator {
    fn aggregate_totals(&self) -> Result<RepoTotals>;
}

impl Aggregator for AnalysisDocument {
    fn aggregate_totals(&self) -> Result<RepoTotals> {
        let mut totals = RepoTotals::new();
        for (name, details) in &self.repos {
            let Some(details) = details.as_object() else {
                return Err(SchemaError::RepoNotAnObject { repo: name.clone() }.into());
            };
            // Repos the analyzer never reached have no usage at all.
            let Some(macro_usage) = details.get(MACRO_USAGE).filter(|u| is_truthy(u)) else {
                continue;
            };
            let usage = MacroUsage::parse(name, macro_usage)?;
            totals.insert(name.clone(), usage.total());
        }
        Ok(totals)
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
