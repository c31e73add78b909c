use crate::model::{Error, Result, SchemaError};
use indexmap::IndexMap;
use serde_json::{from_str, Value};
use std::fs;

/// Per-repository analysis results as produced by the upstream analyzer,
/// keyed by repository name in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisDocument {
    pub repos: IndexMap<String, Value>,
}

// New
impl AnalysisDocument {
    pub fn from_file(path: &str) -> Result<Self> {
        let json_str = fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_string(),
            source,
        })?;
        Self::parse(&json_str)
    }

    pub fn new(repos: IndexMap<String, Value>) -> Self {
        Self { repos }
    }
}

// Parser
impl AnalysisDocument {
    pub fn parse(json_str: &str) -> Result<Self> {
        let document: Value = from_str(json_str)?;
        let Value::Object(mut document) = document else {
            return Err(SchemaError::NotAnObject.into());
        };
        let Some(repos) = document.remove("repos") else {
            return Err(SchemaError::MissingRepos.into());
        };
        let Value::Object(repos) = repos else {
            return Err(SchemaError::ReposNotAnObject.into());
        };
        Ok(Self::new(repos.into_iter().collect()))
    }
}
