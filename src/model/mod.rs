mod analysis;
mod macro_usage;
mod result;

pub use analysis::AnalysisDocument;
pub use macro_usage::MacroUsage;
pub use result::{Error, Result, SchemaError};
