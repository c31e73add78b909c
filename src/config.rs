/// Analysis produced by the macro usage scraper.
pub const ANALYSIS_PATH: &str = "data/analyzis.json";
pub const CHART_PATH: &str = "macro_counts.png";
pub const TOP_REPOS: usize = 20;

pub const CHART_TITLE: &str = "Total Macro Count per Repo";
pub const CHART_X_LABEL: &str = "Repo";
pub const CHART_Y_LABEL: &str = "Total Macro Count";
