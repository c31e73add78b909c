use indicatif::ProgressStyle;

const ONLY_MESSAGE_TEMPLATE: &str = "{spinner} {wide_msg}";
const FAILED_TEMPLATE: &str = "❌ {wide_msg}";

pub struct ProgressStyleTemplate;

impl ProgressStyleTemplate {
    pub fn only_message() -> ProgressStyle {
        Self::with_template(ONLY_MESSAGE_TEMPLATE)
    }

    pub fn failed() -> ProgressStyle {
        Self::with_template(FAILED_TEMPLATE)
    }

    fn with_template(template: &str) -> ProgressStyle {
        ProgressStyle::with_template(template).unwrap_or_else(|_| ProgressStyle::default_spinner())
    }
}
