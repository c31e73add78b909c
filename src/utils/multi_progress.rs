use crate::utils::ProgressStyleTemplate;
use indicatif::{MultiProgress, ProgressBar};
use std::borrow::Cow;
use std::time::Duration;

pub trait MultiProgressNew {
    fn add_stage(&self, message: impl Into<Cow<'static, str>>) -> ProgressBar;
}

impl MultiProgressNew for MultiProgress {
    fn add_stage(&self, message: impl Into<Cow<'static, str>>) -> ProgressBar {
        let pb = self.add(ProgressBar::new_spinner());
        pb.set_style(ProgressStyleTemplate::only_message());
        pb.set_message(message);
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }
}
