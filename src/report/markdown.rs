use crate::analyze::Ranking;
use crate::config::{CHART_TITLE, CHART_X_LABEL, CHART_Y_LABEL};
use crate::model::{Error, Result};
use markdown_builder::Markdown;
use markdown_table::{Heading, HeadingAlignment, MarkdownTable};

pub trait MarkdownReport {
    fn report_render(&self) -> Result<String>;
}

impl MarkdownReport for Ranking {
    fn report_render(&self) -> Result<String> {
        let mut doc = Markdown::new();

        doc.header1(CHART_TITLE);
        if self.is_empty() {
            doc.paragraph("No repository reports macro usage.".to_string());
            return Ok(doc.render());
        }

        // Paragraphs are word wrapped, so the table goes after the document.
        Ok(format!("{}\n{}", doc.render(), ranking_table(self)?))
    }
}

fn ranking_table(ranking: &Ranking) -> Result<String> {
    let header = vec![
        Heading::new("#".to_string(), Some(HeadingAlignment::Right)),
        Heading::new(CHART_X_LABEL.to_string(), Some(HeadingAlignment::Left)),
        Heading::new(CHART_Y_LABEL.to_string(), Some(HeadingAlignment::Right)),
    ];
    let table = ranking
        .iter()
        .enumerate()
        .map(|(i, repo)| {
            vec![
                format!("{}", i + 1),
                escape_cell(&repo.name),
                format!("{}", repo.total),
            ]
        })
        .collect::<Vec<_>>();

    let mut md_table = MarkdownTable::new(table);
    md_table.with_headings(header);
    md_table
        .as_markdown()
        .map_err(|e| Error::Report(format!("{e:?}")))
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
