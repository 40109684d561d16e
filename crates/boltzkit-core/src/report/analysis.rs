use super::affinity::{self, AFFINITY_STYLES};
use super::confidence::{self, CONFIDENCE_STYLES, ChainCard};
use super::page;
use crate::core::models::affinity::AffinityRecord;

/// The confidence part of an analysis report.
pub enum ConfidenceSection<'a> {
    Cards(Vec<ChainCard<'a>>),
    /// Inputs were missing or unreadable; the message is shown as a notice.
    Unavailable(String),
}

/// Confidence dashboard plus optional affinity cards for one model of a job.
pub struct AnalysisReport<'a> {
    pub job_name: &'a str,
    pub confidence: ConfidenceSection<'a>,
    pub affinity: Option<AffinityRecord>,
}

impl AnalysisReport<'_> {
    pub fn render(&self) -> String {
        let mut body = String::from("<div class=\"dashboard-container\">\n");
        match &self.confidence {
            ConfidenceSection::Cards(cards) => {
                body.push_str(&confidence::render_section(self.job_name, cards));
            }
            ConfidenceSection::Unavailable(message) => {
                body.push_str(&page::notice(message));
            }
        }
        if let Some(record) = &self.affinity {
            body.push_str(&affinity::render_section(self.job_name, record));
        }
        body.push_str("</div>\n");

        page::document(
            &format!("Boltz2 Analysis: {}", self.job_name),
            "",
            &format!("{}{}", CONFIDENCE_STYLES, AFFINITY_STYLES),
            &body,
        )
    }
}
