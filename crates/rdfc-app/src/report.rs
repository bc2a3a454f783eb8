//! Result formatting

use std::fmt::Write as _;

use rdfc_core::ChannelPair;
use rdfc_native::RdfcAnalysis;
use serde::Serialize;

/// Plain-text report: the pattern rows then one score per reference.
pub fn render_text(analysis: &RdfcAnalysis) -> String {
    let mut out = String::from("rdFC Pattern:\n");

    for (i, row) in analysis.pattern.rows().iter().enumerate() {
        let _ = write!(out, "Order {}:", i + 1);
        for pair in ChannelPair::ALL {
            let _ = write!(out, " {:8.4}", row[pair.column()]);
        }
        out.push('\n');
    }

    out.push_str("\nMatch Scores for rdFC Pattern:\n");
    for (i, score) in analysis.scores.as_array().iter().enumerate() {
        let _ = writeln!(out, "Reference Pattern {} : {:.4}", i + 1, score);
    }

    out
}

#[derive(Serialize)]
struct JsonReport<'a> {
    pairs: [&'static str; 3],
    #[serde(flatten)]
    analysis: &'a RdfcAnalysis,
    best_match: usize,
}

/// Pretty-printed JSON report.
pub fn render_json(analysis: &RdfcAnalysis) -> serde_json::Result<String> {
    let report = JsonReport {
        pairs: ChannelPair::ALL.map(ChannelPair::name),
        analysis,
        best_match: analysis.scores.best_match(),
    };
    serde_json::to_string_pretty(&report)
}
