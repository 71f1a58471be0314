use crate::attention::AttentionCategory;
use crate::io::output::OutputWriter;
use crate::pipeline::{ReviewReport, SheetReport};
use colored::*;
use std::io::Write;

/// How many queued rows to show per sheet before summarizing the rest.
const QUEUE_PREVIEW: usize = 10;

pub struct TerminalWriter<W: Write> {
    writer: W,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_report(&mut self, report: &ReviewReport) -> anyhow::Result<()> {
        self.print_header(report)?;
        for sheet in &report.sheets {
            self.print_sheet(sheet)?;
        }
        self.print_status(report)?;
        self.writer.flush()?;
        Ok(())
    }
}

fn category_color(category: AttentionCategory, text: &str) -> ColoredString {
    match category {
        AttentionCategory::Rfi
        | AttentionCategory::ContractError
        | AttentionCategory::ContractTextUnreadable
        | AttentionCategory::BlacklistHit => text.red(),
        AttentionCategory::ContractExtractionSuspect
        | AttentionCategory::ContractNotApplicable
        | AttentionCategory::Anomaly
        | AttentionCategory::IncompleteAddress => text.yellow(),
        AttentionCategory::ManualEditUnreviewed => text.cyan(),
        AttentionCategory::None => text.green(),
    }
}

impl<W: Write> TerminalWriter<W> {
    fn print_header(&mut self, report: &ReviewReport) -> anyhow::Result<()> {
        writeln!(self.writer, "{}", "Review Status Report".bold().blue())?;
        writeln!(
            self.writer,
            "{} sheets, {} rows, {} anomalies",
            report.sheets.len(),
            report.total_rows(),
            report.total_anomalies()
        )?;
        let attention: Vec<String> = report
            .category_totals()
            .into_iter()
            .filter(|(category, _)| *category != AttentionCategory::None)
            .map(|(category, count)| format!("{} {}", count, category.label()))
            .collect();
        if !attention.is_empty() {
            writeln!(self.writer, "Attention: {}", attention.join(", "))?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn print_sheet(&mut self, sheet: &SheetReport) -> anyhow::Result<()> {
        let analytics = &sheet.analytics;
        writeln!(self.writer, "{}", sheet.sheet_name.bold())?;
        writeln!(
            self.writer,
            "  Progress: {}/{} ({}%)  Pending: {}  Verified cells: {}",
            analytics.completed_rows,
            analytics.total_rows,
            analytics.progress_percent,
            analytics.pending_rows(),
            analytics.verified_cell_count
        )?;
        for (category, count) in &analytics.category_counts {
            writeln!(
                self.writer,
                "  {:<28} {}",
                category_color(*category, category.label()),
                count
            )?;
        }

        let blocking: Vec<_> = sheet
            .review_queue()
            .into_iter()
            .filter(|row| row.review.is_blocking)
            .collect();
        for row in blocking.iter().take(QUEUE_PREVIEW) {
            writeln!(
                self.writer,
                "    row {:>4}  {}  {}",
                row.row_index + 1,
                category_color(row.attention.category, row.review.reason.as_str()),
                row.review.details.dimmed()
            )?;
        }
        if blocking.len() > QUEUE_PREVIEW {
            writeln!(
                self.writer,
                "    ... and {} more blocking rows",
                blocking.len() - QUEUE_PREVIEW
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn print_status(&mut self, report: &ReviewReport) -> anyhow::Result<()> {
        let blocking = report.blocking_rows();
        if blocking == 0 {
            writeln!(self.writer, "{} {}", "✓".green(), "READY".green().bold())?;
        } else {
            writeln!(
                self.writer,
                "{} {} ({} blocking rows)",
                "✗".red(),
                "NEEDS REVIEW".red().bold(),
                blocking
            )?;
        }
        Ok(())
    }
}
