use crate::io::output::OutputWriter;
use crate::pipeline::{ReviewReport, SheetReport};
use std::io::Write;

pub struct MarkdownWriter<W: Write> {
    writer: W,
}

impl<W: Write> MarkdownWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for MarkdownWriter<W> {
    fn write_report(&mut self, report: &ReviewReport) -> anyhow::Result<()> {
        self.write_header(report)?;
        self.write_summary(report)?;
        for sheet in &report.sheets {
            self.write_sheet(sheet)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

impl<W: Write> MarkdownWriter<W> {
    fn write_header(&mut self, report: &ReviewReport) -> anyhow::Result<()> {
        writeln!(self.writer, "# Review Status Report")?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "Generated: {}",
            report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_summary(&mut self, report: &ReviewReport) -> anyhow::Result<()> {
        writeln!(self.writer, "## Summary")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "| Metric | Value |")?;
        writeln!(self.writer, "|--------|-------|")?;
        self.write_summary_row("Sheets", &report.sheets.len().to_string())?;
        self.write_summary_row("Rows", &report.total_rows().to_string())?;
        self.write_summary_row("Completed Rows", &report.completed_rows().to_string())?;
        self.write_summary_row("Blocking Rows", &report.blocking_rows().to_string())?;
        self.write_summary_row("Anomalies", &report.total_anomalies().to_string())?;
        writeln!(self.writer)?;

        let reasons = report.reason_totals();
        if !reasons.is_empty() {
            writeln!(self.writer, "| Review Reason | Rows | Blocking |")?;
            writeln!(self.writer, "|---------------|------|----------|")?;
            for (reason, count) in reasons {
                let blocking = if reason.is_blocking() { "yes" } else { "no" };
                writeln!(self.writer, "| {} | {} | {} |", reason, count, blocking)?;
            }
            writeln!(self.writer)?;
        }
        Ok(())
    }

    fn write_summary_row(&mut self, metric: &str, value: &str) -> anyhow::Result<()> {
        writeln!(self.writer, "| {metric} | {value} |")?;
        Ok(())
    }

    fn write_sheet(&mut self, sheet: &SheetReport) -> anyhow::Result<()> {
        let analytics = &sheet.analytics;
        writeln!(self.writer, "## {}", sheet.sheet_name)?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "Progress: {}/{} rows complete ({}%), {} verified cells",
            analytics.completed_rows,
            analytics.total_rows,
            analytics.progress_percent,
            analytics.verified_cell_count
        )?;
        writeln!(self.writer)?;

        if !analytics.category_counts.is_empty() {
            writeln!(self.writer, "| Category | Rows |")?;
            writeln!(self.writer, "|----------|------|")?;
            for (category, count) in &analytics.category_counts {
                writeln!(self.writer, "| {} | {} |", category.label(), count)?;
            }
            writeln!(self.writer)?;
        }

        let by_type = sheet.anomalies.counts_by_type();
        if !by_type.is_empty() {
            writeln!(self.writer, "| Anomaly | Count |")?;
            writeln!(self.writer, "|---------|-------|")?;
            for (anomaly_type, count) in by_type {
                writeln!(self.writer, "| {} | {} |", anomaly_type, count)?;
            }
            writeln!(self.writer)?;
        }

        let queue: Vec<_> = sheet
            .review_queue()
            .into_iter()
            .filter(|row| row.review.is_blocking)
            .collect();
        if queue.is_empty() {
            writeln!(self.writer, "No blocking rows.")?;
            writeln!(self.writer)?;
            return Ok(());
        }

        writeln!(self.writer, "### Review Queue")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "| Row | Category | Reason | Details |")?;
        writeln!(self.writer, "|-----|----------|--------|---------|")?;
        for row in queue {
            writeln!(
                self.writer,
                "| {} | {} | {} | {} |",
                row.row_index + 1,
                row.attention.category.label(),
                row.review.reason,
                row.review.details.replace('|', "\\|")
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{FieldStatus, Sheet, SignalMaps, Workbook};
    use crate::pipeline::ReviewEngine;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_markdown_lists_blocking_rows() {
        let workbook = Workbook::new(vec![Sheet::from_positional(
            "Leases",
            ["File", "URL", "Amount"],
            vec![vec!["a", "u", "1"], vec!["b", "u", "2"]],
        )]);
        let signals = SignalMaps::new().with_field_status("Leases", 1, "Amount", FieldStatus::Rfi);
        let report = ReviewEngine::default().evaluate_at(
            &workbook,
            &signals,
            &[],
            &[],
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        );

        let mut buffer = Vec::new();
        MarkdownWriter::new(&mut buffer).write_report(&report).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert!(text.contains("# Review Status Report"));
        assert!(text.contains("| Blocking Rows | 1 |"));
        assert!(text.contains("| rfi_required | 1 | yes |"));
        assert!(text.contains("| ready_to_finalize | 1 | no |"));
        assert!(text.contains("## Leases"));
        assert!(text.contains("| 2 | Open RFI | rfi_required | 1 field with open RFI |"));
    }
}
