use comments_core::FileAnalysis;
use prettytable::{format, Table};

pub fn print_violations_table(analyses: &Vec<FileAnalysis>) {
    let mut table = Table::new();
    let format = format::FormatBuilder::new()
        .separator(
            format::LinePosition::Title,
            format::LineSeparator::new('-', '-', '-', '-'),
        )
        .padding(1, 1)
        .build();
    table.set_format(format);
    table.set_titles(row![
        "rule", "filename", "location", "category", "severity", "message"
    ]);
    for analysis in analyses {
        if !analysis.violations.is_empty() {
            for violation in &analysis.violations {
                let position = format!(
                    "{}:{}-{}:{}",
                    violation.start.line,
                    violation.start.col,
                    violation.end.line,
                    violation.end.col
                );
                table.add_row(row![
                    violation.rule,
                    analysis.filename,
                    position,
                    violation.category.to_string(),
                    violation.severity.to_string(),
                    violation.message
                ]);
            }
        }
    }
    table.printstd();
}
