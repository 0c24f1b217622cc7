use comments_core::FileAnalysis;
use csv::Writer;

pub fn generate_csv_results(analyses: &Vec<FileAnalysis>) -> String {
    let mut wtr = Writer::from_writer(vec![]);
    wtr.write_record([
        "filename",
        "rule",
        "category",
        "severity",
        "message",
        "start_line",
        "start_col",
        "end_line",
        "end_col",
    ])
    .expect("csv serialization without issue");

    for analysis in analyses {
        for v in &analysis.violations {
            wtr.write_record(&[
                analysis.filename.to_string(),
                v.rule.to_string(),
                v.category.to_string(),
                v.severity.to_string(),
                v.message.to_string(),
                v.start.line.to_string(),
                v.start.col.to_string(),
                v.end.line.to_string(),
                v.end.col.to_string(),
            ])
            .expect("csv serialization without issue for violation");
        }
    }

    String::from_utf8(wtr.into_inner().expect("generate CSV file")).expect("generate CSV file")
}
