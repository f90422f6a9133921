//! CSV export of recommendations.

use crate::models::Recommendation;

/// Column headers of the recommendations export.
pub const HEADERS: [&str; 5] = ["priority", "category", "difficulty", "step", "recommendation"];

/// Escape one CSV field.
///
/// Fields starting with a spreadsheet formula character are prefixed with
/// `'`; fields containing a comma, quote, CR or LF are quoted with embedded
/// quotes doubled.
pub fn escape_field(field: &str) -> String {
    let field = if field.starts_with(['=', '+', '-', '@']) {
        format!("'{}", field)
    } else {
        field.to_string()
    };

    if field.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field
    }
}

fn write_row(output: &mut String, fields: &[&str]) {
    let row: Vec<String> = fields.iter().map(|f| escape_field(f)).collect();
    output.push_str(&row.join(","));
    output.push('\n');
}

/// Generate a CSV document with one row per recommendation.
pub fn generate_csv_report(recs: &[Recommendation]) -> String {
    let mut output = String::new();

    write_row(&mut output, &HEADERS);

    for rec in recs {
        write_row(
            &mut output,
            &[
                rec.priority.as_str(),
                &rec.category,
                &rec.difficulty,
                &rec.source_step_key,
                &rec.text,
            ],
        );
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Priority;

    #[test]
    fn test_escape_field() {
        assert_eq!(escape_field("plain"), "plain");
        assert_eq!(escape_field("a, b"), "\"a, b\"");
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_field("two\nlines"), "\"two\nlines\"");
        assert_eq!(escape_field("=SUM(A1)"), "'=SUM(A1)");
        assert_eq!(escape_field("-1, or so"), "\"'-1, or so\"");
    }

    #[test]
    fn test_generate_csv_report() {
        let recs = vec![
            Recommendation::from_text("Fix title tags", "output_a"),
            Recommendation {
                priority: Priority::High,
                category: "technical".to_string(),
                ..Recommendation::from_text("Fix redirects, then 404s", "output_b")
            },
        ];

        let csv = generate_csv_report(&recs);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "priority,category,difficulty,step,recommendation");
        assert_eq!(lines[1], "medium,general,unspecified,output_a,Fix title tags");
        assert_eq!(
            lines[2],
            "high,technical,unspecified,output_b,\"Fix redirects, then 404s\""
        );
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_empty_export_has_header_only() {
        assert_eq!(
            generate_csv_report(&[]),
            "priority,category,difficulty,step,recommendation\n"
        );
    }
}
