//! CSV text for report downloads.
//!
//! Fields containing a comma, quote, CR or LF are quoted, quotes are doubled,
//! and rows end in CRLF. Fields that a spreadsheet would read as a formula
//! (leading `=`, `+`, `-` or `@`) are prefixed with `'`.

use crate::format;
use crate::models::PromoQualifier;

/// Build a CSV document from a header row and data rows.
pub fn to_csv<R, F>(headers: &[&str], rows: R) -> String
where
    R: IntoIterator<Item = Vec<F>>,
    F: AsRef<str>,
{
    let mut out = String::new();
    push_row(&mut out, headers.iter().copied());
    for row in rows {
        push_row(&mut out, row.iter().map(|f| f.as_ref()));
    }
    out
}

fn push_row<'a>(out: &mut String, fields: impl Iterator<Item = &'a str>) {
    let mut first = true;
    for field in fields {
        if !first {
            out.push(',');
        }
        first = false;
        push_field(out, field);
    }
    out.push_str("\r\n");
}

fn push_field(out: &mut String, field: &str) {
    let guarded;
    let field = if field.starts_with(['=', '+', '-', '@']) && field.parse::<f64>().is_err() {
        guarded = format!("'{field}");
        guarded.as_str()
    } else {
        field
    };
    if field.contains([',', '"', '\r', '\n']) {
        out.push('"');
        out.push_str(&field.replace('"', "\"\""));
        out.push('"');
    } else {
        out.push_str(field);
    }
}

/// Export rows of the promo-qualifier report.
pub fn promo_qualifiers(rows: &[PromoQualifier]) -> String {
    to_csv(
        &["S/N", "Username", "Name", "Left PV", "Right PV", "Qualified At"],
        rows.iter().enumerate().map(|(i, row)| {
            vec![
                (i + 1).to_string(),
                row.username.clone(),
                row.name.clone().unwrap_or_default(),
                format!("{:.2}", row.left_pv),
                format!("{:.2}", row.right_pv),
                row.qualified_at
                    .as_deref()
                    .map(format::timestamp)
                    .unwrap_or_default(),
            ]
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoting_rules() {
        let csv = to_csv(
            &["a", "b"],
            vec![vec!["plain", "with, comma"], vec!["say \"hi\"", "line\nbreak"]],
        );
        assert_eq!(
            csv,
            "a,b\r\nplain,\"with, comma\"\r\n\"say \"\"hi\"\"\",\"line\nbreak\"\r\n"
        );
    }

    #[test]
    fn formula_cells_are_neutralised() {
        let csv = to_csv(&["x"], vec![vec!["=SUM(A1)"], vec!["-12.5"]]);
        assert_eq!(csv, "x\r\n'=SUM(A1)\r\n-12.5\r\n");
    }

    #[test]
    fn promo_export() {
        let rows = vec![PromoQualifier {
            id: 1,
            username: "ada".into(),
            name: Some("Ada Obi".into()),
            left_pv: 1200.0,
            right_pv: 800.5,
            qualified_at: Some("2024-03-12".into()),
        }];
        let csv = promo_qualifiers(&rows);
        let lines: Vec<&str> = csv.split("\r\n").collect();
        assert_eq!(lines[0], "S/N,Username,Name,Left PV,Right PV,Qualified At");
        assert_eq!(lines[1], "1,ada,Ada Obi,1200.00,800.50,12 Mar 2024");
    }
}
