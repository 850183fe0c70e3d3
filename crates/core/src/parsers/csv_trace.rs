use okuma_seyri_protocol::{GazeEstimate, ViewportSize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CsvTraceError {
    #[error("invalid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("line {line}: expected `t,x,y[,w,h]`, found {fields} fields")]
    FieldCount { line: usize, fields: usize },
    #[error("line {line}: invalid {field} `{value}`")]
    InvalidField {
        line: usize,
        field: &'static str,
        value: String,
    },
    #[error("no gaze rows found")]
    Empty,
}

/// Parse a comma-separated gaze trace.
///
/// Each row is `t,x,y` or `t,x,y,w,h` (epoch ms, viewport pixels, optional
/// window size). Blank lines and `#` comments are skipped, as is a header
/// row if the first row does not start with a number.
pub fn parse_csv_trace(data: &[u8]) -> Result<Vec<GazeEstimate>, CsvTraceError> {
    let text = std::str::from_utf8(data)?;
    let mut estimates = Vec::new();
    let mut seen_row = false;

    for (index, raw) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();

        if !seen_row {
            seen_row = true;
            if fields[0].parse::<f64>().is_err() {
                continue;
            }
        }

        if fields.len() != 3 && fields.len() != 5 {
            return Err(CsvTraceError::FieldCount {
                line: line_no,
                fields: fields.len(),
            });
        }

        let t = parse_field::<u64>(fields[0], "t", line_no)?;
        let x = parse_field::<f64>(fields[1], "x", line_no)?;
        let y = parse_field::<f64>(fields[2], "y", line_no)?;
        let viewport = if fields.len() == 5 {
            ViewportSize::new(
                parse_field::<u32>(fields[3], "w", line_no)?,
                parse_field::<u32>(fields[4], "h", line_no)?,
            )
        } else {
            ViewportSize::default()
        };
        estimates.push(GazeEstimate::new(t, x, y, viewport));
    }

    if estimates.is_empty() {
        return Err(CsvTraceError::Empty);
    }
    Ok(estimates)
}

fn parse_field<T: std::str::FromStr>(
    value: &str,
    field: &'static str,
    line: usize,
) -> Result<T, CsvTraceError> {
    value.parse().map_err(|_| CsvTraceError::InvalidField {
        line,
        field,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rows_with_and_without_viewport() {
        let input = b"t,x,y,w,h\n# warmup\n1000,10.5,120,1280,720\n\n1033,12,171.25\n";
        let trace = parse_csv_trace(input).unwrap();
        assert_eq!(trace.len(), 2);
        assert_eq!(trace[0].viewport, ViewportSize::new(1280, 720));
        assert_eq!(trace[1].t, 1033);
        assert_eq!(trace[1].y, 171.25);
        assert_eq!(trace[1].viewport, ViewportSize::default());
    }

    #[test]
    fn reports_bad_rows_with_line_numbers() {
        let err = parse_csv_trace(b"1,2,3\n4,5\n").unwrap_err();
        assert!(matches!(err, CsvTraceError::FieldCount { line: 2, fields: 2 }));

        let err = parse_csv_trace(b"1,2,abc\n").unwrap_err();
        assert!(matches!(err, CsvTraceError::InvalidField { line: 1, field: "y", .. }));
    }

    #[test]
    fn header_only_is_empty() {
        assert!(matches!(
            parse_csv_trace(b"t,x,y\n"),
            Err(CsvTraceError::Empty)
        ));
    }
}
