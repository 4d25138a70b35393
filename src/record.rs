use crate::error::{Error, Result};

/// One benchmark timing parsed from a single log line.
#[derive(PartialEq, Debug, Clone)]
pub enum RawRecord {
    /// `s,<size>,<time>`
    Sequential { size: String, time: f64 },
    /// `p,<size>,<threads>,<time>`; any kind other than `s` lands here.
    Parallel { size: String, threads: u32, time: f64 },
}

/// Parses a trimmed, non-empty line. `line_no` is 1-based and only used for errors.
pub fn parse(line_no: usize, line: &str) -> Result<RawRecord> {
    let malformed = |reason: String| Error::MalformedRecord {
        line: line_no,
        content: line.to_owned(),
        reason,
    };

    let parts: Vec<&str> = line.split(',').map(str::trim).collect();
    if parts.len() < 3 {
        return Err(malformed(format!("expected at least 3 fields, found {}", parts.len())));
    }
    let size = parts[1].to_owned();

    if parts[0] == "s" {
        if parts.len() != 3 {
            return Err(malformed(format!("sequential record takes 3 fields, found {}", parts.len())));
        }
        let time = parse_time(parts[2]).map_err(malformed)?;
        return Ok(RawRecord::Sequential { size, time });
    }

    if parts.len() != 4 {
        return Err(malformed(format!("parallel record takes 4 fields, found {}", parts.len())));
    }
    let threads: u32 = parts[2]
        .parse()
        .map_err(|_| malformed(format!("invalid thread count {:?}", parts[2])))?;
    let time = parse_time(parts[3]).map_err(malformed)?;
    Ok(RawRecord::Parallel { size, threads, time })
}

fn parse_time(field: &str) -> std::result::Result<f64, String> {
    match field.parse::<f64>() {
        Ok(t) if t.is_finite() => Ok(t),
        _ => Err(format!("invalid time value {:?}", field)),
    }
}
