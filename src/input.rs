//! TSV input adapter.
//!
//! Each non-empty line is `x\ty` where both fields parse as finite
//! reals. A trailing empty line is tolerated and ignored. Malformed
//! lines fail with [`PartitionError::ParseError`] carrying the 1-based
//! line number.

use crate::error::PartitionError;
use crate::geometry::Position;

/// Parses a full TSV positions stream into an ordered list of positions.
pub fn parse_positions(input: &str) -> Result<Vec<Position>, PartitionError> {
    let mut positions = Vec::new();
    for (idx, line) in input.lines().enumerate() {
        let line_number = idx + 1;
        if line.is_empty() {
            continue;
        }
        positions.push(parse_line(line, line_number)?);
    }
    Ok(positions)
}

fn parse_line(line: &str, line_number: usize) -> Result<Position, PartitionError> {
    let mut fields = line.split('\t');
    let x_field = fields.next().ok_or_else(|| PartitionError::ParseError {
        line: line_number,
        reason: "missing x field".to_string(),
    })?;
    let y_field = fields.next().ok_or_else(|| PartitionError::ParseError {
        line: line_number,
        reason: "missing y field".to_string(),
    })?;
    if fields.next().is_some() {
        return Err(PartitionError::ParseError {
            line: line_number,
            reason: "expected exactly two tab-separated fields".to_string(),
        });
    }

    let x: f64 = x_field.parse().map_err(|_| PartitionError::ParseError {
        line: line_number,
        reason: format!("invalid x value: {x_field:?}"),
    })?;
    let y: f64 = y_field.parse().map_err(|_| PartitionError::ParseError {
        line: line_number,
        reason: format!("invalid y value: {y_field:?}"),
    })?;

    if !x.is_finite() || !y.is_finite() {
        return Err(PartitionError::ParseError {
            line: line_number,
            reason: "coordinates must be finite".to_string(),
        });
    }

    Ok(Position::new(x, y))
}
