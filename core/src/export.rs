use std::fmt;

pub const EXPORT_PREFIX: &str = "ricepaint";

#[derive(Debug)]
pub enum ExportError {
    /// The backing store has not been allocated yet.
    EmptySurface,
    Encode(String),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::EmptySurface => write!(f, "nothing to export: surface has no pixels"),
            ExportError::Encode(reason) => write!(f, "png encoding failed: {reason}"),
        }
    }
}

impl std::error::Error for ExportError {}

pub fn export_file_name(timestamp_ms: u64) -> String {
    format!("{EXPORT_PREFIX}_{timestamp_ms}.png")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_embeds_timestamp() {
        assert_eq!(export_file_name(1_700_000_000_123), "ricepaint_1700000000123.png");
    }

    #[test]
    fn errors_describe_themselves() {
        assert!(ExportError::EmptySurface.to_string().contains("no pixels"));
        assert!(ExportError::Encode("boom".into()).to_string().ends_with("boom"));
    }
}
