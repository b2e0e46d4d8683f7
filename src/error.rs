use std::path::PathBuf;

/// Errors produced while scanning, parsing, or writing reports.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid scan target `{0}`: must be non-empty and must not start with `-`")]
    InvalidTarget(String),

    #[error("scanner `{binary}` could not be started: {source}")]
    ScannerNotFound {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    #[error("scanner `{binary}` exited with {}: {stderr}", exit_label(.code))]
    ScannerFailed {
        binary: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("scanner finished but produced no output at {0}")]
    MissingOutput(PathBuf),

    #[error("malformed scan output: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<quick_xml::DeError> for Error {
    fn from(err: quick_xml::DeError) -> Self {
        Error::Parse(err.to_string())
    }
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "no status (terminated by signal)".to_string(),
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scanner_failed_message_includes_code() {
        let err = Error::ScannerFailed {
            binary: "nmap".to_string(),
            code: Some(2),
            stderr: "Failed to resolve target".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("status 2"));
        assert!(msg.contains("Failed to resolve target"));
    }

    #[test]
    fn test_scanner_failed_without_code() {
        let err = Error::ScannerFailed {
            binary: "nmap".to_string(),
            code: None,
            stderr: String::new(),
        };
        assert!(err.to_string().contains("terminated by signal"));
    }
}
