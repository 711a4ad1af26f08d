//! Plain-text passages files.
//!
//! One passage per paragraph; paragraphs are separated by blank lines and the
//! lines inside a paragraph are joined with single spaces.

use std::path::Path;

use tracing::info;

use crate::error::RetrievalError;

pub fn parse_passages(content: &str) -> Vec<String> {
    let mut passages = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() {
            if !current.is_empty() {
                passages.push(current.join(" "));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        passages.push(current.join(" "));
    }

    passages
}

pub fn load_passages(path: &Path) -> Result<Vec<String>, RetrievalError> {
    let content = std::fs::read_to_string(path)?;
    let passages = parse_passages(&content);
    info!(
        path = %path.display(),
        count = passages.len(),
        "Loaded passages"
    );
    Ok(passages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_paragraphs() {
        let content = "Zitate werden im Text\nmit Fußnoten belegt.\n\nDie Gliederung hat\nhöchstens vier Ebenen.\n";
        assert_eq!(
            parse_passages(content),
            vec![
                "Zitate werden im Text mit Fußnoten belegt.",
                "Die Gliederung hat höchstens vier Ebenen.",
            ]
        );
    }

    #[test]
    fn test_parse_collapses_runs_of_blank_lines() {
        let content = "\n\n  first  \n \n\n\t\nsecond\n\n\n";
        assert_eq!(parse_passages(content), vec!["first", "second"]);
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse_passages("").is_empty());
        assert!(parse_passages("\n   \n").is_empty());
    }

    #[test]
    fn test_parse_crlf() {
        let content = "a\r\nb\r\n\r\nc\r\n";
        assert_eq!(parse_passages(content), vec!["a b", "c"]);
    }

    #[test]
    fn test_load_passages_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"one\n\ntwo\n").unwrap();
        let passages = load_passages(file.path()).unwrap();
        assert_eq!(passages, vec!["one", "two"]);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_passages(Path::new("/nonexistent/passages.txt")).unwrap_err();
        assert!(matches!(err, RetrievalError::Io(_)));
    }
}
