use std::io::{Read, Write};

use anyhow::Context;

use thinky_core::extract::extract_json;

/// Recover the JSON object from generator output in `path` (or stdin) and
/// pretty-print it.
pub fn run_extract(path: Option<&str>, out: &mut impl Write) -> anyhow::Result<()> {
    let text = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {path}"))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            buf
        }
    };
    extract_to(&text, out)
}

fn extract_to(text: &str, out: &mut impl Write) -> anyhow::Result<()> {
    let object = extract_json(text)?;
    writeln!(out, "{}", serde_json::to_string_pretty(&object)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prints_recovered_object() {
        let mut out = Vec::new();
        extract_to("Sure! ```json\n{\"Energy\": \"High\"}\n```", &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "{\n  \"Energy\": \"High\"\n}\n");
    }

    #[test]
    fn reads_from_file() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "noise {\"a\": [1, 2]} noise").unwrap();
        let mut out = Vec::new();
        run_extract(tmp.path().to_str(), &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("\"a\""));
    }

    #[test]
    fn missing_object_is_an_error() {
        let mut out = Vec::new();
        let err = extract_to("nothing to see", &mut out).unwrap_err();
        assert!(err.to_string().contains("no JSON object"));
        assert!(out.is_empty());
    }

    #[test]
    fn missing_file_is_an_error() {
        let mut out = Vec::new();
        let err = run_extract(Some("/nonexistent/thinky/response.txt"), &mut out).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }
}
