//! Metadata tagging collaborator and its exiftool implementation.

use std::path::{Path, PathBuf};
use std::process::Command;

use serde_json::Value;

use crate::error::{io_err, OpsError};

/// Writes and reads keyword metadata on image files.
pub trait MetadataTagger {
    /// Replace the file's keywords with `keywords`, in order.
    fn apply_keywords(&self, path: &Path, keywords: &[String]) -> Result<(), OpsError>;

    /// Every keyword the file currently carries, de-duplicated.
    fn read_keywords(&self, path: &Path) -> Result<Vec<String>, OpsError>;
}

/// Keyword fields written on every apply.
const KEYWORD_TAGS: [&str; 3] = ["IPTC:Keywords", "XMP-dc:Subject", "XMP-lr:HierarchicalSubject"];

const WELL_KNOWN: [&str; 3] = [
    "/opt/homebrew/bin/exiftool",
    "/usr/local/bin/exiftool",
    "/usr/bin/exiftool",
];

/// Shells out to the `exiftool` binary.
#[derive(Debug, Clone)]
pub struct ExifTool {
    program: PathBuf,
}

impl ExifTool {
    /// Use `configured` when given, else the first well-known install, else
    /// whatever `exiftool` is on `PATH`.
    pub fn locate(configured: Option<&Path>) -> Self {
        let program = configured
            .map(Path::to_path_buf)
            .or_else(|| {
                WELL_KNOWN
                    .iter()
                    .map(PathBuf::from)
                    .find(|p| p.is_file())
            })
            .unwrap_or_else(|| PathBuf::from("exiftool"));
        tracing::debug!("using exiftool at {}", program.display());
        Self { program }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn run(&self, path: &Path, args: &[String]) -> Result<Vec<u8>, OpsError> {
        let output = Command::new(&self.program)
            .args(args)
            .arg(path)
            .output()
            .map_err(|e| io_err(&self.program, e))?;
        if !output.status.success() {
            return Err(OpsError::Tagger {
                path: path.to_path_buf(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(output.stdout)
    }
}

impl MetadataTagger for ExifTool {
    fn apply_keywords(&self, path: &Path, keywords: &[String]) -> Result<(), OpsError> {
        let mut args = vec!["-overwrite_original".to_string(), "-m".to_string()];
        for tag in KEYWORD_TAGS {
            args.push(format!("-{tag}="));
            args.extend(keywords.iter().map(|kw| format!("-{tag}+={kw}")));
        }
        self.run(path, &args)?;
        Ok(())
    }

    fn read_keywords(&self, path: &Path) -> Result<Vec<String>, OpsError> {
        let args = ["-j", "-IPTC:Keywords", "-XMP-dc:Subject"].map(String::from);
        let stdout = self.run(path, &args)?;
        if stdout.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        let parsed: Value = serde_json::from_slice(&stdout)?;
        Ok(keywords_from_json(&parsed))
    }
}

/// Flatten exiftool's `-j` output (`[{"SourceFile": .., "Keywords": ..}]`)
/// into distinct keyword strings.
fn keywords_from_json(value: &Value) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut push = |v: &Value| {
        let text = match v {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            _ => return,
        };
        if !text.is_empty() && !out.contains(&text) {
            out.push(text);
        }
    };
    for object in value.as_array().into_iter().flatten() {
        let Some(map) = object.as_object() else {
            continue;
        };
        for (key, field) in map {
            if key == "SourceFile" {
                continue;
            }
            match field {
                Value::Array(items) => items.iter().for_each(&mut push),
                other => push(other),
            }
        }
    }
    out
}

/// Primary keyword first, then extras, dropping case-insensitive repeats and
/// blanks.
pub fn keyword_list(primary: &str, extras: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for kw in std::iter::once(primary).chain(extras.iter().map(String::as_str)) {
        let kw = kw.trim();
        if kw.is_empty() || out.iter().any(|k| k.eq_ignore_ascii_case(kw)) {
            continue;
        }
        out.push(kw.to_string());
    }
    out
}
