//! Mutant serialization: pretty-print, fingerprint, deduplicate, write.

use std::collections::HashSet;
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::OnceLock;

use md5::{Digest, Md5};
use thiserror::Error;

use crate::ast::Tree;
use crate::printer;

#[derive(Debug, Error)]
#[error("{0}")]
pub struct SerializeError(pub String);

pub struct Saved {
    pub checksum: String,
    pub duplicate: bool,
    /// Printer output the checksum was computed over.
    pub printed: String,
}

/// MD5 hex digest over the given bytes.
pub fn fingerprint(bytes: &[u8]) -> String {
    let digest = Md5::digest(bytes);
    let mut out = String::with_capacity(32);
    for byte in digest {
        out.push_str(&format!("{:02x}", byte));
    }
    out
}

/// Pretty-prints and hashes the tree. Returns a duplicate marker without
/// touching the filesystem when the fingerprint was already seen; otherwise
/// canonicalizes through gofmt (when available) and writes the mutant with
/// mode 0666.
pub fn save_mutant(
    tree: &Tree,
    seen: &mut HashSet<String>,
    path: &Path,
    format: bool,
) -> Result<Saved, SerializeError> {
    let printed = printer::print(tree);
    let checksum = fingerprint(printed.as_bytes());

    if seen.contains(&checksum) {
        return Ok(Saved { checksum, duplicate: true, printed });
    }
    seen.insert(checksum.clone());

    let bytes = if format && gofmt_available() {
        gofmt(&printed)?
    } else {
        printed.clone().into_bytes()
    };

    std::fs::write(path, bytes).map_err(|e| SerializeError(format!("write {}: {}", path.display(), e)))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let _ = std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o666));
    }

    Ok(Saved { checksum, duplicate: false, printed })
}

/// Whether a `gofmt` binary is reachable on PATH. Checked once per process.
pub fn gofmt_available() -> bool {
    static AVAILABLE: OnceLock<bool> = OnceLock::new();
    *AVAILABLE.get_or_init(|| {
        Command::new("gofmt")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    })
}

fn gofmt(source: &str) -> Result<Vec<u8>, SerializeError> {
    let mut child = Command::new("gofmt")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| SerializeError(format!("spawn gofmt: {}", e)))?;

    {
        use std::io::Write;
        let mut stdin = child.stdin.take().ok_or_else(|| SerializeError("gofmt stdin unavailable".to_string()))?;
        stdin
            .write_all(source.as_bytes())
            .map_err(|e| SerializeError(format!("write to gofmt: {}", e)))?;
    }

    let output = child
        .wait_with_output()
        .map_err(|e| SerializeError(format!("wait for gofmt: {}", e)))?;
    if !output.status.success() {
        return Err(SerializeError(format!(
            "gofmt rejected mutated source: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }
    Ok(output.stdout)
}
