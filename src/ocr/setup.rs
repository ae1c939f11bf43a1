use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::log;

/// Where distribution packages install the binary.
const SYSTEM_TESSERACT: &str = "/usr/bin/tesseract";

/// Trained data required for recognition.
const TRAINEDDATA: &str = "eng.traineddata";

#[derive(Clone, Debug)]
pub struct TesseractPaths {
    pub executable: PathBuf,
    /// Explicit tessdata directory, if one was found outside the system default.
    pub tessdata: Option<PathBuf>,
}

/// Ensures Tesseract is installed and runnable.
///
/// Unlike the engine calls, this is fatal: without Tesseract no reading can
/// ever be produced, so the caller should exit with instructions.
pub fn ensure_tesseract() -> Result<TesseractPaths> {
    let executable = find_tesseract_executable()?;
    let version = tesseract_version(&executable)?;
    log(&format!(
        "Tesseract found at: {} ({})",
        executable.display(),
        version
    ));

    let tessdata = find_tessdata_dir();
    match &tessdata {
        Some(dir) => log(&format!("Using tessdata from: {}", dir.display())),
        None => log("Using Tesseract's built-in tessdata location"),
    }

    Ok(TesseractPaths {
        executable,
        tessdata,
    })
}

/// Finds the Tesseract executable, checking the system location first, then PATH.
pub fn find_tesseract_executable() -> Result<PathBuf> {
    let system = PathBuf::from(SYSTEM_TESSERACT);
    if system.exists() {
        return Ok(system);
    }

    // A virtualenv-style minimal PATH may still carry it
    if let Ok(output) = Command::new("tesseract").arg("--version").output() {
        if output.status.success() {
            return Ok(PathBuf::from("tesseract"));
        }
    }

    Err(anyhow!(
        "Tesseract OCR is not available.\n\
         Install it with: sudo apt install tesseract-ocr\n\
         Then restart this application."
    ))
}

/// Runs `tesseract --version` and returns the first line of its output.
pub fn tesseract_version(executable: &Path) -> Result<String> {
    let output = Command::new(executable)
        .arg("--version")
        .output()
        .with_context(|| format!("Failed to run {}", executable.display()))?;

    if !output.status.success() {
        return Err(anyhow!(
            "{} --version exited with {}",
            executable.display(),
            output.status
        ));
    }

    // Older releases print the banner on stderr
    let text = if output.stdout.is_empty() {
        String::from_utf8_lossy(&output.stderr).to_string()
    } else {
        String::from_utf8_lossy(&output.stdout).to_string()
    };

    Ok(text.lines().next().unwrap_or("unknown version").trim().to_string())
}

/// Finds an explicit tessdata directory.
///
/// Returns `None` when Tesseract should use its compiled-in default.
pub fn find_tessdata_dir() -> Option<PathBuf> {
    if let Ok(prefix) = std::env::var("TESSDATA_PREFIX") {
        if let Some(dir) = tessdata_in(Path::new(&prefix)) {
            return Some(dir);
        }
    }

    let local = crate::paths::get_tessdata_dir();
    if local.join(TRAINEDDATA).exists() {
        return Some(local);
    }

    None
}

/// Accepts either the tessdata directory itself or its parent.
fn tessdata_in(prefix: &Path) -> Option<PathBuf> {
    if prefix.join(TRAINEDDATA).exists() {
        return Some(prefix.to_path_buf());
    }
    let nested = prefix.join("tessdata");
    if nested.join(TRAINEDDATA).exists() {
        return Some(nested);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_tessdata_in_direct_dir() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(TRAINEDDATA), b"").unwrap();
        assert_eq!(tessdata_in(dir.path()), Some(dir.path().to_path_buf()));
    }

    #[test]
    fn test_tessdata_in_parent_dir() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("tessdata");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join(TRAINEDDATA), b"").unwrap();
        assert_eq!(tessdata_in(dir.path()), Some(nested));
    }

    #[test]
    fn test_tessdata_in_missing() {
        let dir = tempdir().unwrap();
        assert_eq!(tessdata_in(dir.path()), None);
    }
}
