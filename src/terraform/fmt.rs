//! `terraform fmt` backend for example formatting.

use crate::docs::hcl::{BlockFormatter, CanonicalFormatter};
use crate::shared::logging;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Formats example blocks by piping them through `terraform fmt -`.
///
/// Any failure falls back to the built-in formatter so example formatting
/// never aborts generation.
#[derive(Debug, Clone)]
pub struct TerraformFmt {
    terraform_path: PathBuf,
}

impl TerraformFmt {
    pub fn new(terraform_path: PathBuf) -> Self {
        Self { terraform_path }
    }

    /// Locate the binary from an explicit path, `TERRAFORM_BINARY_NAME`, or
    /// `terraform` on `PATH`.
    pub fn locate(executable_path: Option<&str>) -> anyhow::Result<Self> {
        if let Some(path) = executable_path {
            let path_buf = PathBuf::from(path);
            if !path_buf.exists() {
                anyhow::bail!("Terraform binary not found at: {}", path_buf.display());
            }
            logging::info(&format!("Using specified Terraform binary: {}", path));
            return Ok(Self::new(path_buf));
        }

        let terraform_binary =
            std::env::var("TERRAFORM_BINARY_NAME").unwrap_or_else(|_| "terraform".to_string());
        match which::which(&terraform_binary) {
            Ok(path) => {
                logging::info(&format!(
                    "Found Terraform binary '{}' in PATH: {}",
                    terraform_binary,
                    path.display()
                ));
                Ok(Self::new(path))
            }
            Err(_) => anyhow::bail!("Terraform binary '{}' not found in PATH", terraform_binary),
        }
    }

    pub fn terraform_path(&self) -> &Path {
        &self.terraform_path
    }

    /// Run `terraform fmt -` on `body` and return its stdout.
    pub fn run(&self, body: &str) -> anyhow::Result<String> {
        let mut child = Command::new(&self.terraform_path)
            .args(["fmt", "-no-color", "-"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        // Close stdin before waiting, and reap the child even if it stopped
        // reading early.
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(body.as_bytes()),
            None => Ok(()),
        };
        let output = child.wait_with_output()?;
        written?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("terraform fmt failed: {}", stderr.trim());
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim_end().to_string())
    }
}

impl BlockFormatter for TerraformFmt {
    fn format_block(&self, body: &str) -> String {
        match self.run(body) {
            Ok(formatted) => formatted,
            Err(e) => {
                logging::warn(&format!("Falling back to built-in formatter: {}", e));
                CanonicalFormatter.format_block(body)
            }
        }
    }
}
