//! External screenshot program backend
//!
//! Runs a program such as `grim` with the destination path and, when a
//! region is given, its geometry. Arguments may contain placeholders:
//!
//! - `{geometry}` - region as `X,Y WxH`
//! - `{scale}` - region scale factor
//! - `{path}` - full destination path
//! - `{filename}` - destination file name
//! - `{directory}` - destination directory

use tokio::process::Command;
use tracing::{debug, info, warn};

use super::CaptureBackend;
use crate::config::BackendSettings;
use crate::error::{Result, ShutterError};
use crate::types::{CaptureRequest, CaptureResult};

/// Backend that shells out to a screenshot program
#[derive(Debug, Clone)]
pub struct CommandBackend {
    /// Program to run
    program: String,
    /// Arguments added when the request has a region
    region_args: Vec<String>,
    /// Arguments always passed
    args: Vec<String>,
}

impl CommandBackend {
    /// Create a backend for `program` with grim-style arguments
    pub fn new(program: impl Into<String>) -> Self {
        let defaults = BackendSettings::default();
        Self {
            program: program.into(),
            region_args: defaults.region_args,
            args: defaults.args,
        }
    }

    /// Create a backend from configuration
    pub fn from_settings(settings: &BackendSettings) -> Self {
        Self {
            program: settings.program.clone(),
            region_args: settings.region_args.clone(),
            args: settings.args.clone(),
        }
    }

    /// Set the arguments used when a region is given
    pub fn with_region_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.region_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Set the arguments that are always passed
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Program this backend runs
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Check that the configured invocation can produce a file
    ///
    /// The program must be set and at least one always-passed argument must
    /// carry the destination (`{path}` or `{filename}`).
    pub fn check(&self) -> Result<()> {
        if self.program.trim().is_empty() {
            return Err(ShutterError::backend("No capture program configured"));
        }

        let has_destination = self
            .args
            .iter()
            .any(|arg| arg.contains("{path}") || arg.contains("{filename}"));
        if !has_destination {
            return Err(ShutterError::backend(format!(
                "{} is never given the destination; add {{path}} to its args",
                self.program
            )));
        }

        Ok(())
    }

    /// Expand the argument list for a request
    pub fn build_args(&self, request: &CaptureRequest) -> Vec<String> {
        let path = request.path().display().to_string();
        let directory = request.directory.display().to_string();
        let (geometry, scale) = match &request.region {
            Some(region) => (region.geometry(), region.scale.to_string()),
            None => (String::new(), "1".to_string()),
        };

        let expand = |arg: &String| {
            arg.replace("{geometry}", &geometry)
                .replace("{scale}", &scale)
                .replace("{path}", &path)
                .replace("{filename}", &request.filename)
                .replace("{directory}", &directory)
        };

        let region_args = request
            .region
            .is_some()
            .then_some(self.region_args.iter())
            .into_iter()
            .flatten();

        region_args.chain(self.args.iter()).map(expand).collect()
    }
}

impl CaptureBackend for CommandBackend {
    fn name(&self) -> &'static str {
        "command"
    }

    async fn capture(&self, request: &CaptureRequest) -> CaptureResult {
        if let Err(e) = tokio::fs::create_dir_all(&request.directory).await {
            warn!("Failed to create {:?}: {}", request.directory, e);
            return CaptureResult::failed(format!(
                "Failed to create directory {}: {}",
                request.directory.display(),
                e
            ));
        }

        let args = self.build_args(request);
        debug!("Running {} {:?}", self.program, args);

        let output = match Command::new(&self.program).args(&args).output().await {
            Ok(output) => output,
            Err(e) => {
                return CaptureResult::failed(format!("Failed to run {}: {}", self.program, e));
            }
        };

        if output.status.success() {
            info!("{} wrote {:?}", self.program, request.path());
            return CaptureResult::saved(request.filename.clone());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let stderr = stderr.trim();
        if stderr.is_empty() {
            CaptureResult::failed(format!("{} exited with {}", self.program, output.status))
        } else {
            CaptureResult::failed(stderr.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Region;
    use std::path::PathBuf;

    fn request(region: Option<Region>) -> CaptureRequest {
        CaptureRequest {
            region,
            filename: "shot_001.png".to_string(),
            directory: PathBuf::from("/tmp/shots"),
        }
    }

    #[test]
    fn test_check_default_invocation() {
        assert!(CommandBackend::new("grim").check().is_ok());
        assert!(
            CommandBackend::new("shot")
                .with_args(["-o", "{filename}"])
                .check()
                .is_ok()
        );
    }

    #[test]
    fn test_check_rejects_unusable_invocation() {
        let err = CommandBackend::new("  ").check().unwrap_err();
        assert!(matches!(err, ShutterError::Backend(_)));

        let err = CommandBackend::new("grim")
            .with_args(["--stdout"])
            .check()
            .unwrap_err();
        assert!(matches!(err, ShutterError::Backend(_)));
        assert!(err.to_string().contains("{path}"));
    }

    #[test]
    fn test_build_args_with_region() {
        let backend = CommandBackend::new("grim");
        let args = backend.build_args(&request(Some(Region::new(1, 2, 30, 40))));
        assert_eq!(args, vec!["-g", "1,2 30x40", "/tmp/shots/shot_001.png"]);
    }

    #[test]
    fn test_build_args_without_region() {
        let backend = CommandBackend::new("grim");
        let args = backend.build_args(&request(None));
        assert_eq!(args, vec!["/tmp/shots/shot_001.png"]);
    }

    #[test]
    fn test_build_args_custom_placeholders() {
        let backend = CommandBackend::new("shot")
            .with_region_args(["--scale={scale}"])
            .with_args(["-d", "{directory}", "{filename}"]);
        let args = backend.build_args(&request(Some(Region::new(0, 0, 1, 1).with_scale(2.0))));
        assert_eq!(args, vec!["--scale=2", "-d", "/tmp/shots", "shot_001.png"]);
    }
}
