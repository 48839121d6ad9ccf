//! Static requirement inputs shared by every compilation of a run

use crate::config::schema::PathsConfig;
use crate::error::{DepsyncError, DepsyncResult};
use crate::resolver::submodule_paths;
use regex::Regex;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tokio::fs;

static EDITABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mR)^(?:-e|--editable)\s(?P<path>.+)$").expect("valid editable regex")
});

/// Requirement files fed to the resolver and appended to listings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inputs {
    /// Dev requirements file, relative to the project root
    dev: PathBuf,
    /// Contents of the dev requirements file
    dev_text: String,
    /// Lines appended to every listing without resolving their dependencies
    nodeps: Vec<String>,
    /// Constraint overrides file, if present
    override_file: Option<PathBuf>,
    /// Further input files passed to the resolver as-is
    extra: Vec<PathBuf>,
}

impl Inputs {
    /// Inputs from already-read file contents
    pub fn new(dev: impl Into<PathBuf>, dev_text: impl Into<String>, nodeps_text: &str) -> Self {
        Self {
            dev: dev.into(),
            dev_text: dev_text.into(),
            nodeps: nodeps_text.lines().map(|l| l.trim().to_string()).collect(),
            override_file: None,
            extra: Vec::new(),
        }
    }

    /// Set the overrides file
    pub fn with_override(mut self, path: Option<PathBuf>) -> Self {
        self.override_file = path;
        self
    }

    /// Set the extra resolver inputs
    pub fn with_extra(mut self, extra: Vec<PathBuf>) -> Self {
        self.extra = extra;
        self
    }

    /// Read the configured files below `root`.
    ///
    /// The dev and no-deps files are required; the overrides file is used
    /// only when it exists.
    pub async fn load(root: &Path, paths: &PathsConfig) -> DepsyncResult<Self> {
        let dev_text = read_required(&root.join(&paths.dev)).await?;
        let nodeps_text = read_required(&root.join(&paths.nodeps)).await?;

        let override_file = paths
            .override_file
            .clone()
            .filter(|path| root.join(path).is_file());

        Ok(Self::new(paths.dev.clone(), dev_text, &nodeps_text)
            .with_override(override_file)
            .with_extra(paths.extra_inputs.clone()))
    }

    /// Files passed to the resolver: the dev file, each editable's
    /// `pyproject.toml`, then the extra inputs
    pub fn resolver_inputs(&self) -> Vec<PathBuf> {
        let mut inputs = vec![self.dev.clone()];
        inputs.extend(self.editables().map(|path| path.join("pyproject.toml")));
        inputs.extend(self.extra.iter().cloned());
        inputs
    }

    /// Paths of editable installs named in the dev file
    pub fn editables(&self) -> impl Iterator<Item = PathBuf> + '_ {
        EDITABLE
            .captures_iter(&self.dev_text)
            .map(|caps| PathBuf::from(caps["path"].trim()))
    }

    /// `submodules/<name>` paths referenced by the dev file
    pub fn submodule_paths(&self) -> Vec<String> {
        submodule_paths(&self.dev_text)
    }

    /// Lines appended to every listing
    pub fn nodeps(&self) -> &[String] {
        &self.nodeps
    }

    pub fn override_file(&self) -> Option<&Path> {
        self.override_file.as_deref()
    }
}

/// Read a file that must exist
async fn read_required(path: &Path) -> DepsyncResult<String> {
    fs::read_to_string(path).await.map_err(|e| match e.kind() {
        ErrorKind::NotFound => DepsyncError::MissingInputFile(path.to_path_buf()),
        _ => DepsyncError::io(format!("reading {}", path.display()), e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const DEV: &str = "\
-e packages/pkg
--editable submodules/ext
pytest==8.0.0
";

    #[test]
    fn resolver_inputs_include_editables_and_extras() {
        let inputs = Inputs::new("requirements/dev.in", DEV, "")
            .with_extra(vec![PathBuf::from("pyproject.toml")]);
        assert_eq!(
            inputs.resolver_inputs(),
            vec![
                PathBuf::from("requirements/dev.in"),
                PathBuf::from("packages/pkg/pyproject.toml"),
                PathBuf::from("submodules/ext/pyproject.toml"),
                PathBuf::from("pyproject.toml"),
            ]
        );
    }

    #[test]
    fn submodules_from_dev_file() {
        let inputs = Inputs::new("requirements/dev.in", DEV, "");
        assert_eq!(inputs.submodule_paths(), vec!["submodules/ext"]);
    }

    #[test]
    fn nodeps_lines_are_trimmed() {
        let inputs = Inputs::new("dev.in", "", " -e submodules/ext \nextra==1.0\n");
        assert_eq!(inputs.nodeps(), ["-e submodules/ext", "extra==1.0"]);
    }

    fn write_inputs(root: &Path, with_override: bool) {
        std::fs::create_dir_all(root.join("requirements")).unwrap();
        std::fs::write(root.join("requirements/dev.in"), DEV).unwrap();
        std::fs::write(root.join("requirements/nodeps.in"), "extra==1.0\n").unwrap();
        if with_override {
            std::fs::write(root.join("requirements/override.txt"), "idna>=3\n").unwrap();
        }
    }

    #[tokio::test]
    async fn load_reads_configured_files() {
        let dir = TempDir::new().unwrap();
        write_inputs(dir.path(), true);

        let inputs = Inputs::load(dir.path(), &PathsConfig::default()).await.unwrap();
        assert_eq!(inputs.nodeps(), ["extra==1.0"]);
        assert_eq!(
            inputs.override_file(),
            Some(Path::new("requirements/override.txt"))
        );
    }

    #[tokio::test]
    async fn load_skips_absent_override() {
        let dir = TempDir::new().unwrap();
        write_inputs(dir.path(), false);

        let inputs = Inputs::load(dir.path(), &PathsConfig::default()).await.unwrap();
        assert_eq!(inputs.override_file(), None);
    }

    #[tokio::test]
    async fn load_requires_nodeps() {
        let dir = TempDir::new().unwrap();
        write_inputs(dir.path(), false);
        std::fs::remove_file(dir.path().join("requirements/nodeps.in")).unwrap();

        let err = Inputs::load(dir.path(), &PathsConfig::default())
            .await
            .unwrap_err();
        match err {
            DepsyncError::MissingInputFile(path) => assert!(path.ends_with("nodeps.in")),
            other => panic!("expected MissingInputFile, got {other:?}"),
        }
    }
}
