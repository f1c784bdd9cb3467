use std::path::PathBuf;

use crate::fetch::FetchSettings;

#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Directory receiving `<name>.html` and `<name>_files/`.
    pub output_dir: PathBuf,
    pub fetch: FetchSettings,
}

impl LoaderConfig {
    pub fn default_with_output(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            fetch: FetchSettings::default(),
        }
    }
}
