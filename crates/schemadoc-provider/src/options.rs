use std::path::PathBuf;

/// Options that control where providers look for schema sources.
#[derive(Debug, Clone, Default)]
pub struct ProviderOptions {
    /// Application root, searched before `search_paths`.
    pub app_path: Option<PathBuf>,
    /// Additional directories searched in order.
    pub search_paths: Vec<PathBuf>,
}

impl ProviderOptions {
    /// Directories to search, `app_path` first. Entries that are missing or
    /// not directories are skipped with a warning.
    pub fn search_roots(&self) -> Vec<PathBuf> {
        let mut roots = Vec::new();

        for path in self.app_path.iter().chain(self.search_paths.iter()) {
            if !path.exists() {
                tracing::warn!(event = "search_path_missing", path = %path.display());
                continue;
            }
            if !path.is_dir() {
                tracing::warn!(event = "search_path_not_dir", path = %path.display());
                continue;
            }
            if !roots.contains(path) {
                roots.push(path.clone());
            }
        }

        roots
    }
}
