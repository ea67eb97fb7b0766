//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::RecordService;
use crate::config::Settings;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Record loading
    pub records: RecordService,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        let settings = Arc::new(settings);
        let records = RecordService::new(fs);

        Self { settings, records }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::traits::MemoryFileSystem;
    use std::path::Path;

    #[test]
    fn test_records_service_reads_through_injected_fs() {
        let fs = MemoryFileSystem::new().with_file("org.json", r#"[{"id": "a"}, {"id": "b", "parent": "a"}]"#);
        let container = ServiceContainer::with_deps(Settings::default(), Arc::new(fs));

        let forest = container
            .records
            .load_forest(Path::new("org.json"), container.settings.strict)
            .unwrap();

        assert_eq!(forest.len(), 2);
        assert_eq!(forest.roots().len(), 1);
    }
}
