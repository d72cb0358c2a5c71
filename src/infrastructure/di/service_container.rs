//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::OutlineService;
use crate::application::ApplicationResult;
use crate::config::Settings;
use crate::domain::LevelInference;
use crate::infrastructure::adapters::AdapterRegistry;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Level inference shared by the adapters and the `level` command
    pub inference: Arc<LevelInference>,

    pub outline: OutlineService,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> ApplicationResult<Self> {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    ///
    /// Fails if a configured structural prefix is not a valid regex.
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> ApplicationResult<Self> {
        let inference = Arc::new(settings.level_inference()?);
        let adapters = Arc::new(AdapterRegistry::new(
            Arc::clone(&inference),
            &settings.extraction,
        )?);
        let outline = OutlineService::new(Arc::clone(&fs), adapters);

        Ok(Self {
            settings: Arc::new(settings),
            fs,
            inference,
            outline,
        })
    }
}
