//! Wiring of settings, store and provider into a runnable unit

use std::sync::Arc;

use bizdate_core::overrides::{ChainedOverrideSource, EnvOverrideSource};
use bizdate_core::{
    BasicBusinessDateProvider, BusinessDateProvider, DateQueries, OverrideSource, Result, Scope,
    ValidationMemo,
};
use bizdate_store::{
    ConnectionFactory, DbConnectionHandler, SqliteConnectionFactory, SqliteRowStore,
    StringResourceLoader,
};

use crate::commands::migrate::migrate;
use crate::overrides::SettingsOverrideSource;
use crate::settings::{Settings, SettingsLoader};

/// Everything needed to run business date units of work
pub struct Runtime {
    settings: Settings,
    factory: Arc<SqliteConnectionFactory>,
    row_store: Arc<SqliteRowStore>,
    provider: BasicBusinessDateProvider,
    string_resources: StringResourceLoader,
    handler: DbConnectionHandler,
    overrides: Option<Arc<SettingsOverrideSource>>,
}

impl Runtime {
    /// Build a runtime from explicit settings and override source
    ///
    /// Applies pending migrations and initializes the provider and the
    /// string resource loader.
    ///
    /// # Errors
    ///
    /// Fails if the database cannot be opened or migrated, or the provider
    /// or string resource settings are invalid.
    pub fn new(
        settings: Settings,
        overrides: Arc<dyn OverrideSource>,
        memo: Arc<ValidationMemo>,
    ) -> Result<Self> {
        let factory = Arc::new(
            SqliteConnectionFactory::new(settings.database.path.clone())
                .with_busy_timeout(settings.database.busy_timeout()),
        );

        let mut conn = factory.open()?;
        migrate(&mut conn)?;
        drop(conn);

        let row_store = Arc::new(SqliteRowStore::new(factory.clone()));
        let mut provider = BasicBusinessDateProvider::new(row_store.clone(), overrides, memo)
            .with_config(settings.provider.clone());
        provider.initialize()?;

        let mut string_resources = StringResourceLoader::new(factory.clone())
            .with_config(settings.string_resource.clone());
        string_resources.initialize()?;

        let handler = DbConnectionHandler::new(factory.clone())
            .with_name(settings.provider.transaction_name.clone());

        Ok(Self {
            settings,
            factory,
            row_store,
            provider,
            string_resources,
            handler,
            overrides: None,
        })
    }

    /// Build a runtime from the sources of `loader`
    ///
    /// Overrides come from the settings' `[[properties]]` first and the
    /// process environment second.
    ///
    /// # Errors
    ///
    /// Fails if the settings cannot be loaded or `Runtime::new` fails.
    pub fn load(loader: SettingsLoader) -> Result<Self> {
        let settings = loader.load()?;
        let properties = Arc::new(SettingsOverrideSource::new(loader, &settings));
        let overrides = ChainedOverrideSource::new()
            .with_source(properties.clone())
            .with_source(EnvOverrideSource);

        let mut runtime = Self::new(settings, Arc::new(overrides), Arc::new(ValidationMemo::new()))?;
        runtime.overrides = Some(properties);
        Ok(runtime)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn factory(&self) -> &SqliteConnectionFactory {
        &self.factory
    }

    pub fn provider(&self) -> &BasicBusinessDateProvider {
        &self.provider
    }

    pub fn row_store(&self) -> &SqliteRowStore {
        &self.row_store
    }

    pub fn string_resources(&self) -> &StringResourceLoader {
        &self.string_resources
    }

    /// Statements compiled for the configured table
    ///
    /// # Errors
    ///
    /// Returns `NotInitialized` if the provider was never initialized.
    pub fn queries(&self) -> Result<&DateQueries> {
        self.provider.queries()
    }

    /// Apply pending migrations and list every applied migration
    ///
    /// # Errors
    ///
    /// Fails if the database cannot be opened or a migration fails.
    pub fn migrate(&self) -> Result<Vec<String>> {
        let mut conn = self.factory.open()?;
        migrate(&mut conn)
    }

    /// Re-read the `[[properties]]` overrides, if this runtime was loaded
    /// from settings sources
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if the settings cannot be reloaded.
    pub fn reload_overrides(&self) -> Result<()> {
        match &self.overrides {
            Some(overrides) => overrides.reload(),
            None => Ok(()),
        }
    }

    /// Run `body` as one unit of work
    ///
    /// A fresh scope is created, its connection opened with a transaction
    /// under the configured transaction name, and everything dropped when
    /// `body` returns. Cached dates never outlive the call.
    ///
    /// # Errors
    ///
    /// Returns the error of `body`, or the failure to open or commit the
    /// unit of work's connection.
    pub fn run_unit_of_work<T>(
        &self,
        body: impl FnOnce(&dyn BusinessDateProvider, &mut Scope) -> Result<T>,
    ) -> Result<T> {
        let mut scope = Scope::new();
        tracing::debug!(scope_id = %scope.id(), "unit of work started");
        let provider: &dyn BusinessDateProvider = &self.provider;
        self.handler
            .handle(&mut scope, |scope| body(provider, scope))
    }
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("database", &self.settings.database.path)
            .field("handler", &self.handler)
            .finish_non_exhaustive()
    }
}
