mod settings;

pub use settings::{
    DatabaseConfig, I18nConfig, JwtConfig, ServerConfig, Settings, StorageConfig,
};
