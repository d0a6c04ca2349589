mod deploy;
mod env;
mod keychain;
mod settings;

pub use deploy::{
    CompilerSettings, DeployConfig, GasReporterSettings, NetworkTarget, Overrides,
};
pub use env::Environment;
pub use keychain::KeychainManager;
pub use settings::UserSettings;
