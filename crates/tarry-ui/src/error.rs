use tarry_core::ConfigError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HookError {
    #[error("no scheduler installed; render inside `with_scheduler`")]
    NoScheduler,
    #[error(transparent)]
    Config(#[from] ConfigError),
}
