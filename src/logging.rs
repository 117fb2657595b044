//! Logging initialization utilities.

use env_logger::Env;

use crate::error::{RequestError, Result};

fn builder() -> env_logger::Builder {
    let env = Env::default().default_filter_or("info");
    env_logger::Builder::from_env(env)
}

/// Initialize logging with a default filter level.
pub fn init() {
    builder().init();
}

/// Like [`init`], but reports an already installed logger instead of panicking.
pub fn try_init() -> Result<()> {
    builder()
        .try_init()
        .map_err(|e| RequestError::Config(format!("Logger already initialized: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::try_init;
    use crate::error::RequestError;

    #[test]
    fn second_init_is_reported() {
        let _ = try_init();
        assert!(matches!(try_init(), Err(RequestError::Config(_))));
        log::debug!("logger installed");
    }
}
