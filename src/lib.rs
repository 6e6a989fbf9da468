use env_logger::Builder;
use std::sync::Once;

pub mod env;
pub mod tasks;

static INIT: Once = Once::new();

/// Install the global logger. `RUST_LOG` takes precedence; otherwise the
/// binary logs at `info` and tests at `debug`. Only the first call has an
/// effect.
pub fn init_logging(is_test: bool) {
    INIT.call_once(|| {
        let default_level = if is_test { "debug" } else { "info" };
        let env = env_logger::Env::default().filter_or("RUST_LOG", default_level);

        let _ = Builder::from_env(env).is_test(is_test).try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_is_idempotent() {
        init_logging(true);
        init_logging(false);
        assert_ne!(log::max_level(), log::LevelFilter::Off);
    }
}
