// Environment accessor over the current process environment
use capscan_core::port::EnvironmentReader;

/// Reads `std::env`; unset, empty and non-UTF-8 values are all absent
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnvironment;

impl EnvironmentReader for ProcessEnvironment {
    fn lookup(&self, name: &str) -> Option<String> {
        std::env::var(name).ok().filter(|value| !value.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_set_empty_and_unset() {
        std::env::set_var("CAPSCAN_TEST_ENV_SET", " /opt/ant ");
        std::env::set_var("CAPSCAN_TEST_ENV_EMPTY", "");
        std::env::remove_var("CAPSCAN_TEST_ENV_UNSET");

        let env = ProcessEnvironment;
        assert_eq!(
            env.lookup("CAPSCAN_TEST_ENV_SET").as_deref(),
            Some(" /opt/ant ")
        );
        assert_eq!(env.lookup("CAPSCAN_TEST_ENV_EMPTY"), None);
        assert_eq!(env.lookup("CAPSCAN_TEST_ENV_UNSET"), None);
    }
}
