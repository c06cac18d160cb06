/// Output settings for an [`Asserter`](crate::Asserter).
///
/// Configuration is code-only. There are no config files or environment
/// variables: a test that needs different output builds its own config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AsserterConfig {
    /// Print each failure to stderr before the reporter aborts.
    pub echo: bool,
    /// Prefix printed failures with the `file:line` of the assertion.
    pub decorate: bool,
}

impl Default for AsserterConfig {
    fn default() -> Self {
        Self {
            echo: true,
            decorate: true,
        }
    }
}

impl AsserterConfig {
    /// No printing at all; failures only reach the reporter and the log.
    pub fn quiet() -> Self {
        Self {
            echo: false,
            decorate: false,
        }
    }

    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    pub fn with_decorate(mut self, decorate: bool) -> Self {
        self.decorate = decorate;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_echoes_decorated() {
        let config = AsserterConfig::default();
        assert!(config.echo);
        assert!(config.decorate);
    }

    #[test]
    fn test_quiet() {
        let config = AsserterConfig::quiet();
        assert!(!config.echo);
        assert!(!config.decorate);
    }

    #[test]
    fn test_builders() {
        let config = AsserterConfig::quiet().with_echo(true);
        assert!(config.echo);
        assert!(!config.decorate);
        assert_eq!(
            AsserterConfig::default().with_decorate(false),
            AsserterConfig {
                echo: true,
                decorate: false
            }
        );
    }
}
