//! Skip gates - decide which tests not to run

use tally_config::{is_truthy, GateConfig};

/// Ordered set of skip gates from tally.toml
#[derive(Debug, Clone, Default)]
pub struct GateSet {
    gates: Vec<GateConfig>,
}

impl GateSet {
    pub fn new(gates: Vec<GateConfig>) -> Self {
        Self { gates }
    }

    /// Skip reason for `test_name` given the process environment
    pub fn skip_reason(&self, test_name: &str) -> Option<String> {
        self.skip_reason_with(test_name, |var| std::env::var(var).ok())
    }

    /// Skip reason for `test_name`, reading variables through `lookup`
    ///
    /// The first matching gate that closes decides; its `reason` is used,
    /// or a default naming the variable.
    pub fn skip_reason_with<F>(&self, test_name: &str, lookup: F) -> Option<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let flag = |var: &str| lookup(var).map_or(false, |v| is_truthy(&v));

        self.gates
            .iter()
            .filter(|gate| gate.matches(test_name))
            .find_map(|gate| {
                let default_reason = match (&gate.require_env, &gate.skip_if_env) {
                    (Some(var), _) if !flag(var.as_str()) => format!("{} is not set", var),
                    (_, Some(var)) if flag(var.as_str()) => format!("{} is set", var),
                    _ => return None,
                };
                Some(gate.reason.clone().unwrap_or(default_reason))
            })
    }

    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn test_require_env_skips_when_unset() {
        let gates = GateSet::new(vec![GateConfig::require_env(
            Some("long"),
            "TALLY_LONG_TESTS",
        )]);

        assert_eq!(
            gates.skip_reason_with("test-long-import.sh", env(&[])),
            Some("TALLY_LONG_TESTS is not set".to_string())
        );
        assert_eq!(
            gates.skip_reason_with("test-long-import.sh", env(&[("TALLY_LONG_TESTS", "0")])),
            Some("TALLY_LONG_TESTS is not set".to_string())
        );
        assert_eq!(
            gates.skip_reason_with("test-long-import.sh", env(&[("TALLY_LONG_TESTS", "1")])),
            None
        );
        assert_eq!(gates.skip_reason_with("test-short.sh", env(&[])), None);
    }

    #[test]
    fn test_skip_if_env_uses_custom_reason() {
        let gates = GateSet::new(vec![
            GateConfig::skip_if_env(Some("net"), "CI").with_reason("network tests are off on CI")
        ]);

        assert_eq!(
            gates.skip_reason_with("test-net-fetch.sh", env(&[("CI", "true")])),
            Some("network tests are off on CI".to_string())
        );
        assert_eq!(gates.skip_reason_with("test-net-fetch.sh", env(&[])), None);
    }

    #[test]
    fn test_first_closed_gate_wins() {
        let gates = GateSet::new(vec![
            GateConfig::skip_if_env(None, "CI").with_reason("first"),
            GateConfig::require_env(None, "SLOW").with_reason("second"),
        ]);

        assert_eq!(
            gates.skip_reason_with("test-x", env(&[])),
            Some("second".to_string())
        );
        assert_eq!(
            gates.skip_reason_with("test-x", env(&[("CI", "1")])),
            Some("first".to_string())
        );
        assert_eq!(gates.skip_reason_with("test-x", env(&[("SLOW", "yes")])), None);
    }

    #[test]
    fn test_empty_gate_set_never_skips() {
        let gates = GateSet::default();
        assert!(gates.is_empty());
        assert_eq!(gates.skip_reason_with("anything", env(&[("CI", "1")])), None);
    }
}
