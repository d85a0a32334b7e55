use serde::Deserialize;

/// Execution limits applied to every generated schema.
#[derive(Clone, Deserialize, Debug, Default, PartialEq, Eq)]
pub struct GraphQLLimitsConfig {
    /// Maximum query depth. Unlimited when absent.
    #[serde(default)]
    pub max_depth: Option<usize>,

    /// Maximum query complexity. Unlimited when absent.
    #[serde(default)]
    pub max_complexity: Option<usize>,
}

impl std::fmt::Display for GraphQLLimitsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let show = |v: Option<usize>| {
            v.map(|v| v.to_string()).unwrap_or_else(|| "none".into())
        };
        write!(
            f,
            "depth={}, complexity={}",
            show(self.max_depth),
            show(self.max_complexity)
        )
    }
}
