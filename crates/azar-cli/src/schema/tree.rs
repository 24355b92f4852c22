use azar_prob::tree::ProbabilityTree;
use serde::Deserialize;

/// A tree diagram plus the leaf label to condition on.
///
/// ```json
/// {
///   "tree": [
///     { "label": "regular", "probability": "0.88", "children": [
///       { "label": "credit", "probability": "0.28" },
///       { "label": "cash", "probability": "0.72" }
///     ] }
///   ],
///   "given": "credit"
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct TreeFile {
    pub(crate) tree: ProbabilityTree<String>,
    /// Leaf label used for the first-level posteriors.
    #[serde(default)]
    pub(crate) given: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_tree_is_rejected() {
        let json = r#"{"tree": [{"label": "a", "probability": "1/2"}]}"#;
        assert!(serde_json::from_str::<TreeFile>(json).is_err());

        let json = r#"{"tree": [{"label": "a", "probability": "1/2"}, {"label": "b", "probability": "1/2"}]}"#;
        let file = serde_json::from_str::<TreeFile>(json).unwrap();
        assert_eq!(file.tree.branches().len(), 2);
        assert_eq!(file.given, None);
    }
}
