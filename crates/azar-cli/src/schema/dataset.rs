use serde::Deserialize;

/// Input for `describe`: a bare array of numbers or an object with
/// optional weights and histogram edges.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum DatasetFile {
    Values(Vec<f64>),
    Detailed {
        values: Vec<f64>,
        #[serde(default)]
        weights: Option<Vec<f64>>,
        #[serde(default)]
        edges: Option<Vec<f64>>,
    },
}

impl DatasetFile {
    pub(crate) fn values(&self) -> &[f64] {
        match self {
            DatasetFile::Values(values) | DatasetFile::Detailed { values, .. } => values,
        }
    }

    pub(crate) fn weights(&self) -> Option<&[f64]> {
        match self {
            DatasetFile::Values(_) => None,
            DatasetFile::Detailed { weights, .. } => weights.as_deref(),
        }
    }

    pub(crate) fn edges(&self) -> Option<&[f64]> {
        match self {
            DatasetFile::Values(_) => None,
            DatasetFile::Detailed { edges, .. } => edges.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_both_shapes() {
        let bare: DatasetFile = serde_json::from_str("[1, 2.5, 3]").unwrap();
        assert_eq!(bare.values(), &[1.0, 2.5, 3.0]);
        assert_eq!(bare.weights(), None);

        let detailed: DatasetFile =
            serde_json::from_str(r#"{"values": [1, 2], "weights": [3, 1], "edges": [0, 5]}"#)
                .unwrap();
        assert_eq!(detailed.values(), &[1.0, 2.0]);
        assert_eq!(detailed.weights(), Some(&[3.0, 1.0][..]));
        assert_eq!(detailed.edges(), Some(&[0.0, 5.0][..]));
    }
}
