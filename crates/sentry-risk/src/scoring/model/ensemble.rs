use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{ModelError, RiskModel};
use crate::scoring::schema::{FeatureVector, FALLBACK_FEATURE_NAMES};

pub const ENSEMBLE_FORMAT_VERSION: u32 = 1;

/// Gradient-boosted regression trees exported as JSON.
///
/// ```json
/// {
///   "format_version": 1,
///   "schema_version": "sar-2025.04",
///   "feature_names": ["Age", "Gender"],
///   "base_score": 12.0,
///   "trees": [
///     { "nodes": [
///         { "kind": "split", "feature": 0, "threshold": 21.0, "left": 1, "right": 2 },
///         { "kind": "leaf", "value": 8.5 },
///         { "kind": "leaf", "value": -1.5 }
///     ] }
///   ]
/// }
/// ```
///
/// A split sends a row left when `value < threshold`. The prediction is
/// `base_score` plus one leaf value per tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeEnsemble {
    format_version: u32,
    #[serde(default)]
    schema_version: Option<String>,
    #[serde(default)]
    feature_names: Option<Vec<String>>,
    base_score: f64,
    trees: Vec<Tree>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

impl TreeEnsemble {
    pub fn new(
        schema_version: Option<String>,
        feature_names: Option<Vec<String>>,
        base_score: f64,
        trees: Vec<Tree>,
    ) -> Result<Self, ModelError> {
        let model = Self {
            format_version: ENSEMBLE_FORMAT_VERSION,
            schema_version,
            feature_names,
            base_score,
            trees,
        };
        model.validate()?;
        Ok(model)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ModelError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ModelError> {
        let model: Self = serde_json::from_reader(reader)?;
        model.validate()?;
        Ok(model)
    }

    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let model: Self = serde_json::from_str(json)?;
        model.validate()?;
        Ok(model)
    }

    pub fn trees(&self) -> &[Tree] {
        &self.trees
    }

    pub fn base_score(&self) -> f64 {
        self.base_score
    }

    /// Number of input columns the trees may read.
    pub fn schema_width(&self) -> usize {
        self.feature_names
            .as_ref()
            .map_or(FALLBACK_FEATURE_NAMES.len(), Vec::len)
    }

    fn validate(&self) -> Result<(), ModelError> {
        if self.format_version != ENSEMBLE_FORMAT_VERSION {
            return Err(ModelError::UnsupportedFormat {
                version: self.format_version,
            });
        }

        if !self.base_score.is_finite() {
            return Err(ModelError::InvalidNode {
                tree: 0,
                node: 0,
                reason: "base_score must be finite".to_string(),
            });
        }

        let width = self.schema_width();
        for (tree_index, tree) in self.trees.iter().enumerate() {
            validate_tree(tree_index, tree, width)?;
        }

        Ok(())
    }
}

fn validate_tree(tree_index: usize, tree: &Tree, width: usize) -> Result<(), ModelError> {
    let invalid = |node: usize, reason: &str| ModelError::InvalidNode {
        tree: tree_index,
        node,
        reason: reason.to_string(),
    };

    if tree.nodes.is_empty() {
        return Err(invalid(0, "tree has no nodes"));
    }

    for (index, node) in tree.nodes.iter().enumerate() {
        match node {
            Node::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                if *feature >= width {
                    return Err(ModelError::FeatureOutOfRange {
                        tree: tree_index,
                        node: index,
                        feature: *feature,
                        width,
                    });
                }
                if !threshold.is_finite() {
                    return Err(invalid(index, "threshold must be finite"));
                }
                // Children strictly after the parent rules out cycles.
                for child in [*left, *right] {
                    if child <= index || child >= tree.nodes.len() {
                        return Err(invalid(index, "child index out of order or out of range"));
                    }
                }
            }
            Node::Leaf { value } => {
                if !value.is_finite() {
                    return Err(invalid(index, "leaf value must be finite"));
                }
            }
        }
    }

    Ok(())
}

impl Tree {
    fn leaf_value(&self, tree_index: usize, features: &FeatureVector) -> Result<f64, ModelError> {
        let mut index = 0;
        loop {
            match self.nodes.get(index) {
                Some(Node::Leaf { value }) => return Ok(*value),
                Some(Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let value =
                        features
                            .get(*feature)
                            .ok_or(ModelError::FeatureOutOfRange {
                                tree: tree_index,
                                node: index,
                                feature: *feature,
                                width: features.len(),
                            })?;
                    index = if value < *threshold { *left } else { *right };
                }
                None => {
                    return Err(ModelError::InvalidNode {
                        tree: tree_index,
                        node: index,
                        reason: "node index out of range".to_string(),
                    })
                }
            }
        }
    }
}

impl RiskModel for TreeEnsemble {
    fn predict(&self, features: &FeatureVector) -> Result<f64, ModelError> {
        let mut score = self.base_score;
        for (tree_index, tree) in self.trees.iter().enumerate() {
            score += tree.leaf_value(tree_index, features)?;
        }
        Ok(score)
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    fn schema_version(&self) -> Option<&str> {
        self.schema_version.as_deref()
    }
}
