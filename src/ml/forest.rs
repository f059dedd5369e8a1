// src/ml/forest.rs

use serde::{Deserialize, Serialize};

/// A trained classifier over one row of encoded features.
///
/// Implementations must be deterministic: the same row always yields the
/// same label.
pub trait Classifier: Send + Sync {
    fn predict(&self, row: &[f64]) -> Result<usize, String>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeNode {
    /// Go to `left` when `row[feature] <= threshold`, otherwise to `right`.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Class weights (sample counts or fractions) at this leaf.
    Leaf { value: Vec<f64> },
}

/// Decision tree stored as a flat node list. Node 0 is the root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    /// Class distribution of the leaf reached by `row`, normalized to sum 1.
    fn leaf_distribution(&self, row: &[f64]) -> Result<Vec<f64>, String> {
        let mut index = 0;
        // Children always come after their parent, so this terminates.
        loop {
            match self.nodes.get(index) {
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let value = row
                        .get(*feature)
                        .ok_or_else(|| format!("row has no feature {}", feature))?;
                    let next = if *value <= *threshold { *left } else { *right };
                    if next <= index {
                        return Err(format!("node {} points back to node {}", index, next));
                    }
                    index = next;
                }
                Some(TreeNode::Leaf { value }) => {
                    let total: f64 = value.iter().sum();
                    if total <= 0.0 {
                        return Err(format!("leaf {} has no weight", index));
                    }
                    return Ok(value.iter().map(|v| v / total).collect());
                }
                None => return Err(format!("node {} does not exist", index)),
            }
        }
    }

    fn validate(&self, n_features: usize, n_classes: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }

        for (index, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Split {
                    feature,
                    left,
                    right,
                    ..
                } => {
                    if *feature >= n_features {
                        return Err(format!("node {} splits on unknown feature {}", index, feature));
                    }
                    for child in [left, right] {
                        if *child <= index || *child >= self.nodes.len() {
                            return Err(format!("node {} has invalid child {}", index, child));
                        }
                    }
                }
                TreeNode::Leaf { value } => {
                    if value.len() != n_classes {
                        return Err(format!(
                            "leaf {} has {} class weights, expected {}",
                            index,
                            value.len(),
                            n_classes
                        ));
                    }
                    if value.iter().any(|v| *v < 0.0) || value.iter().sum::<f64>() <= 0.0 {
                        return Err(format!("leaf {} has invalid weights", index));
                    }
                }
            }
        }
        Ok(())
    }
}

/// Random forest: the predicted class is the argmax of the averaged
/// per-tree leaf distributions. Ties go to the lowest class index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    pub n_classes: usize,
    pub n_features: usize,
    pub trees: Vec<DecisionTree>,
}

impl RandomForest {
    pub fn validate(&self) -> Result<(), String> {
        if self.n_classes == 0 {
            return Err("forest has no classes".to_string());
        }
        if self.trees.is_empty() {
            return Err("forest has no trees".to_string());
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features, self.n_classes)
                .map_err(|e| format!("tree {}: {}", i, e))?;
        }
        Ok(())
    }

    pub fn predict_proba(&self, row: &[f64]) -> Result<Vec<f64>, String> {
        if row.len() != self.n_features {
            return Err(format!(
                "expected {} features, got {}",
                self.n_features,
                row.len()
            ));
        }

        let mut totals = vec![0.0; self.n_classes];
        for tree in &self.trees {
            let dist = tree.leaf_distribution(row)?;
            if dist.len() != self.n_classes {
                return Err("leaf distribution does not match class count".to_string());
            }
            for (total, p) in totals.iter_mut().zip(dist) {
                *total += p;
            }
        }

        let n_trees = self.trees.len() as f64;
        Ok(totals.into_iter().map(|t| t / n_trees).collect())
    }
}

impl Classifier for RandomForest {
    fn predict(&self, row: &[f64]) -> Result<usize, String> {
        let proba = self.predict_proba(row)?;

        let mut best = 0;
        for (class, p) in proba.iter().enumerate().skip(1) {
            if *p > proba[best] {
                best = class;
            }
        }
        Ok(best)
    }
}
