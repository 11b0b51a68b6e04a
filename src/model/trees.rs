use ndarray::Array1;
use serde::Deserialize;

/// Trees deeper than this are rejected at load time; the leaf table would be
/// 2^depth entries.
pub const MAX_TREE_DEPTH: usize = 16;

/// One level of an oblivious tree: every node on the level tests the same
/// feature against the same border.
#[derive(Debug, Deserialize)]
pub struct Split {
    pub feature: usize,
    pub border: f64,
}

/// Depth-d oblivious regression tree. `leaves` holds the 2^d leaf values,
/// indexed by the bitmask of per-level test outcomes (bit i set when the
/// level-i test passes).
#[derive(Debug, Deserialize)]
pub struct ObliviousTree {
    pub splits: Vec<Split>,
    pub leaves: Vec<f64>,
}

impl ObliviousTree {
    pub fn score(&self, encoded: &[f64]) -> f64 {
        let mut index = 0usize;
        for (level, split) in self.splits.iter().enumerate() {
            if encoded[split.feature] > split.border {
                index |= 1 << level;
            }
        }
        self.leaves[index]
    }
}

/// Node of a plain binary regression tree, stored as a flat array. Child
/// indices must point strictly forward, so traversal cannot loop.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
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

#[derive(Debug, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<Node>,
}

impl DecisionTree {
    /// Route `x` from the root to a leaf: `x[feature] <= threshold` goes
    /// left, otherwise right.
    pub fn score(&self, x: &Array1<f64>) -> f64 {
        let mut at = 0;
        loop {
            match &self.nodes[at] {
                Node::Leaf { value } => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    at = if x[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oblivious_leaf_index_follows_bit_order() {
        let tree = ObliviousTree {
            splits: vec![
                Split {
                    feature: 0,
                    border: 10.0,
                },
                Split {
                    feature: 1,
                    border: 20.0,
                },
            ],
            leaves: vec![1.0, 2.0, 3.0, 4.0],
        };

        // neither test passes -> index 0
        assert_eq!(tree.score(&[5.0, 15.0]), 1.0);
        // level 0 passes -> index 1
        assert_eq!(tree.score(&[15.0, 15.0]), 2.0);
        // level 1 passes -> index 2
        assert_eq!(tree.score(&[5.0, 25.0]), 3.0);
        // both pass -> index 3
        assert_eq!(tree.score(&[15.0, 25.0]), 4.0);
    }

    #[test]
    fn border_comparison_is_strict() {
        let tree = ObliviousTree {
            splits: vec![Split {
                feature: 0,
                border: 10.0,
            }],
            leaves: vec![-1.0, 1.0],
        };
        assert_eq!(tree.score(&[10.0]), -1.0);
    }

    #[test]
    fn decision_tree_routes_both_sides() {
        let tree = DecisionTree {
            nodes: vec![
                Node::Split {
                    feature: 0,
                    threshold: 0.5,
                    left: 1,
                    right: 2,
                },
                Node::Leaf { value: 100.0 },
                Node::Split {
                    feature: 1,
                    threshold: 0.5,
                    left: 3,
                    right: 4,
                },
                Node::Leaf { value: 200.0 },
                Node::Leaf { value: 300.0 },
            ],
        };

        assert_eq!(tree.score(&Array1::from_vec(vec![0.0, 0.0])), 100.0);
        assert_eq!(tree.score(&Array1::from_vec(vec![1.0, 0.0])), 200.0);
        assert_eq!(tree.score(&Array1::from_vec(vec![1.0, 1.0])), 300.0);
    }

    #[test]
    fn node_kinds_deserialize_untagged() {
        let nodes: Vec<Node> = serde_json::from_str(
            r#"[{"feature": 3, "threshold": 0.5, "left": 1, "right": 2}, {"value": 4200.0}]"#,
        )
        .unwrap();
        assert!(matches!(nodes[0], Node::Split { feature: 3, .. }));
        assert!(matches!(nodes[1], Node::Leaf { value } if value == 4200.0));
    }
}
