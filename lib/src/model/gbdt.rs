//! Gradient boosted regression trees.
//!
//! Trees are read in the layout XGBoost's `get_dump(dump_format="json")`
//! writes: nested nodes, each either a split
//!
//! ```json
//! {"nodeid": 0, "depth": 0, "split": "promo", "split_condition": 0.5,
//!  "yes": 1, "no": 2, "missing": 1, "children": [...]}
//! ```
//!
//! or a leaf `{"nodeid": 1, "leaf": 0.0421}`. At load time each tree is
//! flattened into an index-addressed node arena and every split feature is
//! resolved to a column of the model schema, so scoring never looks up names.
//!
//! Routing follows XGBoost: a row goes to `missing` when the value is NaN, to
//! `yes` when `x[split] < split_condition` and to `no` otherwise. XGBoost
//! stores features and conditions as `f32`, so the comparison is made in
//! single precision. The score is `base_score` plus the sum of the leaves
//! reached.

use std::collections::HashMap;

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

use crate::dataset::{feature_index, N_FEATURES};
use crate::error::PipelineError;
use crate::model::InferenceModel;

/// Deepest tree accepted at load time.
pub const MAX_TREE_DEPTH: usize = 64;

fn default_base_score() -> f64 {
    0.5
}

/// One node of an XGBoost JSON tree dump.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DumpNode {
    pub nodeid: u32,
    #[serde(default)]
    pub depth: Option<u32>,
    #[serde(default)]
    pub split: Option<String>,
    #[serde(default)]
    pub split_condition: Option<f64>,
    #[serde(default)]
    pub yes: Option<u32>,
    #[serde(default)]
    pub no: Option<u32>,
    #[serde(default)]
    pub missing: Option<u32>,
    #[serde(default)]
    pub children: Vec<DumpNode>,
    #[serde(default)]
    pub leaf: Option<f64>,
}

impl DumpNode {
    pub fn leaf(nodeid: u32, value: f64) -> Self {
        Self {
            nodeid,
            leaf: Some(value),
            ..Self::default()
        }
    }

    /// A split whose `missing` branch is `yes`, with both children given.
    pub fn split(nodeid: u32, feature: &str, condition: f64, yes: DumpNode, no: DumpNode) -> Self {
        Self {
            nodeid,
            split: Some(feature.to_string()),
            split_condition: Some(condition),
            yes: Some(yes.nodeid),
            no: Some(no.nodeid),
            missing: Some(yes.nodeid),
            children: vec![yes, no],
            ..Self::default()
        }
    }
}

/// Serializable parameters of a boosted tree ensemble.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GbdtParams {
    /// Global bias added to every prediction. XGBoost defaults to 0.5.
    #[serde(default = "default_base_score")]
    pub base_score: f64,
    /// One root node per boosting round.
    pub trees: Vec<DumpNode>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Node {
    Split {
        feature: usize,
        threshold: f32,
        yes: usize,
        no: usize,
        missing: usize,
    },
    Leaf(f64),
}

/// A flattened tree. The root is at index 0.
#[derive(Clone, Debug)]
struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    fn compile(root: &DumpNode) -> Result<Self, PipelineError> {
        let mut nodes = Vec::new();
        compile_node(root, 0, &mut nodes)?;
        Ok(Self { nodes })
    }

    fn score(&self, row: ArrayView1<'_, f64>) -> f64 {
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                Node::Leaf(value) => return value,
                Node::Split {
                    feature,
                    threshold,
                    yes,
                    no,
                    missing,
                } => {
                    let x = row[feature];
                    idx = if x.is_nan() {
                        missing
                    } else if (x as f32) < threshold {
                        yes
                    } else {
                        no
                    };
                }
            }
        }
    }
}

/// Resolve a split name: a schema column (`promo`) or a positional `f<index>`.
fn resolve_feature(name: &str) -> Result<usize, PipelineError> {
    if let Some(idx) = feature_index(name) {
        return Ok(idx);
    }
    name.strip_prefix('f')
        .and_then(|digits| digits.parse::<usize>().ok())
        .filter(|&idx| idx < N_FEATURES)
        .ok_or_else(|| {
            PipelineError::InvalidParameter(format!("tree splits on unknown feature '{}'", name))
        })
}

/// Append `node` and its subtree to `nodes`, returning the node's index.
///
/// Branch targets must name direct children, which keeps every walk finite.
fn compile_node(
    node: &DumpNode,
    depth: usize,
    nodes: &mut Vec<Node>,
) -> Result<usize, PipelineError> {
    if depth > MAX_TREE_DEPTH {
        return Err(PipelineError::InvalidParameter(format!(
            "tree node {} is deeper than {}",
            node.nodeid, MAX_TREE_DEPTH
        )));
    }
    let idx = nodes.len();
    if let Some(value) = node.leaf {
        nodes.push(Node::Leaf(value));
        return Ok(idx);
    }

    let invalid = |what: &str| {
        PipelineError::InvalidParameter(format!("tree node {}: {}", node.nodeid, what))
    };
    let feature = resolve_feature(node.split.as_deref().ok_or_else(|| invalid("missing split"))?)?;
    let threshold = node
        .split_condition
        .ok_or_else(|| invalid("missing split_condition"))? as f32;
    let yes_id = node.yes.ok_or_else(|| invalid("missing yes branch"))?;
    let no_id = node.no.ok_or_else(|| invalid("missing no branch"))?;
    let missing_id = node.missing.unwrap_or(yes_id);

    // Reserve the slot, then compile children after it.
    nodes.push(Node::Leaf(0.0));
    let mut child_index = HashMap::with_capacity(node.children.len());
    for child in &node.children {
        let child_idx = compile_node(child, depth + 1, nodes)?;
        if child_index.insert(child.nodeid, child_idx).is_some() {
            return Err(invalid("duplicate child nodeid"));
        }
    }
    let target = |id: u32| {
        child_index
            .get(&id)
            .copied()
            .ok_or_else(|| invalid(&format!("branch to {} is not a child", id)))
    };
    nodes[idx] = Node::Split {
        feature,
        threshold,
        yes: target(yes_id)?,
        no: target(no_id)?,
        missing: target(missing_id)?,
    };
    Ok(idx)
}

/// Fitted boosted tree ensemble.
#[derive(Clone, Debug)]
pub struct GbdtModel {
    base_score: f64,
    trees: Vec<Tree>,
    dump: Vec<DumpNode>,
}

impl GbdtModel {
    pub fn from_params(params: GbdtParams) -> Result<Self, PipelineError> {
        if !params.base_score.is_finite() {
            return Err(PipelineError::InvalidParameter(
                "base_score must be finite".to_string(),
            ));
        }
        let trees = params
            .trees
            .iter()
            .map(Tree::compile)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            base_score: params.base_score,
            trees,
            dump: params.trees,
        })
    }

    pub fn extract_params(&self) -> GbdtParams {
        GbdtParams {
            base_score: self.base_score,
            trees: self.dump.clone(),
        }
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

impl InferenceModel for GbdtModel {
    fn n_features_in(&self) -> usize {
        N_FEATURES
    }

    fn predict_row(&self, row: ArrayView1<'_, f64>) -> f64 {
        self.base_score + self.trees.iter().map(|tree| tree.score(row)).sum::<f64>()
    }
}
