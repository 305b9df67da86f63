/*
 * Copyright © 2025, United States Government, as represented by the Administrator of 
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License"); 
 * you may not use this file except in compliance with the License. You may obtain a copy 
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

//! decision tree ensembles (random forests) exported as JSON or RON

use std::collections::BTreeMap;
use serde::{Serialize,Deserialize};

use crate::{Classifier, Result, FieldClassModelError, invalid_model};

/// a decision tree node. Split nodes send feature vectors with `features[feature] <= threshold` to the
/// `left` node and all others to the `right` node
#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
pub enum TreeNode {
    Split { feature: usize, threshold: f64, left: usize, right: usize },
    Leaf { class: i64 },
}

/// a tree stored as a flat node list with node 0 as the root
#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    /// check that the root exists and that child references only point forward (which rules out cycles)
    pub fn check (&self, n_features: Option<usize>)->Result<()> {
        if self.nodes.is_empty() {
            return Err( invalid_model("empty tree"))
        }

        for (i,node) in self.nodes.iter().enumerate() {
            if let TreeNode::Split { feature, threshold, left, right } = node {
                if *left <= i || *right <= i || *left >= self.nodes.len() || *right >= self.nodes.len() {
                    return Err( invalid_model( format!("invalid child reference in node {i}")))
                }
                if !threshold.is_finite() {
                    return Err( invalid_model( format!("invalid threshold in node {i}")))
                }
                if let Some(n) = n_features {
                    if *feature >= n { return Err( invalid_model( format!("feature index {feature} out of range in node {i}"))) }
                }
            }
        }
        Ok(())
    }

    /// the maximum feature index used by split nodes
    pub fn max_feature (&self)->Option<usize> {
        self.nodes.iter().filter_map( |n| if let TreeNode::Split{feature,..} = n { Some(*feature) } else { None }).max()
    }

    pub fn predict (&self, features: &[f64])->Result<i64> {
        let mut i = 0;
        loop {
            match self.nodes.get(i).ok_or_else( || invalid_model( format!("no tree node {i}")))? {
                TreeNode::Leaf { class } => return Ok(*class),
                TreeNode::Split { feature, threshold, left, right } => {
                    let v = features.get(*feature).ok_or_else( || FieldClassModelError::FeatureMismatchError { expected: feature+1, got: features.len() })?;
                    i = if *v <= *threshold { *left } else { *right };
                }
            }
        }
    }
}

/// ensemble of decision trees that predicts the majority vote of its trees
#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
pub struct ForestClassifier {
    #[serde(default, skip_serializing_if="fieldclass_common::is_none")]
    pub n_features: Option<usize>,

    pub trees: Vec<DecisionTree>,
}

impl ForestClassifier {
    pub fn new (n_features: Option<usize>, trees: Vec<DecisionTree>)->Result<Self> {
        let forest = ForestClassifier { n_features, trees };
        forest.check()?;
        Ok(forest)
    }

    pub fn check (&self)->Result<()> {
        if self.trees.is_empty() {
            return Err( invalid_model("forest without trees"))
        }
        for tree in &self.trees {
            tree.check( self.n_features)?;
        }
        Ok(())
    }

    pub fn from_json_bytes (bytes: &[u8])->Result<Self> {
        let forest: ForestClassifier = serde_json::from_slice(bytes)?;
        forest.check()?;
        Ok(forest)
    }

    pub fn from_ron_bytes (bytes: &[u8])->Result<Self> {
        let forest: ForestClassifier = ron::de::from_bytes(bytes)?;
        forest.check()?;
        Ok(forest)
    }

    /// per class vote counts for the given feature vector
    pub fn votes (&self, features: &[f64])->Result<BTreeMap<i64,usize>> {
        let mut votes = BTreeMap::new();
        for tree in &self.trees {
            *votes.entry( tree.predict(features)?).or_insert(0) += 1;
        }
        Ok(votes)
    }
}

impl Classifier for ForestClassifier {
    fn predict (&self, features: &[f64])->Result<i64> {
        self.check_features(features)?;

        // reverse iteration since max_by_key picks the last maximum, which gives us the smallest label on ties
        self.votes(features)?.into_iter().rev()
            .max_by_key( |(_,n)| *n)
            .map( |(class,_)| class)
            .ok_or_else( || invalid_model("no votes"))
    }

    fn n_features (&self)->Option<usize> {
        self.n_features
    }
}
