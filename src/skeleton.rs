//! Skeletal joint discovery.
//!
//! One pre-order walk over the scene graph collects every node that either
//! carries a joint-kind attribute or sits below a node that was already
//! accepted. The second half of that predicate is deliberate: permissive
//! source scenes interleave plain transform nodes inside joint chains, and
//! dropping one would detach its subtree from the bind hierarchy.

use log::{debug, error, trace};

use crate::convert::{SceneConverter, Transform};
use crate::errors::{ExtractError, Result};
use crate::source::{NodeId, SceneSession, SceneSource};

/// A joint of the extracted skeleton, children in encounter order.
#[derive(Debug, Clone, PartialEq)]
pub struct SkeletonJoint {
    pub name: String,
    pub children: Vec<SkeletonJoint>,
    /// Bind pose, already in the normalized coordinate system. Local to the
    /// parent joint, or scene-space for a root.
    pub transform: Transform,
}

/// The joint forest produced by [`extract_skeleton`]. Immutable afterward.
///
/// Scenes may hold several disconnected chains, so this is a forest rather
/// than a single tree; roots can be discovered at any depth of the scene
/// graph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSkeleton {
    pub roots: Vec<SkeletonJoint>,
}

impl RawSkeleton {
    /// Total joint count across all trees.
    #[must_use]
    pub fn num_joints(&self) -> usize {
        self.iter().count()
    }

    /// Depth-first pre-order iteration over all joints, in the same order
    /// they were discovered. This is the track order of extracted clips.
    #[must_use]
    pub fn iter(&self) -> Joints<'_> {
        let mut stack: Vec<(&SkeletonJoint, bool)> = Vec::with_capacity(self.roots.len());
        for root in self.roots.iter().rev() {
            stack.push((root, false));
        }
        Joints { stack }
    }
}

/// One joint visited by [`RawSkeleton::iter`].
#[derive(Debug, Clone, Copy)]
pub struct JointRef<'a> {
    pub joint: &'a SkeletonJoint,
    /// False for forest roots, true for every other joint.
    pub has_parent: bool,
}

/// Pre-order iterator over a [`RawSkeleton`].
pub struct Joints<'a> {
    stack: Vec<(&'a SkeletonJoint, bool)>,
}

impl<'a> Iterator for Joints<'a> {
    type Item = JointRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (joint, has_parent) = self.stack.pop()?;
        for child in joint.children.iter().rev() {
            self.stack.push((child, true));
        }
        Some(JointRef { joint, has_parent })
    }
}

/// Walks the scene graph once and extracts the skeletal joint forest.
///
/// Bind poses are converted into the normalized system as they are read:
/// the global transform for roots (so transforms of skipped, non-joint
/// ancestors are not lost), the local transform for parented joints. All or
/// nothing: any bind-pose decomposition failure aborts the extraction.
pub fn extract_skeleton<S: SceneSource>(session: &SceneSession<S>) -> Result<RawSkeleton> {
    let source = session.source();
    let mut skeleton = RawSkeleton::default();

    let found = recurse_node(
        source,
        session.converter(),
        source.root_node(),
        &mut skeleton.roots,
        false,
        0,
    )?;

    if !found {
        error!("no skeleton found in scene");
        return Err(ExtractError::NoSkeleton);
    }

    debug!("extracted skeleton with {} joints", skeleton.num_joints());
    Ok(skeleton)
}

/// Returns whether any joint was found in this subtree. Errors propagate
/// immediately, halting unvisited siblings.
fn recurse_node<S: SceneSource>(
    source: &S,
    converter: &SceneConverter,
    node: NodeId,
    siblings: &mut Vec<SkeletonJoint>,
    parented: bool,
    depth: usize,
) -> Result<bool> {
    // Accept below an accepted parent, or on a joint-kind attribute.
    let accept = parented || source.is_joint(node);

    if accept {
        let name = source.node_name(node).to_string();
        trace!("{}{name}", ".".repeat(depth));

        let matrix = if parented {
            source.local_transform(node, 0.0)
        } else {
            source.global_transform(node, 0.0)
        };
        let Some(transform) = converter.convert_transform(matrix) else {
            error!("failed to extract bind pose for joint \"{name}\"");
            return Err(ExtractError::TransformDecomposition { name, time: 0.0 });
        };

        let mut joint = SkeletonJoint {
            name,
            children: Vec::new(),
            transform,
        };
        for child in source.children(node) {
            recurse_node(source, converter, child, &mut joint.children, true, depth + 1)?;
        }
        siblings.push(joint);
        Ok(true)
    } else {
        // Not a joint and no accepted ancestor: keep looking below, any
        // joint found down there starts a new root.
        let mut found = false;
        for child in source.children(node) {
            found |= recurse_node(source, converter, child, siblings, false, depth)?;
        }
        Ok(found)
    }
}
