//! In-memory [`SceneSource`] used by the integration tests.
//!
//! Nodes are stored flat with parent indices; local transforms and property
//! values are closures of time, so tests can model constant and animated
//! content alike.

#![allow(dead_code)]

use std::cell::Cell;

use glam::Mat4;

use ossein::{
    AxisSystem, FrontParity, Handedness, NodeId, PropertyId, PropertyType, PropertyValue,
    SceneSource, TimeSpan, UnitScale,
};

type TransformFn = Box<dyn Fn(f32) -> Mat4>;
type ValueFn = Box<dyn Fn(f32) -> PropertyValue>;

pub struct MockNode {
    pub name: String,
    pub joint: bool,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
    pub local: TransformFn,
}

pub struct MockProperty {
    pub node: usize,
    pub name: String,
    pub ty: PropertyType,
    pub animated: bool,
    pub value: ValueFn,
}

pub struct MockScene {
    pub nodes: Vec<MockNode>,
    pub props: Vec<MockProperty>,
    pub axis: AxisSystem,
    pub unit: UnitScale,
    pub default_span: TimeSpan,
    pub frame_rate: f32,
    pub clips: Vec<(String, Option<TimeSpan>)>,
    /// Counts `evaluate_property` calls, to assert rejection ordering.
    pub evaluations: Cell<usize>,
}

/// Axis metadata whose conversion matrix is the identity (Y-up, Z-front,
/// right-handed).
pub const IDENTITY_AXES: AxisSystem = AxisSystem {
    up: 2,
    front: FrontParity::Odd,
    handedness: Handedness::Right,
};

impl MockScene {
    /// An empty scene with identity coordinate conventions: node 0 is a
    /// plain (non-joint) "RootNode" with an identity transform.
    pub fn new() -> Self {
        // Surfaces extraction logs under RUST_LOG when a test fails.
        let _ = env_logger::builder().is_test(true).try_init();
        Self {
            nodes: vec![MockNode {
                name: "RootNode".to_string(),
                joint: false,
                parent: None,
                children: Vec::new(),
                local: Box::new(|_| Mat4::IDENTITY),
            }],
            props: Vec::new(),
            axis: IDENTITY_AXES,
            unit: UnitScale::METERS,
            default_span: TimeSpan {
                start: 0.0,
                end: 1.0,
            },
            frame_rate: 30.0,
            clips: Vec::new(),
            evaluations: Cell::new(0),
        }
    }

    pub fn add_node(&mut self, parent: usize, name: &str, joint: bool) -> usize {
        self.add_animated_node(parent, name, joint, |_| Mat4::IDENTITY)
    }

    pub fn add_node_with_transform(
        &mut self,
        parent: usize,
        name: &str,
        joint: bool,
        local: Mat4,
    ) -> usize {
        self.add_animated_node(parent, name, joint, move |_| local)
    }

    pub fn add_animated_node(
        &mut self,
        parent: usize,
        name: &str,
        joint: bool,
        local: impl Fn(f32) -> Mat4 + 'static,
    ) -> usize {
        let index = self.nodes.len();
        self.nodes.push(MockNode {
            name: name.to_string(),
            joint,
            parent: Some(parent),
            children: Vec::new(),
            local: Box::new(local),
        });
        self.nodes[parent].children.push(index);
        index
    }

    pub fn add_clip(&mut self, name: &str, span: Option<TimeSpan>) {
        self.clips.push((name.to_string(), span));
    }

    pub fn add_property(
        &mut self,
        node: usize,
        name: &str,
        ty: PropertyType,
        animated: bool,
        value: impl Fn(f32) -> PropertyValue + 'static,
    ) {
        self.props.push(MockProperty {
            node,
            name: name.to_string(),
            ty,
            animated,
            value: Box::new(value),
        });
    }

    fn global(&self, index: usize, time: f32) -> Mat4 {
        let node = &self.nodes[index];
        let local = (node.local)(time);
        match node.parent {
            Some(parent) => self.global(parent, time) * local,
            None => local,
        }
    }
}

impl SceneSource for MockScene {
    fn root_node(&self) -> NodeId {
        NodeId(0)
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes[node.0 as usize]
            .children
            .iter()
            .map(|&index| NodeId(index as u32))
            .collect()
    }

    fn node_name(&self, node: NodeId) -> &str {
        &self.nodes[node.0 as usize].name
    }

    fn is_joint(&self, node: NodeId) -> bool {
        self.nodes[node.0 as usize].joint
    }

    fn find_node(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|node| node.name == name)
            .map(|index| NodeId(index as u32))
    }

    fn local_transform(&self, node: NodeId, time: f32) -> Mat4 {
        (self.nodes[node.0 as usize].local)(time)
    }

    fn global_transform(&self, node: NodeId, time: f32) -> Mat4 {
        self.global(node.0 as usize, time)
    }

    fn axis_system(&self) -> AxisSystem {
        self.axis
    }

    fn unit_scale(&self) -> UnitScale {
        self.unit
    }

    fn default_time_span(&self) -> TimeSpan {
        self.default_span
    }

    fn frame_rate(&self) -> f32 {
        self.frame_rate
    }

    fn clip_names(&self) -> Vec<String> {
        self.clips.iter().map(|(name, _)| name.clone()).collect()
    }

    fn clip_time_span(&self, clip: &str) -> Option<TimeSpan> {
        self.clips
            .iter()
            .find(|(name, _)| name == clip)
            .and_then(|(_, span)| *span)
    }

    fn find_property(&self, node: NodeId, name: &str) -> Option<PropertyId> {
        self.props
            .iter()
            .position(|prop| prop.node == node.0 as usize && prop.name == name)
            .map(|index| PropertyId(index as u32))
    }

    fn property_type(&self, property: PropertyId) -> PropertyType {
        self.props[property.0 as usize].ty
    }

    fn is_property_animated(&self, property: PropertyId) -> bool {
        self.props[property.0 as usize].animated
    }

    fn evaluate_property(&self, property: PropertyId, time: f32) -> PropertyValue {
        self.evaluations.set(self.evaluations.get() + 1);
        (self.props[property.0 as usize].value)(time)
    }
}
