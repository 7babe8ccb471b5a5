use crate::graph::{gain::Gain, node::GraphNode, through::Through};

pub trait NodeExt: GraphNode + Sized {
    fn through<F: GraphNode>(self, filter: F) -> Through<Self, F> {
        Through::new(self, filter)
    }

    /// Follow this node with a fixed gain stage.
    fn gain(self, gain: f32) -> Through<Self, Gain> {
        Through::new(self, Gain::new(gain))
    }
}

impl<T: GraphNode> NodeExt for T {}
