use thiserror::Error;

use crate::css::CssError;
use crate::node::NodeId;

#[derive(Debug, Error)]
pub enum DomError {
    #[error("node {0:?} does not exist in this document")]
    UnknownNode(NodeId),

    #[error("cannot append {child:?} to {parent:?}: the child is the parent or one of its ancestors")]
    HierarchyRequest { parent: NodeId, child: NodeId },

    #[error("cannot append to {0:?}: text nodes have no children")]
    NotAnElement(NodeId),

    #[error("style fragment `{id}`: {source}")]
    Css {
        id: String,
        #[source]
        source: CssError,
    },
}
