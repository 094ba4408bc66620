//! Path addressing between the server and tree nodes.
//!
//! Upward messages are source-routed by accumulation: each ancestor prepends
//! its id, so the path that reaches the transport reads root first. Downward
//! messages carry a root-first path that is consumed one id per hop.

use super::tree::Tree;
use crate::{
    NodeId, codec,
    error::{Error, Result},
    message::Message,
    path::Path,
};

/// Send a message from `from` to the server.
///
/// Stamps the originating id and replaces any existing path with the route to
/// the root. A node that has lost its parent without being the root fails with
/// `BrokenRoute` and nothing is sent.
pub fn deliver_up(tree: &mut Tree, from: NodeId, mut msg: Message) -> Result<()> {
    let node = tree.live(from)?;
    msg.id = Some(node.id.clone());
    msg.path = path_of(tree, from)?;
    tracing::debug!(
        node = msg.id.as_deref().unwrap_or_default(),
        event = %msg.event,
        path = %msg.path,
        "send"
    );
    let frame = codec::encode(&msg)?;
    tree.link.send(frame)
}

/// Route a message from `from` down its path and dispatch it at the target.
pub fn deliver_down(tree: &mut Tree, from: NodeId, msg: &Message) -> Result<()> {
    let target = resolve(tree, from, &msg.path)?;
    tree.dispatch(target, msg)
}

/// Walk `path` from `from` without dispatching, returning the target.
///
/// The first component must name `from` itself; each later component names a
/// direct child of the previous hop, first match in child order. Any miss fails
/// with `NoRouteToNode` carrying the path as given.
pub fn resolve(tree: &Tree, from: NodeId, path: &Path) -> Result<NodeId> {
    let no_route = || Error::NoRouteToNode { path: path.clone() };
    if path.len() > tree.config.max_depth {
        return Err(no_route());
    }

    let mut remaining = path.clone();
    let mut current = from;
    loop {
        let node = tree.live(current).map_err(|_| no_route())?;
        match remaining.pop_front() {
            Some(id) if id == node.id => {}
            _ => return Err(no_route()),
        }
        let Some(next) = remaining.first() else {
            return Ok(current);
        };
        current = tree.child_by_id(current, next).ok_or_else(no_route)?;
    }
}

/// The root-first path of a node.
pub fn path_of(tree: &Tree, id: NodeId) -> Result<Path> {
    let mut path = Path::empty();
    let mut current = id;
    loop {
        let node = tree.live(current)?;
        path.prepend(node.id.clone());
        match node.parent {
            Some(parent) => current = parent,
            None if tree.root == Some(current) => return Ok(path),
            None => {
                return Err(Error::BrokenRoute {
                    node: node.id.clone(),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{
        behavior::BehaviorRegistry,
        config::Config,
        descriptor::Presentation,
        message::event,
        node::Node,
        reify,
        state::State,
        testing::backend::{TestRender, TestTransport},
    };

    fn tree_with(config: Config) -> Tree {
        let (_, transport) = TestTransport::create();
        let (_, render) = TestRender::create();
        let mut tree = Tree::with_config(
            Box::new(transport),
            Box::new(render),
            BehaviorRegistry::new(),
            config,
        )
        .unwrap();
        tree.open().unwrap();
        tree
    }

    fn chain(tree: &mut Tree, ids: &[&str]) -> NodeId {
        let mut parent = tree.root_id().unwrap();
        for id in ids {
            parent = reify::reify_value(tree, &json!({ "id": id }), parent).unwrap();
        }
        parent
    }

    #[test]
    fn resolve_walks_children() {
        let mut tree = tree_with(Config::default());
        let leaf = chain(&mut tree, &["a", "b", "c"]);
        let root = tree.root_id().unwrap();
        assert_eq!(
            resolve(&tree, root, &Path::from("/topwidget/a/b/c")).unwrap(),
            leaf
        );
        assert_eq!(resolve(&tree, root, &Path::from("/topwidget")).unwrap(), root);
    }

    #[test]
    fn resolve_failures_carry_original_path() {
        let mut tree = tree_with(Config::default());
        chain(&mut tree, &["a", "b"]);
        let root = tree.root_id().unwrap();
        for p in ["/", "/other", "/topwidget/b", "/topwidget/a/b/c", "/a"] {
            let path = Path::from(p);
            assert_eq!(
                resolve(&tree, root, &path),
                Err(Error::NoRouteToNode { path: path.clone() }),
                "{p}"
            );
        }
    }

    #[test]
    fn max_depth_is_enforced() {
        let mut tree = tree_with(Config {
            max_depth: 2,
            ..Config::default()
        });
        chain(&mut tree, &["a", "b"]);
        let root = tree.root_id().unwrap();
        assert!(resolve(&tree, root, &Path::from("/topwidget/a")).is_ok());
        assert!(matches!(
            resolve(&tree, root, &Path::from("/topwidget/a/b")),
            Err(Error::NoRouteToNode { .. })
        ));
    }

    #[test]
    fn orphan_cannot_send() {
        let mut tree = tree_with(Config::default());
        let orphan = tree
            .nodes
            .insert(Node::new("lost", State::new(), Presentation::default()));
        let err = deliver_up(&mut tree, orphan, Message::new(event::CHANGE)).unwrap_err();
        assert_eq!(
            err,
            Error::BrokenRoute {
                node: "lost".into()
            }
        );
    }

    #[test]
    fn upward_path_replaces_existing() {
        let (frames, transport) = TestTransport::create();
        let (_, render) = TestRender::create();
        let mut tree = Tree::new(Box::new(transport), Box::new(render));
        tree.open().unwrap();
        let leaf = chain(&mut tree, &["a"]);
        frames.lock().unwrap().clear();

        let msg = Message::new("ping").with_path("/bogus/route");
        deliver_up(&mut tree, leaf, msg).unwrap();
        let sent = frames.lock().unwrap().messages();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].id.as_deref(), Some("a"));
        assert_eq!(sent[0].path, ["topwidget", "a"]);
    }
}
