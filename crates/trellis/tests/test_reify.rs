//! Tests for building nodes from server descriptors.

#[cfg(test)]
mod tests {
    use serde_json::json;
    use trellis::{
        Context, Error, Result,
        behavior::{Behavior, BehaviorRegistry},
        config::Config,
        message::Message,
        render::RenderMode,
        state::Phase,
        testing::harness::Harness,
    };

    /// Custom method that echoes its `extra` payload back to the server.
    fn echo(ctx: &mut dyn Context, msg: &Message) -> Result<()> {
        let mut out = Message::new("echoed");
        out.extra = msg.extra.clone();
        ctx.send(out)
    }

    #[test]
    fn children_have_parent_set() -> Result<()> {
        let mut h = Harness::new()?;
        h.inject(&json!({
            "event": "children",
            "path": ["topwidget"],
            "children": [
                {"id": "a", "properties": {"label": "A"}},
                {"id": "b", "tagName": "span"},
                {"id": "c", "className": "widget"}
            ]
        }))?;
        let root = h.tree.root_id().unwrap();
        let kids = h.tree.children_of(root);
        assert_eq!(kids.len(), 3);
        for k in &kids {
            let node = h.tree.node(*k).unwrap();
            assert_eq!(node.parent(), Some(root));
            assert_eq!(node.phase(), Phase::Announced);
        }
        assert_eq!(h.child_ids("/topwidget")?, vec!["a", "b", "c"]);
        let b = h.tree.node(kids[1]).unwrap();
        assert_eq!(b.presentation().tag_name, "span");
        assert_eq!(h.state("/topwidget/a")?.get("label"), Some(&json!("A")));
        Ok(())
    }

    #[test]
    fn each_child_is_announced_in_order() -> Result<()> {
        let mut h = Harness::new()?;
        h.take_sent();
        h.inject(&json!({
            "event": "children",
            "path": ["topwidget"],
            "children": [{"id": "a"}, {"id": "b"}]
        }))?;
        let sent = h.take_sent();
        let ids: Vec<_> = sent
            .iter()
            .map(|m| (m.event.as_str(), m.id.clone().unwrap_or_default()))
            .collect();
        assert_eq!(ids, vec![("started", "a".into()), ("started", "b".into())]);
        assert_eq!(sent[1].path, ["topwidget", "b"]);
        Ok(())
    }

    #[test]
    fn replacing_children_destroys_old_subtrees() -> Result<()> {
        let mut h = Harness::new()?;
        h.inject(&json!({
            "event": "children",
            "path": ["topwidget"],
            "children": [{"id": "a"}]
        }))?;
        h.inject(&json!({
            "event": "append",
            "path": ["topwidget", "a"],
            "child": {"id": "inner"}
        }))?;
        let a = h.node("/topwidget/a")?;
        let inner = h.node("/topwidget/a/inner")?;

        h.inject(&json!({
            "event": "children",
            "path": ["topwidget"],
            "children": [{"id": "z"}]
        }))?;
        assert!(h.tree.node(a).is_none());
        assert!(h.tree.node(inner).is_none());
        assert_eq!(h.child_ids("/topwidget")?, vec!["z"]);
        assert_eq!(h.tree.len(), 2);
        Ok(())
    }

    #[test]
    fn malformed_descriptor_changes_nothing() -> Result<()> {
        let mut h = Harness::new()?;
        h.inject(&json!({
            "event": "children",
            "path": ["topwidget"],
            "children": [{"id": "keep"}]
        }))?;
        h.take_sent();

        for bad in [
            json!([{"id": "ok"}, {"id": ""}]),
            json!([{"id": "ok"}, {"properties": {}}]),
            json!([{"id": "ok"}, {"id": "x", "render": "eval"}]),
            json!([{"id": "ok"}, "text"]),
        ] {
            let err = h
                .inject(&json!({"event": "children", "path": ["topwidget"], "children": bad}))
                .unwrap_err();
            assert!(matches!(err, Error::MalformedDescriptor { .. }), "{err:?}");
            assert_eq!(h.child_ids("/topwidget")?, vec!["keep"]);
        }
        assert!(h.sent().is_empty());
        Ok(())
    }

    #[test]
    fn remove_unknown_child() -> Result<()> {
        let mut h = Harness::new()?;
        h.inject(&json!({
            "event": "append",
            "path": ["topwidget"],
            "child": {"id": "a"}
        }))?;
        let err = h
            .inject(&json!({"event": "remove", "path": ["topwidget"], "childid": "b"}))
            .unwrap_err();
        assert!(matches!(err, Error::NoRouteToNode { .. }));
        assert_eq!(h.child_ids("/topwidget")?, vec!["a"]);

        h.inject(&json!({"event": "remove", "path": ["topwidget"], "childid": "a"}))?;
        assert!(h.child_ids("/topwidget")?.is_empty());
        Ok(())
    }

    #[test]
    fn missing_payload_field() -> Result<()> {
        let mut h = Harness::new()?;
        let err = h
            .inject(&json!({"event": "append", "path": ["topwidget"]}))
            .unwrap_err();
        assert!(matches!(err, Error::Invalid(ref s) if s.contains("child")));
        Ok(())
    }

    #[test]
    fn custom_methods_and_bindings() -> Result<()> {
        let mut registry = BehaviorRegistry::new();
        registry.register(Behavior::new("echo", echo))?;
        let mut h = Harness::with_config(registry, Config::default())?;
        h.inject(&json!({
            "event": "append",
            "path": ["topwidget"],
            "child": {
                "id": "btn",
                "handlers": {"click": "report"},
                "customMethods": {"shout": "echo"},
                "render": "noop"
            }
        }))?;
        let btn = h.node("/topwidget/btn")?;
        assert!(matches!(
            h.tree.node(btn).unwrap().render_mode(),
            RenderMode::Override(_)
        ));
        h.take_sent();

        h.inject(&json!({
            "event": "shout",
            "path": ["topwidget", "btn"],
            "volume": 11
        }))?;
        let sent = h.take_sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].event, "echoed");
        assert_eq!(sent[0].extra.get("volume"), Some(&json!(11)));
        assert_eq!(sent[0].path, ["topwidget", "btn"]);

        h.tree
            .interact(btn, Message::new("click").with_field("x", json!(3)))?;
        let sent = h.take_sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].event, "click");
        assert_eq!(sent[0].id.as_deref(), Some("btn"));
        assert_eq!(sent[0].extra.get("x"), Some(&json!(3)));

        let err = h.tree.interact(btn, Message::new("hover")).unwrap_err();
        assert!(matches!(err, Error::NoHandler { .. }));
        Ok(())
    }
}
