//! Tests for state mutation, render and change notification.

#[cfg(test)]
mod tests {
    use serde_json::json;
    use trellis::{
        Result,
        message::{Message, event},
        state::{Phase, State},
        testing::{backend::RenderCall, harness::Harness},
    };

    /// Open a harness with one child built from `child`, and clear the records.
    fn with_child(child: serde_json::Value) -> Result<Harness> {
        let mut h = Harness::new()?;
        h.inject(&json!({"event": "append", "path": ["topwidget"], "child": child}))?;
        h.take_sent();
        h.clear_renders();
        Ok(h)
    }

    fn props(v: serde_json::Value) -> State {
        v.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn remote_properties_render_but_never_notify() -> Result<()> {
        let mut h = with_child(json!({"id": "a", "notifyServerOnChange": true}))?;
        for n in 0..3 {
            h.inject(&json!({
                "event": "properties",
                "path": ["topwidget", "a"],
                "properties": {"n": n}
            }))?;
        }
        assert!(h.sent().is_empty());
        let renders = h.renders();
        assert_eq!(renders.len(), 3);
        assert_eq!(renders[2].state, props(json!({"n": 2})));
        Ok(())
    }

    #[test]
    fn local_change_sends_full_state_once() -> Result<()> {
        let mut h = with_child(json!({"id": "a", "properties": {"x": 1, "y": 2}}))?;
        let a = h.node("/topwidget/a")?;
        h.tree.set_state(a, &props(json!({"y": 3})))?;

        let sent = h.take_sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].event, event::CHANGE);
        assert_eq!(sent[0].id.as_deref(), Some("a"));
        assert_eq!(sent[0].path, ["topwidget", "a"]);
        assert_eq!(sent[0].properties, Some(props(json!({"x": 1, "y": 3}))));
        assert_eq!(h.renders().len(), 1);
        assert_eq!(h.tree.node(a).unwrap().phase(), Phase::Idle);
        Ok(())
    }

    #[test]
    fn reactions_fire_even_without_a_change() -> Result<()> {
        let mut h = with_child(json!({"id": "a", "properties": {"x": 1}}))?;
        let a = h.node("/topwidget/a")?;
        h.tree.set_state(a, &props(json!({"x": 1})))?;
        assert_eq!(h.take_sent().len(), 1);
        assert_eq!(h.renders().len(), 1);
        Ok(())
    }

    #[test]
    fn switches_turn_reactions_off() -> Result<()> {
        let mut h = with_child(json!({
            "id": "quiet",
            "renderOnChange": false,
            "notifyServerOnChange": false
        }))?;
        let q = h.node("/topwidget/quiet")?;
        h.tree.set_state(q, &props(json!({"x": 1})))?;
        h.inject(&json!({
            "event": "properties",
            "path": ["topwidget", "quiet"],
            "properties": {"x": 2}
        }))?;
        assert!(h.sent().is_empty());
        assert!(h.renders().is_empty());
        assert_eq!(h.state("/topwidget/quiet")?, props(json!({"x": 2})));
        Ok(())
    }

    #[test]
    fn sync_binding_is_a_local_change() -> Result<()> {
        let mut h = with_child(json!({"id": "field", "handlers": {"input": "sync"}}))?;
        let f = h.node("/topwidget/field")?;
        h.tree.interact(
            f,
            Message::new("input").with_properties(props(json!({"value": "hello"}))),
        )?;
        let sent = h.take_sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].event, event::CHANGE);
        assert_eq!(sent[0].properties, Some(props(json!({"value": "hello"}))));
        Ok(())
    }

    #[test]
    fn css_and_attr_reach_the_renderer() -> Result<()> {
        let mut h = with_child(json!({"id": "a"}))?;
        h.inject(&json!({
            "event": "css",
            "path": ["topwidget", "a"],
            "css": {"color": "red"}
        }))?;
        h.inject(&json!({
            "event": "attr",
            "path": ["topwidget", "a"],
            "attr": {"title": "hi"}
        }))?;
        let a = h.node("/topwidget/a")?;
        let calls = h.calls.lock().unwrap().calls.clone();
        assert_eq!(
            calls,
            vec![
                RenderCall::Css(a, props(json!({"color": "red"}))),
                RenderCall::Attr(a, props(json!({"title": "hi"}))),
            ]
        );
        assert!(h.sent().is_empty());
        Ok(())
    }

    #[test]
    fn sync_on_server_messages_stays_remote() -> Result<()> {
        let mut h = with_child(json!({
            "id": "a",
            "notifyServerOnChange": true,
            "customMethods": {"properties": "sync", "mirror": "sync"}
        }))?;
        h.inject(&json!({
            "event": "properties",
            "path": ["topwidget", "a"],
            "properties": {"label": "Bye"}
        }))?;
        h.inject(&json!({
            "event": "mirror",
            "path": ["topwidget", "a"],
            "properties": {"count": 2}
        }))?;
        assert!(h.sent().is_empty());
        assert_eq!(
            h.state("/topwidget/a")?,
            props(json!({"label": "Bye", "count": 2}))
        );
        Ok(())
    }

    #[test]
    fn state_merging_render_override_terminates() -> Result<()> {
        let mut h = with_child(json!({
            "id": "a",
            "render": "sync",
            "notifyServerOnChange": true
        }))?;
        h.inject(&json!({
            "event": "properties",
            "path": ["topwidget", "a"],
            "properties": {"n": 1}
        }))?;
        let a = h.node("/topwidget/a")?;
        assert_eq!(h.state("/topwidget/a")?, props(json!({"n": 1})));
        assert_eq!(h.tree.node(a).unwrap().phase(), Phase::Idle);
        assert!(h.sent().is_empty());

        h.tree.set_state(a, &props(json!({"n": 2})))?;
        let sent = h.take_sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].properties, Some(props(json!({"n": 2}))));
        Ok(())
    }
}
