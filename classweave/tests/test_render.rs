use classweave::{
    ComposedClassNameRequest, Composer, Container, HtmlSink, ModifierPattern, Node, RenderSink,
    TreeSink,
};

#[derive(Default)]
struct EventLog(Vec<String>);

impl RenderSink for EventLog {
    fn open_element(&mut self, tag: &str, class_name: &str) -> Result<(), classweave::RenderError> {
        self.0.push(format!("open {tag} [{class_name}]"));
        Ok(())
    }

    fn text(&mut self, content: &str) -> Result<(), classweave::RenderError> {
        self.0.push(format!("text {content}"));
        Ok(())
    }

    fn close_element(&mut self, tag: &str) -> Result<(), classweave::RenderError> {
        self.0.push(format!("close {tag}"));
        Ok(())
    }
}

#[test]
fn test_children_rendered_inside_container() {
    let toolbar = Container::toolbar(Some("bottom"))
        .child(Node::text("one"))
        .child(Node::element("span", "two"));

    let mut log = EventLog::default();
    toolbar.render(&mut log).expect("should render");

    assert_eq!(
        log.0,
        [
            "open div [toolbar toolbar--bottom]",
            "text one",
            "open span [two]",
            "close span",
            "close div",
        ]
    );
}

#[test]
fn test_render_with_custom_pattern() {
    let composer = Composer::new(ModifierPattern::parse("[base]-at-[location]").expect("valid"));
    let container = Container::new(
        ComposedClassNameRequest::new("panel")
            .location("left")
            .flag("open", true),
    )
    .tag("aside");

    let mut sink = HtmlSink::new();
    container
        .render_with(&composer, &mut sink)
        .expect("should render");
    assert_eq!(
        sink.finish().expect("balanced"),
        r#"<aside class="panel panel-at-left open"></aside>"#
    );
}

#[test]
fn test_tree_snapshot_is_deterministic() {
    let container: Container = serde_json::from_str(
        r#"{
            "baseClass": "toolbar",
            "location": "top",
            "extraClass": "user-class",
            "tag": "nav",
            "children": [
                {"type": "element", "tag": "button", "className": "btn", "children": [
                    {"type": "text", "content": "Run"}
                ]}
            ]
        }"#,
    )
    .expect("should deserialize");

    let snapshot = || {
        let mut sink = TreeSink::new();
        container.render(&mut sink).expect("should render");
        serde_json::to_value(sink.finish().expect("balanced")).expect("should serialize")
    };

    assert_eq!(snapshot(), snapshot());
    assert_eq!(
        snapshot(),
        serde_json::json!([{
            "type": "element",
            "tag": "nav",
            "className": "toolbar toolbar--top user-class",
            "children": [{
                "type": "element",
                "tag": "button",
                "className": "btn",
                "children": [{"type": "text", "content": "Run"}]
            }]
        }])
    );
}
