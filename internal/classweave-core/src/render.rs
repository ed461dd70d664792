//! Rendering of composed class names into an element tree.
//!
//! The element machinery itself is behind [`RenderSink`]: a container only
//! opens its element with the composed class attribute, renders its
//! children inside and closes it again.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    compose::{ComposeError, Composer},
    request::ComposedClassNameRequest,
};

pub const TOOLBAR_CLASS: &str = "toolbar";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error(transparent)]
    Compose(#[from] ComposeError),
    #[error("invalid tag name `{0}`")]
    InvalidTag(String),
    #[error("element `{0}` was not closed properly")]
    Unbalanced(String),
    #[error(transparent)]
    Fmt(#[from] std::fmt::Error),
}

pub trait RenderSink {
    fn open_element(&mut self, tag: &str, class_name: &str) -> Result<(), RenderError>;
    fn text(&mut self, content: &str) -> Result<(), RenderError>;
    fn close_element(&mut self, tag: &str) -> Result<(), RenderError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    Element {
        tag: String,
        #[serde(default, rename = "className", skip_serializing_if = "String::is_empty")]
        class_name: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        children: Vec<Node>,
    },
    Text {
        content: String,
    },
}

impl Node {
    pub fn element(tag: impl Into<String>, class_name: impl Into<String>) -> Self {
        Node::Element {
            tag: tag.into(),
            class_name: class_name.into(),
            children: Vec::new(),
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        Node::Text {
            content: content.into(),
        }
    }

    pub fn with_child(mut self, child: Node) -> Self {
        if let Node::Element {
            ref mut children, ..
        } = self
        {
            children.push(child);
        }
        self
    }

    pub fn render<S: RenderSink + ?Sized>(&self, sink: &mut S) -> Result<(), RenderError> {
        match self {
            Node::Element {
                tag,
                class_name,
                children,
            } => {
                sink.open_element(tag, class_name)?;
                for child in children {
                    child.render(sink)?;
                }
                sink.close_element(tag)
            }
            Node::Text { content } => sink.text(content),
        }
    }
}

fn default_tag() -> String {
    "div".to_owned()
}

/// An element whose class attribute is composed from `request`, wrapping
/// `children`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Container {
    #[serde(flatten)]
    pub request: ComposedClassNameRequest,
    #[serde(default = "default_tag")]
    pub tag: String,
    #[serde(default)]
    pub children: Vec<Node>,
}

impl Container {
    pub fn new(request: ComposedClassNameRequest) -> Self {
        Self {
            request,
            tag: default_tag(),
            children: Vec::new(),
        }
    }

    pub fn toolbar(location: Option<&str>) -> Self {
        Self::new(ComposedClassNameRequest::new(TOOLBAR_CLASS).maybe_location(location))
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn render<S: RenderSink + ?Sized>(&self, sink: &mut S) -> Result<(), RenderError> {
        self.render_with(&Composer::default(), sink)
    }

    pub fn render_with<S: RenderSink + ?Sized>(
        &self,
        composer: &Composer,
        sink: &mut S,
    ) -> Result<(), RenderError> {
        let class_name = composer.compose(&self.request)?;
        sink.open_element(&self.tag, &class_name)?;
        for child in &self.children {
            child.render(sink)?;
        }
        sink.close_element(&self.tag)
    }
}

fn check_tag(tag: &str) -> Result<(), RenderError> {
    let valid = tag.starts_with(|c: char| c.is_ascii_alphabetic())
        && tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
    if valid {
        Ok(())
    } else {
        Err(RenderError::InvalidTag(tag.to_owned()))
    }
}

fn escape_into(out: &mut String, input: &str) {
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
}

/// Writes escaped HTML into a string.
#[derive(Debug, Default)]
pub struct HtmlSink {
    out: String,
    open: Vec<String>,
}

impl HtmlSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(self) -> Result<String, RenderError> {
        match self.open.into_iter().next_back() {
            Some(tag) => Err(RenderError::Unbalanced(tag)),
            None => Ok(self.out),
        }
    }
}

impl RenderSink for HtmlSink {
    fn open_element(&mut self, tag: &str, class_name: &str) -> Result<(), RenderError> {
        check_tag(tag)?;
        write!(self.out, "<{tag}")?;
        if !class_name.is_empty() {
            self.out.push_str(" class=\"");
            escape_into(&mut self.out, class_name);
            self.out.push('"');
        }
        self.out.push('>');
        self.open.push(tag.to_owned());
        Ok(())
    }

    fn text(&mut self, content: &str) -> Result<(), RenderError> {
        escape_into(&mut self.out, content);
        Ok(())
    }

    fn close_element(&mut self, tag: &str) -> Result<(), RenderError> {
        if self.open.pop().as_deref() != Some(tag) {
            return Err(RenderError::Unbalanced(tag.to_owned()));
        }
        write!(self.out, "</{tag}>")?;
        Ok(())
    }
}

/// Collects rendered output back into a [`Node`] tree.
#[derive(Debug, Default)]
pub struct TreeSink {
    roots: Vec<Node>,
    open: Vec<Node>,
}

impl TreeSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(self) -> Result<Vec<Node>, RenderError> {
        match self.open.into_iter().next_back() {
            Some(Node::Element { tag, .. }) => Err(RenderError::Unbalanced(tag)),
            Some(Node::Text { .. }) | None => Ok(self.roots),
        }
    }

    fn push(&mut self, node: Node) {
        match self.open.last_mut() {
            Some(Node::Element { children, .. }) => children.push(node),
            _ => self.roots.push(node),
        }
    }
}

impl RenderSink for TreeSink {
    fn open_element(&mut self, tag: &str, class_name: &str) -> Result<(), RenderError> {
        check_tag(tag)?;
        self.open.push(Node::element(tag, class_name));
        Ok(())
    }

    fn text(&mut self, content: &str) -> Result<(), RenderError> {
        self.push(Node::text(content));
        Ok(())
    }

    fn close_element(&mut self, tag: &str) -> Result<(), RenderError> {
        match self.open.pop() {
            Some(node) if matches!(&node, Node::Element { tag: open, .. } if open == tag) => {
                self.push(node);
                Ok(())
            }
            _ => Err(RenderError::Unbalanced(tag.to_owned())),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn render_html(container: &Container) -> String {
        let mut sink = HtmlSink::new();
        container.render(&mut sink).expect("should render");
        sink.finish().expect("should be balanced")
    }

    #[test]
    fn test_toolbar_html() {
        let toolbar = Container::toolbar(Some("top")).child(Node::text("Save & Quit"));
        assert_eq!(
            render_html(&toolbar),
            r#"<div class="toolbar toolbar--top">Save &amp; Quit</div>"#
        );
    }

    #[test]
    fn test_nested_children() {
        let container = Container::new(ComposedClassNameRequest::new("panel").extra("x\"y"))
            .tag("section")
            .child(Node::element("span", "").with_child(Node::text("<b>")));
        assert_eq!(
            render_html(&container),
            r#"<section class="panel x&quot;y"><span>&lt;b&gt;</span></section>"#
        );
    }

    #[test]
    fn test_invalid_tag() {
        let container = Container::toolbar(None).tag("div onclick");
        let mut sink = HtmlSink::new();
        assert!(matches!(
            container.render(&mut sink),
            Err(RenderError::InvalidTag(_))
        ));
    }

    #[test]
    fn test_empty_base_class_fails_render() {
        let container = Container::new(ComposedClassNameRequest::new(""));
        let mut sink = TreeSink::new();
        assert!(matches!(
            container.render(&mut sink),
            Err(RenderError::Compose(ComposeError::InvalidArgument(_)))
        ));
    }

    #[test]
    fn test_tree_sink_snapshot() {
        let container = Container::toolbar(None)
            .child(Node::element("button", "primary").with_child(Node::text("Run")));
        let mut sink = TreeSink::new();
        container.render(&mut sink).expect("should render");

        let tree = sink.finish().expect("should be balanced");
        assert_eq!(
            tree,
            vec![Node::element("div", "toolbar")
                .with_child(Node::element("button", "primary").with_child(Node::text("Run")))]
        );
    }

    #[test]
    fn test_unbalanced_close() {
        let mut sink = HtmlSink::new();
        sink.open_element("div", "").expect("valid tag");
        assert!(matches!(
            sink.close_element("span"),
            Err(RenderError::Unbalanced(_))
        ));

        let mut sink = TreeSink::new();
        sink.open_element("div", "").expect("valid tag");
        assert!(matches!(sink.finish(), Err(RenderError::Unbalanced(tag)) if tag == "div"));
    }

    #[test]
    fn test_deserialize_container() {
        let container: Container = serde_json::from_str(
            r#"{
                "baseClass": "toolbar",
                "location": "bottom",
                "extraClass": {"dense": true, "hidden": false},
                "children": [{"type": "text", "content": "hi"}]
            }"#,
        )
        .expect("should deserialize");

        assert_eq!(container.tag, "div");
        assert_eq!(
            render_html(&container),
            r#"<div class="toolbar toolbar--bottom dense">hi</div>"#
        );
    }

    #[test]
    fn test_serialize_node() {
        let node = Node::element("p", "lead").with_child(Node::text("x"));
        assert_eq!(
            serde_json::to_value(&node).expect("should serialize"),
            serde_json::json!({
                "type": "element",
                "tag": "p",
                "className": "lead",
                "children": [{"type": "text", "content": "x"}]
            })
        );
    }
}
