//! View renderer: derives DOM-like node trees from model state.
//!
//! Rendering is a pure projection. A component's subtree depends only on
//! that instance and its type descriptor, so the host can regenerate one
//! fragment after an edit without touching the rest of the page. Nothing in
//! this module is ever read back to recover model state.
//!
//! Unset and empty fields both render as the field's default text.

#[cfg(test)]
#[path = "view_test.rs"]
mod view_test;

use serde::Serialize;

use crate::model::{ComponentInstance, Container};
use crate::registry::{ComponentKind, ComponentTypeDescriptor, Registry};

/// An element with a tag, CSS classes, attributes, and children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Element {
    pub tag: &'static str,
    pub classes: Vec<&'static str>,
    pub attrs: Vec<(&'static str, String)>,
    pub children: Vec<ViewNode>,
}

/// A node in a rendered fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ViewNode {
    Element(Element),
    Text(String),
}

impl Element {
    #[must_use]
    pub fn new(tag: &'static str) -> Self {
        Self { tag, classes: Vec::new(), attrs: Vec::new(), children: Vec::new() }
    }

    #[must_use]
    pub fn class(mut self, class: &'static str) -> Self {
        self.classes.push(class);
        self
    }

    #[must_use]
    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, value.into()));
        self
    }

    #[must_use]
    pub fn child(mut self, node: impl Into<ViewNode>) -> Self {
        self.children.push(node.into());
        self
    }

    #[must_use]
    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(ViewNode::Text(text.into()))
    }

    /// Value of attribute `name`, if present.
    #[must_use]
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs.iter().find(|(n, _)| *n == name).map(|(_, v)| v.as_str())
    }
}

impl From<Element> for ViewNode {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

impl ViewNode {
    /// Concatenated text of this node and its descendants.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Self::Text(text) => out.push_str(text),
            Self::Element(element) => {
                for child in &element.children {
                    child.collect_text(out);
                }
            }
        }
    }

    /// First element (depth-first, self included) carrying `class`.
    #[must_use]
    pub fn find_class(&self, class: &str) -> Option<&Element> {
        let Self::Element(element) = self else {
            return None;
        };
        if element.classes.iter().any(|c| *c == class) {
            return Some(element);
        }
        element.children.iter().find_map(|child| child.find_class(class))
    }

    /// Serialize as HTML. Text and attribute values are escaped.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Self::Text(text) => escape_into(text, out),
            Self::Element(element) => {
                out.push('<');
                out.push_str(element.tag);
                if !element.classes.is_empty() {
                    out.push_str(" class=\"");
                    out.push_str(&element.classes.join(" "));
                    out.push('"');
                }
                for (name, value) in &element.attrs {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    escape_into(value, out);
                    out.push('"');
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&element.tag) {
                    return;
                }
                for child in &element.children {
                    child.write_html(out);
                }
                out.push_str("</");
                out.push_str(element.tag);
                out.push('>');
            }
        }
    }
}

/// Elements with no end tag and no content.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track", "wbr",
];

fn escape_into(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
}

// =============================================================================
// FIELD VALUES
// =============================================================================

/// The stored value for `key` when it is non-empty.
fn provided<'a>(instance: &'a ComponentInstance, key: &str) -> Option<&'a str> {
    instance.field(key).filter(|value| !value.is_empty())
}

/// The stored value for `key`, or the field's default text.
fn shown<'a>(instance: &'a ComponentInstance, descriptor: &ComponentTypeDescriptor, key: &str) -> &'a str {
    match provided(instance, key) {
        Some(value) => value,
        None => descriptor.field(key).map_or("", |field| field.default),
    }
}

// =============================================================================
// COMPONENTS
// =============================================================================

/// Body of a component: the type-specific summary of its configuration.
#[must_use]
pub fn render_content(instance: &ComponentInstance, descriptor: &ComponentTypeDescriptor) -> ViewNode {
    let show = |key| shown(instance, descriptor, key);
    let body = Element::new("div").class("component-content");

    let body = match instance.kind {
        ComponentKind::Video => body
            .child(Element::new("h4").text(show("title")))
            .child(Element::new("div").class("video-preview").child(placeholder(
                "video-placeholder",
                provided(instance, "url").map(|url| format!("Video: {url}")),
                show("url"),
            )))
            .child(Element::new("p").text(format!("Duration: {}", show("duration")))),
        ComponentKind::Quiz => body
            .child(Element::new("h4").text(show("title")))
            .child(Element::new("p").text(format!("Questions: {}", show("questions"))))
            .child(Element::new("p").text(format!("Time limit: {}", show("time limit")))),
        ComponentKind::Text => body
            .child(Element::new("h4").text(show("title")))
            .child(Element::new("p").text(show("content"))),
        ComponentKind::Code => body
            .child(Element::new("h4").text(format!("{} Playground", show("language"))))
            .child(Element::new("div").class("code-preview").child(Element::new("pre").text(show("starting code"))))
            .child(Element::new("p").text(show("instructions"))),
        ComponentKind::Diagram => body
            .child(Element::new("h4").text(show("title")))
            .child(Element::new("div").class("diagram-preview").child(placeholder(
                "diagram-placeholder",
                provided(instance, "image url").map(|url| format!("Diagram: {url}")),
                show("image url"),
            )))
            .child(Element::new("p").text(format!("Hotspots: {}", show("hotspots")))),
    };
    body.into()
}

fn placeholder(class: &'static str, present: Option<String>, fallback: &str) -> Element {
    Element::new("div")
        .class(class)
        .text(present.unwrap_or_else(|| fallback.to_owned()))
}

/// A placed component: header with icon, name and actions, then its body.
#[must_use]
pub fn render_component(
    instance: &ComponentInstance,
    descriptor: &ComponentTypeDescriptor,
    draggable: bool,
) -> ViewNode {
    let header = Element::new("div")
        .class("component-header")
        .child(Element::new("span").class("component-icon").text(descriptor.icon))
        .child(Element::new("span").class("component-title").text(descriptor.name))
        .child(
            Element::new("div")
                .class("component-actions")
                .child(Element::new("button").class("config-btn").text("⚙️"))
                .child(Element::new("button").class("delete-btn").text("❌")),
        );

    Element::new("div")
        .class("component")
        .attr("draggable", draggable.to_string())
        .attr("data-type", descriptor.tag())
        .attr("data-id", instance.id.clone())
        .child(header)
        .child(render_content(instance, descriptor))
        .into()
}

/// A drop target and every component in it, in order.
#[must_use]
pub fn render_container(container: &Container, registry: Registry, draggable: bool) -> ViewNode {
    container
        .items
        .iter()
        .fold(Element::new("div").class("container").attr("id", container.name.clone()), |el, item| {
            el.child(render_component(item, registry.describe_kind(item.kind), draggable))
        })
        .into()
}

/// Palette entries, one draggable element per component type.
#[must_use]
pub fn render_palette(registry: Registry) -> Vec<ViewNode> {
    registry
        .entries()
        .iter()
        .map(|entry| {
            Element::new("div")
                .class("draggable")
                .attr("draggable", "true")
                .attr("id", entry.tag())
                .text(format!("{} {}", entry.icon, entry.name))
                .into()
        })
        .collect()
}
