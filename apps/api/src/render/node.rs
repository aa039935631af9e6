use std::fmt::Write;

/// A node of the visual tree produced by the templates.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: &'static str,
    pub attrs: Vec<(&'static str, String)>,
    pub children: Vec<Node>,
}

const VOID_TAGS: &[&str] = &["img", "br", "hr", "meta", "link"];

pub fn el(tag: &'static str) -> Element {
    Element {
        tag,
        attrs: Vec::new(),
        children: Vec::new(),
    }
}

pub fn text(value: impl Into<String>) -> Node {
    Node::Text(value.into())
}

impl Element {
    /// Appends to the `class` attribute.
    pub fn class(mut self, class: &str) -> Self {
        match self.attrs.iter_mut().find(|(name, _)| *name == "class") {
            Some((_, existing)) => {
                existing.push(' ');
                existing.push_str(class);
            }
            None => self.attrs.push(("class", class.to_string())),
        }
        self
    }

    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, value.into()));
        self
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    /// Appends the child only when present.
    pub fn maybe(self, node: Option<impl Into<Node>>) -> Self {
        match node {
            Some(node) => self.child(node),
            None => self,
        }
    }

    pub fn children<I, N>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.children.extend(nodes.into_iter().map(Into::into));
        self
    }

    pub fn text(self, value: impl Into<String>) -> Self {
        self.child(text(value))
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl Node {
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Node::Text(value) => out.push_str(&escape(value)),
            Node::Element(element) => {
                out.push('<');
                out.push_str(element.tag);
                for (name, value) in &element.attrs {
                    let _ = write!(out, " {name}=\"{}\"", escape(value));
                }
                out.push('>');
                if VOID_TAGS.contains(&element.tag) {
                    return;
                }
                for child in &element.children {
                    child.write_html(out);
                }
                let _ = write!(out, "</{}>", element.tag);
            }
        }
    }

    /// Concatenated text content, for assertions and accessibility labels.
    pub fn text_content(&self) -> String {
        match self {
            Node::Text(value) => value.clone(),
            Node::Element(element) => element
                .children
                .iter()
                .map(Node::text_content)
                .collect::<Vec<_>>()
                .join(""),
        }
    }

    /// Depth-first search for the first element satisfying `pred`.
    pub fn find(&self, pred: &dyn Fn(&Element) -> bool) -> Option<&Element> {
        match self {
            Node::Text(_) => None,
            Node::Element(element) => {
                if pred(element) {
                    return Some(element);
                }
                element.children.iter().find_map(|c| c.find(pred))
            }
        }
    }
}

pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renders_nested_markup() {
        let node: Node = el("p")
            .class("a")
            .class("b")
            .child(el("strong").text("Hi"))
            .text(" there")
            .into();
        assert_eq!(
            node.to_html(),
            r#"<p class="a b"><strong>Hi</strong> there</p>"#
        );
        assert_eq!(node.text_content(), "Hi there");
    }

    #[test]
    fn test_escapes_text_and_attributes() {
        let node: Node = el("a")
            .attr("href", "https://x.dev/?a=1&b=\"2\"")
            .text("<script>")
            .into();
        assert_eq!(
            node.to_html(),
            r#"<a href="https://x.dev/?a=1&amp;b=&quot;2&quot;">&lt;script&gt;</a>"#
        );
    }

    #[test]
    fn test_void_elements_have_no_closing_tag() {
        let node: Node = el("img").attr("src", "data:image/png;base64,AA").into();
        assert_eq!(node.to_html(), r#"<img src="data:image/png;base64,AA">"#);
    }
}
