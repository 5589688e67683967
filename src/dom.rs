pub type NodeId = usize;

#[derive(Debug, Clone, PartialEq)]
pub enum NodeType {
    Document,
    Doctype(DoctypeData),
    Element(ElementData),
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DoctypeData {
    pub name: String,
    pub public_id: String,
    pub system_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElementData {
    pub tag_name: String,
    pub attributes: Vec<(String, String)>,
}

impl ElementData {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
    pub node_type: NodeType,
}

/// An arena of nodes. Node `0` is always the document root.
#[derive(Debug, Clone)]
pub struct Document {
    pub nodes: Vec<Node>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                children: vec![],
                parent: None,
                node_type: NodeType::Document,
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        0
    }

    fn push(&mut self, node_type: NodeType, parent: Option<NodeId>) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node {
            children: vec![],
            parent,
            node_type,
        });
        if let Some(pid) = parent {
            self.nodes[pid].children.push(id);
        }
        id
    }

    pub fn create_element(
        &mut self,
        tag_name: &str,
        attrs: Vec<(String, String)>,
        parent: Option<NodeId>,
    ) -> NodeId {
        self.push(
            NodeType::Element(ElementData {
                tag_name: tag_name.to_ascii_lowercase(),
                attributes: attrs,
            }),
            parent,
        )
    }

    pub fn create_text(&mut self, text: &str, parent: Option<NodeId>) -> NodeId {
        self.push(NodeType::Text(text.to_string()), parent)
    }

    pub fn create_comment(&mut self, text: &str, parent: Option<NodeId>) -> NodeId {
        self.push(NodeType::Comment(text.to_string()), parent)
    }

    pub fn create_doctype(&mut self, doctype: DoctypeData, parent: Option<NodeId>) -> NodeId {
        self.push(NodeType::Doctype(doctype), parent)
    }

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        match self.nodes.get(id).map(|n| &n.node_type) {
            Some(NodeType::Element(el)) => Some(el),
            _ => None,
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        match self.nodes.get_mut(id).map(|n| &mut n.node_type) {
            Some(NodeType::Element(el)) => Some(el),
            _ => None,
        }
    }

    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|el| el.tag_name.as_str())
    }

    pub fn attributes(&self, id: NodeId) -> &[(String, String)] {
        self.element(id)
            .map(|el| el.attributes.as_slice())
            .unwrap_or(&[])
    }

    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).and_then(|el| el.attribute(name))
    }

    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.get_attribute(id, name).is_some()
    }

    /// Replaces the value in place when the attribute exists, otherwise appends it.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        if let Some(el) = self.element_mut(id) {
            match el
                .attributes
                .iter_mut()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
            {
                Some((_, v)) => *v = value.to_string(),
                None => el.attributes.push((name.to_string(), value.to_string())),
            }
        }
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> bool {
        match self.element_mut(id) {
            Some(el) => {
                let before = el.attributes.len();
                el.attributes.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
                before != el.attributes.len()
            }
            None => false,
        }
    }

    /// All descendants of `root` with the given tag, in document order.
    /// `root` itself is never included, and an unknown `root` has no descendants.
    pub fn elements_by_tag_name(&self, root: NodeId, tag_name: &str) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack: Vec<NodeId> = match self.nodes.get(root) {
            Some(node) => node.children.iter().rev().copied().collect(),
            None => return found,
        };
        while let Some(id) = stack.pop() {
            let node = match self.nodes.get(id) {
                Some(node) => node,
                None => continue,
            };
            if let NodeType::Element(el) = &node.node_type {
                if el.tag_name.eq_ignore_ascii_case(tag_name) {
                    found.push(id);
                }
            }
            stack.extend(node.children.iter().rev());
        }
        found
    }

    pub fn first_element_by_tag_name(&self, root: NodeId, tag_name: &str) -> Option<NodeId> {
        self.elements_by_tag_name(root, tag_name).into_iter().next()
    }
}
