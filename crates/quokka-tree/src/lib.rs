//! Document tree for the quokka markup toolkit.
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for all
//! relationships, providing O(1) access and traversal without borrow
//! checker issues. A [`Document`] owns every node it ever allocates; the
//! parent back-reference of a node is an arena index, never a second
//! owner, so parent pointers cannot create cycles of ownership or
//! double releases.
//!
//! Every node has exactly one owner at a time: its parent element, or
//! the document itself for the root. Operations that move a node
//! (replace-by-name, detach, append under a different parent) transfer
//! ownership and update the back-reference in one step. "Releasing" a
//! node unlinks it from the reachable tree; its slot is reclaimed when
//! the document drops.
//!
//! Element names and attribute names are validated against the Name
//! grammar at assignment time and are fixed for the life of the node.
//! Attribute names are unique within their element; element child names
//! are not — duplicate-named children are addressed first-match by
//! [`Document::child_by_name`] and in bulk by
//! [`Document::children_by_name`].

use thiserror::Error;

mod convert;
mod serialize;

pub use convert::{DateTime, Guid, to_bool, to_char, to_currency, to_datetime, to_float, to_guid, to_int};

/// Maximum accepted length of an element or attribute name, in characters.
pub const MAX_NAME_LEN: usize = 1024;

/// A type-safe index into the document tree.
///
/// `NodeId` provides O(1) access to any node in the owning [`Document`].
/// Ids are only meaningful for the document that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The root element is always at index 0.
    pub const ROOT: NodeId = NodeId(0);
}

/// A name failed the Name grammar.
///
/// A name must start with a letter or `_`, may contain only letters,
/// digits, `-`, `_`, `.`, `#` and `:`, and may not exceed
/// [`MAX_NAME_LEN`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    /// The empty string is not a name.
    #[error("name is empty")]
    Empty,
    /// The name exceeds [`MAX_NAME_LEN`] characters.
    #[error("name `{0}` is longer than {MAX_NAME_LEN} characters")]
    TooLong(String),
    /// The first character must be a letter or `_`.
    #[error("name `{name}` may not start with `{ch}`")]
    BadFirstCharacter {
        /// The rejected name.
        name: String,
        /// The offending first character.
        ch: char,
    },
    /// A character past the first is outside the Name grammar.
    #[error("name `{name}` contains illegal character `{ch}`")]
    IllegalCharacter {
        /// The rejected name.
        name: String,
        /// The offending character.
        ch: char,
    },
}

/// A tree operation failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// A name failed validation.
    #[error(transparent)]
    Name(#[from] NameError),
    /// `append_attribute` was handed a name already present on the
    /// element. Use `upsert_attribute` to update in place.
    #[error("attribute `{0}` is already present on this element")]
    DuplicateAttribute(String),
    /// An indexed accessor was handed an out-of-range index.
    #[error("{kind} index {index} is out of range for length {len}")]
    OutOfRange {
        /// Which list was indexed (`"children"` or `"attributes"`).
        kind: &'static str,
        /// The requested index.
        index: usize,
        /// The list length at the time of the call.
        len: usize,
    },
}

/// Validate `name` against the Name grammar.
///
/// # Errors
///
/// Returns the specific [`NameError`] describing the first violation.
pub fn validate_name(name: &str) -> Result<(), NameError> {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return Err(NameError::Empty);
    };
    if !(first.is_alphabetic() || first == '_') {
        return Err(NameError::BadFirstCharacter {
            name: name.to_string(),
            ch: first,
        });
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(NameError::TooLong(name.to_string()));
    }
    for ch in chars {
        if !(ch.is_alphanumeric() || matches!(ch, '-' | '_' | '.' | '#' | ':')) {
            return Err(NameError::IllegalCharacter {
                name: name.to_string(),
                ch,
            });
        }
    }
    Ok(())
}

/// A named attribute on an element.
///
/// The name is set exactly once, at construction, and validated there;
/// the value may change freely and is stored already reference-decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub(crate) name: String,
    pub(crate) value: String,
}

impl Attribute {
    /// Create an attribute with a validated name.
    ///
    /// # Errors
    ///
    /// Returns a [`NameError`] if `name` fails the Name grammar.
    pub fn new(name: &str, value: impl Into<String>) -> Result<Self, NameError> {
        validate_name(name)?;
        Ok(Self {
            name: name.to_string(),
            value: value.into(),
        })
    }

    /// The attribute's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The attribute's decoded value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Replace the attribute's value.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }
}

/// An element node in the arena.
///
/// Relationships are stored as indices: `parent` is the current owner
/// (or `None` for a root or a detached node), `children` is the ordered
/// list of owned child ids.
#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) name: String,
    pub(crate) value: String,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) attributes: Vec<Attribute>,
}

/// Arena-owned document tree with O(1) node access.
///
/// All nodes live in a contiguous vector, indexed by [`NodeId`]; the root
/// element is always [`NodeId::ROOT`]. Mutation requires `&mut self`, so
/// a document cannot be modified from two threads without external
/// synchronization — single-owner semantics fall out of the borrow rules.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Document {
    /// Create a document whose root element has the given name.
    ///
    /// # Errors
    ///
    /// Returns a [`NameError`] if `name` fails the Name grammar.
    pub fn with_root(name: &str) -> Result<Self, NameError> {
        validate_name(name)?;
        Ok(Self {
            nodes: vec![Node {
                name: name.to_string(),
                value: String::new(),
                parent: None,
                children: Vec::new(),
                attributes: Vec::new(),
            }],
        })
    }

    /// The root element's id.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Number of nodes ever allocated in this document, including
    /// detached ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if the document holds no nodes (never the case for a
    /// constructed document, which always has its root).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a new detached element.
    ///
    /// The node is not attached to the tree until appended; its name is
    /// fixed from here on.
    ///
    /// # Errors
    ///
    /// Returns a [`NameError`] if `name` fails the Name grammar.
    pub fn alloc(&mut self, name: &str, value: impl Into<String>) -> Result<NodeId, NameError> {
        validate_name(name)?;
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            name: name.to_string(),
            value: value.into(),
            parent: None,
            children: Vec::new(),
            attributes: Vec::new(),
        });
        Ok(id)
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// The element's name.
    #[must_use]
    pub fn name(&self, id: NodeId) -> &str {
        &self.node(id).name
    }

    /// The element's decoded text value.
    #[must_use]
    pub fn value(&self, id: NodeId) -> &str {
        &self.node(id).value
    }

    /// Replace the element's text value.
    pub fn set_value(&mut self, id: NodeId, value: impl Into<String>) {
        self.node_mut(id).value = value.into();
    }

    /// Append a segment to the element's text value.
    pub fn append_value(&mut self, id: NodeId, segment: &str) {
        self.node_mut(id).value.push_str(segment);
    }

    /// The element's current owner, `None` for a root or detached node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// The element's children, in insertion order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// The element's attributes, in insertion order.
    #[must_use]
    pub fn attributes(&self, id: NodeId) -> &[Attribute] {
        &self.node(id).attributes
    }

    /// Iterate the element's ancestors, from parent to root.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> AncestorIterator<'_> {
        AncestorIterator {
            document: self,
            current: self.parent(id),
        }
    }

    // ------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------

    /// First child with the given name, if any.
    #[must_use]
    pub fn child_by_name(&self, id: NodeId, name: &str) -> Option<NodeId> {
        self.node(id)
            .children
            .iter()
            .copied()
            .find(|&child| self.node(child).name == name)
    }

    /// All children with the given name, in order. Duplicate-named
    /// children are permitted; this is how the ones past the first are
    /// addressed.
    pub fn children_by_name<'a>(
        &'a self,
        id: NodeId,
        name: &'a str,
    ) -> impl Iterator<Item = NodeId> + 'a {
        self.node(id)
            .children
            .iter()
            .copied()
            .filter(move |&child| self.node(child).name == name)
    }

    /// First descendant with the given name, depth-first.
    #[must_use]
    pub fn descendant_by_name(&self, id: NodeId, name: &str) -> Option<NodeId> {
        for &child in &self.node(id).children {
            if self.node(child).name == name {
                return Some(child);
            }
            if let Some(found) = self.descendant_by_name(child, name) {
                return Some(found);
            }
        }
        None
    }

    /// Value of the named attribute, if present.
    #[must_use]
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.node(id)
            .attributes
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }

    /// True if `descendant` sits somewhere below `ancestor`.
    #[must_use]
    pub fn is_descendant_of(&self, descendant: NodeId, ancestor: NodeId) -> bool {
        self.ancestors(descendant).any(|id| id == ancestor)
    }

    // ------------------------------------------------------------------
    // Child mutation
    // ------------------------------------------------------------------

    /// First child with the given name, appending a new empty one if
    /// absent. Returns the child either way, for fluent chaining.
    ///
    /// # Errors
    ///
    /// Returns a [`NameError`] if `name` fails the Name grammar.
    pub fn get_or_create_child(&mut self, id: NodeId, name: &str) -> Result<NodeId, NameError> {
        if let Some(existing) = self.child_by_name(id, name) {
            return Ok(existing);
        }
        let child = self.alloc(name, "")?;
        Ok(self.append_child(id, child))
    }

    /// Like [`Self::get_or_create_child`], but a newly created child
    /// starts with the given value. An existing child keeps its value.
    ///
    /// # Errors
    ///
    /// Returns a [`NameError`] if `name` fails the Name grammar.
    pub fn get_or_create_child_with(
        &mut self,
        id: NodeId,
        name: &str,
        value: &str,
    ) -> Result<NodeId, NameError> {
        if let Some(existing) = self.child_by_name(id, name) {
            return Ok(existing);
        }
        let child = self.alloc(name, value)?;
        Ok(self.append_child(id, child))
    }

    /// Update the first child with this name in place (position
    /// preserved), or append a new one.
    ///
    /// # Errors
    ///
    /// Returns a [`NameError`] if `name` fails the Name grammar.
    pub fn upsert_child(&mut self, id: NodeId, name: &str, value: &str) -> Result<NodeId, NameError> {
        if let Some(existing) = self.child_by_name(id, name) {
            self.set_value(existing, value);
            return Ok(existing);
        }
        let child = self.alloc(name, value)?;
        Ok(self.append_child(id, child))
    }

    /// Insert `child` under `parent`, replacing the first same-named
    /// child at its position if one exists (the old node is released),
    /// appending otherwise.
    pub fn upsert_child_node(&mut self, parent: NodeId, child: NodeId) -> NodeId {
        self.detach(child);
        let name = self.node(child).name.clone();
        let position = self
            .node(parent)
            .children
            .iter()
            .copied()
            .position(|existing| self.node(existing).name == name);
        match position {
            Some(index) => {
                let old = self.node(parent).children[index];
                self.node_mut(old).parent = None;
                self.node_mut(parent).children[index] = child;
                self.node_mut(child).parent = Some(parent);
                child
            }
            None => self.append_child(parent, child),
        }
    }

    /// Append `child` as the last child of `parent`, detaching it from
    /// any previous owner first. Ownership transfer and back-reference
    /// update happen as one step.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> NodeId {
        self.detach(child);
        self.node_mut(parent).children.push(child);
        self.node_mut(child).parent = Some(parent);
        child
    }

    /// Detach and release the first child with the given name. No-op if
    /// absent; returns whether a child was removed.
    pub fn remove_child_by_name(&mut self, id: NodeId, name: &str) -> bool {
        match self.child_by_name(id, name) {
            Some(child) => {
                self.detach(child);
                true
            }
            None => false,
        }
    }

    /// Unlink a node from its parent, if it has one. The node keeps its
    /// own subtree and can be re-appended elsewhere.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.node(id).parent {
            self.node_mut(parent).children.retain(|&child| child != id);
            self.node_mut(id).parent = None;
        }
    }

    /// Release all children, in order.
    pub fn clear_children(&mut self, id: NodeId) {
        let children = std::mem::take(&mut self.node_mut(id).children);
        for child in children {
            self.node_mut(child).parent = None;
        }
    }

    /// The child at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::OutOfRange`] if `index` is past the end.
    pub fn child_at(&self, id: NodeId, index: usize) -> Result<NodeId, TreeError> {
        let children = &self.node(id).children;
        children
            .get(index)
            .copied()
            .ok_or(TreeError::OutOfRange {
                kind: "children",
                index,
                len: children.len(),
            })
    }

    // ------------------------------------------------------------------
    // Attribute mutation
    // ------------------------------------------------------------------

    /// First attribute with the given name, appending a new empty one if
    /// absent.
    ///
    /// # Errors
    ///
    /// Returns a [`NameError`] if `name` fails the Name grammar.
    pub fn get_or_create_attribute(
        &mut self,
        id: NodeId,
        name: &str,
    ) -> Result<&mut Attribute, NameError> {
        validate_name(name)?;
        let node = self.node_mut(id);
        let index = match node.attributes.iter().position(|attr| attr.name == name) {
            Some(existing) => existing,
            None => {
                node.attributes.push(Attribute {
                    name: name.to_string(),
                    value: String::new(),
                });
                node.attributes.len() - 1
            }
        };
        Ok(&mut node.attributes[index])
    }

    /// Update the named attribute's value in place (position preserved),
    /// or append a new attribute. Never fails for a duplicate name.
    ///
    /// # Errors
    ///
    /// Returns a [`NameError`] if `name` fails the Name grammar.
    pub fn upsert_attribute(
        &mut self,
        id: NodeId,
        name: &str,
        value: impl Into<String>,
    ) -> Result<(), NameError> {
        self.get_or_create_attribute(id, name)?.value = value.into();
        Ok(())
    }

    /// Replace the same-named attribute at its position (old one
    /// released), or append.
    pub fn upsert_attribute_node(&mut self, id: NodeId, attribute: Attribute) {
        let node = self.node_mut(id);
        match node
            .attributes
            .iter()
            .position(|existing| existing.name == attribute.name)
        {
            Some(index) => node.attributes[index] = attribute,
            None => node.attributes.push(attribute),
        }
    }

    /// Append an attribute. Attribute identity is name-unique by
    /// construction, unlike elements, so a duplicate name is an error.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::DuplicateAttribute`] if the name is already
    /// present on this element.
    pub fn append_attribute(&mut self, id: NodeId, attribute: Attribute) -> Result<(), TreeError> {
        let node = self.node_mut(id);
        if node
            .attributes
            .iter()
            .any(|existing| existing.name == attribute.name)
        {
            return Err(TreeError::DuplicateAttribute(attribute.name));
        }
        node.attributes.push(attribute);
        Ok(())
    }

    /// Remove the named attribute. No-op if absent; returns whether an
    /// attribute was removed.
    pub fn remove_attribute_by_name(&mut self, id: NodeId, name: &str) -> bool {
        let node = self.node_mut(id);
        match node.attributes.iter().position(|attr| attr.name == name) {
            Some(index) => {
                let _ = node.attributes.remove(index);
                true
            }
            None => false,
        }
    }

    /// Release all attributes, in order.
    pub fn clear_attributes(&mut self, id: NodeId) {
        self.node_mut(id).attributes.clear();
    }

    /// The attribute at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::OutOfRange`] if `index` is past the end.
    pub fn attribute_at(&self, id: NodeId, index: usize) -> Result<&Attribute, TreeError> {
        let attributes = &self.node(id).attributes;
        let len = attributes.len();
        attributes.get(index).ok_or(TreeError::OutOfRange {
            kind: "attributes",
            index,
            len,
        })
    }

    // ------------------------------------------------------------------
    // Typed value accessors
    // ------------------------------------------------------------------

    /// The element's value as an integer; `0` when it does not parse.
    #[must_use]
    pub fn int_value(&self, id: NodeId) -> i64 {
        convert::to_int(self.value(id))
    }

    /// The element's value as a boolean; `false` when unrecognized.
    #[must_use]
    pub fn bool_value(&self, id: NodeId) -> bool {
        convert::to_bool(self.value(id))
    }

    /// The element's value as a float; `0.0` when it does not parse.
    #[must_use]
    pub fn float_value(&self, id: NodeId) -> f64 {
        convert::to_float(self.value(id))
    }

    /// The element's value as an ISO-8601 date-time; all-zero when it
    /// does not parse.
    #[must_use]
    pub fn datetime_value(&self, id: NodeId) -> DateTime {
        convert::to_datetime(self.value(id))
    }

    /// The element's value as a GUID; the nil GUID when it does not
    /// parse.
    #[must_use]
    pub fn guid_value(&self, id: NodeId) -> Guid {
        convert::to_guid(self.value(id))
    }

    /// The element's value as a currency amount; `0.0` when nothing
    /// numeric is present.
    #[must_use]
    pub fn currency_value(&self, id: NodeId) -> f64 {
        convert::to_currency(self.value(id))
    }

    /// The element's first value character; `'\0'` when the value is
    /// empty.
    #[must_use]
    pub fn char_value(&self, id: NodeId) -> char {
        convert::to_char(self.value(id))
    }
}

/// Iterator over ancestors of a node.
pub struct AncestorIterator<'a> {
    document: &'a Document,
    current: Option<NodeId>,
}

impl Iterator for AncestorIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.document.parent(id);
        Some(id)
    }
}
