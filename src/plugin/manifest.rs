//! XML plugin manifests.
//!
//! A manifest declares plugin classes, their base class and an optional
//! `<meta>` block that the loader interprets:
//!
//! ```xml
//! <library name="vizkit3d-base">
//!   <class name="vizkit3d::GridVisualization" base_class_name="vizkit3d::VizkitPluginBase">
//!     <description>Reference grid</description>
//!     <meta>
//!       <viz_type data_type="/base/GridData"/>
//!     </meta>
//!   </class>
//! </library>
//! ```
//!
//! A document whose root element is a single `<class>` is accepted as well.

use crate::core::{Error, Result};
use roxmltree::{Document, Node};

/// One well-formed `<class>` declaration.
#[derive(Clone, Debug)]
pub struct ClassEntry<'a, 'input: 'a> {
    /// Declared class name
    pub class_name: &'a str,
    /// Declared base class name
    pub base_class_name: &'a str,
    /// Trimmed `<description>` text, if any
    pub description: Option<&'a str>,
    /// The `<meta>` element, if any
    pub meta: Option<Node<'a, 'input>>,
}

/// A parsed manifest document.
pub struct Manifest<'input> {
    source_name: String,
    doc: Document<'input>,
}

impl<'input> Manifest<'input> {
    /// Parse manifest text. `source_name` is only used in diagnostics.
    pub fn parse(source_name: &str, text: &'input str) -> Result<Self> {
        let doc = Document::parse(text).map_err(|e| Error::manifest(source_name, e))?;
        let root = doc.root_element();
        if !root.has_tag_name("library") && !root.has_tag_name("class") {
            return Err(Error::manifest(
                source_name,
                format!("unexpected root element <{}>", root.tag_name().name()),
            ));
        }
        Ok(Self {
            source_name: source_name.to_string(),
            doc,
        })
    }

    /// Well-formed class declarations, in document order.
    ///
    /// Declarations missing a name or base class are logged and left out.
    pub fn classes(&self) -> Vec<ClassEntry<'_, 'input>> {
        let root = self.doc.root_element();
        let class_nodes: Vec<Node<'_, 'input>> = if root.has_tag_name("class") {
            vec![root]
        } else {
            root.children()
                .filter(|n| n.is_element() && n.has_tag_name("class"))
                .collect()
        };

        class_nodes
            .into_iter()
            .filter_map(|node| self.class_entry(node))
            .collect()
    }

    fn class_entry<'a>(&self, node: Node<'a, 'input>) -> Option<ClassEntry<'a, 'input>> {
        let class_name = non_empty_attribute(node, "name");
        let base_class_name = non_empty_attribute(node, "base_class_name");

        let (Some(class_name), Some(base_class_name)) = (class_name, base_class_name) else {
            tracing::warn!(
                source = %self.source_name,
                line = self.doc.text_pos_at(node.range().start).row,
                "class declaration without name or base_class_name, skipping"
            );
            return None;
        };

        Some(ClassEntry {
            class_name,
            base_class_name,
            description: child_element(node, "description")
                .and_then(|d| d.text())
                .map(str::trim)
                .filter(|d| !d.is_empty()),
            meta: child_element(node, "meta"),
        })
    }
}

/// First child element named `name`.
pub fn child_element<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|n| n.is_element() && n.has_tag_name(name))
}

/// Attribute value as written; `None` when missing or empty.
pub fn non_empty_attribute<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.attribute(name).filter(|value| !value.is_empty())
}
