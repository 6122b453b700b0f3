//! Which elements may live where.
//!
//! Items are registered by name with a [`SchemaItem`] definition. Rules are
//! resolved on every query, so extending an item later (for example letting
//! `$block` into a table cell) is seen by everything that inherits from it.
//!
//! Three generic items are always present: `$root` (a limit), `$block`
//! (allowed in `$root`) and `$text` (allowed in `$block`).

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;

use crate::tree::{NodeId, Position, ROOT_NAME, Selection, TEXT_NAME, Tree};

pub const BLOCK_NAME: &str = "$block";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaItem {
    /// Parents this item may be a child of.
    pub allow_in: Vec<String>,
    /// Allowed wherever the named items are allowed.
    pub allow_where: Vec<String>,
    /// Accepts the same children as the named items.
    pub allow_content_of: Vec<String>,
    /// Copies every rule and flag of the named item.
    pub inherit_all_from: Option<String>,
    pub allow_attributes: Vec<String>,
    pub is_block: bool,
    pub is_inline: bool,
    /// Atomic, selectable as a whole. Objects are also limits.
    pub is_object: bool,
    /// Selections and most edits never cross the boundary of a limit.
    pub is_limit: bool,
}

impl SchemaItem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allow_in(mut self, parent: &str) -> Self {
        self.allow_in.push(parent.to_string());
        self
    }

    pub fn allow_where(mut self, item: &str) -> Self {
        self.allow_where.push(item.to_string());
        self
    }

    pub fn allow_content_of(mut self, item: &str) -> Self {
        self.allow_content_of.push(item.to_string());
        self
    }

    pub fn inherit_all_from(mut self, item: &str) -> Self {
        self.inherit_all_from = Some(item.to_string());
        self
    }

    pub fn allow_attributes(mut self, attributes: &[&str]) -> Self {
        self.allow_attributes
            .extend(attributes.iter().map(|a| a.to_string()));
        self
    }

    pub fn block(mut self) -> Self {
        self.is_block = true;
        self
    }

    pub fn inline(mut self) -> Self {
        self.is_inline = true;
        self
    }

    pub fn object(mut self) -> Self {
        self.is_object = true;
        self
    }

    pub fn limit(mut self) -> Self {
        self.is_limit = true;
        self
    }

    fn merge(&mut self, other: SchemaItem) {
        self.allow_in.extend(other.allow_in);
        self.allow_where.extend(other.allow_where);
        self.allow_content_of.extend(other.allow_content_of);
        if other.inherit_all_from.is_some() {
            self.inherit_all_from = other.inherit_all_from;
        }
        self.allow_attributes.extend(other.allow_attributes);
        self.is_block |= other.is_block;
        self.is_inline |= other.is_inline;
        self.is_object |= other.is_object;
        self.is_limit |= other.is_limit;
    }
}

/// Custom rule consulted before the declarative ones.
///
/// Receives the names of the would-be ancestors (outermost first, ending with
/// the parent) and the child name. `Some(false)` vetoes, `Some(true)` forces,
/// `None` defers to the registered rules.
pub type ChildCheck = Rc<dyn Fn(&[&str], &str) -> Option<bool>>;

#[derive(Clone)]
pub struct Schema {
    items: HashMap<String, SchemaItem>,
    child_checks: Vec<ChildCheck>,
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.items.keys().collect();
        names.sort();
        f.debug_struct("Schema")
            .field("items", &names)
            .field("child_checks", &self.child_checks.len())
            .finish()
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::new()
    }
}

impl Schema {
    pub fn new() -> Self {
        let mut schema = Self {
            items: HashMap::new(),
            child_checks: Vec::new(),
        };
        schema.register(ROOT_NAME, SchemaItem::new().limit());
        schema.register(BLOCK_NAME, SchemaItem::new().allow_in(ROOT_NAME).block());
        schema.register(TEXT_NAME, SchemaItem::new().allow_in(BLOCK_NAME).inline());
        schema
    }

    /// Add or replace an item.
    pub fn register(&mut self, name: &str, item: SchemaItem) {
        self.items.insert(name.to_string(), item);
    }

    /// Add rules to an item, registering it if needed.
    pub fn extend(&mut self, name: &str, item: SchemaItem) {
        self.items.entry(name.to_string()).or_default().merge(item);
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.items.contains_key(name)
    }

    pub fn add_child_check(&mut self, check: impl Fn(&[&str], &str) -> Option<bool> + 'static) {
        self.child_checks.push(Rc::new(check));
    }

    /// Items whose rules `name` takes on, starting with `name` itself.
    fn lineage(&self, name: &str) -> Vec<&str> {
        let mut lineage = Vec::new();
        let registered = |n: &str| self.items.get_key_value(n).map(|(k, _)| k.as_str());
        let mut current = registered(name);
        while let Some(item_name) = current {
            if lineage.contains(&item_name) {
                break;
            }
            lineage.push(item_name);
            current = self.items[item_name]
                .inherit_all_from
                .as_deref()
                .and_then(registered);
        }
        lineage
    }

    fn flag(&self, name: &str, get: impl Fn(&SchemaItem) -> bool) -> bool {
        self.lineage(name).iter().any(|n| get(&self.items[*n]))
    }

    pub fn is_block(&self, name: &str) -> bool {
        self.flag(name, |item| item.is_block)
    }

    pub fn is_inline(&self, name: &str) -> bool {
        self.flag(name, |item| item.is_inline)
    }

    pub fn is_object(&self, name: &str) -> bool {
        self.flag(name, |item| item.is_object)
    }

    pub fn is_limit(&self, name: &str) -> bool {
        self.flag(name, |item| item.is_limit || item.is_object)
    }

    /// Names `child` may be placed directly inside, before content sharing.
    fn allowed_parents(&self, child: &str) -> HashSet<String> {
        let mut parents = HashSet::new();
        let mut visited = HashSet::new();
        self.collect_parents(child, &mut parents, &mut visited);
        parents
    }

    fn collect_parents(&self, name: &str, parents: &mut HashSet<String>, visited: &mut HashSet<String>) {
        if !visited.insert(name.to_string()) {
            return;
        }
        let Some(item) = self.items.get(name) else {
            return;
        };
        parents.extend(item.allow_in.iter().cloned());
        for other in &item.allow_where {
            self.collect_parents(other, parents, visited);
        }
        if let Some(base) = &item.inherit_all_from {
            self.collect_parents(base, parents, visited);
        }
    }

    /// `parent` and every item whose content `parent` shares.
    fn content_sources(&self, parent: &str) -> HashSet<String> {
        let mut sources = HashSet::new();
        let mut pending = vec![parent.to_string()];
        while let Some(name) = pending.pop() {
            if !sources.insert(name.clone()) {
                continue;
            }
            if let Some(item) = self.items.get(&name) {
                pending.extend(item.allow_content_of.iter().cloned());
                pending.extend(item.inherit_all_from.iter().cloned());
            }
        }
        sources
    }

    /// Whether `child` may be placed inside the last element of `context`.
    ///
    /// `context` lists element names from the outermost ancestor down to the
    /// intended parent.
    pub fn check_child(&self, context: &[&str], child: &str) -> bool {
        let Some(&parent) = context.last() else {
            return false;
        };
        if !self.is_registered(parent) || !self.is_registered(child) {
            return false;
        }
        for check in &self.child_checks {
            if let Some(verdict) = check(context, child) {
                return verdict;
            }
        }
        let parents = self.allowed_parents(child);
        self.content_sources(parent)
            .iter()
            .any(|source| parents.contains(source))
    }

    /// [`Schema::check_child`] with the context taken from `parent`'s ancestry.
    pub fn check_child_in(&self, tree: &Tree, parent: NodeId, child: &str) -> bool {
        if !tree.is_element(parent) {
            return false;
        }
        let mut context: Vec<&str> = tree
            .ancestors_inclusive(parent)
            .map(|n| tree.schema_name(n))
            .collect();
        context.reverse();
        self.check_child(&context, child)
    }

    pub fn check_child_at(&self, tree: &Tree, position: Position, child: &str) -> bool {
        self.check_child_in(tree, position.parent, child)
    }

    pub fn check_attribute(&self, item: &str, attribute: &str) -> bool {
        self.lineage(item)
            .iter()
            .any(|n| self.items[*n].allow_attributes.iter().any(|a| a == attribute))
    }

    pub fn is_limit_node(&self, tree: &Tree, node: NodeId) -> bool {
        tree.name(node).is_some_and(|name| self.is_limit(name))
    }

    pub fn is_object_node(&self, tree: &Tree, node: NodeId) -> bool {
        tree.name(node).is_some_and(|name| self.is_object(name))
    }

    pub fn is_block_node(&self, tree: &Tree, node: NodeId) -> bool {
        tree.name(node).is_some_and(|name| self.is_block(name))
    }

    pub fn is_inline_node(&self, tree: &Tree, node: NodeId) -> bool {
        tree.name(node).is_some_and(|name| self.is_inline(name))
    }

    /// Nearest limit element containing `node`, inclusive. Falls back to the
    /// topmost ancestor.
    pub fn limit_of(&self, tree: &Tree, node: NodeId) -> NodeId {
        tree.ancestors_inclusive(node)
            .find(|&n| self.is_limit_node(tree, n) || tree.parent(n).is_none())
            .unwrap_or(node)
    }

    /// Nearest limit element containing every range of `selection`.
    pub fn limit_element(&self, tree: &Tree, selection: &Selection) -> Option<NodeId> {
        let mut common: Option<NodeId> = None;
        for range in selection.ranges() {
            for position in [range.start, range.end] {
                common = Some(match common {
                    None => position.parent,
                    Some(current) => tree.common_ancestor(current, position.parent)?,
                });
            }
        }
        common.map(|node| self.limit_of(tree, node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn editing_schema() -> Schema {
        let mut schema = Schema::new();
        schema.register("paragraph", SchemaItem::new().inherit_all_from(BLOCK_NAME));
        schema.register(
            "image",
            SchemaItem::new()
                .allow_where(BLOCK_NAME)
                .allow_attributes(&["alt", "src"])
                .block()
                .object(),
        );
        schema.register(
            "imageInline",
            SchemaItem::new()
                .allow_where(TEXT_NAME)
                .allow_attributes(&["alt", "src"])
                .inline()
                .object(),
        );
        schema.register(
            "caption",
            SchemaItem::new()
                .allow_in("image")
                .allow_content_of(BLOCK_NAME)
                .limit(),
        );
        schema
    }

    #[rstest]
    #[case(&["$root"], "paragraph", true)]
    #[case(&["$root", "paragraph"], "$text", true)]
    #[case(&["$root"], "$text", false)]
    #[case(&["$root"], "image", true)]
    #[case(&["$root", "paragraph"], "image", false)]
    #[case(&["$root", "paragraph"], "imageInline", true)]
    #[case(&["$root"], "imageInline", false)]
    #[case(&["$root", "image"], "caption", true)]
    #[case(&["$root", "image", "caption"], "$text", true)]
    #[case(&["$root", "image", "caption"], "imageInline", true)]
    #[case(&["$root", "image", "caption"], "image", false)]
    #[case(&["$root"], "unknown", false)]
    fn test_check_child_follows_registered_rules(
        #[case] context: &[&str],
        #[case] child: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(editing_schema().check_child(context, child), expected);
    }

    #[test]
    fn test_extending_a_base_item_reaches_inheritors() {
        let mut schema = editing_schema();
        schema.register("tableCell", SchemaItem::new().limit());

        assert!(!schema.check_child(&["$root", "tableCell"], "paragraph"));

        schema.extend(BLOCK_NAME, SchemaItem::new().allow_in("tableCell"));

        assert!(schema.check_child(&["$root", "tableCell"], "paragraph"));
    }

    #[test]
    fn test_child_check_can_veto() {
        let mut schema = editing_schema();
        schema.add_child_check(|context, child| {
            (child == "image" && context.last() == Some(&"$root")).then_some(false)
        });

        assert!(!schema.check_child(&["$root"], "image"));
        assert!(schema.check_child(&["$root"], "paragraph"));
    }

    #[test]
    fn test_flags_are_inherited_and_objects_are_limits() {
        let schema = editing_schema();

        assert!(schema.is_block("paragraph"));
        assert!(!schema.is_limit("paragraph"));
        assert!(schema.is_limit("image"));
        assert!(schema.is_limit("caption"));
        assert!(!schema.is_object("caption"));
        assert!(schema.is_inline("imageInline"));
    }

    #[test]
    fn test_attributes_follow_registration() {
        let mut schema = editing_schema();
        schema.extend("image", SchemaItem::new().allow_attributes(&["uploadId"]));

        assert!(schema.check_attribute("image", "uploadId"));
        assert!(schema.check_attribute("image", "src"));
        assert!(!schema.check_attribute("imageInline", "uploadId"));
    }
}
