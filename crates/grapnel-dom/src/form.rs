//! Form field helpers.
//!
//! A form is an ordinary element with [`NodeRole::Form`]. These views read
//! and write the `value` attribute of the `input` and `select` elements under
//! it; nothing here talks to the network.

use url::form_urlencoded;

use crate::matcher::{Matcher, TagMatcher};
use crate::{DomTree, Node, NodeId, NodeRole};

/// Accepts the tags that carry a submittable value.
struct FieldTags;

impl Matcher for FieldTags {
    fn validate(&self, node: &Node) -> bool {
        matches!(node.tag_name.as_str(), "input" | "select")
    }

    fn first_only(&self) -> bool {
        false
    }

    fn set_first_only(&mut self, _first_only: bool) {}
}

/// Read-only view of a `<form>` element.
#[derive(Debug, Clone, Copy)]
pub struct Form<'a> {
    tree: &'a DomTree,
    id: NodeId,
}

/// Mutable view of a `<form>` element.
#[derive(Debug)]
pub struct FormMut<'a> {
    tree: &'a mut DomTree,
    id: NodeId,
}

impl DomTree {
    /// View `id` as a form. `None` unless the node has the form role.
    #[must_use]
    pub fn form(&self, id: NodeId) -> Option<Form<'_>> {
        (self.role(id)? == NodeRole::Form).then_some(Form { tree: self, id })
    }

    /// View `id` as a mutable form. `None` unless the node has the form role.
    pub fn form_mut(&mut self, id: NodeId) -> Option<FormMut<'_>> {
        (self.role(id)? == NodeRole::Form).then_some(FormMut { tree: self, id })
    }
}

impl<'a> Form<'a> {
    /// The form element.
    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    /// The `name` attribute, or `""`.
    #[must_use]
    pub fn name(&self) -> &'a str {
        self.tree.attribute(self.id, "name").unwrap_or_default()
    }

    /// The `method` attribute, or `""`.
    #[must_use]
    pub fn method(&self) -> &'a str {
        self.tree.attribute(self.id, "method").unwrap_or_default()
    }

    /// The `action` attribute, or `""`.
    #[must_use]
    pub fn action(&self) -> &'a str {
        self.tree.attribute(self.id, "action").unwrap_or_default()
    }

    /// Every `input` under the form, breadth-first.
    #[must_use]
    pub fn inputs(&self) -> Vec<NodeId> {
        self.tree.search(self.id, &TagMatcher::literal("input"))
    }

    /// Every `select` under the form, breadth-first.
    #[must_use]
    pub fn selects(&self) -> Vec<NodeId> {
        self.tree.search(self.id, &TagMatcher::literal("select"))
    }

    /// Every `input` and `select` under the form, breadth-first.
    #[must_use]
    pub fn fields(&self) -> Vec<NodeId> {
        self.tree.search(self.id, &FieldTags)
    }

    /// First field whose `name` is exactly `name`.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<NodeId> {
        self.fields()
            .into_iter()
            .find(|&id| self.tree.attribute(id, "name") == Some(name))
    }

    /// Value of the field called `name`, or `""` if it has none or does not
    /// exist.
    #[must_use]
    pub fn get_field(&self, name: &str) -> &'a str {
        let tree = self.tree;
        self.field(name)
            .and_then(|id| tree.attribute(id, "value"))
            .unwrap_or_default()
    }

    /// Name/value pairs as they would be submitted: inputs first, then
    /// selects, skipping fields without a name. When a name repeats, the
    /// later value replaces the earlier one in its original position.
    #[must_use]
    pub fn payload(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = Vec::new();

        for id in self.inputs().into_iter().chain(self.selects()) {
            let name = self.tree.attribute(id, "name").unwrap_or_default();
            if name.is_empty() {
                continue;
            }
            let value = self.tree.attribute(id, "value").unwrap_or_default();
            match pairs.iter_mut().find(|(existing, _)| existing == name) {
                Some(slot) => value.clone_into(&mut slot.1),
                None => pairs.push((name.to_string(), value.to_string())),
            }
        }

        pairs
    }

    /// [`Form::payload`] encoded as `application/x-www-form-urlencoded`.
    #[must_use]
    pub fn encoded_payload(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.payload())
            .finish()
    }
}

impl FormMut<'_> {
    /// Read-only view of the same form.
    #[must_use]
    pub fn as_form(&self) -> Form<'_> {
        Form {
            tree: &*self.tree,
            id: self.id,
        }
    }

    /// Set the value of the first field called `name`. Returns false if no
    /// such field exists.
    pub fn set_field(&mut self, name: &str, value: &str) -> bool {
        let Some(field) = self.as_form().field(name) else {
            tracing::debug!(name, "no such form field");
            return false;
        };
        self.tree.set_attribute(field, "value", value);
        true
    }

    /// Empty the value of every field.
    pub fn clear_fields(&mut self) {
        let fields = self.as_form().fields();
        for field in fields {
            self.tree.set_attribute(field, "value", "");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn login_form() -> (DomTree, NodeId) {
        let mut tree = DomTree::new();
        let form = tree.create_element("form");
        tree.set_attribute(form, "name", "login");
        tree.set_attribute(form, "method", "post");
        tree.set_attribute(form, "action", "/session");

        let user = tree.create_element("input");
        tree.set_attribute(user, "name", "user");
        let select = tree.create_element("select");
        tree.set_attribute(select, "name", "lang");
        tree.set_attribute(select, "value", "en");
        tree.append_child(form, user);
        tree.append_child(form, select);
        (tree, form)
    }

    #[test]
    fn test_only_forms_have_a_form_view() {
        let (mut tree, form) = login_form();
        let div = tree.create_element("div");
        assert!(tree.form(form).is_some());
        assert!(tree.form(div).is_none());
        assert!(tree.form_mut(div).is_none());
    }

    #[test]
    fn test_form_attributes() {
        let (tree, form) = login_form();
        let view = tree.form(form).unwrap();
        assert_eq!(view.name(), "login");
        assert_eq!(view.method(), "post");
        assert_eq!(view.action(), "/session");
    }

    #[test]
    fn test_set_and_get_field() {
        let (mut tree, form) = login_form();
        {
            let mut view = tree.form_mut(form).unwrap();
            assert!(view.set_field("user", "ada"));
            assert!(!view.set_field("missing", "x"));
        }
        let view = tree.form(form).unwrap();
        assert_eq!(view.get_field("user"), "ada");
        assert_eq!(view.get_field("lang"), "en");
        assert_eq!(view.get_field("missing"), "");
    }

    #[test]
    fn test_clear_fields() {
        let (mut tree, form) = login_form();
        tree.form_mut(form).unwrap().clear_fields();
        let view = tree.form(form).unwrap();
        assert_eq!(view.get_field("lang"), "");
        assert_eq!(view.payload(), vec![
            ("user".to_string(), String::new()),
            ("lang".to_string(), String::new()),
        ]);
    }

    #[test]
    fn test_encoded_payload() {
        let (mut tree, form) = login_form();
        let _ = tree.form_mut(form).unwrap().set_field("user", "ada lovelace&co");
        let view = tree.form(form).unwrap();
        assert_eq!(view.encoded_payload(), "user=ada+lovelace%26co&lang=en");
    }
}
