//! Display tree for a single recipe
//!
//! [`recipe_card`] is a pure function of its input. The resulting [`Node`] can be written as
//! HTML for browsers or as plain text for terminals.

mod html;
mod text;

use serde::{Deserialize, Serialize};

use crate::{GenericConfig, Recipe};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewFormat {
    #[default]
    Text,
    Html,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub format: ViewFormat,
}

impl<'a> From<&'a GenericConfig> for ViewConfig {
    fn from(value: &'a GenericConfig) -> Self {
        value.get_or_default("view")
    }
}

impl ViewFormat {
    pub fn render(self, node: &Node) -> String {
        match self {
            ViewFormat::Text => node.to_text(),
            ViewFormat::Html => node.to_html(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Element {
    pub tag: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<&'static str>,
    /// Position of list items within their list
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<usize>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            class: None,
            key: None,
            children: Vec::new(),
        }
    }

    pub fn with_class(mut self, class: &'static str) -> Self {
        self.class = Some(class);
        self
    }

    pub fn with_key(mut self, key: usize) -> Self {
        self.key = Some(key);
        self
    }

    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }
}

impl From<Element> for Node {
    fn from(value: Element) -> Self {
        Node::Element(value)
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::Text(value)
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::Text(value.to_owned())
    }
}

impl Node {
    /// Concatenated text of this node and all of its descendants
    pub fn text_content(&self) -> String {
        let mut result = String::new();
        self.collect_text(&mut result);
        result
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text(text) => out.push_str(text),
            Node::Element(e) => e.children.iter().for_each(|c| c.collect_text(out)),
        }
    }
}

fn list(tag: &'static str, items: &[String]) -> Element {
    Element::new(tag).with_class("list").with_children(
        items
            .iter()
            .enumerate()
            .map(|(i, item)| Element::new("li").with_key(i).with_child(item.as_str()).into()),
    )
}

pub fn recipe_card(recipe: &Recipe) -> Node {
    Element::new("div")
        .with_class("RecipeCard")
        .with_child(
            Element::new("div")
                .with_class("title_container")
                .with_child(Element::new("h2").with_child(recipe.name.as_str()))
                .with_child(Element::new("p").with_child(format!("#{}", recipe.category))),
        )
        .with_child(Element::new("p").with_child(format!(
            "by {} {}",
            recipe.author_first, recipe.author_last
        )))
        .with_child(Element::new("h3").with_child("Ingredients"))
        .with_child(
            Element::new("div")
                .with_class("ingredients_container")
                .with_child(list("ul", &recipe.ingredients)),
        )
        .with_child(Element::new("h3").with_child("Instructions"))
        .with_child(
            Element::new("div")
                .with_class("instructions_container")
                .with_child(list("ol", &recipe.instructions)),
        )
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ApplicationState;

    fn soup() -> Recipe {
        Recipe {
            name: "Soup".into(),
            category: "dinner".into(),
            author_first: "Jane".into(),
            author_last: "Doe".into(),
            ingredients: vec!["water".into(), "salt".into()],
            instructions: vec!["boil".into()],
        }
    }

    fn child(node: &Node, index: usize) -> &Node {
        let Node::Element(e) = node else {
            panic!("Expected element, got {node:?}");
        };
        &e.children[index]
    }

    fn element(node: &Node) -> &Element {
        let Node::Element(e) = node else {
            panic!("Expected element, got {node:?}");
        };
        e
    }

    #[test]
    fn card_layout() {
        let card = recipe_card(&soup());
        let root = element(&card);
        assert_eq!(root.tag, "div");
        assert_eq!(root.class, Some("RecipeCard"));
        assert_eq!(
            root.children
                .iter()
                .map(|c| element(c).tag)
                .collect::<Vec<_>>(),
            ["div", "p", "h3", "div", "h3", "div"]
        );

        let title = child(&card, 0);
        assert_eq!(child(title, 0).text_content(), "Soup");
        assert_eq!(child(title, 1).text_content(), "#dinner");
        assert_eq!(child(&card, 1).text_content(), "by Jane Doe");
    }

    #[test]
    fn list_items_are_keyed_by_position() {
        let card = recipe_card(&soup());
        let ingredients = element(child(child(&card, 3), 0));
        assert_eq!(ingredients.tag, "ul");
        assert_eq!(ingredients.class, Some("list"));
        let keys = ingredients
            .children
            .iter()
            .map(|c| (element(c).key, c.text_content()))
            .collect::<Vec<_>>();
        assert_eq!(
            keys,
            [(Some(0), "water".to_string()), (Some(1), "salt".to_string())]
        );

        let instructions = element(child(child(&card, 5), 0));
        assert_eq!(instructions.tag, "ol");
        assert_eq!(instructions.children.len(), 1);
    }

    #[test]
    fn duplicate_items_are_kept() {
        let state = ApplicationState::initial();
        let card = recipe_card(&state.recipes[0]);
        assert_eq!(element(child(child(&card, 3), 0)).children.len(), 19);
        assert_eq!(element(child(child(&card, 5), 0)).children.len(), 18);
    }

    #[test]
    fn view_config_from_generic_config() {
        let generic = GenericConfig::mock(serde_json::json!({ "view": { "format": "html" } }));
        assert_eq!(ViewConfig::from(&generic).format, ViewFormat::Html);
        let generic = GenericConfig::mock(serde_json::json!({}));
        assert_eq!(ViewConfig::from(&generic).format, ViewFormat::Text);
    }

    #[test]
    fn format_selects_renderer() {
        let card = recipe_card(&soup());
        assert_eq!(ViewFormat::Html.render(&card), card.to_html());
        assert_eq!(ViewFormat::Text.render(&card), card.to_text());
    }

    #[test]
    fn rendering_is_pure() {
        let recipe = soup();
        assert_eq!(recipe_card(&recipe), recipe_card(&recipe));
        assert_eq!(recipe, soup());
    }
}
