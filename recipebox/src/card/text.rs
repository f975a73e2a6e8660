use super::{Element, Node};

impl Node {
    /// Plain text for terminals. Headings and paragraphs get a line each,
    /// unordered list items are bulleted and ordered ones numbered from 1.
    pub fn to_text(&self) -> String {
        let mut lines = Vec::new();
        self.write_lines(&mut lines);
        lines.join("\n")
    }

    fn write_lines(&self, lines: &mut Vec<String>) {
        match self {
            Node::Text(text) => lines.push(text.clone()),
            Node::Element(e) => e.write_lines(lines),
        }
    }
}

impl Element {
    fn write_lines(&self, lines: &mut Vec<String>) {
        match self.tag {
            "ul" => lines.extend(
                self.children
                    .iter()
                    .map(|item| format!("- {}", item.text_content())),
            ),
            "ol" => lines.extend(
                self.children
                    .iter()
                    .enumerate()
                    .map(|(i, item)| format!("{}. {}", i + 1, item.text_content())),
            ),
            "div" => self.children.iter().for_each(|c| c.write_lines(lines)),
            _ => {
                let mut line = String::new();
                for child in self.children.iter() {
                    line.push_str(&child.text_content());
                }
                lines.push(line);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{recipe_card, ApplicationState};

    #[test]
    fn render_seeded_recipe() {
        let state = ApplicationState::initial();
        assert_eq!(
            recipe_card(&state.recipes[1]).to_text(),
            "Wat\n#brunch\nby me meson\nIngredients\n- thing\nInstructions\n1. do the thing"
        );
    }

    #[test]
    fn number_instructions() {
        let state = ApplicationState::initial();
        let text = recipe_card(&state.recipes[0]).to_text();
        assert!(text.ends_with("17. do the thing\n18. do the thing"));
        assert_eq!(text.lines().filter(|l| *l == "- thing").count(), 19);
    }
}
