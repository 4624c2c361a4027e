//! The nested structure a generative model returns.
//!
//! This is the untrusted shape crossing the model boundary. The generator
//! adapter deserializes and validates it once; downstream code can then rely
//! on the structural guarantees without re-checking.
//!
//! Wire names are camelCase to match the model's response contract.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// A complete generated story: title plus the root of the node tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryBlueprint {
    /// Story title.
    pub title: String,
    /// Root of the nested node structure.
    #[serde(rename = "rootNode")]
    pub root_node: NodeBlueprint,
}

/// One node of the generated tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeBlueprint {
    /// Narrative text for this node.
    pub content: String,
    /// Whether this node ends the story.
    #[serde(rename = "isEnding")]
    pub is_ending: bool,
    /// Whether this ending is a successful outcome. Recorded as-is; only
    /// meaningful when `is_ending` is set.
    #[serde(rename = "isWinningEnding")]
    pub is_winning_ending: bool,
    /// Reader choices, in display order.
    #[serde(default)]
    pub options: Vec<OptionBlueprint>,
}

/// One reader choice and the subtree it leads to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionBlueprint {
    /// Choice text.
    pub text: String,
    /// The node this choice leads to.
    #[serde(rename = "nextNode")]
    pub next_node: Box<NodeBlueprint>,
}

impl StoryBlueprint {
    /// Validates the option/ending structure of every node.
    ///
    /// Ending nodes must carry no options; non-ending nodes must carry at
    /// least one. The structure is acyclic by construction (it is a literal
    /// nested value), so this walk is the only shape check needed.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Validation` naming the first offending node.
    pub fn validate(&self) -> Result<(), EngineError> {
        validate_node(&self.root_node)
    }
}

fn validate_node(node: &NodeBlueprint) -> Result<(), EngineError> {
    if node.is_ending && !node.options.is_empty() {
        return Err(EngineError::Validation(format!(
            "ending node {:?} has {} options, expected none",
            truncate(&node.content),
            node.options.len()
        )));
    }
    if !node.is_ending && node.options.is_empty() {
        return Err(EngineError::Validation(format!(
            "non-ending node {:?} has no options",
            truncate(&node.content)
        )));
    }
    for option in &node.options {
        validate_node(&option.next_node)?;
    }
    Ok(())
}

/// Shortens node content for error messages.
fn truncate(content: &str) -> String {
    const MAX: usize = 40;
    if content.chars().count() <= MAX {
        content.to_owned()
    } else {
        let head: String = content.chars().take(MAX).collect();
        format!("{head}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ending(content: &str) -> NodeBlueprint {
        NodeBlueprint {
            content: content.into(),
            is_ending: true,
            is_winning_ending: false,
            options: vec![],
        }
    }

    fn branch(content: &str, options: Vec<OptionBlueprint>) -> NodeBlueprint {
        NodeBlueprint {
            content: content.into(),
            is_ending: false,
            is_winning_ending: false,
            options,
        }
    }

    fn option(text: &str, next: NodeBlueprint) -> OptionBlueprint {
        OptionBlueprint {
            text: text.into(),
            next_node: Box::new(next),
        }
    }

    #[test]
    fn test_valid_tree_passes() {
        let blueprint = StoryBlueprint {
            title: "The Lighthouse".into(),
            root_node: branch(
                "You arrive at the shore.",
                vec![
                    option("Climb the stairs", ending("You reach the lamp.")),
                    option("Turn back", ending("You go home.")),
                ],
            ),
        };

        assert!(blueprint.validate().is_ok());
    }

    #[test]
    fn test_non_ending_without_options_is_rejected() {
        let blueprint = StoryBlueprint {
            title: "Broken".into(),
            root_node: NodeBlueprint {
                content: "Dead air.".into(),
                is_ending: false,
                is_winning_ending: false,
                options: vec![],
            },
        };

        let err = blueprint.validate().unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
        assert!(err.to_string().contains("no options"));
    }

    #[test]
    fn test_ending_with_options_is_rejected() {
        let blueprint = StoryBlueprint {
            title: "Broken".into(),
            root_node: NodeBlueprint {
                content: "The end?".into(),
                is_ending: true,
                is_winning_ending: true,
                options: vec![option("Keep going", ending("More."))],
            },
        };

        let err = blueprint.validate().unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }

    #[test]
    fn test_violation_deep_in_tree_is_caught() {
        let blueprint = StoryBlueprint {
            title: "Deep".into(),
            root_node: branch(
                "Start.",
                vec![option(
                    "Descend",
                    branch(
                        "Lower.",
                        vec![option(
                            "Further",
                            NodeBlueprint {
                                content: "Stuck.".into(),
                                is_ending: false,
                                is_winning_ending: false,
                                options: vec![],
                            },
                        )],
                    ),
                )],
            ),
        };

        assert!(blueprint.validate().is_err());
    }

    #[test]
    fn test_deserializes_camel_case_wire_names() {
        let json = serde_json::json!({
            "title": "The Lighthouse",
            "rootNode": {
                "content": "You arrive.",
                "isEnding": false,
                "isWinningEnding": false,
                "options": [
                    {
                        "text": "Enter",
                        "nextNode": {
                            "content": "Done.",
                            "isEnding": true,
                            "isWinningEnding": true
                        }
                    }
                ]
            }
        });

        let blueprint: StoryBlueprint = serde_json::from_value(json).unwrap();
        assert_eq!(blueprint.title, "The Lighthouse");
        assert_eq!(blueprint.root_node.options.len(), 1);
        // `options` defaults to empty when the model omits it on endings.
        let leaf = &blueprint.root_node.options[0].next_node;
        assert!(leaf.is_ending);
        assert!(leaf.is_winning_ending);
        assert!(leaf.options.is_empty());
    }

    #[test]
    fn test_missing_required_field_fails_deserialization() {
        let json = serde_json::json!({
            "title": "No root here"
        });

        assert!(serde_json::from_value::<StoryBlueprint>(json).is_err());
    }
}
