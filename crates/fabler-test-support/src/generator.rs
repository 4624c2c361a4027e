//! Test generators — canned and always-failing `StoryGenerator`
//! implementations, plus blueprint fixtures shared across test suites.

use async_trait::async_trait;
use fabler_core::blueprint::{NodeBlueprint, OptionBlueprint, StoryBlueprint};
use fabler_core::error::EngineError;
use fabler_core::generator::StoryGenerator;

/// A generator that returns a clone of the configured blueprint for every
/// theme.
#[derive(Debug)]
pub struct StubGenerator(pub StoryBlueprint);

#[async_trait]
impl StoryGenerator for StubGenerator {
    async fn generate(&self, _theme: &str) -> Result<StoryBlueprint, EngineError> {
        Ok(self.0.clone())
    }
}

/// A generator that always fails with the configured error message as a
/// `GenerationFailed`.
#[derive(Debug)]
pub struct FailingGenerator(pub String);

#[async_trait]
impl StoryGenerator for FailingGenerator {
    async fn generate(&self, _theme: &str) -> Result<StoryBlueprint, EngineError> {
        Err(EngineError::GenerationFailed(self.0.clone()))
    }
}

/// A minimal valid blueprint: root with one option to a winning ending.
#[must_use]
pub fn linear_blueprint(title: &str) -> StoryBlueprint {
    StoryBlueprint {
        title: title.into(),
        root_node: NodeBlueprint {
            content: "You stand at the door.".into(),
            is_ending: false,
            is_winning_ending: false,
            options: vec![OptionBlueprint {
                text: "Open it".into(),
                next_node: Box::new(NodeBlueprint {
                    content: "Light floods in. You made it.".into(),
                    is_ending: true,
                    is_winning_ending: true,
                    options: vec![],
                }),
            }],
        },
    }
}

/// A two-branch blueprint with one winning and one losing ending, exercising
/// option ordering.
#[must_use]
pub fn two_branch_blueprint(title: &str) -> StoryBlueprint {
    StoryBlueprint {
        title: title.into(),
        root_node: NodeBlueprint {
            content: "The lighthouse looms ahead.".into(),
            is_ending: false,
            is_winning_ending: false,
            options: vec![
                OptionBlueprint {
                    text: "Climb the stairs".into(),
                    next_node: Box::new(NodeBlueprint {
                        content: "The lamp still burns. You signal the ship.".into(),
                        is_ending: true,
                        is_winning_ending: true,
                        options: vec![],
                    }),
                },
                OptionBlueprint {
                    text: "Search the cellar".into(),
                    next_node: Box::new(NodeBlueprint {
                        content: "The door slams shut behind you.".into(),
                        is_ending: true,
                        is_winning_ending: false,
                        options: vec![],
                    }),
                },
            ],
        },
    }
}
