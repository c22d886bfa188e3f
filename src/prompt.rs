//! Generation prompt composition.

use crate::inference::analysis::AttributeSet;

/// Which sentence shape the prompt uses.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PromptTemplate {
    /// Gender answered as female.
    Girl,
    /// Anything else, including the placeholder.
    Person,
}

impl PromptTemplate {
    /// Picks the template from the gender answer, ignoring case.
    pub fn for_gender(gender: &str) -> Self {
        if gender.eq_ignore_ascii_case("female") {
            Self::Girl
        } else {
            Self::Person
        }
    }

    fn subject(self) -> &'static str {
        match self {
            Self::Girl => "girl",
            Self::Person => "person",
        }
    }
}

/// Builds the prompt sent to the image model. Values are interpolated as-is
/// and the user's suffix is appended after the background sentence, even
/// when empty.
pub fn compose(attributes: &AttributeSet, user_suffix: &str) -> String {
    let template = PromptTemplate::for_gender(&attributes.gender);
    format!(
        "Create a {age}-year-old {subject} with {hair} hair, wearing {clothing}, showing a {expression}. Include a {background} background. {user_suffix}",
        age = attributes.age,
        subject = template.subject(),
        hair = attributes.hair_color,
        clothing = attributes.clothing,
        expression = attributes.facial_expression,
        background = attributes.background,
    )
}
