//! The structured breakdown returned for a paper, and the output schema the
//! model is asked to follow.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Structured breakdown of a research paper.
///
/// Every field is required on the wire, so a response that omits one (or
/// sends the wrong type) fails to parse instead of producing a partial value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Explanation {
    pub simple_explanation: String,
    pub methodology: String,
    pub datasets: String,
    pub algorithms: String,
    pub key_contributions: Vec<String>,
    pub potential_applications: Vec<String>,
    pub reference_helper: String,
}

/// Content of one display card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionBody<'a> {
    Text(&'a str),
    List(&'a [String]),
}

/// A titled card of the breakdown, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section<'a> {
    pub title: &'static str,
    pub body: SectionBody<'a>,
}

impl Explanation {
    /// Parse the model's response text.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text.trim())
    }

    /// The seven cards in the order they are shown to the user.
    pub fn sections(&self) -> [Section<'_>; 7] {
        [
            Section {
                title: "Simple Explanation",
                body: SectionBody::Text(&self.simple_explanation),
            },
            Section {
                title: "Methodology",
                body: SectionBody::Text(&self.methodology),
            },
            Section {
                title: "Algorithms",
                body: SectionBody::Text(&self.algorithms),
            },
            Section {
                title: "Datasets",
                body: SectionBody::Text(&self.datasets),
            },
            Section {
                title: "Key Contributions",
                body: SectionBody::List(&self.key_contributions),
            },
            Section {
                title: "Potential Applications",
                body: SectionBody::List(&self.potential_applications),
            },
            Section {
                title: "Reference Helper",
                body: SectionBody::Text(&self.reference_helper),
            },
        ]
    }
}

/// Structured-output schema sent with every analysis request.
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "simpleExplanation": {
                "type": "STRING",
                "description": "A very simple, ELI5-style explanation of the paper's core idea."
            },
            "methodology": {
                "type": "STRING",
                "description": "A summary of the methodology, techniques, and algorithms used in the research."
            },
            "datasets": {
                "type": "STRING",
                "description": "A description of the datasets used for experiments, including their names and key characteristics."
            },
            "algorithms": {
                "type": "STRING",
                "description": "A detailed explanation of the key algorithms and their purpose in the paper. If no specific algorithms are mentioned, state that clearly."
            },
            "keyContributions": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "A list of the main contributions or novel findings of the paper."
            },
            "potentialApplications": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "A list of potential real-world applications for this research."
            },
            "referenceHelper": {
                "type": "STRING",
                "description": "A paragraph summarizing the paper's key points, formatted to be easily used in the references/related work section of another paper."
            }
        },
        "required": [
            "simpleExplanation",
            "methodology",
            "datasets",
            "algorithms",
            "keyContributions",
            "potentialApplications",
            "referenceHelper"
        ]
    })
}
