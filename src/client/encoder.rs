//! Multipart payload for a registration
//!
//! Five parts in a fixed order. Scalars travel as text exactly as entered;
//! the roster is a JSON array of `{name, uid}` in roster order. Nothing is
//! validated here.

use crate::client::form::PaymentProof;
use crate::core::model::Player;
use crate::registration::handlers::{
    IGL_NAME_PART, IGL_PHONE_PART, PAYMENT_SCREENSHOT_PART, PLAYERS_PART, TEAM_NAME_PART,
};
use serde_json::{Value, json};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartBody {
    Text(String),
    File {
        file_name: String,
        content_type: Option<String>,
        bytes: Vec<u8>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionPart {
    pub name: &'static str,
    pub body: PartBody,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionPayload {
    parts: Vec<SubmissionPart>,
}

fn players_json(players: &[Player]) -> String {
    Value::Array(
        players
            .iter()
            .map(|p| json!({ "name": p.name, "uid": p.uid }))
            .collect(),
    )
    .to_string()
}

impl SubmissionPayload {
    pub fn encode(
        team_name: &str,
        igl_name: &str,
        igl_phone: &str,
        players: &[Player],
        proof: &PaymentProof,
    ) -> Self {
        let text = |name, value: &str| SubmissionPart {
            name,
            body: PartBody::Text(value.to_string()),
        };

        Self {
            parts: vec![
                text(TEAM_NAME_PART, team_name),
                text(IGL_NAME_PART, igl_name),
                text(IGL_PHONE_PART, igl_phone),
                text(PLAYERS_PART, &players_json(players)),
                SubmissionPart {
                    name: PAYMENT_SCREENSHOT_PART,
                    body: PartBody::File {
                        file_name: proof.file_name.clone(),
                        content_type: proof.content_type.clone(),
                        bytes: proof.bytes.clone(),
                    },
                },
            ],
        }
    }

    pub fn parts(&self) -> &[SubmissionPart] {
        &self.parts
    }

    pub fn part(&self, name: &str) -> Option<&PartBody> {
        self.parts.iter().find(|p| p.name == name).map(|p| &p.body)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        match self.part(name)? {
            PartBody::Text(value) => Some(value),
            PartBody::File { .. } => None,
        }
    }

    /// Convert into a reqwest multipart form
    ///
    /// Fails only when a content type is not a valid MIME string.
    pub fn into_form(self) -> Result<reqwest::multipart::Form, reqwest::Error> {
        let mut form = reqwest::multipart::Form::new();
        for part in self.parts {
            form = match part.body {
                PartBody::Text(value) => form.text(part.name, value),
                PartBody::File {
                    file_name,
                    content_type,
                    bytes,
                } => {
                    let mut file = reqwest::multipart::Part::bytes(bytes).file_name(file_name);
                    if let Some(content_type) = content_type {
                        file = file.mime_str(&content_type)?;
                    }
                    form.part(part.name, file)
                }
            };
        }
        Ok(form)
    }
}
