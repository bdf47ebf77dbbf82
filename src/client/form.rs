//! Registration form state
//!
//! Phone and UID inputs are sanitized as they are entered; the screenshot is
//! size-checked as soon as it is selected. Everything else waits for
//! [`RegistrationForm::validate`].

use crate::client::encoder::SubmissionPayload;
use crate::config::{DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_ROSTER_SIZE, RegistrationConfig};
use crate::core::model::Player;
use crate::core::validation::{Candidate, Violation, filters, validate_candidate};
use thiserror::Error;

/// A payment screenshot chosen by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentProof {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl PaymentProof {
    pub fn new(file_name: impl Into<String>, content_type: Option<&str>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.map(str::to_string),
            bytes,
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("File size must be less than {}MB", .limit / (1024 * 1024))]
    FileTooLarge { size: usize, limit: usize },
}

#[derive(Debug, Clone)]
pub struct RegistrationForm {
    team_name: String,
    igl_name: String,
    igl_phone: String,
    players: Vec<Player>,
    payment_proof: Option<PaymentProof>,
    max_upload_bytes: usize,
}

impl RegistrationForm {
    pub fn new() -> Self {
        Self::with_roster(DEFAULT_ROSTER_SIZE, DEFAULT_MAX_UPLOAD_BYTES)
    }

    /// A form sized by the portal's registration rules
    pub fn from_config(config: &RegistrationConfig) -> Self {
        Self::with_roster(config.roster_size, config.max_upload_bytes)
    }

    pub fn with_roster(roster_size: usize, max_upload_bytes: usize) -> Self {
        Self {
            team_name: String::new(),
            igl_name: String::new(),
            igl_phone: String::new(),
            players: vec![Player::default(); roster_size],
            payment_proof: None,
            max_upload_bytes,
        }
    }

    pub fn team_name(&self) -> &str {
        &self.team_name
    }

    pub fn igl_name(&self) -> &str {
        &self.igl_name
    }

    pub fn igl_phone(&self) -> &str {
        &self.igl_phone
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn payment_proof(&self) -> Option<&PaymentProof> {
        self.payment_proof.as_ref()
    }

    pub fn set_team_name(&mut self, value: impl Into<String>) {
        self.team_name = value.into();
    }

    pub fn set_igl_name(&mut self, value: impl Into<String>) {
        self.igl_name = value.into();
    }

    /// Keeps digits only, at most ten
    pub fn set_igl_phone(&mut self, raw: &str) {
        self.igl_phone = filters::phone(raw);
    }

    pub fn set_player_name(&mut self, index: usize, value: impl Into<String>) {
        if let Some(player) = self.players.get_mut(index) {
            player.name = value.into();
        }
    }

    /// Keeps digits only
    pub fn set_player_uid(&mut self, index: usize, raw: &str) {
        if let Some(player) = self.players.get_mut(index) {
            player.uid = filters::digits_only(raw);
        }
    }

    /// Oversized files are refused and the previous selection is kept
    pub fn select_payment_proof(&mut self, proof: PaymentProof) -> Result<(), FormError> {
        if proof.size() > self.max_upload_bytes {
            return Err(FormError::FileTooLarge {
                size: proof.size(),
                limit: self.max_upload_bytes,
            });
        }
        self.payment_proof = Some(proof);
        Ok(())
    }

    pub fn clear_payment_proof(&mut self) {
        self.payment_proof = None;
    }

    /// Empty the form, keeping the roster size and upload limit
    pub fn reset(&mut self) {
        *self = Self::with_roster(self.players.len(), self.max_upload_bytes);
    }

    pub fn validate(&self) -> Result<(), Violation> {
        validate_candidate(&Candidate {
            team_name: &self.team_name,
            igl_name: &self.igl_name,
            igl_phone: &self.igl_phone,
            players: &self.players,
            has_payment_proof: self.payment_proof.is_some(),
        })
    }

    /// Validate, then build the multipart payload
    pub fn encode(&self) -> Result<SubmissionPayload, Violation> {
        self.validate()?;
        let proof = self
            .payment_proof
            .as_ref()
            .ok_or(Violation::PaymentProofMissing)?;
        Ok(SubmissionPayload::encode(
            &self.team_name,
            &self.igl_name,
            &self.igl_phone,
            &self.players,
            proof,
        ))
    }
}

impl Default for RegistrationForm {
    fn default() -> Self {
        Self::new()
    }
}
