//! Passwordless authentication: email OTP plus bearer tokens.
//!
//! Agents never hold a password. Signup and login both start with a
//! six-digit code mailed to the address; verifying the code yields a signed
//! bearer token (HS256 JWT) carrying the agent ID.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::Rng;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use validator::Validate;

use casaflow_common::config::AuthConfig;
use casaflow_common::{AppError, AppResult, id::IdGenerator};
use casaflow_db::entities::agent::AgentRole;
use casaflow_db::entities::otp_code::OtpPurpose;
use casaflow_db::entities::{agent, otp_code};
use casaflow_db::repositories::{AgentRepository, OtpRepository};

use super::email::EmailService;

/// Bearer token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Agent ID.
    pub sub: String,
    /// Expiry, seconds since epoch.
    pub exp: i64,
    /// Issued at, seconds since epoch.
    pub iat: i64,
}

/// Input for requesting a one-time passcode.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RequestOtpInput {
    #[validate(email)]
    pub email: String,
    pub purpose: OtpPurpose,
}

/// Input for verifying a one-time passcode.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpInput {
    #[validate(email)]
    pub email: String,
    pub purpose: OtpPurpose,
    #[validate(length(equal = 6))]
    pub code: String,
    /// Display name, required when the purpose is signup.
    #[validate(length(min = 1, max = 128))]
    pub name: Option<String>,
}

/// A successful verification.
#[derive(Debug, Clone)]
pub struct VerifiedLogin {
    /// Signed bearer token.
    pub token: String,
    /// The authenticated agent.
    pub agent: agent::Model,
}

/// Service for OTP issuance and token verification.
#[derive(Clone)]
pub struct AuthService {
    agent_repo: AgentRepository,
    otp_repo: OtpRepository,
    email: EmailService,
    config: AuthConfig,
    id_gen: IdGenerator,
}

impl AuthService {
    /// Create a new auth service.
    #[must_use]
    pub const fn new(
        agent_repo: AgentRepository,
        otp_repo: OtpRepository,
        email: EmailService,
        config: AuthConfig,
    ) -> Self {
        Self {
            agent_repo,
            otp_repo,
            email,
            config,
            id_gen: IdGenerator::new(),
        }
    }

    /// Issue a passcode and mail it to the address.
    pub async fn request_otp(&self, input: RequestOtpInput) -> AppResult<()> {
        input.validate()?;
        let email = input.email.to_lowercase();

        let existing = self.agent_repo.find_by_email(&email).await?;
        match input.purpose {
            OtpPurpose::Signup if existing.is_some() => {
                return Err(AppError::Conflict(
                    "Email is already registered".to_string(),
                ));
            }
            OtpPurpose::Login if existing.is_none() => {
                return Err(AppError::BadRequest(
                    "No account exists for this email".to_string(),
                ));
            }
            _ => {}
        }

        // Opportunistic cleanup; stale codes carry no value
        self.otp_repo.purge_expired().await?;

        let code = generate_code();
        let now = Utc::now();
        self.otp_repo
            .create(otp_code::ActiveModel {
                id: Set(self.id_gen.generate()),
                email: Set(email.clone()),
                code: Set(code.clone()),
                purpose: Set(input.purpose),
                expires_at: Set((now + Duration::minutes(self.config.otp_ttl_minutes)).into()),
                consumed_at: Set(None),
                created_at: Set(now.into()),
            })
            .await?;

        self.email
            .send_otp(&email, &code, input.purpose, self.config.otp_ttl_minutes)
            .await
    }

    /// Verify a passcode, creating the agent on signup, and issue a token.
    pub async fn verify_otp(&self, input: VerifyOtpInput) -> AppResult<VerifiedLogin> {
        input.validate()?;
        let email = input.email.to_lowercase();

        let live = self
            .otp_repo
            .find_live(&email, input.purpose, &input.code)
            .await?
            .ok_or_else(|| AppError::BadRequest("Invalid or expired code".to_string()))?;
        self.otp_repo.consume(live).await?;

        let agent = match input.purpose {
            OtpPurpose::Signup => {
                let name = input
                    .name
                    .filter(|n| !n.trim().is_empty())
                    .ok_or_else(|| AppError::Validation("Name is required".to_string()))?;

                let now = Utc::now();
                self.agent_repo
                    .create(agent::ActiveModel {
                        id: Set(self.id_gen.generate()),
                        email: Set(email),
                        name: Set(name.trim().to_string()),
                        phone: Set(None),
                        avatar_url: Set(None),
                        role: Set(AgentRole::Agent),
                        onboarding_step: Set(1),
                        email_verified: Set(true),
                        agency_id: Set(None),
                        created_at: Set(now.into()),
                        updated_at: Set(now.into()),
                    })
                    .await?
            }
            OtpPurpose::Login => {
                let agent = self
                    .agent_repo
                    .find_by_email(&email)
                    .await?
                    .ok_or(AppError::Unauthorized)?;

                if agent.email_verified {
                    agent
                } else {
                    let mut model: agent::ActiveModel = agent.into();
                    model.email_verified = Set(true);
                    model.updated_at = Set(Utc::now().into());
                    self.agent_repo.update(model).await?
                }
            }
        };

        let token = self.issue_token(&agent.id)?;
        Ok(VerifiedLogin { token, agent })
    }

    /// Sign a bearer token for an agent.
    pub fn issue_token(&self, agent_id: &str) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: agent_id.to_string(),
            exp: (now + Duration::hours(self.config.token_ttl_hours)).timestamp(),
            iat: now.timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Token signing failed: {e}")))
    }

    /// Decode and validate a bearer token.
    pub fn decode_token(&self, token: &str) -> AppResult<Claims> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|_| AppError::Unauthorized)
    }
}

/// Generate a six-digit passcode.
fn generate_code() -> String {
    let n: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("{n:06}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_codes_are_six_digits() {
        for _ in 0..100 {
            let code = generate_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }
}
