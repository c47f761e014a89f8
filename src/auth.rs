use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use serde_with::{NoneAsEmptyString, serde_as};
use std::collections::BTreeMap;
use std::path::Path;

use crate::{AUTH_ERR_INVALID_JSON, AUTH_ERR_READ, AUTH_ERR_SERIALIZE, AUTH_ERR_WRITE, write_atomic};

/// Settings env vars the live CLI accepts as an API credential, in the
/// precedence order the CLI itself uses.
pub const API_KEY_ENV_VARS: [&str; 2] = ["ANTHROPIC_API_KEY", "ANTHROPIC_AUTH_TOKEN"];

/// Length of the key suffix recorded in `customApiKeyResponses.approved` so
/// the live CLI skips its interactive key-approval prompt.
pub const APPROVED_KEY_SUFFIX_LEN: usize = 20;

/// The live auth document (`.claude.json`). Field names are the wire
/// contract with Claude Code; everything the CLI writes that we do not
/// model lands in `extra` and survives round-trips untouched.
#[serde_as]
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AuthDoc {
    #[serde(rename = "sessionToken", default, skip_serializing_if = "Option::is_none")]
    #[serde_as(as = "NoneAsEmptyString")]
    pub session_token: Option<String>,
    #[serde(rename = "refreshToken", default, skip_serializing_if = "Option::is_none")]
    #[serde_as(as = "NoneAsEmptyString")]
    pub refresh_token: Option<String>,
    #[serde(rename = "accessToken", default, skip_serializing_if = "Option::is_none")]
    #[serde_as(as = "NoneAsEmptyString")]
    pub access_token: Option<String>,
    #[serde(rename = "expiresAt", default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<Value>,
    #[serde(rename = "oauthAccount", default, skip_serializing_if = "Option::is_none")]
    pub oauth_account: Option<OauthAccount>,
    #[serde(
        rename = "hasCompletedOnboarding",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub has_completed_onboarding: Option<bool>,
    #[serde(
        rename = "customApiKeyResponses",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub custom_api_key_responses: Option<ApiKeyResponses>,
    #[serde(
        rename = "claudeCodeFirstTokenDate",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub claude_code_first_token_date: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[serde_as]
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct OauthAccount {
    #[serde(rename = "emailAddress", default, skip_serializing_if = "Option::is_none")]
    #[serde_as(as = "NoneAsEmptyString")]
    pub email_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde_as(as = "NoneAsEmptyString")]
    pub email: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl OauthAccount {
    pub fn is_populated(&self) -> bool {
        self.email_address.is_some() || self.email.is_some() || !self.extra.is_empty()
    }

    pub fn display_email(&self) -> Option<&str> {
        self.email_address.as_deref().or(self.email.as_deref())
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ApiKeyResponses {
    #[serde(default)]
    pub approved: Vec<String>,
    #[serde(default)]
    pub rejected: Vec<String>,
}

/// The live settings document and the per-profile `settings.json`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SettingsDoc {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SettingsDoc {
    /// First non-empty recognized API credential, in CLI precedence order.
    pub fn api_key(&self) -> Option<&str> {
        API_KEY_ENV_VARS
            .iter()
            .filter_map(|name| self.env.get(*name))
            .map(String::as_str)
            .find(|value| !value.trim().is_empty())
    }
}

pub fn read_auth_doc(path: &Path) -> Result<AuthDoc, String> {
    read_doc(path)
}

pub fn read_settings_doc(path: &Path) -> Result<SettingsDoc, String> {
    read_doc(path)
}

pub fn read_auth_doc_opt(path: &Path) -> Option<AuthDoc> {
    if !path.is_file() {
        return None;
    }
    read_auth_doc(path).ok()
}

pub fn read_settings_doc_opt(path: &Path) -> Option<SettingsDoc> {
    if !path.is_file() {
        return None;
    }
    read_settings_doc(path).ok()
}

fn read_doc<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, String> {
    let data = std::fs::read_to_string(path)
        .map_err(|err| crate::msg2(AUTH_ERR_READ, path.display(), err))?;
    serde_json::from_str(&data).map_err(|err| crate::msg2(AUTH_ERR_INVALID_JSON, path.display(), err))
}

pub fn write_doc<T: Serialize>(path: &Path, doc: &T) -> Result<(), String> {
    let json = serde_json::to_string_pretty(doc)
        .map_err(|err| crate::msg2(AUTH_ERR_SERIALIZE, path.display(), err))?;
    write_atomic(path, format!("{json}\n").as_bytes())
        .map_err(|err| crate::msg2(AUTH_ERR_WRITE, path.display(), err))
}

/// How a profile authenticates, per the live CLI's own precedence rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthMode {
    OAuth,
    ApiKey,
    Invalid,
}

impl AuthMode {
    pub fn label(self) -> &'static str {
        match self {
            AuthMode::OAuth => "oauth",
            AuthMode::ApiKey => "api key",
            AuthMode::Invalid => "invalid",
        }
    }
}

fn oauth_signal(auth: Option<&AuthDoc>) -> bool {
    let Some(auth) = auth else {
        return false;
    };
    auth.session_token.is_some()
        || auth
            .oauth_account
            .as_ref()
            .is_some_and(OauthAccount::is_populated)
}

fn api_key_signal(settings: Option<&SettingsDoc>) -> bool {
    settings.is_some_and(|settings| settings.api_key().is_some())
}

/// An API key in the settings wins over every OAuth signal because the
/// live CLI prefers it when both are present.
pub fn classify(
    auth: Option<&AuthDoc>,
    settings: Option<&SettingsDoc>,
    has_blob: bool,
) -> AuthMode {
    if api_key_signal(settings) {
        return AuthMode::ApiKey;
    }
    if has_blob || oauth_signal(auth) {
        return AuthMode::OAuth;
    }
    AuthMode::Invalid
}

/// Outcome of inspecting the live configuration before saving it as a
/// profile. `Both` needs explicit user confirmation; `Neither` is a hard
/// refusal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveSignal {
    OAuth,
    ApiKey,
    Both,
    Neither,
}

pub fn validate_for_save(
    auth: Option<&AuthDoc>,
    settings: Option<&SettingsDoc>,
    secure_has_secret: bool,
) -> SaveSignal {
    let oauth = oauth_signal(auth) || secure_has_secret;
    let api_key = api_key_signal(settings);
    match (oauth, api_key) {
        (true, true) => SaveSignal::Both,
        (true, false) => SaveSignal::OAuth,
        (false, true) => SaveSignal::ApiKey,
        (false, false) => SaveSignal::Neither,
    }
}

/// Last `APPROVED_KEY_SUFFIX_LEN` characters of an API key, the form the
/// live CLI stores in its approved-keys record.
pub fn key_suffix(api_key: &str) -> String {
    let chars: Vec<char> = api_key.chars().collect();
    let start = chars.len().saturating_sub(APPROVED_KEY_SUFFIX_LEN);
    chars[start..].iter().collect()
}

/// Builds the regenerated live auth document for API-key mode: OAuth
/// fields stripped, onboarding marked complete, and the key suffix
/// pre-approved. Unrelated fields from the previous document survive.
pub fn api_key_auth_doc(previous: Option<AuthDoc>, api_key: &str) -> AuthDoc {
    let mut doc = previous.unwrap_or_default();
    doc.session_token = None;
    doc.refresh_token = None;
    doc.access_token = None;
    doc.expires_at = None;
    doc.oauth_account = None;
    doc.claude_code_first_token_date = None;
    doc.has_completed_onboarding = Some(true);
    let suffix = key_suffix(api_key);
    let responses = doc.custom_api_key_responses.get_or_insert_with(Default::default);
    if !responses.approved.contains(&suffix) {
        responses.approved.push(suffix);
    }
    doc
}

/// FNV-1a over raw file bytes; used to match the live auth document
/// against stored profiles when the current-profile marker is stale.
pub fn content_hash(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf29ce484222325;
    for byte in bytes {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}
