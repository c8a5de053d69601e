//! Global configuration types for Concierge.
//!
//! `GlobalConfig` represents the top-level `config.toml` that controls the
//! chat widget persona, model parameters, and the admin console secret.

use serde::{Deserialize, Serialize};

/// Top-level configuration for Concierge.
///
/// Loaded from `~/.concierge/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Chat widget persona and model settings.
    #[serde(default)]
    pub chat: ChatConfig,

    /// Admin console settings.
    #[serde(default)]
    pub admin: AdminConfig,

    /// Model provider connection settings.
    #[serde(default)]
    pub provider: ModelProviderConfig,

    /// REST server limits for live chat sessions.
    #[serde(default)]
    pub server: ServerConfig,
}

/// Settings for the chat widget and its summarizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Model used both for replies and for session summaries.
    pub model: String,
    /// Assistant turn every new session is seeded with.
    pub greeting: String,
    /// Persona instruction sent with every reply request.
    pub system_instruction: String,
    /// Shown when the model answers with no text.
    pub empty_reply_fallback: String,
    /// Shown when the model request fails outright.
    pub connection_fallback: String,
    /// Summary instruction; the flattened transcript is appended after a blank line.
    pub summary_prompt: String,
    pub max_tokens: u32,
    pub temperature: Option<f64>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            model: "gemini-3-flash-preview".to_string(),
            greeting: "안녕하세요! TEAM 1502 AI 컨설턴트입니다. \n\
                       업무 자동화, 마케팅, 앱 개발 등 무엇이든 물어보세요."
                .to_string(),
            system_instruction: DEFAULT_SYSTEM_INSTRUCTION.to_string(),
            empty_reply_fallback:
                "죄송합니다. 일시적인 오류가 발생했습니다. 잠시 후 다시 시도해주세요.".to_string(),
            connection_fallback: "시스템 연결에 문제가 생겼습니다. 전화로 문의 부탁드립니다."
                .to_string(),
            summary_prompt:
                "다음 대화 내용을 [고객 니즈], [문의 유형], [감정 상태] 3가지 항목으로 요약 정리해줘:"
                    .to_string(),
            max_tokens: 1024,
            temperature: None,
        }
    }
}

const DEFAULT_SYSTEM_INSTRUCTION: &str = "\
당신은 프리미엄 AI 에이전시 'TEAM 1502'의 전문 AI 컨설턴트입니다.

[TEAM 1502 서비스 소개]
1. AI 업무 자동화: 반복 업무를 대체하는 맞춤형 AI 에이전트 개발.
2. 퍼포먼스 마케팅: 데이터 기반 타겟팅 및 ROAS 최적화.
3. 지능형 챗봇: 24/7 고객 응대 및 사내 지식 관리 시스템.
4. 웹/앱 개발: 최신 트렌드를 반영한 반응형 웹사이트 및 앱 구축.
5. 데이터 분석: 비즈니스 의사결정을 위한 데이터 시각화.
6. 브랜드 전략: 시장 분석을 통한 독보적 아이덴티티 수립.

[지침]
- 고객에게 정중하고 전문적인 톤으로 응대하세요.
- 답변은 한국어로 제공하며, 너무 길지 않게 핵심을 전달하세요.
- 구체적인 견적이나 프로젝트 문의는 하단의 '문의하기' 폼을 이용하도록 안내하세요.
- 연락처(010-2455-1502)를 물어보면 안내해주세요.";

/// Admin console settings.
///
/// The access key is a shared secret compared verbatim. It is a convenience
/// gate for an internal dashboard, not an authentication system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    #[serde(default = "default_access_key")]
    pub access_key: String,
}

fn default_access_key() -> String {
    "1502admin".to_string()
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            access_key: default_access_key(),
        }
    }
}

/// Connection settings for the model provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelProviderConfig {
    /// Override for the provider's API base URL (useful for proxies).
    #[serde(default)]
    pub base_url: Option<String>,

    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout_secs() -> u64 {
    60
}

impl Default for ModelProviderConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Limits on chat sessions held open by the REST server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Most sessions that may be open at once; further opens get 503.
    #[serde(default = "default_max_live_sessions")]
    pub max_live_sessions: usize,

    /// Sessions untouched for this long are closed (and summarized).
    #[serde(default = "default_session_idle_timeout_secs")]
    pub session_idle_timeout_secs: u64,
}

fn default_max_live_sessions() -> usize {
    500
}

fn default_session_idle_timeout_secs() -> u64 {
    30 * 60
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            max_live_sessions: default_max_live_sessions(),
            session_idle_timeout_secs: default_session_idle_timeout_secs(),
        }
    }
}
