//! Граница с внешним агентом, который принимает решения.
//!
//! Движок отдаёт агенту текстовое представление состояния и список легальных
//! действий, получает обратно ровно одно действие (имя + аргументы).

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

use crate::arena::phase::GamePhase;
use crate::domain::PlayerId;

/// Аргументы действия: имя → JSON-значение.
pub type ActionArgs = Map<String, Value>;

/// Тип аргумента легального действия.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ArgKind {
    Integer,
    Text,
    Player,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionParam {
    pub name: String,
    pub kind: ArgKind,
    pub description: String,
}

/// Действие, которое агенту разрешено выбрать прямо сейчас.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LegalAction {
    pub name: String,
    pub description: String,
    pub params: Vec<ActionParam>,
}

impl LegalAction {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            params: Vec::new(),
        }
    }

    pub fn with_param(
        mut self,
        name: impl Into<String>,
        kind: ArgKind,
        description: impl Into<String>,
    ) -> Self {
        self.params.push(ActionParam {
            name: name.into(),
            kind,
            description: description.into(),
        });
        self
    }
}

/// Выбор агента.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ActionChoice {
    pub name: String,
    #[serde(default)]
    pub args: ActionArgs,
}

impl ActionChoice {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: ActionArgs::new(),
        }
    }

    pub fn with_arg(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.args.insert(key.to_string(), value.into());
        self
    }

    /// Целочисленный аргумент. Принимает и число, и строку с числом:
    /// агенты нередко присылают `"40"` вместо `40`.
    pub fn int_arg(&self, key: &str) -> Result<u64, String> {
        match self.args.get(key) {
            None => Err(format!("Missing required argument '{key}'.")),
            Some(Value::Number(n)) => n
                .as_u64()
                .ok_or_else(|| format!("Argument '{key}' must be a non-negative integer.")),
            Some(Value::String(s)) => s
                .trim()
                .parse::<u64>()
                .map_err(|_| format!("Argument '{key}' must be a non-negative integer.")),
            Some(_) => Err(format!("Argument '{key}' must be a non-negative integer.")),
        }
    }
}

/// Запрос решения у агента.
#[derive(Clone, Copy, Debug)]
pub struct DecisionRequest<'a> {
    pub game_id: &'a str,
    pub player_id: &'a PlayerId,
    pub phase: &'a GamePhase,
    /// Текст состояния, видимый этому игроку.
    pub view: &'a str,
    pub legal_actions: &'a [LegalAction],
    /// Сколько шагов агент может потратить на одно решение.
    pub max_attempts: u32,
}

/// Ошибки агента.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AgentError {
    #[error("agent unavailable: {0}")]
    Unavailable(String),

    #[error("agent timed out")]
    Timeout,

    #[error("agent returned no usable action: {0}")]
    NoDecision(String),
}

/// Внешний сервис принятия решений. Побочных эффектов для движка нет,
/// кроме возвращённого действия.
#[async_trait]
pub trait AgentAdapter: Send + Sync {
    async fn decide(&self, request: &DecisionRequest<'_>) -> Result<ActionChoice, AgentError>;
}

/// Повторы вокруг вызова агента: фиксированное число попыток,
/// экспоненциальная пауза `base_delay_ms * 2^attempt` между ними.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1000,
        }
    }
}

impl RetryPolicy {
    /// Без пауз, для тестов.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_delay_ms: 0,
        }
    }

    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 1u64.checked_shl(attempt).unwrap_or(u64::MAX);
        Duration::from_millis(self.base_delay_ms.saturating_mul(factor))
    }
}

/// Спросить агента с повторами. После исчерпания попыток: последняя ошибка.
pub async fn decide_with_retry(
    agent: &dyn AgentAdapter,
    request: &DecisionRequest<'_>,
    policy: &RetryPolicy,
) -> Result<ActionChoice, AgentError> {
    let attempts = policy.max_attempts.max(1);
    let mut last_err = AgentError::NoDecision("no attempt made".to_string());

    for attempt in 0..attempts {
        match agent.decide(request).await {
            Ok(choice) => return Ok(choice),
            Err(err) => {
                warn!(
                    game_id = request.game_id,
                    player = %request.player_id,
                    attempt = attempt + 1,
                    max_attempts = attempts,
                    error = %err,
                    "agent call failed"
                );
                last_err = err;
                if attempt + 1 < attempts {
                    tokio::time::sleep(policy.delay_for(attempt)).await;
                }
            }
        }
    }

    Err(last_err)
}
