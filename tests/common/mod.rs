//! Общие помощники интеграционных тестов: логи, карты из строк, тестовые агенты.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

use game_arena::arena::{ActionChoice, AgentAdapter, AgentError, DecisionRequest};
use game_arena::domain::{Card, PlayerId};

static LOGGING: OnceCell<()> = OnceCell::new();

/// Логи в тестах: TEST_LOG -> RUST_LOG -> "warn". Можно звать сколько угодно раз.
pub fn init_logging() {
    LOGGING.get_or_init(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .try_init()
            .ok();
    });
}

/// `cards("Ah Kd 7c")`.
pub fn cards(s: &str) -> Vec<Card> {
    s.split_whitespace()
        .map(|c| c.parse().expect("valid card literal"))
        .collect()
}

fn has(request: &DecisionRequest<'_>, name: &str) -> bool {
    request.legal_actions.iter().any(|a| a.name == name)
}

/// Простые стратегии поверх списка легальных действий.
#[derive(Clone, Copy, Debug)]
pub enum Policy {
    /// check, иначе call, иначе fold.
    Passive,
    /// Всегда весь стек: raise_to/bet на огромную сумму, иначе call.
    AllIn,
    /// Всегда выбирает несуществующее действие.
    Nonsense,
}

pub struct PolicyAgent {
    policy: Policy,
    calls: AtomicU32,
}

impl PolicyAgent {
    pub fn new(policy: Policy) -> Self {
        Self {
            policy,
            calls: AtomicU32::new(0),
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AgentAdapter for PolicyAgent {
    async fn decide(&self, request: &DecisionRequest<'_>) -> Result<ActionChoice, AgentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let choice = match self.policy {
            Policy::Passive if has(request, "check") => ActionChoice::new("check"),
            Policy::Passive if has(request, "call") => ActionChoice::new("call"),
            Policy::Passive => ActionChoice::new("fold"),
            Policy::AllIn if has(request, "raise_to") => {
                ActionChoice::new("raise_to").with_arg("total", 1_000_000)
            }
            Policy::AllIn if has(request, "bet") => {
                ActionChoice::new("bet").with_arg("amount", 1_000_000)
            }
            Policy::AllIn if has(request, "call") => ActionChoice::new("call"),
            Policy::AllIn => ActionChoice::new("check"),
            Policy::Nonsense => ActionChoice::new("shove"),
        };
        Ok(choice)
    }
}

/// Отдаёт заранее записанные ответы по порядку и запоминает, что видел каждый игрок.
#[derive(Default)]
pub struct ScriptedAgent {
    script: Mutex<VecDeque<ActionChoice>>,
    seen: Mutex<Vec<(PlayerId, String)>>,
}

impl ScriptedAgent {
    pub fn new(script: Vec<ActionChoice>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// (игрок, текст состояния) для каждого запроса.
    pub fn seen(&self) -> Vec<(PlayerId, String)> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl AgentAdapter for ScriptedAgent {
    async fn decide(&self, request: &DecisionRequest<'_>) -> Result<ActionChoice, AgentError> {
        self.seen
            .lock()
            .unwrap()
            .push((request.player_id.clone(), request.view.to_string()));
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| AgentError::NoDecision("script exhausted".to_string()))
    }
}

/// Первые `failures` вызовов падают, дальше: как `inner`.
pub struct FlakyAgent<A> {
    failures: u32,
    calls: AtomicU32,
    inner: A,
}

impl<A> FlakyAgent<A> {
    pub fn new(failures: u32, inner: A) -> Self {
        Self {
            failures,
            calls: AtomicU32::new(0),
            inner,
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<A: AgentAdapter> AgentAdapter for FlakyAgent<A> {
    async fn decide(&self, request: &DecisionRequest<'_>) -> Result<ActionChoice, AgentError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if n < self.failures {
            return Err(AgentError::Unavailable(format!("outage #{}", n + 1)));
        }
        self.inner.decide(request).await
    }
}
