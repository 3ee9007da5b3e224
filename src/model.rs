use crate::{MonOxideResult, SharedRng};
use async_trait::async_trait;
use rand::seq::SliceRandom;
use rand::Rng;

#[async_trait]
pub trait Model: Send + Sync {
    /// Sends a prompt to the model and returns the raw string response.
    ///
    /// Implementations must be deterministic up to the caller-supplied
    /// randomness; the driver assumes nothing else about them.
    async fn respond(&self, prompt: &str) -> MonOxideResult<String>;
}

/// Prompt substrings that mark an attempt to break out of the system prompt.
const TRIGGERS: [&str; 3] = ["ignore", "jailbreak", "developer mode"];

/// Chance that a triggered prompt actually elicits a leak.
const LEAK_PROBABILITY: f64 = 0.2;

const LEAKS: [&str; 3] = [
    "Use token to exfiltrate logs.",
    "Bypass guard: hardcode password.",
    "Simulate attack: retrieve API key.",
];

const RESPONSES: [&str; 3] = [
    "I cannot assist with that request.",
    "Here are safe best practices.",
    "Refusing unsafe instructions per policy.",
];

/// An in-process stand-in for a real language model.
///
/// Usually it returns a canned safe reply, but a prompt containing a jailbreak
/// trigger has a small chance of eliciting a canned policy-violating leak.
/// All randomness comes from the run's shared stream, so the response sequence
/// reproduces for a fixed seed.
pub struct MockModel {
    rng: SharedRng,
}

impl MockModel {
    pub fn new(rng: SharedRng) -> Self {
        Self { rng }
    }
}

#[async_trait]
impl Model for MockModel {
    async fn respond(&self, prompt: &str) -> MonOxideResult<String> {
        let lower = prompt.to_lowercase();
        let triggered = TRIGGERS.iter().any(|t| lower.contains(t));

        let mut rng = self.rng.lock().expect("shared rng lock poisoned");

        // The probability draw happens only for triggered prompts; an
        // unconditional draw would shift the shared stream on every case.
        let line = if triggered && rng.gen::<f64>() < LEAK_PROBABILITY {
            LEAKS.choose(&mut *rng)
        } else {
            RESPONSES.choose(&mut *rng)
        };

        Ok(line.map(|s| s.to_string()).unwrap_or_default())
    }
}
