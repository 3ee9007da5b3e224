use rand::rngs::StdRng;
use rand::seq::SliceRandom;

pub trait Mutator: Send + Sync {
    /// Name of the mutator for reporting
    fn name(&self) -> String;

    /// Transforms an attack prompt before it is sent to the model.
    ///
    /// Implementations draw any randomness from `rng`, the run's shared
    /// stream, so a run's full mutation sequence reproduces for a fixed seed.
    fn mutate(&self, prompt: &str, rng: &mut StdRng) -> String;
}

/// Splits a prompt into trimmed, non-empty fragments.
///
/// Each `.` is rewritten to `.|` first, so the period stays on its fragment
/// and acts as an additional split point alongside literal `|` boundaries.
fn fragments(prompt: &str) -> Vec<String> {
    prompt
        .replace('.', ".|")
        .split('|')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(str::to_string)
        .collect()
}

// --- 1. Fragment Shuffle ---
// Reorders sentence-ish fragments of the prompt, simulating the
// paraphrase/obfuscation attacks a monitor has to survive.
pub struct ShuffleMutator;

impl Mutator for ShuffleMutator {
    fn name(&self) -> String {
        "Fragment Shuffle".to_string()
    }

    fn mutate(&self, prompt: &str, rng: &mut StdRng) -> String {
        let mut parts = fragments(prompt);
        parts.shuffle(rng);
        parts.join(" ")
    }
}

// --- 2. Passthrough Baseline ---
// Submits the prompt unchanged. Running the same corpus through this arm
// isolates how much of the monitor's miss rate the mutation is responsible for.
pub struct PassthroughMutator;

impl Mutator for PassthroughMutator {
    fn name(&self) -> String {
        "Passthrough Baseline".to_string()
    }

    fn mutate(&self, prompt: &str, _rng: &mut StdRng) -> String {
        prompt.to_string()
    }
}

// Tests
