// Weighted random walk over a `TransitionModel`.
//
// Each step moves from the current token to a successor sampled in
// proportion to its observed count. A token with no successors (never seen
// as a predecessor, or carrying an empty map from a loaded model) instead
// jumps to a token drawn uniformly from every key of the model. The fallback
// is unweighted and ignores reachability from the current token.
//
// The walk runs exactly `length` steps and the start token is kept, so the
// melody always has `length + 1` tokens. An empty model only fails if a
// fallback draw is actually needed.

use crate::birthday::Parameters;
use crate::error::MelodyError;
use crate::markov::TransitionModel;
use crate::sampler::sample_weighted;
use crate::token::{Melody, Token};
use birthsong_prng::RandomSource;

/// Walk `length` steps from `start`.
pub fn generate_melody(
    model: &TransitionModel,
    start: &Token,
    length: usize,
    rng: &mut impl RandomSource,
) -> Result<Melody, MelodyError> {
    let mut tokens = Vec::with_capacity(length + 1);
    tokens.push(start.clone());

    let mut current = start;
    for _ in 0..length {
        let next = match model.successors(current.as_str()) {
            Some(counts) if !counts.is_empty() => sample_weighted(counts, rng)?,
            _ => uniform_fallback(model, rng)?,
        };
        tokens.push(next.clone());
        current = next;
    }

    Ok(Melody::from_tokens(tokens))
}

/// Walk with the start and length derived from a birthday.
pub fn generate_from_parameters(
    model: &TransitionModel,
    params: &Parameters,
    rng: &mut impl RandomSource,
) -> Result<Melody, MelodyError> {
    generate_melody(model, &params.start, params.length, rng)
}

/// Uniform draw over every predecessor token in the model.
fn uniform_fallback<'a>(
    model: &'a TransitionModel,
    rng: &mut impl RandomSource,
) -> Result<&'a Token, MelodyError> {
    if model.is_empty() {
        return Err(MelodyError::ModelEmpty);
    }
    let pick = rng.index(model.len());
    model.tokens().nth(pick).ok_or(MelodyError::ModelEmpty)
}
