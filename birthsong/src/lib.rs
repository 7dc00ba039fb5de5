// Birthsong: birthday-seeded melody generation.
//
// A bigram (order-1 Markov) model is counted from a corpus of note-token
// melodies; a birthday picks the start note and length; a weighted random
// walk over the model produces the melody, which is then written as text
// and as a MIDI file.
//
// Architecture:
// - token.rs: `Token`, `Sequence`, `Melody`
// - markov.rs: `TransitionModel` (token -> successor counts), built by
//   commutative pair counting; JSON load/save
// - sampler.rs: weighted draw over one token's successor counts
// - birthday.rs: birthday parsing/validation and the fixed
//   birthday -> (start, length) mapping
// - generator.rs: the random walk, with a uniform fallback for tokens that
//   have no successors
// - corpus.rs: text and MIDI-folder corpus loading (absent = empty)
// - pitch.rs: note name <-> MIDI pitch
// - midi.rs: melody -> Standard MIDI File
// - config.rs: `ComposerConfig` for the `compose` binary
// - error.rs: error enums
//
// All randomness comes from a caller-supplied `birthsong_prng::RandomSource`.
// The model is immutable once built and can be shared across threads; each
// generation call needs its own random source. Given a seed, output is
// identical on every platform.

pub mod birthday;
pub mod config;
pub mod corpus;
pub mod error;
pub mod generator;
pub mod markov;
pub mod midi;
pub mod pitch;
pub mod sampler;
pub mod token;

pub use birthday::{Birthday, Parameters, derive_parameters};
pub use error::MelodyError;
pub use generator::{generate_from_parameters, generate_melody};
pub use markov::{TransitionCounts, TransitionModel};
pub use sampler::sample_weighted;
pub use token::{Melody, Sequence, Token};

pub use birthsong_prng::{MelodyRng, RandomSource};

/// Derive parameters from `birthday` and walk the model from them.
pub fn compose_for_birthday(
    model: &TransitionModel,
    birthday: &Birthday,
    rng: &mut impl RandomSource,
) -> Result<(Parameters, Melody), MelodyError> {
    let params = derive_parameters(birthday);
    let melody = generate_from_parameters(model, &params, rng)?;
    Ok((params, melody))
}
