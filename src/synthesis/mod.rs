pub mod consensus;
pub mod narrative;
pub mod risk;
pub mod synthesizer;
pub mod validation;

pub use consensus::{Consensus, ConfidenceSynthesizer};
pub use risk::{RiskAssessor, RiskInputs};
pub use synthesizer::{SignalSynthesizer, SynthesisRequest};
pub use validation::{DraftSignal, ValidationGate};
