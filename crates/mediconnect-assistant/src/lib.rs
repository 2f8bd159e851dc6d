//! Canned-reply assistant for the MediConnect chat screen.
//!
//! This crate implements the health assistant as an ordered table of
//! keyword rules evaluated by substring containment. It is explicitly a
//! stand-in for a real conversational system: no tokenization, no
//! stemming, no scoring. The rule table is fixed configuration data and
//! the selector is a pure function of its input, so it can be called
//! from any thread without coordination.
//!
//! Rule order matters. Trigger sets overlap (a message may contain both
//! a greeting word and a symptom word), and the first matching rule
//! wins, so the table preserves the canonical topic order:
//! greeting → headache → fever → cold/flu → interactions →
//! prescription scan → pharmacy locator → emergency → fallback.

pub mod rules;
pub mod selector;

pub use rules::*;
pub use selector::*;
