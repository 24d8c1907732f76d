//! External collaborators module
//!
//! The persisted onboarding flag and the feedback classification client.

pub mod feedback;
pub mod onboarding;

// Re-export main types
pub use feedback::{FeedbackAnalysis, FeedbackClassifier, FeedbackOutcome};
pub use onboarding::{OnboardingStore, TourStep, TOUR_STEPS};
