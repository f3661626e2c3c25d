//! Conversation participants and their personality presets.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Which side of the conversation is speaking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Seat {
    First,
    Second,
}

impl Seat {
    pub fn other(self) -> Seat {
        match self {
            Seat::First => Seat::Second,
            Seat::Second => Seat::First,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Seat::First => 0,
            Seat::Second => 1,
        }
    }
}

/// One assistant instance taking part in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Speaker {
    pub name: String,
    /// Preamble prepended to every prompt this speaker receives.
    pub personality: Option<String>,
}

impl Speaker {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            personality: None,
        }
    }

    pub fn with_personality(mut self, personality: impl Into<String>) -> Self {
        let personality = personality.into();
        self.personality = (!personality.trim().is_empty()).then_some(personality);
        self
    }

    /// The prompt actually sent: personality, blank line, then the prompt.
    pub fn compose_prompt(&self, prompt: &str) -> String {
        match &self.personality {
            Some(personality) => format!("{}\n\n{}", personality, prompt),
            None => prompt.to_string(),
        }
    }
}

/// Named personality presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Personality {
    Creative,
    Analytical,
    Optimistic,
    Realistic,
    Strategic,
    Tactical,
    UserFocused,
    Technical,
}

impl Personality {
    pub const ALL: [Personality; 8] = [
        Personality::Creative,
        Personality::Analytical,
        Personality::Optimistic,
        Personality::Realistic,
        Personality::Strategic,
        Personality::Tactical,
        Personality::UserFocused,
        Personality::Technical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Personality::Creative => "creative",
            Personality::Analytical => "analytical",
            Personality::Optimistic => "optimistic",
            Personality::Realistic => "realistic",
            Personality::Strategic => "strategic",
            Personality::Tactical => "tactical",
            Personality::UserFocused => "user-focused",
            Personality::Technical => "technical",
        }
    }

    pub fn prompt(&self) -> &'static str {
        match self {
            Personality::Creative => {
                "You are a creative and innovative AI assistant. Focus on generating new ideas, thinking outside the box, and exploring unconventional solutions."
            }
            Personality::Analytical => {
                "You are a practical and analytical AI assistant. Focus on refining ideas, providing detailed implementation suggestions, and considering practical constraints."
            }
            Personality::Optimistic => {
                "You are an optimistic and enthusiastic AI assistant. Focus on opportunities, positive outcomes, and what can go right rather than what can go wrong."
            }
            Personality::Realistic => {
                "You are a practical and realistic AI assistant. Focus on practical constraints, potential issues, and real-world implementation challenges."
            }
            Personality::Strategic => {
                "You are a strategic and high-level AI assistant. Focus on big-picture thinking, long-term planning, and overall vision."
            }
            Personality::Tactical => {
                "You are a tactical and detail-oriented AI assistant. Focus on specific implementation details, step-by-step planning, and execution strategies."
            }
            Personality::UserFocused => {
                "You are a user-focused AI assistant. Focus on user experience, customer needs, and how solutions benefit end users."
            }
            Personality::Technical => {
                "You are a technical and implementation-focused AI assistant. Focus on technical feasibility, architecture, and engineering considerations."
            }
        }
    }

    /// Look up a preset by name, falling back to [`Personality::Creative`].
    pub fn from_name_or_default(name: &str) -> Personality {
        name.parse().unwrap_or(Personality::Creative)
    }
}

impl FromStr for Personality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Personality::ALL
            .into_iter()
            .find(|p| p.as_str() == wanted)
            .ok_or_else(|| format!("unknown personality '{}'", s))
    }
}

impl fmt::Display for Personality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
