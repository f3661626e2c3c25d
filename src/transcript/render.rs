//! Markdown rendering of a transcript.

use super::Transcript;

/// Render a transcript as Markdown, one section per turn in recorded order.
pub fn render_markdown(transcript: &Transcript) -> String {
    let mut out = format!("# Conversation: {}\n\n", transcript.project);

    out.push_str(&format!(
        "**Date:** {}\n",
        transcript.started_at.format("%Y-%m-%d %H:%M:%S")
    ));
    let names: Vec<&str> = transcript
        .participants
        .iter()
        .map(|s| s.name.as_str())
        .collect();
    out.push_str(&format!("**Participants:** {}\n", names.join(", ")));
    out.push_str(&format!("**Status:** {}\n\n", transcript.status.as_str()));

    for speaker in &transcript.participants {
        if let Some(personality) = &speaker.personality {
            out.push_str(&format!(
                "**{} Personality:** {}\n\n",
                speaker.name, personality
            ));
        }
    }

    out.push_str("---\n\n");

    for turn in &transcript.turns {
        out.push_str(&format!("## Round {}: {}\n\n", turn.round, turn.speaker));
        out.push_str(&format!("**Prompt:**\n{}\n\n", turn.prompt));
        out.push_str(&format!("**Response:**\n{}\n\n", turn.response));
        out.push_str("---\n\n");
    }

    out
}
