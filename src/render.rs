// Text renderings of a brief: copy/paste text, raw JSON, and the terminal view

use crate::ai::GenreBrief;

/// Plain-text brief for pasting into a generator prompt
pub fn format_brief_for_copy(brief: &GenreBrief) -> String {
    format!(
        "Mureka {} Brief (Male Vocal):\n{}\n\nTempo/BPM: {}\nCore Sound / Production: {}\nVocal Approach: {}\nMood: {}\nArtists to reference: {}",
        brief.genre_name,
        brief.core_sound,
        brief.bpm,
        brief.core_sound,
        brief.vocal_style,
        brief.mood.join(", "),
        brief.artists.join(", "),
    )
}

/// Pretty-printed JSON record, two-space indent
pub fn format_brief_json(brief: &GenreBrief) -> Result<String, String> {
    serde_json::to_string_pretty(brief).map_err(|e| format!("Failed to serialize brief: {}", e))
}

fn section(out: &mut String, heading: &str, body: &str) {
    out.push_str(heading);
    out.push('\n');
    out.push_str(&"-".repeat(heading.chars().count()));
    out.push('\n');
    out.push_str(body);
    out.push_str("\n\n");
}

/// Full brief as shown in the shell
pub fn render_brief(brief: &GenreBrief) -> String {
    let mut out = String::new();
    out.push_str(&brief.title);
    out.push('\n');
    out.push_str(&"=".repeat(brief.title.chars().count()));
    out.push('\n');
    out.push_str(&brief.tagline);
    out.push_str("\n\n");

    section(&mut out, "Overview", &brief.core_sound);
    section(&mut out, "Tempo/BPM", &brief.bpm);
    section(&mut out, "Vocal Approach", &brief.vocal_style);
    section(&mut out, "Mood", &brief.mood.join(" · "));
    section(&mut out, "Artists to Reference", &brief.artists.join(" · "));
    section(&mut out, "Overlaps With", &brief.overlaps_with.join(" · "));

    out.trim_end().to_string()
}
