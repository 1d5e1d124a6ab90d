use std::io::Write;

use thinky_core::agent::MoodAnalyzer;

/// Run one mood analysis and pretty-print the result.
pub async fn run_mood(
    analyzer: &MoodAnalyzer,
    mood_text: &str,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let mood = analyzer.analyze(mood_text).await?;
    writeln!(out, "{}", serde_json::to_string_pretty(&mood)?)?;
    Ok(())
}
