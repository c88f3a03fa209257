use std::fmt::Write;

use crate::models::CandidateAnalysis;

const EMPTY_HINT: &str = "Upload a resume and ask for analysis to see results here";

/// `85.0` -> `85%`, `72.5` -> `72.5%`.
pub fn format_percent(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}%")
    } else {
        format!("{value}%")
    }
}

fn bar(value: f64) -> String {
    let filled = (value.clamp(0.0, 100.0) / 5.0).round() as usize;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(20 - filled))
}

fn flag_group(out: &mut String, title: &str, flags: &[String]) {
    if flags.is_empty() {
        return;
    }
    let _ = writeln!(out, "{title}");
    for flag in flags {
        let _ = writeln!(out, "  • {flag}");
    }
}

pub fn analysis_panel(analysis: Option<&CandidateAnalysis>) -> String {
    let mut out = String::from("Candidate Analysis\n");
    let Some(analysis) = analysis else {
        out.push_str(EMPTY_HINT);
        out.push('\n');
        return out;
    };

    if let (Some(score), Some(rating)) = (analysis.match_score, analysis.rating()) {
        let _ = writeln!(
            out,
            "Overall Match     {} {} {rating}",
            format_percent(score),
            bar(score)
        );
    }
    if let Some(score) = analysis.skill_match {
        let _ = writeln!(out, "Skill Match       {} {}", format_percent(score), bar(score));
    }
    if let Some(score) = analysis.experience_match {
        let _ = writeln!(out, "Experience Match  {} {}", format_percent(score), bar(score));
    }

    flag_group(&mut out, "Green Flags", &analysis.green_flags);
    flag_group(&mut out, "Yellow Flags", &analysis.yellow_flags);
    flag_group(&mut out, "Red Flags", &analysis.red_flags);
    flag_group(&mut out, "Bias Detected", &analysis.bias_flags);

    if let Some(recommendation) = &analysis.recommendation {
        let _ = writeln!(out, "Recommendation\n  {recommendation}");
    }
    out
}
