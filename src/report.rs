//! Console rendering of a [`PhenomenologyReport`].

use std::fmt::{self, Write};

use crate::reflection::types::{PhenomenologyReport, ReflectionState};
use crate::uncertainty::{probability_percent, UncertainToken};

/// The description and the uncertain-token list, available once the first
/// call has been analyzed.
pub fn render_description(report: &PhenomenologyReport) -> String {
    let mut out = String::new();
    // writing into a String cannot fail
    let _ = write_description(&mut out, report);
    out
}

/// Everything after the token list: the reflection text or the notice that
/// nothing fell below the threshold. Empty while the run is still `Described`.
pub fn render_outcome(report: &PhenomenologyReport) -> String {
    let mut out = String::new();
    let _ = write_outcome(&mut out, report);
    out
}

fn write_description(out: &mut impl Write, report: &PhenomenologyReport) -> fmt::Result {
    writeln!(out, "=== Initial Description ===")?;
    writeln!(out, "{}", report.description.generation)?;
    writeln!(out)?;

    if !report.uncertain_tokens.is_empty() {
        writeln!(out, "Uncertain Tokens (lowest confidence):")?;
        for token in &report.uncertain_tokens {
            write_token(out, token)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn write_token(out: &mut impl Write, token: &UncertainToken) -> fmt::Result {
    writeln!(
        out,
        "  '{}' -> logprob={:.4} (~{:.2}%)",
        token.token,
        token.logprob,
        token.probability_percent()
    )?;
    let alternatives: Vec<String> = token
        .alternatives
        .iter()
        .filter(|alt| alt.token != token.token)
        .map(|alt| format!("'{}' (~{:.2}%)", alt.token, probability_percent(alt.logprob)))
        .collect();
    if !alternatives.is_empty() {
        writeln!(out, "      alternatives: {}", alternatives.join(", "))?;
    }
    Ok(())
}

fn write_outcome(out: &mut impl Write, report: &PhenomenologyReport) -> fmt::Result {
    match report.state {
        ReflectionState::Described => Ok(()),
        ReflectionState::Done => writeln!(out, "No tokens found below the confidence threshold."),
        ReflectionState::Reflected => {
            writeln!(out, "=== Reflection on Uncertain Tokens ===")?;
            let text = report
                .reflection
                .as_ref()
                .map(|r| r.generation.as_str())
                .unwrap_or_default();
            writeln!(out, "{text}")
        }
    }
}

impl fmt::Display for PhenomenologyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_description(f, self)?;
        write_outcome(f, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{tokens::TopLogprob, GenerateResult};

    fn report(state: ReflectionState, uncertain: Vec<UncertainToken>, reflection: Option<&str>) -> PhenomenologyReport {
        PhenomenologyReport {
            passage: "the xyzzy cat".into(),
            threshold: -1.0,
            description: GenerateResult { generation: "It reads like a riddle.".into(), ..Default::default() },
            uncertain_tokens: uncertain,
            reflection: reflection.map(|text| GenerateResult { generation: text.into(), ..Default::default() }),
            state,
        }
    }

    fn xyzzy() -> UncertainToken {
        UncertainToken { token: "xyzzy".into(), logprob: -2.3, alternatives: Vec::new() }
    }

    #[test]
    fn reflected_report_matches_console_layout() {
        let report = report(ReflectionState::Reflected, vec![xyzzy()], Some("It was an odd word."));
        assert_eq!(
            report.to_string(),
            "=== Initial Description ===\n\
             It reads like a riddle.\n\
             \n\
             Uncertain Tokens (lowest confidence):\n\
             \x20 'xyzzy' -> logprob=-2.3000 (~10.03%)\n\
             \n\
             === Reflection on Uncertain Tokens ===\n\
             It was an odd word.\n"
        );
    }

    #[test]
    fn done_report_prints_the_notice() {
        let report = report(ReflectionState::Done, Vec::new(), None);
        assert_eq!(
            report.to_string(),
            "=== Initial Description ===\n\
             It reads like a riddle.\n\
             \n\
             No tokens found below the confidence threshold.\n"
        );
    }

    #[test]
    fn described_stage_has_no_outcome_yet() {
        let report = report(ReflectionState::Described, vec![xyzzy()], None);
        assert!(render_outcome(&report).is_empty());
        assert_eq!(render_description(&report), report.to_string());
    }

    #[test]
    fn alternatives_other_than_the_chosen_token_are_listed() {
        let mut token = UncertainToken { token: " grey".into(), logprob: -1.2, alternatives: Vec::new() };
        token.alternatives = vec![
            TopLogprob { token: " gray".into(), logprob: -0.4 },
            TopLogprob { token: " grey".into(), logprob: -1.2 },
        ];
        let rendered = render_description(&report(ReflectionState::Described, vec![token], None));
        assert!(rendered.contains("  ' grey' -> logprob=-1.2000 (~30.12%)\n"));
        assert!(rendered.contains("      alternatives: ' gray' (~67.03%)\n"));
    }
}
