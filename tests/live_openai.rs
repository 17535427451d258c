//! Calls the real service. Run with `OPENAI_API_KEY=... cargo test -- --ignored`.

use phenomenologist::prelude::*;

fn settings_or_skip() -> Option<Settings> {
    match Settings::from_env() {
        Ok(settings) => Some(settings),
        Err(err) => {
            eprintln!("skipping live test: {err}");
            None
        }
    }
}

#[tokio::test]
#[ignore = "needs OPENAI_API_KEY and network access"]
async fn live_completion_returns_scored_tokens() {
    let Some(settings) = settings_or_skip() else { return };
    let llm = OpenAI::from_settings(&settings).unwrap();
    let request = GenerationRequest::builder(vec![Message::user("Say hello in five words.")])
        .model(settings.model.clone())
        .max_tokens(32)
        .logprobs(2)
        .build()
        .unwrap();

    // a fixed seed is only a hint, so assert shape rather than exact text
    for _ in 0..2 {
        let result = llm.generate(&request).await.unwrap();
        assert!(!result.generation.trim().is_empty());
        assert!(!result.token_logprobs.is_empty());
        assert!(result
            .token_logprobs
            .iter()
            .filter_map(|t| t.logprob)
            .all(|lp| lp <= 0.0));
    }
}

#[tokio::test]
#[ignore = "needs OPENAI_API_KEY and network access"]
async fn live_run_reaches_a_terminal_state() {
    let Some(_) = settings_or_skip() else { return };
    let phenomenologist = Phenomenologist::from_env().unwrap();
    let report = phenomenologist
        .reflect("The lamp hummed a color I had no word for.")
        .await
        .unwrap();

    assert!(report.is_finished());
    assert!(!report.description.generation.is_empty());
    assert_eq!(report.reflection.is_some(), report.state == ReflectionState::Reflected);
}
