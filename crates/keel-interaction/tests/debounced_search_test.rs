//! Search-as-you-type over a meeting transcript.

use keel_interaction::{parse_transcript, search_transcript, Debouncer};
use std::time::Duration;

const TRANSCRIPT: &str = "Speaker 0: Can we revisit the renewal date?\n\
Speaker 1: The renewal is in March, procurement needs the quote by February.\n\
Speaker 0: I'll send the quote today.";

#[tokio::test(start_paused = true)]
async fn test_keystrokes_collapse_into_one_search() {
    let utterances = parse_transcript(TRANSCRIPT);
    let (mut debouncer, mut rx) = Debouncer::new(Duration::from_millis(500));

    for query in ["q", "qu", "quo", "quote"] {
        debouncer.push(query.to_string());
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    let query = rx.recv().await.expect("debounced query");
    assert_eq!(query, "quote");

    let matches = search_transcript(&utterances, &query);
    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0].speaker.as_deref(), Some("Speaker 1"));
    assert!(rx.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn test_dropped_debouncer_dispatches_nothing() {
    let (mut debouncer, mut rx) = Debouncer::new(Duration::from_millis(500));
    debouncer.push("renewal".to_string());
    drop(debouncer);

    assert_eq!(rx.recv().await, None);
}
