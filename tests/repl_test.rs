//! Integration tests for the interactive prompt loop.

mod common;

use std::time::Duration;

use common::{ScriptedInvoker, success, timeout_outcome};
use summoner::backend::{Assistant, Backend};
use summoner::repl::Repl;
use summoner::{InvocationOutcome, Interrupt};

async fn session(invoker: &ScriptedInvoker, input: &str) -> String {
    let assistant = Assistant::new(Backend::Codex, Duration::from_secs(60));
    let mut out = Vec::new();
    Repl::new(invoker, &assistant, Interrupt::new())
        .run(input.as_bytes(), &mut out)
        .await
        .expect("writing to a Vec cannot fail");
    String::from_utf8(out).unwrap()
}

#[tokio::test]
async fn test_timeout_offers_retry_and_retries_on_yes() {
    let invoker = ScriptedInvoker::new(|n, _| match n {
        1 => timeout_outcome(),
        _ => success("second time lucky"),
    });

    let output = session(&invoker, "tell me a joke\ny\nquit\n").await;

    assert_eq!(invoker.call_count(), 2);
    assert!(output.contains("Error: Process timed out after 120 seconds"));
    assert!(output.contains("Retry? [y/N]"));
    assert!(output.contains("second time lucky"));
    assert!(output.trim_end().ends_with("Goodbye!"));
}

#[tokio::test]
async fn test_declined_retry_moves_on() {
    let invoker = ScriptedInvoker::new(|n, _| match n {
        1 => timeout_outcome(),
        _ => success("fresh answer"),
    });

    let output = session(&invoker, "first\nn\nsecond\nq\n").await;

    assert_eq!(invoker.call_count(), 2);
    assert_eq!(invoker.prompts(), vec!["first", "second"]);
    assert!(output.contains("fresh answer"));
}

#[tokio::test]
async fn test_not_found_is_reported_without_retry_offer() {
    let invoker = ScriptedInvoker::new(|_, _| InvocationOutcome::NotFound {
        executable: "codex".to_string(),
    });

    let output = session(&invoker, "hello\nq\n").await;

    assert_eq!(invoker.call_count(), 1);
    assert!(output.contains("Error: "));
    assert!(output.contains("codex"));
    assert!(!output.contains("Retry?"));
}

#[tokio::test]
async fn test_loop_continues_after_failure() {
    let invoker = ScriptedInvoker::new(|n, prompt| match n {
        1 => InvocationOutcome::NonZeroExit {
            exit_code: 1,
            stderr: String::new(),
        },
        _ => success(&format!("echo: {}", prompt)),
    });

    let output = session(&invoker, "one\nno\ntwo\nthree\n").await;

    assert!(output.contains("Error: "));
    assert!(output.contains("Unknown error occurred"));
    assert!(output.contains("echo: two"));
    assert!(output.contains("echo: three"));
    assert!(output.ends_with("\n\nGoodbye!\n"));
}

#[tokio::test]
async fn test_interrupt_while_waiting_for_input_ends_session() {
    let invoker = ScriptedInvoker::echoing();
    let assistant = Assistant::new(Backend::Codex, Duration::from_secs(60));
    let interrupt = Interrupt::new();
    let trigger = interrupt.clone();

    // The writing half stays open, so a read would wait forever.
    let (_keyboard, terminal) = tokio::io::duplex(64);
    let mut out = Vec::new();
    let repl = Repl::new(&invoker, &assistant, interrupt);
    let session = repl.run(tokio::io::BufReader::new(terminal), &mut out);
    let raise = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.raise();
    };

    let (result, ()) = tokio::time::timeout(Duration::from_secs(5), async {
        tokio::join!(session, raise)
    })
    .await
    .expect("session should end once interrupted");
    result.unwrap();

    let output = String::from_utf8(out).unwrap();
    assert_eq!(invoker.call_count(), 0);
    assert!(output.ends_with("> \n\nGoodbye!\n"));
}

#[tokio::test]
async fn test_interrupt_at_retry_question_ends_session() {
    let invoker = ScriptedInvoker::new(|_, _| timeout_outcome());
    let assistant = Assistant::new(Backend::Codex, Duration::from_secs(60));
    let interrupt = Interrupt::new();
    let trigger = interrupt.clone();

    let (mut keyboard, terminal) = tokio::io::duplex(64);
    tokio::io::AsyncWriteExt::write_all(&mut keyboard, b"slow question\n")
        .await
        .unwrap();

    let mut out = Vec::new();
    let repl = Repl::new(&invoker, &assistant, interrupt);
    let session = repl.run(tokio::io::BufReader::new(terminal), &mut out);
    let raise = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.raise();
    };

    let (result, ()) = tokio::time::timeout(Duration::from_secs(5), async {
        tokio::join!(session, raise)
    })
    .await
    .expect("session should end once interrupted");
    result.unwrap();

    let output = String::from_utf8(out).unwrap();
    assert_eq!(invoker.call_count(), 1);
    assert!(output.ends_with("Retry? [y/N] \n\nGoodbye!\n"));
    drop(keyboard);
}

#[tokio::test]
async fn test_prompt_is_the_last_codex_argument() {
    let invoker = ScriptedInvoker::echoing();

    let output = session(&invoker, "  spaced out prompt  \nexit\n").await;

    assert_eq!(invoker.prompts(), vec!["spaced out prompt"]);
    assert!(output.contains("Executing: codex --full-auto -q -m o3 \"spaced out prompt\""));
}
