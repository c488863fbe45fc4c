use std::sync::Arc;
use std::time::Duration;

use quiz_core::model::{QuestionBank, SessionSettingsDraft};
use quiz_core::parse_bank;
use quiz_core::time::fixed_clock;
use services::{QuizIntent, QuizMachine, QuizPhase, SessionError, SessionLoop};
use tokio::time::{Instant, sleep};

const FIXTURE: &str = include_str!("fixtures/questions37.json");

fn build_machine() -> QuizMachine {
    let bank: QuestionBank = parse_bank("第37回", FIXTURE).unwrap();
    QuizMachine::new(Arc::new(bank)).with_clock(fixed_clock())
}

fn timed_draft(machine: &QuizMachine) -> SessionSettingsDraft {
    SessionSettingsDraft {
        time_limit_enabled: true,
        time_limit_secs: 10,
        ..machine.settings_draft()
    }
}

#[tokio::test(start_paused = true)]
async fn countdown_expires_after_time_limit() {
    let machine = build_machine();
    let draft = timed_draft(&machine);
    let (handle, _task) = SessionLoop::spawn(machine);
    let mut views = handle.subscribe();

    handle.send(QuizIntent::ApplySettings(draft)).unwrap();
    handle.send(QuizIntent::Start).unwrap();
    let started = Instant::now();

    let view = views
        .wait_for(|v| v.phase == QuizPhase::ShowingResult)
        .await
        .unwrap()
        .clone();

    assert!(started.elapsed() >= Duration::from_secs(10));
    let feedback = view.feedback.unwrap();
    assert!(feedback.timed_out);
    assert!(!feedback.is_correct);
    assert_eq!(view.remaining_secs, None);
}

#[tokio::test(start_paused = true)]
async fn countdown_is_visible_while_running() {
    let machine = build_machine();
    let draft = timed_draft(&machine);
    let (handle, _task) = SessionLoop::spawn(machine);
    let mut views = handle.subscribe();

    handle.send(QuizIntent::ApplySettings(draft)).unwrap();
    handle.send(QuizIntent::Start).unwrap();

    let view = views
        .wait_for(|v| v.remaining_secs == Some(7))
        .await
        .unwrap()
        .clone();
    assert_eq!(view.phase, QuizPhase::AwaitingAnswer);
    assert_eq!(view.position.unwrap().number, 1);
}

#[tokio::test(start_paused = true)]
async fn abort_stops_the_countdown() {
    let machine = build_machine();
    let draft = timed_draft(&machine);
    let (handle, task) = SessionLoop::spawn(machine);
    let mut views = handle.subscribe();

    handle.send(QuizIntent::ApplySettings(draft)).unwrap();
    handle.send(QuizIntent::Start).unwrap();
    let _ = views.wait_for(|v| v.remaining_secs == Some(8)).await.unwrap();

    handle.send(QuizIntent::Abort).unwrap();
    let _ = views
        .wait_for(|v| v.phase == QuizPhase::NotStarted)
        .await
        .unwrap();

    sleep(Duration::from_secs(30)).await;
    let view = handle.view();
    assert_eq!(view.phase, QuizPhase::NotStarted);
    assert_eq!(view.remaining_secs, None);
    assert!(view.start.is_some());

    drop(views);
    drop(handle);
    let machine = task.await.unwrap();
    assert!(machine.session().is_none());
}

#[tokio::test(start_paused = true)]
async fn untimed_answer_waits_for_the_user() {
    let (handle, task) = SessionLoop::spawn(build_machine());
    let mut views = handle.subscribe();

    handle.send(QuizIntent::Start).unwrap();
    let _ = views
        .wait_for(|v| v.phase == QuizPhase::AwaitingAnswer)
        .await
        .unwrap();

    sleep(Duration::from_secs(120)).await;
    assert_eq!(handle.view().phase, QuizPhase::AwaitingAnswer);

    handle.send(QuizIntent::ToggleOption(0)).unwrap();
    handle.send(QuizIntent::Submit).unwrap();
    let view = views
        .wait_for(|v| v.phase == QuizPhase::ShowingResult)
        .await
        .unwrap()
        .clone();
    assert!(!view.feedback.unwrap().timed_out);

    drop(views);
    drop(handle);
    let machine = task.await.unwrap();
    assert_eq!(machine.session().unwrap().answers().len(), 1);
}

#[tokio::test]
async fn send_fails_once_loop_is_gone() {
    let (handle, task) = SessionLoop::spawn(build_machine());
    task.abort();
    let _ = task.await;

    assert!(matches!(
        handle.send(QuizIntent::Start),
        Err(SessionError::LoopClosed)
    ));
}
