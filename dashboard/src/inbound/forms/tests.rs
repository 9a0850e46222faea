//! Form controller behaviour: validation gating, error mapping and the
//! post-registration redirect.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use rstest::rstest;
use tokio::sync::mpsc;
use tokio::time::timeout;

use super::*;
use crate::domain::ports::MockIdentityService;
use crate::domain::{FieldError, FormField, Identity, Profile, SessionState, SessionStore, UserId};

fn ana() -> Identity {
    Identity::new(UserId::random(), "a@b.com").with_name("Ana")
}

fn store(mock: MockIdentityService) -> SessionStore {
    SessionStore::new(Arc::new(mock))
}

fn filled_sign_up() -> SignUpForm {
    let mut form = SignUpForm::new();
    form.set_field(FormField::Name, "Ana Souza");
    form.set_field(FormField::Email, "a@b.com");
    form.set_field(FormField::Password, "123456");
    form.set_field(FormField::ConfirmPassword, "123456");
    form
}

#[tokio::test]
async fn invalid_sign_in_never_reaches_the_service() {
    let mut mock = MockIdentityService::new();
    mock.expect_authenticate().never();
    let store = store(mock);
    let mut form = SignInForm::new();
    form.set_email("");
    form.set_password("abc");

    let outcome = form.submit(&store).await;

    assert_eq!(outcome, SubmitOutcome::Invalid);
    assert_eq!(form.phase(), FormPhase::Idle);
    assert_eq!(form.error(), None);
    assert_eq!(form.field_errors().len(), 2);
    assert_eq!(
        form.field_errors().get(FormField::Email),
        Some(FieldError::Required)
    );
    assert_eq!(
        form.field_errors().message(FormField::Password).as_deref(),
        Some("Senha deve ter no mínimo 6 caracteres")
    );
}

#[tokio::test]
async fn successful_sign_in_authenticates_the_store() {
    let mut mock = MockIdentityService::new();
    mock.expect_authenticate().times(1).returning(|_| Ok(ana()));
    mock.expect_fetch_profile()
        .returning(|_| Ok(Profile::new("Ana", "a@b.com")));
    let store = store(mock);
    let mut form = SignInForm::new();
    form.set_email("a@b.com");
    form.set_password("123456");

    let outcome = form.submit(&store).await;

    assert_eq!(outcome, SubmitOutcome::SignedIn);
    assert_eq!(form.error(), None);
    assert!(!form.is_busy());
    let state = store.state();
    assert_eq!(state.session().map(|s| s.display_name()), Some("Ana"));
}

#[tokio::test]
async fn failed_then_successful_sign_in_clears_the_error() {
    let mut mock = MockIdentityService::new();
    let mut attempts = 0;
    mock.expect_authenticate().times(2).returning(move |_| {
        attempts += 1;
        if attempts == 1 {
            Err(IdentityServiceError::rejected("Invalid login credentials"))
        } else {
            Ok(ana())
        }
    });
    mock.expect_fetch_profile()
        .returning(|_| Ok(Profile::new("Ana", "a@b.com")));
    let store = store(mock);
    let mut form = SignInForm::new();
    form.set_email("a@b.com");
    form.set_password("123456");

    assert_eq!(form.submit(&store).await, SubmitOutcome::Failed);
    assert_eq!(form.error(), Some("Invalid login credentials"));
    assert_eq!(store.state(), SessionState::Loading);

    assert_eq!(form.submit(&store).await, SubmitOutcome::SignedIn);
    assert_eq!(form.error(), None);
    assert!(form.field_errors().is_empty());
    assert!(store.state().is_authenticated());
}

#[rstest]
#[case::empty("")]
#[case::blank("   ")]
#[tokio::test]
async fn messageless_failures_use_the_fallback(#[case] message: &'static str) {
    let mut mock = MockIdentityService::new();
    mock.expect_authenticate()
        .returning(move |_| Err(IdentityServiceError::transport(message)));
    mock.expect_create_account()
        .returning(move |_| Err(IdentityServiceError::transport(message)));
    let store = store(mock);

    let mut sign_in = SignInForm::new();
    sign_in.set_email("a@b.com");
    sign_in.set_password("123456");
    sign_in.submit(&store).await;
    assert_eq!(sign_in.error(), Some(SIGN_IN_FALLBACK));

    let mut sign_up = filled_sign_up();
    let outcome = sign_up.submit(&store, || {}).await;
    assert_eq!(outcome, SubmitOutcome::Failed);
    assert_eq!(sign_up.phase(), FormPhase::Idle);
    assert_eq!(sign_up.error(), Some(SIGN_UP_FALLBACK));
}

#[test]
fn editing_clears_only_the_edited_field() {
    let mut form = SignUpForm::new();
    form.set_field(FormField::Password, "abc");
    form.set_field(FormField::ConfirmPassword, "abd");
    assert_eq!(form.begin_submit().expect_err("invalid"), SubmitOutcome::Invalid);
    assert_eq!(form.field_errors().len(), 4);

    form.set_field(FormField::Email, "a@b.com");

    assert_eq!(form.field_errors().get(FormField::Email), None);
    assert_eq!(
        form.field_errors().get(FormField::Name),
        Some(FieldError::Required)
    );
    assert_eq!(
        form.field_errors().get(FormField::Password),
        Some(FieldError::TooShort { min: 6 })
    );
    assert_eq!(
        form.field_errors().get(FormField::ConfirmPassword),
        Some(FieldError::Mismatch)
    );
}

#[test]
fn second_submit_is_rejected_while_in_flight() {
    let mut form = SignInForm::new();
    form.set_email("a@b.com");
    form.set_password("123456");

    let credentials = form.begin_submit().expect("valid form");
    assert_eq!(credentials.email(), "a@b.com");
    assert!(form.is_busy());
    assert_eq!(form.submit_label(), "Entrando...");

    assert_eq!(form.begin_submit().expect_err("busy"), SubmitOutcome::Busy);
    form.set_email("other@b.com");
    assert_eq!(form.input().email, "a@b.com");

    let outcome = form.complete_sign_in(Err(IdentityServiceError::timeout("deadline")));
    assert_eq!(outcome, SubmitOutcome::Failed);
    assert_eq!(form.phase(), FormPhase::Idle);
    assert_eq!(form.submit_label(), "Entrar");
}

#[rstest]
#[case::success(Ok(ana()))]
#[case::failure(Err(IdentityServiceError::rejected("Invalid login credentials")))]
fn sign_in_answer_without_a_request_is_ignored(
    #[case] result: Result<Identity, IdentityServiceError>,
) {
    let mut form = SignInForm::new();
    form.set_email("a@b.com");

    assert_eq!(form.complete_sign_in(result), SubmitOutcome::Busy);
    assert_eq!(form.phase(), FormPhase::Idle);
    assert_eq!(form.error(), None);
}

#[tokio::test(start_paused = true)]
async fn registration_answer_applies_only_while_submitting() {
    let fired = Arc::new(AtomicUsize::new(0));
    let counter = |fired: &Arc<AtomicUsize>| {
        let fired = Arc::clone(fired);
        move || {
            fired.fetch_add(1, Ordering::SeqCst);
        }
    };
    let mut form = filled_sign_up();

    assert_eq!(
        form.complete_sign_up(Ok(ana()), counter(&fired)),
        SubmitOutcome::Busy
    );
    assert_eq!(form.phase(), FormPhase::Idle);

    form.begin_submit().expect("valid form");
    assert_eq!(
        form.complete_sign_up(Ok(ana()), counter(&fired)),
        SubmitOutcome::AccountCreated
    );
    assert_eq!(
        form.complete_sign_up(Ok(ana()), counter(&fired)),
        SubmitOutcome::Busy
    );

    tokio::time::sleep(REDIRECT_DELAY + Duration::from_millis(100)).await;
    tokio::task::yield_now().await;
    assert_eq!(fired.load(Ordering::SeqCst), 1);
    assert!(form.is_success());
}

#[tokio::test]
async fn reset_returns_a_finished_registration_to_idle() {
    let mut mock = MockIdentityService::new();
    mock.expect_create_account().times(1).returning(|_| Ok(ana()));
    let store = store(mock);
    let mut form = filled_sign_up();
    form.submit(&store, || {}).await;
    assert!(form.is_success());

    form.reset();

    assert_eq!(form.phase(), FormPhase::Idle);
    assert_eq!(form.submit_label(), "Cadastrar");
    assert_eq!(form.input().name, "");
    assert!(form.field_errors().is_empty());
    form.set_field(FormField::Name, "Outro Nome");
    assert_eq!(form.input().name, "Outro Nome");
}

#[tokio::test(start_paused = true)]
async fn registration_redirects_once_after_two_seconds() {
    let mut mock = MockIdentityService::new();
    mock.expect_create_account().times(1).returning(|_| Ok(ana()));
    mock.expect_authenticate().never();
    let store = store(mock);
    let (fired_tx, mut fired_rx) = mpsc::unbounded_channel();
    let mut form = filled_sign_up();

    let outcome = form
        .submit(&store, move || {
            fired_tx.send(()).expect("redirect receiver alive");
        })
        .await;

    assert_eq!(outcome, SubmitOutcome::AccountCreated);
    assert!(form.is_success());
    assert_eq!(form.submit_label(), "Cadastrado!");
    assert_eq!(store.state(), SessionState::Loading);
    assert!(
        timeout(Duration::from_millis(1999), fired_rx.recv())
            .await
            .is_err(),
        "redirect must wait the full delay"
    );
    assert_eq!(
        timeout(Duration::from_millis(2), fired_rx.recv()).await,
        Ok(Some(()))
    );
    assert_eq!(fired_rx.recv().await, None, "redirect fires exactly once");
}

#[tokio::test]
async fn success_freezes_the_registration_form() {
    let mut mock = MockIdentityService::new();
    mock.expect_create_account().times(1).returning(|_| Ok(ana()));
    let store = store(mock);
    let mut form = filled_sign_up();
    form.submit(&store, || {}).await;

    form.set_field(FormField::Name, "Outro Nome");
    assert_eq!(form.input().name, "Ana Souza");
    assert_eq!(form.submit(&store, || {}).await, SubmitOutcome::Busy);
}
