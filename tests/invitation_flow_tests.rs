// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Tests for the login-to-invitation hand-off and invitation acceptance.

use mariage_client::models::{InvitationStatus, PendingInvitation, WeddingId};
use mariage_client::routes::{DashboardPage, NavState, Navigation, Route};
use mariage_client::services::invitations::MISSING_TOKEN_MESSAGE;
use mariage_client::services::{
    accept_from_link, go_to_wedding, AcceptOutcome, LinkOutcome, PendingInvitations,
};
use serde_json::json;
use std::sync::atomic::Ordering;

mod common;
use common::{
    create_test_app, signed_in_app, spawn_backend, EXPIRED_INVITATION, GOOD_CODE, GOOD_PASSWORD,
    INVITED_WEDDING_ID,
};

fn invitation_json(token: &str) -> serde_json::Value {
    json!({
        "invitation_token": token,
        "wedding_id": 5,
        "bride_name": "Julia",
        "groom_name": "Rafael",
        "relationship": "Maid of honor",
        "permission_level": "view",
    })
}

#[tokio::test]
async fn test_login_with_invitations_opens_invitation_screen() {
    let backend = spawn_backend().await;
    backend
        .state
        .set_pending_invitations(Some(json!([invitation_json("abc")])));
    let (app, _store) = create_test_app(&backend);

    let navigation = app
        .auth
        .login("maria@example.com", GOOD_PASSWORD)
        .await
        .unwrap();

    let expected: Vec<PendingInvitation> =
        serde_json::from_value(json!([invitation_json("abc")])).unwrap();
    assert_eq!(navigation.route(), &Route::PendingInvitations);
    assert_eq!(
        navigation.location.state,
        Some(NavState::Invitations(expected.clone()))
    );

    let screen = app.router.render().await.unwrap();
    assert_eq!(screen.route(), &Route::PendingInvitations);
    assert_eq!(screen.invitations(), Some(expected.as_slice()));
}

#[tokio::test]
async fn test_login_without_invitations_goes_to_selection() {
    for invitations in [None, Some(json!([]))] {
        let backend = spawn_backend().await;
        backend.state.set_pending_invitations(invitations.clone());
        let (app, store) = create_test_app(&backend);

        let navigation = app
            .auth
            .login("maria@example.com", GOOD_PASSWORD)
            .await
            .unwrap();

        assert_eq!(navigation.route(), &Route::SelectWedding, "{invitations:?}");
        assert!(navigation.location.state.is_none());
        assert!(store.raw().is_some());
    }
}

#[tokio::test]
async fn test_verify_email_hands_off_like_login() {
    let backend = spawn_backend().await;
    backend
        .state
        .set_pending_invitations(Some(json!([invitation_json("abc"), invitation_json("def")])));
    let (app, store) = create_test_app(&backend);

    let navigation = app
        .auth
        .verify_email("maria@example.com", GOOD_CODE)
        .await
        .unwrap();

    assert_eq!(navigation.route(), &Route::PendingInvitations);
    match navigation.location.state {
        Some(NavState::Invitations(invitations)) => assert_eq!(invitations.len(), 2),
        other => panic!("unexpected state: {other:?}"),
    }
    assert!(store.raw().is_some());
}

#[tokio::test]
async fn test_invitation_screen_without_state_redirects() {
    let backend = spawn_backend().await;
    let (app, _store) = signed_in_app(&backend);

    let screen = app
        .router
        .visit(Navigation::push(Route::PendingInvitations))
        .await
        .unwrap();

    assert_eq!(screen.route(), &Route::SelectWedding);
}

#[tokio::test]
async fn test_double_accept_sends_one_request() {
    let backend = spawn_backend().await;
    let (app, _store) = signed_in_app(&backend);
    let screen = app
        .router
        .visit(Navigation::push(Route::SelectWedding))
        .await
        .unwrap();
    let weddings = screen.weddings.unwrap();

    let invitations: Vec<PendingInvitation> =
        serde_json::from_value(json!([invitation_json("abc")])).unwrap();
    let page = PendingInvitations::new(app.api.clone(), weddings.clone(), invitations);

    let (first, second) = tokio::join!(page.accept("abc"), page.accept("abc"));
    let outcomes = [first.unwrap(), second.unwrap()];

    assert_eq!(
        outcomes
            .iter()
            .filter(|outcome| matches!(outcome, AcceptOutcome::Accepted(_)))
            .count(),
        1
    );
    assert!(outcomes.contains(&AcceptOutcome::AlreadyAccepted));
    assert_eq!(backend.state.accept_calls.load(Ordering::SeqCst), 1);
    assert_eq!(page.status("abc"), InvitationStatus::Accepted);
    assert!(!page.can_accept("abc"));

    // The joined wedding shows up after the automatic reload.
    let joined = WeddingId::new(INVITED_WEDDING_ID.to_string());
    assert!(weddings.weddings().iter().any(|w| w.wedding_id == joined));

    // A later click is still a no-op.
    assert_eq!(page.accept("abc").await.unwrap(), AcceptOutcome::AlreadyAccepted);
    assert_eq!(backend.state.accept_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_failed_accept_can_be_retried() {
    let backend = spawn_backend().await;
    let (app, _store) = signed_in_app(&backend);
    let weddings = std::sync::Arc::new(mariage_client::services::WeddingSelection::new(
        app.api.clone(),
    ));
    let page = PendingInvitations::new(app.api.clone(), weddings, Vec::new());

    let err = page.accept(EXPIRED_INVITATION).await.unwrap_err();
    assert_eq!(err.status(), Some(410));
    assert_eq!(err.user_message(), "Invitation expired");
    assert_eq!(page.status(EXPIRED_INVITATION), InvitationStatus::Pending);
    assert!(page.can_accept(EXPIRED_INVITATION));

    let _ = page.accept(EXPIRED_INVITATION).await;
    assert_eq!(backend.state.accept_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_continue_to_selection() {
    let backend = spawn_backend().await;
    backend
        .state
        .set_pending_invitations(Some(json!([invitation_json("abc")])));
    let (app, _store) = create_test_app(&backend);
    app.auth
        .login("maria@example.com", GOOD_PASSWORD)
        .await
        .unwrap();

    let screen = app.router.render().await.unwrap();
    let page = PendingInvitations::from_state(
        app.api.clone(),
        screen.weddings.clone().unwrap(),
        screen.location.state.as_ref(),
    )
    .expect("invitations in state");
    assert_eq!(page.invitations().len(), 1);

    page.continue_to_selection();
    let screen = app.router.render().await.unwrap();
    assert_eq!(screen.route(), &Route::SelectWedding);
}

#[tokio::test]
async fn test_link_without_token_fails_without_request() {
    let backend = spawn_backend().await;
    let (app, _store) = signed_in_app(&backend);
    let screen = app
        .router
        .visit(Navigation::push(Route::AcceptInvitation { token: None }))
        .await
        .unwrap();
    let weddings = screen.weddings.unwrap();

    for token in [None, Some(""), Some("   ")] {
        let outcome = accept_from_link(&app.api, &weddings, token).await;
        assert_eq!(
            outcome,
            LinkOutcome::Failed {
                message: MISSING_TOKEN_MESSAGE.to_string()
            }
        );
    }
    assert_eq!(backend.state.accept_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_link_accept_then_open_wedding() {
    let backend = spawn_backend().await;
    let (app, _store) = signed_in_app(&backend);
    let screen = app
        .router
        .visit(Navigation::push(Route::AcceptInvitation {
            token: Some("xyz".to_string()),
        }))
        .await
        .unwrap();
    let weddings = screen.weddings.unwrap();

    let outcome = accept_from_link(&app.api, &weddings, Some("xyz")).await;
    let LinkOutcome::Accepted { message, wedding_id } = outcome else {
        panic!("unexpected outcome: {outcome:?}");
    };
    assert_eq!(message, "Invitation accepted");
    let wedding_id = wedding_id.unwrap();

    go_to_wedding(&app.api, &weddings, &wedding_id);
    let screen = app.router.render().await.unwrap();

    assert_eq!(screen.route(), &Route::Dashboard(DashboardPage::Overview));
    let selected = screen.weddings.unwrap().selected().unwrap();
    assert_eq!(selected.wedding_id, wedding_id);
    assert!(!selected.can_edit());
}

#[tokio::test]
async fn test_link_accept_failure_message() {
    let backend = spawn_backend().await;
    let (app, _store) = signed_in_app(&backend);
    let weddings = mariage_client::services::WeddingSelection::new(app.api.clone());

    let outcome = accept_from_link(&app.api, &weddings, Some(EXPIRED_INVITATION)).await;

    assert_eq!(
        outcome,
        LinkOutcome::Failed {
            message: "Invitation expired".to_string()
        }
    );
}
