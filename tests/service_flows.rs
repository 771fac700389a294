//! End-to-end facade flows over stub collaborators.

mod common;

use common::{paged_script, view_script, write_script, OperationScript, StubClient, StubSigner};
use contract_adapter::services::{
    CollectibleService, GoalKind, GoalService, GoalStatus, GovernanceService,
    ParticipationService, ProjectService, RecognitionService, SchedulingService,
};
use contract_adapter::{AdapterConfig, AdapterError, CallMode, Signer, TimeInput};
use serde_json::json;
use std::sync::Arc;

fn config() -> AdapterConfig {
    AdapterConfig::default()
}

#[tokio::test]
async fn test_set_availability_submits_normalized_slots() {
    let client = StubClient::new().with_operation("set_availability", write_script("hash-1"));
    let service = SchedulingService::new(Arc::new(client.clone()), &config());
    let signer = StubSigner::new("GSRC1", "unused");

    let slots = vec![(
        TimeInput::Text("2024-01-01T09:00:00Z".to_string()),
        TimeInput::Numeric(1_704_103_200_000), // same day 10:00, in millis
    )];
    let written = service
        .set_availability("GVOL1", 1, &slots, Some(&signer as &dyn Signer))
        .await
        .unwrap();

    assert_eq!(written.tx_hash, "hash-1");
    assert!(written.success);

    let calls = client.calls_for("set_availability");
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].args["volunteer"], "GVOL1");
    assert_eq!(calls[0].args["day"], 1);
    assert_eq!(calls[0].args["time_slots"], json!([[1_704_099_600u32, 1_704_103_200u32]]));
}

#[tokio::test]
async fn test_misordered_slot_never_reaches_the_client() {
    let client = StubClient::new().with_operation("set_availability", write_script("hash-1"));
    let service = SchedulingService::new(Arc::new(client.clone()), &config());
    let signer = StubSigner::new("GSRC1", "unused");

    let slots = vec![(TimeInput::Seconds(100), TimeInput::Seconds(100))];
    let err = service
        .set_availability("GVOL1", 1, &slots, Some(&signer as &dyn Signer))
        .await
        .unwrap_err();

    assert!(matches!(err, AdapterError::InvalidInterval { .. }));
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn test_check_conflict_over_hour_windows() {
    // Existing window 09:00-10:00 on day 1 (seconds within the week).
    let client = StubClient::new().with_operation(
        "get_all_availability",
        view_script(json!({ "1": [[32_400, 36_000]] })),
    );
    let service = SchedulingService::new(Arc::new(client), &config());

    // 09:30-10:30 overlaps.
    let conflict = service
        .check_conflict("GVOL1", TimeInput::Seconds(34_200), TimeInput::Seconds(37_800))
        .await
        .unwrap();
    assert!(conflict);

    // 10:00-11:00 only shares the boundary.
    let conflict = service
        .check_conflict("GVOL1", TimeInput::Seconds(36_000), TimeInput::Seconds(39_600))
        .await
        .unwrap();
    assert!(!conflict);
}

#[tokio::test]
async fn test_remove_availability_sends_empty_slot_list() {
    let client = StubClient::new().with_operation("set_availability", write_script("hash-2"));
    let service = SchedulingService::new(Arc::new(client.clone()), &config());
    let signer = StubSigner::new("GSRC1", "unused");

    service
        .remove_availability("GVOL1", 3, Some(&signer as &dyn Signer))
        .await
        .unwrap();

    let calls = client.calls_for("set_availability");
    assert_eq!(calls[0].args["time_slots"], json!([]));
}

#[tokio::test]
async fn test_write_without_any_signer_is_rejected_locally() {
    let client = StubClient::new().with_operation("set_availability", write_script("hash-3"));
    let service = SchedulingService::new(Arc::new(client.clone()), &config());

    let err = service
        .remove_availability("GVOL1", 3, None)
        .await
        .unwrap_err();
    assert!(matches!(err, AdapterError::SignerRequired));
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn test_explicit_signer_takes_precedence_over_default() {
    // Manual-path-only binding makes the effective signer observable: the
    // returned hash is whatever the chosen signer produced.
    let script = OperationScript {
        payload: Some(json!({ "xdr": "EEEE-unsigned" })),
        ..OperationScript::default()
    };
    let client = StubClient::new().with_operation("set_availability", script);
    let default_signer = Arc::new(StubSigner::new("GDEF1", "hash-default"));
    let service = SchedulingService::new(Arc::new(client), &config())
        .with_default_signer(default_signer.clone());

    let explicit = StubSigner::new("GEXP1", "hash-explicit");
    let written = service
        .remove_availability("GVOL1", 0, Some(&explicit as &dyn Signer))
        .await
        .unwrap();
    assert_eq!(written.tx_hash, "hash-explicit");
    assert!(default_signer.sent().is_empty());

    // And without an explicit signer the default signs.
    let written = service.remove_availability("GVOL1", 0, None).await.unwrap();
    assert_eq!(written.tx_hash, "hash-default");
}

#[tokio::test]
async fn test_create_proposal_previews_id_then_commits() {
    let script = OperationScript {
        simulate: Some(json!({ "result": 7 })),
        sign_and_send: Some(json!({ "hash": "hash-p" })),
        ..OperationScript::default()
    };
    let client = StubClient::new().with_operation("create_proposal", script);
    let service = GovernanceService::new(Arc::new(client.clone()), &config());
    let signer = StubSigner::new("GSRC1", "unused");

    let result = service
        .create_proposal(
            "GCREATOR1",
            "Budget 2024",
            "Allocate the community budget",
            &["approve".to_string(), "reject".to_string()],
            TimeInput::Text("2024-06-01".to_string()),
            Some(&signer as &dyn Signer),
        )
        .await
        .unwrap();

    assert_eq!(result.id, Some(7));
    assert_eq!(result.tx_hash, "hash-p");
    assert!(result.success);

    // Preview prepared once, commit prepared once.
    let calls = client.calls_for("create_proposal");
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].mode, CallMode::Execute);
    assert_eq!(calls[1].args["deadline"], json!(1_717_200_000u64));
}

#[tokio::test]
async fn test_create_proposal_requires_two_options() {
    let client = StubClient::new().with_operation("create_proposal", write_script("h"));
    let service = GovernanceService::new(Arc::new(client.clone()), &config());
    let signer = StubSigner::new("GSRC1", "unused");

    let err = service
        .create_proposal(
            "GCREATOR1",
            "t",
            "d",
            &["only-one".to_string()],
            TimeInput::Seconds(1),
            Some(&signer as &dyn Signer),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AdapterError::OutOfRange { .. }));
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn test_vote_and_status_round_trip() {
    let client = StubClient::new()
        .with_operation("vote", write_script("hash-v"))
        .with_operation("get_proposal_status", view_script(json!({"result": "Open"})))
        .with_operation(
            "get_votes",
            view_script(json!({"result": [{"voter": "GVOTER1", "option_id": 1}]})),
        );
    let service = GovernanceService::new(Arc::new(client), &config());
    let signer = StubSigner::new("GSRC1", "unused");

    let written = service
        .vote("GVOTER1", 7, 1, Some(&signer as &dyn Signer))
        .await
        .unwrap();
    assert_eq!(written.tx_hash, "hash-v");

    assert_eq!(service.get_proposal_status(7).await.unwrap(), "Open");

    let votes = service.get_votes(7).await.unwrap();
    assert_eq!(votes.len(), 1);
    assert_eq!(votes[0].voter.as_deref(), Some("GVOTER1"));
    assert_eq!(votes[0].option_id, Some(1));
}

#[tokio::test]
async fn test_complete_goal_submits_only_the_remaining_amount() {
    let client = StubClient::new()
        .with_operation(
            "get_goal",
            view_script(json!({
                "id": 4,
                "volunteer": "GVOL1",
                "goal_type": "TasksCompleted",
                "target_amount": 10,
                "current_amount": 4,
                "is_completed": false,
            })),
        )
        .with_operation("update_progress", write_script("hash-g"));
    let service = GoalService::new(Arc::new(client.clone()), &config());
    let signer = StubSigner::new("GSRC1", "unused");

    let written = service
        .complete_goal("GVOL1", 4, Some(&signer as &dyn Signer))
        .await
        .unwrap()
        .expect("goal was incomplete");
    assert_eq!(written.tx_hash, "hash-g");

    let calls = client.calls_for("update_progress");
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].args["amount_to_add"], 6);
}

#[tokio::test]
async fn test_complete_goal_on_finished_goal_submits_nothing() {
    let client = StubClient::new()
        .with_operation(
            "get_goal",
            view_script(json!({
                "id": 4,
                "target_amount": 10,
                "current_amount": 10,
                "is_completed": true,
            })),
        )
        .with_operation("update_progress", write_script("hash-g"));
    let service = GoalService::new(Arc::new(client.clone()), &config());
    let signer = StubSigner::new("GSRC1", "unused");

    let outcome = service
        .complete_goal("GVOL1", 4, Some(&signer as &dyn Signer))
        .await
        .unwrap();
    assert!(outcome.is_none());
    assert!(client.calls_for("update_progress").is_empty());
}

#[tokio::test]
async fn test_goal_status_and_unsupported_delete() {
    let client = StubClient::new().with_operation(
        "get_goal",
        view_script(json!({"id": 1, "target_amount": 5, "current_amount": 5, "is_completed": true})),
    );
    let service = GoalService::new(Arc::new(client), &config());

    assert_eq!(service.get_goal_status(1).await.unwrap(), GoalStatus::Completed);
    assert!(matches!(
        service.delete_goal("GVOL1", 1, None).await.unwrap_err(),
        AdapterError::Unsupported(_)
    ));
}

#[tokio::test]
async fn test_create_goal_previews_id() {
    let script = OperationScript {
        simulate: Some(json!(11)),
        sign_and_send: Some(json!({ "hash": "hash-cg" })),
        ..OperationScript::default()
    };
    let client = StubClient::new().with_operation("create_goal", script);
    let service = GoalService::new(Arc::new(client.clone()), &config());
    let signer = StubSigner::new("GSRC1", "unused");

    let result = service
        .create_goal(
            "GVOL1",
            "Plant trees",
            "Plant 10 trees this month",
            GoalKind::TasksCompleted,
            10,
            TimeInput::Seconds(1_717_200_000),
            Some(&signer as &dyn Signer),
        )
        .await
        .unwrap();
    assert_eq!(result.id, Some(11));
    assert_eq!(result.tx_hash, "hash-cg");

    let calls = client.calls_for("create_goal");
    assert_eq!(calls[0].args["goal_type"], "TasksCompleted");
    // Title and deadline are validated but not part of the contract surface.
    assert!(calls[0].args.get("title").is_none());
}

#[tokio::test]
async fn test_project_facade_follows_the_bounty_variant() {
    // A deployment exposing only the bounty-flavored surface.
    let client = StubClient::new()
        .with_operation("create_bounty", write_script("hash-pb"))
        .with_operation("withdraw_reward", write_script("hash-wr"));
    let service = ProjectService::new(Arc::new(client.clone()), &config());
    let signer = StubSigner::new("GSRC1", "unused");

    let result = service
        .create_project(
            "GORG1",
            "Cleanup",
            "Beach cleanup",
            100,
            TimeInput::Seconds(1_717_200_000),
            &["collect".to_string(), "sort".to_string()],
            Some(&signer as &dyn Signer),
        )
        .await
        .unwrap();
    assert_eq!(result.tx_hash, "hash-pb");
    // The bounty variant previews no id.
    assert_eq!(result.id, None);

    let calls = client.calls_for("create_bounty");
    let properties = &calls[0].args["bounty_properties"];
    assert_eq!(properties["owner"], "GORG1");
    assert_eq!(properties["tasks"][0]["description"], "collect");

    let written = service
        .finalize_project("GORG1", 1, Some(&signer as &dyn Signer))
        .await
        .unwrap();
    assert_eq!(written.tx_hash, "hash-wr");
    let calls = client.calls_for("withdraw_reward");
    assert_eq!(calls[0].args["trustline"], "GORG1");

    // Operations the bounty surface cannot express fail with the full
    // candidate list.
    let err = service
        .join_project("GVOL1", 1, Some(&signer as &dyn Signer))
        .await
        .unwrap_err();
    match err {
        AdapterError::MethodNotFound { tried } => assert_eq!(tried, vec!["join_project"]),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_project_reads_decode_tolerantly() {
    let client = StubClient::new()
        .with_operation(
            "get_project",
            view_script(json!({
                "id": 5,
                "organizer": "GORG1",
                "name": "Cleanup",
                "volunteer_goal": 100,
                "milestones": [{"id": 0, "title": "collect", "completed": true}],
            })),
        )
        .with_operation("get_volunteers", view_script(json!(["GVOL1", "GVOL2"])));
    let service = ProjectService::new(Arc::new(client), &config());

    let project = service.get_project(5).await.unwrap();
    assert_eq!(project.name.as_deref(), Some("Cleanup"));
    assert_eq!(project.milestones.len(), 1);
    assert!(project.milestones[0].completed);

    let volunteers = service.get_volunteers(5).await.unwrap();
    assert_eq!(volunteers, vec!["GVOL1", "GVOL2"]);
}

#[tokio::test]
async fn test_mint_previews_token_id() {
    let script = OperationScript {
        simulate: Some(json!(42)),
        sign_and_send: Some(json!({ "hash": "hash-m" })),
        ..OperationScript::default()
    };
    let client = StubClient::new().with_operation("mint", script);
    let service = CollectibleService::new(Arc::new(client), &config());
    let signer = StubSigner::new("GSRC1", "unused");

    let minted = service
        .mint("GOWNER1", "ipfs://metadata", Some(&signer as &dyn Signer))
        .await
        .unwrap();
    assert_eq!(minted.id, Some(42));
    assert_eq!(minted.tx_hash, "hash-m");
}

#[tokio::test]
async fn test_token_reads_normalize_field_aliases() {
    let client = StubClient::new()
        .with_operation(
            "get_token",
            view_script(json!({"address": "GOWNER1", "uri": "ipfs://x"})),
        )
        .with_operation("total_supply", view_script(json!({"result": 3})))
        .with_operation("tokens_of_owner", view_script(json!([1, 2, 3])));
    let service = CollectibleService::new(Arc::new(client), &config());

    let token = service.get_token(9).await.unwrap();
    assert_eq!(token.id, 9);
    assert_eq!(token.owner, "GOWNER1");
    assert_eq!(token.metadata, "ipfs://x");

    assert_eq!(service.total_supply().await.unwrap(), 3);
    assert_eq!(service.tokens_of_owner("GOWNER1").await.unwrap(), vec![1, 2, 3]);
}

#[tokio::test]
async fn test_participation_count_paginates_to_exhaustion() {
    let pages = vec![
        vec![json!({"task_id": "1"}), json!({"task_id": "2"})],
        vec![json!({"task_id": "3"}), json!({"task_id": "4"})],
        vec![json!({"task_id": "5"})],
    ];
    let client = StubClient::new().with_operation("get_volunteer_participations", paged_script(pages));

    let mut config = config();
    config.paging.limit = 2;
    let service = ParticipationService::new(Arc::new(client.clone()), &config);

    assert_eq!(service.participation_count("GVOL1").await.unwrap(), 5);
    // Exactly three pages were fetched.
    assert_eq!(client.calls_for("get_volunteer_participations").len(), 3);
}

#[tokio::test]
async fn test_event_participants_accepts_both_item_shapes() {
    let pages = vec![vec![json!("GVOL1"), json!({"volunteer": "GVOL2"})]];
    let client = StubClient::new().with_operation("get_task_volunteers", paged_script(pages));

    let mut config = config();
    config.paging.limit = 10;
    let service = ParticipationService::new(Arc::new(client), &config);

    let participants = service.event_participants(42).await.unwrap();
    assert_eq!(participants, vec!["GVOL1", "GVOL2"]);
}

#[tokio::test]
async fn test_record_and_verify_participation() {
    let client = StubClient::new()
        .with_operation("register_participation", write_script("hash-rp"))
        .with_operation("verify_participation", view_script(json!({"result": true})));
    let service = ParticipationService::new(Arc::new(client.clone()), &config());
    let signer = StubSigner::new("GSRC1", "unused");

    let written = service
        .record_participation("GORG1", "GVOL1", 42, Some(&signer as &dyn Signer))
        .await
        .unwrap();
    assert_eq!(written.tx_hash, "hash-rp");

    let calls = client.calls_for("register_participation");
    assert_eq!(calls[0].args["organization"], "GORG1");
    assert_eq!(calls[0].args["task_id"], "42");
    assert_eq!(calls[0].args["task_name"], "Event 42");

    assert!(service.verify_participation("GVOL1", 42).await.unwrap());
}

#[tokio::test]
async fn test_missing_certificate_is_none() {
    let client = StubClient::new()
        .with_operation("get_participation_details", view_script(json!({"tag": "none"})));
    let service = ParticipationService::new(Arc::new(client), &config());

    let certificate = service.get_certificate("GVOL1", 42).await.unwrap();
    assert!(certificate.is_none());
}

#[tokio::test]
async fn test_give_recognition_writes_through_the_register_operation() {
    let client = StubClient::new().with_operation("register_participation", write_script("hash-r"));
    let service = RecognitionService::new(Arc::new(client.clone()), &config());
    let signer = StubSigner::new("GSRC1", "unused");

    let result = service
        .give_recognition("GORG1", "GVOL1", "Outstanding help at the shelter", Some(&signer as &dyn Signer))
        .await
        .unwrap();
    assert_eq!(result.tx_hash, "hash-r");

    let calls = client.calls_for("register_participation");
    assert_eq!(calls[0].args["organization"], "GORG1");
    assert_eq!(calls[0].args["volunteer"], "GVOL1");
    assert_eq!(calls[0].args["task_name"], "Outstanding help at the shelter");
}

#[tokio::test]
async fn test_received_recognitions_decode_in_listing_order() {
    let pages = vec![vec![
        json!({"organization": "GORG1", "volunteer": "GVOL1", "task_name": "thanks", "timestamp": 10}),
        json!({"organization": "GORG2", "volunteer": "GVOL1", "task_name": "kudos", "timestamp": 20}),
    ]];
    let client = StubClient::new().with_operation("get_volunteer_participations", paged_script(pages));
    let service = RecognitionService::new(Arc::new(client), &config());

    let records = service.get_received_recognitions("GVOL1").await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id, 0);
    assert_eq!(records[1].id, 1);
    assert_eq!(records[0].message, "thanks");
    assert_eq!(records[1].sender, "GORG2");

    assert_eq!(service.get_total_recognitions("GVOL1").await.unwrap(), 2);
}

#[tokio::test]
async fn test_read_failures_propagate_as_typed_errors() {
    // The unified policy: no facade swallows a failed read into an empty
    // collection.
    let client = StubClient::new()
        .with_operation("get_votes", view_script(json!({"error": "storage miss"})));
    let service = GovernanceService::new(Arc::new(client), &config());

    let err = service.get_votes(1).await.unwrap_err();
    assert!(matches!(err, AdapterError::Client(_)));
}
