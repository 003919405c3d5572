use std::sync::Barrier;
use std::thread;

use super::common::*;
use crate::workflows::placement::ids::SupervisorId;
use crate::workflows::placement::supervision::{SupervisionDecision, SupervisionStatus};
use crate::workflows::placement::PlacementError;

#[test]
fn concurrent_acceptances_for_the_last_slot_admit_exactly_one() {
    for _ in 0..25 {
        let harness = Harness::new();
        harness.directory.add_supervisor(supervisor("sup-one", Some(1)));
        let controller = harness.controller();
        let supervisor_id = SupervisorId::new("sup-one");
        let first = request(&harness, BEA, "sup-one");
        let second = request(&harness, CAM, "sup-one");
        let barrier = Barrier::new(2);

        let outcomes = thread::scope(|scope| {
            let handles: Vec<_> = [&first, &second]
                .into_iter()
                .map(|filed| {
                    let controller = &controller;
                    let barrier = &barrier;
                    let supervisor_id = &supervisor_id;
                    scope.spawn(move || {
                        barrier.wait();
                        controller.respond(
                            &filed.id,
                            supervisor_id,
                            SupervisionDecision::Accepted,
                            None,
                        )
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().expect("thread completes"))
                .collect::<Vec<_>>()
        });

        let accepted = outcomes.iter().filter(|outcome| outcome.is_ok()).count();
        assert_eq!(accepted, 1, "exactly one acceptance lands: {outcomes:?}");
        let refused = outcomes
            .iter()
            .filter(|outcome| {
                matches!(
                    outcome,
                    Err(PlacementError::CapacityExceeded { max_students: 1, .. })
                )
            })
            .count();
        assert_eq!(refused, 1, "the loser sees the capacity error: {outcomes:?}");

        let capacity = controller.capacity(&supervisor_id).expect("capacity");
        assert_eq!(capacity.accepted, 1);
        assert_eq!(capacity.remaining, 0);

        let still_pending = [&first, &second]
            .into_iter()
            .filter(|filed| {
                controller.request(&filed.id).expect("fetch").status == SupervisionStatus::Pending
            })
            .count();
        assert_eq!(still_pending, 1, "the refused request stays pending");
    }
}

#[test]
fn one_student_accepted_by_two_supervisors_at_once_keeps_a_single_supervisor() {
    let harness = Harness::new();
    let controller = harness.controller();
    let now = chrono::Utc::now();
    let to_lee = crate::workflows::placement::supervision::SupervisionRequest::new(
        crate::workflows::placement::RequestId::new("sup-req-race-lee"),
        &student(BEA, None),
        &supervisor(LEE, None),
        now,
    );
    let to_khan = crate::workflows::placement::supervision::SupervisionRequest::new(
        crate::workflows::placement::RequestId::new("sup-req-race-khan"),
        &student(BEA, None),
        &supervisor(KHAN, Some(2)),
        now,
    );
    harness
        .requests
        .seed([to_lee.clone(), to_khan.clone()])
        .expect("seed");
    let barrier = Barrier::new(2);

    let outcomes = thread::scope(|scope| {
        let lee = scope.spawn(|| {
            barrier.wait();
            controller.respond(
                &to_lee.id,
                &SupervisorId::new(LEE),
                SupervisionDecision::Accepted,
                None,
            )
        });
        let khan = scope.spawn(|| {
            barrier.wait();
            controller.respond(
                &to_khan.id,
                &SupervisorId::new(KHAN),
                SupervisionDecision::Accepted,
                None,
            )
        });
        [
            lee.join().expect("thread completes"),
            khan.join().expect("thread completes"),
        ]
    });

    assert_eq!(outcomes.iter().filter(|outcome| outcome.is_ok()).count(), 1);
    assert!(outcomes.iter().any(|outcome| matches!(
        outcome,
        Err(PlacementError::AlreadyAssigned(_)) | Err(PlacementError::RequestNotFound { .. })
    )));
    let accepted = controller
        .requests_for_student(&crate::workflows::placement::StudentId::new(BEA))
        .expect("list")
        .into_iter()
        .filter(|request| request.status == SupervisionStatus::Accepted)
        .count();
    assert_eq!(accepted, 1);
}
