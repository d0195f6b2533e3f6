mod common;

use std::collections::HashSet;
use std::sync::{Arc, Barrier};
use std::thread;

use pollbox::core::{BrokerError, BrokerReply, FileMessageHandler, RequestIdentity, RequestKey};
use crate::common::{answer, broker_in, file_names, folder_to_use, write_raw_response};

#[test]
fn response_is_consumed_exactly_once() {
    let dir = folder_to_use();
    let (handler, broker) = broker_in(dir.path());

    let key = broker
        .create_request(&RequestIdentity::new("GET", "/reports/42"))
        .unwrap();
    assert_eq!(
        broker.get_response(&key).unwrap(),
        BrokerReply::Status { status_code: 204 },
        "nothing answered yet"
    );

    answer(&handler, &key, 200, "report body");

    assert_eq!(
        broker.get_response(&key).unwrap(),
        BrokerReply::Content {
            status_code: 200,
            body: "report body".into()
        }
    );
    assert_eq!(
        broker.get_response(&key).unwrap(),
        BrokerReply::Status { status_code: 204 },
        "second poll after consumption finds nothing"
    );
    assert!(file_names(dir.path()).is_empty());
}

#[test]
fn unknown_key_is_not_ready_rather_than_an_error() {
    let dir = folder_to_use();
    let (_handler, broker) = broker_in(dir.path());
    let key = RequestKey::parse("0123456789abcdef0123456789abcdef").unwrap();

    assert_eq!(
        broker.get_response(&key).unwrap(),
        BrokerReply::Status { status_code: 204 }
    );
}

#[test]
fn same_method_and_path_share_one_slot() {
    let dir = folder_to_use();
    let (handler, broker) = broker_in(dir.path());
    let identity = RequestIdentity::new("GET", "/api/Broker/Get1");

    // Caller A and caller B register the same logical request.
    let key_a = broker.create_request(&identity).unwrap();
    let key_b = broker.create_request(&identity).unwrap();
    assert_eq!(key_a, key_b);
    assert_eq!(key_a.as_str(), "af2be560b799f81365712633d91a1528");
    assert_eq!(file_names(dir.path()), vec![format!("{}.req", key_a)]);

    answer(&handler, &key_a, 200, "meant for A");

    // B polls first and takes A's answer.
    assert_eq!(
        broker.get_response(&key_b).unwrap(),
        BrokerReply::Content {
            status_code: 200,
            body: "meant for A".into()
        }
    );
    // A is left with nothing.
    assert_eq!(
        broker.get_response(&key_a).unwrap(),
        BrokerReply::Status { status_code: 204 }
    );
}

#[test]
fn malformed_record_reports_internal_error_and_stays() {
    let dir = folder_to_use();
    let (_handler, broker) = broker_in(dir.path());
    let key = broker
        .create_request(&RequestIdentity::new("POST", "/api/Broker/Post1"))
        .unwrap();
    write_raw_response(dir.path(), key.as_str(), "OK\nnot a status code");

    for _ in 0..2 {
        assert_eq!(
            broker.get_response(&key).unwrap(),
            BrokerReply::Status { status_code: 500 }
        );
    }
    assert_eq!(
        file_names(dir.path()),
        vec![format!("{}.req", key), format!("{}.resp", key)]
    );
}

#[test]
fn empty_body_answer_collapses_to_status_only() {
    let dir = folder_to_use();
    let (handler, broker) = broker_in(dir.path());
    let key = broker
        .create_request(&RequestIdentity::new("DELETE", "/items/9"))
        .unwrap();
    answer(&handler, &key, 202, "");

    assert_eq!(
        broker.get_response(&key).unwrap(),
        BrokerReply::Status { status_code: 202 }
    );
    // Consumed all the same.
    assert!(file_names(dir.path()).is_empty());
}

#[test]
fn blank_key_never_reaches_storage() {
    let dir = folder_to_use();
    let (_handler, _broker) = broker_in(dir.path());

    assert!(matches!(RequestKey::parse("   "), Err(BrokerError::EmptyKey)));
    assert!(file_names(dir.path()).is_empty());
}

#[test]
fn concurrent_creates_for_distinct_pairs_all_land() {
    let dir = folder_to_use();
    let (handler, broker) = broker_in(dir.path());
    let broker = Arc::new(broker);
    let n = 32;

    let keys: Vec<RequestKey> = thread::scope(|s| {
        let handles: Vec<_> = (0..n)
            .map(|i| {
                let broker = Arc::clone(&broker);
                s.spawn(move || {
                    broker
                        .create_request(&RequestIdentity::new("GET", format!("/items/{}", i)))
                        .unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let distinct: HashSet<_> = keys.iter().cloned().collect();
    assert_eq!(distinct.len(), n);
    assert_eq!(handler.pending_requests().unwrap().len(), n);

    for (i, key) in keys.iter().enumerate() {
        answer(&handler, key, 200, &format!("item {}", i));
    }
    for (i, key) in keys.iter().enumerate() {
        assert_eq!(
            broker.get_response(key).unwrap(),
            BrokerReply::Content {
                status_code: 200,
                body: format!("item {}", i)
            }
        );
    }
    assert!(file_names(dir.path()).is_empty());
}

#[test]
fn simultaneous_pollers_on_one_key_get_one_answer() {
    let dir = folder_to_use();
    let (handler, broker) = broker_in(dir.path());
    let broker = Arc::new(broker);
    let key = broker
        .create_request(&RequestIdentity::new("GET", "/contended"))
        .unwrap();
    answer(&handler, &key, 200, "only once");

    let pollers = 16;
    let barrier = Arc::new(Barrier::new(pollers));
    let replies: Vec<BrokerReply> = thread::scope(|s| {
        let handles: Vec<_> = (0..pollers)
            .map(|_| {
                let broker = Arc::clone(&broker);
                let barrier = Arc::clone(&barrier);
                let key = key.clone();
                s.spawn(move || {
                    barrier.wait();
                    broker.get_response(&key).unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let delivered = replies
        .iter()
        .filter(|r| matches!(r, BrokerReply::Content { .. }))
        .count();
    assert_eq!(delivered, 1, "replies: {:?}", replies);
    assert!(replies
        .iter()
        .all(|r| r.status_code() == 200 || r.status_code() == 204));
}

#[test]
fn interleaved_traffic_delivers_every_answer_once() {
    let dir = folder_to_use();
    let (handler, broker) = broker_in(dir.path());
    let broker = Arc::new(broker);
    let workers = 8;
    let per_worker = 10;

    // Each worker registers its own keys, answers them as the backend and
    // polls them back while the other workers do the same.
    let delivered: usize = thread::scope(|s| {
        let handles: Vec<_> = (0..workers)
            .map(|w| {
                let broker = Arc::clone(&broker);
                let handler = Arc::clone(&handler);
                s.spawn(move || {
                    let mut got = 0;
                    for i in 0..per_worker {
                        let identity = RequestIdentity::new("PUT", format!("/w{}/job{}", w, i));
                        let key = broker.create_request(&identity).unwrap();
                        answer(&handler, &key, 200, &format!("{}-{}", w, i));
                        match broker.get_response(&key).unwrap() {
                            BrokerReply::Content { body, .. } => {
                                assert_eq!(body, format!("{}-{}", w, i));
                                got += 1;
                            }
                            other => panic!("expected content, got {:?}", other),
                        }
                        assert_eq!(
                            broker.get_response(&key).unwrap(),
                            BrokerReply::Status { status_code: 204 }
                        );
                    }
                    got
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).sum()
    });

    assert_eq!(delivered, workers * per_worker);
    assert!(file_names(dir.path()).is_empty());
}

#[test]
fn missing_storage_directory_is_fatal() {
    let dir = folder_to_use();
    let missing = dir.path().join("BrokerFolder");

    let err = FileMessageHandler::open(&missing).unwrap_err();
    assert!(matches!(err, BrokerError::StorageDirMissing(_)));
}
