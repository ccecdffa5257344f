//! Tests for request lifecycle management

#[cfg(test)]
mod tests {
    use crate::manager::RequestManager;
    use crate::request::Operation;
    use crate::testserver::{ok_json, TestServer};
    use crate::transport::Transport;
    use std::sync::mpsc;
    use std::thread;
    use std::time::{Duration, Instant};

    /// Server whose search endpoint sleeps when the query says so.
    fn sluggish_server() -> TestServer {
        TestServer::spawn(|request| {
            if request.target.contains("text=slow") {
                thread::sleep(Duration::from_millis(700));
            }
            ok_json(r#"{"code":0,"search":[]}"#)
        })
    }

    fn search(query: &str) -> Operation {
        Operation::Search {
            category: "Movies".to_string(),
            query: query.to_string(),
        }
    }

    #[test]
    fn test_submit_returns_without_waiting() {
        let server = sluggish_server();
        let mut manager = RequestManager::new();
        let (tx, rx) = mpsc::channel();

        let started = Instant::now();
        manager.submit(&server.url(), Transport::default(), search("slow"), Box::new(tx));
        assert!(
            started.elapsed() < Duration::from_millis(200),
            "submit must not block on the exchange"
        );

        let event = rx.recv_timeout(Duration::from_secs(5)).expect("no result");
        assert!(!event.is_error());
        manager.shutdown();
    }

    #[test]
    fn test_shutdown_joins_every_pending_request() {
        let server = sluggish_server();
        let mut manager = RequestManager::new();
        let (tx, rx) = mpsc::channel();

        manager.submit(&server.url(), Transport::default(), search("slow"), Box::new(tx.clone()));
        manager.submit(&server.url(), Transport::default(), search("fast1"), Box::new(tx.clone()));
        manager.submit(&server.url(), Transport::default(), search("fast2"), Box::new(tx));

        let started = Instant::now();
        manager.shutdown();
        let elapsed = started.elapsed();

        // The slow request was still running; shutdown cannot have returned
        // before its thread was joined.
        assert!(
            elapsed >= Duration::from_millis(400),
            "shutdown returned after {:?}, before the slow request finished",
            elapsed
        );

        // Every listener ran before its thread was joined, so all three
        // results are already in the channel.
        let mut delivered = 0;
        while let Ok(_event) = rx.try_recv() {
            delivered += 1;
        }
        assert_eq!(delivered, 3);
    }

    #[test]
    fn test_fast_request_reaped_while_slow_still_runs() {
        let server = sluggish_server();
        let manager = RequestManager::new();
        let (tx, rx) = mpsc::channel();

        manager.submit(&server.url(), Transport::default(), search("slow"), Box::new(tx.clone()));
        manager.submit(&server.url(), Transport::default(), search("fast"), Box::new(tx));

        // The fast result arrives while the slow request is still blocked.
        let event = rx.recv_timeout(Duration::from_secs(5)).expect("no result");
        assert!(!event.is_error());

        // The reaper reclaims the fast request without waiting for the slow
        // one: pending drops to 1 well inside the slow request's runtime.
        let deadline = Instant::now() + Duration::from_millis(600);
        loop {
            if manager.pending_len() == 1 {
                break;
            }
            assert!(
                Instant::now() < deadline,
                "fast request was not reaped while the slow one ran"
            );
            thread::sleep(Duration::from_millis(10));
        }

        drop(manager); // drains the slow request
    }

    #[test]
    fn test_idle_manager_shuts_down_cleanly() {
        let mut manager = RequestManager::new();
        manager.shutdown();
        // Shutting down twice is a no-op.
        manager.shutdown();
    }
}
