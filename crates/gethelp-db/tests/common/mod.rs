// Backend-agnostic integration tests for the Database trait.
//
// Each public async function accepts `&dyn Database` so that the same logic
// can be exercised against both the SQLite and Postgres backends.

use chrono::Utc;
use gethelp_core::NewHelpRequest;
use gethelp_db::Database;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn make_request(title: &str) -> NewHelpRequest {
    NewHelpRequest {
        title: title.to_string(),
        body: format!("body of {title}"),
        image_url: String::new(),
    }
}

// ---------------------------------------------------------------------------
// Request tests
// ---------------------------------------------------------------------------

/// A fresh database lists nothing and does not error.
pub async fn test_empty_list(db: &dyn Database) {
    let all = db.list_requests().await.unwrap();
    assert!(all.is_empty());
}

/// Insert assigns id and timestamp and echoes the text fields.
pub async fn test_insert_assigns_id_and_timestamp(db: &dyn Database) {
    let before = Utc::now();
    let r = db
        .insert_request(&NewHelpRequest {
            title: "Need food".into(),
            body: "Family of 4".into(),
            image_url: String::new(),
        })
        .await
        .unwrap();
    assert!(!r.id.is_empty());
    assert_eq!(r.title, "Need food");
    assert_eq!(r.body, "Family of 4");
    assert_eq!(r.image_url, "");
    // Backends may truncate to microseconds.
    let slack = chrono::Duration::milliseconds(1);
    assert!(r.created_at >= before - slack);
    assert!(r.created_at <= Utc::now() + slack);

    let all = db.list_requests().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0], r);
}

/// Ids are unique across inserts.
pub async fn test_ids_are_unique(db: &dyn Database) {
    let a = db.insert_request(&make_request("a")).await.unwrap();
    let b = db.insert_request(&make_request("b")).await.unwrap();
    assert_ne!(a.id, b.id);
}

/// Rows come back newest first.
pub async fn test_list_newest_first(db: &dyn Database) {
    for title in ["first", "second", "third"] {
        db.insert_request(&make_request(title)).await.unwrap();
    }

    let all = db.list_requests().await.unwrap();
    let titles: Vec<&str> = all.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["third", "second", "first"]);
    assert!(all.windows(2).all(|w| w[0].created_at >= w[1].created_at));
}

/// Empty text fields and image urls are stored as given.
pub async fn test_empty_fields_round_trip(db: &dyn Database) {
    let r = db
        .insert_request(&NewHelpRequest {
            title: String::new(),
            body: String::new(),
            image_url: "/uploads/request-1-00000001.png".into(),
        })
        .await
        .unwrap();
    assert_eq!(r.title, "");
    assert_eq!(r.body, "");
    assert_eq!(r.image_url, "/uploads/request-1-00000001.png");
}

/// Concurrent inserts all land and are listed.
pub async fn test_concurrent_inserts(db: std::sync::Arc<dyn Database>) {
    let mut handles = Vec::new();
    for i in 0..10 {
        let db = db.clone();
        handles.push(tokio::spawn(async move {
            db.insert_request(&make_request(&format!("req-{i}")))
                .await
                .unwrap()
        }));
    }
    for h in handles {
        h.await.unwrap();
    }
    let all = db.list_requests().await.unwrap();
    assert_eq!(all.len(), 10);
    assert!(all.windows(2).all(|w| w[0].created_at >= w[1].created_at));
}
