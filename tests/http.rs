use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct HydrationState {
    date: String,
    consumed_today: f64,
    caffeinated_today: f64,
    base_goal: f64,
    daily_goal: f64,
    difference: f64,
}

#[derive(Debug, Deserialize)]
struct DrinkEntry {
    id: u64,
    drink_type: String,
    amount: f64,
}

#[derive(Debug, Deserialize)]
struct UserProfile {
    gender: String,
    weight: f64,
}

#[derive(Debug, Deserialize)]
struct ReminderSettings {
    enabled: bool,
    interval_minutes: u32,
    start: String,
    end: String,
}

#[derive(Debug, Deserialize)]
struct RemindersResponse {
    settings: ReminderSettings,
    upcoming: Vec<String>,
}

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::Once;
    use std::sync::atomic::{AtomicI32, Ordering};

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_data_path() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("drink_reminder_http_{}_{}.json", std::process::id(), nanos));
    path.to_string_lossy().to_string()
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/today")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    let data_path = unique_data_path();
    let child = Command::new(env!("CARGO_BIN_EXE_drink_reminder"))
        .env("PORT", port.to_string())
        .env("APP_DATA_PATH", data_path)
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

async fn today(client: &Client, server: &TestServer) -> HydrationState {
    client
        .get(format!("{}/api/today", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[tokio::test]
async fn http_logging_a_drink_updates_today() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before = today(&client, &server).await;

    let response = client
        .post(format!("{}/api/drinks", server.base_url))
        .json(&serde_json::json!({ "drink_type": "Water", "amount": 0.5 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let entry: DrinkEntry = response.json().await.unwrap();
    assert_eq!(entry.drink_type, "Water");
    assert!(close(entry.amount, 0.5));

    let after = today(&client, &server).await;
    assert!(close(after.consumed_today, before.consumed_today + 0.5));
    assert!(close(after.daily_goal, before.daily_goal));
    assert!(close(after.difference, after.daily_goal - after.consumed_today));
    assert!(!after.date.is_empty());

    let response = client
        .delete(format!("{}/api/drinks/{}", server.base_url, entry.id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let restored = today(&client, &server).await;
    assert!(close(restored.consumed_today, before.consumed_today));

    let response = client
        .delete(format!("{}/api/drinks/{}", server.base_url, entry.id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn http_coffee_raises_goal_and_consumed() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before = today(&client, &server).await;

    let entry: DrinkEntry = client
        .post(format!("{}/api/drinks", server.base_url))
        .json(&serde_json::json!({ "drink_type": "Coffee", "amount": 0.2 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let after = today(&client, &server).await;
    assert!(close(after.consumed_today, before.consumed_today + 0.2));
    assert!(close(after.caffeinated_today, before.caffeinated_today + 0.2));
    assert!(close(after.daily_goal, before.daily_goal + 0.2));
    assert!(close(after.difference, before.difference));

    client
        .delete(format!("{}/api/drinks/{}", server.base_url, entry.id))
        .send()
        .await
        .unwrap();
}

#[tokio::test]
async fn http_rejects_negative_amount() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/drinks", server.base_url))
        .json(&serde_json::json!({ "drink_type": "Water", "amount": -1.0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn http_profile_drives_base_goal() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let profile: UserProfile = client
        .put(format!("{}/api/profile", server.base_url))
        .json(&serde_json::json!({ "age": 30, "gender": "Male", "weight": 70.0 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(profile.gender, "male");
    assert!(close(profile.weight, 70.0));

    let state = today(&client, &server).await;
    assert!(close(state.base_goal, 2.8));
    assert!(close(state.daily_goal, state.base_goal + state.caffeinated_today));
}

#[tokio::test]
async fn http_day_requires_iso_date() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .get(format!("{}/api/day/yesterday", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = client
        .get(format!("{}/api/day/2001-01-01", server.base_url))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["hydration"]["consumed_today"], 0.0);
    assert_eq!(body["entries"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn http_reminder_settings_update() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .put(format!("{}/api/reminders", server.base_url))
        .json(&serde_json::json!({ "start": "25:99" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let updated: RemindersResponse = client
        .put(format!("{}/api/reminders", server.base_url))
        .json(&serde_json::json!({ "enabled": true, "start": "08:00", "end": "20:00" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(updated.settings.enabled);
    assert_eq!(updated.settings.interval_minutes, 30);
    assert_eq!(updated.settings.start, "08:00");
    assert_eq!(updated.settings.end, "20:00");
    assert_eq!(updated.upcoming.len(), 5);

    let disabled: RemindersResponse = client
        .put(format!("{}/api/reminders", server.base_url))
        .json(&serde_json::json!({ "enabled": false }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(!disabled.settings.enabled);
    assert!(disabled.upcoming.is_empty());
}
