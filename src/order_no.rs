use rand::Rng;

/// Generate an order identifier: `ORD` + unix seconds + random suffix in
/// [0, 100000). Collisions are not detected here; the store's primary-key
/// constraint rejects the insert if one ever happens.
pub fn generate() -> String {
    let timestamp = chrono::Utc::now().timestamp();
    let suffix = rand::thread_rng().gen_range(0..100_000);
    format!("ORD{timestamp}{suffix}")
}
